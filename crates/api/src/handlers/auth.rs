//! Admin login and logout.

use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use chrono::{Duration, Utc};
use serde::Deserialize;
use tokenprint_db::models::session::CreateSession;
use tokenprint_db::repositories::{AdminUserRepo, SessionRepo};

use crate::auth::password::{dummy_hash, verify_password};
use crate::auth::session::{clear_session_cookie, generate_session_token, session_cookie};
use crate::error::{AppError, AppResult};
use crate::middleware::session::{RequireAdmin, LOGIN_PATH};
use crate::state::AppState;
use crate::templates::{render_html, LoginTemplate};

/// Where a successful login lands.
const DASHBOARD_PATH: &str = "/admin";

/// Where a failed login is sent back to.
const LOGIN_FAILED_PATH: &str = "/admin/login?error=1";

/// Form body for `POST /admin/login`.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Query string of `GET /admin/login`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginPageQuery {
    pub error: Option<String>,
}

/// GET /admin/login
pub async fn login_page(Query(query): Query<LoginPageQuery>) -> AppResult<Html<String>> {
    render_html(&LoginTemplate {
        error: query.error.is_some(),
    })
}

/// POST /admin/login
///
/// On success creates a session row, sets the session cookie, and
/// redirects to the dashboard. Any failure redirects back to the login
/// form without saying which credential was wrong.
pub async fn login(State(state): State<AppState>, Form(input): Form<LoginForm>) -> AppResult<Response> {
    let Some(user) = AdminUserRepo::find_by_username(&state.pool, input.username.trim()).await?
    else {
        // Keep the response time in line with a wrong password.
        let _ = verify_password(&input.password, dummy_hash());
        tracing::info!(username = %input.username, "Login failed: unknown user");
        return Ok(Redirect::to(LOGIN_FAILED_PATH).into_response());
    };

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login failed: wrong password");
        return Ok(Redirect::to(LOGIN_FAILED_PATH).into_response());
    }

    let ttl_secs = state.config.session_ttl_hours * 3600;
    let (plaintext, token_hash) = generate_session_token();
    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            session_token_hash: token_hash,
            expires_at: Utc::now() + Duration::seconds(ttl_secs),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Admin logged in");

    Ok((
        [(
            SET_COOKIE,
            session_cookie(&plaintext, ttl_secs, state.config.cookie_secure),
        )],
        Redirect::to(DASHBOARD_PATH),
    )
        .into_response())
}

/// POST /admin/logout
pub async fn logout(State(state): State<AppState>, admin: RequireAdmin) -> AppResult<Response> {
    SessionRepo::delete_by_hash(&state.pool, &admin.session_hash).await?;
    tracing::info!(user_id = admin.user_id, "Admin logged out");

    Ok((
        [(SET_COOKIE, clear_session_cookie(state.config.cookie_secure))],
        Redirect::to(LOGIN_PATH),
    )
        .into_response())
}
