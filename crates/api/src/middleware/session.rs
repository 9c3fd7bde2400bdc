//! Cookie-session extractor for admin routes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use chrono::Utc;
use tokenprint_core::types::DbId;
use tokenprint_db::repositories::{AdminUserRepo, SessionRepo};

use crate::auth::session::{hash_session_token, read_cookie, SESSION_COOKIE};
use crate::error::AppError;
use crate::state::AppState;

/// Where unauthenticated dashboard requests are sent.
pub const LOGIN_PATH: &str = "/admin/login";

/// Authenticated administrator resolved from the session cookie.
///
/// Missing, unknown, or expired sessions are redirected to the login page:
///
/// ```ignore
/// async fn dashboard(admin: RequireAdmin) -> AppResult<Html<String>> {
///     tracing::info!(user_id = admin.user_id, "dashboard viewed");
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAdmin {
    pub user_id: DbId,
    pub username: String,
    /// Hash of the presented session token, used by logout.
    pub session_hash: String,
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = read_cookie(&parts.headers, SESSION_COOKIE)
            .ok_or_else(|| Redirect::to(LOGIN_PATH).into_response())?;
        let session_hash = hash_session_token(&token);

        let session = SessionRepo::find_active_by_hash(&state.pool, &session_hash, Utc::now())
            .await
            .map_err(|e| AppError::from(e).into_response())?
            .ok_or_else(|| {
                tracing::debug!("Admin session missing or expired");
                Redirect::to(LOGIN_PATH).into_response()
            })?;

        let user = AdminUserRepo::find_by_id(&state.pool, session.user_id)
            .await
            .map_err(|e| AppError::from(e).into_response())?
            .ok_or_else(|| Redirect::to(LOGIN_PATH).into_response())?;

        Ok(RequireAdmin {
            user_id: user.id,
            username: user.username,
            session_hash,
        })
    }
}
