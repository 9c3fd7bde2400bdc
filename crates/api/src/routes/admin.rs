//! Route definitions for the admin dashboard.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{admin, auth};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET  /login              -> login_page (public)
/// POST /login              -> login (public)
/// POST /logout             -> logout
/// GET  /                   -> dashboard (HTML)
/// GET  /jobs               -> list_jobs (JSON)
/// GET  /stats              -> stats (JSON)
/// POST /jobs/{token}/pay   -> mark_paid
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/jobs", get(admin::list_jobs))
        .route("/stats", get(admin::stats))
        .route("/jobs/{token}/pay", post(admin::mark_paid))
}
