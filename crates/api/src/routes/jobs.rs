//! Route definitions for the `/jobs` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// Routes mounted at `/api/v1/jobs`.
///
/// ```text
/// GET  /{token}       -> get_job
/// GET  /{token}/qr    -> job_qr
/// POST /{token}/pay   -> pay_job
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{token}", get(jobs::get_job))
        .route("/{token}/qr", get(jobs::job_qr))
        .route("/{token}/pay", post(jobs::pay_job))
}
