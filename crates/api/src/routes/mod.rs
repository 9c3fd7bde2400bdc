pub mod admin;
pub mod health;
pub mod jobs;
pub mod pages;
pub mod print;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree that runs under the request timeout.
///
/// Route hierarchy:
///
/// ```text
/// /uploads                     upload a document (POST, multipart)
///
/// /jobs/{token}                job status (GET)
/// /jobs/{token}/qr             QR code PNG (GET)
/// /jobs/{token}/pay            payment confirmation (POST)
/// ```
///
/// The print and scan routes live in [`print::router`] because they block on
/// the printer and must not be cut off by the timeout.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/uploads", post(handlers::uploads::upload))
        .nest("/jobs", jobs::router())
}
