//! Route definitions for kiosk printing.

use axum::routing::post;
use axum::Router;

use crate::handlers::print;
use crate::state::AppState;

/// Print routes, mounted at the root with full paths.
///
/// ```text
/// POST /api/v1/print/{token}  -> print_token
/// POST /api/v1/scan           -> scan (raw image body)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/print/{token}", post(print::print_token))
        .route("/api/v1/scan", post(print::scan))
}
