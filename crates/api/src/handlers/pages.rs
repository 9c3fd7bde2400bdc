//! Public HTML pages.

use axum::extract::State;
use axum::response::Html;

use crate::error::AppResult;
use crate::state::AppState;
use crate::templates::{render_html, IndexTemplate};

/// GET /
pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    render_html(&IndexTemplate {
        max_upload_mb: state.config.max_upload_bytes / (1024 * 1024),
        simulate_payment: state.config.simulate_payment,
    })
}
