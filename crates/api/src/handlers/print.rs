//! Kiosk-facing print handlers.
//!
//! These routes block until the print command returns and are mounted
//! outside the request timeout.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use tokenprint_core::qr;

use crate::engine::dispatcher::PrintDispatcher;
use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, JobStatusResponse};
use crate::state::AppState;

/// POST /api/v1/print/{token}
///
/// Dispatch the job for a token that was scanned by the kiosk client.
pub async fn print_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<DataResponse<JobStatusResponse>>> {
    let job = PrintDispatcher::from_state(&state).dispatch(&token).await?;
    Ok(Json(DataResponse { data: job.into() }))
}

/// POST /api/v1/scan
///
/// Decode a QR code from a raw PNG or JPEG camera frame and dispatch the
/// token it carries.
pub async fn scan(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<DataResponse<JobStatusResponse>>> {
    let token = qr::decode_frame(&body)?.ok_or(AppError::NoCodeFound)?;
    tracing::debug!(token = %token, "Decoded token from frame");

    let job = PrintDispatcher::from_state(&state).dispatch(&token).await?;
    Ok(Json(DataResponse { data: job.into() }))
}
