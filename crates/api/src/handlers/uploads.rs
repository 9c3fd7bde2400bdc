//! Handler for `POST /api/v1/uploads`.

use axum::extract::{Multipart, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use tokenprint_core::qr;
use tokenprint_core::status::JobStatus;
use tokenprint_core::token::{expires_at, generate_token};
use tokenprint_core::upload::{sanitize_filename, validate_upload};
use tokenprint_db::models::job::CreateJob;
use tokenprint_db::repositories::JobRepo;

use crate::config::parse_bool;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::storage::{discard_upload, save_upload};

/// Response header carrying the issued job token.
pub const JOB_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-job-token");

/// The `file` part of an upload form.
struct UploadedFile {
    filename: String,
    content_type: Option<String>,
    data: Vec<u8>,
}

/// POST /api/v1/uploads
///
/// Multipart fields: `file` (required) and `paid` (optional boolean).
/// Stores the document, creates the job, and answers `201 Created` with the
/// QR code PNG as the body and the token in `x-job-token`.
pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> AppResult<Response> {
    let mut file: Option<UploadedFile> = None;
    let mut paid = false;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;
                file = Some(UploadedFile {
                    filename,
                    content_type,
                    data: data.to_vec(),
                });
            }
            "paid" => {
                let text = field.text().await?;
                paid = parse_bool(&text).ok_or_else(|| {
                    AppError::BadRequest(format!("Invalid value for 'paid': '{text}'"))
                })?;
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    validate_upload(
        &file.filename,
        file.content_type.as_deref(),
        file.data.len(),
        state.config.max_upload_bytes,
    )?;

    let token = generate_token();
    let qr_png = qr::encode_png(&token)?;
    let stored_path = save_upload(&state.config.upload_dir, &token, &file.filename, &file.data).await?;

    let status = if paid || state.config.simulate_payment {
        JobStatus::Paid
    } else {
        JobStatus::Uploaded
    };
    let created_at = Utc::now();
    let input = CreateJob {
        token: token.clone(),
        filename: sanitize_filename(&file.filename),
        stored_path: stored_path.to_string_lossy().into_owned(),
        status,
        created_at,
        expires_at: expires_at(created_at, state.config.token_ttl_secs),
    };

    let job = match JobRepo::create(&state.pool, &input).await {
        Ok(job) => job,
        Err(e) => {
            discard_upload(&stored_path).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        token = %job.token,
        job_id = job.id,
        status = %job.status,
        bytes = file.data.len(),
        "Upload accepted",
    );

    let token_header = HeaderValue::from_str(&job.token)
        .map_err(|e| AppError::InternalError(format!("Token is not a valid header: {e}")))?;

    Ok((
        StatusCode::CREATED,
        [
            (CONTENT_TYPE, HeaderValue::from_static("image/png")),
            (JOB_TOKEN_HEADER, token_header),
        ],
        qr_png,
    )
        .into_response())
}
