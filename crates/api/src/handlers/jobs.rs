//! Handlers for the `/jobs` resource: status lookup, QR re-render, and
//! the payment callback.

use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::Json;
use tokenprint_core::error::CoreError;
use tokenprint_core::qr;
use tokenprint_core::status::JobStatus;
use tokenprint_db::models::job::Job;
use tokenprint_db::repositories::JobRepo;
use tokenprint_db::DbPool;

use crate::error::AppResult;
use crate::response::{DataResponse, JobStatusResponse};
use crate::state::AppState;

/// GET /api/v1/jobs/{token}
pub async fn get_job(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<DataResponse<JobStatusResponse>>> {
    let job = find_job(&state.pool, &token).await?;
    Ok(Json(DataResponse { data: job.into() }))
}

/// GET /api/v1/jobs/{token}/qr
///
/// Re-render the QR code of an existing job.
pub async fn job_qr(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<impl IntoResponse> {
    let job = find_job(&state.pool, &token).await?;
    let png = qr::encode_png(&job.token)?;
    Ok(([(CONTENT_TYPE, "image/png")], png))
}

/// POST /api/v1/jobs/{token}/pay
///
/// Payment confirmation callback.
pub async fn pay_job(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<DataResponse<JobStatusResponse>>> {
    let job = mark_paid(&state.pool, &token).await?;
    Ok(Json(DataResponse { data: job.into() }))
}

pub(crate) async fn find_job(pool: &DbPool, token: &str) -> AppResult<Job> {
    Ok(JobRepo::find_by_token(pool, token)
        .await?
        .ok_or_else(|| CoreError::job_not_found(token))?)
}

/// Move a job `uploaded -> paid`.
///
/// Already-paid jobs are returned unchanged. Jobs past `paid` are a conflict.
pub(crate) async fn mark_paid(pool: &DbPool, token: &str) -> AppResult<Job> {
    let job = find_job(pool, token).await?;
    match job.status {
        JobStatus::Paid => return Ok(job),
        JobStatus::Uploaded => {}
        other => {
            return Err(CoreError::Conflict(format!(
                "Job {token} is already {other} and cannot be marked paid"
            ))
            .into());
        }
    }

    if JobRepo::transition(pool, token, JobStatus::Uploaded, JobStatus::Paid).await? {
        tracing::info!(token, job_id = job.id, "Job marked paid");
    }

    // A concurrent writer may have moved the job; report what is stored now.
    let current = find_job(pool, token).await?;
    match current.status {
        JobStatus::Paid => Ok(current),
        other => Err(CoreError::Conflict(format!(
            "Job {token} is already {other} and cannot be marked paid"
        ))
        .into()),
    }
}
