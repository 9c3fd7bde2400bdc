//! Shared response envelope types for API handlers.
//!
//! All JSON responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })`.

use serde::Serialize;
use tokenprint_core::status::JobStatus;
use tokenprint_core::types::Timestamp;
use tokenprint_db::models::job::Job;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Public view of a job, safe to return to the customer or the kiosk.
///
/// Omits the stored path and internal failure detail.
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub token: String,
    pub filename: String,
    pub status: JobStatus,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub printed_at: Option<Timestamp>,
}

impl From<Job> for JobStatusResponse {
    fn from(job: Job) -> Self {
        Self {
            token: job.token,
            filename: job.filename,
            status: job.status,
            created_at: job.created_at,
            expires_at: job.expires_at,
            printed_at: job.printed_at,
        }
    }
}
