//! Print job model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tokenprint_core::status::JobStatus;
use tokenprint_core::types::{DbId, Timestamp};

/// A row from the `jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub token: String,
    /// Original (sanitised) filename shown to users.
    pub filename: String,
    /// Absolute or server-relative path of the stored upload. Never exposed.
    #[serde(skip_serializing)]
    pub stored_path: String,
    #[sqlx(try_from = "String")]
    pub status: JobStatus,
    /// Detail of the last print failure.
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub printed_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

/// DTO for inserting a freshly uploaded job.
#[derive(Debug, Clone)]
pub struct CreateJob {
    pub token: String,
    pub filename: String,
    pub stored_path: String,
    /// `Uploaded`, or `Paid` when payment was confirmed with the upload.
    pub status: JobStatus,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Query parameters for job listings.
#[derive(Debug, Default, Deserialize)]
pub struct JobListQuery {
    pub status: Option<JobStatus>,
    /// Maximum number of results. Defaults to 50, capped at 200.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Number of jobs currently in one status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusCount {
    #[sqlx(try_from = "String")]
    pub status: JobStatus,
    pub count: i64,
}
