//! Repository for the `jobs` table (the token store).
//!
//! Every status change goes through [`JobRepo::transition`], a conditional
//! update that only succeeds when the row is still in the expected status.
//! This is what keeps two concurrent dispatches of one token from both
//! reaching the printer.

use chrono::Utc;
use sqlx::SqlitePool;
use tokenprint_core::status::JobStatus;

use super::{clamp_limit, clamp_offset};
use crate::models::job::{CreateJob, Job, JobListQuery, StatusCount};

/// Column list for `jobs` queries.
const COLUMNS: &str = "\
    id, token, filename, stored_path, status, error_message, \
    created_at, expires_at, printed_at, updated_at";

/// Token store operations.
pub struct JobRepo;

impl JobRepo {
    /// Insert a new job row, returning it.
    pub async fn create(pool: &SqlitePool, input: &CreateJob) -> Result<Job, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs (token, filename, stored_path, status, created_at, expires_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(&input.token)
            .bind(&input.filename)
            .bind(&input.stored_path)
            .bind(input.status.as_str())
            .bind(input.created_at)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Look up a job by its token.
    pub async fn find_by_token(pool: &SqlitePool, token: &str) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE token = ?1");
        sqlx::query_as::<_, Job>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// List jobs newest first, optionally filtered by status.
    pub async fn list(pool: &SqlitePool, params: &JobListQuery) -> Result<Vec<Job>, sqlx::Error> {
        let limit = clamp_limit(params.limit);
        let offset = clamp_offset(params.offset);

        match params.status {
            Some(status) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM jobs WHERE status = ?1 \
                     ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3"
                );
                sqlx::query_as::<_, Job>(&query)
                    .bind(status.as_str())
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM jobs \
                     ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2"
                );
                sqlx::query_as::<_, Job>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Count jobs per status. Statuses with no jobs are omitted.
    pub async fn count_by_status(pool: &SqlitePool) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM jobs GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await
    }

    /// Move a job from `from` to `to` if it is still in `from`.
    ///
    /// Returns `false` when no row matched: the token is unknown or another
    /// request changed the status first. Illegal lifecycle steps are never
    /// issued.
    pub async fn transition(
        pool: &SqlitePool,
        token: &str,
        from: JobStatus,
        to: JobStatus,
    ) -> Result<bool, sqlx::Error> {
        if !from.can_transition_to(to) {
            tracing::warn!(token, %from, %to, "Refusing illegal job status transition");
            return Ok(false);
        }

        let result = sqlx::query(
            "UPDATE jobs SET status = ?3, updated_at = ?4 WHERE token = ?1 AND status = ?2",
        )
        .bind(token)
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(Utc::now())
        .execute(pool)
        .await?;

        let changed = result.rows_affected() > 0;
        if changed {
            tracing::debug!(token, %from, %to, "Job status changed");
        }
        Ok(changed)
    }

    /// Record a successful print: `printing -> printed`.
    pub async fn mark_printed(pool: &SqlitePool, token: &str) -> Result<bool, sqlx::Error> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE jobs SET status = ?2, printed_at = ?4, updated_at = ?4, error_message = NULL \
             WHERE token = ?1 AND status = ?3",
        )
        .bind(token)
        .bind(JobStatus::Printed.as_str())
        .bind(JobStatus::Printing.as_str())
        .bind(now)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a failed print: `printing -> failed` with the failure detail.
    pub async fn mark_failed(
        pool: &SqlitePool,
        token: &str,
        error_message: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jobs SET status = ?2, error_message = ?4, updated_at = ?5 \
             WHERE token = ?1 AND status = ?3",
        )
        .bind(token)
        .bind(JobStatus::Failed.as_str())
        .bind(JobStatus::Printing.as_str())
        .bind(error_message)
        .bind(Utc::now())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fail every job left in `printing`, returning how many were changed.
    ///
    /// Run at startup: a `printing` row with no live process behind it was
    /// interrupted, and would otherwise block its token forever.
    pub async fn fail_interrupted(pool: &SqlitePool, error_message: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jobs SET status = ?1, error_message = ?3, updated_at = ?4 WHERE status = ?2",
        )
        .bind(JobStatus::Failed.as_str())
        .bind(JobStatus::Printing.as_str())
        .bind(error_message)
        .bind(Utc::now())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
