//! Token-to-printer dispatch.
//!
//! A dispatch runs inside the calling request and blocks until the print
//! command returns. Before the printer is touched the job is claimed with a
//! conditional `-> printing` update via [`JobRepo::transition`], so only one
//! of several concurrent dispatches for the same token can proceed.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tokenprint_core::error::CoreError;
use tokenprint_core::printing::{PrintCommand, PrintOutcome};
use tokenprint_core::status::JobStatus;
use tokenprint_core::token::is_expired;
use tokenprint_db::models::job::Job;
use tokenprint_db::repositories::JobRepo;
use tokenprint_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Failure detail for jobs found in `printing` when the server starts.
pub const INTERRUPTED_PRINT_MESSAGE: &str = "Print was interrupted before its result was recorded";

/// Failure detail for a print that succeeded but could not be recorded.
const UNRECORDED_PRINT_MESSAGE: &str = "Printed, but the result could not be recorded";

/// Looks up jobs by token and sends them to the printer.
pub struct PrintDispatcher {
    pool: DbPool,
    printer: Arc<dyn PrintCommand>,
    payment_required: bool,
}

impl PrintDispatcher {
    pub fn new(pool: DbPool, printer: Arc<dyn PrintCommand>, payment_required: bool) -> Self {
        Self {
            pool,
            printer,
            payment_required,
        }
    }

    /// Build a dispatcher from the shared application state.
    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.pool.clone(),
            Arc::clone(&state.printer),
            state.config.payment_required,
        )
    }

    /// Print the job identified by `token`.
    ///
    /// Fails with `NotFound` for unknown tokens, `NotPaid` while payment is
    /// outstanding, `Expired` past the token lifetime, `AlreadyPrinted` or
    /// `Conflict` when the job is no longer printable, and `PrintFailed` when
    /// the print command reports an error. In every failure case except the
    /// last, the printer is never invoked.
    pub async fn dispatch(&self, token: &str) -> AppResult<Job> {
        let job = JobRepo::find_by_token(&self.pool, token)
            .await?
            .ok_or_else(|| CoreError::job_not_found(token))?;

        job.status.check_printable(token, self.payment_required)?;

        if is_expired(job.expires_at, Utc::now()) {
            tracing::info!(token, expires_at = %job.expires_at, "Rejected expired token");
            return Err(CoreError::Expired {
                token: token.to_string(),
            }
            .into());
        }

        let claimed =
            JobRepo::transition(&self.pool, token, job.status, JobStatus::Printing).await?;
        if !claimed {
            return Err(self.lost_claim(token).await);
        }

        tracing::info!(token, job_id = job.id, "Dispatching job to printer");

        match self.printer.print(Path::new(&job.stored_path)).await {
            PrintOutcome::Printed => {
                if let Err(e) = JobRepo::mark_printed(&self.pool, token).await {
                    tracing::error!(token, job_id = job.id, error = %e, "Could not record printed job");
                    self.release_claim(token, UNRECORDED_PRINT_MESSAGE).await;
                    return Err(e.into());
                }
                tracing::info!(token, job_id = job.id, "Job printed");
            }
            PrintOutcome::Failed { exit_code, detail } => {
                tracing::error!(token, job_id = job.id, ?exit_code, %detail, "Print command failed");
                self.release_claim(token, &detail).await;
                return Err(CoreError::PrintFailed(detail).into());
            }
        }

        JobRepo::find_by_token(&self.pool, token)
            .await?
            .ok_or_else(|| CoreError::job_not_found(token).into())
    }

    /// Move a claimed job out of `printing` after the print did not complete
    /// cleanly. If this write fails too, the job stays in `printing` until
    /// the startup sweep fails it with [`INTERRUPTED_PRINT_MESSAGE`].
    async fn release_claim(&self, token: &str, detail: &str) {
        match JobRepo::mark_failed(&self.pool, token, detail).await {
            Ok(true) => {}
            Ok(false) => tracing::warn!(token, "Job left printing before it could be marked failed"),
            Err(e) => tracing::error!(token, error = %e, "Could not mark job failed"),
        }
    }

    /// Error for a dispatch that lost the `-> printing` claim to another writer.
    async fn lost_claim(&self, token: &str) -> AppError {
        tracing::warn!(token, "Lost print claim to a concurrent dispatch");
        match JobRepo::find_by_token(&self.pool, token).await {
            Ok(Some(current)) => match current.status.check_printable(token, self.payment_required)
            {
                Err(e) => e.into(),
                Ok(()) => CoreError::Conflict(format!("Job {token} changed during dispatch")).into(),
            },
            Ok(None) => CoreError::job_not_found(token).into(),
            Err(e) => e.into(),
        }
    }
}
