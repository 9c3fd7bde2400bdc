//! Admin dashboard handlers. Every handler requires [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::response::{Html, Redirect};
use axum::Json;
use serde::{Deserialize, Serialize};
use tokenprint_core::status::JobStatus;
use tokenprint_db::models::job::{Job, JobListQuery, StatusCount};
use tokenprint_db::repositories::JobRepo;

use crate::error::AppResult;
use crate::handlers::jobs::mark_paid as mark_job_paid;
use crate::middleware::session::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::templates::{render_html, DashboardTemplate};

/// Query string shared by the HTML dashboard and the JSON listing.
///
/// An empty `status` means no filter.
#[derive(Debug, Default, Deserialize)]
pub struct AdminJobsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl AdminJobsQuery {
    fn into_list_query(self) -> AppResult<JobListQuery> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<JobStatus>()?),
        };
        Ok(JobListQuery {
            status,
            limit: self.limit,
            offset: self.offset,
        })
    }
}

/// Job counts for `GET /admin/stats`.
#[derive(Debug, Serialize)]
pub struct JobStats {
    pub total: i64,
    /// One entry per status, including statuses with no jobs.
    pub by_status: Vec<StatusCount>,
}

/// GET /admin
pub async fn dashboard(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Query(query): Query<AdminJobsQuery>,
) -> AppResult<Html<String>> {
    let params = query.into_list_query()?;
    let jobs = JobRepo::list(&state.pool, &params).await?;
    render_html(&DashboardTemplate::new(admin.username, &jobs, params.status))
}

/// GET /admin/jobs
pub async fn list_jobs(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(query): Query<AdminJobsQuery>,
) -> AppResult<Json<DataResponse<Vec<Job>>>> {
    let params = query.into_list_query()?;
    let jobs = JobRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// GET /admin/stats
pub async fn stats(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> AppResult<Json<DataResponse<JobStats>>> {
    let counts = JobRepo::count_by_status(&state.pool).await?;
    Ok(Json(DataResponse {
        data: fill_stats(&counts),
    }))
}

/// POST /admin/jobs/{token}/pay
pub async fn mark_paid(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(token): Path<String>,
) -> AppResult<Redirect> {
    mark_job_paid(&state.pool, &token).await?;
    tracing::info!(token = %token, user_id = admin.user_id, "Admin marked job paid");
    Ok(Redirect::to("/admin"))
}

fn fill_stats(counts: &[StatusCount]) -> JobStats {
    let by_status: Vec<StatusCount> = JobStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            status,
            count: counts
                .iter()
                .find(|c| c.status == status)
                .map_or(0, |c| c.count),
        })
        .collect();

    JobStats {
        total: by_status.iter().map(|c| c.count).sum(),
        by_status,
    }
}
