//! Askama templates for the upload page, admin login, and dashboard.

use askama::Template;
use axum::response::Html;
use tokenprint_core::status::JobStatus;
use tokenprint_db::models::job::Job;

use crate::error::{AppError, AppResult};

/// Timestamp format used in dashboard cells.
const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// `GET /` upload form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub max_upload_mb: usize,
    pub simulate_payment: bool,
}

/// `GET /admin/login` form.
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: bool,
}

/// `GET /admin` job table.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub username: String,
    pub rows: Vec<DashboardRow>,
    pub filters: Vec<StatusFilter>,
}

/// A status link in the dashboard filter bar.
pub struct StatusFilter {
    pub name: &'static str,
    pub selected: bool,
}

/// One pre-formatted job row of the dashboard.
pub struct DashboardRow {
    pub token: String,
    pub filename: String,
    pub status: &'static str,
    pub created_at: String,
    pub expires_at: String,
    pub printed_at: String,
    pub can_mark_paid: bool,
}

impl From<&Job> for DashboardRow {
    fn from(job: &Job) -> Self {
        Self {
            token: job.token.clone(),
            filename: job.filename.clone(),
            status: job.status.as_str(),
            created_at: job.created_at.format(DISPLAY_TIME_FORMAT).to_string(),
            expires_at: job.expires_at.format(DISPLAY_TIME_FORMAT).to_string(),
            printed_at: job
                .printed_at
                .map(|t| t.format(DISPLAY_TIME_FORMAT).to_string())
                .unwrap_or_default(),
            can_mark_paid: job.status == JobStatus::Uploaded,
        }
    }
}

impl DashboardTemplate {
    pub fn new(username: String, jobs: &[Job], filter: Option<JobStatus>) -> Self {
        Self {
            username,
            rows: jobs.iter().map(DashboardRow::from).collect(),
            filters: JobStatus::ALL
                .iter()
                .map(|&status| StatusFilter {
                    name: status.as_str(),
                    selected: filter == Some(status),
                })
                .collect(),
        }
    }
}

/// Render a template into an HTML response.
pub fn render_html<T: Template>(template: &T) -> AppResult<Html<String>> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::InternalError(format!("Template rendering failed: {e}")))
}
