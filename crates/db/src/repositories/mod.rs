//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&SqlitePool` as the first argument.

pub mod admin_user_repo;
pub mod job_repo;
pub mod session_repo;

pub use admin_user_repo::AdminUserRepo;
pub use job_repo::JobRepo;
pub use session_repo::SessionRepo;

/// Default page size for listings.
pub const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for listings.
pub const MAX_LIMIT: i64 = 200;

/// Clamp a requested page size into `1..=MAX_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Clamp a requested offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
