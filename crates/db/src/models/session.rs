//! Admin session model and DTOs.

use sqlx::FromRow;
use tokenprint_core::types::{DbId, Timestamp};

/// A row from the `admin_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct AdminSession {
    pub id: DbId,
    pub user_id: DbId,
    pub session_token_hash: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for creating a new admin session.
pub struct CreateSession {
    pub user_id: DbId,
    pub session_token_hash: String,
    pub expires_at: Timestamp,
}
