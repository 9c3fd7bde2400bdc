//! Admin user model.

use sqlx::FromRow;
use tokenprint_core::types::{DbId, Timestamp};

/// Full row from the `admin_users` table.
///
/// Contains the password hash -- never serialize this.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    pub created_at: Timestamp,
}

/// DTO for creating an admin user.
#[derive(Debug)]
pub struct CreateAdminUser {
    pub username: String,
    pub password_hash: String,
}
