//! Repository for the `admin_sessions` table.

use chrono::Utc;
use sqlx::SqlitePool;
use tokenprint_core::types::Timestamp;

use crate::models::session::{AdminSession, CreateSession};

const COLUMNS: &str = "id, user_id, session_token_hash, expires_at, created_at";

/// Server-side admin session store, keyed by the hash of the cookie value.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(
        pool: &SqlitePool,
        input: &CreateSession,
    ) -> Result<AdminSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO admin_sessions (user_id, session_token_hash, expires_at, created_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminSession>(&query)
            .bind(input.user_id)
            .bind(&input.session_token_hash)
            .bind(input.expires_at)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Find a session by token hash that has not expired at `now`.
    pub async fn find_active_by_hash(
        pool: &SqlitePool,
        hash: &str,
        now: Timestamp,
    ) -> Result<Option<AdminSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM admin_sessions
             WHERE session_token_hash = ?1 AND expires_at > ?2"
        );
        sqlx::query_as::<_, AdminSession>(&query)
            .bind(hash)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Delete a session (logout). Returns `true` if a row was removed.
    pub async fn delete_by_hash(pool: &SqlitePool, hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM admin_sessions WHERE session_token_hash = ?1")
            .bind(hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete sessions that expired before `now`. Returns the count removed.
    pub async fn cleanup_expired(pool: &SqlitePool, now: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM admin_sessions WHERE expires_at <= ?1")
            .bind(now)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
