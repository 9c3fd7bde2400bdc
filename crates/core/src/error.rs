/// Domain errors shared by the database, HTTP and scanner layers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with key {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Job {token} has not been paid")]
    NotPaid { token: String },

    #[error("Token {token} has expired")]
    Expired { token: String },

    #[error("Job {token} has already been printed")]
    AlreadyPrinted { token: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Print failed: {0}")]
    PrintFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a missing job looked up by its token.
    pub fn job_not_found(token: &str) -> Self {
        Self::NotFound {
            entity: "Job",
            key: token.to_string(),
        }
    }
}
