use std::sync::Arc;

use tokenprint_core::printing::PrintCommand;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (the token store).
    pub pool: tokenprint_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// OS print command used by the dispatcher.
    pub printer: Arc<dyn PrintCommand>,
}
