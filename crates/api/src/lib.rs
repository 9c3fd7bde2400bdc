//! tokenprint API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, the
//! print dispatcher) so integration tests and the binaries can share them.

pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod storage;
pub mod templates;
