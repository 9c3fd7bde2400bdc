//! Kiosk scanner daemon.
//!
//! Captures camera frames, decodes job tokens from QR codes, and asks the
//! tokenprint server to print them.
//!
//! - [`camera`] -- Frame capture via an external command.
//! - [`client`] -- HTTP client for the print endpoint.
//! - [`config`] -- Environment configuration.
//! - [`scanner`] -- The capture/decode/print loop and its cooldown.

pub mod camera;
pub mod client;
pub mod config;
pub mod scanner;
