//! Domain logic for the tokenprint kiosk.
//!
//! Everything here is free of database access so it can be shared by the
//! HTTP server and the scanner binary and tested in isolation.

pub mod error;
pub mod printing;
pub mod qr;
pub mod status;
pub mod token;
pub mod types;
pub mod upload;
