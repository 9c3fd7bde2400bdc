//! Print execution engine.
//!
//! Contains the dispatcher that turns a scanned token into an OS print job.

pub mod dispatcher;
