//! Request extractors guarding the admin dashboard.
//!
//! - [`session::RequireAdmin`] -- Requires a valid admin session cookie.

pub mod session;
