//! Admin authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session`] -- Opaque session tokens and the session cookie.

pub mod password;
pub mod session;
