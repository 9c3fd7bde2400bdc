//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row and the DTOs used to create it.

pub mod admin_user;
pub mod job;
pub mod session;
