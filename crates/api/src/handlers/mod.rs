//! HTTP handlers, grouped by resource.

pub mod admin;
pub mod auth;
pub mod jobs;
pub mod pages;
pub mod print;
pub mod uploads;
