//! Request extractors and middleware.

pub mod auth;

pub use auth::{require_admin, AdminUser, BearerToken};
