//! HTTP handlers for resource pages and token login.

pub mod auth;
pub mod resource;
pub use auth::login;
pub use resource::*;
