//! trip-admin: configuration-driven admin panel backend for the trip planner.

pub mod auth;
pub mod case;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod morph;
pub mod openapi;
pub mod render;
pub mod resources;
pub mod response;
pub mod routes;
pub mod seed;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;

pub use auth::{authenticate, issue_test_token};
pub use config::{ResourceConfig, ResourceRegistry};
pub use error::{AppError, ConfigError, SerpApiError};
pub use migration::apply_migrations;
pub use routes::app;
pub use seed::seed_admin;
pub use service::{CrudService, FormValidator, Mode};
pub use settings::Settings;
pub use state::AppState;
pub use store::{connect, ensure_database_exists};
