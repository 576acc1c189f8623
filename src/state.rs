//! Shared application state for all routes.

use crate::config::ResourceRegistry;
use crate::settings::Settings;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub registry: Arc<ResourceRegistry>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(pool: PgPool, registry: ResourceRegistry, settings: Settings) -> Self {
        AppState {
            pool,
            registry: Arc::new(registry),
            settings: Arc::new(settings),
        }
    }
}
