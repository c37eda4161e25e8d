use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;

/// Shared by every handler: the pool plus the config it was started with
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}
