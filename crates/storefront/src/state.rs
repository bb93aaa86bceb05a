//! Shared application state.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::StorefrontConfig;
use crate::services::cart::LineTotalPolicy;

/// Shared application state, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: SqlitePool,
}

impl AppState {
    /// Bundle the configuration and database pool.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: SqlitePool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// The configured line-total policy for cart adds.
    #[must_use]
    pub fn line_total_policy(&self) -> LineTotalPolicy {
        LineTotalPolicy::from_legacy_flag(self.inner.config.legacy_cart_totals)
    }
}
