//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::Result;
use sqlx::PgPool;

use crate::config::Config;
use crate::db::{self, TransactionManager};
use crate::services::{DistanceService, ExportService, HttpGeoLocator, TextSheetRenderer};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap. The connection pool is the
/// only shared resource; repositories and builders are stateless per call.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// PostgreSQL connection pool.
    db: PgPool,

    /// Transaction scoping for write paths.
    tx: TransactionManager,

    /// Product sheet export.
    export: ExportService,

    /// Geolocation distance utility.
    distance: DistanceService,
}

impl AppState {
    /// Initialize state: connect the pool and wire the services.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = db::create_pool(config).await?;
        Ok(Self::with_pool(config, pool))
    }

    /// Build state over an existing pool (used by tests).
    pub fn with_pool(config: &Config, pool: PgPool) -> Self {
        let tx = TransactionManager::new(pool.clone());
        let export = ExportService::new(config.storage_dir.clone(), Arc::new(TextSheetRenderer));
        let locator = HttpGeoLocator::new(
            reqwest::Client::new(),
            config.geo_ip_api_url.clone(),
            config.geo_city_api_url.clone(),
        );
        let distance = DistanceService::new(Arc::new(locator));

        Self {
            inner: Arc::new(AppStateInner {
                db: pool,
                tx,
                export,
                distance,
            }),
        }
    }

    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub fn tx(&self) -> &TransactionManager {
        &self.inner.tx
    }

    pub fn export(&self) -> &ExportService {
        &self.inner.export
    }

    pub fn distance(&self) -> &DistanceService {
        &self.inner.distance
    }
}
