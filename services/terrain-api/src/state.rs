//! Application state and shared resources.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::info;

use storage::{FileStore, LayerManifests, RedisStore, TieredStore, TileStore};

use crate::config::{ServerConfig, StoreConfig};

/// Shared application state.
pub struct AppState {
    /// Tile store chain, fastest tier first.
    pub tiles: TieredStore,

    /// `layer.json` lookup over the tileset root.
    pub manifests: LayerManifests,

    /// Prometheus exporter handle, when a recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Connect every configured store and assemble the chain.
    pub async fn new(config: &ServerConfig, prometheus: Option<PrometheusHandle>) -> Result<Self> {
        let mut stores = Vec::new();
        for store_config in config.store_chain() {
            stores.push(build_store(&store_config).await?);
        }

        let tiles = TieredStore::new(stores).with_backend_timeout(config.backend_timeout);
        info!(stores = ?tiles.store_names(), timeout_ms = config.backend_timeout.as_millis() as u64, "Tile store chain ready");

        Ok(Self {
            tiles,
            manifests: LayerManifests::new(&config.tileset_root),
            prometheus,
        })
    }

    /// Assemble state from already-built parts.
    pub fn with_stores(tiles: TieredStore, manifests: LayerManifests) -> Self {
        Self {
            tiles,
            manifests,
            prometheus: None,
        }
    }
}

/// Build one tier from its configuration.
pub async fn build_store(config: &StoreConfig) -> Result<Arc<dyn TileStore>> {
    match config {
        StoreConfig::Cache { url, ttl } => {
            let store = RedisStore::connect(url, *ttl)
                .await
                .context("Failed to initialise Redis tile cache")?;
            Ok(Arc::new(store))
        }
        StoreConfig::Directory { root } => {
            info!(root = %root.display(), "Serving tilesets from directory");
            Ok(Arc::new(FileStore::new(root.clone())))
        }
    }
}
