//! Tiered tile resolution across an ordered chain of stores.
//!
//! Stores are consulted fastest first. A hit on a slower tier is written back
//! to every faster tier that missed, so the next request for the same tile
//! stops earlier. Backfill never affects the result of the read that
//! triggered it.
//!
//! ## Miss policy
//!
//! When no tier has the tile, the two root tiles are answered with the
//! embedded blank placeholder (which is never backfilled). Any other missing
//! tile is `TileNotFound`.
//!
//! ## Faults
//!
//! A tier that fails or exceeds the backend timeout aborts the walk. Lower
//! tiers are not consulted.

use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use terrain_common::{TerrainError, TerrainResult, Tile, TileCoord};

use crate::placeholder;
use crate::store::TileStore;

/// Default per-call latency bound for a single store.
pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a resolved tile came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Loaded from the store at this index in the chain.
    Tier(usize),
    /// Synthesized blank root tile.
    Placeholder,
}

/// A tile found by [`TieredStore::lookup`].
#[derive(Debug, Clone)]
pub struct Resolved {
    pub tile: Tile,
    pub origin: Origin,
}

/// Outcome of writing a resolved tile back into faster tiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub attempted: usize,
    pub failed: usize,
}

/// A resolved tile plus the detached backfill task, if one was started.
///
/// Dropping `backfill` does not cancel it.
#[derive(Debug)]
pub struct Resolution {
    pub tile: Tile,
    pub origin: Origin,
    pub backfill: Option<JoinHandle<BackfillReport>>,
}

/// Ordered chain of tile stores, fixed for the life of the process.
#[derive(Clone)]
pub struct TieredStore {
    stores: Arc<[Arc<dyn TileStore>]>,
    backend_timeout: Duration,
}

impl TieredStore {
    /// Build a chain; `stores[0]` is consulted first.
    pub fn new(stores: Vec<Arc<dyn TileStore>>) -> Self {
        Self {
            stores: stores.into(),
            backend_timeout: DEFAULT_BACKEND_TIMEOUT,
        }
    }

    pub fn with_backend_timeout(mut self, timeout: Duration) -> Self {
        self.backend_timeout = timeout;
        self
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Store names in priority order.
    pub fn store_names(&self) -> Vec<&'static str> {
        self.stores.iter().map(|s| s.name()).collect()
    }

    /// Walk the chain for a tile, applying the root-tile placeholder policy.
    #[instrument(skip(self), fields(tileset = %tileset, coord = %coord))]
    pub async fn lookup(&self, tileset: &str, coord: TileCoord) -> TerrainResult<Resolved> {
        for (tier, store) in self.stores.iter().enumerate() {
            let loaded = bounded(store.name(), self.backend_timeout, store.load(tileset, coord))
                .await
                .map_err(|e| {
                    warn!(store = store.name(), tier = tier, error = %e, "Store lookup failed");
                    e
                })?;

            match loaded {
                Some(data) => {
                    counter!("terrain_store_hits_total", "store" => store.name()).increment(1);
                    debug!(store = store.name(), tier = tier, size = data.len(), "Tile found");
                    return Ok(Resolved {
                        tile: Tile::new(coord, data),
                        origin: Origin::Tier(tier),
                    });
                }
                None => {
                    counter!("terrain_store_misses_total", "store" => store.name()).increment(1);
                }
            }
        }

        if coord.is_root() {
            let data = placeholder::blank_tile()?;
            counter!("terrain_placeholder_served_total").increment(1);
            info!("Serving blank placeholder for missing root tile");
            return Ok(Resolved {
                tile: Tile::new(coord, data),
                origin: Origin::Placeholder,
            });
        }

        debug!("Tile not found in any store");
        Err(TerrainError::TileNotFound {
            tileset: tileset.to_string(),
            coord,
        })
    }

    /// Save a tile into every tier ahead of the one that answered.
    ///
    /// Failures are logged and counted, never returned.
    pub async fn backfill(&self, tileset: &str, resolved: &Resolved) -> BackfillReport {
        match resolved.origin {
            Origin::Tier(tier) if tier > 0 => {
                backfill_tiers(
                    &self.stores[..tier],
                    self.backend_timeout,
                    tileset,
                    &resolved.tile,
                )
                .await
            }
            _ => BackfillReport::default(),
        }
    }

    /// Look up a tile and start backfill in the background.
    ///
    /// The returned tile can be sent immediately; backfill runs to completion
    /// on its own task whether or not the caller waits for it.
    pub async fn resolve(&self, tileset: &str, coord: TileCoord) -> TerrainResult<Resolution> {
        let resolved = self.lookup(tileset, coord).await?;

        let backfill = match resolved.origin {
            Origin::Tier(tier) if tier > 0 => {
                let stores = Arc::clone(&self.stores);
                let timeout = self.backend_timeout;
                let tileset = tileset.to_string();
                let tile = resolved.tile.clone();

                Some(tokio::spawn(async move {
                    backfill_tiers(&stores[..tier], timeout, &tileset, &tile).await
                }))
            }
            _ => None,
        };

        Ok(Resolution {
            tile: resolved.tile,
            origin: resolved.origin,
            backfill,
        })
    }
}

async fn backfill_tiers(
    stores: &[Arc<dyn TileStore>],
    timeout: Duration,
    tileset: &str,
    tile: &Tile,
) -> BackfillReport {
    let mut report = BackfillReport::default();

    for store in stores {
        report.attempted += 1;
        if let Err(e) = bounded(store.name(), timeout, store.save(tileset, tile)).await {
            report.failed += 1;
            counter!("terrain_backfill_failures_total", "store" => store.name()).increment(1);
            warn!(
                store = store.name(),
                tileset = %tileset,
                coord = %tile.coord,
                error = %e,
                "Failed to backfill tile"
            );
        }
    }

    report
}

/// Run a store call under the backend timeout.
async fn bounded<T>(
    store: &'static str,
    timeout: Duration,
    call: impl std::future::Future<Output = TerrainResult<T>>,
) -> TerrainResult<T> {
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(TerrainError::Timeout {
            store,
            after_ms: timeout.as_millis() as u64,
        }),
    }
}
