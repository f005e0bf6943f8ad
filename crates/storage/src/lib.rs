//! Storage abstractions for the terrain tile services.
//!
//! Provides:
//! - The `TileStore` tier capability
//! - On-disk tileset storage (authoritative, read only)
//! - Redis for caching tiles
//! - `TieredStore`, which chains tiers with read-through backfill
//! - Tileset manifest lookup

pub mod cache;
pub mod file_store;
pub mod layer;
pub mod placeholder;
pub mod store;
pub mod tiered;

pub use cache::{CacheKey, RedisStore};
pub use file_store::FileStore;
pub use layer::{LayerJson, LayerManifests, Manifest};
pub use store::TileStore;
pub use tiered::{BackfillReport, Origin, Resolution, Resolved, TieredStore};
