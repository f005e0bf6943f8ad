//! The storage tier capability shared by every tile backend.

use async_trait::async_trait;
use bytes::Bytes;

use terrain_common::{TerrainResult, Tile, TileCoord};

/// A backend that can load and save terrain tiles, scoped by tileset.
///
/// `load` distinguishes an absent tile (`Ok(None)`) from a backend fault
/// (`Err`). Only the former lets a tier chain fall through to the next tier.
#[async_trait]
pub trait TileStore: Send + Sync {
    /// Short label used in logs, metrics and error messages.
    fn name(&self) -> &'static str;

    /// Load a tile payload.
    async fn load(&self, tileset: &str, coord: TileCoord) -> TerrainResult<Option<Bytes>>;

    /// Save a tile payload. Best effort: callers on the read path must not
    /// fail a request because this did.
    async fn save(&self, tileset: &str, tile: &Tile) -> TerrainResult<()>;
}
