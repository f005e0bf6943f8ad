//! Durable on-disk tileset storage.
//!
//! Tilesets are laid out as `{root}/{tileset}/{z}/{x}/{y}.terrain`. This tier
//! is the authoritative source data and is never written at request time.

use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use terrain_common::{
    validate_tileset, TerrainError, TerrainResult, Tile, TileCoord, TILE_EXTENSION,
};

use crate::store::TileStore;

/// Tile store reading from a directory of tilesets.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of a tile on disk.
    pub fn tile_path(&self, tileset: &str, coord: &TileCoord) -> TerrainResult<PathBuf> {
        Ok(tileset_dir(&self.root, tileset)?
            .join(coord.z.to_string())
            .join(coord.x.to_string())
            .join(format!("{}.{}", coord.y, TILE_EXTENSION)))
    }
}

/// Resolve a tileset directory under `root`.
pub(crate) fn tileset_dir(root: &Path, tileset: &str) -> TerrainResult<PathBuf> {
    validate_tileset(tileset)?;
    Ok(root.join(tileset))
}

#[async_trait]
impl TileStore for FileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    #[instrument(skip(self), fields(tileset = %tileset, coord = %coord))]
    async fn load(&self, tileset: &str, coord: TileCoord) -> TerrainResult<Option<Bytes>> {
        let path = self.tile_path(tileset, &coord)?;

        match tokio::fs::read(&path).await {
            Ok(body) => {
                debug!(path = %path.display(), size = body.len(), "Loaded tile from disk");
                Ok(Some(Bytes::from(body)))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TerrainError::backend(
                self.name(),
                format!("Failed to read {}/{}: {}", tileset, coord, e),
            )),
        }
    }

    async fn save(&self, tileset: &str, tile: &Tile) -> TerrainResult<()> {
        debug!(tileset = %tileset, coord = %tile.coord, "Skipping save to read-only file store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::TilesetFixture;

    #[test]
    fn test_tile_path_layout() {
        let store = FileStore::new("/data/tilesets");
        let path = store.tile_path("world", &TileCoord::new(3, 5, 9)).unwrap();
        assert_eq!(path, PathBuf::from("/data/tilesets/world/3/5/9.terrain"));
    }

    #[test]
    fn test_tile_path_rejects_escaping_tilesets() {
        let store = FileStore::new("/data/tilesets");
        for name in ["", ".", "..", "../etc", "a/b", "a\\b"] {
            assert!(matches!(
                store.tile_path(name, &TileCoord::new(0, 0, 0)),
                Err(TerrainError::InvalidTileset(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_load_existing_tile() {
        let fixture = TilesetFixture::new();
        fixture.write_tile("world", 3, 5, 9, b"tile-bytes");

        let store = FileStore::new(fixture.root());
        let data = store
            .load("world", TileCoord::new(3, 5, 9))
            .await
            .unwrap();
        assert_eq!(data, Some(Bytes::from_static(b"tile-bytes")));
    }

    #[tokio::test]
    async fn test_load_missing_tile_is_not_an_error() {
        let fixture = TilesetFixture::new();
        fixture.create_tileset("world");

        let store = FileStore::new(fixture.root());
        assert_eq!(store.load("world", TileCoord::new(1, 1, 1)).await.unwrap(), None);
        assert_eq!(store.load("absent", TileCoord::new(0, 0, 0)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_load_unreadable_path_is_backend_error() {
        let fixture = TilesetFixture::new();
        // A directory where the tile file should be makes the read fail with
        // something other than NotFound.
        fixture.create_dir("world/3/5/9.terrain");

        let store = FileStore::new(fixture.root());
        let err = store
            .load("world", TileCoord::new(3, 5, 9))
            .await
            .unwrap_err();
        assert!(matches!(err, TerrainError::Backend { store: "file", .. }));
    }

    #[tokio::test]
    async fn test_save_is_a_no_op() {
        let fixture = TilesetFixture::new();
        fixture.write_tile("world", 3, 5, 9, b"original");
        let store = FileStore::new(fixture.root());

        let coord = TileCoord::new(3, 5, 9);
        store.save("world", &Tile::new(coord, vec![1u8])).await.unwrap();
        store.save("world", &Tile::new(coord, vec![2u8, 3])).await.unwrap();
        store
            .save("world", &Tile::new(TileCoord::new(4, 0, 0), vec![4u8]))
            .await
            .unwrap();

        assert_eq!(
            store.load("world", coord).await.unwrap(),
            Some(Bytes::from_static(b"original"))
        );
        assert!(!fixture.root().join("world/4").exists());
    }
}
