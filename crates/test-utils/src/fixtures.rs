//! On-disk tileset fixtures.
//!
//! Builds a throwaway tileset root laid out the way the file store and
//! manifest lookup expect: `{root}/{tileset}/{z}/{x}/{y}.terrain` and
//! `{root}/{tileset}/layer.json`.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A sample gzip-looking payload for tests that never decompress it.
pub const SAMPLE_TILE: &[u8] = b"\x1f\x8b\x08\x00sample-terrain-tile";

/// Temporary tileset root, removed on drop.
pub struct TilesetFixture {
    dir: TempDir,
}

impl TilesetFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Root directory holding the tilesets.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Create an empty tileset directory.
    pub fn create_tileset(&self, tileset: &str) -> PathBuf {
        self.create_dir(tileset)
    }

    /// Create an arbitrary directory below the root.
    pub fn create_dir(&self, relative: &str) -> PathBuf {
        let path = self.root().join(relative);
        fs::create_dir_all(&path).expect("Failed to create fixture directory");
        path
    }

    /// Write a tile file.
    pub fn write_tile(&self, tileset: &str, z: u64, x: u64, y: u64, data: &[u8]) -> PathBuf {
        let dir = self.create_dir(&format!("{}/{}/{}", tileset, z, x));
        let path = dir.join(format!("{}.terrain", y));
        fs::write(&path, data).expect("Failed to write fixture tile");
        path
    }

    /// Write a tileset's `layer.json`.
    pub fn write_manifest(&self, tileset: &str, body: &str) -> PathBuf {
        let path = self.create_tileset(tileset).join("layer.json");
        fs::write(&path, body).expect("Failed to write fixture manifest");
        path
    }
}

impl Default for TilesetFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_tile_layout() {
        let fixture = TilesetFixture::new();
        let path = fixture.write_tile("world", 3, 5, 9, SAMPLE_TILE);

        assert_eq!(path, fixture.root().join("world/3/5/9.terrain"));
        assert_eq!(fs::read(path).unwrap(), SAMPLE_TILE);
    }

    #[test]
    fn test_write_manifest_creates_tileset() {
        let fixture = TilesetFixture::new();
        fixture.write_manifest("world", "{}");

        assert!(fixture.root().join("world").is_dir());
        assert_eq!(
            fs::read_to_string(fixture.root().join("world/layer.json")).unwrap(),
            "{}"
        );
    }
}
