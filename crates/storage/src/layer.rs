//! Tileset `layer.json` manifests.
//!
//! A manifest stored at `{root}/{tileset}/layer.json` is served as is. A
//! tileset directory without one gets a default heightmap manifest.

use bytes::Bytes;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, instrument};

use terrain_common::{TerrainError, TerrainResult, TILE_EXTENSION};

use crate::file_store::tileset_dir;

/// File name of a tileset manifest.
pub const MANIFEST_FILE: &str = "layer.json";

/// A manifest document, either read from disk or synthesized.
#[derive(Debug, Clone, PartialEq)]
pub enum Manifest {
    Stored(Bytes),
    Default(LayerJson),
}

impl Manifest {
    /// JSON body to send to clients.
    pub fn to_bytes(&self) -> TerrainResult<Bytes> {
        match self {
            Manifest::Stored(body) => Ok(body.clone()),
            Manifest::Default(layer) => serde_json::to_vec_pretty(layer)
                .map(Bytes::from)
                .map_err(|e| TerrainError::Internal(format!("JSON error: {}", e))),
        }
    }
}

/// Minimal TileJSON document describing a heightmap tileset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerJson {
    pub tilejson: String,
    pub format: String,
    pub version: String,
    pub scheme: String,
    pub tiles: Vec<String>,
}

impl Default for LayerJson {
    fn default() -> Self {
        Self {
            tilejson: "2.1.0".to_string(),
            format: "heightmap-1.0".to_string(),
            version: "1.0.0".to_string(),
            scheme: "tms".to_string(),
            tiles: vec![format!("{{z}}/{{x}}/{{y}}.{}", TILE_EXTENSION)],
        }
    }
}

/// Manifest lookup over the tileset root directory.
#[derive(Debug, Clone)]
pub struct LayerManifests {
    root: PathBuf,
}

impl LayerManifests {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load the manifest for a tileset.
    #[instrument(skip(self), fields(tileset = %tileset))]
    pub async fn load(&self, tileset: &str) -> TerrainResult<Manifest> {
        let dir = tileset_dir(&self.root, tileset)?;
        let path = dir.join(MANIFEST_FILE);

        match tokio::fs::read(&path).await {
            Ok(body) => return Ok(Manifest::Stored(Bytes::from(body))),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(TerrainError::backend(
                    "file",
                    format!("Failed to read {} manifest: {}", tileset, e),
                ))
            }
        }

        match tokio::fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => {
                debug!("No manifest on disk, using default");
                Ok(Manifest::Default(LayerJson::default()))
            }
            Ok(_) => Err(TerrainError::TilesetNotFound(tileset.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(TerrainError::TilesetNotFound(tileset.to_string()))
            }
            Err(e) => Err(TerrainError::backend(
                "file",
                format!("Failed to stat tileset {}: {}", tileset, e),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::TilesetFixture;

    #[tokio::test]
    async fn test_stored_manifest_is_served_verbatim() {
        let fixture = TilesetFixture::new();
        let body = r#"{"tilejson":"2.1.0","format":"quantized-mesh-1.0"}"#;
        fixture.write_manifest("world", body);

        let manifests = LayerManifests::new(fixture.root());
        let manifest = manifests.load("world").await.unwrap();
        assert_eq!(manifest, Manifest::Stored(Bytes::from(body)));
        assert_eq!(manifest.to_bytes().unwrap(), Bytes::from(body));
    }

    #[tokio::test]
    async fn test_default_manifest_for_tileset_without_one() {
        let fixture = TilesetFixture::new();
        fixture.create_tileset("world");

        let manifests = LayerManifests::new(fixture.root());
        let manifest = manifests.load("world").await.unwrap();
        assert_eq!(manifest, Manifest::Default(LayerJson::default()));

        let json: serde_json::Value = serde_json::from_slice(&manifest.to_bytes().unwrap()).unwrap();
        assert_eq!(json["tilejson"], "2.1.0");
        assert_eq!(json["format"], "heightmap-1.0");
        assert_eq!(json["version"], "1.0.0");
        assert_eq!(json["scheme"], "tms");
        assert_eq!(json["tiles"][0], "{z}/{x}/{y}.terrain");
    }

    #[tokio::test]
    async fn test_missing_tileset_is_not_found() {
        let fixture = TilesetFixture::new();

        let manifests = LayerManifests::new(fixture.root());
        assert!(matches!(
            manifests.load("absent").await,
            Err(TerrainError::TilesetNotFound(name)) if name == "absent"
        ));
    }

    #[tokio::test]
    async fn test_escaping_tileset_is_rejected() {
        let fixture = TilesetFixture::new();

        let manifests = LayerManifests::new(fixture.root());
        assert!(matches!(
            manifests.load("..").await,
            Err(TerrainError::InvalidTileset(_))
        ));
    }
}
