//! Blank terrain tile served in place of missing root tiles.
//!
//! Clients need both zoom 0 tiles before they will request anything deeper,
//! so a tileset covering only part of the globe still has to answer for them.

use bytes::Bytes;
use flate2::read::GzDecoder;
use once_cell::sync::Lazy;
use std::io::Read;

use terrain_common::{TerrainError, TerrainResult};

/// Gzip-compressed heightmap-1.0 tile: 65x65 zero heights, no children, no water.
static BLANK_TERRAIN: &[u8] = include_bytes!("../assets/smallterrain-blank.terrain");

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Heights grid plus the child mask byte; the water mask is optional.
const MIN_HEIGHTMAP_LEN: usize = 65 * 65 * 2 + 1;

static BLANK_TILE: Lazy<Result<Bytes, String>> = Lazy::new(|| validate(BLANK_TERRAIN));

/// The embedded blank tile, exactly as it goes on the wire.
pub fn blank_tile() -> TerrainResult<Bytes> {
    (*BLANK_TILE)
        .clone()
        .map_err(TerrainError::PlaceholderUnavailable)
}

fn validate(asset: &'static [u8]) -> Result<Bytes, String> {
    if !asset.starts_with(&GZIP_MAGIC) {
        return Err("asset is not gzip compressed".to_string());
    }

    let mut heightmap = Vec::with_capacity(MIN_HEIGHTMAP_LEN + 1);
    GzDecoder::new(asset)
        .read_to_end(&mut heightmap)
        .map_err(|e| format!("asset failed to decompress: {}", e))?;

    if heightmap.len() < MIN_HEIGHTMAP_LEN {
        return Err(format!(
            "asset holds {} bytes, expected at least {}",
            heightmap.len(),
            MIN_HEIGHTMAP_LEN
        ));
    }

    Ok(Bytes::from_static(asset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_tile_is_served_compressed() {
        let tile = blank_tile().unwrap();
        assert!(tile.starts_with(&GZIP_MAGIC));
        assert_eq!(tile.as_ref(), BLANK_TERRAIN);
    }

    #[test]
    fn test_validate_rejects_uncompressed_asset() {
        assert!(validate(b"").is_err());
        assert!(validate(&[0u8; 8452]).is_err());
    }

    #[test]
    fn test_validate_rejects_truncated_asset() {
        assert!(validate(&BLANK_TERRAIN[..BLANK_TERRAIN.len() / 2]).is_err());
    }
}
