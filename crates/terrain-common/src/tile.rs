//! Terrain tile addressing.
//!
//! Tiles live in a TMS quadtree pyramid split at the anti-meridian, so zoom
//! level 0 holds two tiles: (0, 0, 0) and (0, 1, 0).

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{TerrainError, TerrainResult};

/// File extension used for terrain tiles on disk and in URLs.
pub const TILE_EXTENSION: &str = "terrain";

/// A tile coordinate (z/x/y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level
    pub z: u64,
    /// Column (x)
    pub x: u64,
    /// Row (y)
    pub y: u64,
}

impl TileCoord {
    pub fn new(z: u64, x: u64, y: u64) -> Self {
        Self { z, x, y }
    }

    /// Parse a coordinate from its textual components.
    ///
    /// Each component must be a base-10 non-negative integer. No upper bound
    /// is enforced here; backends decide what exists.
    pub fn parse(z: &str, x: &str, y: &str) -> TerrainResult<Self> {
        Ok(Self {
            z: parse_component("z", z)?,
            x: parse_component("x", x)?,
            y: parse_component("y", y)?,
        })
    }

    /// True for the two top-level tiles of the pyramid.
    pub fn is_root(&self) -> bool {
        self.z == 0 && self.y == 0 && (self.x == 0 || self.x == 1)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

fn parse_component(component: &'static str, value: &str) -> TerrainResult<u64> {
    // u64::from_str accepts a leading '+', which is not a decimal digit.
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TerrainError::MalformedCoordinate {
            component,
            value: value.to_string(),
        });
    }

    value
        .parse::<u64>()
        .map_err(|_| TerrainError::MalformedCoordinate {
            component,
            value: value.to_string(),
        })
}

/// Check a tileset name taken from a request path.
///
/// Names arrive percent-decoded, so anything that could step outside the
/// tileset root is refused. Other names are opaque.
pub fn validate_tileset(tileset: &str) -> TerrainResult<()> {
    if tileset.is_empty()
        || tileset == "."
        || tileset == ".."
        || tileset.contains(&['/', '\\', '\0'][..])
    {
        return Err(TerrainError::InvalidTileset(tileset.to_string()));
    }
    Ok(())
}

/// A terrain tile: its coordinate plus the gzip-compressed payload as served
/// on the wire. The payload is never inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub coord: TileCoord,
    pub data: Bytes,
}

impl Tile {
    pub fn new(coord: TileCoord, data: impl Into<Bytes>) -> Self {
        Self {
            coord,
            data: data.into(),
        }
    }

    /// File name clients should save the tile under.
    pub fn filename(&self) -> String {
        format!("{}.{}", self.coord.y, TILE_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for (z, x, y) in [("0", "0", "0"), ("3", "5", "9"), ("21", "2097151", "1048575")] {
            let coord = TileCoord::parse(z, x, y).unwrap();
            assert_eq!(coord.to_string(), format!("{}/{}/{}", z, x, y));
        }

        let big = TileCoord::parse("0", "18446744073709551615", "0").unwrap();
        assert_eq!(big.x, u64::MAX);
    }

    #[test]
    fn test_parse_rejects_malformed_components() {
        let cases = [
            ("a", "0", "0", "z"),
            ("0", "-1", "0", "x"),
            ("0", "0", "1.5", "y"),
            ("0", "+1", "0", "x"),
            ("", "0", "0", "z"),
            ("0", "0", "18446744073709551616", "y"),
        ];

        for (z, x, y, expected) in cases {
            match TileCoord::parse(z, x, y) {
                Err(TerrainError::MalformedCoordinate { component, .. }) => {
                    assert_eq!(component, expected, "input {}/{}/{}", z, x, y)
                }
                other => panic!("expected malformed coordinate, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_root_classification() {
        assert!(TileCoord::new(0, 0, 0).is_root());
        assert!(TileCoord::new(0, 1, 0).is_root());

        assert!(!TileCoord::new(0, 0, 1).is_root());
        assert!(!TileCoord::new(0, 2, 0).is_root());
        assert!(!TileCoord::new(1, 0, 0).is_root());
        assert!(!TileCoord::new(1, 1, 1).is_root());
    }

    #[test]
    fn test_validate_tileset() {
        for name in ["world", "world-2024", ".hidden", "a..b"] {
            assert!(validate_tileset(name).is_ok(), "{}", name);
        }
        for name in ["", ".", "..", "../etc", "a/b", "a\\b", "a\0b"] {
            assert!(
                matches!(validate_tileset(name), Err(TerrainError::InvalidTileset(_))),
                "{:?}",
                name
            );
        }
    }

    #[test]
    fn test_tile_filename() {
        let tile = Tile::new(TileCoord::new(3, 5, 9), vec![1u8, 2, 3]);
        assert_eq!(tile.filename(), "9.terrain");
    }
}
