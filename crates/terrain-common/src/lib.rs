//! Common types and utilities shared across the terrain tile services.

pub mod error;
pub mod tile;

pub use error::{TerrainError, TerrainResult};
pub use tile::{validate_tileset, Tile, TileCoord, TILE_EXTENSION};
