//! Shared test utilities for the terrain workspace.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then build a tileset root in your tests:
//!
//! ```ignore
//! use test_utils::TilesetFixture;
//!
//! let fixture = TilesetFixture::new();
//! fixture.write_tile("world", 0, 0, 0, test_utils::SAMPLE_TILE);
//! ```

pub mod fixtures;

pub use fixtures::*;
