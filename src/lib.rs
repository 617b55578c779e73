//! Procedural terrain maps and island detection
//!
//! Re-exports modules for use by the binary and tests.

pub mod ascii;
pub mod color;
pub mod error;
pub mod export;
pub mod generator;
pub mod islands;
pub mod map;
pub mod tilemap;

pub use color::Color;
pub use error::{MapError, Result};
pub use generator::{generate, GeneratorParams, MapGenerator};
pub use islands::{island_stats, Island, IslandId, IslandStats, Islands};
pub use map::{Coordinates, Map, Tile, TileType};
