//! World module
//!
//! Contains the floor grid, tiles, the nearest safe tile search and
//! procedural generation.

pub mod map;
pub mod tile;
pub mod nearest;
pub mod generation;

pub use map::{Map, Position, CARDINALS, TILE_SIZE};
pub use tile::TileType;
pub use nearest::{find_nearest_tile, find_nearest_walkable_tile, TileQuery};
pub use generation::{generate_floor, Floor, FloorRequest, GenerationError, GenerationParams};
