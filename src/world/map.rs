//! Map data structure
//!
//! The 2D grid representing one generated floor, plus the tile/world
//! coordinate conversions used by movement and rendering.

use super::tile::TileType;
use serde::{Deserialize, Serialize};

/// Side length of one tile in world units
pub const TILE_SIZE: f32 = 32.0;

/// North, east, south, west
pub const CARDINALS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// A tile coordinate (`x` = column, `y` = row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance (allows diagonal)
    pub fn chebyshev_distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Squared euclidean distance
    pub fn distance_squared(&self, other: &Position) -> i32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// World-space center of this tile
    pub fn world_center(&self) -> (f32, f32) {
        (
            (self.x as f32 + 0.5) * TILE_SIZE,
            (self.y as f32 + 0.5) * TILE_SIZE,
        )
    }
}

/// One floor's tile grid
///
/// Only the generator mutates a map. Everything outside the crate sees it
/// through the read accessors.
#[derive(Debug, Clone, Serialize)]
pub struct Map {
    width: i32,
    height: i32,
    tiles: Vec<TileType>,
}

impl Map {
    /// Create a new map filled with walls
    pub fn new(width: i32, height: i32) -> Self {
        let tiles = vec![TileType::Wall; (width.max(0) * height.max(0)) as usize];
        Self { width, height, tiles }
    }

    /// Number of columns
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Row-major tile storage
    pub fn tiles(&self) -> &[TileType] {
        &self.tiles
    }

    /// Convert 2D coordinates to 1D index
    #[inline]
    pub fn xy_to_idx(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    /// Convert 1D index to 2D coordinates
    #[inline]
    pub fn idx_to_xy(&self, idx: usize) -> (i32, i32) {
        let idx = idx as i32;
        (idx % self.width, idx / self.width)
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Inside the map and not on the outermost ring
    #[inline]
    pub fn is_interior(&self, x: i32, y: i32) -> bool {
        x > 0 && x < self.width - 1 && y > 0 && y < self.height - 1
    }

    /// Get tile at position
    pub fn tile(&self, x: i32, y: i32) -> Option<TileType> {
        if self.in_bounds(x, y) {
            Some(self.tiles[self.xy_to_idx(x, y)])
        } else {
            None
        }
    }

    pub fn tile_at(&self, pos: Position) -> Option<TileType> {
        self.tile(pos.x, pos.y)
    }

    /// Set tile type at position
    pub(crate) fn set_tile(&mut self, x: i32, y: i32, tile_type: TileType) {
        if self.in_bounds(x, y) {
            let idx = self.xy_to_idx(x, y);
            self.tiles[idx] = tile_type;
        }
    }

    /// Turn a wall into `tile_type`, leaving anything else alone
    pub(crate) fn carve(&mut self, x: i32, y: i32, tile_type: TileType) {
        if self.tile(x, y) == Some(TileType::Wall) {
            self.set_tile(x, y, tile_type);
        }
    }

    /// Check if a position is walkable
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).map_or(false, |t| t.is_walkable())
    }

    /// Tile under a world coordinate, if it is on the map
    pub fn world_to_tile(&self, world_x: f32, world_y: f32) -> Option<Position> {
        if !world_x.is_finite() || !world_y.is_finite() || world_x < 0.0 || world_y < 0.0 {
            return None;
        }
        let x = (world_x / TILE_SIZE).floor() as i32;
        let y = (world_y / TILE_SIZE).floor() as i32;
        self.in_bounds(x, y).then(|| Position::new(x, y))
    }

    /// Walkability of the tile under a world coordinate
    pub fn is_walkable_world(&self, world_x: f32, world_y: f32) -> bool {
        self.world_to_tile(world_x, world_y)
            .map_or(false, |pos| self.is_walkable(pos.x, pos.y))
    }

    /// Which cardinal neighbors (N, E, S, W) are walkable
    pub fn open_sides(&self, x: i32, y: i32) -> [bool; 4] {
        CARDINALS.map(|(dx, dy)| self.is_walkable(x + dx, y + dy))
    }

    /// Count walkable cardinal neighbors
    pub fn open_neighbor_count(&self, x: i32, y: i32) -> usize {
        self.open_sides(x, y).iter().filter(|open| **open).count()
    }

    /// A 1-wide straight passage: exactly two open sides, facing each other
    pub fn is_chokepoint(&self, x: i32, y: i32) -> bool {
        match self.open_sides(x, y) {
            [true, false, true, false] | [false, true, false, true] => true,
            _ => false,
        }
    }

    /// Force the outermost ring back to walls
    pub(crate) fn seal_border(&mut self) {
        for x in 0..self.width {
            self.set_tile(x, 0, TileType::Wall);
            self.set_tile(x, self.height - 1, TileType::Wall);
        }
        for y in 0..self.height {
            self.set_tile(0, y, TileType::Wall);
            self.set_tile(self.width - 1, y, TileType::Wall);
        }
    }

    /// All positions holding the given tile type
    pub fn positions_of(&self, tile_type: TileType) -> Vec<Position> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| **tile == tile_type)
            .map(|(idx, _)| {
                let (x, y) = self.idx_to_xy(idx);
                Position::new(x, y)
            })
            .collect()
    }

    /// Get all walkable positions
    pub fn walkable_positions(&self) -> Vec<Position> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.is_walkable())
            .map(|(idx, _)| {
                let (x, y) = self.idx_to_xy(idx);
                Position::new(x, y)
            })
            .collect()
    }
}
