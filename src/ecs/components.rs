//! ECS Components
//!
//! Components for the entities living on the current floor.

use serde::{Deserialize, Serialize};

/// Position in world units (a tile is `TILE_SIZE` across)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
}

impl WorldPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to a world coordinate
    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        ((self.x - x).powi(2) + (self.y - y).powi(2)).sqrt()
    }
}

impl From<(f32, f32)> for WorldPos {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Marker for the player-controlled avatar
#[derive(Debug, Clone, Copy, Default)]
pub struct Player;

/// Books claimed so far this session
#[derive(Debug, Clone, Copy, Default)]
pub struct BooksCollected(pub u32);
