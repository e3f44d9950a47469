//! Tile definitions
//!
//! The four cell kinds a generated floor is made of.

use serde::{Deserialize, Serialize};

/// Types of tiles on a floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileType {
    #[default]
    Wall,
    Corridor,
    RoomFloor,
    Lift,
}

impl TileType {
    /// Corridor, room floor and the lift can be stood on
    pub fn is_walkable(&self) -> bool {
        matches!(self, TileType::Corridor | TileType::RoomFloor | TileType::Lift)
    }

    /// Plain floor: walkable but not the lift
    pub fn is_floor(&self) -> bool {
        matches!(self, TileType::Corridor | TileType::RoomFloor)
    }

    pub fn glyph(&self) -> char {
        match self {
            TileType::Wall => '#',
            TileType::Corridor => '.',
            TileType::RoomFloor => ',',
            TileType::Lift => 'L',
        }
    }

    pub fn fg_color(&self) -> (u8, u8, u8) {
        match self {
            TileType::Wall => (130, 110, 90),
            TileType::Corridor => (110, 110, 110),
            TileType::RoomFloor => (170, 150, 110),
            TileType::Lift => (100, 200, 255), // Cyan so it stands out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walkability() {
        assert!(!TileType::Wall.is_walkable());
        assert!(TileType::Corridor.is_walkable());
        assert!(TileType::RoomFloor.is_walkable());
        assert!(TileType::Lift.is_walkable());
        assert!(!TileType::Lift.is_floor());
    }

    #[test]
    fn test_default_is_wall() {
        assert_eq!(TileType::default(), TileType::Wall);
    }
}
