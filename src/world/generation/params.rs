//! Generation parameters
//!
//! Every knob of the floor generator, with defaults. Loaded from RON by
//! `data::loader`, so every field falls back to its default when omitted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::rooms::RoomType;
use super::GenerationError;

/// Tunables for one floor generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Target room count
    pub num_rooms: u32,
    /// Smallest room side, in tiles
    pub min_room_size: i32,
    /// Largest room side, in tiles
    pub max_room_size: i32,
    /// Rejection-sampling budget for room placement
    pub max_room_attempts: u32,
    /// Empty margin kept between rooms
    pub room_buffer: i32,
    /// Relative chance of each room category (0 = never)
    pub room_weights: BTreeMap<RoomType, u32>,
    /// Chance the gym category is enabled on the lowest floor
    pub gym_chance: f64,
    /// Books to scatter per floor
    pub book_count: u32,
    /// Rejection-sampling budget for book placement
    pub max_book_attempts: u32,
    /// Ring radius used when looking for a spawn tile
    pub spawn_search_radius: i32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            num_rooms: 12,
            min_room_size: 4,
            max_room_size: 9,
            max_room_attempts: 200,
            room_buffer: 2,
            room_weights: default_room_weights(),
            gym_chance: 0.5,
            book_count: 8,
            max_book_attempts: 400,
            spawn_search_radius: 6,
        }
    }
}

/// Default category weights
pub fn default_room_weights() -> BTreeMap<RoomType, u32> {
    BTreeMap::from([
        (RoomType::Classroom, 30),
        (RoomType::Office, 15),
        (RoomType::Library, 10),
        (RoomType::Lab, 12),
        (RoomType::Storage, 8),
        (RoomType::Utility, 5),
        (RoomType::Gym, 10),
    ])
}

impl GenerationParams {
    /// Configured weight for a category, 0 if absent
    pub fn weight_of(&self, room_type: RoomType) -> u32 {
        if room_type == RoomType::LiftAlcove {
            return 0;
        }
        self.room_weights.get(&room_type).copied().unwrap_or(0)
    }

    /// Reject parameter sets the generator cannot work with
    pub fn validate(&self) -> Result<(), GenerationError> {
        let invalid = |msg: String| Err(GenerationError::InvalidParams(msg));

        if self.num_rooms == 0 {
            return invalid("num_rooms must be at least 1".into());
        }
        // Rooms need a non-empty interior for the lift
        if self.min_room_size < 3 {
            return invalid(format!("min_room_size {} is below 3", self.min_room_size));
        }
        if self.max_room_size < self.min_room_size {
            return invalid(format!(
                "max_room_size {} is smaller than min_room_size {}",
                self.max_room_size, self.min_room_size
            ));
        }
        if self.room_buffer < 0 {
            return invalid(format!("room_buffer {} is negative", self.room_buffer));
        }
        if !(0.0..=1.0).contains(&self.gym_chance) {
            return invalid(format!("gym_chance {} is not a probability", self.gym_chance));
        }
        if self.spawn_search_radius < 0 {
            return invalid(format!("spawn_search_radius {} is negative", self.spawn_search_radius));
        }

        let has_regular_category = RoomType::PLACEABLE
            .iter()
            .filter(|t| **t != RoomType::Gym)
            .any(|t| self.weight_of(*t) > 0);
        if !has_regular_category {
            return invalid("every non-gym room weight is zero".into());
        }

        Ok(())
    }
}
