//! Room placement
//!
//! Scatters non-overlapping rectangular rooms across the grid by rejection
//! sampling, each tagged with a category drawn from configured weights.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::params::GenerationParams;
use super::GenerationError;
use crate::world::{Map, Position, TileType};

/// Room categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoomType {
    Classroom,
    Office,
    Library,
    Lab,
    Storage,
    Utility,
    /// Only ever drawn on the lowest floor
    Gym,
    /// Synthesized around a lift that landed outside every room
    LiftAlcove,
}

impl RoomType {
    /// Categories that room placement may draw
    pub const PLACEABLE: [RoomType; 7] = [
        RoomType::Classroom,
        RoomType::Office,
        RoomType::Library,
        RoomType::Lab,
        RoomType::Storage,
        RoomType::Utility,
        RoomType::Gym,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RoomType::Classroom => "Classroom",
            RoomType::Office => "Office",
            RoomType::Library => "Library",
            RoomType::Lab => "Lab",
            RoomType::Storage => "Storage",
            RoomType::Utility => "Utility",
            RoomType::Gym => "Gym",
            RoomType::LiftAlcove => "Lift Alcove",
        }
    }
}

/// A rectangular room
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Room {
    pub id: u32,
    /// Left column
    pub x: i32,
    /// Top row
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub room_type: RoomType,
    pub center: Position,
}

impl Room {
    pub fn new(id: u32, x: i32, y: i32, width: i32, height: i32, room_type: RoomType) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
            room_type,
            center: Position::new(x + width / 2, y + height / 2),
        }
    }

    /// Is (x, y) inside the room rectangle?
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Overlap test with `self` grown by `buffer` tiles on every side
    pub fn intersects_with_buffer(&self, other: &Room, buffer: i32) -> bool {
        self.x - buffer < other.x + other.width
            && self.x + self.width + buffer > other.x
            && self.y - buffer < other.y + other.height
            && self.y + self.height + buffer > other.y
    }

    /// Tiles of the rectangle minus its 1-tile rim
    pub fn interior(&self) -> impl Iterator<Item = Position> + '_ {
        (self.y + 1..self.y + self.height - 1)
            .flat_map(move |y| (self.x + 1..self.x + self.width - 1).map(move |x| Position::new(x, y)))
    }

    /// Every tile of the rectangle
    pub fn tiles(&self) -> impl Iterator<Item = Position> + '_ {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| Position::new(x, y)))
    }
}

/// Weighted room category draw for one floor
struct RoomTypePicker {
    categories: Vec<RoomType>,
    dist: WeightedIndex<u32>,
}

impl RoomTypePicker {
    fn new(params: &GenerationParams, include_gym: bool) -> Result<Self, GenerationError> {
        let (categories, weights): (Vec<RoomType>, Vec<u32>) = RoomType::PLACEABLE
            .iter()
            .filter(|room_type| include_gym || **room_type != RoomType::Gym)
            .map(|room_type| (*room_type, params.weight_of(*room_type)))
            .filter(|(_, weight)| *weight > 0)
            .unzip();

        let dist = WeightedIndex::new(&weights)
            .map_err(|e| GenerationError::InvalidParams(format!("room weights: {}", e)))?;
        Ok(Self { categories, dist })
    }

    fn pick(&self, rng: &mut impl Rng) -> RoomType {
        self.categories[self.dist.sample(rng)]
    }
}

/// Place up to `params.num_rooms` rooms and paint them as room floor
///
/// Returns however many rooms fit within the attempt budget, possibly none.
pub fn place_rooms(
    rng: &mut impl Rng,
    map: &mut Map,
    params: &GenerationParams,
    include_gym: bool,
) -> Result<Vec<Room>, GenerationError> {
    let picker = RoomTypePicker::new(params, include_gym)?;
    let target = params.num_rooms as usize;
    let mut rooms: Vec<Room> = Vec::with_capacity(target);

    for _ in 0..params.max_room_attempts {
        if rooms.len() >= target {
            break;
        }

        let w = rng.gen_range(params.min_room_size..=params.max_room_size);
        let h = rng.gen_range(params.min_room_size..=params.max_room_size);
        // Needs at least one wall column/row on each side
        if w > map.width() - 2 || h > map.height() - 2 {
            continue;
        }
        let x = rng.gen_range(1..=map.width() - w - 1);
        let y = rng.gen_range(1..=map.height() - h - 1);

        let candidate = Room::new(rooms.len() as u32, x, y, w, h, RoomType::Classroom);
        let overlaps = rooms
            .iter()
            .any(|r| candidate.intersects_with_buffer(r, params.room_buffer));
        if overlaps {
            continue;
        }

        let room = Room {
            room_type: picker.pick(rng),
            ..candidate
        };
        carve_room(map, &room);
        rooms.push(room);
    }

    if rooms.len() < target {
        log::warn!(
            "Placed {} of {} rooms after {} attempts",
            rooms.len(),
            target,
            params.max_room_attempts
        );
    }

    Ok(rooms)
}

/// Paint a room's whole rectangle as room floor
pub(crate) fn carve_room(map: &mut Map, room: &Room) {
    for pos in room.tiles() {
        map.set_tile(pos.x, pos.y, TileType::RoomFloor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_buffer_intersection() {
        let a = Room::new(0, 2, 2, 4, 4, RoomType::Office);
        // Touching edges overlap once the buffer is applied
        let b = Room::new(1, 7, 2, 4, 4, RoomType::Office);
        assert!(!a.intersects_with_buffer(&b, 0));
        assert!(a.intersects_with_buffer(&b, 2));

        let far = Room::new(2, 9, 2, 4, 4, RoomType::Office);
        assert!(!a.intersects_with_buffer(&far, 2));
    }

    #[test]
    fn test_interior_excludes_rim() {
        let room = Room::new(0, 3, 3, 4, 5, RoomType::Lab);
        let interior: Vec<_> = room.interior().collect();
        assert_eq!(interior.len(), 2 * 3);
        assert!(interior.iter().all(|p| p.x > 3 && p.x < 6 && p.y > 3 && p.y < 7));
        assert_eq!(room.center, Position::new(5, 5));
    }

    #[test]
    fn test_rooms_never_overlap() {
        let params = GenerationParams::default();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut map = Map::new(40, 30);
            let rooms = place_rooms(&mut rng, &mut map, &params, true).unwrap();
            assert!(!rooms.is_empty());
            for (i, a) in rooms.iter().enumerate() {
                assert!(a.x >= 1 && a.y >= 1);
                assert!(a.x + a.width <= 39 && a.y + a.height <= 29);
                for b in rooms.iter().skip(i + 1) {
                    assert!(!a.intersects_with_buffer(b, params.room_buffer));
                }
            }
        }
    }

    #[test]
    fn test_rooms_painted() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut map = Map::new(40, 30);
        let rooms = place_rooms(&mut rng, &mut map, &GenerationParams::default(), false).unwrap();
        for room in &rooms {
            assert!(room.tiles().all(|p| map.tile_at(p) == Some(TileType::RoomFloor)));
        }
    }

    #[test]
    fn test_zero_weight_excluded() {
        let mut params = GenerationParams::default();
        params.room_weights.clear();
        params.room_weights.insert(RoomType::Library, 1);
        params.room_weights.insert(RoomType::Gym, 100);

        let mut rng = StdRng::seed_from_u64(9);
        let mut map = Map::new(40, 30);
        let rooms = place_rooms(&mut rng, &mut map, &params, false).unwrap();
        assert!(rooms.iter().all(|r| r.room_type == RoomType::Library));
    }

    #[test]
    fn test_rooms_too_large_for_grid() {
        let mut params = GenerationParams::default();
        params.min_room_size = 8;
        params.max_room_size = 8;
        let mut rng = StdRng::seed_from_u64(1);
        let mut map = Map::new(9, 9);
        let rooms = place_rooms(&mut rng, &mut map, &params, false).unwrap();
        assert!(rooms.is_empty());
    }
}
