//! Procedural floor generation
//!
//! One call builds a complete floor: rooms, corridors, the lift, a sealed
//! border, a reachability check, books and a spawn point.

pub mod params;
pub mod rooms;
pub mod corridors;
pub mod lift;
pub mod reachability;
pub mod spawn;

pub use lift::LiftPosition;
pub use params::GenerationParams;
pub use rooms::{Room, RoomType};

use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use super::{find_nearest_walkable_tile, Map, Position};
use crate::entities::books::{place_books, Book};

/// Fatal generation failures; there is no partial floor to fall back to
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("invalid generation parameters: {0}")]
    InvalidParams(String),
    #[error("no rooms could be placed")]
    NoRooms,
    #[error("no room tile qualifies for the lift")]
    NoLiftCandidate,
    #[error("lift tile ({x}, {y}) lies outside the playable area")]
    LiftOutOfBounds { x: i32, y: i32 },
    #[error("lift tile ({x}, {y}) has no owning room")]
    LiftUnowned { x: i32, y: i32 },
    #[error("tile ({x}, {y}) cannot be connected to the lift")]
    Unreachable { x: i32, y: i32 },
    #[error("no spawn location on the floor")]
    NoSpawnLocation,
}

/// Everything needed to generate one floor
#[derive(Debug, Clone)]
pub struct FloorRequest {
    pub cols: i32,
    pub rows: i32,
    pub floor_number: i32,
    /// Lowest floor of the building; its lift location is picked fresh
    pub min_floor: i32,
    pub params: GenerationParams,
}

impl FloorRequest {
    pub fn new(cols: i32, rows: i32, floor_number: i32, min_floor: i32) -> Self {
        Self {
            cols,
            rows,
            floor_number,
            min_floor,
            params: GenerationParams::default(),
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn is_min_floor(&self) -> bool {
        self.floor_number == self.min_floor
    }

    fn validate(&self) -> Result<(), GenerationError> {
        if self.cols < 3 || self.rows < 3 {
            return Err(GenerationError::InvalidParams(format!(
                "grid {}x{} has no interior",
                self.cols, self.rows
            )));
        }
        if self.floor_number < self.min_floor {
            return Err(GenerationError::InvalidParams(format!(
                "floor {} is below the minimum floor {}",
                self.floor_number, self.min_floor
            )));
        }
        self.params.validate()
    }
}

/// A generated floor
///
/// Read-only once built. Loading another floor replaces the whole value.
#[derive(Debug, Clone, Serialize)]
pub struct Floor {
    floor_number: i32,
    map: Map,
    rooms: Vec<Room>,
    lift: LiftPosition,
    books: Vec<Book>,
    spawn: Position,
}

impl Floor {
    pub fn floor_number(&self) -> i32 {
        self.floor_number
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, id: u32) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn lift(&self) -> &LiftPosition {
        &self.lift
    }

    /// Books as generated (all uncollected)
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn spawn(&self) -> Position {
        self.spawn
    }

    /// Is the tile under this world coordinate walkable?
    pub fn is_walkable(&self, world_x: f32, world_y: f32) -> bool {
        self.map.is_walkable_world(world_x, world_y)
    }

    /// World center of the nearest open walkable tile
    pub fn find_nearest_walkable_tile(
        &self,
        world_x: f32,
        world_y: f32,
        max_radius: i32,
        exclude_lift: bool,
    ) -> Option<(f32, f32)> {
        find_nearest_walkable_tile(&self.map, world_x, world_y, max_radius, exclude_lift)
    }
}

/// Generate one floor
///
/// `carried_lift` is the lift tile recorded on an earlier floor of the same
/// session. It is ignored on the minimum floor, which always picks a fresh
/// lift location; callers store `floor.lift().tile()` for the next call.
pub fn generate_floor(
    rng: &mut impl Rng,
    request: &FloorRequest,
    carried_lift: Option<Position>,
) -> Result<Floor, GenerationError> {
    request.validate()?;
    let params = &request.params;

    let carried = if request.is_min_floor() { None } else { carried_lift };
    let include_gym = request.is_min_floor() && rng.gen_bool(params.gym_chance);

    let mut map = Map::new(request.cols, request.rows);

    let mut rooms = rooms::place_rooms(rng, &mut map, params, include_gym)?;
    if rooms.is_empty() {
        log::error!("Floor {}: no rooms could be placed", request.floor_number);
        return Err(GenerationError::NoRooms);
    }

    corridors::connect_rooms(rng, &mut map, &rooms);

    let lift = lift::place_lift(&mut map, &mut rooms, carried)?;

    map.seal_border();

    reachability::validate_and_repair(&mut map, lift.tile(), &rooms)?;

    let spawn = spawn::choose_spawn(rng, &map, &rooms, params.spawn_search_radius)?;

    let books = place_books(
        rng,
        &map,
        params.book_count,
        params.max_book_attempts,
        &[lift.tile(), spawn],
    );

    log::info!(
        "Generated floor {}: {} rooms, {} books, lift at ({}, {})",
        request.floor_number,
        rooms.len(),
        books.len(),
        lift.tile_x,
        lift.tile_y
    );

    Ok(Floor {
        floor_number: request.floor_number,
        map,
        rooms,
        lift,
        books,
        spawn,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generation::reachability::reachable_from;
    use crate::world::TileType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_floor_invariants(floor: &Floor) {
        let map = floor.map();

        // Sealed border
        for x in 0..map.width() {
            assert_eq!(map.tile(x, 0), Some(TileType::Wall));
            assert_eq!(map.tile(x, map.height() - 1), Some(TileType::Wall));
        }
        for y in 0..map.height() {
            assert_eq!(map.tile(0, y), Some(TileType::Wall));
            assert_eq!(map.tile(map.width() - 1, y), Some(TileType::Wall));
        }

        // Exactly one lift, where the floor says it is
        let lift = floor.lift().tile();
        assert_eq!(map.positions_of(TileType::Lift), vec![lift]);
        let owner = floor.room(floor.lift().room_id).unwrap();
        assert!(owner.contains(lift.x, lift.y));

        // Every walkable tile is reachable from the lift
        let reachable = reachable_from(map, lift);
        for pos in map.walkable_positions() {
            assert!(reachable[map.xy_to_idx(pos.x, pos.y)], "island at {:?}", pos);
        }

        assert!(map.tile_at(floor.spawn()).unwrap().is_floor());
        for book in floor.books() {
            let tile = map.world_to_tile(book.world_x, book.world_y).unwrap();
            assert!(map.tile_at(tile).unwrap().is_floor());
            assert_ne!(tile, floor.spawn());
        }
    }

    #[test]
    fn test_default_floor() {
        for seed in 0..25 {
            let mut rng = StdRng::seed_from_u64(seed);
            let floor = generate_floor(&mut rng, &FloorRequest::new(40, 30, 1, 1), None).unwrap();
            assert!(!floor.rooms().is_empty());
            assert_floor_invariants(&floor);
        }
    }

    #[test]
    fn test_lift_consistent_across_floors() {
        let mut rng = StdRng::seed_from_u64(11);
        let first = generate_floor(&mut rng, &FloorRequest::new(40, 30, 1, 1), None).unwrap();
        let mut carried = Some(first.lift().tile());

        for floor_number in 2..=6 {
            let request = FloorRequest::new(40, 30, floor_number, 1);
            let floor = generate_floor(&mut rng, &request, carried).unwrap();
            assert_eq!(Some(floor.lift().tile()), carried);
            assert_floor_invariants(&floor);
            carried = Some(floor.lift().tile());
        }
    }

    #[test]
    fn test_min_floor_ignores_carried_lift() {
        let mut rng = StdRng::seed_from_u64(5);
        let stale = Position::new(1, 1);
        let floor = generate_floor(&mut rng, &FloorRequest::new(40, 30, 0, 0), Some(stale)).unwrap();
        assert_ne!(floor.lift().tile(), stale);
        assert!(floor.rooms().iter().all(|r| r.room_type != RoomType::LiftAlcove));
    }

    #[test]
    fn test_single_room_floor() {
        let params = GenerationParams {
            num_rooms: 1,
            ..Default::default()
        };
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let request = FloorRequest::new(40, 30, 1, 1).with_params(params.clone());
            let floor = generate_floor(&mut rng, &request, None).unwrap();
            assert_eq!(floor.rooms().len(), 1);
            assert_eq!(floor.lift().room_id, floor.rooms()[0].id);
            assert!(floor.map().positions_of(TileType::Corridor).is_empty());
            assert_floor_invariants(&floor);
        }
    }

    #[test]
    fn test_no_rooms_is_fatal() {
        let params = GenerationParams {
            min_room_size: 9,
            max_room_size: 9,
            ..Default::default()
        };
        let request = FloorRequest::new(8, 8, 1, 1).with_params(params);
        let result = generate_floor(&mut StdRng::seed_from_u64(0), &request, None);
        assert_eq!(result.unwrap_err(), GenerationError::NoRooms);
    }

    #[test]
    fn test_rejects_bad_request() {
        let request = FloorRequest::new(2, 30, 1, 1);
        assert!(matches!(
            generate_floor(&mut StdRng::seed_from_u64(0), &request, None),
            Err(GenerationError::InvalidParams(_))
        ));
    }
}
