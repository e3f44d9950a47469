//! Spawn point selection
//!
//! Picks a random spot in a random room, then asks the nearest-tile query for
//! progressively less demanding locations around it.

use rand::seq::SliceRandom;
use rand::Rng;

use super::rooms::{Room, RoomType};
use super::GenerationError;
use crate::world::{find_nearest_tile, Map, Position, TileQuery};

/// Openness requirements, strictest first
fn spawn_queries() -> [TileQuery; 3] {
    [
        TileQuery::new(true).with_min_open_sides(3),
        TileQuery::new(true).with_min_open_sides(2).rejecting_passages(),
        TileQuery::new(true).with_min_open_sides(0),
    ]
}

/// Choose the player's starting tile
pub fn choose_spawn(
    rng: &mut impl Rng,
    map: &Map,
    rooms: &[Room],
    search_radius: i32,
) -> Result<Position, GenerationError> {
    let regular: Vec<&Room> = rooms
        .iter()
        .filter(|r| r.room_type != RoomType::LiftAlcove)
        .collect();
    let pool: Vec<&Room> = if regular.is_empty() {
        rooms.iter().collect()
    } else {
        regular
    };

    let room = pool.choose(rng).ok_or(GenerationError::NoSpawnLocation)?;
    let seed = Position::new(
        rng.gen_range(room.x..room.x + room.width),
        rng.gen_range(room.y..room.y + room.height),
    );
    let (world_x, world_y) = seed.world_center();

    for (attempt, query) in spawn_queries().iter().enumerate() {
        if let Some(pos) = find_nearest_tile(map, world_x, world_y, search_radius, query) {
            if attempt > 0 {
                log::debug!("Spawn needed relaxed openness (fallback {})", attempt);
            }
            return Ok(pos);
        }
    }

    log::error!("No spawn location anywhere on the floor");
    Err(GenerationError::NoSpawnLocation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generation::rooms::carve_room;
    use crate::world::TileType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_prefers_open_tiles() {
        let mut map = Map::new(20, 15);
        let room = Room::new(0, 2, 2, 8, 6, RoomType::Lab);
        carve_room(&mut map, &room);
        map.set_tile(5, 4, TileType::Lift);

        for seed in 0..20 {
            let spawn = choose_spawn(&mut StdRng::seed_from_u64(seed), &map, &[room.clone()], 4).unwrap();
            assert_ne!(spawn, Position::new(5, 4));
            assert_eq!(map.tile_at(spawn), Some(TileType::RoomFloor));
            assert!(map.open_neighbor_count(spawn.x, spawn.y) >= 3);
        }
    }

    #[test]
    fn test_spawn_falls_back_to_any_tile() {
        // A 1x1 pocket next to the lift: no tile has two open sides
        let mut map = Map::new(8, 8);
        let room = Room::new(0, 3, 3, 1, 1, RoomType::Storage);
        carve_room(&mut map, &room);
        map.set_tile(4, 3, TileType::Lift);

        let spawn = choose_spawn(&mut StdRng::seed_from_u64(1), &map, &[room], 2).unwrap();
        assert_eq!(spawn, Position::new(3, 3));
    }

    #[test]
    fn test_spawn_without_rooms() {
        let map = Map::new(8, 8);
        assert_eq!(
            choose_spawn(&mut StdRng::seed_from_u64(1), &map, &[], 2),
            Err(GenerationError::NoSpawnLocation)
        );
    }
}
