//! Lift placement
//!
//! The lowest floor picks the lift tile from scratch: the open room tile
//! closest to the middle of the grid. Every later floor reuses those
//! coordinates, carving whatever it takes to make them usable.

use serde::Serialize;

use super::reachability::force_connect;
use super::rooms::{Room, RoomType};
use super::GenerationError;
use crate::world::{Map, Position, TileType};

/// Where the lift sits on a floor
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LiftPosition {
    pub tile_x: i32,
    pub tile_y: i32,
    pub world_x: f32,
    pub world_y: f32,
    /// Room that owns the lift tile
    pub room_id: u32,
}

impl LiftPosition {
    pub fn new(tile: Position, room_id: u32) -> Self {
        let (world_x, world_y) = tile.world_center();
        Self {
            tile_x: tile.x,
            tile_y: tile.y,
            world_x,
            world_y,
            room_id,
        }
    }

    pub fn tile(&self) -> Position {
        Position::new(self.tile_x, self.tile_y)
    }
}

/// Choose, stamp and register the lift
///
/// `carried` is the lift tile recorded on an earlier floor of the session;
/// `None` means this floor picks a fresh location. May append an alcove
/// room to `rooms`.
pub fn place_lift(
    map: &mut Map,
    rooms: &mut Vec<Room>,
    carried: Option<Position>,
) -> Result<LiftPosition, GenerationError> {
    let tile = match carried {
        None => pick_lift_tile(map, rooms)?,
        Some(pos) => {
            if !map.is_interior(pos.x, pos.y) {
                return Err(GenerationError::LiftOutOfBounds { x: pos.x, y: pos.y });
            }
            pos
        }
    };

    if map.tile_at(tile) == Some(TileType::Wall) {
        log::info!("Lift tile ({}, {}) is inside a wall on this floor", tile.x, tile.y);
        if force_connect(map, tile).is_none() {
            return Err(GenerationError::Unreachable { x: tile.x, y: tile.y });
        }
    }

    let prior = map.tile_at(tile);
    map.set_tile(tile.x, tile.y, TileType::Lift);

    let owner = if prior == Some(TileType::RoomFloor) {
        rooms.iter().find(|r| r.contains(tile.x, tile.y)).map(|r| r.id)
    } else {
        None
    };

    let room_id = match owner {
        Some(id) => id,
        None => carve_alcove(map, rooms, tile)?,
    };

    log::debug!("Lift placed at ({}, {}) in room {}", tile.x, tile.y, room_id);
    Ok(LiftPosition::new(tile, room_id))
}

/// First-floor choice: open, non-chokepoint room interior tile nearest the center
fn pick_lift_tile(map: &Map, rooms: &[Room]) -> Result<Position, GenerationError> {
    let grid_center = Position::new(map.width() / 2, map.height() / 2);

    rooms
        .iter()
        .flat_map(|room| room.interior())
        .filter(|pos| {
            map.tile_at(*pos) == Some(TileType::RoomFloor)
                && !map.is_chokepoint(pos.x, pos.y)
                && map.open_neighbor_count(pos.x, pos.y) >= 2
        })
        .min_by_key(|pos| pos.distance_squared(&grid_center))
        .ok_or(GenerationError::NoLiftCandidate)
}

/// Synthesize a small room around a lift that no room owns
fn carve_alcove(map: &mut Map, rooms: &mut Vec<Room>, lift: Position) -> Result<u32, GenerationError> {
    let x1 = (lift.x - 1).max(1);
    let y1 = (lift.y - 1).max(1);
    let x2 = (lift.x + 1).min(map.width() - 2);
    let y2 = (lift.y + 1).min(map.height() - 2);

    let id = rooms.len() as u32;
    let alcove = Room::new(id, x1, y1, x2 - x1 + 1, y2 - y1 + 1, RoomType::LiftAlcove);
    if !alcove.contains(lift.x, lift.y) {
        return Err(GenerationError::LiftUnowned { x: lift.x, y: lift.y });
    }

    for pos in alcove.tiles() {
        map.carve(pos.x, pos.y, TileType::RoomFloor);
    }

    log::info!(
        "Carved {}x{} lift alcove at ({}, {})",
        alcove.width,
        alcove.height,
        alcove.x,
        alcove.y
    );
    rooms.push(alcove);
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generation::reachability::{lift_reaches_floor, reachable_from};
    use crate::world::generation::rooms::carve_room;

    fn single_room_map() -> (Map, Vec<Room>) {
        let mut map = Map::new(30, 20);
        let room = Room::new(0, 3, 3, 6, 5, RoomType::Classroom);
        carve_room(&mut map, &room);
        (map, vec![room])
    }

    #[test]
    fn test_first_floor_picks_room_interior() {
        let (mut map, mut rooms) = single_room_map();
        let lift = place_lift(&mut map, &mut rooms, None).unwrap();
        let tile = lift.tile();

        assert_eq!(lift.room_id, 0);
        assert_eq!(rooms.len(), 1);
        assert!(rooms[0].interior().any(|p| p == tile));
        assert_eq!(map.positions_of(TileType::Lift), vec![tile]);
        // Closest interior tile to the grid center (15, 10)
        assert_eq!(tile, Position::new(7, 6));
    }

    #[test]
    fn test_no_candidate_without_rooms() {
        let mut map = Map::new(10, 10);
        let mut rooms = Vec::new();
        assert_eq!(
            place_lift(&mut map, &mut rooms, None),
            Err(GenerationError::NoLiftCandidate)
        );
    }

    #[test]
    fn test_carried_tile_reused_in_room() {
        let (mut map, mut rooms) = single_room_map();
        let lift = place_lift(&mut map, &mut rooms, Some(Position::new(4, 4))).unwrap();
        assert_eq!(lift.tile(), Position::new(4, 4));
        assert_eq!(lift.room_id, 0);
        assert_eq!(rooms.len(), 1);
    }

    #[test]
    fn test_carried_tile_in_wall_is_connected() {
        let (mut map, mut rooms) = single_room_map();
        let carried = Position::new(22, 14);
        assert_eq!(map.tile_at(carried), Some(TileType::Wall));

        let lift = place_lift(&mut map, &mut rooms, Some(carried)).unwrap();
        assert_eq!(lift.tile(), carried);
        assert_eq!(map.tile_at(carried), Some(TileType::Lift));

        // Not inside any placed room, so an alcove owns it
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[1].room_type, RoomType::LiftAlcove);
        assert_eq!(lift.room_id, 1);
        assert!(rooms[1].contains(carried.x, carried.y));

        assert!(lift_reaches_floor(&map, carried));
        let reachable = reachable_from(&map, carried);
        assert!(reachable[map.xy_to_idx(rooms[0].center.x, rooms[0].center.y)]);
    }

    #[test]
    fn test_alcove_clamped_to_bounds() {
        let (mut map, mut rooms) = single_room_map();
        let carried = Position::new(28, 18);
        place_lift(&mut map, &mut rooms, Some(carried)).unwrap();
        let alcove = &rooms[1];
        assert_eq!((alcove.x, alcove.y, alcove.width, alcove.height), (27, 17, 2, 2));
    }

    #[test]
    fn test_carried_tile_on_border_rejected() {
        let (mut map, mut rooms) = single_room_map();
        assert_eq!(
            place_lift(&mut map, &mut rooms, Some(Position::new(0, 5))),
            Err(GenerationError::LiftOutOfBounds { x: 0, y: 5 })
        );
    }
}
