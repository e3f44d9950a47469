//! Corridor connector
//!
//! Joins every room into one network. Starting from the first room, the
//! closest (connected, unconnected) pair by center distance is linked with an
//! L-shaped corridor until nothing is left unconnected.

use rand::Rng;

use super::rooms::Room;
use crate::world::{Map, Position, TileType};

/// Connect all rooms with corridors; a no-op for fewer than two rooms
pub fn connect_rooms(rng: &mut impl Rng, map: &mut Map, rooms: &[Room]) {
    if rooms.len() < 2 {
        return;
    }

    let mut connected = vec![false; rooms.len()];
    connected[0] = true;
    let mut remaining = rooms.len() - 1;

    while remaining > 0 {
        let Some((from, to)) = closest_pair(rooms, &connected) else {
            log::error!("Corridor connector stalled with {} rooms unconnected", remaining);
            break;
        };

        carve_l_corridor(rng, map, rooms[from].center, rooms[to].center);
        connected[to] = true;
        remaining -= 1;
    }
}

/// (connected index, unconnected index) with the smallest squared center distance
fn closest_pair(rooms: &[Room], connected: &[bool]) -> Option<(usize, usize)> {
    let mut best: Option<(i32, usize, usize)> = None;

    for (i, a) in rooms.iter().enumerate().filter(|(i, _)| connected[*i]) {
        for (j, b) in rooms.iter().enumerate().filter(|(j, _)| !connected[*j]) {
            let dist = a.center.distance_squared(&b.center);
            if best.map_or(true, |(d, _, _)| dist < d) {
                best = Some((dist, i, j));
            }
        }
    }

    best.map(|(_, i, j)| (i, j))
}

/// L-shaped corridor with a random leg order
fn carve_l_corridor(rng: &mut impl Rng, map: &mut Map, from: Position, to: Position) {
    if rng.gen_bool(0.5) {
        carve_h_corridor(map, from.x, to.x, from.y);
        carve_v_corridor(map, from.y, to.y, to.x);
    } else {
        carve_v_corridor(map, from.y, to.y, from.x);
        carve_h_corridor(map, from.x, to.x, to.y);
    }
}

/// Carve a horizontal corridor; only walls are replaced
pub(crate) fn carve_h_corridor(map: &mut Map, x1: i32, x2: i32, y: i32) {
    let (start, end) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    for x in start..=end {
        map.carve(x, y, TileType::Corridor);
    }
}

/// Carve a vertical corridor; only walls are replaced
pub(crate) fn carve_v_corridor(map: &mut Map, y1: i32, y2: i32, x: i32) {
    let (start, end) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
    for y in start..=end {
        map.carve(x, y, TileType::Corridor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generation::reachability::reachable_from;
    use crate::world::generation::rooms::{carve_room, RoomType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rooms_on_map(map: &mut Map, rects: &[(i32, i32, i32, i32)]) -> Vec<Room> {
        let rooms: Vec<Room> = rects
            .iter()
            .enumerate()
            .map(|(i, (x, y, w, h))| Room::new(i as u32, *x, *y, *w, *h, RoomType::Classroom))
            .collect();
        for room in &rooms {
            carve_room(map, room);
        }
        rooms
    }

    #[test]
    fn test_single_room_is_noop() {
        let mut map = Map::new(20, 20);
        let rooms = rooms_on_map(&mut map, &[(2, 2, 5, 5)]);
        let before = map.tiles().to_vec();
        connect_rooms(&mut StdRng::seed_from_u64(0), &mut map, &rooms);
        assert_eq!(map.tiles(), &before[..]);
    }

    #[test]
    fn test_all_rooms_connected() {
        for seed in 0..10 {
            let mut map = Map::new(40, 30);
            let rooms = rooms_on_map(
                &mut map,
                &[(2, 2, 5, 4), (20, 3, 6, 5), (5, 20, 4, 6), (30, 20, 7, 6), (14, 12, 5, 5)],
            );
            connect_rooms(&mut StdRng::seed_from_u64(seed), &mut map, &rooms);

            let reachable = reachable_from(&map, rooms[0].center);
            for room in &rooms {
                assert!(reachable[map.xy_to_idx(room.center.x, room.center.y)]);
            }
        }
    }

    #[test]
    fn test_corridors_never_overwrite_room_floor() {
        let mut map = Map::new(30, 12);
        let rooms = rooms_on_map(&mut map, &[(2, 3, 4, 4), (11, 3, 4, 4), (22, 3, 4, 4)]);
        connect_rooms(&mut StdRng::seed_from_u64(7), &mut map, &rooms);
        for room in &rooms {
            assert!(room.tiles().all(|p| map.tile_at(p) == Some(TileType::RoomFloor)));
        }
        assert!(!map.positions_of(TileType::Corridor).is_empty());
    }

    #[test]
    fn test_closest_pair_prefers_nearest() {
        let rooms = vec![
            Room::new(0, 1, 1, 4, 4, RoomType::Office),
            Room::new(1, 30, 1, 4, 4, RoomType::Office),
            Room::new(2, 8, 1, 4, 4, RoomType::Office),
        ];
        let connected = [true, false, false];
        assert_eq!(closest_pair(&rooms, &connected), Some((0, 2)));
    }
}
