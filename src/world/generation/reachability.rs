//! Reachability validation and force-connect repair
//!
//! After the border is sealed, the lift must reach the rest of the floor.
//! Anything that does not gets a corridor carved to the nearest tile that
//! does.

use std::collections::VecDeque;

use super::corridors::{carve_h_corridor, carve_v_corridor};
use super::rooms::Room;
use super::GenerationError;
use crate::world::{Map, Position, CARDINALS};

/// Breadth-first flood over walkable tiles; indexed like `Map::tiles`
pub fn reachable_from(map: &Map, start: Position) -> Vec<bool> {
    let mut visited = vec![false; map.tiles().len()];
    if !map.is_walkable(start.x, start.y) {
        return visited;
    }

    let mut queue = VecDeque::new();
    visited[map.xy_to_idx(start.x, start.y)] = true;
    queue.push_back(start);

    while let Some(pos) = queue.pop_front() {
        for (dx, dy) in CARDINALS {
            let (nx, ny) = (pos.x + dx, pos.y + dy);
            if !map.is_walkable(nx, ny) {
                continue;
            }
            let idx = map.xy_to_idx(nx, ny);
            if !visited[idx] {
                visited[idx] = true;
                queue.push_back(Position::new(nx, ny));
            }
        }
    }

    visited
}

/// Does the lift reach at least one corridor or room floor tile?
pub fn lift_reaches_floor(map: &Map, lift: Position) -> bool {
    reachable_from(map, lift)
        .iter()
        .enumerate()
        .any(|(idx, reached)| {
            *reached && map.tiles()[idx].is_floor()
        })
}

/// Nearest interior tile (by hop count, walls passable) accepted by `is_target`
pub(crate) fn nearest_by_hops(
    map: &Map,
    from: Position,
    is_target: impl Fn(&Map, Position) -> bool,
) -> Option<Position> {
    if !map.in_bounds(from.x, from.y) {
        return None;
    }

    let mut visited = vec![false; map.tiles().len()];
    let mut queue = VecDeque::new();
    visited[map.xy_to_idx(from.x, from.y)] = true;
    queue.push_back(from);

    while let Some(pos) = queue.pop_front() {
        if pos != from && is_target(map, pos) {
            return Some(pos);
        }
        for (dx, dy) in CARDINALS {
            let (nx, ny) = (pos.x + dx, pos.y + dy);
            if !map.is_interior(nx, ny) {
                continue;
            }
            let idx = map.xy_to_idx(nx, ny);
            if !visited[idx] {
                visited[idx] = true;
                queue.push_back(Position::new(nx, ny));
            }
        }
    }

    None
}

/// Horizontal leg then vertical leg, converting only walls
pub(crate) fn carve_path(map: &mut Map, from: Position, to: Position) {
    carve_h_corridor(map, from.x, to.x, from.y);
    carve_v_corridor(map, from.y, to.y, to.x);
}

/// Carve from `from` to the nearest corridor or room floor tile
///
/// Returns the tile the corridor was carved to, or `None` if the floor has
/// no such tile.
pub(crate) fn force_connect(map: &mut Map, from: Position) -> Option<Position> {
    let target = nearest_by_hops(map, from, |m, p| {
        m.tile_at(p).map_or(false, |t| t.is_floor())
    })?;
    carve_path(map, from, target);
    log::debug!(
        "Force-connected ({}, {}) to ({}, {})",
        from.x,
        from.y,
        target.x,
        target.y
    );
    Some(target)
}

/// Make sure the lift reaches the floor and every room reaches the lift
pub fn validate_and_repair(map: &mut Map, lift: Position, rooms: &[Room]) -> Result<(), GenerationError> {
    let unreachable = GenerationError::Unreachable { x: lift.x, y: lift.y };

    if !lift_reaches_floor(map, lift) {
        let has_open_neighbor = CARDINALS
            .iter()
            .any(|(dx, dy)| map.is_walkable(lift.x + dx, lift.y + dy));

        if has_open_neighbor {
            log::debug!("Lift already borders a walkable tile");
        } else {
            log::warn!("Lift at ({}, {}) is sealed in, carving a way out", lift.x, lift.y);
            force_connect(map, lift).ok_or(unreachable.clone())?;
        }

        if !lift_reaches_floor(map, lift) {
            log::error!("Lift at ({}, {}) is still unreachable after repair", lift.x, lift.y);
            return Err(unreachable);
        }
    }

    connect_stray_rooms(map, lift, rooms)
}

/// Carve a path from any room the lift cannot reach back to the lift's network
fn connect_stray_rooms(map: &mut Map, lift: Position, rooms: &[Room]) -> Result<(), GenerationError> {
    let mut reachable = reachable_from(map, lift);

    for room in rooms {
        let center = room.center;
        if reachable[map.xy_to_idx(center.x, center.y)] {
            continue;
        }

        log::warn!("Room {} is cut off from the lift, reconnecting", room.id);
        let target = nearest_by_hops(map, center, |m, p| reachable[m.xy_to_idx(p.x, p.y)]);
        let Some(target) = target else {
            return Err(GenerationError::Unreachable { x: center.x, y: center.y });
        };
        carve_path(map, center, target);

        reachable = reachable_from(map, lift);
        if !reachable[map.xy_to_idx(center.x, center.y)] {
            return Err(GenerationError::Unreachable { x: center.x, y: center.y });
        }
    }

    Ok(())
}
