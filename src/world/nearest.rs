//! Nearest safe tile search
//!
//! Finds the closest tile an avatar can safely stand on. The search tries the
//! tile under the coordinate, then square rings around it, then a flood
//! outward over the whole map.

use std::collections::VecDeque;

use super::map::{Map, Position, CARDINALS, TILE_SIZE};
use super::tile::TileType;

/// What counts as a safe destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileQuery {
    /// Never return the lift tile itself
    pub exclude_lift: bool,
    /// Minimum number of walkable cardinal neighbors
    pub min_open_sides: usize,
    /// Reject 1-wide straight passages
    pub reject_passages: bool,
}

impl Default for TileQuery {
    fn default() -> Self {
        Self {
            exclude_lift: false,
            min_open_sides: 2,
            reject_passages: false,
        }
    }
}

impl TileQuery {
    pub fn new(exclude_lift: bool) -> Self {
        Self {
            exclude_lift,
            ..Self::default()
        }
    }

    pub fn with_min_open_sides(mut self, min_open_sides: usize) -> Self {
        self.min_open_sides = min_open_sides;
        self
    }

    pub fn rejecting_passages(mut self) -> Self {
        self.reject_passages = true;
        self
    }

    /// Does the tile at (x, y) satisfy both the type and openness rules?
    pub fn accepts(&self, map: &Map, x: i32, y: i32) -> bool {
        let type_ok = match map.tile(x, y) {
            Some(TileType::Corridor) | Some(TileType::RoomFloor) => true,
            Some(TileType::Lift) => !self.exclude_lift,
            Some(TileType::Wall) | None => false,
        };
        if !type_ok {
            return false;
        }
        if map.open_neighbor_count(x, y) < self.min_open_sides {
            return false;
        }
        !(self.reject_passages && map.is_chokepoint(x, y))
    }
}

/// Tile to start searching from; off-map coordinates are clamped onto the grid
fn target_tile(map: &Map, world_x: f32, world_y: f32) -> Option<Position> {
    if !world_x.is_finite() || !world_y.is_finite() || map.width() <= 0 || map.height() <= 0 {
        return None;
    }
    let x = ((world_x / TILE_SIZE).floor() as i32).clamp(0, map.width() - 1);
    let y = ((world_y / TILE_SIZE).floor() as i32).clamp(0, map.height() - 1);
    Some(Position::new(x, y))
}

/// Find the nearest tile accepted by `query`
///
/// Returns `None` only when no tile on the whole map qualifies.
pub fn find_nearest_tile(
    map: &Map,
    world_x: f32,
    world_y: f32,
    max_radius: i32,
    query: &TileQuery,
) -> Option<Position> {
    let origin = target_tile(map, world_x, world_y)?;

    if query.accepts(map, origin.x, origin.y) {
        return Some(origin);
    }

    if let Some(found) = ring_search(map, origin, max_radius, query) {
        return Some(found);
    }

    log::debug!(
        "No safe tile within {} of ({}, {}), flooding outward",
        max_radius,
        origin.x,
        origin.y
    );
    flood_search(map, origin, query)
}

/// World-space center of the nearest walkable, open tile
pub fn find_nearest_walkable_tile(
    map: &Map,
    world_x: f32,
    world_y: f32,
    max_radius: i32,
    exclude_lift: bool,
) -> Option<(f32, f32)> {
    find_nearest_tile(map, world_x, world_y, max_radius, &TileQuery::new(exclude_lift))
        .map(|pos| pos.world_center())
}

/// Scan ring perimeters 1..=max_radius, closest candidate within a ring wins
///
/// Rings past the larger map dimension hold no in-bounds tiles, so the radius
/// is capped there.
fn ring_search(map: &Map, origin: Position, max_radius: i32, query: &TileQuery) -> Option<Position> {
    let max_radius = max_radius.min(map.width().max(map.height()));

    for radius in 1..=max_radius {
        let mut best: Option<(i32, Position)> = None;
        let mut consider = |dx: i32, dy: i32| {
            let (x, y) = (origin.x + dx, origin.y + dy);
            if !query.accepts(map, x, y) {
                return;
            }
            let dist = dx * dx + dy * dy;
            if best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, Position::new(x, y)));
            }
        };

        // Top and bottom rows, then the side columns without their corners
        for dx in -radius..=radius {
            consider(dx, -radius);
            consider(dx, radius);
        }
        for dy in (1 - radius)..radius {
            consider(-radius, dy);
            consider(radius, dy);
        }

        if let Some((_, pos)) = best {
            return Some(pos);
        }
    }
    None
}

/// Breadth-first flood over every in-bounds tile
///
/// The flood passes through walls and the lift; only destinations are
/// filtered by the query.
fn flood_search(map: &Map, origin: Position, query: &TileQuery) -> Option<Position> {
    let mut visited = vec![false; map.tiles().len()];
    let mut queue = VecDeque::new();
    visited[map.xy_to_idx(origin.x, origin.y)] = true;
    queue.push_back(origin);

    while let Some(pos) = queue.pop_front() {
        if query.accepts(map, pos.x, pos.y) {
            return Some(pos);
        }
        for (dx, dy) in CARDINALS {
            let (nx, ny) = (pos.x + dx, pos.y + dy);
            if !map.in_bounds(nx, ny) {
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
