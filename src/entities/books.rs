//! Book collectibles
//!
//! Books are scattered over corridor and room floor tiles at generation time
//! and live as entities while the floor is loaded.

use std::collections::HashSet;

use hecs::{Entity, World};
use rand::Rng;
use serde::Serialize;

use crate::world::{Map, Position};

/// A collectible book
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Book {
    pub id: u32,
    pub world_x: f32,
    pub world_y: f32,
    pub collected: bool,
}

impl Book {
    pub fn new(id: u32, tile: Position) -> Self {
        let (world_x, world_y) = tile.world_center();
        Self {
            id,
            world_x,
            world_y,
            collected: false,
        }
    }
}

/// Scatter up to `count` books on distinct floor tiles, skipping `reserved`
///
/// The lift is never a candidate since it is not a floor tile.
pub fn place_books(
    rng: &mut impl Rng,
    map: &Map,
    count: u32,
    max_attempts: u32,
    reserved: &[Position],
) -> Vec<Book> {
    let mut books = Vec::with_capacity(count as usize);
    if map.width() < 3 || map.height() < 3 {
        return books;
    }

    let mut used: HashSet<Position> = reserved.iter().copied().collect();

    for _ in 0..max_attempts {
        if books.len() >= count as usize {
            break;
        }

        let pos = Position::new(
            rng.gen_range(1..map.width() - 1),
            rng.gen_range(1..map.height() - 1),
        );
        let on_floor = map.tile_at(pos).map_or(false, |t| t.is_floor());
        if !on_floor || !used.insert(pos) {
            continue;
        }

        books.push(Book::new(books.len() as u32, pos));
    }

    if books.len() < count as usize {
        log::warn!("Placed {} of {} books", books.len(), count);
    }

    books
}

/// Spawn book entities for a freshly loaded floor
pub fn spawn_books(world: &mut World, books: &[Book]) -> Vec<Entity> {
    books.iter().map(|book| world.spawn((*book,))).collect()
}

/// Closest uncollected book within `range` world units
pub fn get_book_near(world: &World, x: f32, y: f32, range: f32) -> Option<(Entity, Book)> {
    world
        .query::<&Book>()
        .iter()
        .filter(|(_, book)| !book.collected)
        .map(|(entity, book)| {
            let dist = ((book.world_x - x).powi(2) + (book.world_y - y).powi(2)).sqrt();
            (entity, *book, dist)
        })
        .filter(|(_, _, dist)| *dist <= range)
        .min_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(entity, book, _)| (entity, book))
}

/// Find a book entity by id
pub fn get_book_by_id(world: &World, id: u32) -> Option<Entity> {
    world
        .query::<&Book>()
        .iter()
        .find(|(_, book)| book.id == id)
        .map(|(entity, _)| entity)
}

/// Mark a book as collected; returns false if it already was
pub fn mark_book_collected(world: &mut World, entity: Entity) -> bool {
    match world.get::<&mut Book>(entity) {
        Ok(mut book) if !book.collected => {
            book.collected = true;
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::TileType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn corridor_map() -> Map {
        let mut map = Map::new(12, 5);
        for x in 1..11 {
            map.set_tile(x, 2, TileType::Corridor);
        }
        map.set_tile(5, 2, TileType::Lift);
        map
    }

    #[test]
    fn test_books_only_on_floor_tiles() {
        let map = corridor_map();
        let books = place_books(&mut StdRng::seed_from_u64(4), &map, 5, 500, &[]);
        assert_eq!(books.len(), 5);

        let mut seen = HashSet::new();
        for book in &books {
            let tile = map.world_to_tile(book.world_x, book.world_y).unwrap();
            assert_eq!(map.tile_at(tile), Some(TileType::Corridor));
            assert!(seen.insert(tile));
            assert!(!book.collected);
        }
    }

    #[test]
    fn test_shortfall_when_floor_is_full() {
        let map = corridor_map();
        let reserved = [Position::new(1, 2)];
        // 9 corridor tiles, one reserved
        let books = place_books(&mut StdRng::seed_from_u64(4), &map, 20, 2000, &reserved);
        assert_eq!(books.len(), 8);
        assert!(books.iter().all(|b| (b.world_x, b.world_y) != Position::new(1, 2).world_center()));
    }

    #[test]
    fn test_collect_book() {
        let mut world = World::new();
        let books = vec![Book::new(0, Position::new(1, 1)), Book::new(1, Position::new(6, 1))];
        spawn_books(&mut world, &books);

        let (x, y) = Position::new(1, 1).world_center();
        let (entity, book) = get_book_near(&world, x + 4.0, y, 16.0).unwrap();
        assert_eq!(book.id, 0);

        assert!(mark_book_collected(&mut world, entity));
        assert!(!mark_book_collected(&mut world, entity));
        assert!(get_book_near(&world, x, y, 16.0).is_none());
        assert!(get_book_by_id(&world, 1).is_some());
    }
}
