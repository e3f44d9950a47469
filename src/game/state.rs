//! Floor session
//!
//! Owns the current floor, the entities on it and the one piece of state that
//! survives floor changes: the lift's tile coordinates.

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::ecs::{BooksCollected, Player, WorldPos};
use crate::entities::books::{self, Book};
use crate::world::{
    find_nearest_tile, generate_floor, Floor, FloorRequest, GenerationError, GenerationParams,
    Position, TileQuery, TILE_SIZE,
};

/// How close (world units) the player must be to the lift center to ride it
pub const LIFT_RANGE: f32 = TILE_SIZE * 1.5;
/// How close a book must be to be picked up
pub const PICKUP_RANGE: f32 = TILE_SIZE * 0.75;
/// Ring radius (tiles) for placing the player next to the lift on arrival
const ARRIVAL_RADIUS: i32 = 3;
/// Ring radius (tiles) for anti-stuck relocation
const RECOVERY_RADIUS: i32 = 4;

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("floor {floor} is outside {min}..={max}")]
    FloorOutOfRange { floor: i32, min: i32, max: i32 },
    #[error("no floor is loaded")]
    NoFloorLoaded,
    #[error("player is not standing at the lift")]
    NotNearLift,
    #[error("player is stuck at ({x}, {y}) with no safe tile to move to")]
    Stuck { x: f32, y: f32 },
    #[error("no uncollected book with id {0}")]
    UnknownBook(u32),
}

/// Building layout shared by every floor of a session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cols: i32,
    pub rows: i32,
    pub min_floor: i32,
    pub max_floor: i32,
    pub params: GenerationParams,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cols: 40,
            rows: 30,
            min_floor: 1,
            max_floor: 5,
            params: GenerationParams::default(),
        }
    }
}

/// One play session: the loaded floor plus the player and book entities
pub struct Session {
    config: SessionConfig,
    /// Random number generator (seeded for reproducibility)
    rng: StdRng,
    /// Entities on the current floor
    world: World,
    floor: Option<Floor>,
    /// Lift tile recorded on the lowest floor, reused on every other floor
    carried_lift: Option<Position>,
    player: Entity,
}

impl Session {
    /// Create a session; nothing is generated until `load_floor`
    pub fn new(config: SessionConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let mut world = World::new();
        let player = world.spawn((Player, WorldPos::default(), BooksCollected(0)));

        Self {
            config,
            rng,
            world,
            floor: None,
            carried_lift: None,
            player,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn floor(&self) -> Option<&Floor> {
        self.floor.as_ref()
    }

    pub fn floor_number(&self) -> Option<i32> {
        self.floor.as_ref().map(|f| f.floor_number())
    }

    /// Lift tile carried between floors
    pub fn carried_lift(&self) -> Option<Position> {
        self.carried_lift
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Generate floor `number` and drop the player on its spawn tile
    pub fn load_floor(&mut self, number: i32) -> Result<&Floor, SessionError> {
        self.generate(number)?;
        let spawn = self.current_floor()?.spawn().world_center();
        self.set_player_pos(spawn.into());
        self.current_floor()
    }

    /// Ride the lift to floor `number`, arriving next to the lift
    pub fn ride_lift(&mut self, number: i32) -> Result<&Floor, SessionError> {
        if !self.is_near_lift() {
            return Err(SessionError::NotNearLift);
        }
        self.check_range(number)?;

        self.generate(number)?;
        let floor = self.current_floor()?;
        let lift = *floor.lift();
        let arrival = floor
            .find_nearest_walkable_tile(lift.world_x, lift.world_y, ARRIVAL_RADIUS, true)
            .unwrap_or_else(|| {
                log::warn!("No free tile next to the lift on floor {}, using spawn", number);
                floor.spawn().world_center()
            });

        self.set_player_pos(arrival.into());
        log::info!("Rode the lift to floor {}", number);
        self.current_floor()
    }

    fn check_range(&self, number: i32) -> Result<(), SessionError> {
        let (min, max) = (self.config.min_floor, self.config.max_floor);
        if number < min || number > max {
            return Err(SessionError::FloorOutOfRange { floor: number, min, max });
        }
        Ok(())
    }

    fn generate(&mut self, number: i32) -> Result<(), SessionError> {
        self.check_range(number)?;

        // The lowest floor picks a fresh lift; the old one stays carried until it succeeds
        let carried = if number == self.config.min_floor {
            None
        } else {
            self.carried_lift
        };

        let request = FloorRequest::new(self.config.cols, self.config.rows, number, self.config.min_floor)
            .with_params(self.config.params.clone());
        let floor = generate_floor(&mut self.rng, &request, carried)?;

        self.carried_lift = Some(floor.lift().tile());

        // Books belong to the floor that is being discarded
        let old_books: Vec<Entity> = self
            .world
            .query::<&Book>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        for entity in old_books {
            if let Err(err) = self.world.despawn(entity) {
                log::warn!("Book entity {:?} already gone: {}", entity, err);
            }
        }
        books::spawn_books(&mut self.world, floor.books());

        self.floor = Some(floor);
        Ok(())
    }

    fn current_floor(&self) -> Result<&Floor, SessionError> {
        self.floor.as_ref().ok_or(SessionError::NoFloorLoaded)
    }

    fn set_player_pos(&mut self, pos: WorldPos) {
        if let Ok(mut current) = self.world.get::<&mut WorldPos>(self.player) {
            *current = pos;
        }
    }

    pub fn player_pos(&self) -> WorldPos {
        self.world
            .get::<&WorldPos>(self.player)
            .map(|pos| *pos)
            .unwrap_or_default()
    }

    /// Apply a position computed by external movement code
    pub fn move_player_to(&mut self, x: f32, y: f32) {
        self.set_player_pos(WorldPos::new(x, y));
    }

    /// Is the player within riding distance of the lift?
    pub fn is_near_lift(&self) -> bool {
        let Some(floor) = &self.floor else {
            return false;
        };
        let lift = floor.lift();
        self.player_pos().distance_to(lift.world_x, lift.world_y) <= LIFT_RANGE
    }

    /// Relocate the player if they ended up in a wall or on an unsafe tile
    ///
    /// Returns whether the player was moved. Failing to find any safe tile is
    /// fatal for the session.
    pub fn ensure_not_stuck(&mut self) -> Result<bool, SessionError> {
        let pos = self.player_pos();
        let floor = self.current_floor()?;
        let map = floor.map();
        let query = TileQuery::new(false);

        let safe = map
            .world_to_tile(pos.x, pos.y)
            .map_or(false, |tile| query.accepts(map, tile.x, tile.y));
        if safe {
            return Ok(false);
        }

        let Some(tile) = find_nearest_tile(map, pos.x, pos.y, RECOVERY_RADIUS, &query) else {
            log::error!("Player stuck at ({}, {}) with nowhere to go", pos.x, pos.y);
            return Err(SessionError::Stuck { x: pos.x, y: pos.y });
        };

        log::warn!(
            "Player was stuck at ({:.1}, {:.1}), moved to tile ({}, {})",
            pos.x,
            pos.y,
            tile.x,
            tile.y
        );
        self.set_player_pos(tile.world_center().into());
        Ok(true)
    }

    /// Nearest uncollected book the player can pick up
    pub fn book_in_reach(&self) -> Option<Book> {
        let pos = self.player_pos();
        books::get_book_near(&self.world, pos.x, pos.y, PICKUP_RANGE).map(|(_, book)| book)
    }

    /// Claim a book once the quiz for it has been answered
    pub fn claim_book(&mut self, id: u32) -> Result<(), SessionError> {
        let entity = books::get_book_by_id(&self.world, id).ok_or(SessionError::UnknownBook(id))?;
        if !books::mark_book_collected(&mut self.world, entity) {
            return Err(SessionError::UnknownBook(id));
        }
        if let Ok(mut collected) = self.world.get::<&mut BooksCollected>(self.player) {
            collected.0 += 1;
        }
        log::info!("Book {} collected", id);
        Ok(())
    }

    /// Books claimed over the whole session
    pub fn books_collected(&self) -> u32 {
        self.world
            .get::<&BooksCollected>(self.player)
            .map(|c| c.0)
            .unwrap_or(0)
    }

    /// Books still lying on the current floor
    pub fn remaining_books(&self) -> usize {
        self.world
            .query::<&Book>()
            .iter()
            .filter(|(_, book)| !book.collected)
            .count()
    }
}
