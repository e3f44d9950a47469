//! Hallways - procedural school floors connected by a lift
//!
//! Generates floors of rooms and corridors where every tile can be reached
//! from the lift, and keeps the lift in the same spot on every floor.

pub mod game;
pub mod ecs;
pub mod world;
pub mod entities;
pub mod data;

// Re-export commonly used types
pub use game::{Session, SessionConfig, SessionError};
pub use world::{generate_floor, Floor, FloorRequest, GenerationError, GenerationParams, Map, TileType};
