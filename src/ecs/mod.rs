//! Entity Component System module
//!
//! Components attached to the player and the floor's books.

pub mod components;

pub use components::*;
