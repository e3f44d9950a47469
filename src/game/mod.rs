//! Game module - floor session and lift transitions

mod state;

pub use state::{Session, SessionConfig, SessionError, LIFT_RANGE, PICKUP_RANGE};
