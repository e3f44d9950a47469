//! Data loading
//!
//! Generation parameters live in external RON files so floors can be tuned
//! without a rebuild.

pub mod loader;

pub use loader::{load_params, load_params_from, export_default_params, ConfigError};
