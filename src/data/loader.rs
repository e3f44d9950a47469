//! RON config loader
//!
//! Loads generation parameters from an external RON file, with fallback to
//! the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::world::GenerationParams;

/// File name looked up in every config location
pub const PARAMS_FILE: &str = "generation.ron";

/// Config loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
}

/// Locations searched for the params file, in priority order
pub fn config_search_paths() -> Vec<PathBuf> {
    use directories::ProjectDirs;

    let mut paths = vec![Path::new("assets/config").join(PARAMS_FILE)];
    if let Some(proj_dirs) = ProjectDirs::from("com", "hallways", "Hallways") {
        paths.push(proj_dirs.config_dir().join(PARAMS_FILE));
    }
    paths
}

/// Load params from the first config file found, or defaults
pub fn load_params() -> GenerationParams {
    for path in config_search_paths() {
        if !path.exists() {
            continue;
        }
        match load_params_from(&path) {
            Ok(params) => {
                log::info!("Loaded generation params from {}", path.display());
                return params;
            }
            Err(e) => log::warn!("Failed to load {}: {}. Using defaults.", path.display(), e),
        }
    }
    GenerationParams::default()
}

/// Load and validate params from a specific file
pub fn load_params_from(path: &Path) -> Result<GenerationParams, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_params(&content)
}

/// Parse params from RON text; omitted fields keep their defaults
pub fn parse_params(content: &str) -> Result<GenerationParams, ConfigError> {
    let params: GenerationParams = ron::from_str(content)?;
    if let Err(e) = params.validate() {
        log::warn!("Loaded params will be rejected by the generator: {}", e);
    }
    Ok(params)
}

/// Write the default params to `path` for easy editing
pub fn export_default_params(path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }

    let params = GenerationParams::default();
    let text = ron::ser::to_string_pretty(&params, ron::ser::PrettyConfig::default())?;
    fs::write(path, text)?;
    Ok(())
}
