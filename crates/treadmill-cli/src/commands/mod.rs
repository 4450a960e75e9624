pub mod config;
pub mod run;
pub mod scenes;
pub mod simulate;

use std::path::Path;

use treadmill_core::{Config, CoreError};

/// Load from an explicit path when given, otherwise from the user config dir.
pub fn load_config(path: Option<&Path>) -> Result<Config, CoreError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

pub fn save_config(config: &Config, path: Option<&Path>) -> Result<(), CoreError> {
    match path {
        Some(path) => config.save_to(path),
        None => config.save(),
    }
}
