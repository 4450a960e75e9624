mod config;

pub use config::{
    Config, LightConfig, MetricsConfig, MotionConfig, ProfileConfig, SceneConfig, SpeedConfig,
    TimerConfig,
};

use std::path::PathBuf;

/// Returns `~/.config/treadmill[-dev]/` based on TREADMILL_ENV.
///
/// Set TREADMILL_ENV=dev to use the development config directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TREADMILL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("treadmill-dev")
    } else {
        base_dir.join("treadmill")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
