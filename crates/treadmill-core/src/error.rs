//! Core error types for treadmill-core.
//!
//! The per-frame simulation never fails. Errors only surface from the
//! configuration layer and from parsing host-supplied names (routes, scenes).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for treadmill-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Speed bounds are inverted
    #[error("Invalid speed range: min ({min}) must not exceed max ({max})")]
    InvalidSpeedRange { min: f64, max: f64 },

    /// Speed step must move the value
    #[error("Speed step must be positive, got {0}")]
    NonPositiveStep(f64),

    /// Initial speed outside its bounds
    #[error("Speed {value} is outside [{min}, {max}]")]
    SpeedOutOfRange { value: f64, min: f64, max: f64 },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Path does not name a known screen
    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    /// Name does not match a scene preset
    #[error("Unknown scene: {0}")]
    UnknownScene(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
