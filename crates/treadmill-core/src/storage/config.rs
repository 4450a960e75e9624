//! TOML-based application configuration.
//!
//! Stores simulation tunables:
//! - Speed range and step
//! - Motion scaling and model spin
//! - Calorie conversion
//! - Minute cadence and milestone interval
//! - Light oscillation frequency
//! - Default profile and scene
//!
//! Configuration is stored at `~/.config/treadmill/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result, ValidationError};
use crate::sim::{SessionParams, SessionProfile, SpeedController};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedConfig {
    #[serde(default = "default_speed_initial")]
    pub initial: f64,
    #[serde(default = "default_speed_min")]
    pub min: f64,
    #[serde(default = "default_speed_max")]
    pub max: f64,
    #[serde(default = "default_speed_step")]
    pub step: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Scale motion by real frame duration instead of a fixed per-frame step.
    #[serde(default)]
    pub time_scaled: bool,
    #[serde(default = "default_reference_fps")]
    pub reference_fps: f64,
    /// Radians per frame.
    #[serde(default = "default_rotation_per_frame")]
    pub rotation_per_frame: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_calories_per_unit")]
    pub calories_per_unit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Real seconds per counted minute. Lower it to watch milestones quickly.
    #[serde(default = "default_minute_secs")]
    pub minute_secs: u64,
    #[serde(default = "default_milestone_every")]
    pub milestone_every: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    /// Radians per millisecond.
    #[serde(default = "default_angular_frequency")]
    pub angular_frequency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub user_name: String,
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_scene")]
    pub default: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/treadmill/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub speed: SpeedConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub scene: SceneConfig,
}

// Default functions
fn default_speed_initial() -> f64 {
    0.005
}
fn default_speed_min() -> f64 {
    0.001
}
fn default_speed_max() -> f64 {
    0.05
}
fn default_speed_step() -> f64 {
    0.001
}
fn default_reference_fps() -> f64 {
    60.0
}
fn default_rotation_per_frame() -> f64 {
    0.001
}
fn default_calories_per_unit() -> f64 {
    crate::sim::DEFAULT_CALORIES_PER_UNIT
}
fn default_minute_secs() -> u64 {
    60
}
fn default_milestone_every() -> u32 {
    crate::sim::DEFAULT_MILESTONE_EVERY
}
fn default_angular_frequency() -> f64 {
    crate::sim::DEFAULT_ANGULAR_FREQUENCY
}
fn default_duration_minutes() -> u32 {
    30
}
fn default_scene() -> String {
    "vr".into()
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            initial: default_speed_initial(),
            min: default_speed_min(),
            max: default_speed_max(),
            step: default_speed_step(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            time_scaled: false,
            reference_fps: default_reference_fps(),
            rotation_per_frame: default_rotation_per_frame(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            calories_per_unit: default_calories_per_unit(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            minute_secs: default_minute_secs(),
            milestone_every: default_milestone_every(),
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            angular_frequency: default_angular_frequency(),
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            user_name: String::new(),
            duration_minutes: default_duration_minutes(),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            default: default_scene(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default config file location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be created.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there when the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the
    /// defaults cannot be written.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key in memory. The result is validated
    /// before it replaces the current config.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed
    /// into the field's type, or the new config fails validation.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save it to `path`. Nothing is written
    /// when the value is rejected.
    ///
    /// # Errors
    ///
    /// Same as [`Config::apply`], plus failures writing the file.
    pub fn set(&mut self, key: &str, value: &str, path: &Path) -> Result<()> {
        self.apply(key, value)?;
        self.save_to(path)
    }

    /// # Errors
    ///
    /// Reports the first inconsistent setting.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        self.speed_controller()?;
        if self.timer.milestone_every == 0 {
            return Err(ValidationError::InvalidValue {
                field: "timer.milestone_every".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.timer.minute_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "timer.minute_secs".into(),
                message: "must be at least 1".into(),
            });
        }
        if !(self.motion.reference_fps > 0.0) {
            return Err(ValidationError::InvalidValue {
                field: "motion.reference_fps".into(),
                message: "must be positive".into(),
            });
        }
        if !(self.metrics.calories_per_unit >= 0.0) {
            return Err(ValidationError::InvalidValue {
                field: "metrics.calories_per_unit".into(),
                message: "must not be negative".into(),
            });
        }
        crate::scene::ScenePreset::by_name(&self.scene.default)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Fails when the speed section describes an invalid range.
    pub fn speed_controller(&self) -> std::result::Result<SpeedController, ValidationError> {
        SpeedController::new(
            self.speed.initial,
            self.speed.min,
            self.speed.max,
            self.speed.step,
        )
    }

    /// # Errors
    ///
    /// Fails when the config does not validate.
    pub fn session_params(&self) -> Result<SessionParams> {
        self.validate()?;
        Ok(SessionParams {
            speed: self.speed_controller()?,
            calories_per_unit: self.metrics.calories_per_unit,
            milestone_every: self.timer.milestone_every,
            angular_frequency: self.light.angular_frequency,
            time_scaled: self.motion.time_scaled,
            reference_fps: self.motion.reference_fps,
            rotation_per_frame: self.motion.rotation_per_frame,
        })
    }

    pub fn profile(&self) -> SessionProfile {
        SessionProfile {
            user_name: self.profile.user_name.clone(),
            duration_minutes: self.profile.duration_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.metrics.calories_per_unit, 0.05);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[speed]\nmax = 0.1\n").unwrap();
        assert_eq!(parsed.speed.max, 0.1);
        assert_eq!(parsed.speed.min, 0.001);
        assert_eq!(parsed.timer.milestone_every, 10);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.milestone_every").as_deref(), Some("10"));
        assert_eq!(cfg.get("scene.default").as_deref(), Some("vr"));
        assert_eq!(cfg.get("motion.time_scaled").as_deref(), Some("false"));
        assert!(cfg.get("timer.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.apply("motion.time_scaled", "true").unwrap();
        cfg.apply("timer.minute_secs", "2").unwrap();
        cfg.apply("speed.step", "0.002").unwrap();
        cfg.apply("profile.user_name", "robin").unwrap();
        assert!(cfg.motion.time_scaled);
        assert_eq!(cfg.timer.minute_secs, 2);
        assert_eq!(cfg.speed.step, 0.002);
        assert_eq!(cfg.profile.user_name, "robin");
    }

    #[test]
    fn apply_accepts_integer_for_float_field() {
        let mut cfg = Config::default();
        cfg.apply("motion.reference_fps", "30").unwrap();
        assert_eq!(cfg.motion.reference_fps, 30.0);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.apply("speed.turbo", "1").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
        assert!(cfg.apply("nope.deeper", "1").is_err());
    }

    #[test]
    fn apply_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.apply("motion.time_scaled", "yes").is_err());
        assert!(cfg.apply("timer.milestone_every", "fast").is_err());
        assert!(cfg.apply("timer.milestone_every", "2.5").is_err());
    }

    #[test]
    fn apply_rejects_inconsistent_values_and_keeps_old() {
        let mut cfg = Config::default();
        let err = cfg.apply("speed.min", "1.0").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(cfg, Config::default());
        assert!(cfg.apply("timer.milestone_every", "0").is_err());
        assert!(cfg.apply("scene.default", "moon").is_err());
    }

    #[test]
    fn session_params_follow_config() {
        let mut cfg = Config::default();
        cfg.apply("metrics.calories_per_unit", "0.1").unwrap();
        let params = cfg.session_params().unwrap();
        assert_eq!(params.calories_per_unit, 0.1);
        assert_eq!(params.speed.value(), 0.005);
        assert_eq!(params.milestone_every, 10);
    }

    #[test]
    fn load_from_creates_and_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let created = Config::load_from(&path).unwrap();
        assert_eq!(created, Config::default());
        assert!(path.exists());

        let mut cfg = created;
        cfg.apply("timer.minute_secs", "5").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().timer.minute_secs, 5);
    }

    #[test]
    fn set_writes_to_the_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::load_from(&path).unwrap();

        cfg.set("profile.user_name", "riley", &path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().profile.user_name, "riley");

        assert!(cfg.set("speed.step", "0", &path).is_err());
        assert_eq!(Config::load_from(&path).unwrap().speed.step, 0.001);
    }

    #[test]
    fn load_from_reports_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "speed = [").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::LoadFailed { .. })));
    }
}
