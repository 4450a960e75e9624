//! # Treadmill Core Library
//!
//! This library provides the real-time simulation behind the virtual
//! treadmill: belt motion, workout metrics, speed control, the session
//! clock and the oscillating scene lighting. Rendering, asset loading and
//! camera control belong to the host; the core only exposes tick entry
//! points and state to read back.
//!
//! ## Architecture
//!
//! - **Session Controller**: A tick-driven state machine. The host calls
//!   `per_frame()` once per rendered frame and `minute_tick()` once per
//!   minute; neither spawns threads or timers of its own
//! - **Scenes**: Built-in presets describing tracked objects and light rigs
//! - **Config**: TOML-based tunables
//! - **Simulation**: Deterministic replay of scripted sessions
//!
//! ## Key Components
//!
//! - [`SessionController`]: Session lifecycle and per-frame update
//! - [`SpeedController`]: Bounded speed with step commands
//! - [`ScenePreset`]: Scene definitions
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod route;
pub mod scene;
pub mod sim;
pub mod simulation;
pub mod storage;

pub use error::{ConfigError, CoreError, ValidationError};
pub use events::{CallbackSink, Event, EventSink, ObjectPosition};
pub use route::{LaunchRequest, Route};
pub use scene::{LightSpec, ScenePreset};
pub use sim::{
    DeltaSource, EventClock, FrameTick, LightOscillator, MaterialParams, MotionIntegrator,
    Rotator, SessionController, SessionMetrics, SessionParams, SessionProfile, SessionState,
    SpeedController, TrackedObject,
};
pub use simulation::{ScriptCommand, Simulation, SimulationReport, SimulationScript};
pub use storage::Config;
