//! Session lifecycle and the per-frame update.
//!
//! The controller is the single owner of session state. Both host cadences
//! (the render frame and the minute timer) call into it and read the same
//! `state` field, so a `stop()` takes effect on the very next tick of either.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start()--> Active --stop()--> Idle
//! ```
//!
//! `start()` while Active and `stop()` while Idle are no-ops.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::light::{LightOscillator, MaterialParams};
use super::metrics::{MetricsAccumulator, SessionMetrics};
use super::motion::{MotionIntegrator, Rotator, TrackedObject};
use super::speed::SpeedController;
use super::timer::{MinuteTick, SessionTimer};
use crate::events::{Event, EventSink, ObjectPosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Active,
}

/// One render frame as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameTick {
    /// Wall-clock time in milliseconds.
    pub now_ms: f64,
    /// Time since the previous frame, when the host knows it.
    pub dt_ms: Option<f64>,
}

impl FrameTick {
    pub fn at(now_ms: f64) -> Self {
        Self { now_ms, dt_ms: None }
    }

    pub fn with_dt(now_ms: f64, dt_ms: f64) -> Self {
        Self {
            now_ms,
            dt_ms: Some(dt_ms),
        }
    }
}

/// Opaque values carried over from the landing screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProfile {
    pub user_name: String,
    pub duration_minutes: u32,
}

impl Default for SessionProfile {
    fn default() -> Self {
        Self {
            user_name: String::new(),
            duration_minutes: 30,
        }
    }
}

/// Source of event timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventClock {
    /// Stamp events with the wall clock.
    #[default]
    System,
    /// Stamp events with a host-supplied instant, for replays.
    Manual(DateTime<Utc>),
}

impl EventClock {
    /// Manual clock at `ms` milliseconds since the Unix epoch.
    pub fn at_millis(ms: f64) -> Self {
        Self::Manual(DateTime::from_timestamp_millis(ms as i64).unwrap_or_default())
    }

    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Self::System => Utc::now(),
            Self::Manual(at) => *at,
        }
    }
}

/// Tunables a session is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionParams {
    pub speed: SpeedController,
    pub calories_per_unit: f64,
    pub milestone_every: u32,
    pub angular_frequency: f64,
    /// Scale per-frame motion by `dt / (1000 / reference_fps)` when the host
    /// supplies frame durations.
    pub time_scaled: bool,
    pub reference_fps: f64,
    /// Model spin in radians per reference frame, for scenes that spin.
    pub rotation_per_frame: f64,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            speed: SpeedController::default(),
            calories_per_unit: super::metrics::DEFAULT_CALORIES_PER_UNIT,
            milestone_every: super::timer::DEFAULT_MILESTONE_EVERY,
            angular_frequency: super::light::DEFAULT_ANGULAR_FREQUENCY,
            time_scaled: false,
            reference_fps: 60.0,
            rotation_per_frame: 0.001,
        }
    }
}

/// Owns every piece of mutable simulation state for one scene.
#[derive(Debug, Clone)]
pub struct SessionController {
    state: SessionState,
    profile: SessionProfile,
    motion: MotionIntegrator,
    rotator: Option<Rotator>,
    metrics: MetricsAccumulator,
    timer: SessionTimer,
    speed: SpeedController,
    light: LightOscillator,
    light_intensity: f64,
    time_scaled: bool,
    reference_fps: f64,
    frames: u64,
    clock: EventClock,
}

impl SessionController {
    pub fn new(motion: MotionIntegrator, params: &SessionParams) -> Self {
        let light = LightOscillator::new(params.angular_frequency);
        Self {
            state: SessionState::Idle,
            profile: SessionProfile::default(),
            motion,
            rotator: None,
            metrics: MetricsAccumulator::new(params.calories_per_unit),
            timer: SessionTimer::new(params.milestone_every),
            speed: params.speed,
            light_intensity: light.intensity(0.0),
            light,
            time_scaled: params.time_scaled,
            reference_fps: params.reference_fps,
            frames: 0,
            clock: EventClock::System,
        }
    }

    pub fn with_rotator(mut self, rotator: Rotator) -> Self {
        self.rotator = Some(rotator);
        self
    }

    pub fn with_profile(mut self, profile: SessionProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_clock(mut self, clock: EventClock) -> Self {
        self.clock = clock;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn metrics(&self) -> SessionMetrics {
        SessionMetrics {
            distance: self.metrics.distance(),
            calories: self.metrics.calories(),
            elapsed_minutes: self.timer.elapsed_minutes(),
        }
    }

    pub fn profile(&self) -> &SessionProfile {
        &self.profile
    }

    pub fn speed(&self) -> &SpeedController {
        &self.speed
    }

    pub fn objects(&self) -> &[TrackedObject] {
        self.motion.objects()
    }

    pub fn motion(&self) -> &MotionIntegrator {
        &self.motion
    }

    pub fn light_intensity(&self) -> f64 {
        self.light_intensity
    }

    pub fn material(&self) -> MaterialParams {
        MaterialParams::from_intensity(self.light_intensity)
    }

    /// Model yaw in radians, if this scene spins its model.
    pub fn yaw(&self) -> Option<f64> {
        self.rotator.map(|r| r.yaw())
    }

    /// Frames processed since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn snapshot(&self) -> Event {
        let metrics = self.metrics();
        Event::StateSnapshot {
            state: self.state,
            distance: metrics.distance,
            calories: metrics.calories,
            elapsed_minutes: metrics.elapsed_minutes,
            speed: self.speed.value(),
            light_intensity: self.light_intensity,
            positions: self
                .motion
                .objects()
                .iter()
                .map(|o| ObjectPosition {
                    id: o.id().to_string(),
                    axis_position: o.axis_position(),
                })
                .collect(),
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            SessionState::Active => None,
            SessionState::Idle => {
                self.metrics.reset();
                self.timer.reset();
                self.state = SessionState::Active;
                tracing::info!(
                    user = %self.profile.user_name,
                    duration_minutes = self.profile.duration_minutes,
                    "session started"
                );
                Some(Event::SessionStarted {
                    user_name: self.profile.user_name.clone(),
                    duration_minutes: self.profile.duration_minutes,
                    at: self.clock.now(),
                })
            }
        }
    }

    pub fn stop(&mut self) -> Option<Event> {
        match self.state {
            SessionState::Idle => None,
            SessionState::Active => {
                self.state = SessionState::Idle;
                let metrics = self.metrics();
                tracing::info!(
                    distance = metrics.distance,
                    calories = metrics.calories,
                    elapsed_minutes = metrics.elapsed_minutes,
                    "session stopped"
                );
                Some(Event::SessionStopped {
                    distance: metrics.distance,
                    calories: metrics.calories,
                    elapsed_minutes: metrics.elapsed_minutes,
                    at: self.clock.now(),
                })
            }
        }
    }

    pub fn increase_speed(&mut self) -> Option<Event> {
        let from = self.speed.value();
        self.speed.increase().then(|| self.speed_changed(from))
    }

    pub fn decrease_speed(&mut self) -> Option<Event> {
        let from = self.speed.value();
        self.speed.decrease().then(|| self.speed_changed(from))
    }

    /// Move the event clock, e.g. once per replayed frame.
    pub fn set_clock(&mut self, clock: EventClock) {
        self.clock = clock;
    }

    pub fn set_user_name(&mut self, name: impl Into<String>) {
        self.profile.user_name = name.into();
    }

    pub fn set_duration(&mut self, minutes: u32) {
        self.profile.duration_minutes = minutes;
    }

    /// Advance one render frame. Motion and the metrics it feeds are settled
    /// before this returns.
    pub fn per_frame(&mut self, tick: FrameTick) {
        self.per_frame_into(tick, &mut NullSink);
    }

    /// As [`per_frame`](Self::per_frame), reporting object resets to `sink`.
    pub fn per_frame_into(&mut self, tick: FrameTick, sink: &mut impl EventSink) {
        let scale = self.frame_scale(tick.dt_ms);
        let active = self.is_active();

        let delta = self.motion.frame_delta(self.speed.value(), scale);
        let report = self.motion.advance(delta, active);
        if active {
            self.metrics.accumulate(report.distance_delta);
        }

        if let Some(rotator) = self.rotator.as_mut() {
            rotator.advance(scale);
        }
        self.light_intensity = self.light.intensity(tick.now_ms);
        self.frames += 1;

        for object_id in report.resets {
            sink.emit(Event::ObjectReset {
                object_id,
                at: self.clock.now(),
            });
        }
        tracing::trace!(frame = self.frames, active, delta, "frame settled");
    }

    /// Count one elapsed minute. Returns the milestone event, if one fired.
    pub fn minute_tick(&mut self) -> Option<Event> {
        match self.timer.tick(self.is_active()) {
            MinuteTick::Milestone { elapsed_minutes } => {
                tracing::info!(elapsed_minutes, "milestone reached");
                Some(Event::MilestoneReached {
                    elapsed_minutes,
                    at: self.clock.now(),
                })
            }
            MinuteTick::Counted { .. } | MinuteTick::Suspended => None,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn frame_scale(&self, dt_ms: Option<f64>) -> f64 {
        match dt_ms {
            Some(dt) if self.time_scaled && self.reference_fps > 0.0 && dt >= 0.0 => {
                dt * self.reference_fps / 1000.0
            }
            _ => 1.0,
        }
    }

    fn speed_changed(&self, from: f64) -> Event {
        Event::SpeedChanged {
            from,
            to: self.speed.value(),
            at: self.clock.now(),
        }
    }
}

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: Event) {}
}
