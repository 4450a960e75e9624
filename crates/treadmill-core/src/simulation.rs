//! Deterministic simulation harness for sessions.
//!
//! This module replays a scripted sequence of user commands against a scene
//! on a synthetic clock. It enables:
//! - Reproducible runs without a renderer or real timers
//! - Scenario files for regression testing
//! - Fast-forwarding through long workouts

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::events::{Event, ObjectPosition};
use crate::scene::ScenePreset;
use crate::sim::{EventClock, FrameTick, SessionMetrics, SessionParams, SessionProfile, SessionState};

/// A user command injected by the script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "snake_case")]
pub enum ScriptCommand {
    Start,
    Stop,
    IncreaseSpeed,
    DecreaseSpeed,
    SetUserName(String),
    SetDuration(u32),
}

/// Command applied just before the given frame is processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedCommand {
    pub frame: u64,
    pub command: ScriptCommand,
}

/// Simulation scenario definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationScript {
    /// Scenario name
    pub name: String,
    /// Scene preset name
    pub scene: String,
    /// Number of frames to run
    pub frames: u64,
    /// Synthetic wall-clock time between frames
    #[serde(default = "default_frame_ms")]
    pub frame_ms: f64,
    /// Wall-clock time of frame zero
    #[serde(default)]
    pub origin_ms: f64,
    /// A minute tick fires after every this many active frames since the
    /// last start. Zero disables it.
    #[serde(default = "default_minute_every")]
    pub minute_every: u64,
    #[serde(default)]
    pub profile: SessionProfile,
    #[serde(default)]
    pub commands: Vec<TimedCommand>,
}

fn default_frame_ms() -> f64 {
    1000.0 / 60.0
}

fn default_minute_every() -> u64 {
    3600
}

impl SimulationScript {
    pub fn new(name: impl Into<String>, scene: impl Into<String>, frames: u64) -> Self {
        Self {
            name: name.into(),
            scene: scene.into(),
            frames,
            frame_ms: default_frame_ms(),
            origin_ms: 0.0,
            minute_every: default_minute_every(),
            profile: SessionProfile::default(),
            commands: Vec::new(),
        }
    }

    /// Schedule a command before `frame`.
    pub fn at(mut self, frame: u64, command: ScriptCommand) -> Self {
        self.commands.push(TimedCommand { frame, command });
        self
    }

    pub fn minute_every(mut self, frames: u64) -> Self {
        self.minute_every = frames;
        self
    }

    pub fn frame_ms(mut self, frame_ms: f64) -> Self {
        self.frame_ms = frame_ms;
        self
    }

    pub fn profile(mut self, profile: SessionProfile) -> Self {
        self.profile = profile;
        self
    }
}

/// Outcome of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub name: String,
    pub scene: String,
    pub frames_run: u64,
    pub minute_ticks: u64,
    pub final_state: SessionState,
    pub metrics: SessionMetrics,
    pub speed: f64,
    pub light_intensity: f64,
    pub positions: Vec<ObjectPosition>,
    /// Elapsed minutes at which milestones fired, in order.
    pub milestones: Vec<u32>,
    pub object_resets: u64,
    /// Lifecycle, speed and milestone events in emission order.
    pub events: Vec<Event>,
}

/// Runs a script against a freshly built session.
#[derive(Debug, Clone)]
pub struct Simulation {
    script: SimulationScript,
    params: SessionParams,
}

impl Simulation {
    pub fn new(script: SimulationScript, params: SessionParams) -> Self {
        Self { script, params }
    }

    pub fn script(&self) -> &SimulationScript {
        &self.script
    }

    /// Run the script to completion.
    ///
    /// # Errors
    ///
    /// Fails if the script names an unknown scene.
    pub fn run(&self) -> Result<SimulationReport> {
        let script = &self.script;
        let scene = ScenePreset::by_name(&script.scene)?;
        let mut session = scene
            .build(&self.params, script.profile.clone())
            .with_clock(EventClock::at_millis(script.origin_ms));

        let mut commands: Vec<&TimedCommand> = script.commands.iter().collect();
        commands.sort_by_key(|c| c.frame);
        let mut pending = commands.into_iter().peekable();

        let mut events = Vec::new();
        let mut milestones = Vec::new();
        let mut object_resets = 0u64;
        let mut minute_ticks = 0u64;
        let mut active_frames = 0u64;
        let mut frame_events: Vec<Event> = Vec::new();

        tracing::debug!(name = %script.name, scene = %scene.name, frames = script.frames, "simulation started");

        for frame in 0..script.frames {
            let now_ms = script.origin_ms + frame as f64 * script.frame_ms;
            session.set_clock(EventClock::at_millis(now_ms));

            while let Some(timed) = pending.next_if(|c| c.frame <= frame) {
                let event = match &timed.command {
                    ScriptCommand::Start => {
                        let started = session.start();
                        if started.is_some() {
                            active_frames = 0;
                        }
                        started
                    }
                    ScriptCommand::Stop => session.stop(),
                    ScriptCommand::IncreaseSpeed => session.increase_speed(),
                    ScriptCommand::DecreaseSpeed => session.decrease_speed(),
                    ScriptCommand::SetUserName(name) => {
                        session.set_user_name(name.clone());
                        None
                    }
                    ScriptCommand::SetDuration(minutes) => {
                        session.set_duration(*minutes);
                        None
                    }
                };
                events.extend(event);
            }

            session.per_frame_into(FrameTick::with_dt(now_ms, script.frame_ms), &mut frame_events);
            object_resets += frame_events.len() as u64;
            frame_events.clear();

            if !session.is_active() {
                continue;
            }
            active_frames += 1;
            if script.minute_every > 0 && active_frames % script.minute_every == 0 {
                minute_ticks += 1;
                if let Some(event) = session.minute_tick() {
                    if let Event::MilestoneReached { elapsed_minutes, .. } = &event {
                        milestones.push(*elapsed_minutes);
                    }
                    events.push(event);
                }
            }
        }

        let positions = match session.snapshot() {
            Event::StateSnapshot { positions, .. } => positions,
            _ => Vec::new(),
        };

        Ok(SimulationReport {
            name: script.name.clone(),
            scene: scene.name,
            frames_run: script.frames,
            minute_ticks,
            final_state: session.state(),
            metrics: session.metrics(),
            speed: session.speed().value(),
            light_intensity: session.light_intensity(),
            positions,
            milestones,
            object_resets,
            events,
        })
    }
}
