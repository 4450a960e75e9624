use std::path::{Path, PathBuf};

use clap::Args;
use treadmill_core::{ScriptCommand, SessionProfile, Simulation, SimulationScript};

use super::load_config;

#[derive(Args)]
pub struct SimulateArgs {
    /// Load the whole script from a JSON file; other script flags are ignored
    #[arg(long)]
    script: Option<PathBuf>,
    /// Scene preset (defaults to scene.default from config)
    #[arg(long)]
    scene: Option<String>,
    /// Frames to run
    #[arg(long, default_value = "3600")]
    frames: u64,
    /// Synthetic milliseconds per frame
    #[arg(long, default_value_t = 1000.0 / 60.0)]
    frame_ms: f64,
    /// Fire a minute tick after every N frames (0 disables)
    #[arg(long, default_value = "3600")]
    minute_every: u64,
    /// User name carried into the session
    #[arg(long)]
    user: Option<String>,
    /// Planned duration in minutes
    #[arg(long)]
    duration: Option<u32>,
    /// Frame at which the session starts
    #[arg(long, default_value = "0")]
    start_at: u64,
    /// Frame at which the session stops
    #[arg(long)]
    stop_at: Option<u64>,
    /// Speed-up presses applied at the start frame
    #[arg(long, default_value = "0")]
    faster: u32,
    /// Slow-down presses applied at the start frame
    #[arg(long, default_value = "0")]
    slower: u32,
}

impl SimulateArgs {
    fn into_script(self, default_scene: &str, profile: SessionProfile) -> SimulationScript {
        let scene = self.scene.unwrap_or_else(|| default_scene.to_string());
        let mut script = SimulationScript::new("cli", scene, self.frames)
            .frame_ms(self.frame_ms)
            .minute_every(self.minute_every)
            .profile(profile);

        if let Some(user) = self.user {
            script = script.at(0, ScriptCommand::SetUserName(user));
        }
        if let Some(minutes) = self.duration {
            script = script.at(0, ScriptCommand::SetDuration(minutes));
        }
        script = script.at(self.start_at, ScriptCommand::Start);
        for _ in 0..self.faster {
            script = script.at(self.start_at, ScriptCommand::IncreaseSpeed);
        }
        for _ in 0..self.slower {
            script = script.at(self.start_at, ScriptCommand::DecreaseSpeed);
        }
        if let Some(stop_at) = self.stop_at {
            script = script.at(stop_at, ScriptCommand::Stop);
        }
        script
    }
}

pub fn run(args: SimulateArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let params = config.session_params()?;

    let script = match args.script.clone() {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str::<SimulationScript>(&content)?
        }
        None => args.into_script(&config.scene.default, config.profile()),
    };

    let report = Simulation::new(script, params).run()?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
