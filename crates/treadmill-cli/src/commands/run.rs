//! Live host loop.
//!
//! Frames and minutes run on two independent intervals multiplexed on a
//! single task, so the session is only ever touched from one place. Lines on
//! stdin act as user input: `+`, `-`, `start`, `stop`, `status`, `quit`.

use std::path::Path;
use std::time::Duration;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use treadmill_core::{
    Event, EventSink, FrameTick, LaunchRequest, Route, ScenePreset, SessionController,
};

use super::load_config;

#[derive(Args)]
pub struct RunArgs {
    /// Scene preset (defaults to scene.default from config)
    #[arg(long, conflicts_with = "route")]
    scene: Option<String>,
    /// Launch through a route path such as /vrscene or /scene2
    #[arg(long)]
    route: Option<String>,
    /// Stop after this many seconds
    #[arg(long, default_value = "60")]
    seconds: u64,
    /// Frames per second
    #[arg(long, default_value = "60")]
    fps: u32,
    /// Real seconds per session minute (defaults to timer.minute_secs)
    #[arg(long)]
    minute_secs: Option<u64>,
    /// User name carried into the session
    #[arg(long)]
    user: Option<String>,
    /// Planned duration in minutes
    #[arg(long)]
    duration: Option<u32>,
    /// Leave the session idle until `start` is typed
    #[arg(long)]
    idle: bool,
}

/// Prints every event as one JSON line.
struct StdoutSink;

impl EventSink for StdoutSink {
    fn emit(&mut self, event: Event) {
        match serde_json::to_string(&event) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, "failed to encode event"),
        }
    }
}

pub fn run(args: RunArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let params = config.session_params()?;

    let mut profile = config.profile();
    if let Some(user) = args.user.clone() {
        profile.user_name = user;
    }
    if let Some(minutes) = args.duration {
        profile.duration_minutes = minutes;
    }

    let session = match &args.route {
        Some(path) => {
            let route: Route = path.parse()?;
            LaunchRequest { route, profile }
                .launch(&params)
                .ok_or_else(|| format!("route {route} has no scene"))?
        }
        None => {
            let name = args.scene.as_deref().unwrap_or(&config.scene.default);
            ScenePreset::by_name(name)?.build(&params, profile)
        }
    };

    let minute = Duration::from_secs(args.minute_secs.unwrap_or(config.timer.minute_secs).max(1));
    let frame = Duration::from_secs_f64(1.0 / f64::from(args.fps.max(1)));
    let total = Duration::from_secs(args.seconds);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .enable_io()
        .build()?;
    let result = runtime.block_on(drive(session, frame, minute, total, !args.idle));
    // A pending stdin read would otherwise hold the runtime open.
    runtime.shutdown_background();
    result
}

async fn drive(
    mut session: SessionController,
    frame: Duration,
    minute: Duration,
    total: Duration,
    autostart: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut sink = StdoutSink;
    let origin = Instant::now();

    let mut frames = tokio::time::interval(frame);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut minutes = tokio::time::interval_at(origin + minute, minute);
    minutes.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let deadline = tokio::time::sleep(total);
    tokio::pin!(deadline);

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;
    let mut last_frame = origin;

    if autostart {
        sink.emit_opt(session.start());
    }

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            at = frames.tick() => {
                let dt_ms = at.duration_since(last_frame).as_secs_f64() * 1000.0;
                last_frame = at;
                let now_ms = chrono::Utc::now().timestamp_millis() as f64;
                session.per_frame_into(FrameTick::with_dt(now_ms, dt_ms), &mut sink);
            }
            _ = minutes.tick() => {
                sink.emit_opt(session.minute_tick());
            }
            line = input.next_line(), if input_open => {
                match line {
                    Ok(Some(line)) => {
                        if !apply_input(&mut session, line.trim(), &mut minutes, &mut sink) {
                            break;
                        }
                    }
                    Ok(None) => input_open = false,
                    Err(e) => {
                        tracing::warn!(error = %e, "stdin closed");
                        input_open = false;
                    }
                }
            }
        }
    }

    sink.emit_opt(session.stop());
    sink.emit(session.snapshot());
    Ok(())
}

/// Returns false when the user asked to quit.
///
/// A start that takes effect re-arms `minutes`, so the first minute is a full
/// minute of activity.
fn apply_input(
    session: &mut SessionController,
    line: &str,
    minutes: &mut Interval,
    sink: &mut impl EventSink,
) -> bool {
    match line {
        "+" | "faster" => sink.emit_opt(session.increase_speed()),
        "-" | "slower" => sink.emit_opt(session.decrease_speed()),
        "start" => {
            if let Some(event) = session.start() {
                minutes.reset();
                sink.emit(event);
            }
        }
        "stop" => sink.emit_opt(session.stop()),
        "status" => sink.emit(session.snapshot()),
        "quit" | "q" => return false,
        "" => {}
        other => tracing::warn!(input = other, "unrecognized command"),
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle_session() -> SessionController {
        ScenePreset::by_name("vr")
            .unwrap()
            .build(&Default::default(), Default::default())
    }

    #[tokio::test(start_paused = true)]
    async fn start_rearms_the_minute_clock() {
        let minute = Duration::from_secs(60);
        let origin = Instant::now();
        let mut minutes = tokio::time::interval_at(origin + minute, minute);
        let mut session = idle_session();
        let mut events: Vec<Event> = Vec::new();

        tokio::time::advance(Duration::from_secs(55)).await;
        assert!(apply_input(&mut session, "start", &mut minutes, &mut events));
        assert!(matches!(&events[..], [Event::SessionStarted { .. }]));

        let fired = minutes.tick().await;
        assert_eq!(fired.duration_since(origin), Duration::from_secs(115));
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_start_keeps_the_minute_phase() {
        let minute = Duration::from_secs(60);
        let origin = Instant::now();
        let mut minutes = tokio::time::interval_at(origin + minute, minute);
        let mut session = idle_session();
        let mut events: Vec<Event> = Vec::new();

        apply_input(&mut session, "start", &mut minutes, &mut events);
        tokio::time::advance(Duration::from_secs(30)).await;
        apply_input(&mut session, "start", &mut minutes, &mut events);
        assert_eq!(events.len(), 1);

        let fired = minutes.tick().await;
        assert_eq!(fired.duration_since(origin), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn quit_ends_the_loop() {
        let mut minutes = tokio::time::interval(Duration::from_secs(60));
        let mut session = idle_session();
        let mut events: Vec<Event> = Vec::new();
        assert!(!apply_input(&mut session, "quit", &mut minutes, &mut events));
        assert!(events.is_empty());
    }
}
