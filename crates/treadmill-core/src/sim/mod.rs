mod light;
mod metrics;
mod motion;
mod session;
mod speed;
mod timer;

pub use light::{lerp, LightOscillator, MaterialParams, DEFAULT_ANGULAR_FREQUENCY};
pub use metrics::{MetricsAccumulator, SessionMetrics, DEFAULT_CALORIES_PER_UNIT};
pub use motion::{DeltaSource, MotionIntegrator, MotionReport, Rotator, StepOutcome, TrackedObject};
pub use session::{EventClock, FrameTick, SessionController, SessionParams, SessionProfile, SessionState};
pub use speed::SpeedController;
pub use timer::{MinuteTick, SessionTimer, DEFAULT_MILESTONE_EVERY};
