//! Built-in scene presets.
//!
//! A preset describes what the simulation needs to know about a scene: the
//! tracked objects, how far they move per frame, whether the model spins,
//! and the static light rig the renderer should place. Geometry and
//! materials stay with the renderer.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::sim::{
    DeltaSource, MotionIntegrator, Rotator, SessionController, SessionParams, SessionProfile,
    TrackedObject,
};

/// Per-frame distance of the runway belts.
const RUNWAY_DELTA: f64 = 0.005;
const RUNWAY_THRESHOLD: f64 = 25.0;

/// Static light placed by the renderer. Colors are 0xRRGGBB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LightSpec {
    Ambient {
        intensity: f64,
    },
    Hemisphere {
        intensity: f64,
        sky_color: u32,
        ground_color: u32,
    },
    Directional {
        position: [f64; 3],
        intensity: f64,
        cast_shadow: bool,
    },
    Spot {
        position: [f64; 3],
        intensity: f64,
        angle: f64,
        penumbra: f64,
        cast_shadow: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenePreset {
    pub name: String,
    pub description: String,
    pub objects: Vec<TrackedObject>,
    pub delta_source: DeltaSource,
    /// Index into `objects` of the one object credited with distance.
    pub distance_source: Option<usize>,
    pub spins: bool,
    pub lights: Vec<LightSpec>,
}

impl ScenePreset {
    /// Single belt driven by the speed controller, model slowly spinning.
    pub fn vr() -> Self {
        Self {
            name: "vr".into(),
            description: "Spinning treadmill under a pulsing spotlight".into(),
            objects: vec![TrackedObject::new("belt", -15.0, 20.0)],
            delta_source: DeltaSource::Speed,
            distance_source: Some(0),
            spins: true,
            lights: vec![
                LightSpec::Ambient { intensity: 0.2 },
                LightSpec::Spot {
                    position: [0.0, 5.0, 10.0],
                    intensity: 1.5,
                    angle: std::f64::consts::FRAC_PI_4,
                    penumbra: 0.3,
                    cast_shadow: true,
                },
            ],
        }
    }

    /// Three treadmills rolling toward the camera on a fixed step.
    pub fn runway() -> Self {
        Self {
            name: "runway".into(),
            description: "Three treadmills rolling past the camera".into(),
            objects: vec![
                TrackedObject::new("treadmill-1", -9.0, RUNWAY_THRESHOLD),
                TrackedObject::new("treadmill-2", -10.0, RUNWAY_THRESHOLD),
                TrackedObject::new("treadmill-3", -9.0, RUNWAY_THRESHOLD),
            ],
            delta_source: DeltaSource::Fixed(RUNWAY_DELTA),
            distance_source: Some(0),
            spins: false,
            lights: vec![
                LightSpec::Ambient { intensity: 0.5 },
                LightSpec::Hemisphere {
                    intensity: 0.3,
                    sky_color: 0x87ceeb,
                    ground_color: 0xaaaaaa,
                },
                LightSpec::Directional {
                    position: [5.0, 5.0, 5.0],
                    intensity: 0.8,
                    cast_shadow: true,
                },
                LightSpec::Directional {
                    position: [-5.0, 5.0, -5.0],
                    intensity: 0.8,
                    cast_shadow: true,
                },
                LightSpec::Spot {
                    position: [0.0, 10.0, 0.0],
                    intensity: 1.0,
                    angle: std::f64::consts::FRAC_PI_4,
                    penumbra: 0.5,
                    cast_shadow: true,
                },
            ],
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::vr(), Self::runway()]
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownScene`] for names without a preset.
    pub fn by_name(name: &str) -> Result<Self, ValidationError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "vr" | "vrscene" => Ok(Self::vr()),
            "runway" | "scene2" => Ok(Self::runway()),
            _ => Err(ValidationError::UnknownScene(name.to_string())),
        }
    }

    /// Build an idle session for this scene.
    pub fn build(&self, params: &SessionParams, profile: SessionProfile) -> SessionController {
        let motion = MotionIntegrator::new(self.objects.clone(), self.delta_source)
            .with_distance_source(self.distance_source);
        let session = SessionController::new(motion, params).with_profile(profile);
        if self.spins {
            session.with_rotator(Rotator::new(params.rotation_per_frame))
        } else {
            session
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::FrameTick;

    #[test]
    fn lookup_accepts_aliases() {
        assert_eq!(ScenePreset::by_name("VR").unwrap().name, "vr");
        assert_eq!(ScenePreset::by_name("scene2").unwrap().name, "runway");
        assert_eq!(
            ScenePreset::by_name("moon"),
            Err(ValidationError::UnknownScene("moon".into()))
        );
    }

    #[test]
    fn runway_counts_one_belt_only() {
        let mut session =
            ScenePreset::runway().build(&SessionParams::default(), SessionProfile::default());
        session.start();
        for i in 0..200 {
            session.per_frame(FrameTick::at(i as f64));
        }
        assert!((session.metrics().distance - 200.0 * RUNWAY_DELTA).abs() < 1e-9);
        assert_eq!(session.objects().len(), 3);
    }

    #[test]
    fn vr_spins_and_runway_does_not() {
        let params = SessionParams::default();
        let mut vr = ScenePreset::vr().build(&params, SessionProfile::default());
        let mut runway = ScenePreset::runway().build(&params, SessionProfile::default());
        vr.per_frame(FrameTick::at(0.0));
        runway.per_frame(FrameTick::at(0.0));
        assert_eq!(vr.yaw(), Some(params.rotation_per_frame));
        assert_eq!(runway.yaw(), None);
    }
}
