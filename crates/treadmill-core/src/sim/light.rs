//! Time-driven light intensity and the material parameters it feeds.

use serde::{Deserialize, Serialize};

/// Radians per millisecond of wall-clock time.
pub const DEFAULT_ANGULAR_FREQUENCY: f64 = 0.001;

/// Maps wall-clock time onto a smooth intensity in `[0, 1]`.
///
/// Stateless apart from the angular frequency; the host supplies `now`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightOscillator {
    angular_frequency: f64,
}

impl Default for LightOscillator {
    fn default() -> Self {
        Self::new(DEFAULT_ANGULAR_FREQUENCY)
    }
}

impl LightOscillator {
    pub fn new(angular_frequency: f64) -> Self {
        Self { angular_frequency }
    }

    pub fn angular_frequency(&self) -> f64 {
        self.angular_frequency
    }

    /// `(sin(now_ms * ω) + 1) / 2`.
    pub fn intensity(&self, now_ms: f64) -> f64 {
        ((now_ms * self.angular_frequency).sin() + 1.0) / 2.0
    }
}

pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Surface parameters the renderer applies to every mesh of the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialParams {
    pub roughness: f64,
    pub metalness: f64,
    pub emissive_intensity: f64,
}

impl MaterialParams {
    /// Dim light gives a rough, matte finish; full light a polished, glowing one.
    pub fn from_intensity(intensity: f64) -> Self {
        let t = intensity.clamp(0.0, 1.0);
        Self {
            roughness: lerp(0.4, 0.1, t),
            metalness: lerp(0.6, 1.0, t),
            emissive_intensity: lerp(0.0, 1.0, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn midpoint_at_time_origin() {
        assert_eq!(LightOscillator::default().intensity(0.0), 0.5);
    }

    #[test]
    fn peaks_and_troughs() {
        let osc = LightOscillator::new(1.0);
        let quarter = std::f64::consts::FRAC_PI_2;
        assert!((osc.intensity(quarter) - 1.0).abs() < 1e-12);
        assert!(osc.intensity(3.0 * quarter).abs() < 1e-12);
    }

    #[test]
    fn material_bounds() {
        let dark = MaterialParams::from_intensity(0.0);
        let bright = MaterialParams::from_intensity(1.0);
        assert_eq!(dark.roughness, 0.4);
        assert_eq!(dark.metalness, 0.6);
        assert_eq!(dark.emissive_intensity, 0.0);
        assert!((bright.roughness - 0.1).abs() < 1e-12);
        assert_eq!(bright.metalness, 1.0);
        assert_eq!(bright.emissive_intensity, 1.0);
    }

    proptest! {
        #[test]
        fn intensity_in_unit_range(now in -1.0e12f64..1.0e12) {
            let i = LightOscillator::default().intensity(now);
            prop_assert!((0.0..=1.0).contains(&i));
        }

        #[test]
        fn intensity_is_continuous(now in 0.0f64..1.0e9, step in 0.0f64..16.7) {
            // |d/dt| <= ω / 2
            let osc = LightOscillator::default();
            let jump = (osc.intensity(now + step) - osc.intensity(now)).abs();
            prop_assert!(jump <= step * DEFAULT_ANGULAR_FREQUENCY / 2.0 + 1e-9);
        }
    }
}
