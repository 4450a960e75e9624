//! Bounded belt speed driven by discrete up/down commands.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Half of the dial sweep, in radians (135°).
const DIAL_HALF_SWEEP: f64 = 3.0 * std::f64::consts::FRAC_PI_4;

/// Current speed plus the range it is clamped to.
///
/// `min <= value <= max` holds after construction and after every command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedController {
    value: f64,
    min: f64,
    max: f64,
    step: f64,
}

impl Default for SpeedController {
    fn default() -> Self {
        Self {
            value: 0.005,
            min: 0.001,
            max: 0.05,
            step: 0.001,
        }
    }
}

impl SpeedController {
    /// # Errors
    ///
    /// Rejects inverted ranges, non-positive steps and an initial value
    /// outside the range.
    pub fn new(value: f64, min: f64, max: f64, step: f64) -> Result<Self, ValidationError> {
        if !(min <= max) {
            return Err(ValidationError::InvalidSpeedRange { min, max });
        }
        if !(step > 0.0) {
            return Err(ValidationError::NonPositiveStep(step));
        }
        if !(min..=max).contains(&value) {
            return Err(ValidationError::SpeedOutOfRange { value, min, max });
        }
        Ok(Self {
            value,
            min,
            max,
            step,
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Raise by one step, saturating at `max`. Returns whether the value moved.
    pub fn increase(&mut self) -> bool {
        let next = (self.value + self.step).min(self.max);
        self.replace(next)
    }

    /// Lower by one step, saturating at `min`. Returns whether the value moved.
    pub fn decrease(&mut self) -> bool {
        let next = (self.value - self.step).max(self.min);
        self.replace(next)
    }

    /// Dial needle angle in radians, from -135° at `min` to +135° at `max`.
    pub fn dial_angle(&self) -> f64 {
        let span = self.max - self.min;
        let fraction = if span > 0.0 {
            (self.value - self.min) / span
        } else {
            0.5
        };
        (fraction * 2.0 - 1.0) * DIAL_HALF_SWEEP
    }

    fn replace(&mut self, next: f64) -> bool {
        let changed = next != self.value;
        if changed {
            tracing::debug!(from = self.value, to = next, "speed changed");
            self.value = next;
        }
        changed
    }
}
