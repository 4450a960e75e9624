//! Workout metrics accumulated from belt travel.

use serde::{Deserialize, Serialize};

/// Calories credited per unit of distance when no override is configured.
pub const DEFAULT_CALORIES_PER_UNIT: f64 = 0.05;

/// Snapshot of the session's workout figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub distance: f64,
    pub calories: f64,
    pub elapsed_minutes: u32,
}

/// Converts per-frame travel into distance and calories.
///
/// Calories are always derived from distance, never summed separately, so
/// `calories == distance * calories_per_unit` holds after every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsAccumulator {
    distance: f64,
    calories: f64,
    calories_per_unit: f64,
}

impl Default for MetricsAccumulator {
    fn default() -> Self {
        Self::new(DEFAULT_CALORIES_PER_UNIT)
    }
}

impl MetricsAccumulator {
    pub fn new(calories_per_unit: f64) -> Self {
        Self {
            distance: 0.0,
            calories: 0.0,
            calories_per_unit,
        }
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn calories(&self) -> f64 {
        self.calories
    }

    pub fn calories_per_unit(&self) -> f64 {
        self.calories_per_unit
    }

    /// Add travelled distance. Callers pass non-negative deltas.
    pub fn accumulate(&mut self, delta: f64) {
        self.distance += delta;
        self.calories = self.distance * self.calories_per_unit;
    }

    pub fn reset(&mut self) {
        self.distance = 0.0;
        self.calories = 0.0;
    }
}
