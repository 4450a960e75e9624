//! Per-frame motion of scene objects.
//!
//! Every [`TrackedObject`] moves along a single axis. When a step would carry
//! it past its threshold it snaps back to its reset position in the same
//! frame. This is a hard reset: the overflow is discarded.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

/// One object moving along a single axis with hard reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedObject {
    id: String,
    axis_position: f64,
    reset_position: f64,
    reset_threshold: f64,
}

/// Outcome of stepping a single object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Held,
    Moved,
    Reset,
}

impl TrackedObject {
    /// Create an object sitting at its reset position.
    pub fn new(id: impl Into<String>, reset_position: f64, reset_threshold: f64) -> Self {
        Self {
            id: id.into(),
            axis_position: reset_position,
            reset_position,
            reset_threshold,
        }
    }

    /// Place the object somewhere other than its reset position.
    pub fn at(mut self, axis_position: f64) -> Self {
        self.axis_position = axis_position;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn axis_position(&self) -> f64 {
        self.axis_position
    }

    pub fn reset_position(&self) -> f64 {
        self.reset_position
    }

    pub fn reset_threshold(&self) -> f64 {
        self.reset_threshold
    }

    /// Advance by `delta` if `active`.
    pub fn step(&mut self, delta: f64, active: bool) -> StepOutcome {
        if !active {
            return StepOutcome::Held;
        }
        let next = self.axis_position + delta;
        if next > self.reset_threshold {
            self.axis_position = self.reset_position;
            StepOutcome::Reset
        } else {
            self.axis_position = next;
            StepOutcome::Moved
        }
    }
}

/// Where the per-frame step size comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DeltaSource {
    /// A constant distance per frame.
    Fixed(f64),
    /// The speed controller's current value.
    Speed,
}

impl DeltaSource {
    pub fn resolve(self, speed: f64) -> f64 {
        match self {
            DeltaSource::Fixed(delta) => delta,
            DeltaSource::Speed => speed,
        }
    }
}

/// What a single integrator pass produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionReport {
    /// Distance to credit to the session. Non-zero only when the
    /// distance-source object moved.
    pub distance_delta: f64,
    /// Ids of objects that snapped back this frame.
    pub resets: Vec<String>,
}

/// Steps every tracked object once per frame.
///
/// Objects are independent of each other. Exactly one object (the distance
/// source) credits its delta to the session so that multi-object scenes do
/// not count the same belt travel several times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionIntegrator {
    objects: Vec<TrackedObject>,
    delta_source: DeltaSource,
    distance_source: Option<usize>,
}

impl MotionIntegrator {
    /// The first object, if any, becomes the distance source.
    pub fn new(objects: Vec<TrackedObject>, delta_source: DeltaSource) -> Self {
        let distance_source = if objects.is_empty() { None } else { Some(0) };
        Self {
            objects,
            delta_source,
            distance_source,
        }
    }

    /// Choose which object reports distance. Out-of-range indices disable
    /// distance reporting entirely.
    pub fn with_distance_source(mut self, index: Option<usize>) -> Self {
        self.distance_source = index.filter(|i| *i < self.objects.len());
        self
    }

    pub fn objects(&self) -> &[TrackedObject] {
        &self.objects
    }

    pub fn object(&self, id: &str) -> Option<&TrackedObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn delta_source(&self) -> DeltaSource {
        self.delta_source
    }

    pub fn distance_source(&self) -> Option<&TrackedObject> {
        self.distance_source.and_then(|i| self.objects.get(i))
    }

    /// Step size for this frame given the current speed and a frame scale.
    pub fn frame_delta(&self, speed: f64, scale: f64) -> f64 {
        self.delta_source.resolve(speed) * scale
    }

    /// Move every object by `delta`. Inactive passes leave all positions alone.
    pub fn advance(&mut self, delta: f64, active: bool) -> MotionReport {
        let mut report = MotionReport::default();
        if !active {
            return report;
        }
        for (index, object) in self.objects.iter_mut().enumerate() {
            let outcome = object.step(delta, true);
            if outcome == StepOutcome::Reset {
                tracing::debug!(object = %object.id, "tracked object reset");
                report.resets.push(object.id.clone());
            }
            if Some(index) == self.distance_source {
                report.distance_delta = delta;
            }
        }
        report
    }
}

/// Continuous spin about the vertical axis, independent of the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotator {
    yaw: f64,
    per_frame: f64,
}

impl Rotator {
    pub fn new(per_frame: f64) -> Self {
        Self {
            yaw: 0.0,
            per_frame,
        }
    }

    /// Current yaw in radians, normalized to `[0, 2π)`.
    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn per_frame(&self) -> f64 {
        self.per_frame
    }

    pub fn advance(&mut self, scale: f64) {
        self.yaw = (self.yaw + self.per_frame * scale).rem_euclid(TAU);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_reset_discards_overflow() {
        let mut obj = TrackedObject::new("belt", -15.0, 20.0).at(19.998);
        assert_eq!(obj.step(0.005, true), StepOutcome::Reset);
        assert_eq!(obj.axis_position(), -15.0);
    }

    #[test]
    fn landing_exactly_on_threshold_is_not_a_reset() {
        let mut obj = TrackedObject::new("belt", 0.0, 1.0).at(0.5);
        assert_eq!(obj.step(0.5, true), StepOutcome::Moved);
        assert_eq!(obj.axis_position(), 1.0);
    }

    #[test]
    fn inactive_step_holds_position() {
        let mut obj = TrackedObject::new("belt", -9.0, 25.0);
        assert_eq!(obj.step(1.0, false), StepOutcome::Held);
        assert_eq!(obj.axis_position(), -9.0);
    }

    #[test]
    fn objects_advance_independently() {
        let objects = vec![
            TrackedObject::new("a", -9.0, 25.0),
            TrackedObject::new("b", -10.0, 25.0).at(24.999),
            TrackedObject::new("c", -9.0, 25.0),
        ];
        let mut integrator = MotionIntegrator::new(objects, DeltaSource::Fixed(0.005));
        let report = integrator.advance(0.005, true);

        assert_eq!(report.resets, vec!["b".to_string()]);
        assert!((integrator.objects()[0].axis_position() - (-8.995)).abs() < 1e-12);
        assert_eq!(integrator.objects()[1].axis_position(), -10.0);
        assert!((integrator.objects()[2].axis_position() - (-8.995)).abs() < 1e-12);
    }

    #[test]
    fn only_distance_source_reports() {
        let objects = vec![
            TrackedObject::new("a", 0.0, 100.0),
            TrackedObject::new("b", 0.0, 100.0),
        ];
        let mut integrator = MotionIntegrator::new(objects, DeltaSource::Speed);
        let report = integrator.advance(0.25, true);
        assert_eq!(report.distance_delta, 0.25);

        let mut silent = integrator.clone().with_distance_source(None);
        assert_eq!(silent.advance(0.25, true).distance_delta, 0.0);
    }

    #[test]
    fn reset_frame_still_credits_distance() {
        let objects = vec![TrackedObject::new("a", -15.0, 20.0).at(19.998)];
        let mut integrator = MotionIntegrator::new(objects, DeltaSource::Fixed(0.005));
        let report = integrator.advance(0.005, true);
        assert_eq!(report.distance_delta, 0.005);
        assert_eq!(report.resets.len(), 1);
    }

    #[test]
    fn inactive_pass_reports_nothing() {
        let objects = vec![TrackedObject::new("a", 0.0, 10.0)];
        let mut integrator = MotionIntegrator::new(objects, DeltaSource::Fixed(1.0));
        assert_eq!(integrator.advance(1.0, false), MotionReport::default());
        assert_eq!(integrator.objects()[0].axis_position(), 0.0);
    }

    #[test]
    fn delta_source_resolves_speed() {
        assert_eq!(DeltaSource::Fixed(0.005).resolve(9.0), 0.005);
        assert_eq!(DeltaSource::Speed.resolve(0.02), 0.02);
    }

    #[test]
    fn rotator_wraps_yaw() {
        let mut r = Rotator::new(1.0);
        for _ in 0..7 {
            r.advance(1.0);
        }
        assert!(r.yaw() >= 0.0 && r.yaw() < TAU);
        assert!((r.yaw() - (7.0 - TAU)).abs() < 1e-12);
    }
}
