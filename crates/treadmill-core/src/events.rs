use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sim::SessionState;

/// Every outward signal from a session is an Event.
/// Hosts either poll the returned values or route them through an [`EventSink`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        user_name: String,
        duration_minutes: u32,
        at: DateTime<Utc>,
    },
    SessionStopped {
        distance: f64,
        calories: f64,
        elapsed_minutes: u32,
        at: DateTime<Utc>,
    },
    /// Fired each time the elapsed minute count reaches a multiple of the
    /// milestone interval. No acknowledgment is expected.
    MilestoneReached {
        elapsed_minutes: u32,
        at: DateTime<Utc>,
    },
    SpeedChanged {
        from: f64,
        to: f64,
        at: DateTime<Utc>,
    },
    /// A tracked object ran past its threshold and snapped back.
    ObjectReset {
        object_id: String,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: SessionState,
        distance: f64,
        calories: f64,
        elapsed_minutes: u32,
        speed: f64,
        light_intensity: f64,
        positions: Vec<ObjectPosition>,
        at: DateTime<Utc>,
    },
}

/// Position of one tracked object as seen by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectPosition {
    pub id: String,
    pub axis_position: f64,
}

impl Event {
    pub fn is_milestone(&self) -> bool {
        matches!(self, Event::MilestoneReached { .. })
    }
}

/// Receiver for fire-and-forget events.
pub trait EventSink {
    fn emit(&mut self, event: Event);

    /// Emit the result of a command that may have been a no-op.
    fn emit_opt(&mut self, event: Option<Event>) {
        if let Some(event) = event {
            self.emit(event);
        }
    }
}

impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

/// Adapts a closure into an [`EventSink`].
pub struct CallbackSink<F>(pub F);

impl<F> EventSink for CallbackSink<F>
where
    F: FnMut(Event),
{
    fn emit(&mut self, event: Event) {
        (self.0)(event)
    }
}
