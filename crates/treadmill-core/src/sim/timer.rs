//! Whole-minute session clock with periodic milestones.
//!
//! The timer has no schedule of its own. The host calls [`SessionTimer::tick`]
//! once per minute and passes the live session flag; an inactive tick is
//! discarded rather than queued, so nothing counts after a stop.

use serde::{Deserialize, Serialize};

/// Minutes between milestone notifications when not configured.
pub const DEFAULT_MILESTONE_EVERY: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTimer {
    elapsed_minutes: u32,
    milestone_every: u32,
}

/// Result of one minute tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinuteTick {
    /// Session inactive, nothing counted.
    Suspended,
    Counted { elapsed_minutes: u32 },
    Milestone { elapsed_minutes: u32 },
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new(DEFAULT_MILESTONE_EVERY)
    }
}

impl SessionTimer {
    /// A zero interval is treated as "never".
    pub fn new(milestone_every: u32) -> Self {
        Self {
            elapsed_minutes: 0,
            milestone_every,
        }
    }

    pub fn elapsed_minutes(&self) -> u32 {
        self.elapsed_minutes
    }

    pub fn milestone_every(&self) -> u32 {
        self.milestone_every
    }

    pub fn tick(&mut self, active: bool) -> MinuteTick {
        if !active {
            return MinuteTick::Suspended;
        }
        self.elapsed_minutes = self.elapsed_minutes.saturating_add(1);
        let elapsed_minutes = self.elapsed_minutes;
        if self.milestone_every > 0 && elapsed_minutes % self.milestone_every == 0 {
            MinuteTick::Milestone { elapsed_minutes }
        } else {
            MinuteTick::Counted { elapsed_minutes }
        }
    }

    pub fn reset(&mut self) {
        self.elapsed_minutes = 0;
    }
}
