//! The step window passed with every notification.

use lw_core::{Step, StepClock};

/// Time window of the step whose motion is being delivered.
///
/// Built once per step by the motion source and shared by every call made
/// during that step.  Positions passed to `on_move` are the samples at
/// `start_secs` (old) and `end_secs` (new).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepContext {
    pub step:       Step,
    pub start_secs: f64,
    pub end_secs:   f64,
}

impl StepContext {
    #[inline]
    pub fn new(step: Step, start_secs: f64, end_secs: f64) -> Self {
        Self { step, start_secs, end_secs }
    }

    /// Context for the clock's current step.
    #[inline]
    pub fn from_clock(clock: &StepClock) -> Self {
        Self::new(clock.current_step, clock.step_start_secs(), clock.step_end_secs())
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.end_secs - self.start_secs
    }

    /// Time at `fraction` ∈ [0, 1] of the way through the step.
    #[inline]
    pub fn time_at(&self, fraction: f64) -> f64 {
        self.start_secs + fraction * self.length()
    }
}
