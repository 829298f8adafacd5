//! Simulation time model.
//!
//! # Design
//!
//! Time advances in discrete steps.  The canonical counter is the integer
//! `Step`; the mapping to simulated seconds is held in `StepClock`:
//!
//!   step_start = begin_secs + step * step_length_secs
//!   step_end   = step_start + step_length_secs
//!
//! Notifications delivered during a step describe motion over the half-open
//! window `[step_start, step_end)`.  Observers that need sub-step precision
//! (induction loops) interpolate inside that window; everything else only
//! ever sees step boundaries.

use std::fmt;

use crate::{LwError, LwResult};

// ── Step ──────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step(pub u64);

impl Step {
    pub const ZERO: Step = Step(0);

    /// Return the step `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Step {
        Step(self.0 + n)
    }
}

impl std::ops::Add<u64> for Step {
    type Output = Step;
    #[inline]
    fn add(self, rhs: u64) -> Step {
        Step(self.0 + rhs)
    }
}

impl std::ops::Sub for Step {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Step) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

// ── StepClock ─────────────────────────────────────────────────────────────────

/// Converts between step counts and simulated seconds.
#[derive(Clone, Debug)]
pub struct StepClock {
    /// Simulated time (seconds) at the start of step 0.
    pub begin_secs: f64,
    /// Length of one step in seconds.
    pub step_length_secs: f64,
    /// The step currently being processed, advanced by `StepClock::advance()`.
    pub current_step: Step,
}

impl StepClock {
    pub fn new(begin_secs: f64, step_length_secs: f64) -> Self {
        Self {
            begin_secs,
            step_length_secs,
            current_step: Step::ZERO,
        }
    }

    /// Advance the clock by one step.
    #[inline]
    pub fn advance(&mut self) {
        self.current_step = Step(self.current_step.0 + 1);
    }

    /// Simulated time at the start of `step`.
    #[inline]
    pub fn time_of(&self, step: Step) -> f64 {
        self.begin_secs + step.0 as f64 * self.step_length_secs
    }

    /// Start of the current step's window.
    #[inline]
    pub fn step_start_secs(&self) -> f64 {
        self.time_of(self.current_step)
    }

    /// End of the current step's window.
    #[inline]
    pub fn step_end_secs(&self) -> f64 {
        self.time_of(self.current_step + 1)
    }
}

impl fmt::Display for StepClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (t={:.2}s)", self.current_step, self.step_start_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Typically deserialized by the application (feature `serde`) and handed to
/// the motion source.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Simulated time of step 0 in seconds.
    pub begin_secs: f64,

    /// Seconds per step.  Must be positive.
    pub step_length_secs: f64,

    /// Total steps to simulate.
    pub total_steps: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            begin_secs:       0.0,
            step_length_secs: 1.0,
            total_steps:      3_600,
            seed:             42,
        }
    }
}

impl SimConfig {
    /// The step at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_step(&self) -> Step {
        Step(self.total_steps)
    }

    /// Construct a `StepClock` pre-configured for this run.
    pub fn make_clock(&self) -> StepClock {
        StepClock::new(self.begin_secs, self.step_length_secs)
    }

    /// Reject configurations the step loop cannot run.
    pub fn validate(&self) -> LwResult<()> {
        if !(self.step_length_secs.is_finite() && self.step_length_secs > 0.0) {
            return Err(LwError::Config(format!(
                "step length must be positive, got {}",
                self.step_length_secs
            )));
        }
        if !self.begin_secs.is_finite() {
            return Err(LwError::Config("begin time must be finite".into()));
        }
        Ok(())
    }
}
