//! Sub-step crossing times and the finished-crossing record.

use lw_core::VehicleId;
use lw_notify::StepContext;
use lw_output::EventKind;

/// Speeds below this are treated as standing still.
pub const SPEED_EPS: f64 = 1e-6;

/// Fraction of the step at which an edge moving `old_pos → new_pos` reaches
/// `target`, in `[0, 1]`.
///
/// Linear in position.  A vehicle with numerically zero speed (or zero
/// displacement) is placed at the end of the step.
pub fn passing_fraction(old_pos: f64, target: f64, new_pos: f64, new_speed: f64) -> f64 {
    let travelled = new_pos - old_pos;
    if new_speed.abs() < SPEED_EPS || travelled <= 0.0 {
        return 1.0;
    }
    ((target - old_pos) / travelled).clamp(0.0, 1.0)
}

/// Simulated time at which an edge moving `old_pos → new_pos` during `ctx`
/// reaches `target`.
#[inline]
pub fn passing_time(
    ctx:       &StepContext,
    old_pos:   f64,
    target:    f64,
    new_pos:   f64,
    new_speed: f64,
) -> f64 {
    ctx.time_at(passing_fraction(old_pos, target, new_pos, new_speed))
}

/// How a crossing ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrossingKind {
    /// The trailing edge cleared the detector.
    Pass,
    /// The vehicle changed lanes while on the detector.
    DismissLaneChange,
    /// The vehicle was removed while on the detector.
    DismissRemoval,
}

impl From<CrossingKind> for EventKind {
    fn from(kind: CrossingKind) -> Self {
        match kind {
            CrossingKind::Pass              => EventKind::Pass,
            CrossingKind::DismissLaneChange => EventKind::DismissLaneChange,
            CrossingKind::DismissRemoval    => EventKind::DismissRemoval,
        }
    }
}

/// A finalized crossing.  Emitted to the sink, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossingRecord {
    pub vehicle:    VehicleId,
    pub entry_time: f64,
    /// Always `>= entry_time`.
    pub exit_time:  f64,
    pub exit_speed: f64,
    pub kind:       CrossingKind,
}

impl CrossingRecord {
    /// Time the detector was occupied by this vehicle.
    #[inline]
    pub fn occupancy(&self) -> f64 {
        self.exit_time - self.entry_time
    }
}
