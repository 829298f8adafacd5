//! The `Driver` trait — decides what each vehicle does in a step.

use lw_core::{LaneId, VehicleRng, VehicleState};
use lw_notify::{LeaveReason, StepContext};

/// What one vehicle does during one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Maneuver {
    /// Drive forward at `speed` (m/s) for the whole step.
    Advance { speed: f64 },
    /// Move sideways to lane `to`, keeping the position.
    ChangeLane { to: LaneId },
    /// Reached the destination; the vehicle is removed.
    Arrive,
    /// Removed for `reason` (`teleported`, `vaporized`, ...).
    Remove(LeaveReason),
}

/// Pluggable driving model.
///
/// Called once per vehicle per step, in ascending `VehicleId` order, with
/// the vehicle's own RNG so behavior is reproducible per vehicle.
pub trait Driver {
    fn maneuver(
        &mut self,
        vehicle: &VehicleState,
        lane:    LaneId,
        ctx:     &StepContext,
        rng:     &mut VehicleRng,
    ) -> Maneuver;
}

/// A [`Driver`] that advances every vehicle at the same fixed speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantSpeed(pub f64);

impl Driver for ConstantSpeed {
    fn maneuver(
        &mut self,
        _vehicle: &VehicleState,
        _lane:    LaneId,
        _ctx:     &StepContext,
        _rng:     &mut VehicleRng,
    ) -> Maneuver {
        Maneuver::Advance { speed: self.0 }
    }
}
