//! The `MoveObserver` trait — the one interface detectors and devices share.

use lw_core::{LaneId, ObserverId, Vehicle};

use crate::{EnterReason, LeaveReason, NotifyResult, StepContext};

/// Something that wants to hear about vehicles moving through a region.
///
/// Only [`id`][Self::id] is required.  Every notification has a default that
/// keeps contact and does nothing, so an observer overrides just the calls it
/// reacts to.  Extra roles (holding a vehicle, writing to a sink) are added
/// by composition in the implementing type, never by further traits on top
/// of this one.
///
/// # Example
///
/// ```rust,ignore
/// struct Counter { id: ObserverId, seen: u32 }
///
/// impl MoveObserver for Counter {
///     fn id(&self) -> &ObserverId { &self.id }
///
///     fn on_enter(&mut self, _v: &dyn Vehicle, _r: EnterReason, _c: &StepContext) -> NotifyResult<bool> {
///         self.seen += 1;
///         Ok(false) // counted; no further notifications needed
///     }
/// }
/// ```
pub trait MoveObserver {
    /// Unique, stable identity of this observer.
    fn id(&self) -> &ObserverId;

    /// First contact with `vehicle`.
    ///
    /// Return `false` to decline: the observer then receives neither
    /// `on_move` nor `on_leave` for this contact.
    fn on_enter(
        &mut self,
        _vehicle: &dyn Vehicle,
        _reason:  EnterReason,
        _ctx:     &StepContext,
    ) -> NotifyResult<bool> {
        Ok(true)
    }

    /// The vehicle moved from `old_pos` to `new_pos` during `ctx`.
    ///
    /// The caller guarantees `old_pos <= new_pos`.  Return `false` once the
    /// observer no longer needs updates for this vehicle.
    fn on_move(
        &mut self,
        _vehicle:   &dyn Vehicle,
        _old_pos:   f64,
        _new_pos:   f64,
        _new_speed: f64,
        _ctx:       &StepContext,
    ) -> NotifyResult<bool> {
        Ok(true)
    }

    /// Contact ended.  `entered_lane` is the target lane of a lane change.
    ///
    /// The returned flag is an acknowledgement only; callers use it for
    /// diagnostics.
    fn on_leave(
        &mut self,
        _vehicle:      &dyn Vehicle,
        _last_pos:     f64,
        _reason:       LeaveReason,
        _entered_lane: Option<LaneId>,
        _ctx:          &StepContext,
    ) -> NotifyResult<bool> {
        Ok(true)
    }

    /// Number of vehicles this observer still holds per-vehicle state for.
    ///
    /// Diagnostic only: the motion source checks it to catch leaked entries.
    fn open_entries(&self) -> usize {
        0
    }

    /// Flush any output at the end of the run.
    fn close(&mut self) -> NotifyResult<()> {
        Ok(())
    }
}

/// Enforce the motion-source precondition `old_pos <= new_pos`.
///
/// # Panics
///
/// Panics if the vehicle moved backwards within one step.  This is a bug in
/// the caller and cannot be handled by an observer.
#[inline]
#[track_caller]
pub fn assert_forward_motion(vehicle: &dyn Vehicle, old_pos: f64, new_pos: f64) {
    assert!(
        old_pos <= new_pos,
        "vehicle {} moved backwards within a step ({old_pos} -> {new_pos})",
        vehicle.id(),
    );
}
