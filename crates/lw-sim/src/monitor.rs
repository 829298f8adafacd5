//! Progress hooks for [`Sim::run`][crate::Sim::run].

use lw_core::{Step, VehicleState};
use lw_notify::LeaveReason;

/// Callbacks invoked by the step loop.  All default to no-ops.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct Progress { every: u64 }
///
/// impl SimMonitor for Progress {
///     fn on_step_end(&mut self, step: Step, vehicles: usize) {
///         if step.0 % self.every == 0 {
///             println!("{step}: {vehicles} vehicles");
///         }
///     }
/// }
/// ```
pub trait SimMonitor {
    /// Called before any vehicle moves in `step`.
    fn on_step_start(&mut self, _step: Step) {}

    /// Called after every vehicle moved; `vehicles` is the count still running.
    fn on_step_end(&mut self, _step: Step, _vehicles: usize) {}

    /// Called after a vehicle's final `on_leave` has been delivered.
    fn on_vehicle_removed(&mut self, _vehicle: &VehicleState, _reason: LeaveReason) {}

    /// Called once after observers were closed.
    fn on_sim_end(&mut self, _final_step: Step) {}
}

/// A [`SimMonitor`] that does nothing.
pub struct NoopMonitor;

impl SimMonitor for NoopMonitor {}
