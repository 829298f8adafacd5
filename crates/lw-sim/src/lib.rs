//! `lw-sim` — a stepped reference motion source for lanewatch observers.
//!
//! # Step loop
//!
//! ```text
//! for step in 0..config.total_steps:
//!   for vehicle in ascending VehicleId:
//!     Driver::maneuver → Maneuver
//!       Advance { speed }  → pos += speed·dt; on_move to lane contacts + devices;
//!                            trailing edge past lane end → on_leave(normal), removed
//!       ChangeLane { to }  → on_leave(laneChange, to) here, on_enter(laneChange) there
//!       Arrive             → on_leave(arrived), removed
//!       Remove(reason)     → on_leave(reason), removed
//! at the end:
//!   every remaining vehicle → on_leave(vaporized); every observer → close()
//! ```
//!
//! Everything is single-threaded.  Notification errors (usually a failed
//! output sink) abort the step and are returned from [`Sim::run`].
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use lw_core::{LaneId, SimConfig, VehicleId, VehicleState};
//! use lw_sim::{ConstantSpeed, NoopMonitor, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), ConstantSpeed(13.9))
//!     .lane(LaneId(0), 500.0)
//!     .observer(LaneId(0), 250.0, Box::new(detector))
//!     .build()?;
//! sim.insert_vehicle(VehicleState::new(VehicleId(0), "veh0", "car", 5.0), LaneId(0))?;
//! sim.run(&mut NoopMonitor)?;
//! ```

pub mod builder;
pub mod driver;
pub mod error;
pub mod lane;
pub mod monitor;
pub mod sim;


pub use builder::SimBuilder;
pub use driver::{ConstantSpeed, Driver, Maneuver};
pub use error::{SimError, SimResult};
pub use lane::Lane;
pub use monitor::{NoopMonitor, SimMonitor};
pub use sim::Sim;
