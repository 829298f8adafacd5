//! `lw-core` — foundational types for the `lanewatch` notification core.
//!
//! This crate is a dependency of every other `lw-*` crate.  It has no `lw-*`
//! dependencies and only `rand` and `thiserror` externally (plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `VehicleId`, `LaneId`, `ObserverId`                   |
//! | [`time`]        | `Step`, `StepClock`, `SimConfig`                      |
//! | [`vehicle`]     | `Vehicle` handle trait, `VehicleState`                |
//! | [`rng`]         | `VehicleRng` (per-vehicle, deterministic)             |
//! | [`error`]       | `LwError`, `LwResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and `SimConfig`.     |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;
pub mod vehicle;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{LwError, LwResult};
pub use ids::{LaneId, ObserverId, VehicleId};
pub use rng::VehicleRng;
pub use time::{SimConfig, Step, StepClock};
pub use vehicle::{Vehicle, VehicleState};
