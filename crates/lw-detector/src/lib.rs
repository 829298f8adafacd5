//! `lw-detector` — point detectors driven by move notifications.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                   |
//! |------------------|------------------------------------------------------------|
//! | [`instant_loop`] | `InstantInductLoop<S>` — the point detector observer       |
//! | [`crossing`]     | Crossing-time interpolation, `CrossingRecord`, `CrossingKind` |
//! | [`dwell`]        | `DwellTable` — vehicle id → open-crossing entry time       |
//! | [`filter`]       | `VehicleTypeFilter`                                        |
//! | [`config`]       | `DetectorConfig`, `LoopOptions`                            |
//!
//! # Crossing model
//!
//! ```text
//!            monitored position p
//!                    │
//!   step k:  [back ──┼── front]          front crosses p  → entry time
//!   step k+n:        │  [back ──── front] back crosses p   → exit time, `pass`
//! ```
//!
//! Both instants are interpolated linearly inside the step window using the
//! old and new samples of the edge that crossed.
//!
//! # Cargo features
//!
//! | Feature   | Effect                                               |
//! |-----------|------------------------------------------------------|
//! | `fx-hash` | FxHash for the dwell table (integer keys).           |
//! | `serde`   | `Deserialize`/`Serialize` on the config types.       |

pub mod config;
pub mod crossing;
pub mod dwell;
pub mod filter;
pub mod instant_loop;

#[cfg(test)]
mod tests;

pub use config::{DetectorConfig, LoopOptions};
pub use crossing::{CrossingKind, CrossingRecord, passing_fraction, passing_time};
pub use dwell::DwellTable;
pub use filter::VehicleTypeFilter;
pub use instant_loop::{InstantInductLoop, LoopStats};
