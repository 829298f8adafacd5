//! `lw-device` — observers bound to one vehicle for its whole life.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                    |
//! |----------------|-------------------------------------------------------------|
//! | [`holder`]     | `Holder` — identity of the vehicle a device is bound to     |
//! | [`device`]     | `VehicleDevice` trait, `DeviceBinding`                      |
//! | [`collection`] | `VehicleDevices` — the devices of one vehicle, keyed by id  |
//! | [`registry`]   | `DeviceRegistry` — factories keyed by device kind           |
//! | [`trip`]       | `TripDevice`, `TripInfo` — per-trip summary                 |
//! | [`error`]      | `DeviceError`, `DeviceResult<T>`                            |
//!
//! # Holder lifetime
//!
//! A device never borrows its vehicle.  It stores the holder's identity at
//! construction and receives the live vehicle as `&dyn Vehicle` in each
//! notification.  The motion source drops a vehicle's `VehicleDevices`
//! together with the vehicle, after the final `on_leave`, so a device never
//! outlives its holder.

pub mod collection;
pub mod device;
pub mod error;
pub mod holder;
pub mod registry;
pub mod trip;


pub use collection::VehicleDevices;
pub use device::{DeviceBinding, VehicleDevice, device_id};
pub use error::{DeviceError, DeviceResult};
pub use holder::Holder;
pub use registry::{DeviceFactory, DeviceRegistry};
pub use trip::{TripDevice, TripInfo, TripLog};
