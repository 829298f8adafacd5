//! `lw-notify` — the observer capability every detector and device implements.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`observer`] | `MoveObserver` trait                                           |
//! | [`reason`]   | `EnterReason`, `LeaveReason`                                   |
//! | [`context`]  | `StepContext` — the `[start, end)` window of the current step  |
//! | [`registry`] | `LaneObservers` — ordered, idempotent lane registration        |
//! | [`error`]    | `NotifyError`, `NotifyResult<T>`                               |
//!
//! # Protocol
//!
//! For one vehicle and one observer the motion source calls, in order:
//!
//! 1. `on_enter` once, on first contact.  Returning `false` declines contact.
//! 2. `on_move` every step while in contact.  Returning `false` ends
//!    notifications for that vehicle (the observer is done with it).
//! 3. `on_leave` exactly once when contact ends for any other reason.
//!
//! All calls are synchronous and run on the step loop's thread.  Observers
//! own their state outright; the protocol itself keeps nothing shared.

pub mod context;
pub mod error;
pub mod observer;
pub mod reason;
pub mod registry;


pub use context::StepContext;
pub use error::{NotifyError, NotifyResult};
pub use observer::{MoveObserver, assert_forward_motion};
pub use reason::{EnterReason, LeaveReason};
pub use registry::LaneObservers;
