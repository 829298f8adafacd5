//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap each other with `#[from]`
//! as the call chain requires.  `LwError` covers the failures that can occur
//! before any observer is involved: bad configuration and unknown handles.

use thiserror::Error;

use crate::{LaneId, VehicleId};

/// The top-level error type for `lw-core`.
#[derive(Debug, Error)]
pub enum LwError {
    #[error("vehicle {0} not found")]
    VehicleNotFound(VehicleId),

    #[error("lane {0} not found")]
    LaneNotFound(LaneId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `lw-core`.
pub type LwResult<T> = Result<T, LwError>;
