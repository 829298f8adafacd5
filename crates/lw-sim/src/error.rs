use lw_core::{LaneId, LwError, VehicleId};
use lw_device::DeviceError;
use lw_notify::{LeaveReason, NotifyError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] LwError),

    #[error("notification failed: {0}")]
    Notify(#[from] NotifyError),

    #[error("device failed: {0}")]
    Device(#[from] DeviceError),

    #[error("vehicle {0} is already in the simulation")]
    DuplicateVehicle(VehicleId),

    #[error("position {position} outside lane {lane} of length {length}")]
    PositionOutOfRange {
        lane:     LaneId,
        position: f64,
        length:   f64,
    },

    #[error("vehicle {vehicle} cannot be removed with reason {reason}")]
    InvalidRemoval {
        vehicle: VehicleId,
        reason:  LeaveReason,
    },
}

pub type SimResult<T> = Result<T, SimError>;
