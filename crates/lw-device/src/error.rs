use lw_core::{ObserverId, VehicleId};
use lw_notify::NotifyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error("device {device} is bound to {expected}, not {found}")]
    HolderMismatch {
        device:   ObserverId,
        expected: VehicleId,
        found:    VehicleId,
    },

    #[error("notification for {found} delivered to the devices of {expected}")]
    NotHolder {
        expected: VehicleId,
        found:    VehicleId,
    },

    #[error("no device factory registered for kind {0:?}")]
    UnknownKind(String),
}

pub type DeviceResult<T> = Result<T, DeviceError>;
