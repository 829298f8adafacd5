//! The vehicle a device is permanently associated with.

use std::fmt;

use lw_core::{Vehicle, VehicleId};

/// Identity of a device's holder, captured once at construction.
///
/// This is a non-owning handle: it copies the identity out of the vehicle
/// instead of borrowing it.  The live vehicle is handed to the device with
/// every notification and must match `numerical_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Holder {
    numerical_id: VehicleId,
    id:           String,
}

impl Holder {
    pub fn new(numerical_id: VehicleId, id: impl Into<String>) -> Self {
        Self { numerical_id, id: id.into() }
    }

    /// Capture the identity of `vehicle`.
    pub fn of(vehicle: &dyn Vehicle) -> Self {
        Self::new(vehicle.numerical_id(), vehicle.id())
    }

    /// Stable integer id; the lookup and ordering key for device collections.
    #[inline]
    pub fn numerical_id(&self) -> VehicleId {
        self.numerical_id
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// `true` if `vehicle` is this holder.
    #[inline]
    pub fn is(&self, vehicle: &dyn Vehicle) -> bool {
        vehicle.numerical_id() == self.numerical_id
    }
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.numerical_id)
    }
}
