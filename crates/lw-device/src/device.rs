//! The `VehicleDevice` trait and the binding every device embeds.

use lw_core::{ObserverId, Vehicle, VehicleId};
use lw_notify::MoveObserver;

use crate::Holder;

/// Device id for a device of `kind` on the vehicle with string id `vehicle`.
///
/// Format: `<kind>_<vehicle id>`, e.g. `tripinfo_veh7`.
pub fn device_id(kind: &str, vehicle: &str) -> ObserverId {
    ObserverId::new(format!("{kind}_{vehicle}"))
}

/// A [`MoveObserver`] bound to exactly one vehicle for its whole life.
///
/// Devices follow their holder across lanes: they receive `on_enter` for
/// every lane the vehicle enters and `on_leave` for every lane it leaves.
pub trait VehicleDevice: MoveObserver {
    /// Short kind name, also the prefix of the device id.
    fn kind(&self) -> &'static str;

    fn holder(&self) -> &Holder;

    /// The holder's stable integer id.
    #[inline]
    fn numerical_id(&self) -> VehicleId {
        self.holder().numerical_id()
    }
}

/// Identity and holder of one device.  Concrete devices embed this and
/// forward `id()`, `kind()` and `holder()` to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceBinding {
    id:     ObserverId,
    kind:   &'static str,
    holder: Holder,
}

impl DeviceBinding {
    pub fn new(kind: &'static str, vehicle: &dyn Vehicle) -> Self {
        Self {
            id: device_id(kind, vehicle.id()),
            kind,
            holder: Holder::of(vehicle),
        }
    }

    #[inline]
    pub fn id(&self) -> &ObserverId {
        &self.id
    }

    #[inline]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    #[inline]
    pub fn holder(&self) -> &Holder {
        &self.holder
    }
}
