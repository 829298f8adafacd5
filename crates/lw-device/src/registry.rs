//! `DeviceRegistry` — builds a vehicle's devices from factories keyed by kind.

use std::collections::BTreeMap;

use lw_core::{Vehicle, VehicleRng};
use tracing::{debug, warn};

use crate::{DeviceError, DeviceResult, Holder, VehicleDevice, VehicleDevices};

/// Builds one device for `vehicle`, or `None` if the vehicle is not equipped.
///
/// The RNG is the vehicle's own, so equipment decisions are reproducible
/// per vehicle regardless of insertion order.
pub type DeviceFactory = Box<dyn Fn(&dyn Vehicle, &mut VehicleRng) -> Option<Box<dyn VehicleDevice>>>;

/// Device factories keyed by kind name.
///
/// Kinds are visited in ascending name order, so the set of devices built
/// for a vehicle does not depend on registration order.
#[derive(Default)]
pub struct DeviceRegistry {
    factories: BTreeMap<&'static str, DeviceFactory>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` for `kind`.  A second registration for the same
    /// kind replaces the first; returns `true` in that case.
    pub fn register(&mut self, kind: &'static str, factory: DeviceFactory) -> bool {
        let replaced = self.factories.insert(kind, factory).is_some();
        if replaced {
            warn!(kind, "device factory re-registered");
        }
        replaced
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Build one device of `kind` for `vehicle`.
    pub fn build(
        &self,
        kind:    &str,
        vehicle: &dyn Vehicle,
        rng:     &mut VehicleRng,
    ) -> DeviceResult<Option<Box<dyn VehicleDevice>>> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| DeviceError::UnknownKind(kind.to_owned()))?;
        Ok(factory(vehicle, rng))
    }

    /// Run every factory for `vehicle` and collect the devices it gets.
    pub fn build_devices(
        &self,
        vehicle: &dyn Vehicle,
        rng:     &mut VehicleRng,
    ) -> DeviceResult<VehicleDevices> {
        let mut devices = VehicleDevices::new(Holder::of(vehicle));
        for (kind, factory) in &self.factories {
            match factory(vehicle, rng) {
                Some(device) => {
                    devices.attach(device)?;
                }
                None => debug!(kind, vehicle = vehicle.id(), "vehicle not equipped"),
            }
        }
        Ok(devices)
    }
}
