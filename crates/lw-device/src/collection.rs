//! `VehicleDevices` — every device riding on one vehicle.

use std::collections::BTreeMap;

use lw_core::{LaneId, ObserverId, Vehicle};
use lw_notify::{EnterReason, LeaveReason, StepContext, assert_forward_motion};
use tracing::{debug, warn};

use crate::{DeviceError, DeviceResult, Holder, VehicleDevice};

struct Slot {
    device: Box<dyn VehicleDevice>,
    /// In contact on the current lane: accepted the last `on_enter` and has
    /// not yet returned `false` from `on_move`.
    active: bool,
}

/// The devices of one holder, ordered by device id.
///
/// All devices must be bound to the same holder; this is checked on attach
/// and again on every notification.  Attaching an id that is already
/// present replaces the previous device.
pub struct VehicleDevices {
    holder:  Holder,
    devices: BTreeMap<ObserverId, Slot>,
}

impl VehicleDevices {
    pub fn new(holder: Holder) -> Self {
        Self { holder, devices: BTreeMap::new() }
    }

    pub fn holder(&self) -> &Holder {
        &self.holder
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Device ids in ascending order (also the dispatch order).
    pub fn ids(&self) -> impl Iterator<Item = &ObserverId> {
        self.devices.keys()
    }

    pub fn contains(&self, id: &ObserverId) -> bool {
        self.devices.contains_key(id)
    }

    pub fn get(&self, id: &ObserverId) -> Option<&dyn VehicleDevice> {
        self.devices.get(id).map(|s| s.device.as_ref())
    }

    /// `true` if the device is currently receiving moves.
    pub fn is_active(&self, id: &ObserverId) -> bool {
        self.devices.get(id).is_some_and(|s| s.active)
    }

    /// Add `device`, returning the one it replaced.
    ///
    /// The new device is inactive until the next `notify_enter`.
    pub fn attach(
        &mut self,
        device: Box<dyn VehicleDevice>,
    ) -> DeviceResult<Option<Box<dyn VehicleDevice>>> {
        if device.numerical_id() != self.holder.numerical_id() {
            return Err(DeviceError::HolderMismatch {
                device:   device.id().clone(),
                expected: self.holder.numerical_id(),
                found:    device.numerical_id(),
            });
        }
        let id = device.id().clone();
        let replaced = self.devices.insert(id, Slot { device, active: false });
        if let Some(old) = &replaced {
            warn!(device = %old.device.id(), holder = %self.holder, "re-attached device replaces prior instance");
        }
        Ok(replaced.map(|s| s.device))
    }

    pub fn detach(&mut self, id: &ObserverId) -> Option<Box<dyn VehicleDevice>> {
        self.devices.remove(id).map(|s| s.device)
    }

    fn check_holder(&self, vehicle: &dyn Vehicle) -> DeviceResult<()> {
        if self.holder.is(vehicle) {
            return Ok(());
        }
        Err(DeviceError::NotHolder {
            expected: self.holder.numerical_id(),
            found:    vehicle.numerical_id(),
        })
    }

    // ── Dispatch ──────────────────────────────────────────────────────────

    /// The holder entered a lane.  Returns the number of devices that
    /// accepted contact.
    pub fn notify_enter(
        &mut self,
        vehicle: &dyn Vehicle,
        reason:  EnterReason,
        ctx:     &StepContext,
    ) -> DeviceResult<usize> {
        self.check_holder(vehicle)?;
        let mut accepted = 0;
        for slot in self.devices.values_mut() {
            slot.active = slot.device.on_enter(vehicle, reason, ctx)?;
            if slot.active {
                accepted += 1;
            }
        }
        Ok(accepted)
    }

    /// The holder moved.  Devices returning `false` stop receiving moves
    /// until the holder enters another lane.
    pub fn notify_move(
        &mut self,
        vehicle:   &dyn Vehicle,
        old_pos:   f64,
        new_pos:   f64,
        new_speed: f64,
        ctx:       &StepContext,
    ) -> DeviceResult<()> {
        self.check_holder(vehicle)?;
        assert_forward_motion(vehicle, old_pos, new_pos);
        for slot in self.devices.values_mut().filter(|s| s.active) {
            slot.active = slot.device.on_move(vehicle, old_pos, new_pos, new_speed, ctx)?;
            if !slot.active {
                debug!(device = %slot.device.id(), "device done with current lane");
            }
        }
        Ok(())
    }

    /// The holder left its lane.  Every active device hears it exactly once
    /// and is deactivated.  Returns the number of acknowledgements.
    pub fn notify_leave(
        &mut self,
        vehicle:      &dyn Vehicle,
        last_pos:     f64,
        reason:       LeaveReason,
        entered_lane: Option<LaneId>,
        ctx:          &StepContext,
    ) -> DeviceResult<usize> {
        self.check_holder(vehicle)?;
        let mut acknowledged = 0;
        for slot in self.devices.values_mut().filter(|s| s.active) {
            slot.active = false;
            if slot.device.on_leave(vehicle, last_pos, reason, entered_lane, ctx)? {
                acknowledged += 1;
            }
        }
        Ok(acknowledged)
    }

    pub fn open_entries(&self) -> usize {
        self.devices.values().map(|s| s.device.open_entries()).sum()
    }

    pub fn close_all(&mut self) -> DeviceResult<()> {
        for slot in self.devices.values_mut() {
            slot.device.close()?;
        }
        Ok(())
    }
}
