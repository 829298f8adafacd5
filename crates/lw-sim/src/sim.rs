//! The `Sim` struct and its step loop.

use std::collections::BTreeMap;

use lw_core::{
    LaneId, LwError, ObserverId, SimConfig, Step, StepClock, Vehicle, VehicleId, VehicleRng,
    VehicleState,
};
use lw_device::{DeviceFactory, DeviceRegistry, VehicleDevices};
use lw_notify::{EnterReason, LeaveReason, MoveObserver, StepContext};
use tracing::{debug, trace, warn};

use crate::{Driver, Lane, Maneuver, NoopMonitor, SimError, SimMonitor, SimResult};

// ── Per-vehicle bookkeeping ───────────────────────────────────────────────────

/// Everything the motion source keeps for one vehicle.
struct Running {
    state:    VehicleState,
    lane:     LaneId,
    /// Lane observers currently in contact, in dispatch order.
    contacts: Vec<ObserverId>,
    devices:  VehicleDevices,
    rng:      VehicleRng,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The reference motion source.
///
/// Owns the lanes (with their observers), the running vehicles and the
/// driving model, and delivers `on_enter` / `on_move` / `on_leave` in the
/// order the notification protocol requires:
///
/// - vehicles are processed in ascending `VehicleId`;
/// - observers on a lane are notified in ascending position, then id;
/// - a vehicle's devices are notified after the lane observers, by device id.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<D: Driver> {
    /// Run configuration (step length, total steps, seed).
    pub config: SimConfig,

    /// Step clock; `current_step` is the next step to simulate.
    pub clock: StepClock,

    /// The driving model.  Called once per vehicle per step.
    pub driver: D,

    pub(crate) lanes:    BTreeMap<LaneId, Lane>,
    pub(crate) devices:  DeviceRegistry,
    vehicles:            BTreeMap<VehicleId, Running>,
}

impl<D: Driver> Sim<D> {
    pub(crate) fn new(
        config:  SimConfig,
        driver:  D,
        lanes:   BTreeMap<LaneId, Lane>,
        devices: DeviceRegistry,
    ) -> Self {
        Self {
            clock: config.make_clock(),
            config,
            driver,
            lanes,
            devices,
            vehicles: BTreeMap::new(),
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn lane(&self, id: LaneId) -> Option<&Lane> {
        self.lanes.get(&id)
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&VehicleState> {
        self.vehicles.get(&id).map(|r| &r.state)
    }

    /// Lane the vehicle is currently on.
    pub fn lane_of(&self, id: VehicleId) -> Option<LaneId> {
        self.vehicles.get(&id).map(|r| r.lane)
    }

    /// Lane observers the vehicle is in contact with, in dispatch order.
    pub fn contacts_of(&self, id: VehicleId) -> Option<&[ObserverId]> {
        self.vehicles.get(&id).map(|r| r.contacts.as_slice())
    }

    pub fn devices_of(&self, id: VehicleId) -> Option<&VehicleDevices> {
        self.vehicles.get(&id).map(|r| &r.devices)
    }

    /// Per-vehicle entries held by all observers and devices.
    ///
    /// After [`finish`](Self::finish) this is zero unless an observer leaks.
    pub fn open_entries(&self) -> usize {
        let lanes: usize = self.lanes.values().map(|l| l.observers.open_entries()).sum();
        let devices: usize = self.vehicles.values().map(|r| r.devices.open_entries()).sum();
        lanes + devices
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Attach `observer` to `lane` at `position`.
    ///
    /// An observer whose id is already attached to the lane replaces the
    /// previous instance.  Vehicles in contact with the old instance get
    /// `on_leave(vaporized)` from it at the current time, which dismisses
    /// their open crossings, and the contact is dropped.  The old instance
    /// is not closed since its sink may be shared with the replacement.
    /// Returns `true` if an instance was replaced.
    ///
    /// Vehicles already on the lane are not offered contact; the observer
    /// sees vehicles that enter the lane from now on.
    pub fn attach(
        &mut self,
        lane:     LaneId,
        position: f64,
        observer: Box<dyn MoveObserver>,
    ) -> SimResult<bool> {
        let ctx = self.between_steps();
        let target = self.lanes.get_mut(&lane).ok_or(LwError::LaneNotFound(lane))?;
        if !target.contains(position) {
            return Err(SimError::PositionOutOfRange { lane, position, length: target.length });
        }
        let id = observer.id().clone();
        let Some(mut old) = target.observers.attach(position, observer) else {
            return Ok(false);
        };

        let mut dismissed = 0;
        for running in self.vehicles.values_mut().filter(|r| r.lane == lane) {
            if !running.contacts.contains(&id) {
                continue;
            }
            running.contacts.retain(|c| c != &id);
            let pos = running.state.position;
            if old.on_leave(&running.state, pos, LeaveReason::Vaporized, None, &ctx)? {
                dismissed += 1;
            }
        }
        if old.open_entries() > 0 {
            warn!(observer = %id, open = old.open_entries(), "replaced observer still holds entries");
        }
        debug!(observer = %id, %lane, dismissed, "observer replaced");
        Ok(true)
    }

    /// Register a device factory; applies to vehicles inserted afterwards.
    pub fn register_device(&mut self, kind: &'static str, factory: DeviceFactory) -> bool {
        self.devices.register(kind, factory)
    }

    // ── Vehicles ──────────────────────────────────────────────────────────

    /// Insert `state` on `lane` at its current position.
    ///
    /// The vehicle is equipped from the device registry and receives
    /// `on_enter(departed)` from the lane observers and its devices, within
    /// the window of the current step.
    pub fn insert_vehicle(&mut self, state: VehicleState, lane: LaneId) -> SimResult<()> {
        let id = state.numerical_id;
        if self.vehicles.contains_key(&id) {
            return Err(SimError::DuplicateVehicle(id));
        }
        let target = self.lanes.get_mut(&lane).ok_or(LwError::LaneNotFound(lane))?;
        if !target.contains(state.position) {
            return Err(SimError::PositionOutOfRange {
                lane,
                position: state.position,
                length:   target.length,
            });
        }

        let ctx = StepContext::from_clock(&self.clock);
        let mut rng = VehicleRng::new(self.config.seed, id);
        let mut devices = self.devices.build_devices(&state, &mut rng)?;
        let contacts = target.observers.notify_enter(&state, EnterReason::Departed, &ctx)?;
        devices.notify_enter(&state, EnterReason::Departed, &ctx)?;
        trace!(vehicle = %state.id, %lane, contacts = contacts.len(), devices = devices.len(), "vehicle inserted");

        self.vehicles.insert(id, Running { state, lane, contacts, devices, rng });
        Ok(())
    }

    /// Remove a vehicle now, outside the driver.
    ///
    /// `reason` must be a removal reason (`arrived`, `teleported`,
    /// `vaporized`).
    ///
    /// Runs between steps, so leave notifications carry the zero-length
    /// window at the start of the next step.
    pub fn remove_vehicle(&mut self, id: VehicleId, reason: LeaveReason) -> SimResult<()> {
        let ctx = self.between_steps();
        self.remove(id, reason, &ctx, &mut NoopMonitor)
    }

    // ── Run ───────────────────────────────────────────────────────────────

    /// Run from the current step to `config.end_step()`, then [`finish`](Self::finish).
    ///
    /// Stops at the first error; observers are not closed in that case.
    pub fn run<M: SimMonitor>(&mut self, monitor: &mut M) -> SimResult<()> {
        while self.clock.current_step < self.config.end_step() {
            self.step_once(monitor)?;
        }
        self.finish(monitor)
    }

    /// Run exactly `n` steps from the current position (ignores `end_step`,
    /// does not finish).
    pub fn run_steps<M: SimMonitor>(&mut self, n: u64, monitor: &mut M) -> SimResult<()> {
        for _ in 0..n {
            self.step_once(monitor)?;
        }
        Ok(())
    }

    /// End the run: remove every remaining vehicle with reason `vaporized`
    /// and close all lane observers.
    pub fn finish<M: SimMonitor>(&mut self, monitor: &mut M) -> SimResult<()> {
        let ctx = self.between_steps();
        let remaining: Vec<VehicleId> = self.vehicles.keys().copied().collect();
        if !remaining.is_empty() {
            debug!(vehicles = remaining.len(), "vaporizing vehicles at simulation end");
        }
        for id in remaining {
            self.remove(id, LeaveReason::Vaporized, &ctx, monitor)?;
        }

        let leaked = self.open_entries();
        if leaked > 0 {
            warn!(leaked, "observers hold per-vehicle entries after all vehicles left");
        }
        for lane in self.lanes.values_mut() {
            lane.observers.close_all()?;
        }
        monitor.on_sim_end(self.clock.current_step);
        Ok(())
    }

    /// Zero-length window `[t, t]` at the start of the step about to run.
    fn between_steps(&self) -> StepContext {
        let now = self.clock.step_start_secs();
        StepContext::new(self.clock.current_step, now, now)
    }

    fn step_once<M: SimMonitor>(&mut self, monitor: &mut M) -> SimResult<()> {
        let now = self.clock.current_step;
        monitor.on_step_start(now);
        self.process_step(now, monitor)?;
        monitor.on_step_end(now, self.vehicles.len());
        self.clock.advance();
        Ok(())
    }

    // ── Core step processing ──────────────────────────────────────────────

    fn process_step<M: SimMonitor>(&mut self, now: Step, monitor: &mut M) -> SimResult<()> {
        let ctx = StepContext::from_clock(&self.clock);
        debug_assert_eq!(ctx.step, now);

        // Ids removed earlier in this step are skipped.
        let ids: Vec<VehicleId> = self.vehicles.keys().copied().collect();
        for id in ids {
            let Some(running) = self.vehicles.get_mut(&id) else {
                continue;
            };
            let maneuver = self.driver.maneuver(&running.state, running.lane, &ctx, &mut running.rng);
            match maneuver {
                Maneuver::Advance { speed } => {
                    if self.advance(id, speed, &ctx)? {
                        self.remove(id, LeaveReason::Normal, &ctx, monitor)?;
                    }
                }
                Maneuver::ChangeLane { to } => self.change_lane(id, to, &ctx)?,
                Maneuver::Arrive => self.remove(id, LeaveReason::Arrived, &ctx, monitor)?,
                Maneuver::Remove(reason) => self.remove(id, reason, &ctx, monitor)?,
            }
        }
        Ok(())
    }

    /// Move the vehicle forward and notify.  Returns `true` once its
    /// trailing edge has run past the lane end.
    fn advance(&mut self, id: VehicleId, speed: f64, ctx: &StepContext) -> SimResult<bool> {
        let running = self.vehicles.get_mut(&id).ok_or(LwError::VehicleNotFound(id))?;
        let lane = self
            .lanes
            .get_mut(&running.lane)
            .ok_or(LwError::LaneNotFound(running.lane))?;

        let speed = speed.max(0.0);
        let old_pos = running.state.position;
        let new_pos = old_pos + speed * ctx.length();
        running.state.position = new_pos;
        running.state.speed = speed;

        lane.observers
            .notify_move(&mut running.contacts, &running.state, old_pos, new_pos, speed, ctx)?;
        running.devices.notify_move(&running.state, old_pos, new_pos, speed, ctx)?;

        Ok(running.state.back_position() > lane.length)
    }

    fn change_lane(&mut self, id: VehicleId, to: LaneId, ctx: &StepContext) -> SimResult<()> {
        if !self.lanes.contains_key(&to) {
            return Err(LwError::LaneNotFound(to).into());
        }
        let running = self.vehicles.get_mut(&id).ok_or(LwError::VehicleNotFound(id))?;
        let from = running.lane;
        if from == to {
            return Ok(());
        }
        let pos = running.state.position;

        if let Some(lane) = self.lanes.get_mut(&from) {
            let contacts = std::mem::take(&mut running.contacts);
            lane.observers
                .notify_leave(contacts, &running.state, pos, LeaveReason::LaneChange, Some(to), ctx)?;
        }
        running
            .devices
            .notify_leave(&running.state, pos, LeaveReason::LaneChange, Some(to), ctx)?;

        let target = self.lanes.get_mut(&to).ok_or(LwError::LaneNotFound(to))?;
        running.contacts = target
            .observers
            .notify_enter(&running.state, EnterReason::LaneChange, ctx)?;
        running.devices.notify_enter(&running.state, EnterReason::LaneChange, ctx)?;
        running.lane = to;
        trace!(vehicle = %running.state.id, %from, %to, "lane change");
        Ok(())
    }

    /// Deliver the final `on_leave` and drop the vehicle with its devices.
    fn remove<M: SimMonitor>(
        &mut self,
        id:      VehicleId,
        reason:  LeaveReason,
        ctx:     &StepContext,
        monitor: &mut M,
    ) -> SimResult<()> {
        if reason == LeaveReason::LaneChange {
            return Err(SimError::InvalidRemoval { vehicle: id, reason });
        }
        let mut running = self.vehicles.remove(&id).ok_or(LwError::VehicleNotFound(id))?;
        let pos = running.state.position;

        if let Some(lane) = self.lanes.get_mut(&running.lane) {
            let contacts = std::mem::take(&mut running.contacts);
            lane.observers
                .notify_leave(contacts, &running.state, pos, reason, None, ctx)?;
        }
        running.devices.notify_leave(&running.state, pos, reason, None, ctx)?;
        running.devices.close_all()?;

        debug!(vehicle = %running.state.id, %reason, position = pos, "vehicle removed");
        monitor.on_vehicle_removed(&running.state, reason);
        Ok(())
    }
}
