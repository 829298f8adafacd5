//! `TripDevice` — accumulates a per-trip summary for its holder.

use std::cell::RefCell;
use std::rc::Rc;

use lw_core::{LaneId, ObserverId, Vehicle, VehicleId, VehicleRng};
use lw_notify::{EnterReason, LeaveReason, MoveObserver, NotifyError, NotifyResult, StepContext};
use tracing::{debug, trace};

use crate::{DeviceBinding, DeviceFactory, Holder, VehicleDevice};

/// Speeds below this count as waiting (m/s).
pub const HALTING_SPEED: f64 = 0.1;

/// Finished-trip summary, appended to the shared [`TripLog`] when the trip ends.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripInfo {
    pub vehicle:      String,
    pub numerical_id: VehicleId,
    pub depart_time:  f64,
    pub depart_pos:   f64,
    pub arrival_time: f64,
    pub arrival_pos:  f64,
    /// Distance driven in meters.
    pub route_length: f64,
    /// Seconds spent below [`HALTING_SPEED`].
    pub waiting_time: f64,
    pub lane_changes: u32,
    /// Leave reason that ended the trip, as written by `LeaveReason`'s `Display`.
    pub end_reason:   String,
}

impl TripInfo {
    pub fn duration(&self) -> f64 {
        self.arrival_time - self.depart_time
    }
}

/// Finished trips of every vehicle, shared by all trip devices of a run.
pub type TripLog = Rc<RefCell<Vec<TripInfo>>>;

/// Records departure, distance, waiting time, lane changes and arrival of
/// its holder.
///
/// The trip starts at the first `on_enter` and ends at the first `on_leave`
/// that is not a lane change; the summary is then pushed onto the log.
pub struct TripDevice {
    binding:      DeviceBinding,
    log:          TripLog,
    depart:       Option<(f64, f64)>,
    route_length: f64,
    waiting_time: f64,
    lane_changes: u32,
    finished:     bool,
}

impl TripDevice {
    pub const KIND: &'static str = "tripinfo";

    pub fn new(vehicle: &dyn Vehicle, log: TripLog) -> Self {
        Self {
            binding:      DeviceBinding::new(Self::KIND, vehicle),
            log,
            depart:       None,
            route_length: 0.0,
            waiting_time: 0.0,
            lane_changes: 0,
            finished:     false,
        }
    }

    /// Factory equipping each vehicle with probability `probability`.
    pub fn factory(log: TripLog, probability: f64) -> DeviceFactory {
        Box::new(move |vehicle: &dyn Vehicle, rng: &mut VehicleRng| {
            rng.gen_bool(probability)
                .then(|| Box::new(TripDevice::new(vehicle, Rc::clone(&log))) as Box<dyn VehicleDevice>)
        })
    }

    pub fn route_length(&self) -> f64 {
        self.route_length
    }

    pub fn waiting_time(&self) -> f64 {
        self.waiting_time
    }

    pub fn lane_changes(&self) -> u32 {
        self.lane_changes
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl MoveObserver for TripDevice {
    fn id(&self) -> &ObserverId {
        self.binding.id()
    }

    fn on_enter(
        &mut self,
        vehicle: &dyn Vehicle,
        reason:  EnterReason,
        ctx:     &StepContext,
    ) -> NotifyResult<bool> {
        if self.finished {
            return Ok(false);
        }
        if self.depart.is_none() {
            self.depart = Some((ctx.start_secs, vehicle.position()));
            trace!(device = %self.binding.id(), ?reason, time = ctx.start_secs, "trip started");
        }
        Ok(true)
    }

    fn on_move(
        &mut self,
        _vehicle:  &dyn Vehicle,
        old_pos:   f64,
        new_pos:   f64,
        new_speed: f64,
        ctx:       &StepContext,
    ) -> NotifyResult<bool> {
        self.route_length += new_pos - old_pos;
        if new_speed < HALTING_SPEED {
            self.waiting_time += ctx.length();
        }
        Ok(true)
    }

    fn on_leave(
        &mut self,
        vehicle:       &dyn Vehicle,
        last_pos:      f64,
        reason:        LeaveReason,
        _entered_lane: Option<LaneId>,
        ctx:           &StepContext,
    ) -> NotifyResult<bool> {
        if reason == LeaveReason::LaneChange {
            self.lane_changes += 1;
            return Ok(true);
        }
        let Some((depart_time, depart_pos)) = self.depart else {
            debug!(device = %self.binding.id(), "trip ended before it started");
            return Ok(false);
        };
        if self.finished {
            return Ok(false);
        }
        let mut log = self.log.try_borrow_mut().map_err(|_| NotifyError::Observer {
            id:      self.binding.id().clone(),
            message: "trip log is borrowed elsewhere".into(),
        })?;
        self.finished = true;
        log.push(TripInfo {
            vehicle:      vehicle.id().to_owned(),
            numerical_id: vehicle.numerical_id(),
            depart_time,
            depart_pos,
            arrival_time: ctx.end_secs,
            arrival_pos:  last_pos,
            route_length: self.route_length,
            waiting_time: self.waiting_time,
            lane_changes: self.lane_changes,
            end_reason:   reason.to_string(),
        });
        Ok(true)
    }
}

impl VehicleDevice for TripDevice {
    fn kind(&self) -> &'static str {
        self.binding.kind()
    }

    fn holder(&self) -> &Holder {
        self.binding.holder()
    }
}
