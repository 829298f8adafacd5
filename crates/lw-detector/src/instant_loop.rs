//! `InstantInductLoop<S>` — a point detector that reports crossings as they
//! happen.

use lw_core::{LaneId, ObserverId, Vehicle};
use lw_notify::{
    EnterReason, LeaveReason, MoveObserver, NotifyResult, StepContext, assert_forward_motion,
};
use lw_output::{Attribute, EventKind, EventRecord, EventSink, OutputResult};
use tracing::{debug, trace, warn};

use crate::{
    CrossingKind, CrossingRecord, DetectorConfig, DwellTable, LoopOptions, VehicleTypeFilter,
    passing_time,
};

/// Running counters, for summaries and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Crossings opened (fronts that crossed the loop).
    pub entered:   u64,
    /// Crossings closed by full clearance.
    pub passed:    u64,
    /// Crossings closed by lane change or removal.
    pub dismissed: u64,
    /// Exits that arrived earlier than the previous exit.
    pub overlaps:  u64,
}

/// An induction loop at a fixed position on one lane.
///
/// Each accepted vehicle is tracked from the instant its front crosses the
/// loop until its trailing edge clears it.  Both instants are interpolated
/// inside the step in which they happen.  Every finished event is written to
/// the sink immediately; nothing is buffered here.
///
/// The sink is generic so a loop can own its writer outright or share one
/// with other loops through `Rc<RefCell<_>>`.
pub struct InstantInductLoop<S: EventSink> {
    id:             ObserverId,
    position:       f64,
    filter:         VehicleTypeFilter,
    options:        LoopOptions,
    sink:           S,
    dwell:          DwellTable,
    last_exit_time: Option<f64>,
    stats:          LoopStats,
}

impl<S: EventSink> InstantInductLoop<S> {
    /// Create a loop at `position` (meters along the lane) accepting every
    /// vehicle type, and announce it to `sink`.
    pub fn new(id: impl Into<ObserverId>, position: f64, mut sink: S) -> OutputResult<Self> {
        let id = id.into();
        sink.write_prolog(&id)?;
        Ok(Self {
            id,
            position,
            filter:         VehicleTypeFilter::accept_all(),
            options:        LoopOptions::default(),
            sink,
            dwell:          DwellTable::new(),
            last_exit_time: None,
            stats:          LoopStats::default(),
        })
    }

    /// Create a loop from its configuration entry.
    pub fn from_config(config: &DetectorConfig, sink: S) -> OutputResult<Self> {
        Ok(Self::new(config.id.as_str(), config.position, sink)?
            .with_filter(config.vtypes.iter().map(String::as_str).collect())
            .with_options(config.options))
    }

    pub fn with_filter(mut self, filter: VehicleTypeFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_options(mut self, options: LoopOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn filter(&self) -> &VehicleTypeFilter {
        &self.filter
    }

    /// Exit time of the latest `pass`; never decreases.
    #[inline]
    pub fn last_exit_time(&self) -> Option<f64> {
        self.last_exit_time
    }

    #[inline]
    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn dwell(&self) -> &DwellTable {
        &self.dwell
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn write(
        &mut self,
        kind:      EventKind,
        time:      f64,
        vehicle:   &dyn Vehicle,
        speed:     f64,
        attribute: Option<Attribute>,
    ) -> OutputResult<()> {
        let record = EventRecord {
            detector:     self.id.clone(),
            time,
            kind,
            vehicle:      vehicle.id().to_owned(),
            numerical_id: vehicle.numerical_id(),
            speed,
            length:       vehicle.length(),
            vehicle_type: vehicle.type_id().to_owned(),
            attribute,
        };
        self.sink.write_event(&record)
    }

    /// Open a crossing and report the entry.
    fn enter(&mut self, vehicle: &dyn Vehicle, entry_time: f64, speed: f64) -> OutputResult<()> {
        if !self.dwell.open(vehicle.numerical_id(), entry_time) {
            return Ok(());
        }
        self.stats.entered += 1;
        trace!(detector = %self.id, vehicle = vehicle.id(), entry_time, "front crossed loop");
        if self.options.report_enter {
            let gap = self.last_exit_time.map(|t| Attribute::gap(entry_time - t));
            self.write(EventKind::Enter, entry_time, vehicle, speed, gap)?;
        }
        Ok(())
    }

    /// Close `vehicle`'s open crossing and write the finished record.
    ///
    /// Returns `None` (and writes nothing) if no crossing is open.
    fn finalize(
        &mut self,
        vehicle:   &dyn Vehicle,
        kind:      CrossingKind,
        exit_time: f64,
        speed:     f64,
    ) -> OutputResult<Option<CrossingRecord>> {
        let Some(entry_time) = self.dwell.close(vehicle.numerical_id()) else {
            debug!(detector = %self.id, vehicle = vehicle.id(), ?kind, "no open crossing to finalize");
            return Ok(None);
        };
        let record = CrossingRecord {
            vehicle:    vehicle.numerical_id(),
            entry_time,
            exit_time:  exit_time.max(entry_time),
            exit_speed: speed,
            kind,
        };
        match kind {
            CrossingKind::Pass => {
                self.stats.passed += 1;
                self.note_exit(record.exit_time, vehicle);
            }
            CrossingKind::DismissLaneChange | CrossingKind::DismissRemoval => {
                self.stats.dismissed += 1;
            }
        }
        self.write(
            kind.into(),
            record.exit_time,
            vehicle,
            speed,
            Some(Attribute::occupancy(record.occupancy())),
        )?;
        Ok(Some(record))
    }

    fn note_exit(&mut self, exit_time: f64, vehicle: &dyn Vehicle) {
        let last = self.last_exit_time;
        match last {
            Some(previous) if exit_time < previous => {
                self.stats.overlaps += 1;
                warn!(
                    detector = %self.id,
                    vehicle = vehicle.id(),
                    exit_time,
                    previous,
                    "exit earlier than previous exit; overlapping vehicles on loop",
                );
            }
            _ => self.last_exit_time = Some(exit_time),
        }
    }
}

impl<S: EventSink> MoveObserver for InstantInductLoop<S> {
    fn id(&self) -> &ObserverId {
        &self.id
    }

    fn on_enter(
        &mut self,
        vehicle: &dyn Vehicle,
        _reason: EnterReason,
        _ctx:    &StepContext,
    ) -> NotifyResult<bool> {
        if !self.filter.accepts(vehicle.type_id()) {
            debug!(detector = %self.id, vehicle = vehicle.id(), vtype = vehicle.type_id(), "vehicle type filtered");
            return Ok(false);
        }
        Ok(true)
    }

    fn on_move(
        &mut self,
        vehicle:   &dyn Vehicle,
        old_pos:   f64,
        new_pos:   f64,
        new_speed: f64,
        ctx:       &StepContext,
    ) -> NotifyResult<bool> {
        assert_forward_motion(vehicle, old_pos, new_pos);
        let vid = vehicle.numerical_id();

        if !self.dwell.is_open(vid) {
            if !self.filter.accepts(vehicle.type_id()) {
                return Ok(false);
            }
            if new_pos < self.position {
                // loop not reached yet
                return Ok(true);
            }
            if old_pos <= self.position {
                let entry = passing_time(ctx, old_pos, self.position, new_pos, new_speed);
                self.enter(vehicle, entry, new_speed)?;
            }
        }

        let length = vehicle.length();
        let new_back = new_pos - length;
        if new_back > self.position {
            if self.dwell.is_open(vid) {
                let old_back = old_pos - length;
                let exit = passing_time(ctx, old_back, self.position, new_back, new_speed);
                self.finalize(vehicle, CrossingKind::Pass, exit, new_speed)?;
            }
            return Ok(false);
        }

        if self.options.report_stay && self.dwell.is_open(vid) {
            self.write(EventKind::Stay, ctx.end_secs, vehicle, new_speed, None)?;
        }
        Ok(true)
    }

    fn on_leave(
        &mut self,
        vehicle:       &dyn Vehicle,
        _last_pos:     f64,
        reason:        LeaveReason,
        _entered_lane: Option<LaneId>,
        ctx:           &StepContext,
    ) -> NotifyResult<bool> {
        let kind = match reason {
            // Ran off the lane end: it moved forward over the loop.
            LeaveReason::Normal => CrossingKind::Pass,
            LeaveReason::LaneChange => CrossingKind::DismissLaneChange,
            LeaveReason::Arrived | LeaveReason::Teleported | LeaveReason::Vaporized => {
                CrossingKind::DismissRemoval
            }
        };
        let closed = self.finalize(vehicle, kind, ctx.end_secs, vehicle.speed())?;
        Ok(closed.is_some())
    }

    fn open_entries(&self) -> usize {
        self.dwell.len()
    }

    fn close(&mut self) -> NotifyResult<()> {
        if !self.dwell.is_empty() {
            warn!(
                detector = %self.id,
                open = self.dwell.len(),
                vehicles = ?self.dwell.vehicles(),
                "closing loop with open crossings",
            );
        }
        self.sink.finish()?;
        Ok(())
    }
}
