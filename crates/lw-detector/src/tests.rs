//! Tests for lw-detector.

use std::cell::RefCell;
use std::rc::Rc;

use lw_core::{LaneId, Step, VehicleId, VehicleState};
use lw_notify::{EnterReason, LeaveReason, MoveObserver, StepContext};
use lw_output::{EventKind, MemorySink};

use crate::{InstantInductLoop, LoopOptions};

// ── Helpers ───────────────────────────────────────────────────────────────────

type Shared = Rc<RefCell<MemorySink>>;

fn loop_at(position: f64) -> (InstantInductLoop<Shared>, Shared) {
    let sink = Shared::default();
    let det = InstantInductLoop::new("loop_0", position, Rc::clone(&sink)).unwrap();
    (det, sink)
}

/// Context for step `k` of a 1 s step clock starting at 0.
fn step(k: u64) -> StepContext {
    StepContext::new(Step(k), k as f64, (k + 1) as f64)
}

fn vehicle(id: u64, vtype: &str, length: f64) -> VehicleState {
    VehicleState::new(VehicleId(id), format!("veh{id}"), vtype, length)
}

/// Move `v` to `new_pos` at `speed` and notify `det`.
fn advance(
    det:   &mut InstantInductLoop<Shared>,
    v:     &mut VehicleState,
    new_pos: f64,
    speed: f64,
    ctx:   StepContext,
) -> bool {
    let old = v.position;
    v.position = new_pos;
    v.speed = speed;
    det.on_move(v, old, new_pos, speed, &ctx).unwrap()
}

fn close_to(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ── Interpolation ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod interpolation_tests {
    use super::*;
    use crate::{passing_fraction, passing_time};

    #[test]
    fn fraction_is_linear_in_position() {
        assert!(close_to(passing_fraction(98.0, 100.0, 103.0, 5.0), 0.4));
        assert!(close_to(passing_fraction(100.0, 100.0, 103.0, 3.0), 0.0));
        assert!(close_to(passing_fraction(97.0, 100.0, 100.0, 3.0), 1.0));
    }

    #[test]
    fn standing_vehicle_crosses_at_step_end() {
        assert_eq!(passing_fraction(100.0, 100.0, 100.0, 0.0), 1.0);
        assert_eq!(passing_time(&step(4), 100.0, 100.0, 100.0, 0.0), 5.0);
    }

    #[test]
    fn fraction_is_clamped() {
        assert_eq!(passing_fraction(101.0, 100.0, 103.0, 2.0), 0.0);
        assert_eq!(passing_fraction(90.0, 100.0, 95.0, 5.0), 1.0);
    }

    #[test]
    fn constant_speed_entry_matches_closed_form() {
        let p = 100.0;
        for &(old, v) in &[(95.0, 7.5), (99.9, 0.5), (80.0, 25.0), (100.0, 13.0)] {
            let dt = 0.5;
            let ctx = StepContext::new(Step(20), 10.0, 10.0 + dt);
            let new = old + v * dt;
            assert!(new >= p, "test case must reach the loop");
            let t = passing_time(&ctx, old, p, new, v);
            assert!(close_to(t, 10.0 + (p - old) / v), "old={old} v={v}: got {t}");
            assert!(t >= ctx.start_secs && t <= ctx.end_secs);
        }
    }
}

// ── Filter and dwell table ────────────────────────────────────────────────────

#[cfg(test)]
mod filter_tests {
    use crate::VehicleTypeFilter;

    #[test]
    fn empty_filter_accepts_everything() {
        let f: VehicleTypeFilter = "".parse().unwrap();
        assert!(f.is_unrestricted());
        assert!(f.accepts("car"));
        assert!(f.accepts("bus"));
    }

    #[test]
    fn membership_is_exact() {
        let f: VehicleTypeFilter = "car  truck".parse().unwrap();
        assert!(f.accepts("car"));
        assert!(f.accepts("truck"));
        assert!(!f.accepts("Car"));
        assert!(!f.accepts("car "));
        assert_eq!(f.types().collect::<Vec<_>>(), ["car", "truck"]);
    }
}

#[cfg(test)]
mod dwell_tests {
    use lw_core::VehicleId;

    use crate::DwellTable;

    #[test]
    fn at_most_one_entry_per_vehicle() {
        let mut t = DwellTable::new();
        assert!(t.open(VehicleId(1), 10.4));
        assert!(!t.open(VehicleId(1), 12.0));
        assert_eq!(t.entry_time(VehicleId(1)), Some(10.4));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn close_removes_entry() {
        let mut t = DwellTable::new();
        t.open(VehicleId(3), 1.0);
        t.open(VehicleId(2), 2.0);
        assert_eq!(t.vehicles(), [VehicleId(2), VehicleId(3)]);
        assert_eq!(t.close(VehicleId(3)), Some(1.0));
        assert_eq!(t.close(VehicleId(3)), None);
        assert!(!t.is_open(VehicleId(3)));
        assert_eq!(t.len(), 1);
    }
}

// ── Induction loop ────────────────────────────────────────────────────────────

#[cfg(test)]
mod loop_tests {
    use super::*;
    use crate::{CrossingKind, DetectorConfig, VehicleTypeFilter};
    use lw_output::{Attribute, EventKind};

    #[test]
    fn prolog_written_on_construction() {
        let (_det, sink) = loop_at(100.0);
        assert_eq!(sink.borrow().prologs().len(), 1);
        assert_eq!(sink.borrow().prologs()[0].as_str(), "loop_0");
    }

    #[test]
    fn front_then_rear_crossing_produces_pass() {
        let (mut det, sink) = loop_at(100.0);
        let mut v = vehicle(1, "car", 5.0).at(98.0);
        assert!(det.on_enter(&v, EnterReason::Departed, &step(10)).unwrap());

        assert!(advance(&mut det, &mut v, 103.0, 5.0, step(10)), "still straddling");
        assert!(close_to(det.dwell().entry_time(VehicleId(1)).unwrap(), 10.4));

        assert!(!advance(&mut det, &mut v, 108.0, 5.0, step(11)), "cleared the loop");
        assert!(det.dwell().is_empty());

        let sink = sink.borrow();
        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, EventKind::Enter);
        assert!(close_to(records[0].time, 10.4));
        assert_eq!(records[0].attribute, None, "no gap before the first exit");

        let pass = &records[1];
        assert_eq!(pass.kind, EventKind::Pass);
        assert!(close_to(pass.time, 11.4));
        assert!(pass.time >= records[0].time);
        assert_eq!(pass.speed, 5.0);
        assert_eq!(pass.attribute.unwrap().name, Attribute::OCCUPANCY);
        assert!(close_to(pass.attribute.unwrap().value, 1.0));
        assert!(close_to(det.last_exit_time().unwrap(), 11.4));
        assert_eq!(det.stats().passed, 1);
    }

    #[test]
    fn not_reached_keeps_contact_without_state() {
        let (mut det, sink) = loop_at(100.0);
        let mut v = vehicle(1, "car", 5.0).at(10.0);
        assert!(advance(&mut det, &mut v, 20.0, 10.0, step(0)));
        assert!(det.dwell().is_empty());
        assert!(sink.borrow().records().is_empty());
    }

    #[test]
    fn short_fast_vehicle_enters_and_clears_in_one_step() {
        let (mut det, sink) = loop_at(100.0);
        let mut v = vehicle(1, "bike", 1.0).at(99.0);
        assert!(!advance(&mut det, &mut v, 105.0, 6.0, step(3)));
        let sink = sink.borrow();
        let kinds: Vec<_> = sink.records().iter().map(|r| r.kind).collect();
        assert_eq!(kinds, [EventKind::Enter, EventKind::Pass]);
        assert!(close_to(sink.records()[0].time, 3.0 + 1.0 / 6.0));
        assert!(close_to(sink.records()[1].time, 3.0 + 2.0 / 6.0));
    }

    #[test]
    fn vehicle_appearing_past_the_loop_is_never_tracked() {
        let (mut det, sink) = loop_at(100.0);
        let mut v = vehicle(1, "car", 5.0).at(101.0);
        assert!(advance(&mut det, &mut v, 102.0, 1.0, step(0)), "rear still behind loop");
        assert!(!advance(&mut det, &mut v, 106.0, 4.0, step(1)));
        assert_eq!(det.stats().entered, 0);
        assert!(sink.borrow().records().is_empty());
    }

    #[test]
    fn excluded_type_never_produces_state_or_records() {
        let (det, sink) = loop_at(100.0);
        let mut det = det.with_filter("truck".parse().unwrap());
        let mut v = vehicle(1, "car", 5.0).at(0.0);
        assert!(!det.on_enter(&v, EnterReason::Departed, &step(0)).unwrap());

        // Even a motion source that ignores the declined enter gets nothing.
        for k in 0..30 {
            let next = v.position + 10.0;
            let _ = advance(&mut det, &mut v, next, 10.0, step(k));
            assert!(det.dwell().is_empty());
        }
        assert!(!det.on_leave(&v, v.position, LeaveReason::Arrived, None, &step(30)).unwrap());
        assert!(sink.borrow().records().is_empty());
    }

    #[test]
    fn lane_change_dismisses_once() {
        let (mut det, sink) = loop_at(100.0);
        let mut v = vehicle(1, "car", 5.0).at(98.0);
        advance(&mut det, &mut v, 101.0, 3.0, step(10));

        let acked = det
            .on_leave(&v, 101.0, LeaveReason::LaneChange, Some(LaneId(1)), &step(10))
            .unwrap();
        assert!(acked);
        assert!(det.dwell().is_empty());

        let again = det
            .on_leave(&v, 101.0, LeaveReason::LaneChange, Some(LaneId(1)), &step(10))
            .unwrap();
        assert!(!again, "second dismissal is a no-op");

        let sink = sink.borrow();
        let dismissals: Vec<_> = sink.of_kind(EventKind::DismissLaneChange).collect();
        assert_eq!(dismissals.len(), 1);
        assert_eq!(dismissals[0].time, 11.0);
        assert!(dismissals[0].time >= sink.records()[0].time);
        assert_eq!(det.stats().dismissed, 1);
        assert_eq!(det.last_exit_time(), None, "dismissals do not move the exit clock");
    }

    #[test]
    fn removal_reasons_dismiss_by_removal() {
        for reason in [LeaveReason::Arrived, LeaveReason::Teleported, LeaveReason::Vaporized] {
            let (mut det, sink) = loop_at(100.0);
            let mut v = vehicle(1, "car", 5.0).at(99.0);
            advance(&mut det, &mut v, 100.0, 1.0, step(0));
            assert!(det.on_leave(&v, 100.0, reason, None, &step(0)).unwrap());
            assert_eq!(det.open_entries(), 0);
            assert_eq!(sink.borrow().of_kind(EventKind::DismissRemoval).count(), 1, "{reason}");
        }
    }

    #[test]
    fn same_step_dismissal_may_have_zero_occupancy() {
        let (mut det, sink) = loop_at(100.0);
        let mut v = vehicle(1, "car", 5.0).at(100.0);
        // standing exactly on the loop: entry at step end
        advance(&mut det, &mut v, 100.0, 0.0, step(5));
        det.on_leave(&v, 100.0, LeaveReason::Teleported, None, &step(5)).unwrap();
        let sink = sink.borrow();
        let d = sink.of_kind(EventKind::DismissRemoval).next().unwrap();
        assert_eq!(d.time, 6.0);
        assert_eq!(d.attribute.unwrap().value, 0.0);
    }

    #[test]
    fn running_off_the_lane_end_counts_as_pass() {
        let (mut det, sink) = loop_at(100.0);
        let mut v = vehicle(1, "car", 5.0).at(99.0);
        advance(&mut det, &mut v, 102.0, 3.0, step(0));
        assert!(det.on_leave(&v, 102.0, LeaveReason::Normal, None, &step(1)).unwrap());
        assert_eq!(sink.borrow().of_kind(EventKind::Pass).count(), 1);
        assert_eq!(det.last_exit_time(), Some(2.0));
    }

    #[test]
    fn gap_reported_from_previous_exit() {
        let (mut det, sink) = loop_at(100.0);
        let mut a = vehicle(1, "car", 5.0).at(98.0);
        advance(&mut det, &mut a, 103.0, 5.0, step(10));
        advance(&mut det, &mut a, 108.0, 5.0, step(11)); // exit 11.4

        let mut b = vehicle(2, "car", 5.0).at(95.0);
        advance(&mut det, &mut b, 101.0, 6.0, step(12)); // entry 12 + 5/6

        let sink = sink.borrow();
        let enter_b = sink.records().iter().rfind(|r| r.kind == EventKind::Enter).unwrap();
        assert_eq!(enter_b.vehicle, "veh2");
        let gap = enter_b.attribute.unwrap();
        assert_eq!(gap.name, Attribute::GAP);
        assert!(close_to(gap.value, 12.0 + 5.0 / 6.0 - 11.4));
    }

    #[test]
    fn overlapping_exit_is_diagnosed_and_clock_stays_monotonic() {
        let (mut det, _sink) = loop_at(100.0);
        let mut long = vehicle(1, "truck", 10.0).at(99.0);
        let mut short = vehicle(2, "car", 2.0).at(99.5);
        advance(&mut det, &mut long, 101.0, 2.0, step(0));
        advance(&mut det, &mut short, 100.5, 1.0, step(0));

        advance(&mut det, &mut long, 111.0, 10.0, step(1)); // exit 1.9
        assert!(close_to(det.last_exit_time().unwrap(), 1.9));
        advance(&mut det, &mut short, 103.5, 3.0, step(1)); // exit 1.5

        assert_eq!(det.stats().passed, 2);
        assert_eq!(det.stats().overlaps, 1);
        assert!(close_to(det.last_exit_time().unwrap(), 1.9));
    }

    #[test]
    fn last_exit_time_is_non_decreasing_across_passes() {
        let (mut det, _sink) = loop_at(50.0);
        let mut last = f64::NEG_INFINITY;
        for id in 0..5u64 {
            let mut v = vehicle(id, "car", 4.0).at(40.0);
            let mut k = id * 10;
            loop {
                let next = v.position + 3.0;
                if !advance(&mut det, &mut v, next, 3.0, step(k)) {
                    break;
                }
                k += 1;
            }
            let t = det.last_exit_time().unwrap();
            assert!(t >= last);
            last = t;
        }
        assert_eq!(det.stats().passed, 5);
        assert_eq!(det.stats().overlaps, 0);
    }

    #[test]
    fn stay_events_when_enabled() {
        let (det, sink) = loop_at(100.0);
        let mut det = det.with_options(LoopOptions { report_enter: false, report_stay: true });
        let mut v = vehicle(1, "car", 5.0).at(99.0);
        advance(&mut det, &mut v, 101.0, 2.0, step(0));
        advance(&mut det, &mut v, 103.0, 2.0, step(1));
        advance(&mut det, &mut v, 106.0, 3.0, step(2));
        let sink = sink.borrow();
        let kinds: Vec<_> = sink.records().iter().map(|r| r.kind).collect();
        assert_eq!(kinds, [EventKind::Stay, EventKind::Stay, EventKind::Pass]);
        assert_eq!(sink.records()[0].time, 1.0);
        assert_eq!(sink.records()[1].time, 2.0);
    }

    #[test]
    fn from_config_applies_filter_and_options() {
        let cfg = DetectorConfig {
            id:       "e1_in".into(),
            lane:     LaneId(0),
            position: 42.0,
            vtypes:   vec!["bus".into()],
            options:  LoopOptions { report_enter: false, report_stay: false },
        };
        let det = InstantInductLoop::from_config(&cfg, MemorySink::new()).unwrap();
        assert_eq!(det.id().as_str(), "e1_in");
        assert_eq!(det.position(), 42.0);
        assert_eq!(det.filter(), &VehicleTypeFilter::from_iter(["bus"]));
        assert_eq!(det.sink().prologs().len(), 1);
    }

    #[test]
    fn crossing_kind_maps_to_event_kind() {
        assert_eq!(EventKind::from(CrossingKind::Pass), EventKind::Pass);
        assert_eq!(EventKind::from(CrossingKind::DismissRemoval), EventKind::DismissRemoval);
    }

    #[test]
    fn close_finishes_sink() {
        let (mut det, sink) = loop_at(100.0);
        let mut v = vehicle(1, "car", 5.0).at(99.0);
        advance(&mut det, &mut v, 101.0, 2.0, step(0));
        assert_eq!(det.open_entries(), 1);
        det.close().unwrap();
        assert!(sink.borrow().is_finished());
    }
}

// ── Error propagation ─────────────────────────────────────────────────────────

#[cfg(test)]
mod error_tests {
    use lw_core::ObserverId;
    use lw_notify::NotifyError;
    use lw_output::{EventRecord, EventSink, OutputError, OutputResult};

    use super::*;

    /// Accepts the prolog, fails every event write.
    struct BrokenDisk;

    impl EventSink for BrokenDisk {
        fn write_prolog(&mut self, _d: &ObserverId) -> OutputResult<()> {
            Ok(())
        }
        fn write_event(&mut self, _r: &EventRecord) -> OutputResult<()> {
            Err(OutputError::Io(std::io::Error::other("disk full")))
        }
        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn sink_failure_propagates_from_on_move() {
        let mut det = InstantInductLoop::new("broken", 100.0, BrokenDisk).unwrap();
        let v = vehicle(1, "car", 5.0).at(103.0);
        let err = det.on_move(&v, 98.0, 103.0, 5.0, &step(0)).unwrap_err();
        assert!(matches!(err, NotifyError::Output(OutputError::Io(_))));
    }

    #[test]
    fn sink_failure_propagates_from_on_leave() {
        let mut det = InstantInductLoop::new("broken", 100.0, BrokenDisk)
            .unwrap()
            .with_options(LoopOptions { report_enter: false, report_stay: false });
        let v = vehicle(1, "car", 5.0).at(101.0);
        assert!(det.on_move(&v, 99.0, 101.0, 2.0, &step(0)).unwrap());
        let err = det.on_leave(&v, 101.0, LeaveReason::Vaporized, None, &step(0)).unwrap_err();
        assert!(matches!(err, NotifyError::Output(_)));
    }

    #[test]
    fn kinds_used_here_are_final() {
        assert!(EventKind::Pass.is_final());
    }
}
