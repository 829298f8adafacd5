//! single_loop — induction loops on a two-lane stretch.
//!
//! Loads an embedded JSON scenario, runs it through the reference step loop
//! and writes every loop event to `output/single_loop/detectors.csv`.
//! Set `RUST_LOG=debug` (or `trace`) to watch crossings as they happen.

mod scenario;
#[cfg(test)]
mod tests;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lw_core::{LaneId, Step, VehicleId, VehicleRng, VehicleState};
use lw_detector::InstantInductLoop;
use lw_device::{TripDevice, TripLog};
use lw_notify::{LeaveReason, StepContext};
use lw_output::CsvSink;
use lw_sim::{Driver, Maneuver, SimBuilder, SimMonitor};

use scenario::{LaneChangeSpec, VehicleSpec};

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR:     &str = "output/single_loop";
const PROGRESS_EVERY: u64  = 40;

// ── Driver ────────────────────────────────────────────────────────────────────

struct Plan {
    min_speed:   f64,
    max_speed:   f64,
    cruise:      Option<f64>,
    lane_change: Option<LaneChangeSpec>,
}

/// Cruises at a per-vehicle speed drawn on the first step, with an optional
/// single lane change.
struct CruiseDriver {
    plans: BTreeMap<VehicleId, Plan>,
}

impl CruiseDriver {
    fn new(specs: &[(VehicleId, VehicleSpec)]) -> Self {
        let plans = specs
            .iter()
            .map(|(id, s)| {
                (*id, Plan {
                    min_speed:   s.min_speed,
                    max_speed:   s.max_speed,
                    cruise:      None,
                    lane_change: s.lane_change,
                })
            })
            .collect();
        Self { plans }
    }
}

impl Driver for CruiseDriver {
    fn maneuver(
        &mut self,
        vehicle: &VehicleState,
        lane:    LaneId,
        _ctx:    &StepContext,
        rng:     &mut VehicleRng,
    ) -> Maneuver {
        let Some(plan) = self.plans.get_mut(&vehicle.numerical_id) else {
            return Maneuver::Remove(LeaveReason::Vaporized);
        };
        if let Some(change) = plan.lane_change {
            if change.lane != lane && vehicle.position >= change.at {
                plan.lane_change = None;
                return Maneuver::ChangeLane { to: change.lane };
            }
        }
        let (lo, hi) = (plan.min_speed, plan.max_speed);
        let speed = *plan.cruise.get_or_insert_with(|| rng.gen_range(lo..=hi));
        Maneuver::Advance { speed }
    }
}

// ── Monitor ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Progress {
    removed: Vec<(String, LeaveReason)>,
}

impl SimMonitor for Progress {
    fn on_step_end(&mut self, step: Step, vehicles: usize) {
        if step.0 % PROGRESS_EVERY == 0 {
            info!(%step, vehicles, "progress");
        }
    }

    fn on_vehicle_removed(&mut self, vehicle: &VehicleState, reason: LeaveReason) {
        self.removed.push((vehicle.id.clone(), reason));
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 1. Scenario.
    let scenario = scenario::load().context("parsing embedded scenario")?;
    let specs: Vec<(VehicleId, VehicleSpec)> = scenario
        .vehicles
        .iter()
        .enumerate()
        .map(|(i, s)| (VehicleId(i as u64), s.clone()))
        .collect();
    println!("=== single_loop — lanewatch induction loops ===");
    println!(
        "Lanes: {}  |  Loops: {}  |  Vehicles: {}  |  Steps: {} × {} s",
        scenario.lanes.len(),
        scenario.detectors.len(),
        specs.len(),
        scenario.config.total_steps,
        scenario.config.step_length_secs,
    );
    println!();

    // 2. Output: all loops share one CSV file.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let csv_path = Path::new(OUTPUT_DIR).join("detectors.csv");
    let sink = Rc::new(RefCell::new(CsvSink::create(&csv_path)?));
    let trips = TripLog::default();

    // 3. Sim.
    let mut builder = SimBuilder::new(scenario.config.clone(), CruiseDriver::new(&specs))
        .device(TripDevice::KIND, TripDevice::factory(Rc::clone(&trips), scenario.trip_probability));
    for lane in &scenario.lanes {
        builder = builder.lane(lane.id, lane.length);
    }
    for cfg in &scenario.detectors {
        let det = InstantInductLoop::from_config(cfg, Rc::clone(&sink))?;
        builder = builder.observer(cfg.lane, cfg.position, Box::new(det));
    }
    let mut sim = builder.build()?;

    // 4. Run, inserting vehicles at their departure steps.
    let mut monitor = Progress::default();
    let t0 = Instant::now();
    for step in 0..scenario.config.total_steps {
        for (id, spec) in specs.iter().filter(|(_, s)| s.depart_step == step) {
            let state = VehicleState::new(*id, spec.id.as_str(), spec.vtype.as_str(), spec.length);
            sim.insert_vehicle(state, spec.lane)
                .with_context(|| format!("inserting {}", spec.id))?;
        }
        sim.run_steps(1, &mut monitor)?;
    }
    sim.finish(&mut monitor)?;
    let elapsed = t0.elapsed();

    // 5. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  {} : written", csv_path.display());
    println!();

    println!("{:<8} {:<12}", "Vehicle", "Left by");
    println!("{}", "-".repeat(20));
    for (vehicle, reason) in &monitor.removed {
        println!("{vehicle:<8} {:<12}", reason.to_string());
    }
    println!();

    println!(
        "{:<8} {:>8} {:>8} {:>10} {:>8} {:>6}",
        "Vehicle", "Depart", "Arrive", "Length m", "Wait s", "LC"
    );
    println!("{}", "-".repeat(54));
    for t in trips.borrow().iter() {
        println!(
            "{:<8} {:>8.1} {:>8.1} {:>10.1} {:>8.1} {:>6}",
            t.vehicle, t.depart_time, t.arrival_time, t.route_length, t.waiting_time, t.lane_changes,
        );
    }

    Ok(())
}
