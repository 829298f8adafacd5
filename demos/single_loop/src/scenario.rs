//! Embedded JSON scenario: two lanes, three loops, a handful of vehicles.

use anyhow::ensure;
use lw_core::{LaneId, SimConfig};
use lw_detector::DetectorConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub config:           SimConfig,
    pub lanes:            Vec<LaneSpec>,
    pub detectors:        Vec<DetectorConfig>,
    pub vehicles:         Vec<VehicleSpec>,
    /// Share of vehicles carrying a trip device.
    pub trip_probability: f64,
}

#[derive(Debug, Deserialize)]
pub struct LaneSpec {
    pub id:     LaneId,
    pub length: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VehicleSpec {
    pub id:          String,
    pub vtype:       String,
    pub length:      f64,
    pub lane:        LaneId,
    pub depart_step: u64,
    /// Cruise speed is drawn uniformly from `[min_speed, max_speed]` (m/s).
    pub min_speed:   f64,
    pub max_speed:   f64,
    /// Change to `lane` once the front passes `at` meters.
    #[serde(default)]
    pub lane_change: Option<LaneChangeSpec>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LaneChangeSpec {
    pub at:   f64,
    pub lane: LaneId,
}

// Lane 0 carries loops at 150 m and 400 m; lane 1 a bus-only loop at 300 m.
// veh3 changes lanes while straddling the first loop; veh5 departs late
// enough to still be on lane 0 when the run ends.
pub const SCENARIO_JSON: &str = r#"{
  "config": { "begin_secs": 0.0, "step_length_secs": 0.5, "total_steps": 160, "seed": 42 },
  "lanes": [
    { "id": 0, "length": 500.0 },
    { "id": 1, "length": 500.0 }
  ],
  "detectors": [
    { "id": "e1_150", "lane": 0, "position": 150.0 },
    { "id": "e1_400", "lane": 0, "position": 400.0, "options": { "report_enter": true, "report_stay": true } },
    { "id": "e1_bus", "lane": 1, "position": 300.0, "vtypes": ["bus"] }
  ],
  "vehicles": [
    { "id": "veh0", "vtype": "car", "length": 4.5,  "lane": 0, "depart_step": 0,   "min_speed": 12.0, "max_speed": 16.0 },
    { "id": "veh1", "vtype": "car", "length": 4.5,  "lane": 0, "depart_step": 4,   "min_speed": 11.0, "max_speed": 15.0 },
    { "id": "veh2", "vtype": "bus", "length": 12.0, "lane": 1, "depart_step": 6,   "min_speed": 8.0,  "max_speed": 10.0 },
    { "id": "veh3", "vtype": "car", "length": 4.5,  "lane": 0, "depart_step": 10,  "min_speed": 14.0, "max_speed": 14.0,
      "lane_change": { "at": 152.0, "lane": 1 } },
    { "id": "veh4", "vtype": "bus", "length": 12.0, "lane": 0, "depart_step": 12,  "min_speed": 7.0,  "max_speed": 9.0,
      "lane_change": { "at": 200.0, "lane": 1 } },
    { "id": "veh5", "vtype": "car", "length": 4.5,  "lane": 0, "depart_step": 130, "min_speed": 14.0, "max_speed": 16.0 }
  ],
  "trip_probability": 1.0
}"#;

pub fn load() -> anyhow::Result<Scenario> {
    parse(SCENARIO_JSON)
}

pub fn parse(json: &str) -> anyhow::Result<Scenario> {
    let scenario: Scenario = serde_json::from_str(json)?;
    scenario.validate()?;
    Ok(scenario)
}

impl Scenario {
    /// Reject vehicles whose speed bounds cannot be sampled.
    pub fn validate(&self) -> anyhow::Result<()> {
        for v in &self.vehicles {
            ensure!(
                v.min_speed.is_finite() && v.max_speed.is_finite(),
                "vehicle {}: speed bounds must be finite",
                v.id,
            );
            ensure!(
                0.0 <= v.min_speed && v.min_speed <= v.max_speed,
                "vehicle {}: need 0 <= min_speed ({}) <= max_speed ({})",
                v.id,
                v.min_speed,
                v.max_speed,
            );
        }
        Ok(())
    }
}
