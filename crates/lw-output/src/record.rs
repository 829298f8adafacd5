//! Plain data types handed to output sinks.

use std::fmt;

use lw_core::{ObserverId, VehicleId};

/// What happened at the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The vehicle's front crossed the monitored position.
    Enter,
    /// The vehicle straddles the monitored position at step end.
    Stay,
    /// The vehicle's trailing edge cleared the monitored position.
    Pass,
    /// An open crossing ended because the vehicle changed lanes.
    DismissLaneChange,
    /// An open crossing ended because the vehicle was removed
    /// (arrival, teleport, collision, simulation end).
    DismissRemoval,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Enter             => "enter",
            EventKind::Stay              => "stay",
            EventKind::Pass              => "pass",
            EventKind::DismissLaneChange => "dismiss-lane-change",
            EventKind::DismissRemoval    => "dismiss-removal",
        }
    }

    /// `true` for kinds that close a crossing.
    pub fn is_final(self) -> bool {
        matches!(
            self,
            EventKind::Pass | EventKind::DismissLaneChange | EventKind::DismissRemoval
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The optional named value attached to an event (`gap`, `occupancy`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attribute {
    pub name:  &'static str,
    pub value: f64,
}

impl Attribute {
    pub const GAP: &'static str = "gap";
    pub const OCCUPANCY: &'static str = "occupancy";

    pub fn gap(value: f64) -> Self {
        Self { name: Self::GAP, value }
    }

    pub fn occupancy(value: f64) -> Self {
        Self { name: Self::OCCUPANCY, value }
    }
}

/// One output row: `write(time, vehicle, kind, speed, attribute)` plus the
/// detector and vehicle metadata every backend records.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub detector:     ObserverId,
    /// Simulated time of the event in seconds (sub-step precision).
    pub time:         f64,
    pub kind:         EventKind,
    pub vehicle:      String,
    pub numerical_id: VehicleId,
    pub speed:        f64,
    pub length:       f64,
    pub vehicle_type: String,
    pub attribute:    Option<Attribute>,
}
