//! Detector configuration as handed over by the (external) input layer.

use lw_core::LaneId;

/// Which non-final events a loop writes besides finished crossings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoopOptions {
    /// Write an `enter` event when a front crosses the loop.
    pub report_enter: bool,
    /// Write a `stay` event at every step end while a vehicle straddles the loop.
    pub report_stay:  bool,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self { report_enter: true, report_stay: false }
    }
}

/// One instantaneous induction loop.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectorConfig {
    pub id:       String,
    pub lane:     LaneId,
    /// Monitored position in meters from the lane start.
    pub position: f64,
    /// Accepted vehicle types; empty accepts all.
    #[cfg_attr(feature = "serde", serde(default))]
    pub vtypes:   Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub options:  LoopOptions,
}
