//! A single lane and the observers attached to it.

use lw_core::LaneId;
use lw_notify::LaneObservers;

/// One lane: a straight segment `[0, length]` in meters.
pub struct Lane {
    pub id:        LaneId,
    pub length:    f64,
    pub observers: LaneObservers,
}

impl Lane {
    pub fn new(id: LaneId, length: f64) -> Self {
        Self { id, length, observers: LaneObservers::new() }
    }

    /// `true` if `position` lies on the lane.
    #[inline]
    pub fn contains(&self, position: f64) -> bool {
        (0.0..=self.length).contains(&position)
    }
}
