//! Why a vehicle came into or went out of contact with an observer.

use std::fmt;

/// Reason passed to [`MoveObserver::on_enter`][crate::MoveObserver::on_enter].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnterReason {
    /// The vehicle was inserted into the network on this lane.
    Departed,
    /// The vehicle changed onto this lane from a neighbour.
    LaneChange,
    /// The vehicle was re-inserted here after a teleport.
    Teleport,
}

/// Reason passed to [`MoveObserver::on_leave`][crate::MoveObserver::on_leave].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeaveReason {
    /// The vehicle ran off the end of the lane.
    Normal,
    /// The vehicle moved to a neighbouring lane.
    LaneChange,
    /// The vehicle reached its destination and was removed.
    Arrived,
    /// The vehicle was teleported away (jam, collision).
    Teleported,
    /// The vehicle was deleted outright (calibrator, simulation end).
    Vaporized,
}

impl LeaveReason {
    /// `true` if the vehicle ceases to exist after this notification.
    pub fn is_removal(self) -> bool {
        matches!(
            self,
            LeaveReason::Arrived | LeaveReason::Teleported | LeaveReason::Vaporized
        )
    }
}

impl fmt::Display for LeaveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LeaveReason::Normal     => "normal",
            LeaveReason::LaneChange => "laneChange",
            LeaveReason::Arrived    => "arrived",
            LeaveReason::Teleported => "teleported",
            LeaveReason::Vaporized  => "vaporized",
        };
        f.write_str(s)
    }
}
