//! The vehicle handle observers read from.
//!
//! Observers never own a vehicle.  The motion source passes `&dyn Vehicle`
//! into every notification; observers read identity and kinematic state from
//! it and must not keep the borrow past the call.  Anything that has to
//! outlive a call (dwell entries, device bindings) is keyed by
//! [`Vehicle::numerical_id`].

use crate::VehicleId;

/// Read-only view of one vehicle.
pub trait Vehicle {
    /// Stable integer identity, usable as a map key.
    fn numerical_id(&self) -> VehicleId;

    /// Human-readable id used in output records.
    fn id(&self) -> &str;

    /// Vehicle type tag matched by detector type filters.
    fn type_id(&self) -> &str;

    /// Physical length in meters (front bumper to rear bumper).
    fn length(&self) -> f64;

    /// Front position along the current lane in meters.
    fn position(&self) -> f64;

    /// Current speed in m/s.
    fn speed(&self) -> f64;

    /// Position of the trailing edge along the current lane.
    #[inline]
    fn back_position(&self) -> f64 {
        self.position() - self.length()
    }
}

/// Plain kinematic state of a vehicle, as kept by the motion source.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleState {
    pub numerical_id: VehicleId,
    pub id:           String,
    pub type_id:      String,
    pub length:       f64,
    pub position:     f64,
    pub speed:        f64,
}

impl VehicleState {
    /// A stopped vehicle at position 0.
    pub fn new(
        numerical_id: VehicleId,
        id:           impl Into<String>,
        type_id:      impl Into<String>,
        length:       f64,
    ) -> Self {
        Self {
            numerical_id,
            id:       id.into(),
            type_id:  type_id.into(),
            length,
            position: 0.0,
            speed:    0.0,
        }
    }

    /// Builder-style initial position.
    pub fn at(mut self, position: f64) -> Self {
        self.position = position;
        self
    }

    /// Builder-style initial speed.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }
}

impl Vehicle for VehicleState {
    #[inline]
    fn numerical_id(&self) -> VehicleId {
        self.numerical_id
    }

    #[inline]
    fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    fn type_id(&self) -> &str {
        &self.type_id
    }

    #[inline]
    fn length(&self) -> f64 {
        self.length
    }

    #[inline]
    fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    fn speed(&self) -> f64 {
        self.speed
    }
}
