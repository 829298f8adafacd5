//! Fluent builder for constructing a [`Sim`].

use std::collections::BTreeMap;

use lw_core::{LaneId, SimConfig};
use lw_device::{DeviceFactory, DeviceRegistry};
use lw_notify::MoveObserver;

use crate::{Driver, Lane, Sim, SimError, SimResult};

/// Fluent builder for [`Sim<D>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — step length, total steps, seed
/// - `D: Driver` — the driving model
///
/// # Optional inputs
///
/// | Method                          | Effect                                  |
/// |---------------------------------|-----------------------------------------|
/// | `.lane(id, length)`             | Add a lane                              |
/// | `.observer(lane, pos, obs)`     | Attach an observer to a lane            |
/// | `.device(kind, factory)`        | Equip inserted vehicles with a device   |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, ConstantSpeed(10.0))
///     .lane(LaneId(0), 400.0)
///     .lane(LaneId(1), 400.0)
///     .observer(LaneId(0), 200.0, Box::new(loop_a))
///     .device(TripDevice::KIND, TripDevice::factory(log, 1.0))
///     .build()?;
/// ```
pub struct SimBuilder<D: Driver> {
    config:    SimConfig,
    driver:    D,
    lanes:     Vec<(LaneId, f64)>,
    observers: Vec<(LaneId, f64, Box<dyn MoveObserver>)>,
    devices:   DeviceRegistry,
}

impl<D: Driver> SimBuilder<D> {
    pub fn new(config: SimConfig, driver: D) -> Self {
        Self {
            config,
            driver,
            lanes:     Vec::new(),
            observers: Vec::new(),
            devices:   DeviceRegistry::new(),
        }
    }

    /// Add a lane of `length` meters.
    pub fn lane(mut self, id: LaneId, length: f64) -> Self {
        self.lanes.push((id, length));
        self
    }

    /// Attach `observer` to `lane` at `position` meters from the lane start.
    ///
    /// Observers sharing an id replace each other in attachment order, as
    /// with [`Sim::attach`].
    pub fn observer(mut self, lane: LaneId, position: f64, observer: Box<dyn MoveObserver>) -> Self {
        self.observers.push((lane, position, observer));
        self
    }

    /// Register a device factory for `kind`.
    pub fn device(mut self, kind: &'static str, factory: DeviceFactory) -> Self {
        self.devices.register(kind, factory);
        self
    }

    /// Validate the configuration and topology and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<D>> {
        self.config.validate()?;

        let mut lanes = BTreeMap::new();
        for (id, length) in self.lanes {
            if !(length.is_finite() && length > 0.0) {
                return Err(SimError::Config(format!("lane {id} has invalid length {length}")));
            }
            if lanes.insert(id, Lane::new(id, length)).is_some() {
                return Err(SimError::Config(format!("lane {id} defined twice")));
            }
        }

        let mut sim = Sim::new(self.config, self.driver, lanes, self.devices);
        for (lane, position, observer) in self.observers {
            sim.attach(lane, position, observer)?;
        }
        Ok(sim)
    }
}
