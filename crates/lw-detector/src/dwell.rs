//! Per-detector map from vehicle identity to open-crossing entry time.

use lw_core::VehicleId;

#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

/// Open crossings, keyed by the vehicle's stable numerical id.
///
/// Holds at most one entry per vehicle.  An entry exists from the instant
/// the vehicle's front crosses the detector until the crossing is finalized
/// (`pass` or a dismissal); the detector is the only owner.
#[derive(Debug, Default)]
pub struct DwellTable {
    entries: Map<VehicleId, f64>,
}

impl DwellTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a crossing for `vehicle` at `entry_time`.
    ///
    /// Returns `false` and leaves the table unchanged if one is already open.
    pub fn open(&mut self, vehicle: VehicleId, entry_time: f64) -> bool {
        match self.entries.entry(vehicle) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(entry_time);
                true
            }
        }
    }

    /// Remove and return the entry time of `vehicle`'s open crossing.
    pub fn close(&mut self, vehicle: VehicleId) -> Option<f64> {
        self.entries.remove(&vehicle)
    }

    #[inline]
    pub fn entry_time(&self, vehicle: VehicleId) -> Option<f64> {
        self.entries.get(&vehicle).copied()
    }

    #[inline]
    pub fn is_open(&self, vehicle: VehicleId) -> bool {
        self.entries.contains_key(&vehicle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vehicles with an open crossing, in ascending id order.
    pub fn vehicles(&self) -> Vec<VehicleId> {
        let mut ids: Vec<VehicleId> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
