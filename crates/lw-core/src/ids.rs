//! Strongly typed identifier wrappers.
//!
//! Integer ids are `Copy + Ord + Hash` so they can be used as map keys and
//! sorted collection elements without ceremony.  `VehicleId` is the stable
//! numerical identity of a vehicle: dwell tables and device collections key
//! on it, never on an object address.
//!
//! `ObserverId` is the string identity of a detector or device.  It is unique
//! per observer instance and never changes for the lifetime of the observer.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Stable numerical identity of a vehicle, assigned at insertion.
    pub struct VehicleId(u64);
}

typed_id! {
    /// Index of a lane in the motion source's lane table.
    pub struct LaneId(u32);
}

// ── ObserverId ────────────────────────────────────────────────────────────────

/// String identity of a detector or device.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ObserverId(String);

impl ObserverId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObserverId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ObserverId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ObserverId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
