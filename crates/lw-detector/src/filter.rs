//! Vehicle-type filter shared by all detector kinds.

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::str::FromStr;

/// Set of accepted vehicle type ids.  Empty means "accept every type".
///
/// Matching is exact string membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleTypeFilter {
    accepted: BTreeSet<String>,
}

impl VehicleTypeFilter {
    /// A filter that accepts every vehicle.
    pub fn accept_all() -> Self {
        Self::default()
    }

    /// `true` when no restriction is configured.
    pub fn is_unrestricted(&self) -> bool {
        self.accepted.is_empty()
    }

    pub fn accepts(&self, type_id: &str) -> bool {
        self.accepted.is_empty() || self.accepted.contains(type_id)
    }

    /// Accepted ids in sorted order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.accepted.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for VehicleTypeFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            accepted: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Whitespace-separated list of type ids, e.g. `"car truck"`.
impl FromStr for VehicleTypeFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.split_whitespace().collect())
    }
}
