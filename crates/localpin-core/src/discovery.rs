//! Pure vendor discovery over a snapshot.
//!
//! [`discover`] holds no state: the same `(vendors, query)` always produces
//! the same lists, so it can be re-run from any trigger (a new vendor
//! snapshot, a new position, a filter change) without coordination.

use serde::Serialize;

use crate::error::ValidationError;
use crate::geo::{distance_km, Position};
use crate::vendor::{CategoryFilter, VendorRecord};

/// Maximum length of [`DiscoveryResult::recently_online`].
pub const RECENTLY_ONLINE_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscoveryQuery {
    pub origin: Position,
    pub radius_km: f64,
    pub category: CategoryFilter,
}

impl DiscoveryQuery {
    /// Build a validated query.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the radius is not a positive finite
    /// number or the origin is not a valid WGS84 position.
    pub fn new(
        origin: Position,
        radius_km: f64,
        category: CategoryFilter,
    ) -> Result<Self, ValidationError> {
        let query = Self {
            origin,
            radius_km,
            category,
        };
        query.validate()?;
        Ok(query)
    }

    /// # Errors
    ///
    /// See [`DiscoveryQuery::new`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.radius_km.is_finite() && self.radius_km > 0.0) {
            return Err(ValidationError::InvalidRadius(self.radius_km));
        }
        if !self.origin.is_valid() {
            return Err(ValidationError::InvalidOrigin {
                lat: self.origin.lat,
                lng: self.origin.lng,
            });
        }
        Ok(())
    }

    fn includes(&self, vendor: &VendorRecord) -> bool {
        let Some(location) = vendor.location else {
            return false;
        };
        self.category.matches(vendor.category) && distance_km(self.origin, location) <= self.radius_km
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiscoveryResult {
    /// Located vendors matching the category within the radius, in snapshot order.
    pub in_range: Vec<VendorRecord>,
    /// The online subset of `in_range`.
    pub online_in_range: Vec<VendorRecord>,
    /// Global activity feed; see [`recently_online`].
    pub recently_online: Vec<VendorRecord>,
}

/// Derive the three discovery lists for `query` from a vendor snapshot.
///
/// The radius boundary is inclusive.
///
/// # Errors
///
/// Returns [`ValidationError`] for an invalid query instead of an empty
/// result, so a bad query is never mistaken for "no vendors nearby".
pub fn discover(
    vendors: &[VendorRecord],
    query: &DiscoveryQuery,
) -> Result<DiscoveryResult, ValidationError> {
    query.validate()?;

    let in_range: Vec<VendorRecord> = vendors
        .iter()
        .filter(|v| query.includes(v))
        .cloned()
        .collect();
    let online_in_range = in_range.iter().filter(|v| v.online).cloned().collect();

    Ok(DiscoveryResult {
        in_range,
        online_in_range,
        recently_online: recently_online(vendors),
    })
}

/// Online vendors across the whole snapshot, most recently online first.
///
/// Ignores radius and category: this is the "who's active" signal, not a
/// spatial list. Ties keep snapshot order. At most [`RECENTLY_ONLINE_LIMIT`].
#[must_use]
pub fn recently_online(vendors: &[VendorRecord]) -> Vec<VendorRecord> {
    let mut online: Vec<&VendorRecord> = vendors.iter().filter(|v| v.online).collect();
    online.sort_by(|a, b| b.last_online_at.cmp(&a.last_online_at));
    online
        .into_iter()
        .take(RECENTLY_ONLINE_LIMIT)
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "discovery_test.rs"]
mod tests;
