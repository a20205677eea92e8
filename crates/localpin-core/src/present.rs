//! Per-vendor display data derived from discovery results.
//!
//! Everything here is a pure function of its inputs; the underlying
//! [`VendorRecord`] is never modified.

use chrono::{DateTime, SecondsFormat};
use serde::Serialize;

use crate::geo::{distance_km, Position};
use crate::vendor::VendorRecord;

pub const DEFAULT_DIRECTIONS_BASE_URL: &str = "https://www.google.com/maps";

const FALLBACK_NAME: &str = "Vendor";
const NOBODY_ONLINE: &str = "No one online yet";

/// Builds turn-by-turn links for an external map application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionsLinks {
    base_url: String,
}

impl DirectionsLinks {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `{base}/dir/?api=1[&origin=lat,lng]&destination=lat,lng`
    #[must_use]
    pub fn url(&self, origin: Option<Position>, destination: Position) -> String {
        let origin = origin.map(|o| format!("&origin={o}")).unwrap_or_default();
        format!(
            "{}/dir/?api=1{origin}&destination={destination}",
            self.base_url
        )
    }
}

impl Default for DirectionsLinks {
    fn default() -> Self {
        Self::new(DEFAULT_DIRECTIONS_BASE_URL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorStatus {
    Online,
    Offline,
}

impl VendorStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            VendorStatus::Online => "Online",
            VendorStatus::Offline => "Offline",
        }
    }

    /// Indicator color shown next to the label.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            VendorStatus::Online => "green",
            VendorStatus::Offline => "red",
        }
    }
}

impl From<bool> for VendorStatus {
    fn from(online: bool) -> Self {
        if online {
            VendorStatus::Online
        } else {
            VendorStatus::Offline
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorCard {
    pub id: String,
    pub display_name: String,
    pub category_label: String,
    pub description: Option<String>,
    pub distance_km: Option<f64>,
    /// One decimal place, e.g. `"2.4 km"`.
    pub distance_label: Option<String>,
    /// Four decimal places, e.g. `"28.6100, 77.2000"`.
    pub coordinates_label: Option<String>,
    pub directions_url: Option<String>,
    pub status: VendorStatus,
    pub last_updated_label: String,
}

/// Derive the display card for one vendor.
///
/// Distance needs both an origin and a vendor location; the directions link
/// needs a vendor location and omits its origin when none is known.
#[must_use]
pub fn present(
    vendor: &VendorRecord,
    origin: Option<Position>,
    links: &DirectionsLinks,
) -> VendorCard {
    let distance = origin.zip(vendor.location).map(|(o, l)| distance_km(o, l));

    VendorCard {
        id: vendor.id.clone(),
        display_name: display_name(vendor).to_string(),
        category_label: vendor
            .category
            .map_or("N/A", |c| c.label())
            .to_string(),
        description: vendor.service_description.clone(),
        distance_km: distance,
        distance_label: distance.map(|d| format!("{d:.1} km")),
        coordinates_label: vendor
            .location
            .map(|l| format!("{:.4}, {:.4}", l.lat, l.lng)),
        directions_url: vendor.location.map(|l| links.url(origin, l)),
        status: VendorStatus::from(vendor.online),
        last_updated_label: last_updated_label(vendor.last_online_at),
    }
}

#[must_use]
pub fn present_all(
    vendors: &[VendorRecord],
    origin: Option<Position>,
    links: &DirectionsLinks,
) -> Vec<VendorCard> {
    vendors.iter().map(|v| present(v, origin, links)).collect()
}

/// One-line "most recently online" banner text.
#[must_use]
pub fn recently_online_banner(vendors: &[VendorRecord]) -> String {
    if vendors.is_empty() {
        return NOBODY_ONLINE.to_string();
    }
    vendors
        .iter()
        .map(display_name)
        .collect::<Vec<_>>()
        .join(" , ")
}

/// RFC 3339 UTC text for an epoch-millisecond timestamp; `"N/A"` when unknown.
#[must_use]
pub fn last_updated_label(millis: i64) -> String {
    if millis == 0 {
        return "N/A".to_string();
    }
    DateTime::from_timestamp_millis(millis).map_or_else(
        || "N/A".to_string(),
        |dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

fn display_name(vendor: &VendorRecord) -> &str {
    if vendor.name.is_empty() {
        FALLBACK_NAME
    } else {
        &vendor.name
    }
}
