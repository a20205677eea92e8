//! Merge-patches a vendor's own client writes to its vendor document.
//!
//! Availability updates write both the `online` flag and the legacy `status`
//! string so readers of either representation agree. Timestamps use the
//! store's native `{seconds, nanoseconds}` shape, which
//! [`crate::normalize::timestamp_millis`] reads back to the millisecond.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::error::BroadcastError;
use crate::geo::Position;
use crate::vendor::Category;

#[must_use]
pub fn store_timestamp(at: DateTime<Utc>) -> Value {
    json!({
        "seconds": at.timestamp(),
        "nanoseconds": at.timestamp_subsec_nanos(),
    })
}

/// Patch for toggling availability at the vendor's current location.
///
/// `lastOnlineAt` is only written when going online, so the recently-online
/// ranking reflects when the vendor last came online.
///
/// # Errors
///
/// Returns [`BroadcastError::InvalidLocation`] for an invalid position.
pub fn availability_patch(
    location: Position,
    online: bool,
    now: DateTime<Utc>,
) -> Result<Value, BroadcastError> {
    let mut patch = location_patch(location, now)?;
    patch["online"] = Value::Bool(online);
    patch["status"] = Value::from(if online { "online" } else { "offline" });
    if online {
        patch["lastOnlineAt"] = store_timestamp(now);
    }
    Ok(patch)
}

/// # Errors
///
/// Returns [`BroadcastError::InvalidLocation`] for an invalid position.
pub fn location_patch(location: Position, now: DateTime<Utc>) -> Result<Value, BroadcastError> {
    if !location.is_valid() {
        return Err(BroadcastError::InvalidLocation);
    }
    Ok(json!({
        "location": { "lat": location.lat, "lng": location.lng },
        "lastUpdated": store_timestamp(now),
    }))
}

/// Patch for the service details form. All fields are required.
///
/// # Errors
///
/// Returns [`BroadcastError::MissingField`] when a field is blank after
/// trimming, or [`BroadcastError::UnknownCategory`] for an unrecognised
/// category.
pub fn service_info_patch(
    service_name: &str,
    description: &str,
    category: &str,
    now: DateTime<Utc>,
) -> Result<Value, BroadcastError> {
    let service_name = required("serviceName", service_name)?;
    let description = required("serviceDescription", description)?;
    let category_raw = required("category", category)?;
    let category = Category::parse(category_raw)
        .ok_or_else(|| BroadcastError::UnknownCategory(category_raw.to_string()))?;

    Ok(json!({
        "serviceName": service_name,
        "serviceDescription": description,
        "category": category.as_str(),
        "lastUpdated": store_timestamp(now),
    }))
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, BroadcastError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(BroadcastError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}
