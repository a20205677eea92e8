//! Normalization from raw vendor documents to [`VendorRecord`].
//!
//! Vendor documents are written by several generations of the vendor client,
//! so field names and value shapes vary. Every function here is total: a
//! missing or malformed field degrades to a default and never fails the
//! snapshot it belongs to.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::geo::Position;
use crate::vendor::{Category, VendorRecord};

/// Timestamp fields consulted for `last_online_at`, first present wins.
pub const LAST_ONLINE_FIELDS: [&str; 3] = ["lastOnlineAt", "updatedAt", "lastUpdated"];

const NAME_FIELDS: [&str; 2] = ["name", "serviceName"];
const LAT_FIELDS: [&str; 3] = ["lat", "latitude", "_latitude"];
const LNG_FIELDS: [&str; 3] = ["lng", "longitude", "_longitude"];

/// One document as delivered by the vendor collection stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawVendorDocument {
    pub id: String,
    pub data: Value,
}

impl RawVendorDocument {
    #[must_use]
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Build a document from an exported value that carries its id inline
    /// (`{"id": "v1", ...fields}`).
    ///
    /// Values without a usable id get a positional one so the record still
    /// reaches the snapshot.
    #[must_use]
    pub fn from_inline(index: usize, value: Value) -> Self {
        let id = match value.get("id") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => format!("unidentified-{index}"),
        };
        Self { id, data: value }
    }
}

/// Normalize a batch of documents, preserving their order.
#[must_use]
pub fn normalize_snapshot(docs: &[RawVendorDocument]) -> Vec<VendorRecord> {
    docs.iter()
        .map(|doc| normalize_vendor(&doc.id, &doc.data))
        .collect()
}

/// Normalize one raw vendor document.
///
/// Accepts any JSON value; non-object input yields a record holding only the id.
#[must_use]
pub fn normalize_vendor(id: &str, raw: &Value) -> VendorRecord {
    let location = resolve_location(raw.get("location"));
    if location.is_none() && raw.get("location").is_some_and(|v| !v.is_null()) {
        tracing::debug!(vendor_id = id, "malformed vendor location; excluded from spatial results");
    }

    VendorRecord {
        id: id.to_string(),
        name: resolve_name(raw),
        category: raw
            .get("category")
            .and_then(Value::as_str)
            .and_then(Category::parse),
        service_description: non_empty_str(raw.get("serviceDescription")),
        location,
        online: resolve_online(raw),
        last_online_at: resolve_last_online_at(id, raw),
    }
}

/// `online == true` or the legacy `status == "online"`.
fn resolve_online(raw: &Value) -> bool {
    raw.get("online").and_then(Value::as_bool) == Some(true)
        || raw.get("status").and_then(Value::as_str) == Some("online")
}

fn resolve_name(raw: &Value) -> String {
    NAME_FIELDS
        .iter()
        .find_map(|field| non_empty_str(raw.get(*field)))
        .unwrap_or_default()
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Accepts `{lat, lng}` as well as the store's GeoPoint serializations.
fn resolve_location(value: Option<&Value>) -> Option<Position> {
    let obj = value?.as_object()?;
    let lat = first_field(obj, &LAT_FIELDS)?.as_f64()?;
    let lng = first_field(obj, &LNG_FIELDS)?.as_f64()?;
    let position = Position::new(lat, lng);
    position.is_valid().then_some(position)
}

fn first_field<'a>(obj: &'a Map<String, Value>, fields: &[&str]) -> Option<&'a Value> {
    fields.iter().find_map(|field| obj.get(*field))
}

fn resolve_last_online_at(id: &str, raw: &Value) -> i64 {
    let Some(value) = LAST_ONLINE_FIELDS
        .iter()
        .find_map(|field| raw.get(*field).filter(|v| !v.is_null()))
    else {
        return 0;
    };

    let millis = timestamp_millis(value);
    if millis.is_none() {
        tracing::debug!(vendor_id = id, "unrecognised timestamp shape; treating as epoch 0");
    }
    millis.unwrap_or(0)
}

/// Convert a stored timestamp to epoch milliseconds.
///
/// Understood shapes: the store's native `{seconds, nanoseconds}` (or the
/// `_seconds`/`_nanoseconds` admin serialization), an RFC 3339 date string,
/// and a bare number of milliseconds.
#[must_use]
pub fn timestamp_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Object(obj) => {
            let seconds = first_field(obj, &["seconds", "_seconds"])?.as_i64()?;
            let nanos = first_field(obj, &["nanoseconds", "_nanoseconds"])
                .and_then(Value::as_i64)
                .unwrap_or(0);
            Some(
                seconds
                    .saturating_mul(1_000)
                    .saturating_add(nanos.div_euclid(1_000_000)),
            )
        }
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.timestamp_millis()),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(float_millis)),
        _ => None,
    }
}

/// Saturating float-to-int cast; fractional milliseconds are dropped.
#[allow(clippy::cast_possible_truncation)]
fn float_millis(f: f64) -> i64 {
    f as i64
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
