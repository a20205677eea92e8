//! Geocoder response rows and the place type handed to callers.

use localpin_core::Position;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of a Nominatim `/search?format=json` response.
///
/// Nominatim sends `lat`/`lon` as decimal strings; some compatible servers
/// send numbers, so both are kept as raw JSON until conversion.
#[derive(Debug, Deserialize)]
pub(crate) struct NominatimPlace {
    #[serde(default)]
    pub place_id: Value,
    #[serde(default)]
    pub lat: Value,
    #[serde(default)]
    pub lon: Value,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A resolved search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub place_id: Option<u64>,
    pub display_name: String,
    pub position: Position,
}

impl NominatimPlace {
    /// `None` when the coordinates are missing, unparseable or out of range.
    pub(crate) fn into_place(self) -> Option<Place> {
        let position = Position::new(coordinate(&self.lat)?, coordinate(&self.lon)?);
        if !position.is_valid() {
            return None;
        }
        let place_id = match &self.place_id {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        };
        let display_name = self
            .display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| format!("{:.4}, {:.4}", position.lat, position.lng));

        Some(Place {
            place_id,
            display_name,
            position,
        })
    }
}

fn coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}
