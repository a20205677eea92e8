//! Great-circle distance and viewport framing.
//!
//! Inclusion filtering always goes through [`distance_km`]. [`bounding_box`]
//! only frames a map viewport around a search radius; box approximations
//! distort badly near the poles and at large radii.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

const KM_PER_DEGREE: f64 = 111.32;

/// Below this longitude scale (`cos(lat)`) the box spans every meridian.
const MIN_LNG_SCALE: f64 = 1e-9;

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and inside [-90, 90] x [-180, 180].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// `lat,lng`, the form map links expect.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Haversine distance between two positions in kilometres.
///
/// Deltas are taken as absolute values so the result is bit-for-bit
/// symmetric in its arguments.
#[must_use]
pub fn distance_km(a: Position, b: Position) -> f64 {
    let d_lat = (b.lat - a.lat).abs().to_radians();
    let d_lng = (b.lng - a.lng).abs().to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push near-antipodal pairs just past 1.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south_west: Position,
    pub north_east: Position,
}

/// Approximate box around `center` covering `radius_km` in every direction.
///
/// Latitude edges clamp to the poles. When the longitude scale collapses
/// (center at a pole) or the half-span would reach 180 degrees, the box covers
/// the full longitude range instead of dividing by zero.
#[must_use]
pub fn bounding_box(center: Position, radius_km: f64) -> BoundingBox {
    let lat_span = radius_km / KM_PER_DEGREE;
    let lng_scale = center.lat.to_radians().cos().abs();

    let (west, east) = if lng_scale < MIN_LNG_SCALE {
        (-180.0, 180.0)
    } else {
        let lng_span = radius_km / (KM_PER_DEGREE * lng_scale);
        if lng_span >= 180.0 {
            (-180.0, 180.0)
        } else {
            (center.lng - lng_span, center.lng + lng_span)
        }
    };

    BoundingBox {
        south_west: Position::new((center.lat - lat_span).max(-90.0), west),
        north_east: Position::new((center.lat + lat_span).min(90.0), east),
    }
}
