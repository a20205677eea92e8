//! Place-name search against a Nominatim-compatible geocoder.

mod client;
mod error;
mod retry;
mod types;

pub use client::{GeocodeClient, MIN_QUERY_CHARS};
pub use error::GeocodeError;
pub use types::Place;
