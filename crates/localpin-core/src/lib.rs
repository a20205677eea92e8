pub mod app_config;
pub mod broadcast;
pub mod config;
pub mod discovery;
pub mod error;
pub mod geo;
pub mod normalize;
pub mod present;
pub mod vendor;

pub use app_config::{AppConfig, Environment, DEFAULT_ORIGIN, RADIUS_OPTIONS_KM};
pub use broadcast::{availability_patch, location_patch, service_info_patch, store_timestamp};
pub use config::{load_app_config, load_app_config_from_env};
pub use discovery::{
    discover, recently_online, DiscoveryQuery, DiscoveryResult, RECENTLY_ONLINE_LIMIT,
};
pub use error::{BroadcastError, ConfigError, ValidationError};
pub use geo::{bounding_box, distance_km, BoundingBox, Position, EARTH_RADIUS_KM};
pub use normalize::{normalize_snapshot, normalize_vendor, RawVendorDocument};
pub use present::{
    last_updated_label, present, present_all, recently_online_banner, DirectionsLinks,
    VendorCard, VendorStatus,
};
pub use vendor::{Category, CategoryFilter, VendorRecord};
