use crate::geo::Position;

/// Fallback origin when no position fix is available (New Delhi).
pub const DEFAULT_ORIGIN: Position = Position::new(28.6139, 77.209);

/// Radius presets offered to the user, in kilometres.
pub const RADIUS_OPTIONS_KM: [f64; 5] = [1.0, 3.0, 5.0, 10.0, 20.0];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub default_origin: Position,
    pub default_radius_km: f64,
    pub position_timeout_secs: u64,
    pub vendor_collection: String,
    pub directions_base_url: String,
    pub geocoder_url: String,
    pub geocoder_api_key: Option<String>,
    pub geocoder_user_agent: String,
    pub geocoder_timeout_secs: u64,
    pub geocoder_max_retries: u32,
    pub geocoder_result_limit: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("default_origin", &self.default_origin)
            .field("default_radius_km", &self.default_radius_km)
            .field("position_timeout_secs", &self.position_timeout_secs)
            .field("vendor_collection", &self.vendor_collection)
            .field("directions_base_url", &self.directions_base_url)
            .field("geocoder_url", &self.geocoder_url)
            .field(
                "geocoder_api_key",
                &self.geocoder_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("geocoder_user_agent", &self.geocoder_user_agent)
            .field("geocoder_timeout_secs", &self.geocoder_timeout_secs)
            .field("geocoder_max_retries", &self.geocoder_max_retries)
            .field("geocoder_result_limit", &self.geocoder_result_limit)
            .finish()
    }
}
