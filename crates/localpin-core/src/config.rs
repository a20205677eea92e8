use std::str::FromStr;

use crate::app_config::{AppConfig, Environment, DEFAULT_ORIGIN};
use crate::geo::Position;
use crate::present::DEFAULT_DIRECTIONS_BASE_URL;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can pass a `HashMap`
/// lookup instead of mutating global state.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(raw)
    };

    let env = parse_environment(&or_default("LOCALPIN_ENV", "development"))?;
    let log_level = or_default("LOCALPIN_LOG_LEVEL", "info");

    let default_origin = Position::new(
        parse_number(&lookup, "LOCALPIN_DEFAULT_LAT", DEFAULT_ORIGIN.lat)?,
        parse_number(&lookup, "LOCALPIN_DEFAULT_LNG", DEFAULT_ORIGIN.lng)?,
    );
    if !default_origin.is_valid() {
        return Err(ConfigError::InvalidEnvVar {
            var: "LOCALPIN_DEFAULT_LAT".to_string(),
            reason: format!(
                "({}, {}) is not a valid WGS84 position",
                default_origin.lat, default_origin.lng
            ),
        });
    }

    let default_radius_km: f64 = parse_number(&lookup, "LOCALPIN_DEFAULT_RADIUS_KM", 5.0)?;
    if !(default_radius_km.is_finite() && default_radius_km > 0.0) {
        return Err(ConfigError::InvalidEnvVar {
            var: "LOCALPIN_DEFAULT_RADIUS_KM".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let position_timeout_secs: u64 = parse_number(&lookup, "LOCALPIN_POSITION_TIMEOUT_SECS", 10)?;
    let vendor_collection = parse("LOCALPIN_VENDOR_COLLECTION", "vendors")?;
    let directions_base_url = parse("LOCALPIN_DIRECTIONS_BASE_URL", DEFAULT_DIRECTIONS_BASE_URL)?;

    let geocoder_url = parse("LOCALPIN_GEOCODER_URL", "https://nominatim.openstreetmap.org")?;
    let geocoder_api_key = lookup("LOCALPIN_GEOCODER_API_KEY")
        .ok()
        .filter(|k| !k.is_empty());
    let geocoder_user_agent = or_default(
        "LOCALPIN_GEOCODER_USER_AGENT",
        "localpin/0.1 (vendor-discovery)",
    );
    let geocoder_timeout_secs: u64 = parse_number(&lookup, "LOCALPIN_GEOCODER_TIMEOUT_SECS", 10)?;
    let geocoder_max_retries: u32 = parse_number(&lookup, "LOCALPIN_GEOCODER_MAX_RETRIES", 2)?;
    let geocoder_result_limit: usize = parse_number(&lookup, "LOCALPIN_GEOCODER_RESULT_LIMIT", 5)?;

    Ok(AppConfig {
        env,
        log_level,
        default_origin,
        default_radius_km,
        position_timeout_secs,
        vendor_collection,
        directions_base_url,
        geocoder_url,
        geocoder_api_key,
        geocoder_user_agent,
        geocoder_timeout_secs,
        geocoder_max_retries,
        geocoder_result_limit,
    })
}

/// Parse an optional numeric variable, falling back to `default` when unset.
fn parse_number<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(default),
    }
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LOCALPIN_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
