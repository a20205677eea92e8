use thiserror::Error;

/// Rejected discovery input. These are local-input errors the caller shows to
/// the user, never system failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("search radius must be a positive number of kilometres, got {0}")]
    InvalidRadius(f64),

    #[error("origin ({lat}, {lng}) is not a valid WGS84 position")]
    InvalidOrigin { lat: f64, lng: f64 },

    #[error("unknown category \"{0}\"")]
    UnknownCategory(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Errors raised while building a vendor's own document update.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    #[error("{0} must not be empty")]
    MissingField(&'static str),

    #[error("unknown category \"{0}\"")]
    UnknownCategory(String),

    #[error("vendor location is not a valid WGS84 position")]
    InvalidLocation,
}
