use thiserror::Error;

/// Why a position source could not produce a fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("position unavailable: {0}")]
    Unavailable(String),

    #[error("permission to read the device position was denied")]
    PermissionDenied,
}
