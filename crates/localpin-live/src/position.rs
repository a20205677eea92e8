//! Origin acquisition with a bounded wait and a default fallback.

use std::fmt;
use std::future::{self, Future};
use std::time::Duration;

use localpin_core::Position;

use crate::error::PositionError;

/// How long [`resolve_origin`] waits for a position source by default.
pub const DEFAULT_POSITION_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can report the user's current position.
pub trait PositionSource {
    fn current_position(&self) -> impl Future<Output = Result<Position, PositionError>> + Send;
}

/// Always reports the same position, e.g. coordinates given on the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPosition(pub Position);

impl PositionSource for FixedPosition {
    fn current_position(&self) -> impl Future<Output = Result<Position, PositionError>> + Send {
        future::ready(Ok(self.0))
    }
}

/// A source that always fails, for environments with no positioning at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnavailablePosition(pub PositionError);

impl Default for UnavailablePosition {
    fn default() -> Self {
        Self(PositionError::Unavailable("no position source".to_string()))
    }
}

impl PositionSource for UnavailablePosition {
    fn current_position(&self) -> impl Future<Output = Result<Position, PositionError>> + Send {
        future::ready(Err(self.0.clone()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    Failed(PositionError),
    TimedOut(Duration),
    /// The source answered with coordinates outside WGS84 range.
    InvalidFix(Position),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Failed(err) => write!(f, "{err}"),
            FallbackReason::TimedOut(after) => {
                write!(f, "no position after {}ms", after.as_millis())
            }
            FallbackReason::InvalidFix(position) => write!(f, "invalid position {position}"),
        }
    }
}

/// The origin discovery should use.
#[derive(Debug, Clone, PartialEq)]
pub struct OriginFix {
    pub position: Position,
    /// Why the default was used; `None` for a real fix.
    pub fallback: Option<FallbackReason>,
}

impl OriginFix {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Ask `source` for a position, substituting `default` when it fails, times
/// out, or reports an invalid coordinate.
pub async fn resolve_origin<P>(source: &P, timeout: Duration, default: Position) -> OriginFix
where
    P: PositionSource,
{
    let reason = match tokio::time::timeout(timeout, source.current_position()).await {
        Ok(Ok(position)) if position.is_valid() => {
            return OriginFix {
                position,
                fallback: None,
            };
        }
        Ok(Ok(position)) => FallbackReason::InvalidFix(position),
        Ok(Err(err)) => FallbackReason::Failed(err),
        Err(_) => FallbackReason::TimedOut(timeout),
    };

    tracing::info!(reason = %reason, fallback = %default, "using default origin");
    OriginFix {
        position: default,
        fallback: Some(reason),
    }
}
