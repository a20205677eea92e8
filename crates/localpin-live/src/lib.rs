//! Live state behind vendor discovery: the replace-on-write vendor store fed
//! by a snapshot stream, origin resolution with fallback, and the session
//! that re-runs discovery whenever either input changes.

pub mod error;
pub mod feed;
pub mod position;
pub mod session;
pub mod store;

pub use error::PositionError;
pub use feed::FeedEvent;
pub use position::{
    resolve_origin, FallbackReason, FixedPosition, OriginFix, PositionSource,
    UnavailablePosition, DEFAULT_POSITION_TIMEOUT,
};
pub use session::{compute_view, DiscoverySession, SessionView};
pub use store::{FeedOutcome, LiveVendorStore, Subscription, VendorSnapshot};
