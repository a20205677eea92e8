use localpin_core::RawVendorDocument;

/// One notification from the external vendor subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// The full current vendor set. Replaces whatever was held before.
    Snapshot(Vec<RawVendorDocument>),
    /// The subscription dropped; the last snapshot should be kept as stale.
    Disconnected,
}
