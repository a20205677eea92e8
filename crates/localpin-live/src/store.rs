//! Replace-on-write holder for the live vendor set.
//!
//! Every feed event swaps in a new immutable [`VendorSnapshot`]; readers and
//! subscribers only ever see whole snapshots behind an `Arc`, never a set that
//! is being modified.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures::{Stream, StreamExt};
use localpin_core::{normalize_snapshot, VendorRecord};

use crate::feed::FeedEvent;

/// One published state of the vendor set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VendorSnapshot {
    /// Number of vendor snapshots applied so far; 0 before the first one.
    pub generation: u64,
    /// Set after the feed disconnects. `vendors` is then the last known set.
    pub stale: bool,
    pub vendors: Vec<VendorRecord>,
}

/// How [`LiveVendorStore::run`] finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOutcome {
    /// The feed stream ended on its own; the store was marked stale.
    Ended,
    /// The shutdown future resolved first.
    Shutdown,
}

type Callback = Box<dyn Fn(&Arc<VendorSnapshot>) + Send + Sync>;

struct ListenerSlot {
    active: AtomicBool,
    callback: Callback,
}

struct StoreState {
    snapshot: Arc<VendorSnapshot>,
    listeners: BTreeMap<u64, Arc<ListenerSlot>>,
    next_id: u64,
}

struct Shared {
    state: Mutex<StoreState>,
    // Serializes publish + notify so listeners see snapshots in order.
    delivery: Mutex<()>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Current vendor set plus the callbacks interested in it.
///
/// Cloning yields another handle to the same store. Listeners run on the
/// thread that applies the event and must not call [`LiveVendorStore::apply`]
/// on the same store.
#[derive(Clone)]
pub struct LiveVendorStore {
    shared: Arc<Shared>,
}

impl Default for LiveVendorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LiveVendorStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state();
        f.debug_struct("LiveVendorStore")
            .field("generation", &state.snapshot.generation)
            .field("stale", &state.snapshot.stale)
            .field("vendors", &state.snapshot.vendors.len())
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl LiveVendorStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(StoreState {
                    snapshot: Arc::new(VendorSnapshot::default()),
                    listeners: BTreeMap::new(),
                    next_id: 0,
                }),
                delivery: Mutex::new(()),
            }),
        }
    }

    /// The snapshot most recently published.
    #[must_use]
    pub fn snapshot(&self) -> Arc<VendorSnapshot> {
        Arc::clone(&self.shared.state().snapshot)
    }

    /// Register `on_change` for every snapshot published from now on.
    ///
    /// The current snapshot is not replayed; read [`LiveVendorStore::snapshot`]
    /// for it. Delivery stops once the returned handle is unsubscribed or
    /// dropped.
    pub fn subscribe<F>(&self, on_change: F) -> Subscription
    where
        F: Fn(&Arc<VendorSnapshot>) + Send + Sync + 'static,
    {
        let slot = Arc::new(ListenerSlot {
            active: AtomicBool::new(true),
            callback: Box::new(on_change),
        });

        let mut state = self.shared.state();
        let id = state.next_id;
        state.next_id += 1;
        state.listeners.insert(id, Arc::clone(&slot));
        tracing::debug!(listener = id, "vendor store subscription added");

        Subscription {
            id,
            slot,
            store: Arc::downgrade(&self.shared),
        }
    }

    /// Apply one feed event and notify subscribers.
    ///
    /// Returns `false` when nothing was published, which only happens for a
    /// disconnect while already stale.
    pub fn apply(&self, event: FeedEvent) -> bool {
        let _delivery = self
            .shared
            .delivery
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let (snapshot, listeners) = {
            let mut state = self.shared.state();
            let next = match event {
                FeedEvent::Snapshot(docs) => {
                    let vendors = normalize_snapshot(&docs);
                    let generation = state.snapshot.generation + 1;
                    tracing::debug!(generation, vendors = vendors.len(), "vendor snapshot applied");
                    VendorSnapshot {
                        generation,
                        stale: false,
                        vendors,
                    }
                }
                FeedEvent::Disconnected => {
                    if state.snapshot.stale {
                        return false;
                    }
                    tracing::info!(
                        generation = state.snapshot.generation,
                        "vendor feed disconnected, keeping last snapshot"
                    );
                    VendorSnapshot {
                        stale: true,
                        ..VendorSnapshot::clone(&state.snapshot)
                    }
                }
            };
            state.snapshot = Arc::new(next);
            let listeners: Vec<_> = state.listeners.values().cloned().collect();
            (Arc::clone(&state.snapshot), listeners)
        };

        for slot in listeners {
            if slot.active.load(Ordering::Acquire) {
                (slot.callback)(&snapshot);
            }
        }
        true
    }

    /// Drive the store from `feed` until it ends or `shutdown` resolves.
    ///
    /// A feed that ends on its own leaves the store stale with its last
    /// vendor set.
    pub async fn run<S, F>(&self, feed: S, shutdown: F) -> FeedOutcome
    where
        S: Stream<Item = FeedEvent>,
        F: Future<Output = ()>,
    {
        let mut feed = pin!(feed);
        let mut shutdown = pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("vendor feed stopped by shutdown");
                    return FeedOutcome::Shutdown;
                }
                event = feed.next() => {
                    let Some(event) = event else {
                        tracing::info!("vendor feed ended");
                        self.apply(FeedEvent::Disconnected);
                        return FeedOutcome::Ended;
                    };
                    self.apply(event);
                }
            }
        }
    }

    #[cfg(test)]
    fn listener_count(&self) -> usize {
        self.shared.state().listeners.len()
    }
}

/// Handle returned by [`LiveVendorStore::subscribe`].
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    slot: Arc<ListenerSlot>,
    store: Weak<Shared>,
}

impl Subscription {
    /// Stop deliveries. Safe to call more than once.
    pub fn unsubscribe(&self) {
        if !self.slot.active.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(shared) = self.store.upgrade() {
            shared.state().listeners.remove(&self.id);
            tracing::debug!(listener = self.id, "vendor store subscription removed");
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.slot.active.load(Ordering::Acquire)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
