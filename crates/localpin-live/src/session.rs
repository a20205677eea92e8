//! Event-driven recomputation of discovery results.
//!
//! A [`DiscoverySession`] owns the user's current query and a subscription to
//! a [`LiveVendorStore`]. A new vendor snapshot or any query change re-runs
//! [`discover`] and publishes the outcome on a `tokio::sync::watch` channel,
//! so consumers always read the latest view and never a partial one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use localpin_core::{
    discover, CategoryFilter, DiscoveryQuery, DiscoveryResult, Position, ValidationError,
};
use tokio::sync::watch;

use crate::store::{LiveVendorStore, Subscription, VendorSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionView {
    /// The query is valid but no vendor snapshot has arrived yet.
    Pending,
    Ready {
        generation: u64,
        /// The vendor feed is disconnected; results are from the last snapshot.
        stale: bool,
        query: DiscoveryQuery,
        result: DiscoveryResult,
    },
    /// The current query was rejected. Shown instead of an empty result.
    Invalid(ValidationError),
}

/// Derive the view for one query against one snapshot.
#[must_use]
pub fn compute_view(query: &DiscoveryQuery, snapshot: &VendorSnapshot) -> SessionView {
    match discover(&snapshot.vendors, query) {
        Err(err) => SessionView::Invalid(err),
        Ok(_) if snapshot.generation == 0 => SessionView::Pending,
        Ok(result) => SessionView::Ready {
            generation: snapshot.generation,
            stale: snapshot.stale,
            query: *query,
            result,
        },
    }
}

struct SessionInner {
    query: Mutex<DiscoveryQuery>,
    view: watch::Sender<Arc<SessionView>>,
}

impl SessionInner {
    fn query(&self) -> MutexGuard<'_, DiscoveryQuery> {
        self.query.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, query: &DiscoveryQuery, snapshot: &VendorSnapshot) {
        let view = compute_view(query, snapshot);
        if let SessionView::Invalid(err) = &view {
            tracing::debug!(error = %err, "discovery query rejected");
        }
        self.view.send_replace(Arc::new(view));
    }
}

/// One user's live discovery: query inputs plus the vendor subscription.
///
/// Dropping the session unsubscribes from the store.
pub struct DiscoverySession {
    store: LiveVendorStore,
    inner: Arc<SessionInner>,
    subscription: Subscription,
}

impl std::fmt::Debug for DiscoverySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoverySession")
            .field("query", &*self.inner.query())
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}

impl DiscoverySession {
    /// Start a session over `store`. The initial view is computed from the
    /// store's current snapshot.
    ///
    /// `query` is taken as-is; an invalid one yields [`SessionView::Invalid`]
    /// until corrected through a setter.
    #[must_use]
    pub fn new(store: &LiveVendorStore, query: DiscoveryQuery) -> Self {
        let (view, _) = watch::channel(Arc::new(SessionView::Pending));
        let inner = Arc::new(SessionInner {
            query: Mutex::new(query),
            view,
        });

        let listener = Arc::clone(&inner);
        let subscription = store.subscribe(move |snapshot| {
            let query = listener.query();
            listener.publish(&query, snapshot);
        });

        // Subscribed first so a snapshot racing with construction is not missed.
        {
            let query = inner.query();
            inner.publish(&query, &store.snapshot());
        }

        Self {
            store: store.clone(),
            inner,
            subscription,
        }
    }

    /// A receiver that is notified on every recomputation.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Arc<SessionView>> {
        self.inner.view.subscribe()
    }

    /// The most recently published view.
    #[must_use]
    pub fn view(&self) -> Arc<SessionView> {
        Arc::clone(&self.inner.view.borrow())
    }

    #[must_use]
    pub fn query(&self) -> DiscoveryQuery {
        *self.inner.query()
    }

    pub fn set_origin(&self, origin: Position) {
        self.update(|query| query.origin = origin);
    }

    pub fn set_radius_km(&self, radius_km: f64) {
        self.update(|query| query.radius_km = radius_km);
    }

    pub fn set_category(&self, category: CategoryFilter) {
        self.update(|query| query.category = category);
    }

    fn update(&self, change: impl FnOnce(&mut DiscoveryQuery)) {
        let mut query = self.inner.query();
        change(&mut query);
        self.inner.publish(&query, &self.store.snapshot());
    }
}
