use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use localpin_core::RawVendorDocument;
use serde_json::json;

use super::*;

fn doc(id: &str, online: bool) -> RawVendorDocument {
    RawVendorDocument::new(
        id,
        json!({
            "name": format!("Vendor {id}"),
            "location": { "lat": 28.61, "lng": 77.2 },
            "online": online,
        }),
    )
}

fn recorder(store: &LiveVendorStore) -> (Subscription, Arc<Mutex<Vec<Arc<VendorSnapshot>>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let sub = store.subscribe(move |snapshot| sink.lock().unwrap().push(Arc::clone(snapshot)));
    (sub, seen)
}

#[test]
fn new_store_is_empty_generation_zero() {
    let store = LiveVendorStore::new();
    let snapshot = store.snapshot();
    assert_eq!(snapshot.generation, 0);
    assert!(!snapshot.stale);
    assert!(snapshot.vendors.is_empty());
}

#[test]
fn snapshot_event_replaces_vendor_set() {
    let store = LiveVendorStore::new();
    assert!(store.apply(FeedEvent::Snapshot(vec![doc("a", true), doc("b", false)])));
    assert!(store.apply(FeedEvent::Snapshot(vec![doc("c", true)])));

    let snapshot = store.snapshot();
    assert_eq!(snapshot.generation, 2);
    let ids: Vec<_> = snapshot.vendors.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, ["c"]);
}

#[test]
fn all_subscribers_receive_the_same_arc() {
    let store = LiveVendorStore::new();
    let (_a, seen_a) = recorder(&store);
    let (_b, seen_b) = recorder(&store);

    store.apply(FeedEvent::Snapshot(vec![doc("a", true)]));

    let a = seen_a.lock().unwrap();
    let b = seen_b.lock().unwrap();
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
    assert!(Arc::ptr_eq(&a[0], &b[0]));
    assert!(Arc::ptr_eq(&a[0], &store.snapshot()));
}

#[test]
fn subscribe_does_not_replay_current_snapshot() {
    let store = LiveVendorStore::new();
    store.apply(FeedEvent::Snapshot(vec![doc("a", true)]));
    let (_sub, seen) = recorder(&store);
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn no_delivery_after_unsubscribe() {
    let store = LiveVendorStore::new();
    let (sub, seen) = recorder(&store);

    store.apply(FeedEvent::Snapshot(vec![doc("a", true)]));
    sub.unsubscribe();
    store.apply(FeedEvent::Snapshot(vec![doc("b", true)]));

    assert_eq!(seen.lock().unwrap().len(), 1);
    assert!(!sub.is_active());
    assert_eq!(store.listener_count(), 0);
}

#[test]
fn unsubscribe_is_idempotent() {
    let store = LiveVendorStore::new();
    let (sub, _seen) = recorder(&store);
    let (_other, other_seen) = recorder(&store);

    sub.unsubscribe();
    sub.unsubscribe();
    drop(sub);

    assert_eq!(store.listener_count(), 1);
    store.apply(FeedEvent::Snapshot(vec![doc("a", true)]));
    assert_eq!(other_seen.lock().unwrap().len(), 1);
}

#[test]
fn dropping_subscription_unsubscribes() {
    let store = LiveVendorStore::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let sub = store.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    store.apply(FeedEvent::Snapshot(vec![]));
    drop(sub);
    store.apply(FeedEvent::Snapshot(vec![]));

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.listener_count(), 0);
}

#[test]
fn subscription_outliving_store_is_harmless() {
    let store = LiveVendorStore::new();
    let (sub, _seen) = recorder(&store);
    drop(store);
    sub.unsubscribe();
    assert!(!sub.is_active());
}

#[test]
fn disconnect_keeps_vendors_and_marks_stale() {
    let store = LiveVendorStore::new();
    let (_sub, seen) = recorder(&store);

    store.apply(FeedEvent::Snapshot(vec![doc("a", true)]));
    assert!(store.apply(FeedEvent::Disconnected));

    let snapshot = store.snapshot();
    assert!(snapshot.stale);
    assert_eq!(snapshot.generation, 1);
    assert_eq!(snapshot.vendors.len(), 1);
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[test]
fn repeated_disconnect_is_not_republished() {
    let store = LiveVendorStore::new();
    let (_sub, seen) = recorder(&store);

    assert!(store.apply(FeedEvent::Disconnected));
    assert!(!store.apply(FeedEvent::Disconnected));
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn snapshot_after_disconnect_clears_stale() {
    let store = LiveVendorStore::new();
    store.apply(FeedEvent::Snapshot(vec![doc("a", true)]));
    store.apply(FeedEvent::Disconnected);
    store.apply(FeedEvent::Snapshot(vec![doc("b", false)]));

    let snapshot = store.snapshot();
    assert!(!snapshot.stale);
    assert_eq!(snapshot.generation, 2);
}

#[test]
fn malformed_documents_do_not_drop_the_snapshot() {
    let store = LiveVendorStore::new();
    store.apply(FeedEvent::Snapshot(vec![
        doc("a", true),
        RawVendorDocument::new("broken", json!("not an object")),
    ]));

    let snapshot = store.snapshot();
    assert_eq!(snapshot.vendors.len(), 2);
    assert!(!snapshot.vendors[1].online);
    assert_eq!(snapshot.vendors[1].location, None);
}

#[test]
fn listener_may_unsubscribe_itself_during_delivery() {
    let store = LiveVendorStore::new();
    let holder: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
    let calls = Arc::new(AtomicUsize::new(0));

    let inner_holder = Arc::clone(&holder);
    let counter = Arc::clone(&calls);
    let sub = store.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        if let Some(sub) = inner_holder.lock().unwrap().as_ref() {
            sub.unsubscribe();
        }
    });
    *holder.lock().unwrap() = Some(sub);

    store.apply(FeedEvent::Snapshot(vec![]));
    store.apply(FeedEvent::Snapshot(vec![]));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn run_applies_events_and_marks_stale_when_feed_ends() {
    let store = LiveVendorStore::new();
    let (_sub, seen) = recorder(&store);
    let feed = futures::stream::iter(vec![
        FeedEvent::Snapshot(vec![doc("a", true)]),
        FeedEvent::Snapshot(vec![doc("a", true), doc("b", true)]),
    ]);

    let outcome = store.run(feed, std::future::pending::<()>()).await;

    assert_eq!(outcome, FeedOutcome::Ended);
    let snapshot = store.snapshot();
    assert_eq!(snapshot.generation, 2);
    assert!(snapshot.stale);
    assert_eq!(snapshot.vendors.len(), 2);
    assert_eq!(seen.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn run_stops_on_shutdown_without_marking_stale() {
    let store = LiveVendorStore::new();
    let feed = futures::stream::pending::<FeedEvent>();

    let outcome = store.run(feed, async {}).await;

    assert_eq!(outcome, FeedOutcome::Shutdown);
    assert!(!store.snapshot().stale);
}

#[tokio::test]
async fn run_can_be_driven_from_a_spawned_task() {
    let store = LiveVendorStore::new();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let (feed_tx, feed_rx) = futures::channel::mpsc::unbounded();

    let task_store = store.clone();
    let handle = tokio::spawn(async move {
        task_store
            .run(feed_rx, async {
                let _ = rx.await;
            })
            .await
    });

    feed_tx
        .unbounded_send(FeedEvent::Snapshot(vec![doc("a", true)]))
        .unwrap();
    while store.snapshot().generation == 0 {
        tokio::task::yield_now().await;
    }
    tx.send(()).unwrap();

    assert_eq!(handle.await.unwrap(), FeedOutcome::Shutdown);
    assert_eq!(store.snapshot().vendors.len(), 1);
}
