mod common;

use common::{eventually, seed, InstrumentedStore, COLLECTION};
use restaurant_core::{
    LiveListSynchronizer, MemoryPreferenceStore, MemoryRemoteStore, PreferenceStore, RemoteStore,
};
use serde_json::json;
use std::sync::Arc;

fn synchronizer(
    remote: &Arc<MemoryRemoteStore>,
    prefs: Arc<dyn PreferenceStore>,
) -> LiveListSynchronizer {
    LiveListSynchronizer::new(Arc::clone(remote) as Arc<dyn RemoteStore>, prefs, COLLECTION)
}

#[tokio::test]
async fn no_override_uses_server_value() {
    let remote = Arc::new(MemoryRemoteStore::new());
    seed(&remote, "a", json!({ "name": "Cafe", "showReviews": true }));
    let prefs = Arc::new(MemoryPreferenceStore::new());

    let mut live = synchronizer(&remote, prefs).start().await.unwrap();
    let state = live.wait_for_generation(1).await.unwrap();

    assert_eq!(state.restaurants.len(), 1);
    assert_eq!(state.restaurants[0].name, "Cafe");
    assert!(state.restaurants[0].show_reviews);
}

#[tokio::test]
async fn false_override_beats_true_server_value() {
    let remote = Arc::new(MemoryRemoteStore::new());
    seed(&remote, "a", json!({ "name": "Cafe", "showReviews": true }));
    let prefs = Arc::new(MemoryPreferenceStore::new());
    prefs.set("restaurant-showReviews-a", "false").await.unwrap();

    let mut live = synchronizer(&remote, prefs).start().await.unwrap();
    let state = live.wait_for_generation(1).await.unwrap();

    assert!(!state.restaurants[0].show_reviews);
    assert!(state.restaurants[0].stored_show_reviews);
}

#[tokio::test]
async fn invalid_override_falls_back_to_server_value() {
    let remote = Arc::new(MemoryRemoteStore::new());
    seed(&remote, "a", json!({ "name": "Cafe", "showReviews": true }));
    seed(&remote, "b", json!({ "name": "Diner", "showReviews": false }));
    let prefs = Arc::new(MemoryPreferenceStore::new());
    prefs.set("restaurant-showReviews-a", "not-json").await.unwrap();
    prefs.set("restaurant-showReviews-b", "\"yes\"").await.unwrap();

    let mut live = synchronizer(&remote, prefs).start().await.unwrap();
    let state = live.wait_for_generation(1).await.unwrap();

    assert!(state.restaurants[0].show_reviews);
    assert!(!state.restaurants[1].show_reviews);
}

#[tokio::test]
async fn failed_read_does_not_block_other_records() {
    let remote = Arc::new(MemoryRemoteStore::new());
    for id in ["a", "b", "c"] {
        seed(&remote, id, json!({ "name": id, "showReviews": false }));
    }
    let prefs = Arc::new(MemoryPreferenceStore::new());
    prefs.set("restaurant-showReviews-b", "true").await.unwrap();
    prefs.set("restaurant-showReviews-c", "true").await.unwrap();
    prefs.fail_reads_for("restaurant-showReviews-b");

    let mut live = synchronizer(&remote, prefs).start().await.unwrap();
    let state = live.wait_for_generation(1).await.unwrap();

    let effective: Vec<_> = state
        .restaurants
        .iter()
        .map(|r| (r.id.as_str(), r.show_reviews))
        .collect();
    assert_eq!(effective, vec![("a", false), ("b", false), ("c", true)]);
}

#[tokio::test]
async fn list_tracks_every_snapshot_and_recomputes_overrides() {
    let remote = Arc::new(MemoryRemoteStore::new());
    seed(&remote, "a", json!({ "name": "Cafe", "showReviews": true }));
    let prefs = Arc::new(MemoryPreferenceStore::new());

    let mut live = synchronizer(&remote, Arc::clone(&prefs) as Arc<dyn PreferenceStore>)
        .start()
        .await
        .unwrap();
    live.wait_for_generation(1).await.unwrap();

    prefs.set("restaurant-showReviews-a", "false").await.unwrap();
    seed(&remote, "b", json!({ "name": "Bistro" }));
    let state = live.wait_for_generation(2).await.unwrap();

    assert_eq!(state.restaurants.len(), remote.snapshot(COLLECTION).len());
    let ids: Vec<_> = state.restaurants.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(!state.restaurants[0].show_reviews);
    assert!(!state.restaurants[1].show_reviews);
    assert_eq!(state.restaurants[1].notes, "");
    assert!(state.restaurants[1].images.is_empty());
}

#[tokio::test]
async fn newer_snapshot_supersedes_slow_refresh() {
    let remote = Arc::new(MemoryRemoteStore::new());
    seed(&remote, "a", json!({ "name": "Slow", "showReviews": true }));
    let prefs = Arc::new(InstrumentedStore::default());
    prefs.gate_key("restaurant-showReviews-a");

    let mut live = synchronizer(&remote, Arc::clone(&prefs) as Arc<dyn PreferenceStore>)
        .start()
        .await
        .unwrap();
    assert!(eventually(|| prefs.blocked_reads() == 1).await);

    remote.delete(COLLECTION, "a").await.unwrap();
    seed(&remote, "b", json!({ "name": "Fast" }));
    let state = live.wait_for_generation(3).await.unwrap();
    assert_eq!(state.generation, 3);
    assert_eq!(state.restaurants.len(), 1);
    assert_eq!(state.restaurants[0].id, "b");

    prefs.release_gate();
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    let current = live.current();
    assert_eq!(current.generation, 3);
    assert_eq!(current.restaurants[0].id, "b");
}

#[tokio::test]
async fn cancel_releases_the_subscription() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let prefs = Arc::new(MemoryPreferenceStore::new());

    let live = synchronizer(&remote, Arc::clone(&prefs) as Arc<dyn PreferenceStore>)
        .start()
        .await
        .unwrap();
    assert_eq!(remote.subscriber_count(), 1);
    live.cancel().await;
    assert_eq!(remote.subscriber_count(), 0);

    let dropped = synchronizer(&remote, prefs).start().await.unwrap();
    assert_eq!(remote.subscriber_count(), 1);
    drop(dropped);
    assert!(eventually(|| remote.subscriber_count() == 0).await);
}

#[tokio::test]
async fn closed_feed_ends_the_list() {
    let remote = Arc::new(MemoryRemoteStore::new());
    seed(&remote, "a", json!({ "name": "Cafe" }));
    let prefs = Arc::new(MemoryPreferenceStore::new());

    let mut live = synchronizer(&remote, prefs).start().await.unwrap();
    live.wait_for_generation(1).await.unwrap();

    remote.close_all();
    assert!(!live.changed().await);
    assert!(eventually(|| !live.is_active()).await);
    assert_eq!(live.restaurants().len(), 1);
}

#[tokio::test]
async fn start_fails_when_remote_is_offline() {
    let remote = Arc::new(MemoryRemoteStore::new());
    remote.set_unavailable(true);
    let prefs = Arc::new(MemoryPreferenceStore::new());

    assert!(synchronizer(&remote, prefs).start().await.is_err());
}
