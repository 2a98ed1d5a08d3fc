//! Live restaurant list synchronizer.
//!
//! # Responsibility
//! - Hold the standing remote subscription for one screen instance.
//! - Resolve the effective `showReviews` of every record on each snapshot.
//! - Replace the published list atomically through a `watch` channel.
//!
//! # Invariants
//! - Effective preferences are recomputed for every snapshot.
//! - A newer snapshot drops the in-flight refresh of an older one, so a
//!   superseded list is never published.
//! - Cancelling the handle releases the remote subscription.

use crate::model::restaurant::Restaurant;
use crate::prefs::show_reviews::{show_reviews_key, ShowReviewsOverride};
use crate::prefs::PreferenceStore;
use crate::remote::{
    CollectionSnapshot, DocumentSnapshot, RemoteResult, RemoteStore, Subscription,
};
use futures::future::{join_all, BoxFuture, OptionFuture};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// List published to the screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestaurantListState {
    /// Sequence number of the snapshot this list was built from; `0` before
    /// the first snapshot resolves.
    pub generation: u64,
    pub restaurants: Vec<Restaurant>,
}

/// Binds a remote collection to a live restaurant list.
pub struct LiveListSynchronizer {
    remote: Arc<dyn RemoteStore>,
    prefs: Arc<dyn PreferenceStore>,
    collection: String,
}

impl LiveListSynchronizer {
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        prefs: Arc<dyn PreferenceStore>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            remote,
            prefs,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Subscribes and starts the refresh task on the current tokio runtime.
    ///
    /// # Errors
    /// - Returns the remote error when the subscription cannot be opened.
    pub async fn start(&self) -> RemoteResult<LiveRestaurantList> {
        let subscription = self.remote.subscribe(&self.collection).await?;
        let (sender, receiver) = watch::channel(RestaurantListState::default());
        let prefs = Arc::clone(&self.prefs);
        let collection = self.collection.clone();
        let task = tokio::spawn(run_feed(subscription, prefs, sender, collection));
        Ok(LiveRestaurantList {
            receiver,
            task: Some(task),
        })
    }
}

/// Screen-owned handle on a running synchronizer.
///
/// Dropping the handle cancels the synchronizer.
pub struct LiveRestaurantList {
    receiver: watch::Receiver<RestaurantListState>,
    task: Option<JoinHandle<()>>,
}

impl LiveRestaurantList {
    /// Returns a copy of the latest published list.
    pub fn current(&self) -> RestaurantListState {
        self.receiver.borrow().clone()
    }

    pub fn restaurants(&self) -> Vec<Restaurant> {
        self.receiver.borrow().restaurants.clone()
    }

    pub fn generation(&self) -> u64 {
        self.receiver.borrow().generation
    }

    /// Waits for the next publication. Returns `false` once the feed ended.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }

    /// Waits until a list built from snapshot `generation` or later is
    /// published. Returns `None` if the feed ends first.
    pub async fn wait_for_generation(&mut self, generation: u64) -> Option<RestaurantListState> {
        self.receiver
            .wait_for(|state| state.generation >= generation)
            .await
            .ok()
            .map(|state| state.clone())
    }

    /// Returns a receiver for UI layers that observe the list directly.
    pub fn watch(&self) -> watch::Receiver<RestaurantListState> {
        self.receiver.clone()
    }

    /// Returns whether the refresh task is still running.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops the refresh task and waits until the subscription is released.
    pub async fn cancel(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for LiveRestaurantList {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_feed(
    mut subscription: Subscription,
    prefs: Arc<dyn PreferenceStore>,
    sender: watch::Sender<RestaurantListState>,
    collection: String,
) {
    let mut generation = 0_u64;
    let mut pending: Option<BoxFuture<'static, RestaurantListState>> = None;

    loop {
        tokio::select! {
            biased;
            next = subscription.next_snapshot() => match next {
                Some(snapshot) => {
                    generation += 1;
                    if pending.is_some() {
                        debug!(
                            "event=list_refresh module=sync status=superseded collection={} generation={}",
                            collection,
                            generation - 1
                        );
                    }
                    let prefs = Arc::clone(&prefs);
                    let snapshot_generation = generation;
                    pending = Some(Box::pin(async move {
                        RestaurantListState {
                            generation: snapshot_generation,
                            restaurants: resolve_snapshot(prefs.as_ref(), snapshot).await,
                        }
                    }));
                }
                None => {
                    if let Some(refresh) = pending.take() {
                        publish(&sender, refresh.await, &collection);
                    }
                    info!(
                        "event=list_feed module=sync status=closed collection={} generation={}",
                        collection, generation
                    );
                    break;
                }
            },
            Some(state) = OptionFuture::from(pending.as_mut()), if pending.is_some() => {
                pending = None;
                publish(&sender, state, &collection);
            }
        }
    }
}

fn publish(
    sender: &watch::Sender<RestaurantListState>,
    state: RestaurantListState,
    collection: &str,
) {
    debug!(
        "event=list_refresh module=sync status=ok collection={} generation={} count={}",
        collection,
        state.generation,
        state.restaurants.len()
    );
    sender.send_replace(state);
}

/// Builds the enriched list for one snapshot, preserving document order.
///
/// Override lookups for the records run concurrently.
pub async fn resolve_snapshot(
    prefs: &dyn PreferenceStore,
    snapshot: CollectionSnapshot,
) -> Vec<Restaurant> {
    join_all(
        snapshot
            .documents
            .into_iter()
            .map(|document| resolve_document(prefs, document)),
    )
    .await
}

/// Decodes one document and applies its local `showReviews` override.
///
/// Read failures and invalid stored values fall back to the server value.
pub async fn resolve_document(
    prefs: &dyn PreferenceStore,
    document: DocumentSnapshot,
) -> Restaurant {
    let restaurant = Restaurant::from_document(document.id, &document.fields);
    let stored = restaurant.stored_show_reviews;
    let key = show_reviews_key(&restaurant.id);

    let effective = match prefs.get(&key).await {
        Ok(raw) => match ShowReviewsOverride::parse(raw.as_deref()) {
            ShowReviewsOverride::Invalid(details) => {
                warn!(
                    "event=override_read module=sync status=error restaurant_id={} error_code=override_invalid error={}",
                    restaurant.id, details
                );
                stored
            }
            parsed => parsed.resolve(stored),
        },
        Err(err) => {
            warn!(
                "event=override_read module=sync status=error restaurant_id={} error_code=override_read_failed error={}",
                restaurant.id, err
            );
            stored
        }
    };

    restaurant.with_show_reviews(effective)
}

#[cfg(test)]
mod tests {
    use super::resolve_snapshot;
    use crate::prefs::{MemoryPreferenceStore, PreferenceStore};
    use crate::remote::{CollectionSnapshot, DocumentSnapshot};
    use serde_json::json;

    fn document(id: &str, show_reviews: bool) -> DocumentSnapshot {
        DocumentSnapshot {
            id: id.to_string(),
            fields: json!({ "name": id, "showReviews": show_reviews })
                .as_object()
                .cloned()
                .expect("fixture must be an object"),
        }
    }

    #[tokio::test]
    async fn resolves_in_snapshot_order_with_overrides() {
        let prefs = MemoryPreferenceStore::new();
        prefs
            .set("restaurant-showReviews-b", "false")
            .await
            .expect("set should succeed");
        let snapshot = CollectionSnapshot {
            documents: vec![document("c", false), document("b", true), document("a", true)],
        };

        let list = resolve_snapshot(&prefs, snapshot).await;
        let ids: Vec<_> = list.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
        assert!(!list[1].show_reviews);
        assert!(list[1].stored_show_reviews);
        assert!(list[2].show_reviews);
    }

    #[tokio::test]
    async fn read_failure_falls_back_without_blocking_others() {
        let prefs = MemoryPreferenceStore::new();
        prefs
            .set("restaurant-showReviews-b", "true")
            .await
            .expect("set should succeed");
        prefs
            .set("restaurant-showReviews-a", "false")
            .await
            .expect("set should succeed");
        prefs.fail_reads_for("restaurant-showReviews-a");
        let snapshot = CollectionSnapshot {
            documents: vec![document("a", true), document("b", false)],
        };

        let list = resolve_snapshot(&prefs, snapshot).await;
        assert_eq!(list.len(), 2);
        assert!(list[0].show_reviews);
        assert!(list[1].show_reviews);
    }
}
