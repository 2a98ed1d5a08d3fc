//! In-process live document store.
//!
//! # Responsibility
//! - Hold collections of JSON documents keyed by generated ids.
//! - Push a full snapshot to every subscriber after each mutation.
//!
//! # Invariants
//! - Documents are delivered in ascending id order.
//! - A new subscriber receives the current snapshot before any change.
//! - Deleting a missing document succeeds.

use super::{
    CollectionSnapshot, DocumentSnapshot, RemoteError, RemoteResult, RemoteStore, Subscription,
};
use async_trait::async_trait;
use log::{debug, info};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use uuid::Uuid;

struct Subscriber {
    collection: String,
    sender: mpsc::UnboundedSender<CollectionSnapshot>,
}

#[derive(Default)]
struct StoreState {
    collections: BTreeMap<String, BTreeMap<String, Map<String, Value>>>,
    subscribers: BTreeMap<u64, Subscriber>,
    next_subscriber_id: u64,
    unavailable: bool,
}

impl StoreState {
    fn snapshot(&self, collection: &str) -> CollectionSnapshot {
        let documents = self
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| DocumentSnapshot {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        CollectionSnapshot { documents }
    }

    fn publish(&mut self, collection: &str) {
        let snapshot = self.snapshot(collection);
        // Receivers that went away without releasing are pruned here.
        self.subscribers.retain(|_, subscriber| {
            subscriber.collection != collection || subscriber.sender.send(snapshot.clone()).is_ok()
        });
    }
}

/// Live document store kept in process memory.
#[derive(Clone, Default)]
pub struct MemoryRemoteStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document with a store-assigned id and returns that id.
    pub fn add(&self, collection: &str, fields: Map<String, Value>) -> RemoteResult<String> {
        validate_collection(collection)?;
        let id = Uuid::new_v4().simple().to_string();
        self.set(collection, &id, fields)?;
        Ok(id)
    }

    /// Creates or replaces the document `id`.
    pub fn set(&self, collection: &str, id: &str, fields: Map<String, Value>) -> RemoteResult<()> {
        validate_collection(collection)?;
        let mut state = self.lock();
        ensure_available(&state)?;
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        state.publish(collection);
        Ok(())
    }

    /// Returns the current fields of one document.
    pub fn get(&self, collection: &str, id: &str) -> Option<Map<String, Value>> {
        self.lock()
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
    }

    /// Returns the current snapshot of `collection` without subscribing.
    pub fn snapshot(&self, collection: &str) -> CollectionSnapshot {
        self.lock().snapshot(collection)
    }

    /// Simulates losing (or regaining) connectivity.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Number of live subscriptions across all collections.
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Ends every feed, as when the backing connection shuts down.
    pub fn close_all(&self) {
        self.lock().subscribers.clear();
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<StoreState>) -> MutexGuard<'_, StoreState> {
    state
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn ensure_available(state: &StoreState) -> RemoteResult<()> {
    if state.unavailable {
        return Err(RemoteError::Unavailable("store is offline".to_string()));
    }
    Ok(())
}

fn validate_collection(collection: &str) -> RemoteResult<()> {
    if collection.trim().is_empty() || collection.contains('/') {
        return Err(RemoteError::InvalidCollection(collection.to_string()));
    }
    Ok(())
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn subscribe(&self, collection: &str) -> RemoteResult<Subscription> {
        validate_collection(collection)?;
        let (sender, receiver) = mpsc::unbounded_channel();
        let subscriber_id = {
            let mut state = self.lock();
            ensure_available(&state)?;
            let subscriber_id = state.next_subscriber_id;
            state.next_subscriber_id += 1;
            // The receiver is held locally, so this send cannot fail.
            let _ = sender.send(state.snapshot(collection));
            state.subscribers.insert(
                subscriber_id,
                Subscriber {
                    collection: collection.to_string(),
                    sender,
                },
            );
            subscriber_id
        };
        info!(
            "event=remote_subscribe module=remote status=ok collection={} subscriber_id={}",
            collection, subscriber_id
        );

        let state = Arc::clone(&self.state);
        Ok(Subscription::new(receiver, move || {
            lock_state(&state).subscribers.remove(&subscriber_id);
            debug!(
                "event=remote_unsubscribe module=remote status=ok subscriber_id={}",
                subscriber_id
            );
        }))
    }

    async fn delete(&self, collection: &str, id: &str) -> RemoteResult<()> {
        validate_collection(collection)?;
        let mut state = self.lock();
        ensure_available(&state)?;
        let removed = state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .is_some();
        if removed {
            state.publish(collection);
        }
        Ok(())
    }
}
