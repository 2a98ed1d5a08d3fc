#![allow(dead_code)]

use async_trait::async_trait;
use restaurant_core::prefs::PrefResult;
use restaurant_core::{
    MemoryPreferenceStore, MemoryRemoteStore, Navigator, Notifier, PreferenceStore, Route,
};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Semaphore;

pub const COLLECTION: &str = "restaurants";

pub fn fields(value: Value) -> Map<String, Value> {
    value
        .as_object()
        .cloned()
        .expect("fixture must be a JSON object")
}

pub fn seed(remote: &MemoryRemoteStore, id: &str, value: Value) {
    remote
        .set(COLLECTION, id, fields(value))
        .expect("seeding the remote store should succeed");
}

/// Yields to the runtime until `condition` holds or two seconds pass.
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    let wait = async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    };
    tokio::time::timeout(Duration::from_secs(2), wait).await.is_ok()
}

#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<(String, String)> {
        self.events.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

/// Memory store that counts calls and can hold reads of chosen keys until
/// `release_gate` is called.
pub struct InstrumentedStore {
    pub inner: MemoryPreferenceStore,
    gated_keys: Mutex<BTreeSet<String>>,
    gate: Semaphore,
    gets: AtomicUsize,
    removes: AtomicUsize,
    blocked_reads: AtomicUsize,
}

impl Default for InstrumentedStore {
    fn default() -> Self {
        Self {
            inner: MemoryPreferenceStore::new(),
            gated_keys: Mutex::new(BTreeSet::new()),
            gate: Semaphore::new(0),
            gets: AtomicUsize::new(0),
            removes: AtomicUsize::new(0),
            blocked_reads: AtomicUsize::new(0),
        }
    }
}

impl InstrumentedStore {
    pub fn gate_key(&self, key: &str) {
        self.gated_keys.lock().unwrap().insert(key.to_string());
    }

    pub fn release_gate(&self) {
        self.gated_keys.lock().unwrap().clear();
        self.gate.add_permits(1024);
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn removes(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }

    pub fn blocked_reads(&self) -> usize {
        self.blocked_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PreferenceStore for InstrumentedStore {
    async fn get(&self, key: &str) -> PrefResult<Option<String>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        let gated = self.gated_keys.lock().unwrap().contains(key);
        if gated {
            self.blocked_reads.fetch_add(1, Ordering::SeqCst);
            let permit = self.gate.acquire().await.expect("gate is never closed");
            permit.forget();
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> PrefResult<()> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> PrefResult<()> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(key).await
    }
}
