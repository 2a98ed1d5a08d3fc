//! In-process preference store with failure injection.

use super::{PrefError, PrefResult, PreferenceStore};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct MemoryState {
    values: BTreeMap<String, String>,
    unavailable: bool,
    failing_reads: BTreeSet<String>,
    failing_removes: BTreeSet<String>,
}

/// Volatile key-value store, used by tests and the CLI demo.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    state: Mutex<MemoryState>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every operation fail while `unavailable` is set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Makes reads of `key` fail until cleared.
    pub fn fail_reads_for(&self, key: &str) {
        self.lock().failing_reads.insert(key.to_string());
    }

    /// Makes removals of `key` fail until cleared.
    pub fn fail_removes_for(&self, key: &str) {
        self.lock().failing_removes.insert(key.to_string());
    }

    /// Clears every injected failure.
    pub fn clear_failures(&self) {
        let mut state = self.lock();
        state.unavailable = false;
        state.failing_reads.clear();
        state.failing_removes.clear();
    }

    /// Returns whether `key` currently holds a value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().values.contains_key(key)
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.lock().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().values.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn check_available(state: &MemoryState) -> PrefResult<()> {
    if state.unavailable {
        return Err(PrefError::Unavailable("memory store offline".to_string()));
    }
    Ok(())
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get(&self, key: &str) -> PrefResult<Option<String>> {
        let state = self.lock();
        check_available(&state)?;
        if state.failing_reads.contains(key) {
            return Err(PrefError::Unavailable(format!("read of `{key}` failed")));
        }
        Ok(state.values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> PrefResult<()> {
        let mut state = self.lock();
        check_available(&state)?;
        state.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> PrefResult<()> {
        let mut state = self.lock();
        check_available(&state)?;
        if state.failing_removes.contains(key) {
            return Err(PrefError::Unavailable(format!("removal of `{key}` failed")));
        }
        state.values.remove(key);
        Ok(())
    }
}
