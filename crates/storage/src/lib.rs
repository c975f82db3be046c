//! Thread-safe in-memory key-value map: the on-node storage collaborator
//! spec.md §1 names as out of scope for the core, but which every node
//! still needs a concrete implementation of to run.
//!
//! Grounded in `storage/storage_engine.py::StorageEngine` (original_source):
//! a single lock guarding a `dict`, exposing `put`/`get`/`delete`/`list_keys`.
//! `threading.RLock` becomes `parking_lot::Mutex` here — reentrant locking
//! is not needed since no method calls another while holding the lock.

use std::collections::HashMap;

use parking_lot::Mutex;

/// A node's local key-value store.
///
/// One mutex guards the whole map (spec.md §5: "single reentrant mutex
/// guards the key-value mapping for put/get/delete/list"). Reads never
/// observe a partially-applied write because every operation takes the
/// lock for its full duration.
#[derive(Default)]
pub struct StorageMap {
    inner: Mutex<HashMap<String, String>>,
}

impl StorageMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites `key`.
    pub fn put(&self, key: String, value: String) {
        self.inner.lock().insert(key, value);
    }

    /// Returns `(value, found)`.
    pub fn get(&self, key: &str) -> (Option<String>, bool) {
        let guard = self.inner.lock();
        match guard.get(key) {
            Some(v) => (Some(v.clone()), true),
            None => (None, false),
        }
    }

    /// Removes `key`. Idempotent: returns whether `key` was present,
    /// removing a missing key is not an error (spec.md §4.3).
    pub fn delete(&self, key: &str) -> bool {
        self.inner.lock().remove(key).is_some()
    }

    /// All keys currently stored locally (no ring consultation — spec.md
    /// §4.4's `ListKeys` is a pure inspection operation).
    pub fn list_keys(&self) -> Vec<String> {
        self.inner.lock().keys().cloned().collect()
    }

    /// All `(key, value)` pairs, for `GetSnapshot`.
    pub fn snapshot(&self) -> Vec<(String, String)> {
        self.inner
            .lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    fn clear(&self) {
        self.inner.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_round_trips() {
        let store = StorageMap::new();
        store.put("k".into(), "v".into());
        assert_eq!(store.get("k"), (Some("v".to_string()), true));
    }

    #[test]
    fn get_missing_key_reports_not_found() {
        let store = StorageMap::new();
        assert_eq!(store.get("missing"), (None, false));
    }

    #[test]
    fn delete_is_idempotent() {
        let store = StorageMap::new();
        store.put("k".into(), "v".into());
        assert!(store.delete("k"));
        assert!(!store.delete("k"));
        assert_eq!(store.get("k"), (None, false));
    }

    #[test]
    fn list_keys_reflects_local_contents_only() {
        let store = StorageMap::new();
        store.put("a".into(), "1".into());
        store.put("b".into(), "2".into());
        let mut keys = store.list_keys();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
        store.clear();
        assert!(store.list_keys().is_empty());
    }
}
