/*!
 * Concurrent Map
 *
 * Sharded key/value store over DashMap. Absent keys are reported as the
 * value type's default together with a `false` presence flag.
 */

use crate::core::types::zero;
use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Thread-safe, unordered key/value map
///
/// Clones share the same underlying storage.
pub struct ConcurrentMap<K, V> {
    inner: Arc<DashMap<K, V, RandomState>>,
}

impl<K: Eq + Hash, V> ConcurrentMap<K, V> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::with_hasher(RandomState::new())),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(DashMap::with_capacity_and_hasher(
                capacity,
                RandomState::new(),
            )),
        }
    }

    /// Insert or overwrite
    pub fn store(&self, key: K, value: V) {
        self.inner.insert(key, value);
    }

    pub fn delete(&self, key: &K) {
        self.inner.remove(key);
    }

    pub fn clear(&self) {
        self.inner.clear();
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<K: Eq + Hash, V: Clone> ConcurrentMap<K, V> {
    /// Cloned value for `key`, if present
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key).map(|entry| entry.value().clone())
    }

    /// Existing value and `true`, or store `value` and return it with `false`
    pub fn load_or_store(&self, key: K, value: V) -> (V, bool) {
        match self.inner.entry(key) {
            Entry::Occupied(entry) => (entry.get().clone(), true),
            Entry::Vacant(entry) => {
                entry.insert(value.clone());
                (value, false)
            }
        }
    }
}

impl<K: Eq + Hash, V: Clone + Default> ConcurrentMap<K, V> {
    /// Value and `true`, or the default value and `false`
    pub fn load(&self, key: &K) -> (V, bool) {
        match self.inner.get(key) {
            Some(entry) => (entry.value().clone(), true),
            None => (zero(), false),
        }
    }
}

impl<K: Eq + Hash, V: Default> ConcurrentMap<K, V> {
    /// Remove `key`, returning its previous value and whether it existed
    pub fn load_and_delete(&self, key: &K) -> (V, bool) {
        match self.inner.remove(key) {
            Some((_, value)) => (value, true),
            None => (zero(), false),
        }
    }

    /// Store `value`, returning the previous value and whether one existed
    pub fn swap(&self, key: K, value: V) -> (V, bool) {
        match self.inner.insert(key, value) {
            Some(previous) => (previous, true),
            None => (zero(), false),
        }
    }
}

impl<K: Eq + Hash, V: PartialEq> ConcurrentMap<K, V> {
    /// Replace the value for `key` only if it currently equals `old`
    pub fn compare_and_swap(&self, key: &K, old: &V, new: V) -> bool {
        match self.inner.get_mut(key) {
            Some(mut entry) if *entry == *old => {
                *entry = new;
                true
            }
            _ => false,
        }
    }

    /// Delete `key` only if its value currently equals `old`
    pub fn compare_and_delete(&self, key: &K, old: &V) -> bool {
        self.inner.remove_if(key, |_, value| value == old).is_some()
    }
}

impl<K: Eq + Hash + Clone, V: Clone> ConcurrentMap<K, V> {
    /// Visit entries until `f` returns false
    ///
    /// Iterates a snapshot, so `f` may freely read or mutate the map.
    pub fn range<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        for (key, value) in self.entries() {
            if !f(&key, &value) {
                break;
            }
        }
    }

    /// Plain map copy of the current contents
    pub fn to_map(&self) -> HashMap<K, V> {
        self.entries().into_iter().collect()
    }

    fn entries(&self) -> Vec<(K, V)> {
        self.inner
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}

impl<K, V> Clone for ConcurrentMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: Eq + Hash, V> Default for ConcurrentMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> std::fmt::Debug for ConcurrentMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrentMap")
            .field("len", &self.inner.len())
            .finish()
    }
}
