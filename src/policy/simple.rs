//! # Simple In-Memory Cache
//!
//! Bounded map with no access accounting. When a new key arrives at a full
//! cache the eldest insertion is dropped and handed back to the caller, so a
//! second level can pick it up.
//!
//! ```text
//!   order: VecDeque<K>   front = eldest insertion
//!
//!   put(new) on full:   pop_front ─► evicted
//!                       push_back(new)
//!   put(existing):      value replaced, order unchanged
//! ```
//!
//! Does not implement [`Countable`](crate::traits::Countable):
//! [`Cache::as_countable`] returns `None`.

use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::trace;

use crate::error::{CacheError, ConfigError};
use crate::store::hashmap::HashMapStore;
use crate::store::traits::{StoreCore, StoreMut};
use crate::traits::{Cache, Frequency};

/// Insertion-ordered bounded cache.
#[derive(Debug, Clone)]
pub struct SimpleCache<K, V> {
    store: HashMapStore<K, V>,
    order: VecDeque<K>,
}

impl<K, V> SimpleCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if `capacity` is 0.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be > 0"));
        }
        Ok(Self {
            store: HashMapStore::new(capacity),
            order: VecDeque::with_capacity(capacity),
        })
    }

    fn evict_eldest(&mut self) -> Option<(K, V)> {
        while let Some(key) = self.order.pop_front() {
            if let Some(value) = self.store.remove(&key) {
                trace!(key = ?key, "evicted eldest entry");
                return Some((key, value));
            }
        }
        None
    }
}

impl<K, V> Cache<K, V> for SimpleCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    fn put(&mut self, key: K, value: V) -> Result<Vec<(K, V)>, CacheError> {
        if let Some(slot) = self.store.get_mut(&key) {
            *slot = value;
            return Ok(Vec::new());
        }

        let mut evicted = Vec::new();
        if self.store.is_full()
            && let Some(pair) = self.evict_eldest()
        {
            evicted.push(pair);
        }

        if self.store.try_insert(key.clone(), value).is_ok() {
            self.order.push_back(key);
        }
        Ok(evicted)
    }

    fn get(&mut self, key: &K) -> Result<Option<V>, CacheError> {
        Ok(self.store.get(key).cloned())
    }

    fn contains_key(&self, key: &K) -> bool {
        self.store.contains(key)
    }

    fn remove_with_frequency(
        &mut self,
        key: &K,
    ) -> Result<(Option<V>, Option<Frequency>), CacheError> {
        let removed = self.store.remove(key);
        if removed.is_some() {
            self.order.retain(|k| k != key);
        }
        Ok((removed, None))
    }

    fn clear(&mut self) -> Result<(), CacheError> {
        self.store.clear();
        self.order.clear();
        Ok(())
    }

    fn len(&self) -> usize {
        self.store.len()
    }

    fn capacity(&self) -> usize {
        self.store.capacity()
    }
}
