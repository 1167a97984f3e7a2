//! Bounded map store used by the in-memory LFU and simple policies, and as
//! the key → blob path index of the durable tier.
//!
//! ## Architecture
//! - One `FxHashMap<K, V>`; lookups are O(1).
//! - The bound counts entries. An update of a resident key never hits it.
//!
//! ## Example Usage
//! ```rust
//! use tiercache::store::hashmap::HashMapStore;
//! use tiercache::store::traits::{StoreCore, StoreFull, StoreMut};
//!
//! let mut store: HashMapStore<u64, String> = HashMapStore::new(1);
//! store.try_insert(1, "a".to_string()).unwrap();
//! assert!(store.is_full());
//! assert_eq!(store.try_insert(2, "b".to_string()), Err(StoreFull));
//! ```
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::store::traits::{StoreCore, StoreFull, StoreMut};

/// Entry-bounded map store.
#[derive(Debug, Clone)]
pub struct HashMapStore<K, V> {
    map: FxHashMap<K, V>,
    capacity: usize,
}

impl<K, V> HashMapStore<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty store admitting at most `capacity` keys.
    pub fn new(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            capacity,
        }
    }

    /// Mutable access for in-place value replacement.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.map.get_mut(key)
    }

    /// Entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.map.iter()
    }

    /// Empties the store, yielding every entry.
    pub fn drain(&mut self) -> impl Iterator<Item = (K, V)> + '_ {
        self.map.drain()
    }
}

impl<K, V> StoreCore<K, V> for HashMapStore<K, V>
where
    K: Eq + Hash,
{
    fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> StoreMut<K, V> for HashMapStore<K, V>
where
    K: Eq + Hash,
{
    fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, StoreFull> {
        if !self.map.contains_key(&key) && self.map.len() >= self.capacity {
            return Err(StoreFull);
        }
        Ok(self.map.insert(key, value))
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.map.remove(key)
    }

    fn clear(&mut self) {
        self.map.clear();
    }
}
