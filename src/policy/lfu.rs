//! # LFU (Least Frequently Used) Cache Implementation
//!
//! An in-memory cache that, once full, evicts a *batch* of the least
//! frequently accessed entries before admitting a new key. The batch size is
//! a fraction of capacity fixed at construction (the eviction factor).
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          LfuCache<K, V>                              │
//!   │                                                                      │
//!   │   ┌──────────────────────────────┐   ┌────────────────────────────┐  │
//!   │   │  HashMapStore<K, V>          │   │  FrequencyTracker<K>       │  │
//!   │   │  (values live here)          │   │  K → freq, freq → {K}      │  │
//!   │   └──────────────────────────────┘   └────────────────────────────┘  │
//!   │                                                                      │
//!   │   eviction_factor: (0, 1]   batch = capacity × factor per eviction   │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store and tracker always change together: every stored key has exactly one
//! frequency record.
//!
//! ## Entry Lifecycle
//!
//! ```text
//!   absent ──put──► present(freq = 0) ──get──► present(freq = n + 1)
//!      ▲                   │                          │
//!      └──── remove / eviction / clear ───────────────┘
//! ```
//!
//! - `put` on an existing key replaces the value in place; frequency is kept
//!   and nothing is evicted.
//! - `put` of a new key into a full cache runs
//!   [batch eviction](crate::policy::eviction) first.
//!
//! ## Limitations
//!
//! 1. **No recency tie-break**: keys sharing the lowest frequency are evicted
//!    in unspecified order.
//! 2. **No aging**: frequencies only grow until the entry leaves the cache.
//! 3. **Not Thread-Safe**: requires external synchronization.
//!
//! ## Example Usage
//!
//! ```
//! use tiercache::policy::lfu::LfuCache;
//! use tiercache::traits::{Cache, Countable};
//!
//! let mut cache = LfuCache::try_new(2, 1.0).unwrap();
//! cache.put("a", "alpha").unwrap();
//! cache.put("b", "beta").unwrap();
//! cache.get(&"a").unwrap();
//!
//! // Full: the whole capacity (factor 1.0) is evicted, lowest tier first.
//! let mut evicted = cache.put("c", "gamma").unwrap();
//! evicted.sort();
//! assert_eq!(evicted, vec![("a", "alpha"), ("b", "beta")]);
//! assert_eq!(cache.len(), 1);
//! assert_eq!(cache.frequency_of(&"c").unwrap(), 0);
//! ```

use std::fmt::Debug;
use std::hash::Hash;

use tracing::debug;

use crate::ds::FrequencyTracker;
use crate::error::{CacheError, ConfigError};
use crate::policy::eviction::{EvictionFactor, evict_batch};
use crate::store::hashmap::HashMapStore;
use crate::store::traits::{StoreCore, StoreMut};
use crate::traits::{Cache, Countable, Frequency};

/// In-memory LFU cache with batch eviction.
#[derive(Debug, Clone)]
pub struct LfuCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    store: HashMapStore<K, V>,
    tracker: FrequencyTracker<K>,
    eviction_factor: EvictionFactor,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if `capacity` is 0 or `eviction_factor` is outside
    /// `(0, 1]`.
    pub fn try_new(capacity: usize, eviction_factor: f32) -> Result<Self, ConfigError> {
        Self::with_factor(capacity, EvictionFactor::new(eviction_factor)?)
    }

    /// Creates a cache from an already validated factor.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if `capacity` is 0.
    pub fn with_factor(
        capacity: usize,
        eviction_factor: EvictionFactor,
    ) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be > 0"));
        }
        Ok(Self {
            store: HashMapStore::new(capacity),
            tracker: FrequencyTracker::with_capacity(capacity),
            eviction_factor,
        })
    }

    /// Returns the configured eviction factor.
    pub fn eviction_factor(&self) -> EvictionFactor {
        self.eviction_factor
    }

    /// Returns a reference to the value without counting an access.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.store.get(key)
    }

    /// Read-only view of the frequency bookkeeping.
    pub fn tracker(&self) -> &FrequencyTracker<K> {
        &self.tracker
    }

    fn evict(&mut self) -> Result<Vec<(K, V)>, CacheError> {
        let target = self.eviction_factor.batch_target(self.store.capacity());
        let store = &mut self.store;
        let evicted = evict_batch(&mut self.tracker, target, |key| Ok(store.remove(key)))?;
        debug!(
            evicted = evicted.len(),
            target,
            remaining = self.store.len(),
            "lfu batch eviction"
        );
        Ok(evicted)
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert!(self.store.len() <= self.store.capacity());
        assert_eq!(self.store.len(), self.tracker.len());
        for (key, _) in self.store.iter() {
            assert!(self.tracker.contains(key), "stored key {key:?} is untracked");
        }
        self.tracker.debug_validate_invariants();
    }
}

impl<K, V> Cache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    fn put(&mut self, key: K, value: V) -> Result<Vec<(K, V)>, CacheError> {
        if let Some(slot) = self.store.get_mut(&key) {
            *slot = value;
            return Ok(Vec::new());
        }

        let evicted = if self.store.is_full() {
            self.evict()?
        } else {
            Vec::new()
        };

        if self.store.try_insert(key.clone(), value).is_err() {
            return Ok(evicted);
        }
        self.tracker.remember_frequency(0, key);
        Ok(evicted)
    }

    fn get(&mut self, key: &K) -> Result<Option<V>, CacheError> {
        let Some(value) = self.store.get(key).cloned() else {
            return Ok(None);
        };
        self.tracker.update_frequency(key)?;
        Ok(Some(value))
    }

    fn contains_key(&self, key: &K) -> bool {
        self.store.contains(key)
    }

    fn remove_with_frequency(
        &mut self,
        key: &K,
    ) -> Result<(Option<V>, Option<Frequency>), CacheError> {
        match self.store.remove(key) {
            Some(value) => Ok((Some(value), self.tracker.remove(key))),
            None => Ok((None, None)),
        }
    }

    fn clear(&mut self) -> Result<(), CacheError> {
        self.store.clear();
        self.tracker.clear();
        Ok(())
    }

    fn len(&self) -> usize {
        self.store.len()
    }

    fn capacity(&self) -> usize {
        self.store.capacity()
    }

    fn as_countable(&self) -> Option<&dyn Countable<K>> {
        Some(self)
    }
}

impl<K, V> Countable<K> for LfuCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    fn frequency_of(&self, key: &K) -> Result<Frequency, CacheError> {
        self.tracker.frequency_of(key)
    }

    fn lowest_frequency(&self) -> Frequency {
        self.tracker.lowest_frequency()
    }
}
