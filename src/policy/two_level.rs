//! # Two-Level Cache
//!
//! Composes a fast first level with a slower, usually durable, second level.
//! Each level is any [`Cache`] implementation; the composition only calls
//! their public operations.
//!
//! ## Placement
//!
//! ```text
//!   put(k, v)
//!     │
//!     ├── k on level 2? ──yes──► level2.put(k, v)        (updated in place)
//!     │                          evictions returned as-is
//!     no
//!     ▼
//!   level1.put(k, v) ──► evicted from level 1 ──► level2.put(each)
//!                                                      │
//!                                   evicted from level 2 = result
//! ```
//!
//! | Operation      | Behavior                                         |
//! |----------------|--------------------------------------------------|
//! | `get`          | level 1, then level 2; no promotion              |
//! | `contains_key` | level 1, then level 2                            |
//! | `remove`       | level 1, then level 2                            |
//! | `clear`        | both levels                                      |
//! | `len`          | sum of both levels                               |
//!
//! An entry that level 2 refuses during demotion (an I/O failure on a durable
//! level, say) is handed back in the eviction list rather than dropped, since
//! the new key has already been admitted by level 1.
//!
//! A key never lives on both levels: level-1 admission skips keys held by
//! level 2, and level 2 only receives keys level 1 just dropped.
//!
//! ## Example Usage
//!
//! ```
//! use tiercache::policy::lfu::LfuCache;
//! use tiercache::policy::two_level::TwoLevelCache;
//! use tiercache::traits::Cache;
//!
//! let first = LfuCache::try_new(1, 1.0).unwrap();
//! let second = LfuCache::try_new(1, 1.0).unwrap();
//! let mut cache = TwoLevelCache::new(first, second);
//!
//! cache.put("a", 1).unwrap();
//! cache.put("b", 2).unwrap(); // "a" demoted to level 2
//!
//! assert!(cache.first_level().contains_key(&"b"));
//! assert!(cache.second_level().contains_key(&"a"));
//! assert_eq!(cache.get(&"a").unwrap(), Some(1));
//! assert_eq!(cache.len(), 2);
//! ```

use std::fmt::Debug;
use std::marker::PhantomData;

use tracing::{debug, trace, warn};

use crate::error::CacheError;
use crate::traits::{Cache, Countable, Frequency};

/// Cache made of two independently configured levels.
#[derive(Debug)]
pub struct TwoLevelCache<K, V, L1, L2> {
    first: L1,
    second: L2,
    _entries: PhantomData<fn(K) -> V>,
}

impl<K, V, L1, L2> TwoLevelCache<K, V, L1, L2>
where
    L1: Cache<K, V>,
    L2: Cache<K, V>,
{
    /// Composes `first` (checked first, admits new keys) with `second`
    /// (receives what `first` evicts).
    pub fn new(first: L1, second: L2) -> Self {
        Self {
            first,
            second,
            _entries: PhantomData,
        }
    }

    /// The fast level.
    pub fn first_level(&self) -> &L1 {
        &self.first
    }

    /// The slow level.
    pub fn second_level(&self) -> &L2 {
        &self.second
    }

    /// Splits the composition back into its levels.
    pub fn into_levels(self) -> (L1, L2) {
        (self.first, self.second)
    }
}

impl<K, V, L1, L2> Cache<K, V> for TwoLevelCache<K, V, L1, L2>
where
    K: Clone + Debug,
    V: Clone,
    L1: Cache<K, V>,
    L2: Cache<K, V>,
{
    fn put(&mut self, key: K, value: V) -> Result<Vec<(K, V)>, CacheError> {
        if self.second.contains_key(&key) {
            trace!(key = ?key, "key held by second level, updating in place");
            return self.second.put(key, value);
        }

        let demoted = self.first.put(key, value)?;
        if demoted.is_empty() {
            return Ok(demoted);
        }

        trace!(count = demoted.len(), "demoting first level evictions");
        let mut evicted = Vec::new();
        for (key, value) in demoted {
            let refused = (key.clone(), value.clone());
            match self.second.put(key, value) {
                Ok(dropped) => evicted.extend(dropped),
                Err(err) => {
                    warn!(key = ?refused.0, error = %err, "second level refused demoted entry");
                    evicted.push(refused);
                }
            }
        }
        debug!(evicted = evicted.len(), "two-level put evicted entries");
        Ok(evicted)
    }

    fn get(&mut self, key: &K) -> Result<Option<V>, CacheError> {
        if let Some(value) = self.first.get(key)? {
            trace!(key = ?key, level = "first", "hit");
            return Ok(Some(value));
        }
        let found = self.second.get(key)?;
        if found.is_some() {
            trace!(key = ?key, level = "second", "hit");
        } else {
            trace!(key = ?key, "miss");
        }
        Ok(found)
    }

    fn contains_key(&self, key: &K) -> bool {
        self.first.contains_key(key) || self.second.contains_key(key)
    }

    fn remove_with_frequency(
        &mut self,
        key: &K,
    ) -> Result<(Option<V>, Option<Frequency>), CacheError> {
        let removed = self.first.remove_with_frequency(key)?;
        if removed.0.is_some() {
            trace!(key = ?key, level = "first", "removed");
            return Ok(removed);
        }
        let removed = self.second.remove_with_frequency(key)?;
        if removed.0.is_some() {
            trace!(key = ?key, level = "second", "removed");
        }
        Ok(removed)
    }

    fn clear(&mut self) -> Result<(), CacheError> {
        self.first.clear()?;
        self.second.clear()
    }

    fn len(&self) -> usize {
        self.first.len() + self.second.len()
    }

    fn capacity(&self) -> usize {
        self.first.capacity() + self.second.capacity()
    }

    fn as_countable(&self) -> Option<&dyn Countable<K>> {
        if self.first.as_countable().is_some() && self.second.as_countable().is_some() {
            Some(self)
        } else {
            None
        }
    }
}

impl<K, V, L1, L2> Countable<K> for TwoLevelCache<K, V, L1, L2>
where
    K: Debug,
    L1: Cache<K, V>,
    L2: Cache<K, V>,
{
    fn frequency_of(&self, key: &K) -> Result<Frequency, CacheError> {
        let level = if self.first.contains_key(key) {
            self.first.as_countable()
        } else if self.second.contains_key(key) {
            self.second.as_countable()
        } else {
            None
        };
        match level {
            Some(level) => level.frequency_of(key),
            None => Err(CacheError::not_found(key)),
        }
    }

    fn lowest_frequency(&self) -> Frequency {
        let first = (!self.first.is_empty())
            .then(|| self.first.as_countable())
            .flatten()
            .map(|c| c.lowest_frequency());
        let second = (!self.second.is_empty())
            .then(|| self.second.as_countable())
            .flatten()
            .map(|c| c.lowest_frequency());
        match (first, second) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => 0,
        }
    }
}
