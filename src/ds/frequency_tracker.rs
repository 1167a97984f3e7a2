//! Frequency tracker for LFU bookkeeping.
//!
//! Keeps, for every live key, its access frequency and an index from each
//! frequency value to the set of keys currently holding it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                      FrequencyTracker<K> Layout                      │
//! │                                                                      │
//! │   frequencies: FxHashMap<K, u64>       buckets: BTreeMap<u64, Set>   │
//! │                                                                      │
//! │   ┌───────────┬──────┐                 ┌──────┬──────────────────┐   │
//! │   │    Key    │ Freq │                 │ Freq │ Keys             │   │
//! │   ├───────────┼──────┤                 ├──────┼──────────────────┤   │
//! │   │ "page_a"  │   0  │ ─────────────►  │   0  │ {page_a, page_c} │◄─ lowest
//! │   │ "page_b"  │   3  │ ─────────┐      │   3  │ {page_b}         │   │
//! │   │ "page_c"  │   0  │          └───►  │      │                  │   │
//! │   └───────────┴──────┘                 └──────┴──────────────────┘   │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//!
//! - A tracked key sits in exactly one bucket, the one matching its entry in
//!   `frequencies`.
//! - A bucket is dropped as soon as it becomes empty, so the first key of
//!   `buckets` is always the lowest frequency actually held.
//!
//! ## Operations
//!
//! | Operation                  | Time       | Notes                              |
//! |----------------------------|------------|------------------------------------|
//! | `remember_frequency`       | O(log F)   | F = number of distinct frequencies |
//! | `update_frequency`         | O(log F)   | Moves key to `freq + 1`            |
//! | `remove`                   | O(log F)   | Drops bucket when it empties       |
//! | `lowest_frequency`         | O(log F)   | First key of the bucket index      |
//! | `keys_at_lowest_frequency` | O(F + b)   | Prunes, then snapshots the bucket  |
//!
//! ## Tie-breaking
//!
//! Keys sharing the lowest frequency come back in the bucket set's iteration
//! order, which is unspecified. There is no recency tie-break.
//!
//! ## Example Usage
//!
//! ```
//! use tiercache::ds::FrequencyTracker;
//!
//! let mut tracker = FrequencyTracker::new();
//! tracker.remember_frequency(0, "a");
//! tracker.remember_frequency(0, "b");
//! tracker.update_frequency(&"a").unwrap();
//!
//! assert_eq!(tracker.frequency_of(&"a").unwrap(), 1);
//! assert_eq!(tracker.lowest_frequency(), 0);
//! assert_eq!(tracker.keys_at_lowest_frequency(), vec!["b"]);
//! ```

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::CacheError;
use crate::traits::Frequency;

/// Per-key frequency counters plus a frequency → keys bucket index.
#[derive(Debug, Clone)]
pub struct FrequencyTracker<K> {
    buckets: BTreeMap<Frequency, FxHashSet<K>>,
    frequencies: FxHashMap<K, Frequency>,
}

impl<K> Default for FrequencyTracker<K>
where
    K: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> FrequencyTracker<K>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
            frequencies: FxHashMap::default(),
        }
    }

    /// Creates an empty tracker with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: BTreeMap::new(),
            frequencies: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Returns `true` if no key is tracked.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Returns `true` if `key` is tracked.
    pub fn contains(&self, key: &K) -> bool {
        self.frequencies.contains_key(key)
    }

    /// Number of distinct frequencies currently held.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of keys at `freq`.
    pub fn bucket_len(&self, freq: Frequency) -> usize {
        self.buckets.get(&freq).map_or(0, FxHashSet::len)
    }

    /// Records that `key` is now at `freq`.
    ///
    /// A key already tracked at another frequency is detached from its old
    /// bucket first, so it never appears in two buckets.
    pub fn remember_frequency(&mut self, freq: Frequency, key: K) {
        if let Some(old) = self.frequencies.insert(key.clone(), freq)
            && old != freq
        {
            self.detach(old, &key);
        }
        self.buckets.entry(freq).or_default().insert(key);
    }

    /// Returns the frequency of `key`.
    ///
    /// # Errors
    ///
    /// [`CacheError::NotFound`] if `key` is not tracked.
    pub fn frequency_of(&self, key: &K) -> Result<Frequency, CacheError> {
        self.frequencies
            .get(key)
            .copied()
            .ok_or_else(|| CacheError::not_found(key))
    }

    /// Returns the lowest frequency held, or 0 if nothing is tracked.
    pub fn lowest_frequency(&self) -> Frequency {
        self.buckets.keys().next().copied().unwrap_or(0)
    }

    /// Moves `key` from its bucket to the next frequency and returns the new
    /// frequency.
    ///
    /// # Errors
    ///
    /// [`CacheError::NotFound`] if `key` is not tracked.
    pub fn update_frequency(&mut self, key: &K) -> Result<Frequency, CacheError> {
        let slot = self
            .frequencies
            .get_mut(key)
            .ok_or_else(|| CacheError::not_found(key))?;
        let old = *slot;
        let new = old.saturating_add(1);
        *slot = new;

        if let Some(owned) = self.detach(old, key) {
            self.buckets.entry(new).or_default().insert(owned);
        }
        Ok(new)
    }

    /// Stops tracking `key` and returns the frequency it held.
    ///
    /// Removing an untracked key is a no-op returning `None`; callers probe
    /// removal speculatively.
    pub fn remove(&mut self, key: &K) -> Option<Frequency> {
        let freq = self.frequencies.remove(key)?;
        self.detach(freq, key);
        Some(freq)
    }

    /// Returns the keys at the lowest frequency.
    ///
    /// Empty buckets are pruned first. The result is a snapshot, so the caller
    /// may [`remove`](Self::remove) each key while walking it.
    pub fn keys_at_lowest_frequency(&mut self) -> Vec<K> {
        self.buckets.retain(|_, keys| !keys.is_empty());
        self.buckets
            .values()
            .next()
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Empties both the bucket index and the key map.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.frequencies.clear();
    }

    /// Removes `key` from the bucket at `freq`, dropping the bucket when it
    /// empties. Returns the owned key stored in the bucket.
    fn detach(&mut self, freq: Frequency, key: &K) -> Option<K> {
        let keys = self.buckets.get_mut(&freq)?;
        let owned = keys.take(key);
        if keys.is_empty() {
            self.buckets.remove(&freq);
        }
        owned
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        let mut bucketed = 0usize;
        for (freq, keys) in &self.buckets {
            assert!(!keys.is_empty(), "empty bucket left at frequency {freq}");
            for key in keys {
                assert_eq!(
                    self.frequencies.get(key),
                    Some(freq),
                    "key {key:?} bucketed at {freq} but mapped elsewhere"
                );
            }
            bucketed += keys.len();
        }
        assert_eq!(bucketed, self.frequencies.len());
    }
}
