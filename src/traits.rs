//! # Cache Capability Traits
//!
//! Every cache in this crate implements [`Cache`]. Frequency-aware caches (the
//! LFU family and two-level compositions of LFU levels) additionally implement
//! [`Countable`]. Values stored through [`Cache::put_value`] identify
//! themselves through [`Cacheable`].
//!
//! ```text
//!   ┌─────────────────────────────────────────────┐
//!   │               Cache<K, V>                   │
//!   │                                             │
//!   │  put(K, V)          → Vec<(K, V)> evicted   │
//!   │  put_value(V)       → Vec<V> evicted        │
//!   │  get(&K)            → Option<V>             │
//!   │  contains_key(&K)   → bool                  │
//!   │  remove(&K)         → Option<V>             │
//!   │  remove_with_frequency(&K)                  │
//!   │  clear(), len(), capacity()                 │
//!   │  as_countable()     → Option<&dyn Countable>│
//!   └──────────────────────┬──────────────────────┘
//!                          │ probed via as_countable()
//!                          ▼
//!   ┌─────────────────────────────────────────────┐
//!   │              Countable<K>                   │
//!   │                                             │
//!   │  frequency_of(&K)   → Result<Frequency>     │
//!   │  lowest_frequency() → Frequency             │
//!   └─────────────────────────────────────────────┘
//! ```
//!
//! Capabilities are composed, not inherited: a concrete cache implements the
//! traits directly and exposes the optional one through
//! [`Cache::as_countable`], so callers holding a `dyn Cache` (or the
//! [`AnyCache`](crate::builder::AnyCache) wrapper) can ask for frequency
//! information without knowing the concrete type.
//!
//! ## Thread Safety
//!
//! None of the caches are thread-safe. Wrap them in `Arc<Mutex<_>>` if they
//! must be shared.

use crate::error::CacheError;

/// Access-frequency counter. New entries start at 0; each successful `get`
/// adds exactly 1.
pub type Frequency = u64;

/// A value that knows its own cache key.
///
/// # Example
///
/// ```
/// use tiercache::traits::Cacheable;
///
/// struct Page { id: u64 }
///
/// impl Cacheable<u64> for Page {
///     fn identifier(&self) -> u64 {
///         self.id
///     }
/// }
///
/// assert_eq!(Page { id: 7 }.identifier(), 7);
/// ```
pub trait Cacheable<K> {
    /// Returns the key this value is cached under.
    fn identifier(&self) -> K;
}

/// Operations shared by every cache policy.
///
/// Operations return `Result` because the durable tier performs file I/O
/// inline; in-memory caches never fail them.
///
/// # Example
///
/// ```
/// use tiercache::policy::lfu::LfuCache;
/// use tiercache::traits::Cache;
///
/// fn warm<C: Cache<u64, String>>(cache: &mut C, data: &[(u64, &str)]) {
///     for (key, value) in data {
///         cache.put(*key, value.to_string()).unwrap();
///     }
/// }
///
/// let mut cache = LfuCache::try_new(10, 0.2).unwrap();
/// warm(&mut cache, &[(1, "one"), (2, "two")]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait Cache<K, V> {
    /// Inserts or overwrites `key`.
    ///
    /// Overwriting keeps the key's frequency and never evicts. Inserting a new
    /// key into a full cache first evicts a batch according to the policy;
    /// the evicted pairs are returned (empty when nothing was evicted).
    fn put(&mut self, key: K, value: V) -> Result<Vec<(K, V)>, CacheError>;

    /// Inserts a self-identifying value under [`Cacheable::identifier`].
    ///
    /// Returns only the evicted values.
    fn put_value(&mut self, value: V) -> Result<Vec<V>, CacheError>
    where
        V: Cacheable<K>,
    {
        let key = value.identifier();
        let evicted = self.put(key, value)?;
        Ok(evicted.into_iter().map(|(_, value)| value).collect())
    }

    /// Looks up `key`. A miss is `Ok(None)`, not an error.
    ///
    /// Frequency-aware caches count a hit as one access.
    fn get(&mut self, key: &K) -> Result<Option<V>, CacheError>;

    /// Checks presence without counting an access.
    fn contains_key(&self, key: &K) -> bool;

    /// Removes `key`, returning its value if it was present.
    fn remove(&mut self, key: &K) -> Result<Option<V>, CacheError> {
        Ok(self.remove_with_frequency(key)?.0)
    }

    /// Removes `key`, returning its value and the frequency it held.
    ///
    /// The frequency is `None` when the key was absent or the cache does not
    /// track frequencies.
    fn remove_with_frequency(
        &mut self,
        key: &K,
    ) -> Result<(Option<V>, Option<Frequency>), CacheError>;

    /// Removes every entry (and, for the durable tier, every blob file).
    fn clear(&mut self) -> Result<(), CacheError>;

    /// Current number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    fn capacity(&self) -> usize;

    /// Returns the frequency capability if this cache tracks frequencies.
    fn as_countable(&self) -> Option<&dyn Countable<K>> {
        None
    }
}

/// Frequency queries offered by LFU-family caches.
///
/// # Example
///
/// ```
/// use tiercache::policy::lfu::LfuCache;
/// use tiercache::traits::{Cache, Countable};
///
/// let mut cache = LfuCache::try_new(4, 0.5).unwrap();
/// cache.put("a", 1).unwrap();
/// cache.get(&"a").unwrap();
///
/// assert_eq!(cache.frequency_of(&"a").unwrap(), 1);
/// assert!(cache.frequency_of(&"missing").unwrap_err().is_not_found());
/// ```
pub trait Countable<K> {
    /// Returns the frequency of a tracked key, or
    /// [`CacheError::NotFound`] for an untracked one.
    fn frequency_of(&self, key: &K) -> Result<Frequency, CacheError>;

    /// Returns the lowest frequency currently held, or 0 when empty.
    fn lowest_frequency(&self) -> Frequency;
}
