//! Cache builders.
//!
//! [`CacheBuilder`] creates a single cache of any policy behind the
//! [`AnyCache`] wrapper; [`TwoLevelCacheBuilder`] assembles the standard
//! in-memory LFU over durable LFU composition.
//!
//! ## Example
//!
//! ```rust
//! use tiercache::builder::CacheBuilder;
//! use tiercache::config::CachePolicy;
//! use tiercache::traits::Cache;
//!
//! let mut cache = CacheBuilder::new()
//!     .policy(CachePolicy::Lfu)
//!     .capacity(100)
//!     .eviction_factor(0.25)
//!     .build::<u64, String>()
//!     .unwrap();
//! cache.put(1, "hello".to_string()).unwrap();
//! assert_eq!(cache.get(&1).unwrap(), Some("hello".to_string()));
//! assert!(cache.as_countable().is_some());
//! ```

use std::fmt::Debug;
use std::hash::Hash;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::{CachePolicy, LevelConfig, TwoLevelConfig};
use crate::error::{CacheError, ConfigError};
use crate::policy::durable_lfu::DurableLfuCache;
use crate::policy::lfu::LfuCache;
use crate::policy::simple::SimpleCache;
use crate::policy::two_level::TwoLevelCache;
use crate::traits::{Cache, Countable, Frequency};

/// In-memory LFU level 1 over durable LFU level 2.
pub type DurableTwoLevelCache<K, V> =
    TwoLevelCache<K, V, LfuCache<K, V>, DurableLfuCache<K, V>>;

/// A cache of any policy, chosen at runtime.
#[derive(Debug)]
pub enum AnyCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    Simple(SimpleCache<K, V>),
    Lfu(LfuCache<K, V>),
    DurableLfu(DurableLfuCache<K, V>),
}

impl<K, V> AnyCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Policy this cache was built with.
    pub fn policy(&self) -> CachePolicy {
        match self {
            AnyCache::Simple(_) => CachePolicy::Simple,
            AnyCache::Lfu(_) => CachePolicy::Lfu,
            AnyCache::DurableLfu(_) => CachePolicy::DurableLfu,
        }
    }
}

impl<K, V> Cache<K, V> for AnyCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone + Serialize + DeserializeOwned,
{
    fn put(&mut self, key: K, value: V) -> Result<Vec<(K, V)>, CacheError> {
        match self {
            AnyCache::Simple(cache) => cache.put(key, value),
            AnyCache::Lfu(cache) => cache.put(key, value),
            AnyCache::DurableLfu(cache) => cache.put(key, value),
        }
    }

    fn get(&mut self, key: &K) -> Result<Option<V>, CacheError> {
        match self {
            AnyCache::Simple(cache) => cache.get(key),
            AnyCache::Lfu(cache) => cache.get(key),
            AnyCache::DurableLfu(cache) => cache.get(key),
        }
    }

    fn contains_key(&self, key: &K) -> bool {
        match self {
            AnyCache::Simple(cache) => cache.contains_key(key),
            AnyCache::Lfu(cache) => cache.contains_key(key),
            AnyCache::DurableLfu(cache) => cache.contains_key(key),
        }
    }

    fn remove_with_frequency(
        &mut self,
        key: &K,
    ) -> Result<(Option<V>, Option<Frequency>), CacheError> {
        match self {
            AnyCache::Simple(cache) => cache.remove_with_frequency(key),
            AnyCache::Lfu(cache) => cache.remove_with_frequency(key),
            AnyCache::DurableLfu(cache) => cache.remove_with_frequency(key),
        }
    }

    fn clear(&mut self) -> Result<(), CacheError> {
        match self {
            AnyCache::Simple(cache) => cache.clear(),
            AnyCache::Lfu(cache) => cache.clear(),
            AnyCache::DurableLfu(cache) => cache.clear(),
        }
    }

    fn len(&self) -> usize {
        match self {
            AnyCache::Simple(cache) => cache.len(),
            AnyCache::Lfu(cache) => cache.len(),
            AnyCache::DurableLfu(cache) => cache.len(),
        }
    }

    fn capacity(&self) -> usize {
        match self {
            AnyCache::Simple(cache) => cache.capacity(),
            AnyCache::Lfu(cache) => cache.capacity(),
            AnyCache::DurableLfu(cache) => cache.capacity(),
        }
    }

    fn as_countable(&self) -> Option<&dyn Countable<K>> {
        match self {
            AnyCache::Simple(_) => None,
            AnyCache::Lfu(cache) => Some(cache),
            AnyCache::DurableLfu(cache) => Some(cache),
        }
    }
}

/// Builder for a single cache.
///
/// Defaults: policy `simple`, capacity 10, eviction factor 0.2, platform
/// default base directory.
#[derive(Debug, Clone, Default)]
pub struct CacheBuilder {
    config: LevelConfig,
}

impl CacheBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from a deserialized configuration.
    pub fn from_config(config: LevelConfig) -> Self {
        Self { config }
    }

    /// Current settings.
    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn policy(mut self, policy: CachePolicy) -> Self {
        self.config.policy = policy;
        self
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Ignored by the `simple` policy, but still validated.
    pub fn eviction_factor(mut self, eviction_factor: f32) -> Self {
        self.config.eviction_factor = eviction_factor;
        self
    }

    /// Only used by the `durable-lfu` policy.
    pub fn base_directory(mut self, base_directory: impl Into<PathBuf>) -> Self {
        self.config.base_directory = Some(base_directory.into());
        self
    }

    /// Build a cache with the configured policy.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] for a zero capacity, an eviction factor outside
    /// `(0, 1]`, or a base directory that cannot be created.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tiercache::builder::CacheBuilder;
    ///
    /// assert!(CacheBuilder::new().capacity(0).build::<u64, String>().is_err());
    /// assert!(CacheBuilder::new().eviction_factor(0.0).build::<u64, String>().is_err());
    /// ```
    pub fn build<K, V>(self) -> Result<AnyCache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone + Debug,
    {
        self.config.validate()?;
        let LevelConfig {
            policy,
            capacity,
            eviction_factor,
            ..
        } = self.config;
        debug!(%policy, capacity, eviction_factor, "building cache");

        let cache = match policy {
            CachePolicy::Simple => AnyCache::Simple(SimpleCache::try_new(capacity)?),
            CachePolicy::Lfu => AnyCache::Lfu(LfuCache::try_new(capacity, eviction_factor)?),
            CachePolicy::DurableLfu => AnyCache::DurableLfu(DurableLfuCache::try_new(
                capacity,
                eviction_factor,
                self.config.resolved_base_directory(),
            )?),
        };
        Ok(cache)
    }
}

/// Builder for [`DurableTwoLevelCache`].
///
/// Each level takes its own capacity and eviction factor (defaults 10 and
/// 0.2); level 2 stores its blobs under the base directory.
///
/// ```rust
/// use tiercache::builder::TwoLevelCacheBuilder;
/// use tiercache::traits::Cache;
///
/// let dir = tempfile::tempdir().unwrap();
/// let mut cache = TwoLevelCacheBuilder::new()
///     .first_level_capacity(1)
///     .second_level_capacity(4)
///     .base_directory(dir.path())
///     .build::<String, String>()
///     .unwrap();
///
/// cache.put("a".into(), "alpha".into()).unwrap();
/// cache.put("b".into(), "beta".into()).unwrap();
/// assert!(cache.second_level().contains_key(&"a".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TwoLevelCacheBuilder {
    config: TwoLevelConfig,
}

impl TwoLevelCacheBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: TwoLevelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TwoLevelConfig {
        &self.config
    }

    pub fn first_level_capacity(mut self, capacity: usize) -> Self {
        self.config.first_level_capacity = capacity;
        self
    }

    pub fn first_level_eviction_factor(mut self, eviction_factor: f32) -> Self {
        self.config.first_level_eviction_factor = eviction_factor;
        self
    }

    pub fn second_level_capacity(mut self, capacity: usize) -> Self {
        self.config.second_level_capacity = capacity;
        self
    }

    pub fn second_level_eviction_factor(mut self, eviction_factor: f32) -> Self {
        self.config.second_level_eviction_factor = eviction_factor;
        self
    }

    pub fn base_directory(mut self, base_directory: impl Into<PathBuf>) -> Self {
        self.config.base_directory = Some(base_directory.into());
        self
    }

    /// Build both levels and compose them.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if either level is misconfigured or the base directory
    /// cannot be created.
    pub fn build<K, V>(self) -> Result<DurableTwoLevelCache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone + Debug,
        V: Clone + Serialize + DeserializeOwned,
    {
        self.config.validate()?;
        let base_directory = self.config.resolved_base_directory();
        let first = LfuCache::try_new(
            self.config.first_level_capacity,
            self.config.first_level_eviction_factor,
        )?;
        let second = DurableLfuCache::try_new(
            self.config.second_level_capacity,
            self.config.second_level_eviction_factor,
            base_directory,
        )?;
        debug!(
            first_level_capacity = self.config.first_level_capacity,
            second_level_capacity = self.config.second_level_capacity,
            "building two-level cache"
        );
        Ok(TwoLevelCache::new(first, second))
    }
}
