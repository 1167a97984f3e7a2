//! # Durable LFU Cache
//!
//! Same admission and batch-eviction rules as
//! [`LfuCache`](crate::policy::lfu::LfuCache), but values live on disk: one
//! bincode blob per key under a base directory. Only keys, paths and
//! frequencies are held in memory.
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                 DurableLfuCache<K, V>                        │
//!   │                                                              │
//!   │   index: HashMapStore<K, PathBuf>   tracker: FrequencyTracker│
//!   │              │                                               │
//!   │              ▼                                               │
//!   │   base_dir/                                                  │
//!   │     ├── 5b0c…e1.blob     ◄── one file per cached value       │
//!   │     └── 9f32…07.blob                                         │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## File Lifecycle
//!
//! | Operation        | Disk effect                                   |
//! |------------------|-----------------------------------------------|
//! | `put` (new key)  | new `<uuid v4>.blob` written                  |
//! | `put` (existing) | same file rewritten in place                  |
//! | `get`            | file read and decoded                         |
//! | `remove`         | file read, decoded, deleted                   |
//! | eviction         | each victim read, decoded, deleted            |
//! | `clear`          | every file deleted                            |
//!
//! A new key's blob is written before anything is evicted, so a failed write
//! leaves the cache as it was. Eviction stops at the first victim that cannot
//! be read or deleted; earlier victims are still returned.
//!
//! Dropping the cache leaves files in place; the base directory is not
//! scanned at construction, so leftovers from a previous process are ignored.

use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::dirs;
use crate::ds::FrequencyTracker;
use crate::error::{CacheError, ConfigError};
use crate::policy::eviction::{EvictionFactor, evict_batch};
use crate::serializer::{BLOB_EXTENSION, delete_blob, read_blob, write_blob};
use crate::store::hashmap::HashMapStore;
use crate::store::traits::{StoreCore, StoreMut};
use crate::traits::{Cache, Countable, Frequency};

/// LFU cache persisting each value as a file.
#[derive(Debug)]
pub struct DurableLfuCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    index: HashMapStore<K, PathBuf>,
    tracker: FrequencyTracker<K>,
    eviction_factor: EvictionFactor,
    base_dir: PathBuf,
    _values: PhantomData<fn() -> V>,
}

impl<K, V> DurableLfuCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Creates a cache storing blobs under `base_dir`, creating the directory
    /// (and missing parents) if needed.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if `capacity` is 0, the factor is outside `(0, 1]`, or
    /// the directory cannot be created.
    pub fn try_new(
        capacity: usize,
        eviction_factor: f32,
        base_dir: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        Self::with_factor(capacity, EvictionFactor::new(eviction_factor)?, base_dir)
    }

    /// Like [`try_new`](Self::try_new) with an already validated factor.
    pub fn with_factor(
        capacity: usize,
        eviction_factor: EvictionFactor,
        base_dir: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be > 0"));
        }
        let base_dir = base_dir.into();
        dirs::ensure_dir(&base_dir).map_err(|err| {
            ConfigError::new(format!(
                "cannot create base directory '{}': {err}",
                base_dir.display()
            ))
        })?;
        debug!(
            capacity,
            eviction_factor = eviction_factor.get(),
            base_dir = %base_dir.display(),
            "durable lfu cache created"
        );
        Ok(Self {
            index: HashMapStore::new(capacity),
            tracker: FrequencyTracker::with_capacity(capacity),
            eviction_factor,
            base_dir,
            _values: PhantomData,
        })
    }

    /// Directory holding the value blobs.
    pub fn base_directory(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the configured eviction factor.
    pub fn eviction_factor(&self) -> EvictionFactor {
        self.eviction_factor
    }

    /// Path of the blob backing `key`, if cached.
    pub fn blob_path(&self, key: &K) -> Option<&Path> {
        self.index.get(key).map(PathBuf::as_path)
    }

    fn new_blob_path(&self) -> PathBuf {
        self.base_dir
            .join(format!("{}.{BLOB_EXTENSION}", Uuid::new_v4()))
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert!(self.index.len() <= self.index.capacity());
        assert_eq!(self.index.len(), self.tracker.len());
        for (key, path) in self.index.iter() {
            assert!(self.tracker.contains(key));
            assert!(path.starts_with(&self.base_dir));
        }
        self.tracker.debug_validate_invariants();
    }
}

impl<K, V> DurableLfuCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Serialize + DeserializeOwned,
{
    fn evict(&mut self) -> Result<Vec<(K, V)>, CacheError> {
        let target = self.eviction_factor.batch_target(self.index.capacity());
        let index = &mut self.index;
        let evicted = evict_batch(&mut self.tracker, target, |key| {
            let Some(path) = index.get(key).cloned() else {
                return Ok(None);
            };
            let value = read_blob(&path)?;
            delete_blob(&path)?;
            index.remove(key);
            Ok(Some(value))
        })?;
        debug!(
            evicted = evicted.len(),
            target,
            remaining = self.index.len(),
            "durable lfu batch eviction"
        );
        Ok(evicted)
    }
}

impl<K, V> Cache<K, V> for DurableLfuCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Serialize + DeserializeOwned,
{
    fn put(&mut self, key: K, value: V) -> Result<Vec<(K, V)>, CacheError> {
        if let Some(path) = self.index.get(&key) {
            write_blob(path, &value)?;
            trace!(key = ?key, path = %path.display(), "rewrote blob");
            return Ok(Vec::new());
        }

        let path = self.new_blob_path();
        write_blob(&path, &value)?;

        let evicted = if self.index.is_full() {
            match self.evict() {
                Ok(evicted) => evicted,
                Err(err) => {
                    discard_blob(&path);
                    return Err(err);
                }
            }
        } else {
            Vec::new()
        };

        if self.index.try_insert(key.clone(), path.clone()).is_err() {
            discard_blob(&path);
            return Ok(evicted);
        }
        trace!(key = ?key, path = %path.display(), "wrote blob");
        self.tracker.remember_frequency(0, key);
        Ok(evicted)
    }

    fn get(&mut self, key: &K) -> Result<Option<V>, CacheError> {
        let Some(path) = self.index.get(key) else {
            return Ok(None);
        };
        let value = read_blob(path)?;
        self.tracker.update_frequency(key)?;
        Ok(Some(value))
    }

    fn contains_key(&self, key: &K) -> bool {
        self.index.contains(key)
    }

    fn remove_with_frequency(
        &mut self,
        key: &K,
    ) -> Result<(Option<V>, Option<Frequency>), CacheError> {
        let Some(path) = self.index.get(key).cloned() else {
            return Ok((None, None));
        };
        let value = read_blob(&path)?;
        delete_blob(&path)?;
        self.index.remove(key);
        Ok((Some(value), self.tracker.remove(key)))
    }

    fn clear(&mut self) -> Result<(), CacheError> {
        let paths: Vec<PathBuf> = self.index.drain().map(|(_, path)| path).collect();
        self.tracker.clear();

        let mut first_error = None;
        for path in &paths {
            if let Err(err) = delete_blob(path) {
                first_error.get_or_insert(err);
            }
        }
        debug!(deleted = paths.len(), "durable lfu cache cleared");
        first_error.map_or(Ok(()), Err)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> usize {
        self.index.capacity()
    }

    fn as_countable(&self) -> Option<&dyn Countable<K>> {
        Some(self)
    }
}

fn discard_blob(path: &Path) {
    if let Err(err) = delete_blob(path) {
        warn!(path = %path.display(), error = %err, "unused blob left behind");
    }
}

impl<K, V> Countable<K> for DurableLfuCache<K, V>
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
    struct Film {
        id: String,
        title: String,
    }

    fn film(id: &str, title: &str) -> Film {
        Film {
            id: id.into(),
            title: title.into(),
        }
    }

    fn cache(capacity: usize, factor: f32) -> (TempDir, DurableLfuCache<String, Film>) {
        let dir = tempfile::tempdir().unwrap();
        let cache = DurableLfuCache::try_new(capacity, factor, dir.path().join("lfu")).unwrap();
        (dir, cache)
    }

    fn blob_count(cache: &DurableLfuCache<String, Film>) -> usize {
        fs::read_dir(cache.base_directory())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|ext| ext == BLOB_EXTENSION))
            .count()
    }

    mod construction {
        use super::*;

        #[test]
        fn creates_nested_base_directory() {
            let dir = tempfile::tempdir().unwrap();
            let base = dir.path().join("x").join("y");
            let cache: DurableLfuCache<String, Film> =
                DurableLfuCache::try_new(3, 0.5, &base).unwrap();
            assert!(base.is_dir());
            assert_eq!(cache.base_directory(), base.as_path());
            assert_eq!(cache.capacity(), 3);
        }

        #[test]
        fn rejects_invalid_parameters() {
            let dir = tempfile::tempdir().unwrap();
            assert!(DurableLfuCache::<String, Film>::try_new(0, 0.5, dir.path()).is_err());
            assert!(DurableLfuCache::<String, Film>::try_new(3, 0.0, dir.path()).is_err());
            assert!(DurableLfuCache::<String, Film>::try_new(3, 2.0, dir.path()).is_err());
        }

        #[test]
        fn unusable_directory_is_config_error() {
            let dir = tempfile::tempdir().unwrap();
            let file = dir.path().join("occupied");
            fs::write(&file, b"x").unwrap();
            let err = DurableLfuCache::<String, Film>::try_new(3, 0.5, file.join("sub"))
                .unwrap_err();
            assert!(err.message().contains("base directory"));
        }
    }

    mod persistence {
        use super::*;

        #[test]
        fn put_writes_one_blob_per_key() {
            let (_dir, mut cache) = cache(3, 0.5);
            cache
                .put("tt1375666".into(), film("tt1375666", "Inception"))
                .unwrap();
            cache
                .put("tt0816692".into(), film("tt0816692", "Interstellar"))
                .unwrap();

            assert_eq!(cache.len(), 2);
            assert_eq!(blob_count(&cache), 2);
            let path = cache.blob_path(&"tt1375666".to_string()).unwrap();
            assert!(path.is_file());
            assert_eq!(path.extension().unwrap(), BLOB_EXTENSION);
            cache.debug_validate_invariants();
        }

        #[test]
        fn overwrite_reuses_path_and_keeps_frequency() {
            let (_dir, mut cache) = cache(3, 0.5);
            let key = "tt1375666".to_string();
            cache.put(key.clone(), film("tt1375666", "Inception")).unwrap();
            cache.get(&key).unwrap();
            let before = cache.blob_path(&key).unwrap().to_path_buf();

            let evicted = cache
                .put(key.clone(), film("tt1375666", "Inception (2010)"))
                .unwrap();
            assert!(evicted.is_empty());
            assert_eq!(cache.blob_path(&key).unwrap(), before.as_path());
            assert_eq!(cache.frequency_of(&key).unwrap(), 1);
            assert_eq!(
                cache.get(&key).unwrap(),
                Some(film("tt1375666", "Inception (2010)"))
            );
            assert_eq!(blob_count(&cache), 1);
        }

        #[test]
        fn get_decodes_and_counts() {
            let (_dir, mut cache) = cache(3, 0.5);
            let key = "tt3659388".to_string();
            cache.put(key.clone(), film("tt3659388", "The Martian")).unwrap();

            assert_eq!(cache.get(&key).unwrap(), Some(film("tt3659388", "The Martian")));
            assert_eq!(cache.get(&key).unwrap(), Some(film("tt3659388", "The Martian")));
            assert_eq!(cache.frequency_of(&key).unwrap(), 2);
            assert_eq!(cache.get(&"missing".to_string()).unwrap(), None);
        }

        #[test]
        fn remove_deletes_blob_and_reports_frequency() {
            let (_dir, mut cache) = cache(3, 0.5);
            let key = "tt2543164".to_string();
            cache.put(key.clone(), film("tt2543164", "Arrival")).unwrap();
            cache.get(&key).unwrap();
            let path = cache.blob_path(&key).unwrap().to_path_buf();

            assert_eq!(
                cache.remove_with_frequency(&key).unwrap(),
                (Some(film("tt2543164", "Arrival")), Some(1))
            );
            assert!(!path.exists());
            assert!(cache.is_empty());
            assert_eq!(cache.remove_with_frequency(&key).unwrap(), (None, None));
        }

        #[test]
        fn clear_deletes_every_blob() {
            let (_dir, mut cache) = cache(4, 0.5);
            for i in 0..4 {
                cache.put(format!("k{i}"), film(&format!("k{i}"), "x")).unwrap();
            }
            assert_eq!(blob_count(&cache), 4);

            cache.clear().unwrap();
            assert!(cache.is_empty());
            assert_eq!(blob_count(&cache), 0);
            assert_eq!(cache.lowest_frequency(), 0);
            assert!(cache.base_directory().is_dir());
        }

        #[test]
        fn missing_blob_surfaces_io_error() {
            let (_dir, mut cache) = cache(2, 0.5);
            let key = "k".to_string();
            cache.put(key.clone(), film("k", "x")).unwrap();
            fs::remove_file(cache.blob_path(&key).unwrap()).unwrap();

            let err = cache.get(&key).unwrap_err();
            assert!(matches!(err, CacheError::Io { .. }));
            assert_eq!(cache.frequency_of(&key).unwrap(), 0);
        }
    }

    mod eviction {
        use super::*;

        #[test]
        fn evicted_values_are_decoded_and_files_removed() {
            let (_dir, mut cache) = cache(2, 1.0);
            cache.put("a".into(), film("a", "A")).unwrap();
            cache.put("b".into(), film("b", "B")).unwrap();
            let a_path = cache.blob_path(&"a".to_string()).unwrap().to_path_buf();

            let mut evicted = cache.put("c".into(), film("c", "C")).unwrap();
            evicted.sort();
            assert_eq!(
                evicted,
                vec![("a".into(), film("a", "A")), ("b".into(), film("b", "B"))]
            );
            assert!(!a_path.exists());
            assert_eq!(cache.len(), 1);
            assert_eq!(blob_count(&cache), 1);
            cache.debug_validate_invariants();
        }

        #[test]
        fn partial_batch_spares_hot_entries() {
            let (_dir, mut cache) = cache(2, 0.1);
            cache.put("snowden".into(), film("tt3774114", "Snowden")).unwrap();
            cache.put("inception".into(), film("tt1375666", "Inception")).unwrap();
            cache.get(&"snowden".to_string()).unwrap();

            let evicted = cache.put("aquaman".into(), film("tt1477834", "Aquaman")).unwrap();
            assert_eq!(
                evicted,
                vec![("inception".into(), film("tt1375666", "Inception"))]
            );
            assert!(cache.contains_key(&"snowden".to_string()));
            assert!(cache.frequency_of(&"inception".to_string()).is_err());
            assert_eq!(blob_count(&cache), 2);
        }

        #[test]
        fn failed_write_evicts_nothing() {
            let (_dir, mut cache) = cache(2, 1.0);
            cache.put("a".into(), film("a", "A")).unwrap();
            cache.put("b".into(), film("b", "B")).unwrap();
            fs::remove_dir_all(cache.base_directory()).unwrap();

            let err = cache.put("c".into(), film("c", "C")).unwrap_err();
            assert!(matches!(err, CacheError::Io { .. }));
            assert_eq!(cache.len(), 2);
            assert!(cache.contains_key(&"a".to_string()));
            assert!(cache.contains_key(&"b".to_string()));
            assert!(!cache.contains_key(&"c".to_string()));
            cache.debug_validate_invariants();
        }

        #[test]
        fn unreadable_victim_stops_batch_and_keeps_earlier_ones() {
            let (_dir, mut cache) = cache(2, 1.0);
            cache.put("a".into(), film("a", "A")).unwrap();
            cache.put("b".into(), film("b", "B")).unwrap();
            cache.get(&"b".to_string()).unwrap();
            let a_path = cache.blob_path(&"a".to_string()).unwrap().to_path_buf();
            fs::remove_file(cache.blob_path(&"b".to_string()).unwrap()).unwrap();

            let evicted = cache.put("c".into(), film("c", "C")).unwrap();
            assert_eq!(evicted, vec![("a".into(), film("a", "A"))]);
            assert!(!a_path.exists());
            assert!(cache.contains_key(&"b".to_string()));
            assert_eq!(cache.frequency_of(&"b".to_string()).unwrap(), 1);
            assert_eq!(cache.get(&"c".to_string()).unwrap(), Some(film("c", "C")));
            assert_eq!(cache.len(), 2);
            cache.debug_validate_invariants();
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashMap;

        proptest! {
            /// Without evictions, get returns the last value put for each key.
            #[cfg_attr(miri, ignore)]
            #[test]
            fn prop_get_returns_last_put(
                puts in prop::collection::vec((0u8..8, ".*", any::<i32>()), 1..24)
            ) {
                let dir = tempfile::tempdir().unwrap();
                let mut cache: DurableLfuCache<u8, (String, i32)> =
                    DurableLfuCache::try_new(8, 0.5, dir.path()).unwrap();
                let mut expected = HashMap::new();

                for (key, text, number) in puts {
                    let evicted = cache.put(key, (text.clone(), number)).unwrap();
                    prop_assert!(evicted.is_empty());
                    expected.insert(key, (text, number));
                }

                prop_assert_eq!(cache.len(), expected.len());
                for (key, value) in expected {
                    prop_assert_eq!(cache.get(&key).unwrap(), Some(value));
                }
                cache.debug_validate_invariants();
            }
        }
    }
}
