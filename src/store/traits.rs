//! Bounded key/value stores backing the cache policies.
//!
//! A store owns values and answers lookups; it never picks victims. Policies
//! keep their own frequency bookkeeping and remove entries themselves to make
//! room before inserting a new key.

/// Insert refused: the store already holds `capacity` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreFull;

/// Lookups and size queries.
pub trait StoreCore<K, V> {
    fn get(&self, key: &K) -> Option<&V>;

    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry limit fixed at construction.
    fn capacity(&self) -> usize;

    /// `true` once `len() == capacity()`; the next new key needs eviction.
    fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }
}

/// Mutation of a bounded store.
pub trait StoreMut<K, V>: StoreCore<K, V> {
    /// Inserts `key` or replaces its value, handing back the old one.
    ///
    /// A new key is refused with [`StoreFull`] when the store is full;
    /// replacing an existing key always succeeds.
    fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, StoreFull>;

    fn remove(&mut self, key: &K) -> Option<V>;

    fn clear(&mut self);
}
