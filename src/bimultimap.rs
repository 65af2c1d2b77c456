use std::{fmt::Debug, hash::Hash, ptr};

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::collections::BiMultiIndex;

/// A thread-safe bidirectional multimap.
///
/// Every key maps to the distinct values it was added with, and every value maps back to its
/// keys. Both directions live behind one reader/writer lock, so readers never observe a pair in
/// one direction but not the other.
///
/// Lookups hand out owned copies. Absent keys and values are never an error: lookups return an
/// empty `Vec` and deletes do nothing.
pub struct BiMultiMap<K: Eq + Hash + Clone, V: Eq + Hash + Clone> {
    index: RwLock<BiMultiIndex<K, V>>,
}

impl<K: Eq + Hash + Clone, V: Eq + Hash + Clone> Default for BiMultiMap<K, V> {
    fn default() -> Self {
        BiMultiMap::from_index(BiMultiIndex::default())
    }
}

impl<K: Eq + Hash + Clone, V: Eq + Hash + Clone> BiMultiMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-sizes the key and value indices.
    pub fn with_capacity(keys: usize, values: usize) -> Self {
        BiMultiMap::from_index(BiMultiIndex::with_capacity(keys, values))
    }

    fn from_index(index: BiMultiIndex<K, V>) -> Self {
        BiMultiMap {
            index: RwLock::new(index),
        }
    }

    /// The values associated with `key`, or nothing if the key is absent.
    pub fn lookup_key(&self, key: &K) -> Vec<V> {
        self.index.read().get_by_key(key).to_vec()
    }

    /// The keys associated with `value`, or nothing if the value is absent.
    pub fn lookup_value(&self, value: &V) -> Vec<K> {
        self.index.read().get_by_value(value).to_vec()
    }

    /// Adds a pair. Adding a pair that is already present changes nothing and returns false.
    pub fn add(&self, key: K, value: V) -> bool {
        let inserted = self.index.write().insert(key, value);
        trace!(inserted = inserted, "add");
        inserted
    }

    /// Adds every pair under a single write lock.
    pub fn extend(&self, pairs: impl IntoIterator<Item = (K, V)>) {
        // collected first: the iterator may itself read from this map
        let pairs: Vec<(K, V)> = pairs.into_iter().collect();
        let mut index = self.index.write();
        let before = index.len();
        index.extend(pairs);
        trace!(added = index.len() - before, "extend");
    }

    pub fn key_exists(&self, key: &K) -> bool {
        self.index.read().contains_key(key)
    }

    pub fn value_exists(&self, value: &V) -> bool {
        self.index.read().contains_value(value)
    }

    pub fn contains(&self, key: &K, value: &V) -> bool {
        self.index.read().contains(key, value)
    }

    /// Deletes `key` and all its pairs, returning the values it was associated with.
    /// Values left without any key are deleted as well.
    pub fn delete_key(&self, key: &K) -> Vec<V> {
        let values = self.index.write().remove_key(key);
        trace!(removed = values.len(), "delete_key");
        values
    }

    /// Deletes `value` and all its pairs, returning the keys it was associated with.
    /// Keys left without any value are deleted as well.
    pub fn delete_value(&self, value: &V) -> Vec<K> {
        let keys = self.index.write().remove_value(value);
        trace!(removed = keys.len(), "delete_value");
        keys
    }

    /// Deletes the single pair `(key, value)`, if both the key and the value are present.
    /// A key or value whose last pair goes away is deleted too.
    pub fn delete_key_value(&self, key: &K, value: &V) -> bool {
        let removed = self.index.write().remove_pair(key, value);
        trace!(removed = removed, "delete_key_value");
        removed
    }

    /// A new map holding every pair of `self` and `other`. Neither input is modified.
    pub fn merge(&self, other: &Self) -> Self {
        let merged = if ptr::eq(self, other) {
            // a second read lock on the same map can deadlock behind a queued writer
            self.index.read().clone()
        } else {
            // lock in address order so that `a.merge(&b)` and `b.merge(&a)` agree
            let (first, second) = if (self as *const Self) < (other as *const Self) {
                (self, other)
            } else {
                (other, self)
            };
            let first = first.index.read();
            let second = second.index.read();
            first.union(&second)
        };
        debug!(pairs = merged.len(), "merge");
        BiMultiMap::from_index(merged)
    }

    /// Removes every pair.
    pub fn clear(&self) {
        let mut index = self.index.write();
        debug!(pairs = index.len(), "clear");
        index.clear();
    }

    /// Every distinct key, in no particular order.
    ///
    /// This is a snapshot taken at call time; later changes to the map do not show up in it.
    pub fn keys(&self) -> impl Iterator<Item = K> {
        let keys: Vec<K> = self.index.read().keys().cloned().collect();
        keys.into_iter()
    }

    /// Every distinct value, in no particular order. Snapshot, like [`BiMultiMap::keys`].
    pub fn values(&self) -> impl Iterator<Item = V> {
        let values: Vec<V> = self.index.read().values().cloned().collect();
        values.into_iter()
    }

    /// Every pair, in no particular order. Snapshot, like [`BiMultiMap::keys`].
    pub fn pairs(&self) -> impl Iterator<Item = (K, V)> {
        let pairs: Vec<(K, V)> = self
            .index
            .read()
            .pairs()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        pairs.into_iter()
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    pub fn key_count(&self) -> usize {
        self.index.read().key_count()
    }

    pub fn value_count(&self) -> usize {
        self.index.read().value_count()
    }
}

impl<K, V> BiMultiMap<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Eq + Hash + Clone + Debug,
{
    /// Panics if the two directions disagree, or if any list is empty or holds duplicates.
    pub fn validate(&self) {
        self.index.read().validate();
    }
}

impl<K: Eq + Hash + Clone, V: Eq + Hash + Clone> Clone for BiMultiMap<K, V> {
    fn clone(&self) -> Self {
        BiMultiMap::from_index(self.index.read().clone())
    }
}

impl<K, V> Debug for BiMultiMap<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Eq + Hash + Clone + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BiMultiMap")
            .field(&*self.index.read())
            .finish()
    }
}

impl<K: Eq + Hash + Clone, V: Eq + Hash + Clone> FromIterator<(K, V)> for BiMultiMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        BiMultiMap::from_index(pairs.into_iter().collect())
    }
}
