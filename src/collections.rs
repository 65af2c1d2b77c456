use std::{fmt::Debug, hash::Hash};

use ahash::HashMap;
use itertools::Itertools;

/// A bidirectional hash multimap: a relation between keys and values, indexed from both sides.
///
/// Neither side is unique. Each list holds distinct entries, and a list that becomes empty is
/// dropped from its index, so a key is present iff it has at least one value (and vice versa).
///
/// No locking here; [`crate::BiMultiMap`] is the shared version.
#[derive(Clone)]
pub struct BiMultiIndex<K: Eq + Hash + Clone, V: Eq + Hash + Clone> {
    forward: HashMap<K, Vec<V>>,
    inverse: HashMap<V, Vec<K>>,
}

impl<K: Eq + Hash + Clone, V: Eq + Hash + Clone> Default for BiMultiIndex<K, V> {
    fn default() -> Self {
        BiMultiIndex {
            forward: HashMap::default(),
            inverse: HashMap::default(),
        }
    }
}

impl<K: Eq + Hash + Clone, V: Eq + Hash + Clone> BiMultiIndex<K, V> {
    pub fn with_capacity(keys: usize, values: usize) -> Self {
        BiMultiIndex {
            forward: HashMap::with_capacity_and_hasher(keys, Default::default()),
            inverse: HashMap::with_capacity_and_hasher(values, Default::default()),
        }
    }

    /// Inserts the pair. Returns false if it was already there.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let values = self.forward.entry(key.clone()).or_default();
        if values.contains(&value) {
            return false;
        }
        values.push(value.clone());
        self.inverse.entry(value).or_default().push(key);
        true
    }

    pub fn get_by_key(&self, key: &K) -> &[V] {
        self.forward.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_by_value(&self, value: &V) -> &[K] {
        self.inverse.get(value).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.forward.contains_key(key)
    }

    pub fn contains_value(&self, value: &V) -> bool {
        self.inverse.contains_key(value)
    }

    pub fn contains(&self, key: &K, value: &V) -> bool {
        self.get_by_key(key).contains(value)
    }

    /// Removes `key` with all its pairs, returning the values it was paired with.
    pub fn remove_key(&mut self, key: &K) -> Vec<V> {
        let values = match self.forward.remove(key) {
            Some(values) => values,
            None => return vec![],
        };
        for value in &values {
            let mirrored = delete_item(&mut self.inverse, value, key);
            debug_assert!(mirrored, "forward pair missing from the inverse index");
        }
        values
    }

    /// Removes `value` with all its pairs, returning the keys it was paired with.
    pub fn remove_value(&mut self, value: &V) -> Vec<K> {
        let keys = match self.inverse.remove(value) {
            Some(keys) => keys,
            None => return vec![],
        };
        for key in &keys {
            let mirrored = delete_item(&mut self.forward, key, value);
            debug_assert!(mirrored, "inverse pair missing from the forward index");
        }
        keys
    }

    /// Removes the single pair `(key, value)`. No-op unless both the key and the value are
    /// present somewhere in the index.
    pub fn remove_pair(&mut self, key: &K, value: &V) -> bool {
        if !self.forward.contains_key(key) || !self.inverse.contains_key(value) {
            return false;
        }
        let removed = delete_item(&mut self.forward, key, value);
        let mirrored = delete_item(&mut self.inverse, value, key);
        debug_assert_eq!(removed, mirrored, "indices disagree on a pair");
        removed
    }

    pub fn clear(&mut self) {
        self.forward.clear();
        self.inverse.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.forward.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.inverse.keys()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&K, &V)> {
        self.forward
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |value| (key, value)))
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.forward.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn key_count(&self) -> usize {
        self.forward.len()
    }

    pub fn value_count(&self) -> usize {
        self.inverse.len()
    }

    /// A new index holding the union of both relations.
    pub fn union(&self, other: &Self) -> Self {
        let mut merged = BiMultiIndex::with_capacity(
            self.key_count() + other.key_count(),
            self.value_count() + other.value_count(),
        );
        for (key, value) in self.pairs().chain(other.pairs()) {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}

impl<K, V> BiMultiIndex<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Eq + Hash + Clone + Debug,
{
    pub fn validate(&self) {
        for (key, values) in &self.forward {
            assert!(!values.is_empty(), "key {:?} has an empty value list", key);
            assert!(
                values.iter().all_unique(),
                "key {:?} has duplicate values {:?}",
                key,
                values
            );
            for value in values {
                assert!(
                    self.get_by_value(value).contains(key),
                    "pair ({:?}, {:?}) missing from the inverse index",
                    key,
                    value
                );
            }
        }
        for (value, keys) in &self.inverse {
            assert!(!keys.is_empty(), "value {:?} has an empty key list", value);
            assert!(
                keys.iter().all_unique(),
                "value {:?} has duplicate keys {:?}",
                value,
                keys
            );
            for key in keys {
                assert!(
                    self.get_by_key(key).contains(value),
                    "pair ({:?}, {:?}) missing from the forward index",
                    key,
                    value
                );
            }
        }
    }
}

impl<K, V> Debug for BiMultiIndex<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Eq + Hash + Clone + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.forward.iter()).finish()
    }
}

impl<K: Eq + Hash + Clone, V: Eq + Hash + Clone> Extend<(K, V)> for BiMultiIndex<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, pairs: I) {
        for (key, value) in pairs {
            self.insert(key, value);
        }
    }
}

impl<K: Eq + Hash + Clone, V: Eq + Hash + Clone> FromIterator<(K, V)> for BiMultiIndex<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        let mut index = BiMultiIndex::default();
        index.extend(pairs);
        index
    }
}

/// Filters `item` out of the list stored under `at`, dropping the entry if the list empties.
/// O(n) in the list length; fan-out is expected to be small.
fn delete_item<A: Eq + Hash, B: PartialEq>(index: &mut HashMap<A, Vec<B>>, at: &A, item: &B) -> bool {
    let list = match index.get_mut(at) {
        Some(list) => list,
        None => return false,
    };
    let before = list.len();
    list.retain(|it| it != item);
    let removed = list.len() != before;
    if list.is_empty() {
        index.remove(at);
    }
    removed
}
