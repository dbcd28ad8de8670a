#![forbid(unsafe_code)]

use std::collections::BTreeMap;

/// A key that is compared through a canonical textual form instead of identity.
pub trait CanonicalKey {
    fn canonical_key(&self) -> String;
}

impl CanonicalKey for (i64, i64) {
    fn canonical_key(&self) -> String {
        format!("[{},{}]", self.0, self.1)
    }
}

impl CanonicalKey for [i64; 2] {
    fn canonical_key(&self) -> String {
        format!("[{},{}]", self[0], self[1])
    }
}

impl CanonicalKey for String {
    fn canonical_key(&self) -> String {
        self.clone()
    }
}

/// Associative map whose keys are equal iff their canonical forms are equal.
///
/// The original key is kept next to the value so iteration can hand it back.
#[derive(Clone, Debug)]
pub struct StringifyingMap<K, V> {
    entries: BTreeMap<String, (K, V)>,
}

impl<K, V> Default for StringifyingMap<K, V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: CanonicalKey, V> StringifyingMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(&key.canonical_key()).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(&key.canonical_key()).map(|(_, v)| v)
    }

    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        self.entries
            .insert(key.canonical_key(), (key, value))
            .map(|(_, old)| old)
    }

    pub fn has(&self, key: &K) -> bool {
        self.entries.contains_key(&key.canonical_key())
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(&key.canonical_key()).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.values().map(|(k, v)| (k, v))
    }
}

impl<K: CanonicalKey, T> StringifyingMap<K, Vec<T>> {
    fn list_mut(&mut self, key: K) -> &mut Vec<T> {
        let canonical = key.canonical_key();
        &mut self
            .entries
            .entry(canonical)
            .or_insert_with(|| (key, Vec::new()))
            .1
    }

    /// Appends `value` to the list stored under `key`, creating an empty list first.
    pub fn add_to_dictionary_of_lists(&mut self, key: K, value: T) {
        self.list_mut(key).push(value);
    }

    /// Keeps only the entries of the list under `key` that satisfy `keep`, in order.
    pub fn filter_dictionary_of_lists<F>(&mut self, key: K, keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.list_mut(key).retain(keep);
    }
}
