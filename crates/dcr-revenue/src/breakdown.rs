//! Insertion-ordered keyed accumulator used for the report breakdowns.
//!
//! Entries keep the order in which their key was first seen. Lookups go
//! through a side index so upserts stay O(1) regardless of entry count.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Clone, Debug)]
pub struct Breakdown<K, V> {
    entries: Vec<(K, V)>,
    index: HashMap<K, usize>,
}

impl<K, V> Default for Breakdown<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K, V> Breakdown<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutable entry for `key`, inserting `V::default()` on first encounter.
    pub fn upsert(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let pos = match self.index.get(&key) {
            Some(&pos) => pos,
            None => {
                let pos = self.entries.len();
                self.index.insert(key.clone(), pos);
                self.entries.push((key, V::default()));
                pos
            }
        };
        &mut self.entries[pos].1
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Reorder entries with a stable sort. Ties keep first-encounter order.
    pub fn sort_by<F>(&mut self, mut cmp: F)
    where
        F: FnMut(&(K, V), &(K, V)) -> std::cmp::Ordering,
    {
        self.entries.sort_by(|a, b| cmp(a, b));
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (pos, (k, _)) in self.entries.iter().enumerate() {
            self.index.insert(k.clone(), pos);
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for Breakdown<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq, V: Eq> Eq for Breakdown<K, V> {}
