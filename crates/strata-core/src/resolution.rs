//! The resolver's output for the unique flavor.

use crate::map::Entry;
use std::collections::BTreeSet;

/// The effective unique collection at some depth, plus the keys that could
/// not be resolved.
///
/// Entries keep their base-layer order; values re-added by an override layer
/// stay at their inherited position, fresh additions append. A key lands in
/// `invalid` instead of `entries` when its stored assertions conflict
/// (duplicate additions with differing values, add and remove in one layer,
/// duplicate removal markers) - such keys are flagged, never guessed at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution<K: Ord, V> {
    entries: Vec<Entry<K, V>>,
    invalid: BTreeSet<K>,
}

impl<K: Ord, V> Resolution<K, V> {
    pub(crate) fn new(entries: Vec<Entry<K, V>>, invalid: BTreeSet<K>) -> Self {
        Self { entries, invalid }
    }

    /// Effective entries in order.
    pub fn entries(&self) -> &[Entry<K, V>] {
        &self.entries
    }

    /// Keys excluded because their stored state is malformed.
    pub fn invalid(&self) -> &BTreeSet<K> {
        &self.invalid
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.iter().any(|e| e.key == *key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.iter().find(|e| e.key == *key).map(|e| &e.value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|e| &e.key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<K, V>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
