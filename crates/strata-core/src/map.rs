//! Unique flavor - keyed layers of addition/removal assertions.
//!
//! Each override layer stores two arrays: additions (keys asserted present,
//! with a value) and removals (keys asserted absent). Additions are an array
//! rather than a set on purpose: a key added twice is representable, and the
//! editing surface reports it as an anomaly instead of silently merging it.
//!
//! The resolver folds the base and the override layers in depth order:
//! removals first, then additions, per layer. Re-adding a key that is
//! already present updates its value in place, so an override that only
//! changes a value never moves the entry.

use crate::error::Result;
use crate::list::check_depth;
use crate::resolution::Resolution;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A keyed element. For the plain-set variant the value is `()`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Entry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

/// One derivation step's delta for the unique flavor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideLayer<K, V> {
    additions: Vec<Entry<K, V>>,
    removals: Vec<K>,
}

impl<K: Ord + Clone, V: Clone + PartialEq> OverrideLayer<K, V> {
    pub fn new() -> Self {
        Self {
            additions: Vec::new(),
            removals: Vec::new(),
        }
    }

    pub fn additions(&self) -> &[Entry<K, V>] {
        &self.additions
    }

    pub fn removals(&self) -> &[K] {
        &self.removals
    }

    pub fn push_addition(&mut self, entry: Entry<K, V>) {
        self.additions.push(entry);
    }

    pub fn push_removal(&mut self, key: K) {
        self.removals.push(key);
    }

    pub fn retain_additions(&mut self, keep: impl FnMut(&Entry<K, V>) -> bool) {
        self.additions.retain(keep);
    }

    pub fn retain_removals(&mut self, keep: impl FnMut(&K) -> bool) {
        self.removals.retain(keep);
    }

    /// Number of addition entries carrying `key`.
    pub fn addition_count(&self, key: &K) -> usize {
        self.additions.iter().filter(|e| e.key == *key).count()
    }

    /// Number of removal markers carrying `key`.
    pub fn removal_count(&self, key: &K) -> usize {
        self.removals.iter().filter(|k| **k == *key).count()
    }

    /// Update the value of every addition carrying `key`; duplicates stay
    /// duplicates, but they stay identical. Returns how many entries were
    /// touched.
    pub fn set_addition_value(&mut self, key: &K, value: &V) -> usize {
        let mut touched = 0;
        for entry in self.additions.iter_mut().filter(|e| e.key == *key) {
            entry.value = value.clone();
            touched += 1;
        }
        touched
    }

    /// Whether the stored assertions for `key` conflict with each other.
    ///
    /// Conflicts: the key appears in both arrays, carries duplicate removal
    /// markers, or carries duplicate additions with differing values.
    /// Duplicate additions with *equal* values are not malformed - that is
    /// the "added twice" anomaly the editor surfaces and the normalizer
    /// collapses.
    pub fn is_key_malformed(&self, key: &K) -> bool {
        let adds: Vec<&Entry<K, V>> = self.additions.iter().filter(|e| e.key == *key).collect();
        let removals = self.removal_count(key);

        if !adds.is_empty() && removals > 0 {
            return true;
        }
        if removals > 1 {
            return true;
        }
        adds.windows(2).any(|w| w[0].value != w[1].value)
    }

    /// Every key this layer stores malformed assertions for.
    pub fn malformed_keys(&self) -> BTreeSet<K> {
        let mut keys = BTreeSet::new();
        for entry in &self.additions {
            if self.is_key_malformed(&entry.key) {
                keys.insert(entry.key.clone());
            }
        }
        for key in &self.removals {
            if self.is_key_malformed(key) {
                keys.insert(key.clone());
            }
        }
        keys
    }

    /// Keys this layer mentions at all, additions and removals alike.
    pub fn touched_keys(&self) -> impl Iterator<Item = &K> {
        self.additions
            .iter()
            .map(|e| &e.key)
            .chain(self.removals.iter())
    }

    pub fn clear(&mut self) {
        self.additions.clear();
        self.removals.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }
}

impl<K: Ord + Clone, V: Clone + PartialEq> Default for OverrideLayer<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// A key-unique collection that survives template/variant/instance
/// derivation.
///
/// Depth 0 is the base entry array; depth `i` (1-based) is
/// `overrides[i - 1]`. The effective collection never holds two entries with
/// one key regardless of how the layers overlap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayeredMap<K, V> {
    base: Vec<Entry<K, V>>,
    overrides: Vec<OverrideLayer<K, V>>,
}

/// The plain-set variant: key-only entries.
pub type LayeredSet<K> = LayeredMap<K, ()>;

impl<K: Ord + Clone, V: Clone + PartialEq> LayeredMap<K, V> {
    pub fn new() -> Self {
        Self {
            base: Vec::new(),
            overrides: Vec::new(),
        }
    }

    pub fn with_base(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            base: entries
                .into_iter()
                .map(|(k, v)| Entry::new(k, v))
                .collect(),
            overrides: Vec::new(),
        }
    }

    pub fn base(&self) -> &[Entry<K, V>] {
        &self.base
    }

    /// Mutable base access for the template's own editor.
    pub fn base_mut(&mut self) -> &mut Vec<Entry<K, V>> {
        &mut self.base
    }

    /// Number of override layers (the base is not counted).
    pub fn depth(&self) -> usize {
        self.overrides.len()
    }

    /// Append one empty override layer for a new derivation step and return
    /// its depth.
    pub fn derive(&mut self) -> usize {
        self.overrides.push(OverrideLayer::new());
        self.overrides.len()
    }

    /// Drop the deepest layer if it was never modified. Returns whether a
    /// layer was discarded.
    pub fn pop_layer_if_empty(&mut self) -> bool {
        match self.overrides.last() {
            Some(layer) if layer.is_empty() => {
                self.overrides.pop();
                true
            }
            _ => false,
        }
    }

    /// The override layer at `depth` (1-based).
    ///
    /// # Panics
    ///
    /// Panics if `depth` is 0 or past the stack; addressing a layer that does
    /// not exist is a bug in the hosting integration, not a data condition.
    pub fn layer(&self, depth: usize) -> &OverrideLayer<K, V> {
        self.try_layer(depth).unwrap_or_else(|e| panic!("{e}"))
    }

    /// See [`LayeredMap::layer`].
    pub fn layer_mut(&mut self, depth: usize) -> &mut OverrideLayer<K, V> {
        self.try_layer_mut(depth).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Non-panicking variant of [`LayeredMap::layer`].
    pub fn try_layer(&self, depth: usize) -> Result<&OverrideLayer<K, V>> {
        check_depth(depth, self.overrides.len())?;
        Ok(&self.overrides[depth - 1])
    }

    pub fn try_layer_mut(&mut self, depth: usize) -> Result<&mut OverrideLayer<K, V>> {
        check_depth(depth, self.overrides.len())?;
        Ok(&mut self.overrides[depth - 1])
    }

    /// The effective collection with every override layer applied.
    pub fn resolve(&self) -> Resolution<K, V> {
        self.resolve_through(self.overrides.len())
    }

    /// The effective collection with layers 1..=`depth` applied. Depth 0
    /// yields the base content alone.
    ///
    /// Keys whose stored assertions conflict anywhere in the folded range are
    /// flagged invalid and excluded from the entries - they are never coerced
    /// into a best-effort value.
    ///
    /// # Panics
    ///
    /// Panics if `depth` exceeds the stack.
    pub fn resolve_through(&self, depth: usize) -> Resolution<K, V> {
        assert!(
            depth <= self.overrides.len(),
            "resolve depth {depth} out of range (stack holds {} override layers)",
            self.overrides.len()
        );

        let mut invalid = self.malformed_base_keys();
        for layer in &self.overrides[..depth] {
            invalid.extend(layer.malformed_keys());
        }

        let mut entries: Vec<Entry<K, V>> = Vec::new();
        for entry in &self.base {
            if invalid.contains(&entry.key) {
                continue;
            }
            // Identical base duplicates collapse to the first occurrence.
            if entries.iter().any(|e| e.key == entry.key) {
                continue;
            }
            entries.push(entry.clone());
        }

        for layer in &self.overrides[..depth] {
            for key in layer.removals() {
                if invalid.contains(key) {
                    continue;
                }
                if let Some(pos) = entries.iter().position(|e| e.key == *key) {
                    entries.remove(pos);
                }
            }
            for addition in layer.additions() {
                if invalid.contains(&addition.key) {
                    continue;
                }
                match entries.iter_mut().find(|e| e.key == addition.key) {
                    Some(existing) => existing.value = addition.value.clone(),
                    None => entries.push(addition.clone()),
                }
            }
        }

        Resolution::new(entries, invalid)
    }

    /// Base keys stored with conflicting duplicate values.
    fn malformed_base_keys(&self) -> BTreeSet<K> {
        let mut invalid = BTreeSet::new();
        for (i, entry) in self.base.iter().enumerate() {
            if self.base[..i]
                .iter()
                .any(|e| e.key == entry.key && e.value != entry.value)
            {
                invalid.insert(entry.key.clone());
            }
        }
        invalid
    }

    /// Every key mentioned anywhere in layers 0..=`depth`, in first-seen
    /// order. Removal markers count: a key someone explicitly suppressed is
    /// still known to the stack.
    pub fn known_keys_through(&self, depth: usize) -> Vec<&K> {
        assert!(
            depth <= self.overrides.len(),
            "depth {depth} out of range (stack holds {} override layers)",
            self.overrides.len()
        );
        let mut keys: Vec<&K> = Vec::new();
        for entry in &self.base {
            if !keys.contains(&&entry.key) {
                keys.push(&entry.key);
            }
        }
        for layer in &self.overrides[..depth] {
            for key in layer.touched_keys() {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys
    }

    /// Every key mentioned anywhere in the whole stack, in first-seen order.
    pub fn known_keys(&self) -> Vec<&K> {
        self.known_keys_through(self.overrides.len())
    }
}

impl<K: Ord + Clone, V: Clone + PartialEq> Default for LayeredMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone> LayeredSet<K> {
    /// A set whose base layer holds `keys`.
    pub fn with_base_keys(keys: impl IntoIterator<Item = K>) -> Self {
        Self::with_base(keys.into_iter().map(|k| (k, ())))
    }
}
