//! Redundancy pruning for one override layer against its parent resolution.

use std::collections::BTreeSet;
use strata_core::{Entry, LayeredList, LayeredMap, OverrideLayer, Slot};

/// What a normalization pass did to the layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Addition entries dropped as redundant.
    pub dropped_additions: usize,

    /// Removal markers dropped as redundant.
    pub dropped_removals: usize,

    /// Keys left untouched because their stored assertions conflict.
    pub skipped_keys: usize,
}

impl NormalizeReport {
    /// Whether any entry was dropped. Skipped keys are left verbatim and do
    /// not count.
    pub fn changed(&self) -> bool {
        self.dropped_additions > 0 || self.dropped_removals > 0
    }
}

/// Normalize the override layer at `depth` (1-based) of a unique-flavor
/// stack.
///
/// Kept: removal markers that suppress a real inherited entry, additions
/// whose key or value differs from what the parent implies, and every
/// assertion of a malformed key. Dropped: markers that suppress nothing,
/// additions restating the inherited entry verbatim, duplicate identical
/// additions past the first.
///
/// # Panics
///
/// Panics if `depth` is 0 or past the stack.
pub fn normalize_map_layer<K, V>(map: &mut LayeredMap<K, V>, depth: usize) -> NormalizeReport
where
    K: Ord + Clone,
    V: Clone + PartialEq,
{
    let (additions, removals, report) = compact_map_layer(map, depth);
    let layer = map.layer_mut(depth);
    layer.clear();
    for entry in additions {
        layer.push_addition(entry);
    }
    for key in removals {
        layer.push_removal(key);
    }
    report
}

/// Whether [`normalize_map_layer`] would be a no-op for this layer.
pub fn is_map_layer_normalized<K, V>(map: &LayeredMap<K, V>, depth: usize) -> bool
where
    K: Ord + Clone,
    V: Clone + PartialEq,
{
    !compact_map_layer(map, depth).2.changed()
}

/// Compute the compacted assertion arrays without touching the stack.
fn compact_map_layer<K, V>(
    map: &LayeredMap<K, V>,
    depth: usize,
) -> (Vec<Entry<K, V>>, Vec<K>, NormalizeReport)
where
    K: Ord + Clone,
    V: Clone + PartialEq,
{
    let parent = map.resolve_through(depth - 1);
    let layer: &OverrideLayer<K, V> = map.layer(depth);

    let mut skip: BTreeSet<K> = layer.malformed_keys();
    skip.extend(parent.invalid().iter().cloned());

    let mut report = NormalizeReport {
        skipped_keys: layer
            .touched_keys()
            .filter(|k| skip.contains(k))
            .collect::<BTreeSet<_>>()
            .len(),
        ..NormalizeReport::default()
    };

    let mut additions: Vec<Entry<K, V>> = Vec::new();
    for entry in layer.additions() {
        if skip.contains(&entry.key) {
            additions.push(entry.clone());
            continue;
        }
        // A later duplicate of a kept addition is necessarily identical;
        // a differing duplicate would have made the key malformed.
        if additions.iter().any(|e| e.key == entry.key) {
            report.dropped_additions += 1;
            continue;
        }
        if parent.get(&entry.key) == Some(&entry.value) {
            report.dropped_additions += 1;
            continue;
        }
        additions.push(entry.clone());
    }

    let mut removals: Vec<K> = Vec::new();
    for key in layer.removals() {
        if skip.contains(key) {
            removals.push(key.clone());
            continue;
        }
        if parent.contains_key(key) {
            removals.push(key.clone());
        } else {
            report.dropped_removals += 1;
        }
    }

    (additions, removals, report)
}

/// Normalize the override layer at `depth` (1-based) of a list-flavor
/// stack.
///
/// The layer is replayed sequentially against the parent resolution; a
/// removed slot that deletes nothing at its replay point is dropped. Value
/// slots are never redundant (duplicates are legitimate list content).
///
/// # Panics
///
/// Panics if `depth` is 0 or past the stack.
pub fn normalize_list_layer<T>(list: &mut LayeredList<T>, depth: usize) -> NormalizeReport
where
    T: Clone + PartialEq,
{
    let (slots, report) = compact_list_layer(list, depth);
    let layer = list.layer_mut(depth);
    layer.clear();
    for slot in slots {
        layer.push(slot);
    }
    report
}

/// Whether [`normalize_list_layer`] would be a no-op for this layer.
pub fn is_list_layer_normalized<T>(list: &LayeredList<T>, depth: usize) -> bool
where
    T: Clone + PartialEq,
{
    !compact_list_layer(list, depth).1.changed()
}

fn compact_list_layer<T>(list: &LayeredList<T>, depth: usize) -> (Vec<Slot<T>>, NormalizeReport)
where
    T: Clone + PartialEq,
{
    let mut acc = list.resolve_through(depth - 1);
    let mut report = NormalizeReport::default();
    let mut kept: Vec<Slot<T>> = Vec::new();

    for slot in list.layer(depth).slots() {
        if slot.removed {
            if let Some(pos) = acc.iter().position(|v| *v == slot.value) {
                acc.remove(pos);
                kept.push(slot.clone());
            } else {
                report.dropped_removals += 1;
            }
        } else {
            acc.push(slot.value.clone());
            kept.push(slot.clone());
        }
    }

    (kept, report)
}
