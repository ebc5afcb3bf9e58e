//! The per-key state machine over (local assertions x upstream resolution).
//!
//! Classification consults only the edited layer and its own ancestors;
//! layers deeper than the edited one do not exist from its point of view.
//! Most specific wins:
//!
//! 1. malformed local assertions, or a key already invalid upstream
//! 2. local additions (redundant or fresh)
//! 3. local removal marker (suppressing something real, or nothing)
//! 4. no local assertion: inherited, ancestor-suppressed, or unknown

use crate::status::ElementStatus;
use strata_core::{LayeredMap, Result};

/// Classify `key` as seen from the override layer at `depth` (1-based).
///
/// # Panics
///
/// Panics if `depth` is 0 or past the stack.
pub fn classify<K, V>(map: &LayeredMap<K, V>, key: &K, depth: usize) -> ElementStatus
where
    K: Ord + Clone,
    V: Clone + PartialEq,
{
    try_classify(map, key, depth).unwrap_or_else(|e| panic!("{e}"))
}

/// Non-panicking variant of [`classify`].
pub fn try_classify<K, V>(map: &LayeredMap<K, V>, key: &K, depth: usize) -> Result<ElementStatus>
where
    K: Ord + Clone,
    V: Clone + PartialEq,
{
    let layer = map.try_layer(depth)?;

    if layer.is_key_malformed(key) {
        return Ok(ElementStatus::Invalid);
    }

    let upstream = map.resolve_through(depth - 1);
    if upstream.invalid().contains(key) {
        return Ok(ElementStatus::Invalid);
    }

    let local_adds = layer.addition_count(key);
    let local_marker = layer.removal_count(key) > 0;
    let present_upstream = upstream.contains_key(key);

    let status = if local_adds > 0 {
        if present_upstream || local_adds > 1 {
            ElementStatus::AddedTwice
        } else {
            ElementStatus::NewElement
        }
    } else if local_marker {
        if present_upstream {
            // The marker suppresses a real inherited entry.
            ElementStatus::Removed
        } else {
            // The marker suppresses nothing: an explicit "this is absent"
            // record for a key nobody upstream provides.
            ElementStatus::FakeRemoved
        }
    } else if present_upstream {
        if origin_is_base(map, key, depth) {
            ElementStatus::Natural
        } else {
            ElementStatus::NewElement
        }
    } else if known_upstream(map, key, depth) {
        // An ancestor removed it (or explicitly asserted its absence). The
        // edited layer cannot undo that, only shadow it with a fresh add.
        ElementStatus::FakeRemoved
    } else {
        ElementStatus::NewSlot
    };

    Ok(status)
}

/// Whether the upstream presence of `key` is still attributable to the base:
/// the base holds it and no ancestor override removed it along the way.
/// Redundant ancestor re-adds do not change the origin.
fn origin_is_base<K, V>(map: &LayeredMap<K, V>, key: &K, depth: usize) -> bool
where
    K: Ord + Clone,
    V: Clone + PartialEq,
{
    let mut present = map.base().iter().any(|e| e.key == *key);
    let mut from_base = present;

    for ancestor in 1..depth {
        let layer = map.layer(ancestor);
        if layer.removal_count(key) > 0 {
            present = false;
            from_base = false;
        }
        if layer.addition_count(key) > 0 {
            if !present {
                from_base = false;
            }
            present = true;
        }
    }

    present && from_base
}

/// Whether any layer strictly above the edited one ever mentioned `key`.
fn known_upstream<K, V>(map: &LayeredMap<K, V>, key: &K, depth: usize) -> bool
where
    K: Ord + Clone,
    V: Clone + PartialEq,
{
    if map.base().iter().any(|e| e.key == *key) {
        return true;
    }
    (1..depth).any(|ancestor| {
        let layer = map.layer(ancestor);
        layer.addition_count(key) > 0 || layer.removal_count(key) > 0
    })
}

/// Every key known anywhere in the stack, in first-seen order, tagged with
/// its status at the layer being edited. This is the iteration an editing
/// surface renders: removed and overridden rows included, annotated.
///
/// # Panics
///
/// Panics if `depth` is 0 or past the stack.
pub fn elements<K, V>(map: &LayeredMap<K, V>, depth: usize) -> Vec<(K, ElementStatus)>
where
    K: Ord + Clone,
    V: Clone + PartialEq,
{
    map.known_keys()
        .into_iter()
        .map(|key| (key.clone(), classify(map, key, depth)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{Entry, LayerError};

    #[test]
    fn test_depth_zero_is_rejected() {
        let map: LayeredMap<u8, ()> = LayeredMap::new();
        assert_eq!(try_classify(&map, &0, 0), Err(LayerError::BaseLayer));
    }

    #[test]
    fn test_ancestor_readd_is_new_element_downstream() {
        let mut map = LayeredMap::with_base([("k".to_string(), 1)]);
        let variant = map.derive();
        map.layer_mut(variant).push_removal("k".to_string());
        let middle = map.derive();
        map.layer_mut(middle)
            .push_addition(Entry::new("k".to_string(), 2));
        let instance = map.derive();

        // Removed by the variant, re-added in between: the occurrence the
        // instance inherits no longer originates at the base.
        assert_eq!(
            classify(&map, &"k".to_string(), instance),
            ElementStatus::NewElement
        );
    }

    #[test]
    fn test_ancestor_marker_makes_unknown_key_fake_removed() {
        let mut map: LayeredMap<String, i64> = LayeredMap::new();
        let variant = map.derive();
        map.layer_mut(variant).push_removal("ghost".to_string());
        let instance = map.derive();

        assert_eq!(
            classify(&map, &"ghost".to_string(), instance),
            ElementStatus::FakeRemoved
        );
    }
}
