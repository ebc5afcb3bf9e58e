//! Property checks for the editor operations.
//!
//! Stacks are built exclusively through the facade. Values are pinned to
//! their key so a forced duplicate addition is always the identical-copy
//! kind; that keeps every generated stack well formed, and the
//! post-operation guarantees then hold unconditionally.

use proptest::prelude::*;
use strata_core::LayeredMap;
use strata_edit::{ElementStatus, MapEditorExt};

#[derive(Clone, Copy, Debug)]
enum Op {
    EnsureAdded(u8),
    Add(u8),
    EnsureRemoved(u8),
    Remove(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..6).prop_map(Op::EnsureAdded),
        (0u8..6).prop_map(Op::Add),
        (0u8..6).prop_map(Op::EnsureRemoved),
        (0u8..6).prop_map(Op::Remove),
    ]
}

fn apply(map: &mut LayeredMap<u8, u8>, depth: usize, op: Op) -> (u8, ElementStatus) {
    let mut editor = map.edit(depth);
    match op {
        Op::EnsureAdded(k) => (k, editor.ensure_added(k, k)),
        Op::Add(k) => (k, editor.add(k, k)),
        Op::EnsureRemoved(k) => (k, editor.ensure_removed(&k)),
        Op::Remove(k) => (k, editor.remove(&k)),
    }
}

/// A stack grown through the facade: random base, 1..=3 layers, random
/// operations applied at each layer as it is derived.
fn stack_strategy() -> impl Strategy<Value = LayeredMap<u8, u8>> {
    (
        proptest::collection::btree_set(0u8..6, 0..4),
        proptest::collection::vec(proptest::collection::vec(op_strategy(), 0..8), 1..=3),
    )
        .prop_map(|(base, layers)| {
            let mut map = LayeredMap::with_base(base.into_iter().map(|k| (k, k)));
            for ops in layers {
                let depth = map.derive();
                for op in ops {
                    apply(&mut map, depth, op);
                }
            }
            map
        })
}

proptest! {
    /// After `ensure_added` the key resolves present and never reads as
    /// removed or unknown.
    #[test]
    fn ensure_added_lands_on_a_present_status(
        mut map in stack_strategy(),
        key in 0u8..6,
    ) {
        let depth = map.depth();
        let status = map.edit(depth).ensure_added(key, key);

        prop_assert!(status.is_present(), "got {status:?}");
        prop_assert!(map.resolve().contains_key(&key));
    }

    /// After `ensure_removed` the key resolves absent and never reads as
    /// present.
    #[test]
    fn ensure_removed_lands_on_an_absent_status(
        mut map in stack_strategy(),
        key in 0u8..6,
    ) {
        let depth = map.depth();
        let status = map.edit(depth).ensure_removed(&key);

        prop_assert!(status.is_absent(), "got {status:?}");
        prop_assert!(!map.resolve().contains_key(&key));
    }

    /// Applying `ensure_added` twice is the same as applying it once, both
    /// in reported status and in stored state.
    #[test]
    fn ensure_added_is_idempotent(
        mut map in stack_strategy(),
        key in 0u8..6,
    ) {
        let depth = map.depth();
        let first = map.edit(depth).ensure_added(key, key);
        let snapshot = map.clone();
        let second = map.edit(depth).ensure_added(key, key);

        prop_assert_eq!(first, second);
        prop_assert_eq!(&map, &snapshot);
    }

    /// Applying `ensure_removed` twice is the same as applying it once.
    #[test]
    fn ensure_removed_is_idempotent(
        mut map in stack_strategy(),
        key in 0u8..6,
    ) {
        let depth = map.depth();
        let first = map.edit(depth).ensure_removed(&key);
        let snapshot = map.clone();
        let second = map.edit(depth).ensure_removed(&key);

        prop_assert_eq!(first, second);
        prop_assert_eq!(&map, &snapshot);
    }

    /// `ensure_added` with a value the stack never stored (generated values
    /// are pinned below 100) still lands on a present status and never
    /// leaves the key's storage malformed, duplicates included.
    #[test]
    fn ensure_added_with_a_fresh_value_never_corrupts(
        mut map in stack_strategy(),
        key in 0u8..6,
        value in 100u8..=255,
    ) {
        let depth = map.depth();
        let status = map.edit(depth).ensure_added(key, value);

        prop_assert!(status.is_present(), "got {status:?}");
        let resolved = map.resolve();
        prop_assert!(resolved.invalid().is_empty());
        prop_assert!(resolved.contains_key(&key));
    }

    /// Facade-built stacks never contain a malformed key.
    #[test]
    fn facade_never_corrupts_storage(map in stack_strategy()) {
        for depth in 0..=map.depth() {
            prop_assert!(map.resolve_through(depth).invalid().is_empty());
        }
    }

    /// The reported status always matches a fresh classification.
    #[test]
    fn reported_status_matches_reclassification(
        mut map in stack_strategy(),
        op in op_strategy(),
    ) {
        let depth = map.depth();
        let (key, reported) = apply(&mut map, depth, op);
        prop_assert_eq!(reported, map.edit(depth).status(&key));
    }

    /// Editing a layer never changes what shallower depths resolve to.
    #[test]
    fn edits_are_invisible_upstream(
        mut map in stack_strategy(),
        op in op_strategy(),
    ) {
        let depth = map.depth();
        let upstream_before: Vec<_> =
            (0..depth).map(|d| map.resolve_through(d)).collect();

        apply(&mut map, depth, op);

        for (d, before) in upstream_before.iter().enumerate() {
            prop_assert_eq!(&map.resolve_through(d), before);
        }
    }
}
