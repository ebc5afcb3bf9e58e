//! Per-element classification at one layer of the stack.

use serde::{Deserialize, Serialize};

/// How a single key stands at one override layer, for editing surfaces.
///
/// A status is always relative to the layer being edited: the same key can
/// be `Natural` at the variant and `Removed` at the instance. Presence and
/// absence here mean presence in the resolution computed through the edited
/// layer, inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementStatus {
    /// Present, inherited from the base, untouched by the edited layer.
    Natural,

    /// Unknown to every layer; a blank row the editor may still fill in.
    NewSlot,

    /// Present upstream, suppressed by the edited layer's removal marker.
    Removed,

    /// Present because an override layer introduced it (or re-added what an
    /// ancestor removed); the base never held the current occurrence.
    NewElement,

    /// Asserted present redundantly: inherited and locally added, or locally
    /// added twice. The duplicate is kept in storage and surfaced here
    /// rather than silently merged.
    AddedTwice,

    /// Absent, but not because the edited layer suppressed an upstream
    /// entry: an ancestor removed it, or a removal marker points at a key
    /// that was never there. Re-adding from here is a fresh local decision.
    FakeRemoved,

    /// The stored assertions for this key conflict. Never auto-repaired;
    /// every mutation leaves the key untouched until it is fixed by hand.
    Invalid,
}

impl ElementStatus {
    /// Whether the key resolves present at the edited layer.
    pub fn is_present(self) -> bool {
        matches!(
            self,
            ElementStatus::Natural | ElementStatus::NewElement | ElementStatus::AddedTwice
        )
    }

    /// Whether the key resolves absent at the edited layer.
    pub fn is_absent(self) -> bool {
        matches!(
            self,
            ElementStatus::NewSlot | ElementStatus::Removed | ElementStatus::FakeRemoved
        )
    }
}
