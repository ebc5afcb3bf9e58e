//! Strata - layered override collections for template/variant/instance
//! asset derivation.
//!
//! A collection-valued property that survives derivation is stored as a
//! stack: the base layer owns the template's full content, and every
//! derived asset contributes one override layer holding only its diff
//! (additions plus removal markers). The resolver folds the stack into the
//! effective collection, the classifier explains where each element stands,
//! the editors keep diffs minimal, and the normalizer strips redundancy
//! before a layer is persisted.
//!
//! # Quick Start
//!
//! ```rust
//! use strata::{ElementStatus, LayeredSet, MapEditorExt};
//!
//! // The template's own tags form the base layer.
//! let mut tags = LayeredSet::with_base_keys(["render", "physics"].map(String::from));
//!
//! // A derived variant gets its own override layer.
//! let variant = tags.derive();
//! let mut editor = tags.edit(variant);
//! assert_eq!(editor.ensure_present("audio".to_string()), ElementStatus::NewElement);
//! assert_eq!(editor.ensure_removed(&"physics".to_string()), ElementStatus::Removed);
//!
//! // The variant sees the base through its diff.
//! let resolved = tags.resolve();
//! let keys: Vec<String> = resolved.keys().cloned().collect();
//! assert_eq!(keys, ["render", "audio"]);
//! ```
//!
//! # Crates
//!
//! - `strata-core` - storage model, resolver, errors
//! - `strata-edit` - per-element status machine and editing facades
//! - `strata-compact` - pre-persist diff normalization

pub use strata_core::{
    Entry, LayerError, LayeredList, LayeredMap, LayeredSet, ListLayer, OverrideLayer, Resolution,
    Result, Slot,
};

pub use strata_edit::{
    classify, elements, try_classify, ElementStatus, ListEditor, ListEditorExt, MapEditor,
    MapEditorExt,
};

pub use strata_compact::{
    is_list_layer_normalized, is_map_layer_normalized, normalize_list_layer, normalize_map_layer,
    NormalizeReport,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use strata_core::{LayeredList, LayeredMap, LayeredSet};
    pub use strata_edit::{ElementStatus, ListEditorExt, MapEditorExt};
}
