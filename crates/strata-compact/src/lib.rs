//! Strata Compact - pre-persist diff normalization.
//!
//! A user toggling add/remove/re-add on one key must not grow the stored
//! diff without bound. Before a layer is persisted, the normalizer drops
//! every entry that is redundant with what the layer's parent already
//! implies: removal markers that suppress nothing, additions that restate
//! an inherited entry verbatim, duplicate identical assertions.
//!
//! Two guarantees, checked by the property suite:
//! - resolution at every depth is identical before and after
//! - normalizing an already-normalized layer is a no-op
//!
//! Keys whose stored assertions conflict are skipped entirely; malformed
//! state is surfaced to the caller, never silently repaired.

pub mod normalize;

pub use normalize::{
    is_list_layer_normalized, is_map_layer_normalized, normalize_list_layer, normalize_map_layer,
    NormalizeReport,
};
