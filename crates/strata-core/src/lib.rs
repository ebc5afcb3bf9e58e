//! Strata Core - storage model and resolver for layered override collections
//!
//! A layered collection is a base layer (the "template", depth 0) plus an
//! ordered stack of override layers, one per derivation step ("variant",
//! "instance", instance-of-instance, ...). Each override layer stores only
//! the delta its owner applied: values appended or suppressed relative to
//! everything beneath it. The resolver folds the stack back into the
//! effective collection.
//!
//! Two flavors share this model:
//!
//! - **List** ([`list::LayeredList`]): duplicates allowed, order significant.
//!   A layer is a run of [`list::Slot`]s; a removed slot deletes the first
//!   remaining occurrence of its value, a live slot appends.
//! - **Unique** ([`map::LayeredMap`], [`map::LayeredSet`]): keys unique in the
//!   effective collection. A layer is an additions array plus a removals
//!   array; re-adding an upstream key updates its value in place.
//!
//! Ancestor layers are read-only from a descendant's point of view; each
//! layer's storage is exclusively owned by its derivation step.

pub mod error;
pub mod list;
pub mod map;
pub mod resolution;

pub use error::{LayerError, Result};
pub use list::{LayeredList, ListLayer, Slot};
pub use map::{Entry, LayeredMap, LayeredSet, OverrideLayer};
pub use resolution::Resolution;
