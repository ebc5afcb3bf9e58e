//! Strata Edit - the element status machine and the editing facades.
//!
//! An editing surface never touches layer storage directly. It opens an
//! editor on the one layer it owns ([`MapEditorExt::edit`], or
//! [`ListEditorExt::edit`] for the list flavor), asks where a key stands
//! ([`ElementStatus`]), and mutates through the facade, which re-classifies
//! and reports the resulting status after every operation.
//!
//! The status machine answers, for one key at one layer: is it inherited,
//! locally added, locally suppressed, redundantly asserted, or malformed?
//! Malformed keys are reported as [`ElementStatus::Invalid`] and left
//! strictly alone by every mutation - a corrupted save stays openable and
//! hand-fixable.

pub mod classify;
pub mod editor;
pub mod status;

pub use classify::{classify, elements, try_classify};
pub use editor::{ListEditor, ListEditorExt, MapEditor, MapEditorExt};
pub use status::ElementStatus;
