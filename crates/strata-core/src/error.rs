//! Error types for layered collection access.

use thiserror::Error;

/// Errors that can occur when addressing the layer stack.
///
/// Malformed *data* never shows up here: corrupted entries are surfaced per
/// element as an invalid status so a damaged save can still be opened and
/// repaired by hand. These errors are contract violations by the hosting
/// integration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayerError {
    #[error("layer depth {depth} out of range (stack holds {len} override layers)")]
    DepthOutOfRange { depth: usize, len: usize },

    #[error("the base layer is edited through its own owner, not an override editor")]
    BaseLayer,
}

pub type Result<T> = std::result::Result<T, LayerError>;
