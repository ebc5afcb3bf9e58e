//! List flavor - ordered layers of append/remove slots.
//!
//! Each layer is an array of [`Slot`]s replayed in order. A live slot appends
//! its value; a removed slot deletes the first remaining occurrence of an
//! equal value from the accumulated sequence. Resizing a layer's own slot
//! array is how a derived copy adds or removes entries without touching its
//! parent's storage, which keeps the persisted diff proportional to the edit.

use crate::error::{LayerError, Result};
use serde::{Deserialize, Serialize};

/// A single stored cell in a list layer: a value plus a removal flag.
///
/// With `removed` false the slot contributes its value; with `removed` true
/// it suppresses one occurrence of an equal value inherited from beneath.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot<T> {
    pub value: T,
    pub removed: bool,
}

impl<T> Slot<T> {
    /// A slot that appends `value`.
    pub fn live(value: T) -> Self {
        Self {
            value,
            removed: false,
        }
    }

    /// A slot that suppresses one inherited occurrence of `value`.
    pub fn removal(value: T) -> Self {
        Self {
            value,
            removed: true,
        }
    }
}

/// One derivation step's delta for the list flavor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListLayer<T> {
    slots: Vec<Slot<T>>,
}

impl<T> ListLayer<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn from_slots(slots: Vec<Slot<T>>) -> Self {
        Self { slots }
    }

    /// Build a base layer from plain values (no removal flags).
    pub fn from_values(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            slots: values.into_iter().map(Slot::live).collect(),
        }
    }

    pub fn slots(&self) -> &[Slot<T>] {
        &self.slots
    }

    pub fn push(&mut self, slot: Slot<T>) {
        self.slots.push(slot);
    }

    pub fn remove_slot(&mut self, index: usize) -> Slot<T> {
        self.slots.remove(index)
    }

    pub fn retain(&mut self, keep: impl FnMut(&Slot<T>) -> bool) {
        self.slots.retain(keep);
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<T> Default for ListLayer<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A list that survives template/variant/instance derivation.
///
/// Depth 0 is the base layer; depth `i` (1-based) is `overrides[i - 1]`.
/// The base is owned by the template and never rewritten through a
/// descendant; each override layer is owned by exactly one derivation step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayeredList<T> {
    base: ListLayer<T>,
    overrides: Vec<ListLayer<T>>,
}

impl<T: Clone + PartialEq> LayeredList<T> {
    /// An empty list with no override layers.
    pub fn new() -> Self {
        Self {
            base: ListLayer::new(),
            overrides: Vec::new(),
        }
    }

    /// A list whose base layer holds `values`.
    pub fn with_base(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            base: ListLayer::from_values(values),
            overrides: Vec::new(),
        }
    }

    /// Number of override layers (the base is not counted).
    pub fn depth(&self) -> usize {
        self.overrides.len()
    }

    /// Append one empty override layer for a new derivation step and return
    /// its depth.
    pub fn derive(&mut self) -> usize {
        self.overrides.push(ListLayer::new());
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

    pub fn base(&self) -> &ListLayer<T> {
        &self.base
    }

    /// Mutable base access for the template's own editor.
    pub fn base_mut(&mut self) -> &mut ListLayer<T> {
        &mut self.base
    }

    /// The override layer at `depth` (1-based).
    ///
    /// # Panics
    ///
    /// Panics if `depth` is 0 or past the stack; addressing a layer that does
    /// not exist is a bug in the hosting integration, not a data condition.
    pub fn layer(&self, depth: usize) -> &ListLayer<T> {
        self.try_layer(depth)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// See [`LayeredList::layer`].
    pub fn layer_mut(&mut self, depth: usize) -> &mut ListLayer<T> {
        self.try_layer_mut(depth)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Non-panicking variant of [`LayeredList::layer`].
    pub fn try_layer(&self, depth: usize) -> Result<&ListLayer<T>> {
        check_depth(depth, self.overrides.len())?;
        Ok(&self.overrides[depth - 1])
    }

    pub fn try_layer_mut(&mut self, depth: usize) -> Result<&mut ListLayer<T>> {
        check_depth(depth, self.overrides.len())?;
        Ok(&mut self.overrides[depth - 1])
    }

    /// The effective sequence with every override layer applied.
    pub fn resolve(&self) -> Vec<T> {
        self.resolve_through(self.overrides.len())
    }

    /// The effective sequence with layers 1..=`depth` applied. Depth 0 yields
    /// the base content alone.
    ///
    /// # Panics
    ///
    /// Panics if `depth` exceeds the stack.
    pub fn resolve_through(&self, depth: usize) -> Vec<T> {
        assert!(
            depth <= self.overrides.len(),
            "resolve depth {depth} out of range (stack holds {} override layers)",
            self.overrides.len()
        );

        // Removed slots in the base are historical entries being phased out;
        // they contribute nothing and suppress nothing.
        let mut acc: Vec<T> = self
            .base
            .slots()
            .iter()
            .filter(|s| !s.removed)
            .map(|s| s.value.clone())
            .collect();

        for layer in &self.overrides[..depth] {
            for slot in layer.slots() {
                if slot.removed {
                    if let Some(pos) = acc.iter().position(|v| *v == slot.value) {
                        acc.remove(pos);
                    }
                } else {
                    acc.push(slot.value.clone());
                }
            }
        }

        acc
    }
}

impl<T: Clone + PartialEq> Default for LayeredList<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn check_depth(depth: usize, len: usize) -> Result<()> {
    if depth == 0 {
        return Err(LayerError::BaseLayer);
    }
    if depth > len {
        return Err(LayerError::DepthOutOfRange { depth, len });
    }
    Ok(())
}
