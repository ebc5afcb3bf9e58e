//! Mutation facades bound to the one layer the caller owns.
//!
//! Every operation edits that layer only, then re-runs the classifier and
//! returns the resulting status. No operation partially applies: a key whose
//! storage is malformed is left untouched and reported `Invalid`.

use crate::classify::{classify, elements};
use crate::status::ElementStatus;
use strata_core::{Entry, LayeredList, LayeredMap, Resolution, Result, Slot};

/// Editor for one override layer of a [`LayeredMap`].
///
/// Constructed through [`MapEditorExt::edit`] / [`MapEditorExt::try_edit`];
/// the depth is validated once at construction and holds for the editor's
/// lifetime.
pub struct MapEditor<'a, K, V> {
    map: &'a mut LayeredMap<K, V>,
    depth: usize,
}

/// Entry points that open a [`MapEditor`] on a stack.
pub trait MapEditorExt<K, V> {
    /// Open an editor on the layer at `depth` (1-based).
    ///
    /// # Panics
    ///
    /// Panics if `depth` is 0 or past the stack.
    fn edit(&mut self, depth: usize) -> MapEditor<'_, K, V>;

    /// Non-panicking variant of [`MapEditorExt::edit`].
    fn try_edit(&mut self, depth: usize) -> Result<MapEditor<'_, K, V>>;

    /// Open an editor on the deepest layer.
    ///
    /// # Panics
    ///
    /// Panics if the stack has no override layers.
    fn edit_current(&mut self) -> MapEditor<'_, K, V>;
}

impl<K: Ord + Clone, V: Clone + PartialEq> MapEditorExt<K, V> for LayeredMap<K, V> {
    fn edit(&mut self, depth: usize) -> MapEditor<'_, K, V> {
        self.try_edit(depth).unwrap_or_else(|e| panic!("{e}"))
    }

    fn try_edit(&mut self, depth: usize) -> Result<MapEditor<'_, K, V>> {
        self.try_layer(depth)?;
        Ok(MapEditor { map: self, depth })
    }

    fn edit_current(&mut self) -> MapEditor<'_, K, V> {
        self.edit(self.depth())
    }
}

impl<K: Ord + Clone, V: Clone + PartialEq> MapEditor<'_, K, V> {
    /// The depth this editor is bound to.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Where `key` stands at the edited layer.
    pub fn status(&self, key: &K) -> ElementStatus {
        classify(self.map, key, self.depth)
    }

    /// The effective collection through the edited layer.
    pub fn resolve(&self) -> Resolution<K, V> {
        self.map.resolve_through(self.depth)
    }

    /// The effective collection the edited layer inherits.
    pub fn resolve_parent(&self) -> Resolution<K, V> {
        self.map.resolve_through(self.depth - 1)
    }

    /// Every key known anywhere in the stack, tagged with its status here.
    pub fn elements(&self) -> Vec<(K, ElementStatus)> {
        elements(self.map, self.depth)
    }

    /// Dispatch to [`MapEditor::ensure_added`] or
    /// [`MapEditor::ensure_removed`].
    pub fn set_existence(&mut self, key: K, value: V, present: bool) -> ElementStatus {
        if present {
            self.ensure_added(key, value)
        } else {
            self.ensure_removed(&key)
        }
    }

    /// Idempotent add: make `key` resolve present with the least storage.
    ///
    /// Clears any local removal marker. Records an addition only when
    /// nothing upstream provides the key; existing local additions have
    /// their value updated in place - all of them, so a doubly-asserted key
    /// stays doubly asserted but never ends up with conflicting values.
    /// Re-adding what an ancestor removed records a fresh local addition -
    /// the ancestor's marker cannot be undone from here, only shadowed.
    pub fn ensure_added(&mut self, key: K, value: V) -> ElementStatus {
        if self.status(&key) == ElementStatus::Invalid {
            return ElementStatus::Invalid;
        }

        let present_upstream = self.resolve_parent().contains_key(&key);
        let layer = self.map.layer_mut(self.depth);
        layer.retain_removals(|k| *k != key);

        if layer.set_addition_value(&key, &value) == 0 && !present_upstream {
            layer.push_addition(Entry::new(key.clone(), value));
        }

        self.status(&key)
    }

    /// Unconditional add: append a local addition even when the key already
    /// resolves present. This is the "force another copy" operation that
    /// turns `Natural` into `AddedTwice`.
    pub fn add(&mut self, key: K, value: V) -> ElementStatus {
        if self.status(&key) == ElementStatus::Invalid {
            return ElementStatus::Invalid;
        }

        let layer = self.map.layer_mut(self.depth);
        layer.retain_removals(|k| *k != key);
        layer.push_addition(Entry::new(key.clone(), value));

        self.status(&key)
    }

    /// Idempotent remove: make `key` resolve absent with the least storage.
    ///
    /// Clears local additions; records a removal marker only when the key is
    /// actually present upstream. A purely local addition is fully
    /// retracted, leaving no trace.
    pub fn ensure_removed(&mut self, key: &K) -> ElementStatus {
        if self.status(key) == ElementStatus::Invalid {
            return ElementStatus::Invalid;
        }

        let present_upstream = self.resolve_parent().contains_key(key);
        let layer = self.map.layer_mut(self.depth);
        layer.retain_additions(|e| e.key != *key);

        if present_upstream && layer.removal_count(key) == 0 {
            layer.push_removal(key.clone());
        }

        self.status(key)
    }

    /// Explicit remove: like [`MapEditor::ensure_removed`], but always
    /// records the removal marker. On a key nothing upstream provides this
    /// stores an explicit "I decided this is absent" record, landing on
    /// `FakeRemoved` instead of a bare `NewSlot`.
    pub fn remove(&mut self, key: &K) -> ElementStatus {
        if self.status(key) == ElementStatus::Invalid {
            return ElementStatus::Invalid;
        }

        let layer = self.map.layer_mut(self.depth);
        layer.retain_additions(|e| e.key != *key);
        if layer.removal_count(key) == 0 {
            layer.push_removal(key.clone());
        }

        self.status(key)
    }

    /// Discard the edited layer's own content entirely; it contributes
    /// nothing afterwards.
    pub fn clear(&mut self) {
        self.map.layer_mut(self.depth).clear();
    }
}

impl<K: Ord + Clone> MapEditor<'_, K, ()> {
    /// Set-flavor convenience for [`MapEditor::ensure_added`].
    pub fn ensure_present(&mut self, key: K) -> ElementStatus {
        self.ensure_added(key, ())
    }

    /// Set-flavor convenience for [`MapEditor::add`].
    pub fn insert(&mut self, key: K) -> ElementStatus {
        self.add(key, ())
    }
}

/// Editor for one override layer of a [`LayeredList`].
pub struct ListEditor<'a, T> {
    list: &'a mut LayeredList<T>,
    depth: usize,
}

/// Entry points that open a [`ListEditor`] on a stack.
pub trait ListEditorExt<T> {
    /// Open an editor on the layer at `depth` (1-based).
    ///
    /// # Panics
    ///
    /// Panics if `depth` is 0 or past the stack.
    fn edit(&mut self, depth: usize) -> ListEditor<'_, T>;

    /// Non-panicking variant of [`ListEditorExt::edit`].
    fn try_edit(&mut self, depth: usize) -> Result<ListEditor<'_, T>>;
}

impl<T: Clone + PartialEq> ListEditorExt<T> for LayeredList<T> {
    fn edit(&mut self, depth: usize) -> ListEditor<'_, T> {
        self.try_edit(depth).unwrap_or_else(|e| panic!("{e}"))
    }

    fn try_edit(&mut self, depth: usize) -> Result<ListEditor<'_, T>> {
        self.try_layer(depth)?;
        Ok(ListEditor { list: self, depth })
    }
}

impl<T: Clone + PartialEq> ListEditor<'_, T> {
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The effective sequence through the edited layer.
    pub fn resolve(&self) -> Vec<T> {
        self.list.resolve_through(self.depth)
    }

    /// Append `value` at the end of the effective sequence.
    pub fn push(&mut self, value: T) {
        self.list.layer_mut(self.depth).push(Slot::live(value));
    }

    /// Remove one occurrence of `value` as seen from the edited layer.
    ///
    /// A locally appended slot is retracted outright (the minimal diff);
    /// otherwise, if the value resolves present, a removal slot is recorded
    /// against the inherited occurrence. Returns whether anything changed.
    pub fn remove(&mut self, value: &T) -> bool {
        let layer = self.list.layer_mut(self.depth);
        if let Some(pos) = layer
            .slots()
            .iter()
            .position(|s| !s.removed && s.value == *value)
        {
            layer.remove_slot(pos);
            return true;
        }

        if self.resolve().contains(value) {
            self.list
                .layer_mut(self.depth)
                .push(Slot::removal(value.clone()));
            return true;
        }

        false
    }

    /// Discard the edited layer's own content entirely.
    pub fn clear(&mut self) {
        self.list.layer_mut(self.depth).clear();
    }
}
