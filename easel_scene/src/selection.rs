// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::ObjectId;

/// Selection bookkeeping for a scene: the set of selected ids, a primary id,
/// and a revision counter.
///
/// The container only tracks *which* objects are selected; gesture mapping
/// (click, toggle, lasso) happens in higher layers. Keys are stored in a
/// small `Vec` with uniqueness enforced by equality, so no ordering or
/// hashing constraints are imposed on the id type.
///
/// - **Primary**: the most recently interacted-with id. Commands like "edit
///   text" act on it.
/// - **Revision**: a monotonically increasing counter bumped only when a
///   mutation actually changes the selection. Observers can use it as a
///   cheap "did anything change?" marker without comparing contents.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    items: Vec<ObjectId>,
    primary: Option<usize>,
    revision: u64,
}

impl Selection {
    /// Creates an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            primary: None,
            revision: 0,
        }
    }

    /// Returns `true` if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns all selected ids in their internal order.
    #[must_use]
    pub fn items(&self) -> &[ObjectId] {
        &self.items
    }

    /// Returns an iterator over the selected ids.
    pub fn iter(&self) -> core::slice::Iter<'_, ObjectId> {
        self.items.iter()
    }

    /// Returns the primary id, if any.
    #[must_use]
    pub fn primary(&self) -> Option<ObjectId> {
        self.primary.map(|idx| self.items[idx])
    }

    /// Returns the current revision counter.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns `true` if `id` is currently selected.
    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.items.contains(&id)
    }

    /// Removes all ids from the selection.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.items.clear();
        self.primary = None;
        self.bump_revision();
    }

    /// Replaces the selection with a single id, which becomes primary.
    ///
    /// The typical mapping for a plain click or a freshly added object.
    pub fn select_only(&mut self, id: ObjectId) {
        if self.items.len() == 1 && self.items[0] == id && self.primary == Some(0) {
            return;
        }
        self.items.clear();
        self.items.push(id);
        self.primary = Some(0);
        self.bump_revision();
    }

    /// Replaces the selection with a batch of ids.
    ///
    /// Duplicates in the input are ignored. The first unique id becomes
    /// primary (if any ids are present).
    pub fn replace_with<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ObjectId>,
    {
        let mut new_items: Vec<ObjectId> = Vec::new();
        for id in ids {
            if !new_items.contains(&id) {
                new_items.push(id);
            }
        }
        if new_items == self.items {
            return;
        }
        self.primary = if new_items.is_empty() { None } else { Some(0) };
        self.items = new_items;
        self.bump_revision();
    }

    /// Toggles membership of `id`.
    ///
    /// A newly added id becomes primary; removing the primary id clears the
    /// primary role.
    pub fn toggle(&mut self, id: ObjectId) {
        if let Some(idx) = self.items.iter().position(|&item| item == id) {
            self.remove_at(idx);
        } else {
            self.items.push(id);
            self.primary = Some(self.items.len() - 1);
        }
        self.bump_revision();
    }

    /// Removes `id` from the selection if present.
    pub fn remove(&mut self, id: ObjectId) {
        if let Some(idx) = self.items.iter().position(|&item| item == id) {
            self.remove_at(idx);
            self.bump_revision();
        }
    }

    /// Keeps only ids for which `keep` returns `true`.
    ///
    /// Used by the scene store to drop ids whose objects were removed, so a
    /// selection can never reference a dead object.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(ObjectId) -> bool,
    {
        let primary_id = self.primary();
        let before = self.items.len();
        self.items.retain(|&id| keep(id));
        if self.items.len() == before {
            return;
        }
        self.primary = primary_id.and_then(|p| self.items.iter().position(|&id| id == p));
        self.bump_revision();
    }

    fn remove_at(&mut self, idx: usize) {
        self.items.remove(idx);
        match self.primary {
            Some(p) if p == idx => self.primary = None,
            Some(p) if p > idx => self.primary = Some(p - 1),
            _ => {}
        }
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
