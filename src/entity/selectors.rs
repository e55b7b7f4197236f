//! Read-only views over an entity slice.
//!
//! Selectors borrow from the state they are called on, so repeated calls on
//! an unchanged snapshot return the same records.

use std::collections::BTreeMap;

use super::state::{EntityState, Filters};
use super::{Entity, EntityId};

impl<E: Entity> EntityState<E> {
    pub fn all(&self) -> &[E] {
        &self.items
    }

    pub fn by_id(&self, id: &str) -> Option<&E> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Records of the last load scoped to `relation`; empty if never loaded.
    pub fn by_parent(&self, relation: E::Relation) -> &[E] {
        self.items_by_parent
            .get(&relation)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Records in `items` linked to the given parent, whatever bucket they came from.
    pub fn linked_to(&self, relation: E::Relation, parent_id: &EntityId) -> Vec<&E> {
        self.items
            .iter()
            .filter(|item| {
                item.parents()
                    .into_iter()
                    .any(|(kind, id)| kind == relation && id == parent_id)
            })
            .collect()
    }

    pub fn selected(&self) -> Option<&E> {
        self.selected_item.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filters(&self) -> &Filters<E::Relation> {
        &self.filters
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn count_by_parent(&self, relation: E::Relation) -> usize {
        self.by_parent(relation).len()
    }

    pub fn count_where(&self, predicate: impl Fn(&E) -> bool) -> usize {
        self.items.iter().filter(|item| predicate(item)).count()
    }

    /// Confirmed empty: nothing loaded and no request pending.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && !self.loading
    }

    pub fn has_data(&self) -> bool {
        !self.items.is_empty()
    }

    /// Partition `items` by a key, keeping each group in collection order.
    pub fn group_by<K: Ord>(&self, key: impl Fn(&E) -> K) -> BTreeMap<K, Vec<&E>> {
        let mut groups: BTreeMap<K, Vec<&E>> = BTreeMap::new();
        for item in &self.items {
            groups.entry(key(item)).or_default().push(item);
        }
        groups
    }

    /// `items` that pass the current filters.
    pub fn filtered(&self) -> Vec<&E> {
        self.items
            .iter()
            .filter(|item| self.filters.matches(*item))
            .collect()
    }

    /// The current page of [`EntityState::filtered`].
    pub fn page(&self) -> Vec<&E> {
        let size = self.pagination.page_size.max(1);
        self.filtered()
            .into_iter()
            .skip(self.pagination.page.saturating_mul(size))
            .take(size)
            .collect()
    }

    pub fn page_count(&self) -> usize {
        let size = self.pagination.page_size.max(1);
        self.filtered().len().div_ceil(size)
    }
}
