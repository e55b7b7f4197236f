use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::mvi::SliceState;

use super::{Entity, EntityId};

/// Page size applied until a `SetPageSize` action says otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Parent context of the last parent-scoped load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedParent<R> {
    pub relation: R,
    pub parent_id: EntityId,
}

/// Last-applied query parameters.
///
/// `loaded_parent` is recorded by parent-scoped loads for inspection and is
/// never applied by [`Filters::matches`]. The remaining fields are the
/// client-side query set through `SetFilters` and are never re-sent to the
/// backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters<R> {
    pub loaded_parent: Option<LoadedParent<R>>,
    pub relation: Option<R>,
    pub parent_id: Option<EntityId>,
    pub search: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

impl<R> Default for Filters<R> {
    fn default() -> Self {
        Self {
            loaded_parent: None,
            relation: None,
            parent_id: None,
            search: None,
            date_from: None,
            date_to: None,
        }
    }
}

impl<R: Copy + Eq> Filters<R> {
    /// Whether `item` passes every client-side filter that is set.
    pub fn matches<E: Entity<Relation = R>>(&self, item: &E) -> bool {
        if let (Some(relation), Some(parent_id)) = (self.relation, &self.parent_id) {
            let linked = item
                .parents()
                .into_iter()
                .any(|(kind, id)| kind == relation && id == parent_id);
            if !linked {
                return false;
            }
        }

        if let Some(needle) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = needle.to_lowercase();
            match item.label() {
                Some(label) if label.to_lowercase().contains(&needle) => {}
                _ => return false,
            }
        }

        if self.date_from.is_some() || self.date_to.is_some() {
            let Some(date) = item.date() else {
                return false;
            };
            if self.date_from.is_some_and(|from| date < from) {
                return false;
            }
            if self.date_to.is_some_and(|to| date > to) {
                return false;
            }
        }

        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Zero-based page index.
    pub page: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// State of one entity slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityState<E: Entity> {
    /// Canonical collection, unique by id.
    pub items: Vec<E>,
    /// Records of the last parent-scoped load, one bucket per relation kind.
    pub items_by_parent: BTreeMap<E::Relation, Vec<E>>,
    pub selected_item: Option<E>,
    pub selected_item_id: Option<EntityId>,
    /// True while a request is in flight. Shared by all requests of the slice.
    pub loading: bool,
    pub error: Option<String>,
    pub filters: Filters<E::Relation>,
    pub pagination: Pagination,
}

impl<E: Entity> Default for EntityState<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            items_by_parent: BTreeMap::new(),
            selected_item: None,
            selected_item_id: None,
            loading: false,
            error: None,
            filters: Filters::default(),
            pagination: Pagination::default(),
        }
    }
}

impl<E: Entity> SliceState for EntityState<E> {}
