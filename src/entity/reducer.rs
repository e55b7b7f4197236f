//! Reducer for entity slices.

use std::marker::PhantomData;

use crate::mvi::Reducer;

use super::action::EntityAction;
use super::state::{EntityState, Filters, LoadedParent};
use super::{Entity, EntityId};

/// Reducer for entity slice state transitions.
///
/// Pure function: gateway calls and notifications live in
/// [`super::EntityEffects`].
pub struct EntityReducer<E>(PhantomData<E>);

impl<E: Entity> Reducer for EntityReducer<E> {
    type State = EntityState<E>;
    type Action = EntityAction<E>;

    fn reduce(state: Self::State, action: Self::Action) -> Self::State {
        match action {
            EntityAction::Load { .. }
            | EntityAction::LoadAll
            | EntityAction::Create { .. }
            | EntityAction::Update { .. }
            | EntityAction::Patch { .. }
            | EntityAction::Delete { .. } => started(state),

            EntityAction::LoadByParent {
                relation,
                parent_id,
            } => {
                let mut state = started(state);
                state.filters.loaded_parent = Some(LoadedParent {
                    relation,
                    parent_id,
                });
                state
            }

            EntityAction::LoadSuccess { item } => {
                let mut state = succeeded(state);
                upsert(&mut state.items, item.clone());
                replace_in_buckets(&mut state, &item);
                state.selected_item_id = Some(item.id().clone());
                state.selected_item = Some(item);
                state
            }

            EntityAction::LoadAllSuccess { items } => {
                let mut state = succeeded(state);
                state.items = dedup(items);
                sync_buckets(&mut state);
                resync_selection(&mut state);
                state
            }

            EntityAction::LoadByParentSuccess { relation, items } => {
                // The general list is narrowed to the loaded parent context too.
                let mut state = succeeded(state);
                let items = dedup(items);
                state.items_by_parent.insert(relation, items.clone());
                state.items = items;
                sync_buckets(&mut state);
                resync_selection(&mut state);
                state
            }

            EntityAction::CreateSuccess { item } => {
                let mut state = succeeded(state);
                upsert(&mut state.items, item.clone());
                replace_in_buckets(&mut state, &item);
                state.selected_item_id = Some(item.id().clone());
                state.selected_item = Some(item);
                state
            }

            EntityAction::UpdateSuccess { item } | EntityAction::PatchSuccess { item } => {
                let mut state = succeeded(state);
                replace_everywhere(&mut state, item);
                state
            }

            EntityAction::DeleteSuccess { id } => {
                let mut state = succeeded(state);
                remove_everywhere(&mut state, &id);
                state
            }

            EntityAction::LoadFailure { error }
            | EntityAction::LoadAllFailure { error }
            | EntityAction::LoadByParentFailure { error, .. }
            | EntityAction::CreateFailure { error }
            | EntityAction::UpdateFailure { error }
            | EntityAction::PatchFailure { error }
            | EntityAction::DeleteFailure { error } => EntityState {
                loading: false,
                error: Some(error),
                ..state
            },

            EntityAction::Select { id } => {
                let selected_item = id
                    .as_ref()
                    .and_then(|id| state.items.iter().find(|item| item.id() == id).cloned());
                EntityState {
                    selected_item,
                    selected_item_id: id,
                    ..state
                }
            }

            EntityAction::SetFilters { filters } => {
                let loaded_parent = state.filters.loaded_parent.clone();
                let mut state = EntityState {
                    filters: Filters {
                        loaded_parent,
                        ..filters
                    },
                    ..state
                };
                state.pagination.page = 0;
                state
            }

            EntityAction::ClearFilters => {
                let loaded_parent = state.filters.loaded_parent.clone();
                let mut state = EntityState {
                    filters: Filters {
                        loaded_parent,
                        ..Filters::default()
                    },
                    ..state
                };
                state.pagination.page = 0;
                state
            }

            EntityAction::SetPage { page } => {
                let mut state = state;
                state.pagination.page = page;
                state
            }

            EntityAction::SetPageSize { page_size } => {
                let mut state = state;
                state.pagination.page_size = page_size.max(1);
                state.pagination.page = 0;
                state
            }

            EntityAction::Reset => EntityState::default(),
        }
    }
}

fn started<E: Entity>(state: EntityState<E>) -> EntityState<E> {
    EntityState {
        loading: true,
        error: None,
        ..state
    }
}

fn succeeded<E: Entity>(state: EntityState<E>) -> EntityState<E> {
    EntityState {
        loading: false,
        error: None,
        ..state
    }
}

/// Replace the record with the same id, or append it.
fn upsert<E: Entity>(items: &mut Vec<E>, item: E) {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

/// Keep the last occurrence of each id, in first-seen order.
fn dedup<E: Entity>(items: Vec<E>) -> Vec<E> {
    let mut unique: Vec<E> = Vec::with_capacity(items.len());
    for item in items {
        upsert(&mut unique, item);
    }
    unique
}

fn replace_in<E: Entity>(items: &mut [E], item: &E) {
    if let Some(existing) = items.iter_mut().find(|existing| existing.id() == item.id()) {
        *existing = item.clone();
    }
}

fn replace_in_buckets<E: Entity>(state: &mut EntityState<E>, item: &E) {
    for bucket in state.items_by_parent.values_mut() {
        replace_in(bucket, item);
    }
}

fn replace_everywhere<E: Entity>(state: &mut EntityState<E>, item: E) {
    replace_in(&mut state.items, &item);
    replace_in_buckets(state, &item);
    if state.selected_item_id.as_ref() == Some(item.id()) {
        state.selected_item = Some(item);
    }
}

/// Copy the canonical version of every bucketed record that is also in `items`.
fn sync_buckets<E: Entity>(state: &mut EntityState<E>) {
    let items = &state.items;
    for bucket in state.items_by_parent.values_mut() {
        for record in bucket.iter_mut() {
            if let Some(canonical) = items.iter().find(|item| item.id() == record.id()) {
                *record = canonical.clone();
            }
        }
    }
}

fn remove_everywhere<E: Entity>(state: &mut EntityState<E>, id: &EntityId) {
    state.items.retain(|item| item.id() != id);
    for bucket in state.items_by_parent.values_mut() {
        bucket.retain(|item| item.id() != id);
    }
    if state.selected_item_id.as_ref() == Some(id) {
        state.selected_item_id = None;
        state.selected_item = None;
    }
}

/// Re-resolve the selected record against a freshly loaded collection.
fn resync_selection<E: Entity>(state: &mut EntityState<E>) {
    if let Some(id) = &state.selected_item_id {
        state.selected_item = state.items.iter().find(|item| item.id() == id).cloned();
    }
}
