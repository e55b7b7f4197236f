//! Action catalog for an entity slice.

use crate::mvi::Action;

use super::state::Filters;
use super::{Entity, EntityId, Validate, ValidationError};

/// Every state transition of an entity slice.
///
/// Asynchronous triggers come with a `*Success` and a `*Failure` variant;
/// only the effect handler produces those.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityAction<E: Entity> {
    /// `GET /{entity}/{id}`
    Load { id: EntityId },
    LoadSuccess { item: E },
    LoadFailure { error: String },

    /// `GET /{entity}`
    LoadAll,
    LoadAllSuccess { items: Vec<E> },
    LoadAllFailure { error: String },

    /// `GET /{entity}/{kind}/{parentId}`
    LoadByParent {
        relation: E::Relation,
        parent_id: EntityId,
    },
    LoadByParentSuccess {
        relation: E::Relation,
        items: Vec<E>,
    },
    LoadByParentFailure {
        relation: E::Relation,
        error: String,
    },

    /// `POST /{entity}`
    Create { payload: E::Payload },
    CreateSuccess { item: E },
    CreateFailure { error: String },

    /// `PUT /{entity}/{id}`
    Update { id: EntityId, payload: E::Payload },
    UpdateSuccess { item: E },
    UpdateFailure { error: String },

    /// `PATCH /{entity}/{id}/{subaction}`
    Patch {
        id: EntityId,
        subaction: E::Subaction,
    },
    PatchSuccess { item: E },
    PatchFailure { error: String },

    /// `DELETE /{entity}/{id}`
    Delete { id: EntityId },
    DeleteSuccess { id: EntityId },
    DeleteFailure { error: String },

    /// Designate the current record, or clear it with `None`.
    Select { id: Option<EntityId> },

    SetFilters { filters: Filters<E::Relation> },
    ClearFilters,
    SetPage { page: usize },
    SetPageSize { page_size: usize },

    /// Return the slice to its baseline.
    Reset,
}

impl<E: Entity> EntityAction<E> {
    pub fn load(id: &str) -> Result<Self, ValidationError> {
        Ok(Self::Load {
            id: EntityId::parse(id)?,
        })
    }

    pub fn load_by_parent(relation: E::Relation, parent_id: &str) -> Result<Self, ValidationError> {
        Ok(Self::LoadByParent {
            relation,
            parent_id: EntityId::parse_field("parentId", parent_id)?,
        })
    }

    pub fn create(payload: E::Payload) -> Result<Self, ValidationError> {
        payload.validate()?;
        Ok(Self::Create { payload })
    }

    pub fn update(id: &str, payload: E::Payload) -> Result<Self, ValidationError> {
        let id = EntityId::parse(id)?;
        payload.validate()?;
        Ok(Self::Update { id, payload })
    }

    pub fn patch(id: &str, subaction: E::Subaction) -> Result<Self, ValidationError> {
        Ok(Self::Patch {
            id: EntityId::parse(id)?,
            subaction,
        })
    }

    pub fn delete(id: &str) -> Result<Self, ValidationError> {
        Ok(Self::Delete {
            id: EntityId::parse(id)?,
        })
    }

    /// A blank id clears the selection.
    pub fn select(id: Option<&str>) -> Self {
        Self::Select {
            id: id.and_then(|id| EntityId::parse(id).ok()),
        }
    }
}

impl<E: Entity> Action for EntityAction<E> {
    fn name(&self) -> &'static str {
        match self {
            Self::Load { .. } => "load",
            Self::LoadSuccess { .. } => "load_success",
            Self::LoadFailure { .. } => "load_failure",
            Self::LoadAll => "load_all",
            Self::LoadAllSuccess { .. } => "load_all_success",
            Self::LoadAllFailure { .. } => "load_all_failure",
            Self::LoadByParent { .. } => "load_by_parent",
            Self::LoadByParentSuccess { .. } => "load_by_parent_success",
            Self::LoadByParentFailure { .. } => "load_by_parent_failure",
            Self::Create { .. } => "create",
            Self::CreateSuccess { .. } => "create_success",
            Self::CreateFailure { .. } => "create_failure",
            Self::Update { .. } => "update",
            Self::UpdateSuccess { .. } => "update_success",
            Self::UpdateFailure { .. } => "update_failure",
            Self::Patch { .. } => "patch",
            Self::PatchSuccess { .. } => "patch_success",
            Self::PatchFailure { .. } => "patch_failure",
            Self::Delete { .. } => "delete",
            Self::DeleteSuccess { .. } => "delete_success",
            Self::DeleteFailure { .. } => "delete_failure",
            Self::Select { .. } => "select",
            Self::SetFilters { .. } => "set_filters",
            Self::ClearFilters => "clear_filters",
            Self::SetPage { .. } => "set_page",
            Self::SetPageSize { .. } => "set_page_size",
            Self::Reset => "reset",
        }
    }

    fn is_trigger(&self) -> bool {
        matches!(
            self,
            Self::Load { .. }
                | Self::LoadAll
                | Self::LoadByParent { .. }
                | Self::Create { .. }
                | Self::Update { .. }
                | Self::Patch { .. }
                | Self::Delete { .. }
        )
    }
}
