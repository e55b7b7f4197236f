//! Generic entity state slice.
//!
//! Every domain record type (grossesse, accouchement, naissance,
//! complication, vaccin) is held in the same slice shape:
//!
//! - [`EntityAction`]: trigger, success and failure actions
//! - [`EntityReducer`]: pure state transitions over [`EntityState`]
//! - [`EntityEffects`]: gateway calls that answer triggers
//! - selectors: read-only views implemented on [`EntityState`]

mod action;
mod effects;
mod id;
mod reducer;
mod selectors;
mod state;
mod validation;

use std::fmt::Debug;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use action::EntityAction;
pub use effects::{EntityEffects, Operation};
pub use id::EntityId;
pub use reducer::EntityReducer;
pub use state::{EntityState, Filters, LoadedParent, Pagination, DEFAULT_PAGE_SIZE};
pub use validation::{FieldError, FieldErrorKind, Validate, ValidationError, Validator};

/// Closed set of parent contexts a record can be loaded under.
pub trait RelationKind:
    Copy + Eq + Ord + Hash + Debug + Serialize + Send + Sync + 'static
{
    const ALL: &'static [Self];

    /// Path segment used in `GET /{entity}/{kind}/{parentId}`.
    fn path_segment(self) -> &'static str;

    fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.path_segment() == segment)
    }
}

/// `PATCH /{entity}/{id}/{subaction}` toggles.
pub trait Subaction: Copy + Eq + Debug + Send + Sync + 'static {
    const ALL: &'static [Self];

    fn path_segment(self) -> &'static str;

    fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|subaction| subaction.path_segment() == segment)
    }
}

/// For entities the backend exposes no PATCH endpoint for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoSubaction {}

impl Subaction for NoSubaction {
    const ALL: &'static [Self] = &[];

    fn path_segment(self) -> &'static str {
        match self {}
    }
}

/// A backend record held in an entity slice.
pub trait Entity:
    Clone + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Relation: RelationKind;
    type Payload: Validate
        + Clone
        + PartialEq
        + Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;
    type Subaction: Subaction;

    /// Collection path segment, e.g. `complications`.
    const RESOURCE: &'static str;
    /// Human-readable name used in notifications.
    const LABEL: &'static str;

    fn id(&self) -> &EntityId;

    /// Parent references populated on this record.
    fn parents(&self) -> Vec<(Self::Relation, &EntityId)>;

    /// Text matched by the search filter.
    fn label(&self) -> Option<&str> {
        None
    }

    /// Date matched by the date-range filter.
    fn date(&self) -> Option<DateTime<Utc>> {
        None
    }
}
