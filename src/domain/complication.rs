use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{
    Entity, EntityId, EntityState, NoSubaction, RelationKind, Validate, ValidationError,
    Validator,
};

use super::{MAX_NAME_LEN, MAX_OBSERVATION_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ComplicationRelation {
    Grossesse,
    Accouchement,
    Naissance,
}

impl RelationKind for ComplicationRelation {
    const ALL: &'static [Self] = &[
        ComplicationRelation::Grossesse,
        ComplicationRelation::Accouchement,
        ComplicationRelation::Naissance,
    ];

    fn path_segment(self) -> &'static str {
        match self {
            ComplicationRelation::Grossesse => "grossesse",
            ComplicationRelation::Accouchement => "accouchement",
            ComplicationRelation::Naissance => "naissance",
        }
    }
}

/// The single record a complication is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplicationParent {
    Grossesse(EntityId),
    Accouchement(EntityId),
    Naissance(EntityId),
}

impl ComplicationParent {
    pub fn relation(&self) -> ComplicationRelation {
        match self {
            ComplicationParent::Grossesse(_) => ComplicationRelation::Grossesse,
            ComplicationParent::Accouchement(_) => ComplicationRelation::Accouchement,
            ComplicationParent::Naissance(_) => ComplicationRelation::Naissance,
        }
    }

    pub fn id(&self) -> &EntityId {
        match self {
            ComplicationParent::Grossesse(id)
            | ComplicationParent::Accouchement(id)
            | ComplicationParent::Naissance(id) => id,
        }
    }

    /// Fold the three nullable wire fields into at most one parent.
    fn from_wire(
        grossesse_id: Option<EntityId>,
        accouchement_id: Option<EntityId>,
        naissance_id: Option<EntityId>,
    ) -> Result<Option<Self>, String> {
        match (grossesse_id, accouchement_id, naissance_id) {
            (None, None, None) => Ok(None),
            (Some(id), None, None) => Ok(Some(ComplicationParent::Grossesse(id))),
            (None, Some(id), None) => Ok(Some(ComplicationParent::Accouchement(id))),
            (None, None, Some(id)) => Ok(Some(ComplicationParent::Naissance(id))),
            _ => Err("complication references more than one parent".to_string()),
        }
    }

    fn to_wire(parent: Option<&Self>) -> [Option<EntityId>; 3] {
        let mut fields = [None, None, None];
        if let Some(parent) = parent {
            let slot = match parent.relation() {
                ComplicationRelation::Grossesse => 0,
                ComplicationRelation::Accouchement => 1,
                ComplicationRelation::Naissance => 2,
            };
            fields[slot] = Some(parent.id().clone());
        }
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ComplicationWire", into = "ComplicationWire")]
pub struct Complication {
    pub id: EntityId,
    pub nature: String,
    pub date: DateTime<Utc>,
    pub lieu: String,
    pub observation: String,
    pub parent: Option<ComplicationParent>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComplicationWire {
    id: EntityId,
    nature: String,
    date: DateTime<Utc>,
    #[serde(default)]
    lieu: String,
    #[serde(default)]
    observation: String,
    #[serde(default, deserialize_with = "EntityId::deserialize_optional")]
    grossesse_id: Option<EntityId>,
    #[serde(default, deserialize_with = "EntityId::deserialize_optional")]
    accouchement_id: Option<EntityId>,
    #[serde(default, deserialize_with = "EntityId::deserialize_optional")]
    naissance_id: Option<EntityId>,
}

impl TryFrom<ComplicationWire> for Complication {
    type Error = String;

    fn try_from(wire: ComplicationWire) -> Result<Self, Self::Error> {
        let parent =
            ComplicationParent::from_wire(wire.grossesse_id, wire.accouchement_id, wire.naissance_id)?;
        Ok(Self {
            id: wire.id,
            nature: wire.nature,
            date: wire.date,
            lieu: wire.lieu,
            observation: wire.observation,
            parent,
        })
    }
}

impl From<Complication> for ComplicationWire {
    fn from(complication: Complication) -> Self {
        let [grossesse_id, accouchement_id, naissance_id] =
            ComplicationParent::to_wire(complication.parent.as_ref());
        Self {
            id: complication.id,
            nature: complication.nature,
            date: complication.date,
            lieu: complication.lieu,
            observation: complication.observation,
            grossesse_id,
            accouchement_id,
            naissance_id,
        }
    }
}

/// Writable fields of a complication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ComplicationRequestWire", into = "ComplicationRequestWire")]
pub struct ComplicationRequest {
    pub nature: String,
    pub date: DateTime<Utc>,
    pub lieu: String,
    pub observation: String,
    pub parent: Option<ComplicationParent>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComplicationRequestWire {
    nature: String,
    date: DateTime<Utc>,
    #[serde(default)]
    lieu: String,
    #[serde(default)]
    observation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "EntityId::deserialize_optional")]
    grossesse_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "EntityId::deserialize_optional")]
    accouchement_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "EntityId::deserialize_optional")]
    naissance_id: Option<EntityId>,
}

impl From<ComplicationRequest> for ComplicationRequestWire {
    fn from(request: ComplicationRequest) -> Self {
        let [grossesse_id, accouchement_id, naissance_id] =
            ComplicationParent::to_wire(request.parent.as_ref());
        Self {
            nature: request.nature,
            date: request.date,
            lieu: request.lieu,
            observation: request.observation,
            grossesse_id,
            accouchement_id,
            naissance_id,
        }
    }
}

impl TryFrom<ComplicationRequestWire> for ComplicationRequest {
    type Error = String;

    fn try_from(wire: ComplicationRequestWire) -> Result<Self, Self::Error> {
        let parent =
            ComplicationParent::from_wire(wire.grossesse_id, wire.accouchement_id, wire.naissance_id)?;
        Ok(Self {
            nature: wire.nature,
            date: wire.date,
            lieu: wire.lieu,
            observation: wire.observation,
            parent,
        })
    }
}

impl Validate for ComplicationRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Validator::new()
            .required("nature", &self.nature)
            .max_length("nature", &self.nature, MAX_NAME_LEN)
            .max_length("lieu", &self.lieu, MAX_NAME_LEN)
            .max_length("observation", &self.observation, MAX_OBSERVATION_LEN)
            .finish()
    }
}

impl Entity for Complication {
    type Relation = ComplicationRelation;
    type Payload = ComplicationRequest;
    type Subaction = NoSubaction;

    const RESOURCE: &'static str = "complications";
    const LABEL: &'static str = "Complication";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn parents(&self) -> Vec<(ComplicationRelation, &EntityId)> {
        self.parent
            .iter()
            .map(|parent| (parent.relation(), parent.id()))
            .collect()
    }

    fn label(&self) -> Option<&str> {
        Some(&self.nature)
    }

    fn date(&self) -> Option<DateTime<Utc>> {
        Some(self.date)
    }
}

impl EntityState<Complication> {
    pub fn by_nature(&self) -> BTreeMap<String, Vec<&Complication>> {
        self.group_by(|c| c.nature.clone())
    }
}
