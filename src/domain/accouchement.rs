use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{
    Entity, EntityId, EntityState, NoSubaction, RelationKind, Validate, ValidationError,
    Validator,
};

use super::{MAX_NAME_LEN, MAX_OBSERVATION_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModeAccouchement {
    VoieBasse,
    Instrumental,
    Cesarienne,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accouchement {
    pub id: EntityId,
    pub grossesse_id: EntityId,
    pub date: DateTime<Utc>,
    pub lieu: String,
    pub mode: ModeAccouchement,
    pub observations: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AccouchementRelation {
    Grossesse,
}

impl RelationKind for AccouchementRelation {
    const ALL: &'static [Self] = &[AccouchementRelation::Grossesse];

    fn path_segment(self) -> &'static str {
        match self {
            AccouchementRelation::Grossesse => "grossesse",
        }
    }
}

/// Writable fields of an accouchement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccouchementRequest {
    pub grossesse_id: EntityId,
    pub date: DateTime<Utc>,
    pub lieu: String,
    pub mode: ModeAccouchement,
    pub observations: Option<String>,
}

impl Validate for AccouchementRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut validator = Validator::new();
        validator
            .required("lieu", &self.lieu)
            .max_length("lieu", &self.lieu, MAX_NAME_LEN);
        if let Some(observations) = &self.observations {
            validator.max_length("observations", observations, MAX_OBSERVATION_LEN);
        }
        validator.finish()
    }
}

impl Entity for Accouchement {
    type Relation = AccouchementRelation;
    type Payload = AccouchementRequest;
    type Subaction = NoSubaction;

    const RESOURCE: &'static str = "accouchements";
    const LABEL: &'static str = "Accouchement";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn parents(&self) -> Vec<(AccouchementRelation, &EntityId)> {
        vec![(AccouchementRelation::Grossesse, &self.grossesse_id)]
    }

    fn label(&self) -> Option<&str> {
        Some(&self.lieu)
    }

    fn date(&self) -> Option<DateTime<Utc>> {
        Some(self.date)
    }
}

impl EntityState<Accouchement> {
    pub fn by_mode(&self) -> BTreeMap<ModeAccouchement, Vec<&Accouchement>> {
        self.group_by(|a| a.mode)
    }

    /// Share of loaded deliveries by caesarean section, `None` when nothing is loaded.
    pub fn taux_cesarienne(&self) -> Option<f64> {
        if self.items.is_empty() {
            return None;
        }
        let cesariennes = self.count_where(|a| a.mode == ModeAccouchement::Cesarienne);
        Some(cesariennes as f64 / self.items.len() as f64)
    }
}
