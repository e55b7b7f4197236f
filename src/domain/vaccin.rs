use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{
    Entity, EntityId, EntityState, RelationKind, Subaction, Validate, ValidationError, Validator,
};

use super::MAX_NAME_LEN;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vaccin {
    pub id: EntityId,
    pub nom: String,
    pub date: DateTime<Utc>,
    #[serde(default, deserialize_with = "EntityId::deserialize_optional")]
    pub patiente_id: Option<EntityId>,
    #[serde(default, deserialize_with = "EntityId::deserialize_optional")]
    pub naissance_id: Option<EntityId>,
    #[serde(default)]
    pub administre: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VaccinRelation {
    Patiente,
    Naissance,
}

impl RelationKind for VaccinRelation {
    const ALL: &'static [Self] = &[VaccinRelation::Patiente, VaccinRelation::Naissance];

    fn path_segment(self) -> &'static str {
        match self {
            VaccinRelation::Patiente => "patiente",
            VaccinRelation::Naissance => "naissance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaccinSubaction {
    /// Mark the dose as administered.
    Administrer,
}

impl Subaction for VaccinSubaction {
    const ALL: &'static [Self] = &[VaccinSubaction::Administrer];

    fn path_segment(self) -> &'static str {
        match self {
            VaccinSubaction::Administrer => "administrer",
        }
    }
}

/// Writable fields of a vaccin. Unset targets are sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccinRequest {
    pub nom: String,
    pub date: DateTime<Utc>,
    #[serde(default, deserialize_with = "EntityId::deserialize_optional")]
    pub patiente_id: Option<EntityId>,
    #[serde(default, deserialize_with = "EntityId::deserialize_optional")]
    pub naissance_id: Option<EntityId>,
}

impl Validate for VaccinRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Validator::new()
            .required("nom", &self.nom)
            .max_length("nom", &self.nom, MAX_NAME_LEN)
            .finish()
    }
}

impl Entity for Vaccin {
    type Relation = VaccinRelation;
    type Payload = VaccinRequest;
    type Subaction = VaccinSubaction;

    const RESOURCE: &'static str = "vaccins";
    const LABEL: &'static str = "Vaccin";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn parents(&self) -> Vec<(VaccinRelation, &EntityId)> {
        let patiente = self
            .patiente_id
            .as_ref()
            .map(|id| (VaccinRelation::Patiente, id));
        let naissance = self
            .naissance_id
            .as_ref()
            .map(|id| (VaccinRelation::Naissance, id));
        patiente.into_iter().chain(naissance).collect()
    }

    fn label(&self) -> Option<&str> {
        Some(&self.nom)
    }

    fn date(&self) -> Option<DateTime<Utc>> {
        Some(self.date)
    }
}

impl EntityState<Vaccin> {
    pub fn administered(&self) -> Vec<&Vaccin> {
        self.items.iter().filter(|v| v.administre).collect()
    }

    pub fn pending(&self) -> Vec<&Vaccin> {
        self.items.iter().filter(|v| !v.administre).collect()
    }

    /// Pending doses whose scheduled date is before `at`.
    pub fn overdue(&self, at: DateTime<Utc>) -> Vec<&Vaccin> {
        self.items
            .iter()
            .filter(|v| !v.administre && v.date < at)
            .collect()
    }

    pub fn by_nom(&self) -> BTreeMap<String, Vec<&Vaccin>> {
        self.group_by(|v| v.nom.clone())
    }
}
