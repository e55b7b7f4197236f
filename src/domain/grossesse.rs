use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{
    Entity, EntityId, EntityState, RelationKind, Subaction, Validate, ValidationError, Validator,
};

use super::MAX_OBSERVATION_LEN;

/// Days from the first day of the last menstrual period to the due date.
pub const TERM_DAYS: i64 = 280;
/// Most fetuses accepted for a single pregnancy.
pub const MAX_FOETUS: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatutGrossesse {
    #[default]
    EnCours,
    Terminee,
    Interrompue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grossesse {
    pub id: EntityId,
    pub patiente_id: EntityId,
    /// First day of the last menstrual period.
    pub date_debut: DateTime<Utc>,
    pub date_terme_prevue: Option<DateTime<Utc>>,
    #[serde(default = "default_nombre_foetus")]
    pub nombre_foetus: u8,
    #[serde(default)]
    pub statut: StatutGrossesse,
    pub observations: Option<String>,
}

fn default_nombre_foetus() -> u8 {
    1
}

impl Grossesse {
    /// Expected due date: the recorded one, else LMP + 280 days.
    pub fn terme_prevu(&self) -> DateTime<Utc> {
        self.date_terme_prevue
            .unwrap_or_else(|| self.date_debut + Duration::days(TERM_DAYS))
    }

    /// Completed weeks of amenorrhea at `at`, or `None` before the start date.
    pub fn semaines_amenorrhee(&self, at: DateTime<Utc>) -> Option<i64> {
        let days = (at - self.date_debut).num_days();
        (days >= 0).then_some(days / 7)
    }

    pub fn is_multiple(&self) -> bool {
        self.nombre_foetus > 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GrossesseRelation {
    Patiente,
}

impl RelationKind for GrossesseRelation {
    const ALL: &'static [Self] = &[GrossesseRelation::Patiente];

    fn path_segment(self) -> &'static str {
        match self {
            GrossesseRelation::Patiente => "patiente",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrossesseSubaction {
    /// Close the pregnancy once delivered.
    Terminer,
}

impl Subaction for GrossesseSubaction {
    const ALL: &'static [Self] = &[GrossesseSubaction::Terminer];

    fn path_segment(self) -> &'static str {
        match self {
            GrossesseSubaction::Terminer => "terminer",
        }
    }
}

/// Writable fields of a grossesse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrossesseRequest {
    pub patiente_id: EntityId,
    pub date_debut: DateTime<Utc>,
    pub date_terme_prevue: Option<DateTime<Utc>>,
    #[serde(default = "default_nombre_foetus")]
    pub nombre_foetus: u8,
    #[serde(default)]
    pub statut: StatutGrossesse,
    pub observations: Option<String>,
}

impl Validate for GrossesseRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut validator = Validator::new();
        validator.range(
            "nombreFoetus",
            f64::from(self.nombre_foetus),
            1.0,
            f64::from(MAX_FOETUS),
        );
        if let Some(observations) = &self.observations {
            validator.max_length("observations", observations, MAX_OBSERVATION_LEN);
        }
        validator.conflict(
            "dateTermePrevue",
            "dateDebut",
            self.date_terme_prevue
                .is_some_and(|terme| terme <= self.date_debut),
        );
        validator.finish()
    }
}

impl Entity for Grossesse {
    type Relation = GrossesseRelation;
    type Payload = GrossesseRequest;
    type Subaction = GrossesseSubaction;

    const RESOURCE: &'static str = "grossesses";
    const LABEL: &'static str = "Grossesse";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn parents(&self) -> Vec<(GrossesseRelation, &EntityId)> {
        vec![(GrossesseRelation::Patiente, &self.patiente_id)]
    }

    fn date(&self) -> Option<DateTime<Utc>> {
        Some(self.date_debut)
    }
}

impl EntityState<Grossesse> {
    pub fn en_cours(&self) -> Vec<&Grossesse> {
        self.items
            .iter()
            .filter(|g| g.statut == StatutGrossesse::EnCours)
            .collect()
    }

    /// In-progress pregnancies whose due date falls before `at`.
    pub fn terme_depasse(&self, at: DateTime<Utc>) -> Vec<&Grossesse> {
        self.en_cours()
            .into_iter()
            .filter(|g| g.terme_prevu() < at)
            .collect()
    }
}
