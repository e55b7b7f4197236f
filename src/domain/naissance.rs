use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{
    Entity, EntityId, EntityState, NoSubaction, RelationKind, Validate, ValidationError,
    Validator,
};

use super::MAX_NAME_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sexe {
    Masculin,
    Feminin,
    Indetermine,
}

/// WHO birth-weight categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BirthWeightBand {
    /// Below 1000 g.
    ExtremelyLow,
    /// 1000 g to 1499 g.
    VeryLow,
    /// 1500 g to 2499 g.
    Low,
    /// 2500 g to 3999 g.
    Normal,
    /// 4000 g and above.
    Macrosomia,
}

impl BirthWeightBand {
    pub fn from_grams(grams: u32) -> Self {
        match grams {
            0..=999 => BirthWeightBand::ExtremelyLow,
            1000..=1499 => BirthWeightBand::VeryLow,
            1500..=2499 => BirthWeightBand::Low,
            2500..=3999 => BirthWeightBand::Normal,
            _ => BirthWeightBand::Macrosomia,
        }
    }

    /// Below 2500 g.
    pub fn is_low(self) -> bool {
        matches!(
            self,
            BirthWeightBand::ExtremelyLow | BirthWeightBand::VeryLow | BirthWeightBand::Low
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApgarBand {
    /// 0 to 3.
    Low,
    /// 4 to 6.
    ModeratelyAbnormal,
    /// 7 to 10.
    Reassuring,
}

impl ApgarBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=3 => ApgarBand::Low,
            4..=6 => ApgarBand::ModeratelyAbnormal,
            _ => ApgarBand::Reassuring,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Naissance {
    pub id: EntityId,
    pub accouchement_id: EntityId,
    pub date_naissance: DateTime<Utc>,
    pub prenom: Option<String>,
    pub sexe: Sexe,
    /// Birth weight in grams.
    pub poids: u32,
    /// Length in centimetres.
    pub taille: Option<f32>,
    pub apgar1: Option<u8>,
    pub apgar5: Option<u8>,
}

impl Naissance {
    pub fn weight_band(&self) -> BirthWeightBand {
        BirthWeightBand::from_grams(self.poids)
    }

    /// Band of the five-minute score, the one used for follow-up.
    pub fn apgar_band(&self) -> Option<ApgarBand> {
        self.apgar5.map(ApgarBand::from_score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NaissanceRelation {
    Accouchement,
}

impl RelationKind for NaissanceRelation {
    const ALL: &'static [Self] = &[NaissanceRelation::Accouchement];

    fn path_segment(self) -> &'static str {
        match self {
            NaissanceRelation::Accouchement => "accouchement",
        }
    }
}

/// Writable fields of a naissance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NaissanceRequest {
    pub accouchement_id: EntityId,
    pub date_naissance: DateTime<Utc>,
    pub prenom: Option<String>,
    pub sexe: Sexe,
    pub poids: u32,
    pub taille: Option<f32>,
    pub apgar1: Option<u8>,
    pub apgar5: Option<u8>,
}

impl Validate for NaissanceRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut validator = Validator::new();
        validator.range("poids", f64::from(self.poids), 200.0, 7000.0);
        if let Some(prenom) = &self.prenom {
            validator.max_length("prenom", prenom, MAX_NAME_LEN);
        }
        if let Some(taille) = self.taille {
            validator.range("taille", f64::from(taille), 20.0, 70.0);
        }
        if let Some(score) = self.apgar1 {
            validator.range("apgar1", f64::from(score), 0.0, 10.0);
        }
        if let Some(score) = self.apgar5 {
            validator.range("apgar5", f64::from(score), 0.0, 10.0);
        }
        validator.finish()
    }
}

impl Entity for Naissance {
    type Relation = NaissanceRelation;
    type Payload = NaissanceRequest;
    type Subaction = NoSubaction;

    const RESOURCE: &'static str = "naissances";
    const LABEL: &'static str = "Naissance";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn parents(&self) -> Vec<(NaissanceRelation, &EntityId)> {
        vec![(NaissanceRelation::Accouchement, &self.accouchement_id)]
    }

    fn label(&self) -> Option<&str> {
        self.prenom.as_deref()
    }

    fn date(&self) -> Option<DateTime<Utc>> {
        Some(self.date_naissance)
    }
}

impl EntityState<Naissance> {
    pub fn by_weight_band(&self) -> BTreeMap<BirthWeightBand, Vec<&Naissance>> {
        self.group_by(Naissance::weight_band)
    }

    pub fn low_birth_weight_count(&self) -> usize {
        self.count_where(|n| n.weight_band().is_low())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naissance(id: &str, poids: u32) -> Naissance {
        Naissance {
            id: EntityId::parse(id).unwrap(),
            accouchement_id: EntityId::parse("a1").unwrap(),
            date_naissance: "2026-09-30T08:20:00Z".parse().unwrap(),
            prenom: Some("Inès".to_string()),
            sexe: Sexe::Feminin,
            poids,
            taille: Some(49.5),
            apgar1: Some(8),
            apgar5: Some(10),
        }
    }

    #[test]
    fn birth_date_travels_as_date_naissance() {
        let json = serde_json::to_value(naissance("n1", 3200)).unwrap();
        assert_eq!(json["dateNaissance"], "2026-09-30T08:20:00Z");
        assert!(json.get("date").is_none());

        let decoded: Naissance = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, naissance("n1", 3200));
    }

    #[test]
    fn weight_band_thresholds() {
        assert_eq!(BirthWeightBand::from_grams(999), BirthWeightBand::ExtremelyLow);
        assert_eq!(BirthWeightBand::from_grams(1000), BirthWeightBand::VeryLow);
        assert_eq!(BirthWeightBand::from_grams(1499), BirthWeightBand::VeryLow);
        assert_eq!(BirthWeightBand::from_grams(1500), BirthWeightBand::Low);
        assert_eq!(BirthWeightBand::from_grams(2499), BirthWeightBand::Low);
        assert_eq!(BirthWeightBand::from_grams(2500), BirthWeightBand::Normal);
        assert_eq!(BirthWeightBand::from_grams(3999), BirthWeightBand::Normal);
        assert_eq!(BirthWeightBand::from_grams(4000), BirthWeightBand::Macrosomia);
    }

    #[test]
    fn apgar_bands() {
        assert_eq!(ApgarBand::from_score(3), ApgarBand::Low);
        assert_eq!(ApgarBand::from_score(6), ApgarBand::ModeratelyAbnormal);
        assert_eq!(ApgarBand::from_score(7), ApgarBand::Reassuring);
        assert_eq!(naissance("n1", 3200).apgar_band(), Some(ApgarBand::Reassuring));
    }

    #[test]
    fn groups_by_weight_band() {
        let state = EntityState {
            items: vec![
                naissance("n1", 3200),
                naissance("n2", 2100),
                naissance("n3", 4300),
                naissance("n4", 3500),
            ],
            ..EntityState::default()
        };
        let bands = state.by_weight_band();
        assert_eq!(bands[&BirthWeightBand::Normal].len(), 2);
        assert_eq!(bands[&BirthWeightBand::Low].len(), 1);
        assert_eq!(bands[&BirthWeightBand::Macrosomia].len(), 1);
        assert_eq!(state.low_birth_weight_count(), 1);
    }

    #[test]
    fn request_ranges() {
        let request = NaissanceRequest {
            accouchement_id: EntityId::parse("a1").unwrap(),
            date_naissance: "2026-09-30T08:20:00Z".parse().unwrap(),
            prenom: None,
            sexe: Sexe::Masculin,
            poids: 150,
            taille: Some(49.0),
            apgar1: Some(11),
            apgar5: Some(9),
        };
        let err = request.validate().unwrap_err();
        assert!(err.has_field("poids"));
        assert!(err.has_field("apgar1"));
        assert!(!err.has_field("apgar5"));
        assert!(!err.has_field("taille"));
    }
}
