//! Domain records held in the entity slices.
//!
//! Wire format is camelCase JSON; enum values are SCREAMING_SNAKE_CASE.

pub mod accouchement;
pub mod complication;
pub mod grossesse;
pub mod naissance;
pub mod vaccin;

pub use accouchement::{Accouchement, AccouchementRelation, AccouchementRequest, ModeAccouchement};
pub use complication::{Complication, ComplicationParent, ComplicationRelation, ComplicationRequest};
pub use grossesse::{
    Grossesse, GrossesseRelation, GrossesseRequest, GrossesseSubaction, StatutGrossesse,
};
pub use naissance::{ApgarBand, BirthWeightBand, Naissance, NaissanceRelation, NaissanceRequest, Sexe};
pub use vaccin::{Vaccin, VaccinRelation, VaccinRequest, VaccinSubaction};

/// Longest free-text observation accepted by the backend.
pub(crate) const MAX_OBSERVATION_LEN: usize = 2000;
/// Longest short text field (names, places).
pub(crate) const MAX_NAME_LEN: usize = 100;
