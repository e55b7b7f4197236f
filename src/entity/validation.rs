//! Client-side payload validation.
//!
//! Checks run before a create or update trigger is built, so a payload that
//! fails here never reaches the gateway.

use std::fmt;

use thiserror::Error;

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldErrorKind {
    Required,
    MaxLength { max: usize },
    Range { min: f64, max: f64 },
    /// Another field holds a value that excludes this one.
    Conflict { with: &'static str },
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldErrorKind::Required => write!(f, "is required"),
            FieldErrorKind::MaxLength { max } => write!(f, "must be at most {} characters", max),
            FieldErrorKind::Range { min, max } => write!(f, "must be between {} and {}", min, max),
            FieldErrorKind::Conflict { with } => write!(f, "cannot be set together with {}", with),
        }
    }
}

/// A rejected field.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} {kind}")]
pub struct FieldError {
    pub field: &'static str,
    pub kind: FieldErrorKind,
}

/// Every field rejected by one validation pass.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Validation failed: {}", join_fields(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(field: &'static str, kind: FieldErrorKind) -> Self {
        Self {
            fields: vec![FieldError { field, kind }],
        }
    }

    /// Whether `field` is among the rejected fields.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Writable-field contract of an entity payload.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Accumulates field errors so a form can show all of them at once.
#[derive(Debug, Default)]
pub struct Validator {
    fields: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(&mut self, field: &'static str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.push(field, FieldErrorKind::Required);
        }
        self
    }

    pub fn max_length(&mut self, field: &'static str, value: &str, max: usize) -> &mut Self {
        if value.chars().count() > max {
            self.push(field, FieldErrorKind::MaxLength { max });
        }
        self
    }

    pub fn range(&mut self, field: &'static str, value: f64, min: f64, max: f64) -> &mut Self {
        if !(min..=max).contains(&value) {
            self.push(field, FieldErrorKind::Range { min, max });
        }
        self
    }

    pub fn conflict(&mut self, field: &'static str, with: &'static str, conflicting: bool) -> &mut Self {
        if conflicting {
            self.push(field, FieldErrorKind::Conflict { with });
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ValidationError> {
        if self.fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                fields: std::mem::take(&mut self.fields),
            })
        }
    }

    fn push(&mut self, field: &'static str, kind: FieldErrorKind) {
        self.fields.push(FieldError { field, kind });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_failing_field() {
        let err = Validator::new()
            .required("nature", "  ")
            .max_length("lieu", "abcdef", 3)
            .range("poids", 12.0, 200.0, 7000.0)
            .finish()
            .unwrap_err();

        assert_eq!(err.fields.len(), 3);
        assert!(err.has_field("nature"));
        assert!(err.has_field("lieu"));
        assert!(err.has_field("poids"));
    }

    #[test]
    fn passing_fields_finish_ok() {
        let result = Validator::new()
            .required("nom", "BCG")
            .max_length("nom", "BCG", 100)
            .range("apgar1", 8.0, 0.0, 10.0)
            .finish();
        assert!(result.is_ok());
    }

    #[test]
    fn max_length_counts_characters_not_bytes() {
        let result = Validator::new().max_length("nature", "Hémorragie", 10).finish();
        assert!(result.is_ok());
    }

    #[test]
    fn message_lists_fields() {
        let err = ValidationError::single("nom", FieldErrorKind::Required);
        assert_eq!(err.to_string(), "Validation failed: nom is required");
    }
}
