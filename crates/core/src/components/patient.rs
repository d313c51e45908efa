//! Patient and study metadata.
//!
//! None of these fields influence classification. They are carried through to the report
//! unchanged.

use chrono::NaiveDate;
use enzian_types::{optional_text, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatientInfo {
    #[serde(default, deserialize_with = "optional_text")]
    pub name: Option<NonEmptyText>,

    /// National identification number.
    #[serde(default, deserialize_with = "optional_text")]
    pub id: Option<NonEmptyText>,

    #[serde(default)]
    pub age: Option<u8>,

    #[serde(default)]
    pub study_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "optional_text")]
    pub referring_physician: Option<NonEmptyText>,

    #[serde(default, deserialize_with = "optional_text")]
    pub indication: Option<NonEmptyText>,
}

/// Patient fields that must be filled before a report can be produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    Name,
    Id,
    StudyDate,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RequiredField::Name => "patient name",
            RequiredField::Id => "identification number",
            RequiredField::StudyDate => "study date",
        })
    }
}

impl PatientInfo {
    /// Required fields that are still empty, in form order.
    pub fn missing_required_fields(&self) -> Vec<RequiredField> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push(RequiredField::Name);
        }
        if self.id.is_none() {
            missing.push(RequiredField::Id);
        }
        if self.study_date.is_none() {
            missing.push(RequiredField::StudyDate);
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patient_misses_all_required_fields() {
        assert_eq!(
            PatientInfo::default().missing_required_fields(),
            vec![RequiredField::Name, RequiredField::Id, RequiredField::StudyDate]
        );
    }

    #[test]
    fn complete_patient_is_ready() {
        let patient = PatientInfo {
            name: NonEmptyText::optional("Ana Mora"),
            id: NonEmptyText::optional("1-2345-6789"),
            study_date: NaiveDate::from_ymd_opt(2026, 3, 14),
            ..Default::default()
        };
        assert!(patient.missing_required_fields().is_empty());
    }

    #[test]
    fn blank_strings_deserialise_as_missing() {
        let patient: PatientInfo =
            serde_json::from_str(r#"{"name": "", "id": "  ", "study_date": "2026-03-14"}"#)
                .expect("parse");
        assert_eq!(
            patient.missing_required_fields(),
            vec![RequiredField::Name, RequiredField::Id]
        );
    }
}
