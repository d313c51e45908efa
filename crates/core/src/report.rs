//! Report composition.
//!
//! A [`Report`] is everything a renderer needs, already in order: patient block, code, capture
//! advisories, alerts, summary, detailed findings, conclusion and recommendations. Rendering
//! to a concrete format lives outside this crate.

use crate::alerts::{ClinicalAlert, ClinicalAlerts};
use crate::code::EnzianCode;
use crate::components::patient::PatientInfo;
use crate::config::ReportConfig;
use crate::narrative::{assemble_narrative, NarrativeSection};
use crate::record::FindingRecord;
use crate::summary::FindingsSummary;
use crate::validation::{advisories, Advisory};
use crate::{EnzianError, EnzianResult};
use serde::Serialize;
use std::fmt::Display;

/// Fixed closing recommendations.
pub const RECOMMENDATIONS: [&str; 4] = [
    "Clinical correlation with the patient's symptoms.",
    "Assessment by an endometriosis specialist.",
    "Consider complementary studies according to clinical judgement.",
    "Multidisciplinary surgical planning if indicated.",
];

/// A typed item paired with its rendered message.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Notice<T> {
    #[serde(flatten)]
    pub detail: T,
    pub message: String,
}

impl<T: Display> Notice<T> {
    fn new(detail: T) -> Self {
        let message = detail.to_string();
        Self { detail, message }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportHeader {
    pub title: String,
    pub subtitle: String,
    pub signature_label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub header: ReportHeader,
    pub patient: PatientInfo,
    pub code: String,
    pub advisories: Vec<Notice<Advisory>>,
    pub alerts: Vec<Notice<ClinicalAlert>>,
    pub summary: FindingsSummary,
    pub findings: Vec<NarrativeSection>,
    pub conclusion: String,
    pub recommendations: Vec<String>,
}

impl Report {
    /// Compose a report. This does not check readiness; call [`check_ready`] first when the
    /// patient block must be complete.
    pub fn compose(record: &FindingRecord, config: &ReportConfig) -> Self {
        let code = EnzianCode::from_record(record);
        let conclusion = conclusion(&code);
        let code = code.to_string();

        let recommendations = if config.include_recommendations() {
            RECOMMENDATIONS.iter().map(|r| r.to_string()).collect()
        } else {
            Vec::new()
        };

        tracing::debug!(%code, "composed report");

        Self {
            header: ReportHeader {
                title: config.title().to_string(),
                subtitle: config.subtitle().to_string(),
                signature_label: config.signature_label().to_string(),
            },
            patient: record.patient().clone(),
            code,
            advisories: advisories(record).into_iter().map(Notice::new).collect(),
            alerts: ClinicalAlerts::derive(record)
                .iter()
                .copied()
                .map(Notice::new)
                .collect(),
            summary: FindingsSummary::from_record(record),
            findings: assemble_narrative(record),
            conclusion,
            recommendations,
        }
    }
}

/// Worded from the code itself, so the conclusion can never disagree with it.
fn conclusion(code: &EnzianCode) -> String {
    if code.is_empty() {
        format!("No sonographic evidence of endometriosis: {code}")
    } else {
        format!(
            "Ultrasound findings consistent with endometriosis according to the #Enzian \
             classification: {code}"
        )
    }
}

/// Check that a record can be turned into a report.
///
/// # Errors
///
/// Returns `EnzianError::MissingRequiredFields` listing, in form order, each of the patient
/// name, identification number and study date that is still empty.
pub fn check_ready(record: &FindingRecord) -> EnzianResult<()> {
    let missing = record.patient().missing_required_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(EnzianError::MissingRequiredFields(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anatomy::Side;
    use crate::components::compartments::CompartmentALesion;
    use crate::components::far::{Adenomyosis, UreterInvolvement};
    use crate::components::ovary::{OvarianLesion, OvaryFinding};
    use crate::components::patient::RequiredField;
    use crate::components::Finding;
    use crate::tier::{CompartmentATier, OvarianTier};
    use chrono::NaiveDate;
    use enzian_types::NonEmptyText;

    fn patient() -> PatientInfo {
        PatientInfo {
            name: NonEmptyText::optional("Ana Mora"),
            id: NonEmptyText::optional("1-2345-6789"),
            study_date: NaiveDate::from_ymd_opt(2026, 3, 14),
            ..Default::default()
        }
    }

    #[test]
    fn check_ready_lists_every_missing_field() {
        let err = check_ready(&FindingRecord::default()).expect_err("not ready");
        match err {
            EnzianError::MissingRequiredFields(fields) => assert_eq!(
                fields,
                vec![RequiredField::Name, RequiredField::Id, RequiredField::StudyDate]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn check_ready_accepts_complete_patient() {
        let mut builder = FindingRecord::builder();
        builder.patient(patient());
        assert!(check_ready(&builder.build()).is_ok());
    }

    #[test]
    fn normal_record_report() {
        let report = Report::compose(&FindingRecord::default(), &ReportConfig::default());
        assert_eq!(report.code, "#Enzian(u) no endometriosis findings");
        assert!(report.conclusion.starts_with("No sonographic evidence"));
        assert!(report.advisories.is_empty());
        assert!(report.alerts.is_empty());
        assert_eq!(report.recommendations.len(), 4);
        assert_eq!(report.header.title, "ULTRASOUND REPORT");
    }

    #[test]
    fn abnormal_record_report_carries_alerts_and_advisories() {
        let mut builder = FindingRecord::builder();
        builder
            .patient(patient())
            .ovary(
                Side::Left,
                OvaryFinding::Abnormal(OvarianLesion {
                    max_diameter_cm: 8.0,
                    tier: Some(OvarianTier::O3),
                    ..Default::default()
                }),
            )
            .compartment_a(Finding::Abnormal(CompartmentALesion {
                diameter_cm: 2.0,
                tier: Some(CompartmentATier::A3),
                ..Default::default()
            }));
        let report = Report::compose(&builder.build(), &ReportConfig::default());

        assert_eq!(report.code, "#Enzian(u) O3/0, A3");
        assert!(report.conclusion.ends_with("#Enzian(u) O3/0, A3"));
        assert_eq!(report.advisories.len(), 1);
        assert!(report.advisories[0].message.contains("suggests A2"));
        let alerts: Vec<&str> = report.alerts.iter().map(|a| a.message.as_str()).collect();
        assert_eq!(
            alerts,
            vec!["Left endometrioma >7 cm", "Extensive deep endometriosis (A3)"]
        );
    }

    #[test]
    fn conclusion_agrees_with_code_for_empty_far_group() {
        let mut builder = FindingRecord::builder();
        builder.ureter(Some(UreterInvolvement::default()));
        let report = Report::compose(&builder.build(), &ReportConfig::default());
        assert_eq!(report.code, "#Enzian(u) no endometriosis findings");
        assert_eq!(
            report.conclusion,
            "No sonographic evidence of endometriosis: #Enzian(u) no endometriosis findings"
        );
    }

    #[test]
    fn far_only_record_concludes_endometriosis() {
        let mut builder = FindingRecord::builder();
        builder.adenomyosis(Some(Adenomyosis::default()));
        let report = Report::compose(&builder.build(), &ReportConfig::default());
        assert_eq!(report.code, "#Enzian(u) FA");
        assert_eq!(
            report.conclusion,
            "Ultrasound findings consistent with endometriosis according to the #Enzian \
             classification: #Enzian(u) FA"
        );
    }

    #[test]
    fn recommendations_can_be_disabled() {
        let config = ReportConfig::new("Title", "Subtitle", "Signature", false).expect("config");
        let report = Report::compose(&FindingRecord::default(), &config);
        assert!(report.recommendations.is_empty());
        assert_eq!(report.header.signature_label, "Signature");
    }

    #[test]
    fn notices_flatten_detail_next_to_message() {
        let mut builder = FindingRecord::builder();
        builder.ovary(
            Side::Right,
            OvaryFinding::Abnormal(OvarianLesion {
                max_diameter_cm: 9.0,
                ..Default::default()
            }),
        );
        let report = Report::compose(&builder.build(), &ReportConfig::default());
        let json = serde_json::to_value(&report.alerts).expect("json");
        assert_eq!(
            json,
            serde_json::json!([{
                "kind": "large_endometrioma",
                "side": "right",
                "message": "Right endometrioma >7 cm"
            }])
        );
    }
}
