//! Finished reports as Markdown with YAML front matter.
//!
//! The front matter carries the identifying metadata (report id, generation time, code and
//! patient keys) so report files can be indexed without parsing the body. The body follows
//! the fixed report layout: header, patient block, code, advisories, alerts, summary,
//! detailed findings, conclusion, recommendations and signature line.

use crate::{ReportError, ReportResult};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use enzian_core::components::patient::PatientInfo;
use enzian_core::constants::NOT_AVAILABLE;
use enzian_core::report::Report;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use uuid::Uuid;

/// A composed report plus the metadata of this particular rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportDocument {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub report: Report,
}

impl ReportDocument {
    /// Wrap a report with a fresh id and the current time.
    pub fn new(report: Report) -> Self {
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            report,
        }
    }

    /// Suggested file name for this document.
    pub fn file_name(&self) -> String {
        report_file_name(&self.report.patient, self.generated_at.date_naive())
    }
}

/// Front matter of a rendered report.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReportMetadata {
    pub report_id: Uuid,
    pub generated_at: String,
    pub code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_date: Option<NaiveDate>,
}

impl ReportMetadata {
    fn from_document(document: &ReportDocument) -> Self {
        let patient = &document.report.patient;
        Self {
            report_id: document.id,
            generated_at: document
                .generated_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            code: document.report.code.clone(),
            patient_name: patient.name.as_ref().map(ToString::to_string),
            patient_id: patient.id.as_ref().map(ToString::to_string),
            study_date: patient.study_date,
        }
    }
}

/// `endometriosis_report_<name>_<yyyymmdd>.md`, with whitespace in the name replaced by `_`.
pub fn report_file_name(patient: &PatientInfo, date: NaiveDate) -> String {
    let name = patient
        .name
        .as_ref()
        .map(|name| {
            name.as_str()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("_")
                .replace(['/', '\\'], "_")
        })
        .unwrap_or_else(|| "unnamed".to_string());

    format!(
        "endometriosis_report_{name}_{}.md",
        date.format("%Y%m%d")
    )
}

/// Render a report document to Markdown with YAML front matter.
///
/// # Arguments
///
/// * `document` - Composed report plus the id and timestamp of this rendering.
///
/// # Returns
///
/// The front matter block (`---` delimited) followed by the report body.
///
/// # Errors
///
/// Returns `ReportError::InvalidYaml` if the metadata cannot be serialised, or
/// `ReportError::Format` if writing the body fails.
pub fn render_markdown(document: &ReportDocument) -> ReportResult<String> {
    let metadata = ReportMetadata::from_document(document);
    let report = &document.report;

    let mut out = String::new();
    out.push_str("---\n");
    let yaml = serde_yaml::to_string(&metadata)?;
    out.push_str(&yaml);
    if !yaml.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("---\n");

    write_body(&mut out, report)?;

    tracing::debug!(report_id = %document.id, "rendered report markdown");
    Ok(out)
}

fn write_body(out: &mut String, report: &Report) -> std::fmt::Result {
    writeln!(out, "# {}", report.header.title)?;
    writeln!(out)?;
    writeln!(out, "_{}_", report.header.subtitle)?;
    writeln!(out)?;

    write_patient(out, &report.patient)?;

    writeln!(out, "## #Enzian classification")?;
    writeln!(out)?;
    writeln!(out, "**Code:** `{}`", report.code)?;
    writeln!(out)?;

    if !report.advisories.is_empty() {
        writeln!(out, "## Capture advisories")?;
        writeln!(out)?;
        for advisory in &report.advisories {
            writeln!(out, "- {}", advisory.message)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "## Clinical alerts")?;
    writeln!(out)?;
    if report.alerts.is_empty() {
        writeln!(out, "No critical alerts.")?;
    } else {
        for alert in &report.alerts {
            writeln!(out, "- {}", alert.message)?;
        }
    }
    writeln!(out)?;

    writeln!(out, "## Findings summary")?;
    writeln!(out)?;
    for entry in &report.summary.groups {
        writeln!(out, "### {}", entry.group.title())?;
        writeln!(out)?;
        for line in entry.lines() {
            writeln!(out, "- {line}")?;
        }
        writeln!(out)?;
    }

    writeln!(out, "## Detailed findings")?;
    let mut current_region = None;
    for section in &report.findings {
        if current_region != Some(section.region) {
            writeln!(out)?;
            writeln!(out, "### {}", section.region.heading())?;
            current_region = Some(section.region);
        }
        writeln!(out)?;
        let text = escape_prose(&section.text);
        match section.title.as_deref() {
            Some(title) => writeln!(out, "**{title}:** {text}")?,
            None => writeln!(out, "{text}")?,
        }
    }
    writeln!(out)?;

    writeln!(out, "## Conclusions")?;
    writeln!(out)?;
    writeln!(out, "{}", escape_prose(&report.conclusion))?;
    writeln!(out)?;

    if !report.recommendations.is_empty() {
        writeln!(out, "### Recommendations")?;
        writeln!(out)?;
        for (index, recommendation) in report.recommendations.iter().enumerate() {
            writeln!(out, "{}. {recommendation}", index + 1)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "{}", "_".repeat(50))?;
    writeln!(out)?;
    writeln!(out, "{}", report.header.signature_label)
}

fn write_patient(out: &mut String, patient: &PatientInfo) -> std::fmt::Result {
    fn or_na<T: ToString>(value: Option<T>) -> String {
        value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
    }

    writeln!(out, "## Patient")?;
    writeln!(out)?;
    writeln!(out, "- **Name:** {}", or_na(patient.name.as_ref()))?;
    writeln!(out, "- **Identification:** {}", or_na(patient.id.as_ref()))?;
    writeln!(
        out,
        "- **Age:** {}",
        or_na(patient.age.map(|age| format!("{age} years")))
    )?;
    writeln!(out, "- **Study date:** {}", or_na(patient.study_date))?;
    writeln!(
        out,
        "- **Referring physician:** {}",
        or_na(patient.referring_physician.as_ref())
    )?;
    writeln!(out)?;

    if let Some(indication) = patient.indication.as_ref() {
        writeln!(out, "**Indication:** {}", escape_prose(indication.as_str()))?;
        writeln!(out)?;
    }
    Ok(())
}

/// Escape clinician prose so it cannot open headings, rules or code blocks.
fn escape_prose(text: &str) -> String {
    text.lines()
        .map(|line| {
            let trimmed = line.trim();
            if line.trim_start().starts_with('#') {
                line.replacen('#', r"\#", 1)
            } else if trimmed == "---" || trimmed == "***" || trimmed == "___" {
                format!(r"\{trimmed}")
            } else {
                line.replace("```", r"\`\`\`")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read the front matter back from a rendered report.
pub fn read_front_matter(input: &str) -> ReportResult<ReportMetadata> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let (front_matter, _body) = split_yaml_front_matter(input)?;

    let value: serde_yaml::Value = serde_yaml::from_str(front_matter)?;
    if !matches!(value, serde_yaml::Value::Mapping(_)) {
        return Err(ReportError::FrontMatterNotMapping);
    }
    Ok(serde_yaml::from_value(value)?)
}

fn split_yaml_front_matter(input: &str) -> ReportResult<(&str, &str)> {
    let mut chunks = input.split_inclusive('\n');

    let first = chunks.next().ok_or(ReportError::InvalidText)?;
    if first.trim_end_matches(['\n', '\r']) != "---" {
        return Err(ReportError::MissingFrontMatter);
    }

    let mut offset = first.len();
    for chunk in chunks {
        if chunk.trim_end_matches(['\n', '\r']) == "---" {
            let front = &input[first.len()..offset];
            let body = &input[offset + chunk.len()..];
            return Ok((front, body));
        }
        offset += chunk.len();
    }

    Err(ReportError::UnterminatedFrontMatter)
}
