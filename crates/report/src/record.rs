//! Finding records on disk, as YAML or JSON.
//!
//! Parsing is strict: unknown keys are rejected and a schema error names the failing path
//! (for example `compartment_c.findings.tier`), because records are usually hand-edited or
//! exported by another tool.

use crate::{ReportError, ReportResult};
use enzian_core::FindingRecord;
use std::fmt;
use std::fs;
use std::path::Path;

/// Serialization format of a record file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordFormat {
    Yaml,
    Json,
}

impl RecordFormat {
    /// Pick the format from a file extension (`.yaml`, `.yml` or `.json`).
    pub fn from_path(path: &Path) -> ReportResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "yaml" | "yml" => Ok(RecordFormat::Yaml),
            "json" => Ok(RecordFormat::Json),
            _ => Err(ReportError::UnsupportedExtension(extension)),
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordFormat::Yaml => "YAML",
            RecordFormat::Json => "JSON",
        })
    }
}

/// Strictly parse a finding record.
///
/// # Arguments
///
/// * `text` - File contents; a leading byte order mark is ignored.
/// * `format` - YAML or JSON.
///
/// # Errors
///
/// Returns `ReportError::SchemaMismatch` naming the failing path when the text is not valid
/// for the format, carries an unknown key, or holds a value of the wrong shape.
pub fn parse_record(text: &str, format: RecordFormat) -> ReportResult<FindingRecord> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    match format {
        RecordFormat::Yaml => {
            serde_path_to_error::deserialize(serde_yaml::Deserializer::from_str(text))
                .map_err(|err| schema_mismatch(format, err.path().to_string(), err.into_inner()))
        }
        RecordFormat::Json => {
            let mut deserializer = serde_json::Deserializer::from_str(text);
            serde_path_to_error::deserialize(&mut deserializer)
                .map_err(|err| schema_mismatch(format, err.path().to_string(), err.into_inner()))
        }
    }
}

fn schema_mismatch(format: RecordFormat, path: String, source: impl fmt::Display) -> ReportError {
    let path = if path.is_empty() || path == "." {
        "<root>".to_string()
    } else {
        path
    };
    ReportError::SchemaMismatch {
        format,
        path,
        source_message: source.to_string(),
    }
}

/// Serialise a finding record.
pub fn write_record(record: &FindingRecord, format: RecordFormat) -> ReportResult<String> {
    Ok(match format {
        RecordFormat::Yaml => serde_yaml::to_string(record)?,
        RecordFormat::Json => serde_json::to_string_pretty(record)?,
    })
}

/// Read and parse a record file, choosing the format from its extension.
///
/// # Errors
///
/// Returns a `ReportError` if:
/// - the extension is not `.yaml`, `.yml` or `.json`,
/// - the file cannot be read,
/// - the contents do not parse (see [`parse_record`]).
pub fn load_record(path: &Path) -> ReportResult<FindingRecord> {
    let format = RecordFormat::from_path(path)?;
    let text = fs::read_to_string(path).map_err(|source| ReportError::FileRead {
        path: path.display().to_string(),
        source,
    })?;

    let record = parse_record(&text, format)?;
    tracing::debug!(path = %path.display(), %format, "loaded finding record");
    Ok(record)
}

/// Serialise a record and write it, choosing the format from the extension.
pub fn save_record(record: &FindingRecord, path: &Path) -> ReportResult<()> {
    let format = RecordFormat::from_path(path)?;
    let text = write_record(record, format)?;
    fs::write(path, text).map_err(|source| ReportError::FileWrite {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use enzian_core::{generate_code, Side};

    const SAMPLE_YAML: &str = "\
patient:
  name: Ana Mora
  id: 1-2345-6789
  study_date: 2026-03-14
peritoneum:
  status: abnormal
  findings:
    tier: P2
    total_diameter_cm: 4
tuboovarian:
  right:
    status: abnormal
    findings:
      tier: T1
";

    #[test]
    fn parses_yaml_record() {
        let record = parse_record(SAMPLE_YAML, RecordFormat::Yaml).expect("parse");
        assert_eq!(generate_code(&record), "#Enzian(u) P2, T0/1");
        assert!(record.tuboovarian().get(Side::Right).is_abnormal());
    }

    #[test]
    fn schema_errors_name_the_failing_path() {
        let yaml = "compartment_c:\n  status: abnormal\n  findings:\n    tier: C7\n";
        let err = parse_record(yaml, RecordFormat::Yaml).expect_err("bad tier");
        let message = err.to_string();
        assert!(message.starts_with("YAML schema mismatch at compartment_c"), "{message}");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_record(r#"{"pancreas": {}}"#, RecordFormat::Json).expect_err("unknown");
        assert!(matches!(err, ReportError::SchemaMismatch { .. }));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            RecordFormat::from_path(Path::new("exam.YML")).expect("yaml"),
            RecordFormat::Yaml
        );
        assert_eq!(
            RecordFormat::from_path(Path::new("exam.json")).expect("json"),
            RecordFormat::Json
        );
        assert!(matches!(
            RecordFormat::from_path(Path::new("exam.txt")),
            Err(ReportError::UnsupportedExtension(ext)) if ext == "txt"
        ));
    }

    #[test]
    fn saved_record_loads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let original = parse_record(SAMPLE_YAML, RecordFormat::Yaml).expect("parse");

        for name in ["exam.json", "exam.yaml"] {
            let path = dir.path().join(name);
            save_record(&original, &path).expect("save");
            let loaded = load_record(&path).expect("load");
            assert_eq!(loaded, original);
        }
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_record(Path::new("/nonexistent/exam.yaml")).expect_err("missing");
        assert!(err.to_string().contains("/nonexistent/exam.yaml"));
    }
}
