//! Enzian file boundary support.
//!
//! This crate translates between on-disk formats and the engine in `enzian-core`: finding
//! records as YAML or JSON, and finished reports as Markdown with YAML front matter.
//!
//! Clinical meaning lives in `enzian-core`. This crate handles file formats only.

pub mod markdown;
pub mod record;

pub use markdown::{read_front_matter, render_markdown, report_file_name, ReportDocument};
pub use record::{load_record, parse_record, save_record, write_record, RecordFormat};

use thiserror::Error;

/// Errors returned by the `enzian-report` boundary crate.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("{format} schema mismatch at {path}: {source_message}")]
    SchemaMismatch {
        format: RecordFormat,
        path: String,
        source_message: String,
    },

    #[error("unsupported record file extension: {0:?} (expected .yaml, .yml or .json)")]
    UnsupportedExtension(String),

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: String,
        source: std::io::Error,
    },

    #[error("missing YAML front matter header (expected '---' as first line)")]
    MissingFrontMatter,

    #[error("unterminated YAML front matter (missing closing '---' line)")]
    UnterminatedFrontMatter,

    #[error("front matter must be a YAML mapping")]
    FrontMatterNotMapping,

    #[error("invalid UTF-8 or text structure")]
    InvalidText,

    #[error("failed to format report: {0}")]
    Format(#[from] std::fmt::Error),
}

pub type ReportResult<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_errors_convert_into_report_error() {
        let err = ReportError::from(std::fmt::Error);
        assert!(matches!(err, ReportError::Format(_)));
        assert!(err.to_string().starts_with("failed to format report"));
    }
}
