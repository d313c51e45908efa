//! Report configuration.
//!
//! Resolved once at process startup and then passed into the composer. Nothing in the engine
//! reads environment variables while a request is being handled; binaries read the raw values
//! and hand them to [`ReportConfig::from_env_values`].

use crate::constants::{DEFAULT_REPORT_SUBTITLE, DEFAULT_REPORT_TITLE, DEFAULT_SIGNATURE_LABEL};
use crate::{EnzianError, EnzianResult};
use enzian_types::NonEmptyText;

/// Presentation settings for composed reports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportConfig {
    title: String,
    subtitle: String,
    signature_label: String,
    include_recommendations: bool,
}

impl ReportConfig {
    /// Build a configuration from explicit values.
    ///
    /// # Arguments
    ///
    /// * `title` - Report heading.
    /// * `subtitle` - Line printed under the heading.
    /// * `signature_label` - Label under the signature line.
    /// * `include_recommendations` - Whether the fixed recommendations are appended.
    ///
    /// # Errors
    ///
    /// Returns `EnzianError::Text` if any text value is blank.
    pub fn new(
        title: &str,
        subtitle: &str,
        signature_label: &str,
        include_recommendations: bool,
    ) -> EnzianResult<Self> {
        Ok(Self {
            title: NonEmptyText::new(title)?.to_string(),
            subtitle: NonEmptyText::new(subtitle)?.to_string(),
            signature_label: NonEmptyText::new(signature_label)?.to_string(),
            include_recommendations,
        })
    }

    /// Build from optional raw values, falling back to the defaults for anything unset or
    /// blank.
    ///
    /// # Errors
    ///
    /// Returns `EnzianError::InvalidInput` if the recommendations flag is not one of
    /// `1/true/yes/on` or `0/false/no/off`.
    pub fn from_env_values(
        title: Option<String>,
        subtitle: Option<String>,
        signature_label: Option<String>,
        include_recommendations: Option<String>,
    ) -> EnzianResult<Self> {
        let include_recommendations = match non_blank(include_recommendations) {
            Some(value) => parse_flag(&value)?,
            None => true,
        };

        Self::new(
            non_blank(title).as_deref().unwrap_or(DEFAULT_REPORT_TITLE),
            non_blank(subtitle)
                .as_deref()
                .unwrap_or(DEFAULT_REPORT_SUBTITLE),
            non_blank(signature_label)
                .as_deref()
                .unwrap_or(DEFAULT_SIGNATURE_LABEL),
            include_recommendations,
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn signature_label(&self) -> &str {
        &self.signature_label
    }

    pub fn include_recommendations(&self) -> bool {
        self.include_recommendations
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_REPORT_TITLE.to_string(),
            subtitle: DEFAULT_REPORT_SUBTITLE.to_string(),
            signature_label: DEFAULT_SIGNATURE_LABEL.to_string(),
            include_recommendations: true,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: &str) -> EnzianResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(EnzianError::InvalidInput(format!(
            "expected a boolean flag, got {other:?}"
        ))),
    }
}
