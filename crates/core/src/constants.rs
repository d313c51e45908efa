//! Constants used throughout the Enzian core crate.
//!
//! Clinical thresholds live here so the classifier, the validator and the alert rules all read
//! the same numbers.

/// Context marker that opens every generated code ("u" for ultrasound).
pub const CODE_PREFIX: &str = "#Enzian(u) ";

/// Code body used when no compartment contributes a token.
pub const NO_FINDINGS_PHRASE: &str = "no endometriosis findings";

/// Separator between code tokens.
pub const CODE_SEPARATOR: &str = ", ";

/// Marker rendered for a tier or enumerated field missing from an abnormal finding.
pub const NOT_AVAILABLE: &str = "N/A";

/// Ovarian lesions below this diameter (cm) are O1.
pub const OVARY_LOWER_BOUND_CM: f64 = 3.0;

/// Ovarian lesions above this diameter (cm) are O3.
pub const OVARY_UPPER_BOUND_CM: f64 = 7.0;

/// Compartment A/B/C lesions below this size (cm) are grade 1.
pub const COMPARTMENT_LOWER_BOUND_CM: f64 = 1.0;

/// Compartment A/B/C lesions above this size (cm) are grade 3.
pub const COMPARTMENT_UPPER_BOUND_CM: f64 = 3.0;

/// Upper limit of the rectum measured from the anal margin (cm). Beyond it a bowel lesion
/// belongs to FI.
pub const RECTAL_RANGE_LIMIT_CM: f64 = 16.0;

/// Ureteral diameter (mm) from which a side is reported as dilated.
pub const URETER_DILATION_THRESHOLD_MM: f64 = 6.0;

/// Default report title.
pub const DEFAULT_REPORT_TITLE: &str = "ULTRASOUND REPORT";

/// Default report subtitle.
pub const DEFAULT_REPORT_SUBTITLE: &str = "Endometriosis evaluation - #Enzian classification";

/// Default label printed under the signature line.
pub const DEFAULT_SIGNATURE_LABEL: &str = "Gynecologist";
