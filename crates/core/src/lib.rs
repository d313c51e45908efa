//! # Enzian Core
//!
//! Classification and reporting engine for pelvic ultrasound examinations graded with the
//! #Enzian system.
//!
//! This crate contains pure operations over a frozen [`FindingRecord`]:
//! - Severity classification of measured lesions and live tier suggestions
//! - Consistency checks between selected tiers and measurements
//! - Code generation (`#Enzian(u) P2, O0/1, ...`)
//! - Narrative assembly, clinical alerts, findings summary and report composition
//!
//! **No I/O**: reading records from files, rendering Markdown, the CLI and the REST server
//! belong in `enzian-report`, `enzian-cli` and the root binary.

pub mod alerts;
pub mod anatomy;
pub mod classifier;
pub mod code;
pub mod components;
pub mod config;
pub mod constants;
pub mod error;
pub mod narrative;
pub mod record;
pub mod report;
pub mod summary;
pub mod tier;
pub mod validation;

pub use alerts::{ClinicalAlert, ClinicalAlerts};
pub use anatomy::{Bilateral, Side};
pub use classifier::{
    classify_by_threshold, classify_compartment, classify_ovary, suggest_compartment_tier,
    suggest_ovary_tier, MeasureKind,
};
pub use code::{code_tokens, generate_code, EnzianCode};
pub use config::ReportConfig;
pub use error::{EnzianError, EnzianResult};
pub use narrative::{assemble_narrative, NarrativeSection, Region};
pub use record::{FindingRecord, FindingRecordBuilder};
pub use report::{check_ready, Report};
pub use summary::FindingsSummary;
pub use tier::{
    CompartmentATier, CompartmentBTier, CompartmentCTier, CompartmentTier, Grade, OvarianTier,
    PeritonealTier, Tier, TuboOvarianTier,
};
pub use validation::{advisories, validate, validate_tier, Advisory, CompartmentKind, Consistency};
