//! Capture-time consistency checks.
//!
//! This module compares what the examiner selected against what the measurements suggest.
//! Every result is advisory: nothing here blocks data entry or code generation, it only makes
//! a clinician override visible.

use crate::anatomy::Side;
use crate::classifier::{classify_by_threshold, is_measured, MeasureKind};
use crate::constants::{RECTAL_RANGE_LIMIT_CM, URETER_DILATION_THRESHOLD_MM};
use crate::record::FindingRecord;
use crate::tier::{CompartmentTier, Grade, Tier};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Deep compartments whose tier can be checked against a measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompartmentKind {
    A,
    B,
    C,
}

impl CompartmentKind {
    pub fn letter(self) -> char {
        match self {
            CompartmentKind::A => 'A',
            CompartmentKind::B => 'B',
            CompartmentKind::C => 'C',
        }
    }
}

/// Result of comparing a selected tier with the measured size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Consistency {
    Ok,
    Mismatch { expected: Grade, selected: Grade },
}

impl Consistency {
    pub fn is_mismatch(self) -> bool {
        matches!(self, Consistency::Mismatch { .. })
    }
}

/// Compare a selected grade against the grade the measurement implies.
///
/// The compartment kind only names the check; A, B and C share one threshold table. A
/// magnitude of 0 (not measured) always returns [`Consistency::Ok`], since there is nothing
/// to compare yet.
pub fn validate(kind: CompartmentKind, magnitude: f64, selected: Grade) -> Consistency {
    if !is_measured(magnitude) {
        return Consistency::Ok;
    }

    let expected = classify_by_threshold(MeasureKind::Compartment, magnitude);
    if expected == selected {
        Consistency::Ok
    } else {
        tracing::debug!(
            compartment = %kind.letter(),
            magnitude,
            %expected,
            %selected,
            "selected tier differs from measured size"
        );
        Consistency::Mismatch { expected, selected }
    }
}

/// Typed form of [`validate`] for a compartment tier.
pub fn validate_tier<T: CompartmentTier>(magnitude: f64, selected: T) -> Consistency {
    validate(T::KIND, magnitude, selected.grade())
}

/// Where a tier mismatch was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CompartmentSite {
    pub kind: CompartmentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
}

impl fmt::Display for CompartmentSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "compartment {}", self.kind.letter())?;
        if let Some(side) = self.side {
            write!(f, " ({side})")?;
        }
        Ok(())
    }
}

/// Non-blocking warning raised while a record is being captured.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// The selected tier does not match the measured size.
    TierMismatch {
        site: CompartmentSite,
        measured_cm: f64,
        expected: Grade,
        selected: Grade,
    },
    /// A rectal lesion lies beyond the rectum and should be recorded as FI instead.
    RectalDistanceOutOfRange { distance_cm: f64 },
    /// Ureter at or above the dilation threshold.
    UreteralDilation { side: Side, diameter_mm: f64 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::TierMismatch {
                site,
                measured_cm,
                expected,
                selected,
            } => {
                let letter = site.kind.letter();
                write!(
                    f,
                    "Inconsistency in {site}: the measurement of {measured_cm} cm suggests \
                     {letter}{expected}, but {letter}{selected} was selected"
                )
            }
            Advisory::RectalDistanceOutOfRange { distance_cm } => write!(
                f,
                "Lesion at {distance_cm} cm from the anal margin is beyond the rectum \
                 (>{RECTAL_RANGE_LIMIT_CM} cm) and should be classified as FI (sigmoid)"
            ),
            Advisory::UreteralDilation { side, diameter_mm } => write!(
                f,
                "Ureteral dilation (>={URETER_DILATION_THRESHOLD_MM} mm) on the {side} side: \
                 {diameter_mm} mm"
            ),
        }
    }
}

/// Collect every capture advisory for a record.
///
/// Order follows the code: compartment A, B left, B right, C (tier, then distance), then the
/// ureters right before left.
pub fn advisories(record: &FindingRecord) -> Vec<Advisory> {
    let mut out = Vec::new();

    if let Some(lesion) = record.compartment_a().abnormal() {
        push_mismatch(&mut out, CompartmentKind::A, None, lesion.diameter_cm, lesion.tier);
    }

    for (side, finding) in record.compartment_b().iter() {
        if let Some(lesion) = finding.abnormal() {
            push_mismatch(
                &mut out,
                CompartmentKind::B,
                Some(side),
                lesion.max_diameter_cm,
                lesion.tier,
            );
        }
    }

    if let Some(lesion) = record.compartment_c().abnormal() {
        push_mismatch(&mut out, CompartmentKind::C, None, lesion.length_cm, lesion.tier);

        if lesion.distance_from_anal_margin_cm > RECTAL_RANGE_LIMIT_CM {
            out.push(Advisory::RectalDistanceOutOfRange {
                distance_cm: lesion.distance_from_anal_margin_cm,
            });
        }
    }

    if let Some(ureter) = record.far().ureter.as_ref() {
        for (side, entry) in ureter.affected_sides() {
            if entry.diameter_mm >= URETER_DILATION_THRESHOLD_MM {
                out.push(Advisory::UreteralDilation {
                    side,
                    diameter_mm: entry.diameter_mm,
                });
            }
        }
    }

    for advisory in &out {
        tracing::warn!(%advisory, "capture advisory");
    }

    out
}

fn push_mismatch<T: CompartmentTier>(
    out: &mut Vec<Advisory>,
    kind: CompartmentKind,
    side: Option<Side>,
    measured_cm: f64,
    tier: Option<T>,
) {
    let Some(tier) = tier else {
        return;
    };
    if let Consistency::Mismatch { expected, selected } = validate(kind, measured_cm, tier.grade())
    {
        out.push(Advisory::TierMismatch {
            site: CompartmentSite { kind, side },
            measured_cm,
            expected,
            selected,
        });
    }
}
