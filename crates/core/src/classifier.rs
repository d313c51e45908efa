//! Severity classifier: measured size to tier.
//!
//! Thresholds are clinical cut-offs and are applied verbatim:
//!
//! | kind        | grade 1 | grade 2         | grade 3 |
//! |-------------|---------|-----------------|---------|
//! | ovary       | `< 3`   | `3 ..= 7`       | `> 7`   |
//! | compartment | `< 1`   | `1 ..= 3`       | `> 3`   |
//!
//! A magnitude of 0 means "not measured yet". [`classify_by_threshold`] is still total over
//! it, but the `suggest_*` helpers return `None` so callers never report a tier for an empty
//! field.

use crate::constants::{
    COMPARTMENT_LOWER_BOUND_CM, COMPARTMENT_UPPER_BOUND_CM, OVARY_LOWER_BOUND_CM,
    OVARY_UPPER_BOUND_CM,
};
use crate::tier::{CompartmentTier, Grade, OvarianTier, Tier};
use serde::{Deserialize, Serialize};

/// Which threshold table applies to a measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureKind {
    /// Largest endometrioma diameter.
    Ovary,
    /// Lesion size in compartment A, B or C.
    Compartment,
}

/// Grade a measured size against the threshold table for its kind.
///
/// # Arguments
///
/// * `kind` - Which table applies: ovary (3/7 cm) or compartment A/B/C (1/3 cm).
/// * `magnitude` - Measured size in centimetres. Lower bounds are exclusive and upper bounds
///   inclusive, so 3 cm on an ovary is grade 2.
///
/// # Returns
///
/// The grade for any non-negative magnitude, including 0.
pub fn classify_by_threshold(kind: MeasureKind, magnitude: f64) -> Grade {
    let (lower, upper) = match kind {
        MeasureKind::Ovary => (OVARY_LOWER_BOUND_CM, OVARY_UPPER_BOUND_CM),
        MeasureKind::Compartment => (COMPARTMENT_LOWER_BOUND_CM, COMPARTMENT_UPPER_BOUND_CM),
    };

    if magnitude < lower {
        Grade::One
    } else if magnitude <= upper {
        Grade::Two
    } else {
        Grade::Three
    }
}

/// Ovarian tier for the largest endometrioma diameter (cm).
pub fn classify_ovary(diameter_cm: f64) -> OvarianTier {
    OvarianTier::from_grade(classify_by_threshold(MeasureKind::Ovary, diameter_cm))
}

/// Classify a compartment A/B/C lesion; the tier type supplies the compartment letter.
pub fn classify_compartment<T: CompartmentTier>(size_cm: f64) -> T {
    T::from_grade(classify_by_threshold(MeasureKind::Compartment, size_cm))
}

/// Whether a magnitude holds a real measurement.
pub fn is_measured(magnitude: f64) -> bool {
    magnitude > 0.0
}

/// Suggested ovarian tier for live feedback, `None` until a diameter is entered.
pub fn suggest_ovary_tier(diameter_cm: f64) -> Option<OvarianTier> {
    is_measured(diameter_cm).then(|| classify_ovary(diameter_cm))
}

/// Suggested compartment tier for live feedback, `None` until a size is entered.
pub fn suggest_compartment_tier<T: CompartmentTier>(size_cm: f64) -> Option<T> {
    is_measured(size_cm).then(|| classify_compartment(size_cm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::{CompartmentATier, CompartmentBTier, CompartmentCTier};

    #[test]
    fn ovary_thresholds() {
        assert_eq!(classify_ovary(0.5), OvarianTier::O1);
        assert_eq!(classify_ovary(2.99), OvarianTier::O1);
        assert_eq!(classify_ovary(3.0), OvarianTier::O2);
        assert_eq!(classify_ovary(5.2), OvarianTier::O2);
        assert_eq!(classify_ovary(7.0), OvarianTier::O2);
        assert_eq!(classify_ovary(7.01), OvarianTier::O3);
        assert_eq!(classify_ovary(15.0), OvarianTier::O3);
    }

    #[test]
    fn compartment_thresholds() {
        let grade = |m| classify_by_threshold(MeasureKind::Compartment, m);
        assert_eq!(grade(0.9), Grade::One);
        assert_eq!(grade(1.0), Grade::Two);
        assert_eq!(grade(2.0), Grade::Two);
        assert_eq!(grade(3.0), Grade::Two);
        assert_eq!(grade(3.1), Grade::Three);
    }

    #[test]
    fn compartment_letter_comes_from_tier_type() {
        assert_eq!(classify_compartment::<CompartmentATier>(0.4), CompartmentATier::A1);
        assert_eq!(classify_compartment::<CompartmentBTier>(1.0), CompartmentBTier::B2);
        assert_eq!(classify_compartment::<CompartmentCTier>(4.5), CompartmentCTier::C3);
    }

    #[test]
    fn ovary_and_compartment_tables_differ_at_same_magnitude() {
        assert_eq!(classify_by_threshold(MeasureKind::Ovary, 2.0), Grade::One);
        assert_eq!(classify_by_threshold(MeasureKind::Compartment, 2.0), Grade::Two);
    }

    #[test]
    fn zero_magnitude_yields_no_suggestion() {
        assert_eq!(suggest_ovary_tier(0.0), None);
        assert_eq!(suggest_compartment_tier::<CompartmentATier>(0.0), None);
        assert_eq!(suggest_ovary_tier(8.0), Some(OvarianTier::O3));
        assert_eq!(
            suggest_compartment_tier::<CompartmentCTier>(0.2),
            Some(CompartmentCTier::C1)
        );
    }

    #[test]
    fn zero_is_still_classifiable() {
        assert_eq!(classify_by_threshold(MeasureKind::Ovary, 0.0), Grade::One);
    }
}
