//! Superficial peritoneal disease (P).

use crate::tier::PeritonealTier;
use enzian_types::{optional_text, NonEmptyText};
use serde::{Deserialize, Serialize};

option_set!(
    PeritonealLocation {
        DouglasPouch => "Pouch of Douglas",
        LateralPelvicPeritoneum => "Lateral pelvic peritoneum",
        BroadLigament => "Broad ligament",
        VesicalPeritoneum => "Vesical peritoneum",
        Other => "Other",
    }
);

/// Superficial lesions (< 5 mm subperitoneal invasion), graded by summed diameter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeritonealLesions {
    #[serde(default)]
    pub tier: Option<PeritonealTier>,

    /// Approximate sum of lesion diameters (cm).
    #[serde(default)]
    pub total_diameter_cm: f64,

    #[serde(default)]
    pub locations: Vec<PeritonealLocation>,

    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<NonEmptyText>,
}
