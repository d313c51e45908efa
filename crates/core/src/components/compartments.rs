//! Deep endometriosis compartments A, B and C.
//!
//! A runs along the craniocaudal axis (vagina, rectovaginal space), B along the mediolateral
//! axis (uterosacral and cardinal ligaments, pelvic side wall) and C along the ventrodorsal
//! axis (rectum up to 16 cm from the anal margin).

use super::SlidingSign;
use crate::tier::{CompartmentATier, CompartmentBTier, CompartmentCTier};
use enzian_types::{optional_text, NonEmptyText};
use serde::{Deserialize, Serialize};

option_set!(
    CompartmentALocation {
        PosteriorVaginalFornix => "Posterior vaginal fornix",
        RectovaginalSpace => "Rectovaginal space",
        RetrocervicalArea => "Retrocervical area",
    }
);

option_set!(
    Echogenicity {
        Hypoechoic => "Hypoechoic",
        Isoechoic => "Isoechoic",
        Heterogeneous => "Heterogeneous",
    }
);

option_set!(
    Contour {
        Regular => "Regular",
        Irregular => "Irregular",
        Spiculated => "Spiculated",
    }
);

option_set!(
    /// Deepest bowel wall layer reached by a rectal lesion.
    InfiltrationDepth {
        SerosaSubserosa => "Serosa/subserosa",
        MuscularisPropria => "Muscularis propria",
        Submucosa => "Submucosa",
        Mucosa => "Mucosa",
    }
);

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompartmentALesion {
    /// Largest diameter in the mid-sagittal plane (cm).
    #[serde(default)]
    pub diameter_cm: f64,

    #[serde(default)]
    pub tier: Option<CompartmentATier>,

    #[serde(default)]
    pub locations: Vec<CompartmentALocation>,

    #[serde(default)]
    pub echogenicity: Option<Echogenicity>,

    #[serde(default)]
    pub contour: Option<Contour>,

    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<NonEmptyText>,
}

/// Lesion of one uterosacral ligament.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UterosacralLesion {
    #[serde(default)]
    pub max_diameter_cm: f64,

    /// Anteroposterior dimension (cm).
    #[serde(default)]
    pub ap_cm: f64,

    /// Craniocaudal dimension (cm).
    #[serde(default)]
    pub cc_cm: f64,

    #[serde(default)]
    pub tier: Option<CompartmentBTier>,

    #[serde(default)]
    pub sliding_sign: Option<SlidingSign>,

    /// Distance from the cervical insertion (cm).
    #[serde(default)]
    pub distance_from_cervix_cm: f64,

    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<NonEmptyText>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RectalLesion {
    #[serde(default)]
    pub length_cm: f64,

    #[serde(default)]
    pub tier: Option<CompartmentCTier>,

    /// Above [`crate::constants::RECTAL_RANGE_LIMIT_CM`] the lesion belongs to FI; this is
    /// reported as an advisory and never corrected here.
    #[serde(default)]
    pub distance_from_anal_margin_cm: f64,

    #[serde(default)]
    pub infiltration_depth: Option<InfiltrationDepth>,

    /// Share of the rectal circumference involved, 0 to 100 in steps of 5.
    #[serde(default)]
    pub circumference_percent: u8,

    #[serde(default)]
    pub stenosis: bool,

    #[serde(default)]
    pub sliding_sign: Option<SlidingSign>,

    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<NonEmptyText>,
}
