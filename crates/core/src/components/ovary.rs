//! Ovarian endometriosis (O).

use crate::tier::OvarianTier;
use enzian_types::{optional_text, NonEmptyText};
use serde::{Deserialize, Serialize};

option_set!(
    /// IOTA cyst structure.
    CystStructure {
        Unilocular => "Unilocular",
        Multilocular => "Multilocular",
        UnilocularSolid => "Unilocular-solid",
        MultilocularSolid => "Multilocular-solid",
        Solid => "Solid",
    }
);

option_set!(
    /// IOTA cyst content.
    CystContent {
        Anechoic => "Anechoic",
        GroundGlass => "Homogeneous low-level echoes (ground glass)",
        Heterogeneous => "Heterogeneous",
        FluidFluidLevel => "Fluid-fluid level",
    }
);

option_set!(
    /// Colour Doppler vascularity.
    Vascularity {
        Absent => "Absent",
        MinimalPeripheral => "Minimal peripheral",
        Moderate => "Moderate",
        Abundant => "Abundant",
    }
);

/// Endometrioma(s) and infiltrating ovarian surface foci (>= 5 mm) on one ovary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OvarianLesion {
    /// Largest endometrioma diameter (cm).
    #[serde(default)]
    pub max_diameter_cm: f64,

    #[serde(default = "default_endometrioma_count")]
    pub endometrioma_count: u8,

    #[serde(default)]
    pub tier: Option<OvarianTier>,

    #[serde(default)]
    pub structure: Option<CystStructure>,

    #[serde(default)]
    pub content: Option<CystContent>,

    #[serde(default)]
    pub vascularity: Option<Vascularity>,

    /// Signs of adhesions to adjacent structures.
    #[serde(default)]
    pub adhesions: bool,

    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<NonEmptyText>,
}

fn default_endometrioma_count() -> u8 {
    1
}

impl Default for OvarianLesion {
    fn default() -> Self {
        Self {
            max_diameter_cm: 0.0,
            endometrioma_count: default_endometrioma_count(),
            tier: None,
            structure: None,
            content: None,
            vascularity: None,
            adhesions: false,
            description: None,
        }
    }
}

/// State of one ovary.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "findings", rename_all = "snake_case")]
pub enum OvaryFinding {
    #[default]
    Normal,
    NotVisualized,
    Abnormal(OvarianLesion),
}

impl OvaryFinding {
    pub fn abnormal(&self) -> Option<&OvarianLesion> {
        match self {
            OvaryFinding::Abnormal(lesion) => Some(lesion),
            _ => None,
        }
    }

    pub fn is_abnormal(&self) -> bool {
        matches!(self, OvaryFinding::Abnormal(_))
    }
}
