//! Tubo-ovarian condition (T): adhesions and mobility around the adnexa.

use super::SlidingSign;
use crate::tier::TuboOvarianTier;
use enzian_types::{optional_text, NonEmptyText};
use serde::{Deserialize, Serialize};

option_set!(
    TubalPatency {
        NotEvaluated => "Not evaluated",
        Patent => "Patent (+)",
        NotPatent => "Not patent (-)",
    }
);

impl Default for TubalPatency {
    fn default() -> Self {
        TubalPatency::NotEvaluated
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuboOvarianAdhesions {
    #[serde(default)]
    pub tier: Option<TuboOvarianTier>,

    #[serde(default)]
    pub sliding_sign: Option<SlidingSign>,

    #[serde(default)]
    pub patency: TubalPatency,

    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<NonEmptyText>,
}

/// State of one adnexal side.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "findings", rename_all = "snake_case")]
pub enum TuboOvarianFinding {
    /// Preserved mobility.
    #[default]
    Normal,
    NotEvaluable,
    Abnormal(TuboOvarianAdhesions),
}

impl TuboOvarianFinding {
    pub fn abnormal(&self) -> Option<&TuboOvarianAdhesions> {
        match self {
            TuboOvarianFinding::Abnormal(adhesions) => Some(adhesions),
            _ => None,
        }
    }

    pub fn is_abnormal(&self) -> bool {
        matches!(self, TuboOvarianFinding::Abnormal(_))
    }
}
