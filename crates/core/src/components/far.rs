//! Far (F) locations: findings outside the core pelvic compartments.
//!
//! Each sub-finding is independently present (`Some`) or absent (`None`). Multi-select lists
//! keep the order the examiner entered them in, because that order shows up in the code.

use crate::anatomy::Side;
use enzian_types::{optional_text, NonEmptyText};
use serde::{Deserialize, Serialize};

option_set!(
    /// MUSA sonographic features of adenomyosis.
    MusaCriterion {
        AsymmetricWalls => "Asymmetrical myometrial thickening",
        MyometrialCysts => "Myometrial cysts",
        HyperechoicIslands => "Hyperechoic islands",
        FanShapedShadowing => "Fan-shaped shadowing",
        HeterogeneousMyometrium => "Heterogeneous myometrium",
        IrregularJunctionalZone => "Irregular junctional zone",
        TranslesionalVascularity => "Translesional vascularity",
    }
);

option_set!(
    BladderLocation {
        PosteriorWall => "posterior wall",
        Dome => "dome",
        Trigone => "trigone",
        Other => "other location",
    }
);

option_set!(
    BladderDepth {
        Serosa => "Serosa",
        Muscular => "Muscular",
        Submucosa => "Submucosa",
        Mucosa => "Mucosa",
    }
);

option_set!(
    Hydronephrosis {
        Absent => "absent",
        Mild => "mild",
        Moderate => "moderate",
        Severe => "severe",
    }
);

option_set!(
    UreterCompromise {
        Extrinsic => "Extrinsic",
        Intrinsic => "Intrinsic",
        Mixed => "Mixed",
    }
);

option_set!(
    /// Bowel segments beyond 16 cm from the anal margin.
    BowelLocation {
        Sigmoid => "Sigmoid (>16 cm)",
        TransverseColon => "Transverse colon",
        Cecum => "Cecum",
        Appendix => "Appendix",
        SmallBowel => "Small bowel",
    }
);

impl BowelLocation {
    /// Name used inside the `FI(...)` token.
    pub fn code_name(self) -> &'static str {
        match self {
            BowelLocation::Sigmoid => "Sigma",
            BowelLocation::Appendix => "Appendix",
            other => other.label(),
        }
    }
}

/// Adenomyosis (FA).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Adenomyosis {
    #[serde(default)]
    pub musa_criteria: Vec<MusaCriterion>,

    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<NonEmptyText>,
}

/// Bladder involvement (FB).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BladderLesion {
    #[serde(default)]
    pub location: Option<BladderLocation>,

    #[serde(default)]
    pub depth: Option<BladderDepth>,

    #[serde(default)]
    pub dimension_cm: f64,

    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<NonEmptyText>,
}

/// Measurements of one affected ureter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UreterSide {
    /// Ureteral diameter (mm), 0 to 20.
    #[serde(default)]
    pub diameter_mm: f64,

    #[serde(default)]
    pub hydronephrosis: Option<Hydronephrosis>,
}

/// Ureteral involvement (FU). A side is affected when its entry is present.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UreterInvolvement {
    #[serde(default)]
    pub right: Option<UreterSide>,

    #[serde(default)]
    pub left: Option<UreterSide>,

    #[serde(default)]
    pub compromise: Option<UreterCompromise>,

    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<NonEmptyText>,
}

impl UreterInvolvement {
    /// Affected sides, right before left whatever order they were recorded in.
    pub fn affected_sides(&self) -> impl Iterator<Item = (Side, &UreterSide)> {
        [(Side::Right, self.right.as_ref()), (Side::Left, self.left.as_ref())]
            .into_iter()
            .filter_map(|(side, entry)| entry.map(|entry| (side, entry)))
    }

    pub fn side_mut(&mut self, side: Side) -> &mut Option<UreterSide> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Extra-rectal bowel involvement (FI).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BowelInvolvement {
    #[serde(default)]
    pub locations: Vec<BowelLocation>,

    #[serde(default)]
    pub dimension_cm: f64,

    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<NonEmptyText>,
}

/// One free-form far location, for example "Abdominal wall" or "Diaphragm".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OtherLocation {
    pub label: NonEmptyText,

    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<NonEmptyText>,
}

impl OtherLocation {
    pub fn new(label: NonEmptyText) -> Self {
        Self {
            label,
            description: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OtherLocations {
    #[serde(default)]
    pub locations: Vec<OtherLocation>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FarLocations {
    #[serde(default)]
    pub adenomyosis: Option<Adenomyosis>,

    #[serde(default)]
    pub bladder: Option<BladderLesion>,

    #[serde(default)]
    pub ureter: Option<UreterInvolvement>,

    #[serde(default)]
    pub bowel: Option<BowelInvolvement>,

    #[serde(default)]
    pub other: Option<OtherLocations>,
}

impl FarLocations {
    pub fn any_present(&self) -> bool {
        self.adenomyosis.is_some()
            || self.bladder.is_some()
            || self.ureter.is_some()
            || self.bowel.is_some()
            || self.other.is_some()
    }

    /// Drop duplicate list entries, keeping first occurrences. Other locations are unique by
    /// label.
    ///
    /// Groups whose presence is defined by their entries (ureter sides, bowel segments, other
    /// labels) are removed when they end up with none.
    pub(crate) fn normalise(&mut self) {
        if let Some(adenomyosis) = self.adenomyosis.as_mut() {
            super::dedup_in_order(&mut adenomyosis.musa_criteria);
        }
        if let Some(bowel) = self.bowel.as_mut() {
            super::dedup_in_order(&mut bowel.locations);
        }
        if let Some(other) = self.other.as_mut() {
            let mut seen: Vec<NonEmptyText> = Vec::new();
            other
                .locations
                .retain(|location| super::insert_unique(&mut seen, location.label.clone()));
        }

        if self
            .ureter
            .as_ref()
            .is_some_and(|ureter| ureter.affected_sides().next().is_none())
        {
            self.ureter = None;
        }
        if self.bowel.as_ref().is_some_and(|bowel| bowel.locations.is_empty()) {
            self.bowel = None;
        }
        if self.other.as_ref().is_some_and(|other| other.locations.is_empty()) {
            self.other = None;
        }
    }
}
