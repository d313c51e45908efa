//! Severity tiers.
//!
//! Every tiered compartment grades its lesions 1 to 3. Each compartment gets its own enum so a
//! peritoneal tier can never be stored on an ovary, while [`Grade`] carries the shared number
//! used by the classifier, the validator and the code generator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric severity grade shared by all tier families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    One,
    Two,
    Three,
}

impl Grade {
    /// Digit used inside classification codes.
    pub fn digit(self) -> char {
        match self {
            Grade::One => '1',
            Grade::Two => '2',
            Grade::Three => '3',
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.digit())
    }
}

/// A compartment-specific severity tier.
pub trait Tier: Copy + fmt::Debug + PartialEq {
    /// Compartment letter prefixed to the grade in codes ("P", "O", ...).
    const LETTER: char;

    fn grade(self) -> Grade;

    fn from_grade(grade: Grade) -> Self;

    /// Machine code, for example `"O2"`.
    fn code(self) -> &'static str;

    /// Display label, for example `"O2 (3-7 cm)"`.
    fn label(self) -> &'static str;
}

/// Tiers of the deep compartments A, B and C, which share one size rule and take part in
/// consistency validation.
pub trait CompartmentTier: Tier {
    const KIND: crate::validation::CompartmentKind;
}

macro_rules! tier_family {
    (
        $(#[$meta:meta])*
        $name:ident, $letter:literal,
        $one:ident => $one_label:literal,
        $two:ident => $two_label:literal,
        $three:ident => $three_label:literal $(,)?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $one,
            $two,
            $three,
        }

        impl Tier for $name {
            const LETTER: char = $letter;

            fn grade(self) -> Grade {
                match self {
                    Self::$one => Grade::One,
                    Self::$two => Grade::Two,
                    Self::$three => Grade::Three,
                }
            }

            fn from_grade(grade: Grade) -> Self {
                match grade {
                    Grade::One => Self::$one,
                    Grade::Two => Self::$two,
                    Grade::Three => Self::$three,
                }
            }

            fn code(self) -> &'static str {
                match self {
                    Self::$one => stringify!($one),
                    Self::$two => stringify!($two),
                    Self::$three => stringify!($three),
                }
            }

            fn label(self) -> &'static str {
                match self {
                    Self::$one => $one_label,
                    Self::$two => $two_label,
                    Self::$three => $three_label,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

tier_family!(
    /// Peritoneal tier by summed virtual lesion diameter.
    PeritonealTier, 'P',
    P1 => "P1 (<3 cm)",
    P2 => "P2 (3-7 cm)",
    P3 => "P3 (>7 cm)",
);

tier_family!(
    /// Ovarian tier by largest endometrioma diameter.
    OvarianTier, 'O',
    O1 => "O1 (<3 cm)",
    O2 => "O2 (3-7 cm)",
    O3 => "O3 (>7 cm)",
);

tier_family!(
    /// Tubo-ovarian adhesion tier.
    TuboOvarianTier, 'T',
    T1 => "T1 - ovary to pelvic side wall adhesions",
    T2 => "T2 - T1 plus adhesions to the uterus",
    T3 => "T3 - T2 plus adhesions to the uterosacral ligament or bowel",
);

tier_family!(
    /// Compartment A (vagina, rectovaginal space) tier.
    CompartmentATier, 'A',
    A1 => "A1 (<1 cm)",
    A2 => "A2 (1-3 cm)",
    A3 => "A3 (>3 cm)",
);

tier_family!(
    /// Compartment B (uterosacral ligament, parametrium) tier.
    CompartmentBTier, 'B',
    B1 => "B1 (<1 cm)",
    B2 => "B2 (1-3 cm)",
    B3 => "B3 (>3 cm)",
);

tier_family!(
    /// Compartment C (rectum) tier.
    CompartmentCTier, 'C',
    C1 => "C1 (<1 cm)",
    C2 => "C2 (1-3 cm)",
    C3 => "C3 (>3 cm)",
);

impl CompartmentTier for CompartmentATier {
    const KIND: crate::validation::CompartmentKind = crate::validation::CompartmentKind::A;
}

impl CompartmentTier for CompartmentBTier {
    const KIND: crate::validation::CompartmentKind = crate::validation::CompartmentKind::B;
}

impl CompartmentTier for CompartmentCTier {
    const KIND: crate::validation::CompartmentKind = crate::validation::CompartmentKind::C;
}

/// Grade of an optional tier, defaulting to grade 1 when the examiner left it unset.
pub(crate) fn grade_or_default<T: Tier>(tier: Option<T>) -> Grade {
    tier.map(Tier::grade).unwrap_or(Grade::One)
}

/// Label of an optional tier, or the "not available" marker.
pub(crate) fn label_or_na<T: Tier>(tier: Option<T>) -> &'static str {
    tier.map(Tier::label).unwrap_or(crate::constants::NOT_AVAILABLE)
}
