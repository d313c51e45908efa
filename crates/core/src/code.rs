//! #Enzian code generation.
//!
//! The code is a fixed prefix followed by one token per abnormal compartment, always in the
//! order P, O, T, A, B, C, F. Bilateral tokens are written `X{left}/{right}`. Far-location
//! tokens follow FA, FB, FU, FI, F(...); ureter sides are written right before left, bowel and
//! other locations in the order the examiner entered them. Nothing here iterates a hash-based
//! collection, so the same record always yields the same code.

use crate::anatomy::Bilateral;
use crate::components::ovary::OvaryFinding;
use crate::components::tuboovarian::TuboOvarianFinding;
use crate::components::Finding;
use crate::constants::{CODE_PREFIX, CODE_SEPARATOR, NO_FINDINGS_PHRASE};
use crate::record::FindingRecord;
use crate::tier::{grade_or_default, Tier};
use serde::Serialize;
use std::fmt;

/// Generated classification code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnzianCode {
    tokens: Vec<String>,
}

impl EnzianCode {
    /// Collect the tokens of a record in code order.
    ///
    /// Regions without an abnormal side or a present far entry contribute nothing; an
    /// abnormal finding without a selected tier is written as grade 1.
    pub fn from_record(record: &FindingRecord) -> Self {
        let mut tokens = Vec::new();

        if let Some(lesions) = record.peritoneum().abnormal() {
            tokens.push(tier_token(lesions.tier));
        }

        if record.ovaries().any(OvaryFinding::is_abnormal) {
            tokens.push(pair_token('O', record.ovaries(), ovary_digit));
        }

        if record.tuboovarian().any(TuboOvarianFinding::is_abnormal) {
            tokens.push(pair_token('T', record.tuboovarian(), tuboovarian_digit));
        }

        if let Some(lesion) = record.compartment_a().abnormal() {
            tokens.push(tier_token(lesion.tier));
        }

        if record.compartment_b().any(Finding::is_abnormal) {
            tokens.push(pair_token('B', record.compartment_b(), |finding| {
                finding
                    .abnormal()
                    .map(|lesion| grade_or_default(lesion.tier).digit())
                    .unwrap_or('0')
            }));
        }

        // A rectal lesion beyond 16 cm keeps its C token; the advisory asks the examiner to
        // move it to FI.
        if let Some(lesion) = record.compartment_c().abnormal() {
            tokens.push(tier_token(lesion.tier));
        }

        far_tokens(record, &mut tokens);

        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The code without its prefix.
    pub fn body(&self) -> String {
        if self.tokens.is_empty() {
            NO_FINDINGS_PHRASE.to_string()
        } else {
            self.tokens.join(CODE_SEPARATOR)
        }
    }
}

impl fmt::Display for EnzianCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CODE_PREFIX}{}", self.body())
    }
}

/// Generate the full code string, prefix included.
///
/// # Arguments
///
/// * `record` - Frozen examination record.
///
/// # Returns
///
/// `#Enzian(u) ` followed by the tokens joined with `", "`, or by
/// `no endometriosis findings` when no region contributes a token. The same record always
/// yields the same string.
pub fn generate_code(record: &FindingRecord) -> String {
    let code = EnzianCode::from_record(record).to_string();
    tracing::debug!(%code, "generated Enzian code");
    code
}

/// Code tokens in order, without prefix or separators.
pub fn code_tokens(record: &FindingRecord) -> Vec<String> {
    EnzianCode::from_record(record).tokens
}

fn tier_token<T: Tier>(tier: Option<T>) -> String {
    format!("{}{}", T::LETTER, grade_or_default(tier).digit())
}

fn pair_token<T>(letter: char, pair: &Bilateral<T>, digit: impl Fn(&T) -> char) -> String {
    format!("{letter}{}/{}", digit(&pair.left), digit(&pair.right))
}

fn ovary_digit(finding: &OvaryFinding) -> char {
    match finding {
        OvaryFinding::Abnormal(lesion) => grade_or_default(lesion.tier).digit(),
        OvaryFinding::NotVisualized => 'x',
        OvaryFinding::Normal => '0',
    }
}

/// Not evaluable is written as `0`, the same as normal.
fn tuboovarian_digit(finding: &TuboOvarianFinding) -> char {
    match finding {
        TuboOvarianFinding::Abnormal(adhesions) => grade_or_default(adhesions.tier).digit(),
        TuboOvarianFinding::NotEvaluable | TuboOvarianFinding::Normal => '0',
    }
}

fn far_tokens(record: &FindingRecord, tokens: &mut Vec<String>) {
    let far = record.far();

    if far.adenomyosis.is_some() {
        tokens.push("FA".to_string());
    }

    if far.bladder.is_some() {
        tokens.push("FB".to_string());
    }

    if let Some(ureter) = far.ureter.as_ref() {
        for (side, _) in ureter.affected_sides() {
            tokens.push(format!("FU({})", side.initial()));
        }
    }

    if let Some(bowel) = far.bowel.as_ref() {
        for location in &bowel.locations {
            tokens.push(format!("FI({})", location.code_name()));
        }
    }

    if let Some(other) = far.other.as_ref() {
        for location in &other.locations {
            tokens.push(format!("F({})", location.label));
        }
    }
}
