//! Grouped overview of the record, the short form shown next to the code.

use crate::anatomy::Side;
use crate::components::compartments::UterosacralLesion;
use crate::components::ovary::OvaryFinding;
use crate::components::tuboovarian::TuboOvarianFinding;
use crate::components::Finding;
use crate::constants::NOT_AVAILABLE;
use crate::record::FindingRecord;
use crate::tier::{grade_or_default, label_or_na, Tier};
use serde::Serialize;

/// Text shown for a group without entries.
pub const NO_FINDINGS: &str = "no findings";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryGroup {
    Superficial,
    Ovarian,
    Adhesions,
    Deep,
    Associated,
}

impl SummaryGroup {
    pub fn title(self) -> &'static str {
        match self {
            SummaryGroup::Superficial => "Superficial endometriosis",
            SummaryGroup::Ovarian => "Ovarian endometriosis",
            SummaryGroup::Adhesions => "Adhesions",
            SummaryGroup::Deep => "Deep endometriosis",
            SummaryGroup::Associated => "Associated locations",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SummaryEntry {
    pub group: SummaryGroup,
    pub items: Vec<String>,
}

impl SummaryEntry {
    /// Item lines, or [`NO_FINDINGS`] when the group is empty.
    pub fn lines(&self) -> Vec<&str> {
        if self.items.is_empty() {
            vec![NO_FINDINGS]
        } else {
            self.items.iter().map(String::as_str).collect()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FindingsSummary {
    pub groups: Vec<SummaryEntry>,
    pub has_findings: bool,
}

impl FindingsSummary {
    pub fn from_record(record: &FindingRecord) -> Self {
        let groups = vec![
            SummaryEntry {
                group: SummaryGroup::Superficial,
                items: superficial(record),
            },
            SummaryEntry {
                group: SummaryGroup::Ovarian,
                items: ovarian(record),
            },
            SummaryEntry {
                group: SummaryGroup::Adhesions,
                items: adhesions(record),
            },
            SummaryEntry {
                group: SummaryGroup::Deep,
                items: deep(record),
            },
            SummaryEntry {
                group: SummaryGroup::Associated,
                items: associated(record),
            },
        ];

        Self {
            groups,
            has_findings: record.has_findings(),
        }
    }

    pub fn group(&self, group: SummaryGroup) -> Option<&SummaryEntry> {
        self.groups.iter().find(|entry| entry.group == group)
    }
}

fn superficial(record: &FindingRecord) -> Vec<String> {
    record
        .peritoneum()
        .abnormal()
        .map(|lesions| format!("Peritoneum: {}", label_or_na(lesions.tier)))
        .into_iter()
        .collect()
}

fn ovarian(record: &FindingRecord) -> Vec<String> {
    record
        .ovaries()
        .iter()
        .filter_map(|(side, finding)| match finding {
            OvaryFinding::Abnormal(lesion) => {
                Some(format!("{}: {}", side.title(), label_or_na(lesion.tier)))
            }
            _ => None,
        })
        .collect()
}

fn adhesions(record: &FindingRecord) -> Vec<String> {
    record
        .tuboovarian()
        .iter()
        .filter_map(|(side, finding)| match finding {
            TuboOvarianFinding::Abnormal(adhesions) => Some(format!(
                "{}: {}",
                side.title(),
                adhesions.tier.map_or(NOT_AVAILABLE, Tier::code)
            )),
            _ => None,
        })
        .collect()
}

fn deep(record: &FindingRecord) -> Vec<String> {
    let mut items = Vec::new();

    if let Some(lesion) = record.compartment_a().abnormal() {
        items.push(format!("Compartment A: {}", label_or_na(lesion.tier)));
    }

    let pair = record.compartment_b();
    if pair.any(Finding::is_abnormal) {
        let digit = |finding: &Finding<UterosacralLesion>| {
            finding
                .abnormal()
                .map_or('0', |lesion| grade_or_default(lesion.tier).digit())
        };
        items.push(format!(
            "Compartment B: B{}/{}",
            digit(pair.get(Side::Left)),
            digit(pair.get(Side::Right))
        ));
    }

    if let Some(lesion) = record.compartment_c().abnormal() {
        items.push(format!("Compartment C: {}", label_or_na(lesion.tier)));
    }

    items
}

fn associated(record: &FindingRecord) -> Vec<String> {
    let far = record.far();
    let mut items = Vec::new();

    if far.adenomyosis.is_some() {
        items.push("Adenomyosis (FA)".to_string());
    }
    if far.bladder.is_some() {
        items.push("Bladder (FB)".to_string());
    }
    if let Some(ureter) = far.ureter.as_ref() {
        let sides: Vec<&str> = ureter
            .affected_sides()
            .map(|(side, _)| side.title())
            .collect();
        if sides.is_empty() {
            items.push("Ureter (FU)".to_string());
        } else {
            items.push(format!("Ureter (FU): {}", sides.join(", ")));
        }
    }
    if far.bowel.is_some() {
        items.push("Bowel (FI)".to_string());
    }
    if far.other.is_some() {
        items.push("Other locations".to_string());
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::far::{UreterInvolvement, UreterSide};
    use crate::components::ovary::OvarianLesion;
    use crate::components::tuboovarian::TuboOvarianAdhesions;
    use crate::tier::{CompartmentBTier, OvarianTier, TuboOvarianTier};

    #[test]
    fn empty_record_reports_no_findings_everywhere() {
        let summary = FindingsSummary::from_record(&FindingRecord::default());
        assert!(!summary.has_findings);
        assert_eq!(summary.groups.len(), 5);
        for entry in &summary.groups {
            assert_eq!(entry.lines(), vec![NO_FINDINGS]);
        }
    }

    #[test]
    fn groups_collect_per_side_entries() {
        let mut builder = FindingRecord::builder();
        builder
            .ovary(
                Side::Right,
                OvaryFinding::Abnormal(OvarianLesion {
                    tier: Some(OvarianTier::O3),
                    ..Default::default()
                }),
            )
            .tuboovarian(
                Side::Left,
                TuboOvarianFinding::Abnormal(TuboOvarianAdhesions {
                    tier: Some(TuboOvarianTier::T2),
                    ..Default::default()
                }),
            )
            .compartment_b(
                Side::Left,
                Finding::Abnormal(UterosacralLesion {
                    tier: Some(CompartmentBTier::B3),
                    ..Default::default()
                }),
            )
            .ureter(Some(UreterInvolvement {
                right: Some(UreterSide::default()),
                ..Default::default()
            }));
        let summary = FindingsSummary::from_record(&builder.build());

        assert!(summary.has_findings);
        let items = |group| {
            summary
                .group(group)
                .map(|entry| entry.items.clone())
                .unwrap_or_default()
        };
        assert_eq!(items(SummaryGroup::Ovarian), vec!["Right: O3 (>7 cm)"]);
        assert_eq!(items(SummaryGroup::Adhesions), vec!["Left: T2"]);
        assert_eq!(items(SummaryGroup::Deep), vec!["Compartment B: B3/0"]);
        assert_eq!(items(SummaryGroup::Associated), vec!["Ureter (FU): Right"]);
        assert!(items(SummaryGroup::Superficial).is_empty());
    }
}
