//! The finding record and its builder.
//!
//! Capture code mutates a [`FindingRecordBuilder`] field by field while the examination runs.
//! [`FindingRecordBuilder::build`] freezes it into a [`FindingRecord`], which has no setters;
//! the code generator, narrative assembler and alert rules only ever borrow that snapshot.
//!
//! Deserialising a `FindingRecord` goes through the builder, so records loaded from files get
//! the same normalisation as records built in memory.

use crate::anatomy::{Bilateral, Side};
use crate::components::compartments::{CompartmentALesion, RectalLesion, UterosacralLesion};
use crate::components::far::{
    Adenomyosis, BladderLesion, BowelInvolvement, FarLocations, OtherLocation, OtherLocations,
    UreterInvolvement,
};
use crate::components::ovary::OvaryFinding;
use crate::components::patient::PatientInfo;
use crate::components::peritoneum::PeritonealLesions;
use crate::components::tuboovarian::TuboOvarianFinding;
use crate::components::{dedup_in_order, Finding};
use serde::{Deserialize, Serialize};

/// Frozen snapshot of one examination.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "FindingRecordBuilder")]
pub struct FindingRecord {
    patient: PatientInfo,
    peritoneum: Finding<PeritonealLesions>,
    ovaries: Bilateral<OvaryFinding>,
    tuboovarian: Bilateral<TuboOvarianFinding>,
    compartment_a: Finding<CompartmentALesion>,
    compartment_b: Bilateral<Finding<UterosacralLesion>>,
    compartment_c: Finding<RectalLesion>,
    far: FarLocations,
}

impl FindingRecord {
    /// Start an empty record: every compartment normal, no far locations.
    pub fn builder() -> FindingRecordBuilder {
        FindingRecordBuilder::new()
    }

    pub fn patient(&self) -> &PatientInfo {
        &self.patient
    }

    pub fn peritoneum(&self) -> &Finding<PeritonealLesions> {
        &self.peritoneum
    }

    pub fn ovaries(&self) -> &Bilateral<OvaryFinding> {
        &self.ovaries
    }

    pub fn tuboovarian(&self) -> &Bilateral<TuboOvarianFinding> {
        &self.tuboovarian
    }

    pub fn compartment_a(&self) -> &Finding<CompartmentALesion> {
        &self.compartment_a
    }

    pub fn compartment_b(&self) -> &Bilateral<Finding<UterosacralLesion>> {
        &self.compartment_b
    }

    pub fn compartment_c(&self) -> &Finding<RectalLesion> {
        &self.compartment_c
    }

    pub fn far(&self) -> &FarLocations {
        &self.far
    }

    /// Whether any compartment is abnormal or any far location is present.
    pub fn has_findings(&self) -> bool {
        self.peritoneum.is_abnormal()
            || self.ovaries.any(OvaryFinding::is_abnormal)
            || self.tuboovarian.any(TuboOvarianFinding::is_abnormal)
            || self.compartment_a.is_abnormal()
            || self.compartment_b.any(Finding::is_abnormal)
            || self.compartment_c.is_abnormal()
            || self.far.any_present()
    }

    /// Reopen the record for editing.
    pub fn into_builder(self) -> FindingRecordBuilder {
        FindingRecordBuilder {
            patient: self.patient,
            peritoneum: self.peritoneum,
            ovaries: self.ovaries,
            tuboovarian: self.tuboovarian,
            compartment_a: self.compartment_a,
            compartment_b: self.compartment_b,
            compartment_c: self.compartment_c,
            far: self.far,
        }
    }
}

/// Mutable accumulator used while the examination is being captured.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FindingRecordBuilder {
    #[serde(default)]
    patient: PatientInfo,
    #[serde(default)]
    peritoneum: Finding<PeritonealLesions>,
    #[serde(default)]
    ovaries: Bilateral<OvaryFinding>,
    #[serde(default)]
    tuboovarian: Bilateral<TuboOvarianFinding>,
    #[serde(default)]
    compartment_a: Finding<CompartmentALesion>,
    #[serde(default)]
    compartment_b: Bilateral<Finding<UterosacralLesion>>,
    #[serde(default)]
    compartment_c: Finding<RectalLesion>,
    #[serde(default)]
    far: FarLocations,
}

impl FindingRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patient(&mut self, patient: PatientInfo) -> &mut Self {
        self.patient = patient;
        self
    }

    pub fn peritoneum(&mut self, finding: Finding<PeritonealLesions>) -> &mut Self {
        self.peritoneum = finding;
        self
    }

    pub fn ovary(&mut self, side: Side, finding: OvaryFinding) -> &mut Self {
        *self.ovaries.get_mut(side) = finding;
        self
    }

    pub fn tuboovarian(&mut self, side: Side, finding: TuboOvarianFinding) -> &mut Self {
        *self.tuboovarian.get_mut(side) = finding;
        self
    }

    pub fn compartment_a(&mut self, finding: Finding<CompartmentALesion>) -> &mut Self {
        self.compartment_a = finding;
        self
    }

    pub fn compartment_b(&mut self, side: Side, finding: Finding<UterosacralLesion>) -> &mut Self {
        *self.compartment_b.get_mut(side) = finding;
        self
    }

    pub fn compartment_c(&mut self, finding: Finding<RectalLesion>) -> &mut Self {
        self.compartment_c = finding;
        self
    }

    pub fn far(&mut self, far: FarLocations) -> &mut Self {
        self.far = far;
        self
    }

    pub fn adenomyosis(&mut self, adenomyosis: Option<Adenomyosis>) -> &mut Self {
        self.far.adenomyosis = adenomyosis;
        self
    }

    pub fn bladder(&mut self, bladder: Option<BladderLesion>) -> &mut Self {
        self.far.bladder = bladder;
        self
    }

    pub fn ureter(&mut self, ureter: Option<UreterInvolvement>) -> &mut Self {
        self.far.ureter = ureter;
        self
    }

    pub fn bowel(&mut self, bowel: Option<BowelInvolvement>) -> &mut Self {
        self.far.bowel = bowel;
        self
    }

    /// Append an "other" far location, marking the group present. A label that is already
    /// recorded is ignored.
    pub fn other_location(&mut self, location: OtherLocation) -> &mut Self {
        let other = self.far.other.get_or_insert_with(OtherLocations::default);
        if !other.locations.iter().any(|l| l.label == location.label) {
            other.locations.push(location);
        }
        self
    }

    /// Freeze the accumulated findings.
    ///
    /// Multi-select lists are de-duplicated keeping the first occurrence, so entry order is
    /// preserved. Far groups left without entries (no ureter side, no bowel segment, no other
    /// label) are dropped.
    pub fn build(mut self) -> FindingRecord {
        if let Finding::Abnormal(lesions) = &mut self.peritoneum {
            dedup_in_order(&mut lesions.locations);
        }
        if let Finding::Abnormal(lesion) = &mut self.compartment_a {
            dedup_in_order(&mut lesion.locations);
        }
        self.far.normalise();

        FindingRecord {
            patient: self.patient,
            peritoneum: self.peritoneum,
            ovaries: self.ovaries,
            tuboovarian: self.tuboovarian,
            compartment_a: self.compartment_a,
            compartment_b: self.compartment_b,
            compartment_c: self.compartment_c,
            far: self.far,
        }
    }
}

impl From<FindingRecordBuilder> for FindingRecord {
    fn from(builder: FindingRecordBuilder) -> Self {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::far::BowelLocation;
    use crate::components::peritoneum::PeritonealLocation;
    use crate::tier::PeritonealTier;
    use enzian_types::NonEmptyText;

    #[test]
    fn empty_builder_yields_all_normal_record() {
        let record = FindingRecord::builder().build();
        assert!(!record.has_findings());
        assert_eq!(record, FindingRecord::default());
    }

    #[test]
    fn build_deduplicates_multi_selects_in_entry_order() {
        let mut builder = FindingRecord::builder();
        builder
            .peritoneum(Finding::Abnormal(PeritonealLesions {
                tier: Some(PeritonealTier::P1),
                locations: vec![
                    PeritonealLocation::BroadLigament,
                    PeritonealLocation::DouglasPouch,
                    PeritonealLocation::BroadLigament,
                ],
                ..Default::default()
            }))
            .bowel(Some(BowelInvolvement {
                locations: vec![
                    BowelLocation::Appendix,
                    BowelLocation::Sigmoid,
                    BowelLocation::Appendix,
                ],
                ..Default::default()
            }));
        let record = builder.build();

        let locations = &record.peritoneum().abnormal().expect("abnormal").locations;
        assert_eq!(
            locations,
            &vec![PeritonealLocation::BroadLigament, PeritonealLocation::DouglasPouch]
        );
        let bowel = record.far().bowel.as_ref().expect("bowel");
        assert_eq!(
            bowel.locations,
            vec![BowelLocation::Appendix, BowelLocation::Sigmoid]
        );
    }

    #[test]
    fn other_location_ignores_repeated_label() {
        let mut builder = FindingRecord::builder();
        let scar = NonEmptyText::new("Surgical scar").expect("label");
        builder
            .other_location(OtherLocation::new(scar.clone()))
            .other_location(OtherLocation::new(scar));
        let record = builder.build();
        assert_eq!(record.far().other.as_ref().map(|o| o.locations.len()), Some(1));
        assert!(record.has_findings());
    }

    #[test]
    fn into_builder_round_trips() {
        let mut builder = FindingRecord::builder();
        builder.ovary(Side::Left, OvaryFinding::NotVisualized);
        let record = builder.build();
        let rebuilt = record.clone().into_builder().build();
        assert_eq!(record, rebuilt);
    }

    #[test]
    fn deserialising_goes_through_builder() {
        let json = r#"{
            "compartment_a": {
                "status": "abnormal",
                "findings": {"tier": "A2", "locations": ["rectovaginal_space", "rectovaginal_space"]}
            }
        }"#;
        let record: FindingRecord = serde_json::from_str(json).expect("parse");
        let lesion = record.compartment_a().abnormal().expect("abnormal");
        assert_eq!(lesion.locations.len(), 1);
    }

    #[test]
    fn far_groups_without_entries_are_not_findings() {
        let mut builder = FindingRecord::builder();
        builder
            .ureter(Some(UreterInvolvement::default()))
            .bowel(Some(BowelInvolvement::default()));
        let record = builder.build();
        assert!(record.far().ureter.is_none());
        assert!(record.far().bowel.is_none());
        assert!(!record.has_findings());
    }

    #[test]
    fn deserialised_empty_far_groups_are_dropped() {
        let json = r#"{"far": {"ureter": {}, "other": {"locations": []}}}"#;
        let record: FindingRecord = serde_json::from_str(json).expect("parse");
        assert!(!record.far().any_present());
        assert!(!record.has_findings());
    }
}
