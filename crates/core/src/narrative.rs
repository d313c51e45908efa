//! Narrative assembly: one prose block per region, in code order.
//!
//! The assembler reads the frozen record and nothing else. It never classifies or validates;
//! tiers are printed as the examiner selected them and a missing tier or option prints
//! [`NOT_AVAILABLE`]. Unmeasured (zero) magnitudes are left out of the prose.

use crate::anatomy::Side;
use crate::components::compartments::{CompartmentALesion, RectalLesion, UterosacralLesion};
use crate::components::far::{
    Adenomyosis, BladderLesion, BowelInvolvement, OtherLocations, UreterInvolvement,
};
use crate::components::ovary::{OvarianLesion, OvaryFinding};
use crate::components::peritoneum::PeritonealLesions;
use crate::components::tuboovarian::{TubalPatency, TuboOvarianAdhesions, TuboOvarianFinding};
use crate::components::Finding;
use crate::constants::NOT_AVAILABLE;
use crate::record::FindingRecord;
use crate::tier::label_or_na;
use enzian_types::NonEmptyText;
use serde::Serialize;
use std::fmt::Display;

/// Examined region a narrative section belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Peritoneum,
    Ovary,
    TuboOvarian,
    CompartmentA,
    CompartmentB,
    CompartmentC,
    Far,
}

impl Region {
    pub fn heading(self) -> &'static str {
        match self {
            Region::Peritoneum => "Peritoneum (P)",
            Region::Ovary => "Ovaries (O)",
            Region::TuboOvarian => "Tubo-ovarian condition (T)",
            Region::CompartmentA => "Compartment A (vagina/rectovaginal space)",
            Region::CompartmentB => "Compartment B (uterosacral ligaments)",
            Region::CompartmentC => "Compartment C (rectum)",
            Region::Far => "Extragenital locations (F)",
        }
    }
}

/// One prose block of the detailed findings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NarrativeSection {
    pub region: Region,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    /// Sub-heading inside the region, for example "Left ovary". Absent for single-block
    /// regions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text: String,
}

impl NarrativeSection {
    fn whole(region: Region, text: String) -> Self {
        Self {
            region,
            side: None,
            title: None,
            text,
        }
    }

    fn sided(region: Region, side: Side, title: String, text: String) -> Self {
        Self {
            region,
            side: Some(side),
            title: Some(title),
            text,
        }
    }

    fn titled(region: Region, title: &str, text: String) -> Self {
        Self {
            region,
            side: None,
            title: Some(title.to_string()),
            text,
        }
    }
}

/// Assemble the detailed findings of a record.
///
/// Regions come in code order (P, O, T, A, B, C, F) and paired structures left then right.
pub fn assemble_narrative(record: &FindingRecord) -> Vec<NarrativeSection> {
    let mut sections = Vec::new();

    sections.push(NarrativeSection::whole(
        Region::Peritoneum,
        match record.peritoneum() {
            Finding::Abnormal(lesions) => peritoneum_text(lesions),
            Finding::Normal => "No evidence of superficial peritoneal lesions.".to_string(),
        },
    ));

    for (side, finding) in record.ovaries().iter() {
        let text = match finding {
            OvaryFinding::Abnormal(lesion) => ovary_text(lesion),
            OvaryFinding::NotVisualized => "Not visualized.".to_string(),
            OvaryFinding::Normal => "No evident abnormalities.".to_string(),
        };
        sections.push(NarrativeSection::sided(
            Region::Ovary,
            side,
            format!("{} ovary", side.title()),
            text,
        ));
    }

    for (side, finding) in record.tuboovarian().iter() {
        let text = match finding {
            TuboOvarianFinding::Abnormal(adhesions) => tuboovarian_text(adhesions),
            TuboOvarianFinding::NotEvaluable => "Not evaluable.".to_string(),
            TuboOvarianFinding::Normal => "Preserved mobility, no evident adhesions.".to_string(),
        };
        sections.push(NarrativeSection::sided(
            Region::TuboOvarian,
            side,
            format!("{} side", side.title()),
            text,
        ));
    }

    sections.push(NarrativeSection::whole(
        Region::CompartmentA,
        match record.compartment_a() {
            Finding::Abnormal(lesion) => compartment_a_text(lesion),
            Finding::Normal => {
                "No deep endometriosis lesions in the vagina or rectovaginal space.".to_string()
            }
        },
    ));

    for (side, finding) in record.compartment_b().iter() {
        let text = match finding {
            Finding::Abnormal(lesion) => uterosacral_text(lesion),
            Finding::Normal => "No abnormalities.".to_string(),
        };
        sections.push(NarrativeSection::sided(
            Region::CompartmentB,
            side,
            format!("{} uterosacral ligament", side.title()),
            text,
        ));
    }

    sections.push(NarrativeSection::whole(
        Region::CompartmentC,
        match record.compartment_c() {
            Finding::Abnormal(lesion) => rectal_text(lesion),
            Finding::Normal => "No evidence of rectal endometriosis.".to_string(),
        },
    ));

    far_sections(record, &mut sections);

    sections
}

fn far_sections(record: &FindingRecord, sections: &mut Vec<NarrativeSection>) {
    let far = record.far();

    if !far.any_present() {
        sections.push(NarrativeSection::whole(
            Region::Far,
            "No extragenital involvement.".to_string(),
        ));
        return;
    }

    if let Some(adenomyosis) = far.adenomyosis.as_ref() {
        sections.push(NarrativeSection::titled(
            Region::Far,
            "Adenomyosis (FA)",
            adenomyosis_text(adenomyosis),
        ));
    }
    if let Some(bladder) = far.bladder.as_ref() {
        sections.push(NarrativeSection::titled(
            Region::Far,
            "Bladder (FB)",
            bladder_text(bladder),
        ));
    }
    if let Some(ureter) = far.ureter.as_ref() {
        sections.push(NarrativeSection::titled(
            Region::Far,
            "Ureter (FU)",
            ureter_text(ureter),
        ));
    }
    if let Some(bowel) = far.bowel.as_ref() {
        sections.push(NarrativeSection::titled(
            Region::Far,
            "Bowel (FI)",
            bowel_text(bowel),
        ));
    }
    if let Some(other) = far.other.as_ref() {
        sections.push(NarrativeSection::titled(
            Region::Far,
            "Other locations",
            other_text(other),
        ));
    }
}

/// Sentence accumulator; empty parts are skipped and the rest joined with single spaces.
#[derive(Default)]
struct Prose(Vec<String>);

impl Prose {
    fn say(&mut self, sentence: impl Into<String>) -> &mut Self {
        self.0.push(sentence.into());
        self
    }

    fn say_if(&mut self, condition: bool, sentence: impl Into<String>) -> &mut Self {
        if condition {
            self.0.push(sentence.into());
        }
        self
    }

    fn measured(&mut self, value: f64, sentence: impl FnOnce(f64) -> String) -> &mut Self {
        if value > 0.0 {
            self.0.push(sentence(value));
        }
        self
    }

    fn listed<T: Display>(&mut self, prefix: &str, items: &[T]) -> &mut Self {
        if !items.is_empty() {
            self.0.push(format!("{prefix}: {}.", join(items)));
        }
        self
    }

    /// Free text is appended verbatim.
    fn free_text(&mut self, text: Option<&NonEmptyText>) -> &mut Self {
        if let Some(text) = text {
            self.0.push(text.as_str().to_string());
        }
        self
    }

    fn finish(&mut self) -> String {
        self.0.join(" ")
    }
}

fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

fn join<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn peritoneum_text(lesions: &PeritonealLesions) -> String {
    Prose::default()
        .say("Superficial peritoneal lesions identified.")
        .say(format!("Classification: {}.", label_or_na(lesions.tier)))
        .measured(lesions.total_diameter_cm, |d| {
            format!("Approximate total diameter: {d} cm.")
        })
        .listed("Locations", &lesions.locations)
        .free_text(lesions.description.as_ref())
        .finish()
}

fn ovary_text(lesion: &OvarianLesion) -> String {
    Prose::default()
        .measured(lesion.max_diameter_cm, |d| format!("Endometrioma of {d} cm."))
        .say_if(
            lesion.endometrioma_count > 1,
            format!("{} endometriomas.", lesion.endometrioma_count),
        )
        .say(format!("Classification: {}.", label_or_na(lesion.tier)))
        .say(format!("Structure: {}.", or_na(lesion.structure)))
        .say(format!("Content: {}.", or_na(lesion.content)))
        .say(format!("Vascularity: {}.", or_na(lesion.vascularity)))
        .say_if(lesion.adhesions, "Signs of adhesions to adjacent structures.")
        .free_text(lesion.description.as_ref())
        .finish()
}

fn tuboovarian_text(adhesions: &TuboOvarianAdhesions) -> String {
    Prose::default()
        .say(format!("Classification: {}.", label_or_na(adhesions.tier)))
        .say(format!("Sliding sign: {}.", or_na(adhesions.sliding_sign)))
        .say_if(
            adhesions.patency != TubalPatency::NotEvaluated,
            format!("Tubal patency: {}.", adhesions.patency),
        )
        .free_text(adhesions.description.as_ref())
        .finish()
}

fn compartment_a_text(lesion: &CompartmentALesion) -> String {
    Prose::default()
        .say("Deep endometriosis lesion identified.")
        .measured(lesion.diameter_cm, |d| format!("Largest diameter: {d} cm."))
        .say(format!("Classification: {}.", label_or_na(lesion.tier)))
        .listed("Location", &lesion.locations)
        .say(format!("Echogenicity: {}.", or_na(lesion.echogenicity)))
        .say(format!("Contour: {}.", or_na(lesion.contour)))
        .free_text(lesion.description.as_ref())
        .finish()
}

fn uterosacral_text(lesion: &UterosacralLesion) -> String {
    let dimensions: Vec<String> = [("AP", lesion.ap_cm), ("CC", lesion.cc_cm)]
        .into_iter()
        .filter(|(_, value)| *value > 0.0)
        .map(|(axis, value)| format!("{axis}: {value} cm"))
        .collect();

    let mut prose = Prose::default();
    match (lesion.max_diameter_cm > 0.0, dimensions.is_empty()) {
        (true, true) => prose.say(format!("Lesion of {} cm.", lesion.max_diameter_cm)),
        (true, false) => prose.say(format!(
            "Lesion of {} cm ({}).",
            lesion.max_diameter_cm,
            dimensions.join(", ")
        )),
        (false, false) => prose.say(format!("Lesion ({}).", dimensions.join(", "))),
        (false, true) => prose.say("Lesion identified."),
    };

    prose
        .say(format!("Classification: {}.", label_or_na(lesion.tier)))
        .say(format!("Sliding sign: {}.", or_na(lesion.sliding_sign)))
        .measured(lesion.distance_from_cervix_cm, |d| {
            format!("Distance from the cervical insertion: {d} cm.")
        })
        .free_text(lesion.description.as_ref())
        .finish()
}

fn rectal_text(lesion: &RectalLesion) -> String {
    Prose::default()
        .say("Rectal endometriosis lesion identified.")
        .measured(lesion.length_cm, |d| format!("Length: {d} cm."))
        .say(format!("Classification: {}.", label_or_na(lesion.tier)))
        .measured(lesion.distance_from_anal_margin_cm, |d| {
            format!("Distance from the anal margin: {d} cm.")
        })
        .say(format!(
            "Infiltration depth: {}.",
            or_na(lesion.infiltration_depth)
        ))
        .say_if(
            lesion.circumference_percent > 0,
            format!("Circumference involved: {}%.", lesion.circumference_percent),
        )
        .say_if(lesion.stenosis, "Signs of stenosis present.")
        .say(format!("Sliding sign: {}.", or_na(lesion.sliding_sign)))
        .free_text(lesion.description.as_ref())
        .finish()
}

fn adenomyosis_text(adenomyosis: &Adenomyosis) -> String {
    let mut prose = Prose::default();
    prose
        .say_if(
            adenomyosis.musa_criteria.is_empty(),
            "Sonographic features of adenomyosis.",
        )
        .listed("MUSA criteria", &adenomyosis.musa_criteria)
        .free_text(adenomyosis.description.as_ref())
        .finish()
}

fn bladder_text(bladder: &BladderLesion) -> String {
    let mut prose = Prose::default();
    match bladder.location {
        Some(location) => prose.say(format!("Lesion at the {location}.")),
        None => prose.say(format!("Bladder lesion identified. Location: {NOT_AVAILABLE}.")),
    };
    prose
        .say(format!("Depth: {}.", or_na(bladder.depth)))
        .measured(bladder.dimension_cm, |d| format!("Dimension: {d} cm."))
        .free_text(bladder.description.as_ref())
        .finish()
}

fn ureter_text(ureter: &UreterInvolvement) -> String {
    let sides: Vec<_> = ureter.affected_sides().collect();
    let mut prose = Prose::default();

    match sides.as_slice() {
        [] => prose.say("Ureteral involvement."),
        [(side, _)] => prose.say(format!("{} ureteral involvement.", side.title())),
        _ => prose.say("Bilateral ureteral involvement."),
    };
    prose.say(format!("Type: {}.", or_na(ureter.compromise)));

    for (side, entry) in &sides {
        let mut detail = Vec::new();
        if entry.diameter_mm > 0.0 {
            detail.push(format!("diameter {} mm", entry.diameter_mm));
        }
        if let Some(hydronephrosis) = entry.hydronephrosis {
            detail.push(format!("hydronephrosis {hydronephrosis}"));
        }
        prose.say_if(
            !detail.is_empty(),
            format!("{} ureter: {}.", side.title(), detail.join(", ")),
        );
    }

    prose.free_text(ureter.description.as_ref()).finish()
}

fn bowel_text(bowel: &BowelInvolvement) -> String {
    let mut prose = Prose::default();
    prose
        .say_if(bowel.locations.is_empty(), "Bowel involvement.")
        .listed("Bowel involvement", &bowel.locations)
        .measured(bowel.dimension_cm, |d| format!("Dimension: {d} cm."))
        .free_text(bowel.description.as_ref())
        .finish()
}

fn other_text(other: &OtherLocations) -> String {
    let labels: Vec<&str> = other.locations.iter().map(|l| l.label.as_str()).collect();
    let mut prose = Prose::default();
    prose.say_if(!labels.is_empty(), format!("{}.", labels.join(", ")));
    for location in &other.locations {
        if let Some(description) = location.description.as_ref() {
            prose.say(format!("{}: {}", location.label, description));
        }
    }
    prose.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::compartments::InfiltrationDepth;
    use crate::components::far::{
        BladderDepth, BladderLocation, BowelLocation, FarLocations, Hydronephrosis,
        MusaCriterion, OtherLocation, UreterCompromise, UreterSide,
    };
    use crate::components::ovary::{CystContent, CystStructure};
    use crate::components::peritoneum::PeritonealLocation;
    use crate::components::SlidingSign;
    use crate::tier::{CompartmentCTier, OvarianTier, PeritonealTier};

    fn texts(record: &FindingRecord) -> Vec<String> {
        assemble_narrative(record)
            .into_iter()
            .map(|section| section.text)
            .collect()
    }

    #[test]
    fn normal_record_uses_boilerplate_in_code_order() {
        let sections = assemble_narrative(&FindingRecord::default());
        let regions: Vec<Region> = sections.iter().map(|s| s.region).collect();
        assert_eq!(
            regions,
            vec![
                Region::Peritoneum,
                Region::Ovary,
                Region::Ovary,
                Region::TuboOvarian,
                Region::TuboOvarian,
                Region::CompartmentA,
                Region::CompartmentB,
                Region::CompartmentB,
                Region::CompartmentC,
                Region::Far,
            ]
        );
        assert_eq!(sections[1].side, Some(Side::Left));
        assert_eq!(sections[2].side, Some(Side::Right));
        assert_eq!(sections[2].title.as_deref(), Some("Right ovary"));
        assert_eq!(
            sections.last().map(|s| s.text.as_str()),
            Some("No extragenital involvement.")
        );
    }

    #[test]
    fn not_visualized_and_not_evaluable_boilerplate() {
        let mut builder = FindingRecord::builder();
        builder
            .ovary(Side::Right, OvaryFinding::NotVisualized)
            .tuboovarian(Side::Left, TuboOvarianFinding::NotEvaluable);
        let texts = texts(&builder.build());
        assert_eq!(texts[2], "Not visualized.");
        assert_eq!(texts[3], "Not evaluable.");
    }

    #[test]
    fn abnormal_ovary_lists_measurements_and_options() {
        let mut builder = FindingRecord::builder();
        builder.ovary(
            Side::Left,
            OvaryFinding::Abnormal(OvarianLesion {
                max_diameter_cm: 5.2,
                tier: Some(OvarianTier::O2),
                structure: Some(CystStructure::Unilocular),
                content: Some(CystContent::GroundGlass),
                adhesions: true,
                description: NonEmptyText::optional("Kissing ovaries."),
                ..Default::default()
            }),
        );
        let text = &texts(&builder.build())[1];
        assert_eq!(
            text,
            "Endometrioma of 5.2 cm. Classification: O2 (3-7 cm). Structure: Unilocular. \
             Content: Homogeneous low-level echoes (ground glass). Vascularity: N/A. \
             Signs of adhesions to adjacent structures. Kissing ovaries."
        );
    }

    #[test]
    fn missing_tier_renders_not_available() {
        let mut builder = FindingRecord::builder();
        builder.peritoneum(Finding::Abnormal(PeritonealLesions {
            locations: vec![PeritonealLocation::DouglasPouch],
            ..Default::default()
        }));
        let text = &texts(&builder.build())[0];
        assert_eq!(
            text,
            "Superficial peritoneal lesions identified. Classification: N/A. \
             Locations: Pouch of Douglas."
        );
    }

    #[test]
    fn peritoneum_label_and_diameter() {
        let mut builder = FindingRecord::builder();
        builder.peritoneum(Finding::Abnormal(PeritonealLesions {
            tier: Some(PeritonealTier::P2),
            total_diameter_cm: 4.0,
            ..Default::default()
        }));
        let text = &texts(&builder.build())[0];
        assert!(text.contains("Approximate total diameter: 4 cm."), "{text}");
        assert!(text.contains("P2"), "{text}");
    }

    #[test]
    fn rectal_lesion_mentions_stenosis_and_omits_zero_values() {
        let mut builder = FindingRecord::builder();
        builder.compartment_c(Finding::Abnormal(RectalLesion {
            length_cm: 2.5,
            tier: Some(CompartmentCTier::C2),
            infiltration_depth: Some(InfiltrationDepth::MuscularisPropria),
            stenosis: true,
            sliding_sign: Some(SlidingSign::Negative),
            ..Default::default()
        }));
        let text = &texts(&builder.build())[8];
        assert!(text.contains("Length: 2.5 cm."), "{text}");
        assert!(text.contains("Signs of stenosis present."), "{text}");
        assert!(!text.contains("anal margin"), "{text}");
        assert!(!text.contains("Circumference"), "{text}");
        assert!(text.ends_with("Sliding sign: Negative (fixed)."), "{text}");
    }

    #[test]
    fn far_sections_follow_code_order() {
        let mut builder = FindingRecord::builder();
        builder
            .bowel(Some(BowelInvolvement {
                locations: vec![BowelLocation::Appendix, BowelLocation::Sigmoid],
                ..Default::default()
            }))
            .ureter(Some(UreterInvolvement {
                left: Some(UreterSide {
                    diameter_mm: 7.0,
                    hydronephrosis: Some(Hydronephrosis::Mild),
                }),
                right: Some(UreterSide::default()),
                compromise: Some(UreterCompromise::Extrinsic),
                description: None,
            }));
        let sections = assemble_narrative(&builder.build());
        let far: Vec<&NarrativeSection> =
            sections.iter().filter(|s| s.region == Region::Far).collect();

        assert_eq!(far.len(), 2);
        assert_eq!(far[0].title.as_deref(), Some("Ureter (FU)"));
        assert_eq!(
            far[0].text,
            "Bilateral ureteral involvement. Type: Extrinsic. \
             Left ureter: diameter 7 mm, hydronephrosis mild."
        );
        assert_eq!(
            far[1].text,
            "Bowel involvement: Appendix, Sigmoid (>16 cm)."
        );
    }

    fn far_only(record: &FindingRecord) -> Vec<NarrativeSection> {
        assemble_narrative(record)
            .into_iter()
            .filter(|section| section.region == Region::Far)
            .collect()
    }

    #[test]
    fn adenomyosis_lists_musa_criteria() {
        let mut builder = FindingRecord::builder();
        builder.adenomyosis(Some(Adenomyosis {
            musa_criteria: vec![
                MusaCriterion::AsymmetricWalls,
                MusaCriterion::MyometrialCysts,
            ],
            description: NonEmptyText::optional("Diffuse pattern."),
        }));
        let far = far_only(&builder.build());

        assert_eq!(far.len(), 1);
        assert_eq!(far[0].title.as_deref(), Some("Adenomyosis (FA)"));
        assert_eq!(
            far[0].text,
            "MUSA criteria: Asymmetrical myometrial thickening, Myometrial cysts. \
             Diffuse pattern."
        );
    }

    #[test]
    fn adenomyosis_without_criteria_uses_generic_sentence() {
        let mut builder = FindingRecord::builder();
        builder.adenomyosis(Some(Adenomyosis::default()));
        let far = far_only(&builder.build());
        assert_eq!(far[0].text, "Sonographic features of adenomyosis.");
    }

    #[test]
    fn bladder_location_depth_and_dimension() {
        let mut builder = FindingRecord::builder();
        builder.bladder(Some(BladderLesion {
            location: Some(BladderLocation::Dome),
            depth: Some(BladderDepth::Muscular),
            dimension_cm: 1.2,
            description: None,
        }));
        let far = far_only(&builder.build());

        assert_eq!(far.len(), 1);
        assert_eq!(far[0].title.as_deref(), Some("Bladder (FB)"));
        assert_eq!(far[0].text, "Lesion at the dome. Depth: Muscular. Dimension: 1.2 cm.");
    }

    #[test]
    fn bladder_without_options_renders_not_available() {
        let mut builder = FindingRecord::builder();
        builder.bladder(Some(BladderLesion::default()));
        let far = far_only(&builder.build());
        assert_eq!(
            far[0].text,
            "Bladder lesion identified. Location: N/A. Depth: N/A."
        );
    }

    #[test]
    fn other_locations_append_per_label_text() {
        let mut builder = FindingRecord::builder();
        builder
            .other_location(OtherLocation {
                label: NonEmptyText::new("Umbilicus").expect("label"),
                description: NonEmptyText::optional("Nodule of 1 cm."),
            })
            .other_location(OtherLocation::new(
                NonEmptyText::new("Diaphragm").expect("label"),
            ));
        let far = far_only(&builder.build());

        assert_eq!(far.len(), 1);
        assert_eq!(far[0].title.as_deref(), Some("Other locations"));
        assert_eq!(far[0].text, "Umbilicus, Diaphragm. Umbilicus: Nodule of 1 cm.");
    }

    #[test]
    fn empty_other_group_leaves_no_blank_section() {
        let mut builder = FindingRecord::builder();
        builder.far(FarLocations {
            other: Some(OtherLocations::default()),
            ..Default::default()
        });
        let far = far_only(&builder.build());

        assert_eq!(far.len(), 1);
        assert_eq!(far[0].title, None);
        assert_eq!(far[0].text, "No extragenital involvement.");
    }

    #[test]
    fn uterosacral_dimensions_only_when_measured() {
        let mut builder = FindingRecord::builder();
        builder.compartment_b(
            Side::Right,
            Finding::Abnormal(UterosacralLesion {
                max_diameter_cm: 1.5,
                cc_cm: 0.8,
                ..Default::default()
            }),
        );
        let text = &texts(&builder.build())[7];
        assert!(text.starts_with("Lesion of 1.5 cm (CC: 0.8 cm)."), "{text}");
    }
}
