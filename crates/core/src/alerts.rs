//! Clinical alerts derived from a finding record.

use crate::anatomy::Side;
use crate::components::Finding;
use crate::constants::OVARY_UPPER_BOUND_CM;
use crate::record::FindingRecord;
use crate::tier::CompartmentATier;
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClinicalAlert {
    /// Any ureteral involvement; renal function should be assessed.
    UreteralInvolvement,
    RectalStenosis,
    LargeEndometrioma { side: Side },
    /// Compartment A graded A3.
    ExtensiveDeepDisease,
}

impl fmt::Display for ClinicalAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClinicalAlert::UreteralInvolvement => {
                f.write_str("Ureteral involvement - assess renal function")
            }
            ClinicalAlert::RectalStenosis => f.write_str("Rectal stenosis present"),
            ClinicalAlert::LargeEndometrioma { side } => write!(
                f,
                "{} endometrioma >{OVARY_UPPER_BOUND_CM} cm",
                side.title()
            ),
            ClinicalAlert::ExtensiveDeepDisease => {
                f.write_str("Extensive deep endometriosis (A3)")
            }
        }
    }
}

/// Ordered alerts for one record: ureter, stenosis, large endometrioma (left, right), A3.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClinicalAlerts(Vec<ClinicalAlert>);

impl ClinicalAlerts {
    pub fn derive(record: &FindingRecord) -> Self {
        let mut alerts = Vec::new();

        if record.far().ureter.is_some() {
            alerts.push(ClinicalAlert::UreteralInvolvement);
        }

        if record
            .compartment_c()
            .abnormal()
            .is_some_and(|lesion| lesion.stenosis)
        {
            alerts.push(ClinicalAlert::RectalStenosis);
        }

        for (side, ovary) in record.ovaries().iter() {
            if ovary
                .abnormal()
                .is_some_and(|lesion| lesion.max_diameter_cm > OVARY_UPPER_BOUND_CM)
            {
                alerts.push(ClinicalAlert::LargeEndometrioma { side });
            }
        }

        if let Finding::Abnormal(lesion) = record.compartment_a() {
            if lesion.tier == Some(CompartmentATier::A3) {
                alerts.push(ClinicalAlert::ExtensiveDeepDisease);
            }
        }

        Self(alerts)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClinicalAlert> {
        self.0.iter()
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}
