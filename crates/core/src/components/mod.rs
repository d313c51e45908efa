//! Examination findings, one module per anatomical region.
//!
//! These are the typed payloads a [`crate::record::FindingRecord`] is assembled from. They hold
//! what the examiner recorded and nothing derived: tiers are whatever the examiner selected,
//! not what the classifier would suggest.

use serde::{Deserialize, Serialize};

/// Declares a closed set of examiner options with a fixed English display label.
macro_rules! option_set {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

pub mod compartments;
pub mod far;
pub mod ovary;
pub mod patient;
pub mod peritoneum;
pub mod tuboovarian;

option_set!(
    /// Mobility of one structure against another under probe pressure.
    SlidingSign {
        Positive => "Positive (mobile)",
        Limited => "Limited",
        Negative => "Negative (fixed)",
    }
);

/// State of a compartment that is either normal or carries an abnormal finding.
///
/// Only the abnormal variant has a payload, so a normal compartment cannot hold stale
/// measurements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "findings", rename_all = "snake_case")]
pub enum Finding<T> {
    Normal,
    Abnormal(T),
}

impl<T> Default for Finding<T> {
    fn default() -> Self {
        Finding::Normal
    }
}

impl<T> Finding<T> {
    pub fn abnormal(&self) -> Option<&T> {
        match self {
            Finding::Abnormal(payload) => Some(payload),
            Finding::Normal => None,
        }
    }

    pub fn is_abnormal(&self) -> bool {
        matches!(self, Finding::Abnormal(_))
    }
}

/// Push `item` unless an equal element is already present. Returns whether it was added.
pub(crate) fn insert_unique<T: PartialEq>(list: &mut Vec<T>, item: T) -> bool {
    if list.contains(&item) {
        return false;
    }
    list.push(item);
    true
}

/// Drop repeated elements, keeping the first occurrence of each.
pub(crate) fn dedup_in_order<T: PartialEq>(list: &mut Vec<T>) {
    let mut kept: Vec<T> = Vec::with_capacity(list.len());
    for item in list.drain(..) {
        insert_unique(&mut kept, item);
    }
    *list = kept;
}
