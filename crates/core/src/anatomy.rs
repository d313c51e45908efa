//! Laterality helpers for paired structures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Body side of a paired structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Single-letter form used in ureter tokens (`FU(r)`).
    pub fn initial(self) -> char {
        match self {
            Side::Left => 'l',
            Side::Right => 'r',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    /// Capitalised label for headings.
    pub fn title(self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A left/right pair of findings.
///
/// Iteration is always left then right, matching the `X{left}/{right}` layout of the code.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bilateral<T> {
    #[serde(default)]
    pub left: T,
    #[serde(default)]
    pub right: T,
}

impl<T> Bilateral<T> {
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Sides in code order: left, then right.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        [(Side::Left, &self.left), (Side::Right, &self.right)].into_iter()
    }

    pub fn any(&self, mut predicate: impl FnMut(&T) -> bool) -> bool {
        predicate(&self.left) || predicate(&self.right)
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Bilateral<U> {
        Bilateral {
            left: f(&self.left),
            right: f(&self.right),
        }
    }
}
