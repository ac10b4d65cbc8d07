//! Named spatial survival predicates.
//!
//! A closed enum rather than a runtime string lookup: adding a predicate is
//! a new variant arm. Each predicate is a pure function of an agent's final
//! position on the grid.

use petri_data::Position;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Spatial region an agent must end the generation in to survive.
///
/// The border predicates keep the outer quarter bands nearest the relevant
/// pair of edges; a literal union of two halves would cover the whole grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPredicate {
    LeftHalf,
    #[default]
    RightHalf,
    LowerHalf,
    UpperHalf,
    /// Quarter bands along the left and right edges.
    VerticalBorders,
    /// Quarter bands along the bottom and top edges.
    HorizontalBorders,
}

impl SelectionPredicate {
    /// True when an agent at `position` survives on a `width` x `height`
    /// grid (dimensions include the border).
    #[must_use]
    pub fn survives(self, position: Position, width: u16, height: u16) -> bool {
        let Position { x, y } = position;
        match self {
            Self::LeftHalf => x < width / 2,
            Self::RightHalf => x >= width / 2,
            Self::LowerHalf => y < height / 2,
            Self::UpperHalf => y >= height / 2,
            Self::VerticalBorders => x < width / 4 || x >= width - width / 4,
            Self::HorizontalBorders => y < height / 4 || y >= height - height / 4,
        }
    }

    /// The kebab-case name used in configuration and on the CLI.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::LeftHalf => "left-half",
            Self::RightHalf => "right-half",
            Self::LowerHalf => "lower-half",
            Self::UpperHalf => "upper-half",
            Self::VerticalBorders => "vertical-borders",
            Self::HorizontalBorders => "horizontal-borders",
        }
    }
}

impl fmt::Display for SelectionPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SelectionPredicate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left-half" => Ok(Self::LeftHalf),
            "right-half" => Ok(Self::RightHalf),
            "lower-half" => Ok(Self::LowerHalf),
            "upper-half" => Ok(Self::UpperHalf),
            "vertical-borders" => Ok(Self::VerticalBorders),
            "horizontal-borders" => Ok(Self::HorizontalBorders),
            other => Err(format!("unknown selection predicate {other:?}")),
        }
    }
}
