use serde::{Deserialize, Serialize};

/// Integer grid coordinate.
///
/// Live agents only ever hold interior coordinates; the grid's 1-cell
/// border is never a valid occupancy target.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}
