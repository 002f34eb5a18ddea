use core::fmt;

use serde::{Deserialize, Serialize};

/// Content of a single minefield cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Mine,
    /// Number of mines among the surrounding cells.
    Count(u8),
}

impl Cell {
    pub const EMPTY: Self = Self::Count(0);

    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Count(0))
    }

    pub const fn adjacent_mines(self) -> Option<u8> {
        match self {
            Self::Mine => None,
            Self::Count(count) => Some(count),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Mine => f.write_str("x"),
            Self::Count(0) => f.write_str("."),
            Self::Count(count) => write!(f, "{count}"),
        }
    }
}
