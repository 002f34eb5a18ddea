//! Rules engine for Minesweeper-style games.
//!
//! A [`Minefield`] holds the mines and the adjacency counts, a [`GameSession`] plays one game on it: it opens cells,
//! flood-fills empty regions, tracks whether the game is won or lost and measures how long it took.

use serde::{Deserialize, Serialize};

pub use cell::*;
pub use error::*;
pub use generator::*;
pub use minefield::*;
pub use session::*;
pub use stopwatch::*;
pub use types::*;

mod cell;
mod error;
mod generator;
mod minefield;
mod session;
mod stopwatch;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
    /// Seed for mine placement, a random one is picked when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self {
            size,
            mines,
            seed: None,
        }
    }

    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    pub const fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    /// Checks that the field has more than one cell and that `1 <= mines < total_cells`.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.size;
        if width == 0 || height == 0 {
            return Err(GameError::InvalidSize(self.size));
        }

        let total_cells = self.total_cells();
        if total_cells == 1 {
            return Err(GameError::SingleCell);
        }
        if self.mines == 0 {
            return Err(GameError::NoMines);
        }
        if self.mines >= total_cells {
            return Err(GameError::TooManyMines {
                requested: self.mines,
                capacity: total_cells - 1,
            });
        }

        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        area(self.size.0, self.size.1)
    }
}
