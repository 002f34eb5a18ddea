use thiserror::Error;

use crate::{CellCount, Coord2};

/// Broad classification of [`GameError`]s.
///
/// `InvalidArgument` errors depend only on the arguments of the failed call, `IllegalState` errors on the state of the
/// field or session it was made on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    IllegalState,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates {0:?}")]
    InvalidCoords(Coord2),
    #[error("Invalid minefield size {0:?}, width and height must be positive")]
    InvalidSize(Coord2),
    #[error("Minefield must contain more than one cell")]
    SingleCell,
    #[error("At least one mine is required")]
    NoMines,
    #[error("Too many mines, requested {requested} but at most {capacity} fit")]
    TooManyMines {
        requested: CellCount,
        capacity: CellCount,
    },
    #[error("Minefield grid does not match its mines")]
    InconsistentGrid,
    #[error("Cell {0:?} already contains a mine")]
    AlreadyMined(Coord2),
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Cell {0:?} is already opened")]
    AlreadyOpened(Coord2),
    #[error("Stopwatch is not running")]
    StopwatchNotRunning,
}

impl GameError {
    pub const fn kind(self) -> ErrorKind {
        use GameError::*;
        match self {
            InvalidCoords(_)
            | InvalidSize(_)
            | SingleCell
            | NoMines
            | TooManyMines { .. }
            | InconsistentGrid
            | AlreadyMined(_) => ErrorKind::InvalidArgument,
            AlreadyEnded | AlreadyOpened(_) | StopwatchNotRunning => ErrorKind::IllegalState,
        }
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
