use thiserror::Error;

use crate::{CellCount, Coord2, TargetValue};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board must have at least one row and one column")]
    EmptyBoard,
    #[error("Too many targets, requested {requested} but at most {available} fit")]
    TooManyTargets {
        requested: CellCount,
        available: CellCount,
    },
    #[error("Invalid target value range {min}..={max}")]
    InvalidValueRange { min: TargetValue, max: TargetValue },
    #[error("Target at {0:?} lies inside the first click safety zone")]
    TargetInSafeZone(Coord2),
    #[error("Layout has {actual} targets, expected {expected}")]
    TargetCountMismatch {
        expected: CellCount,
        actual: CellCount,
    },
    #[error("Unknown difficulty")]
    UnknownDifficulty,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Game has not started, no layout yet")]
    NotStarted,
    #[error("Game already started")]
    AlreadyStarted,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
