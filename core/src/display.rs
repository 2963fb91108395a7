use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Shown in place of a counter that went below zero.
pub const NEGATIVE_MARKER: &str = "🤡";

/// Largest value a three digit counter can show.
pub const COUNTER_MAX: u16 = 999;

/// Player-visible state of one cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayKind {
    #[default]
    Hidden,
    Flagged,
    /// Explored target
    Target,
    /// Flag on a safe cell, only after a loss
    IncorrectFlag,
    /// Target never found, only after a loss
    UnflaggedTarget,
    Number(u8),
}

impl fmt::Display for DisplayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hidden => f.write_str("hidden"),
            Self::Flagged => f.write_str("flagged"),
            Self::Target => f.write_str("target"),
            Self::IncorrectFlag => f.write_str("incorrect-flag"),
            Self::UnflaggedTarget => f.write_str("unflagged-target"),
            Self::Number(count) => write!(f, "number-{}", count),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellUpdate {
    pub coords: Coord2,
    pub kind: DisplayKind,
}

/// Result of a move: the state afterwards and every cell that must be redrawn.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub state: GameState,
    pub changed: Vec<CellUpdate>,
}

impl Update {
    pub fn has_update(&self) -> bool {
        !self.changed.is_empty()
    }
}

/// Fixed-width counter value as shown on the control panel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CounterDisplay {
    Value(u16),
    Negative,
}

impl From<i32> for CounterDisplay {
    fn from(value: i32) -> Self {
        match u16::try_from(value) {
            Ok(value) => Self::Value(value.min(COUNTER_MAX)),
            Err(_) if value < 0 => Self::Negative,
            Err(_) => Self::Value(COUNTER_MAX),
        }
    }
}

impl From<u16> for CounterDisplay {
    fn from(value: u16) -> Self {
        Self::Value(value.min(COUNTER_MAX))
    }
}

impl fmt::Display for CounterDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{:03}", value),
            Self::Negative => f.write_str(NEGATIVE_MARKER),
        }
    }
}
