use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Cells kept free of targets around the first reveal.
pub const SAFE_ZONE_CELLS: CellCount = 9;

/// Board shape, target count and the range target values are drawn from.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub targets: CellCount,
    pub min_value: TargetValue,
    pub max_value: TargetValue,
}

impl GameConfig {
    pub const fn new_unchecked(
        size: Coord2,
        targets: CellCount,
        min_value: TargetValue,
        max_value: TargetValue,
    ) -> Self {
        Self {
            size,
            targets,
            min_value,
            max_value,
        }
    }

    /// Validated config, every target must fit outside the first click's safety zone.
    pub fn new(
        size: Coord2,
        targets: CellCount,
        min_value: TargetValue,
        max_value: TargetValue,
    ) -> Result<Self> {
        let config = Self::new_unchecked(size, targets, min_value, max_value);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(GameError::EmptyBoard);
        }

        if self.min_value > self.max_value {
            return Err(GameError::InvalidValueRange {
                min: self.min_value,
                max: self.max_value,
            });
        }

        let available = self.max_targets();
        if self.targets > available {
            return Err(GameError::TooManyTargets {
                requested: self.targets,
                available,
            });
        }

        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// Largest target count placeable wherever the first click lands.
    pub const fn max_targets(&self) -> CellCount {
        self.total_cells().saturating_sub(SAFE_ZONE_CELLS)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Difficulty::default().game_config()
    }
}

/// Preset boards offered by the level selector.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn game_config(self) -> GameConfig {
        match self {
            Self::Easy => GameConfig::new_unchecked((8, 8), 8, 1, 1),
            Self::Medium => GameConfig::new_unchecked((10, 10), 12, 1, 1),
            Self::Hard => GameConfig::new_unchecked((12, 12), 16, 1, 1),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(GameError::UnknownDifficulty)
    }
}
