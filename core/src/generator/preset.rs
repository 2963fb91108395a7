use alloc::vec::Vec;

use super::*;

/// Fixed layout, for replays and tests. Targets must still respect the safety zone.
#[derive(Clone, Debug, PartialEq)]
pub struct PresetLayoutGenerator {
    targets: Vec<(Coord2, TargetValue)>,
}

impl PresetLayoutGenerator {
    pub fn new(targets: Vec<(Coord2, TargetValue)>) -> Self {
        Self { targets }
    }

    /// Every target carries the value `1`.
    pub fn from_coords(coords: &[Coord2]) -> Self {
        Self::new(coords.iter().map(|&pos| (pos, 1)).collect())
    }
}

impl LayoutGenerator for PresetLayoutGenerator {
    fn generate(&self, config: &GameConfig, first_click: Coord2) -> Result<Grid> {
        if let Some(&(coords, _)) = self
            .targets
            .iter()
            .find(|&&(coords, _)| is_adjacent_or_same(first_click, coords))
        {
            log::warn!(
                "Preset target {:?} is too close to first click {:?}",
                coords,
                first_click
            );
            return Err(GameError::TargetInSafeZone(coords));
        }

        let grid = Grid::from_targets(config.size, &self.targets)?;
        if grid.target_count() != config.targets {
            return Err(GameError::TargetCountMismatch {
                expected: config.targets,
                actual: grid.target_count(),
            });
        }
        Ok(grid)
    }
}
