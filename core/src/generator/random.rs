use rand::prelude::*;

use super::*;

/// Places `target_count` targets by rejection sampling, skipping existing targets and the
/// 3×3 block around `exclude`. Each target gets a value drawn from `min_value..=max_value`.
///
/// Fails up front when there are fewer eligible cells than targets to place, sampling would
/// never finish otherwise.
pub fn place_targets<R: Rng>(
    grid: &mut Grid,
    target_count: CellCount,
    exclude: Coord2,
    min_value: TargetValue,
    max_value: TargetValue,
    rng: &mut R,
) -> Result<()> {
    if min_value > max_value {
        return Err(GameError::InvalidValueRange {
            min: min_value,
            max: max_value,
        });
    }

    let blocked = grid
        .coords()
        .filter(|&pos| is_adjacent_or_same(exclude, pos) || grid.is_target(pos))
        .count();
    // blocked never exceeds total_cells, which is a CellCount
    let eligible = grid.total_cells() - blocked as CellCount;
    if target_count > eligible {
        log::warn!(
            "Cannot place {} targets around {:?}, only {} cells eligible",
            target_count,
            exclude,
            eligible
        );
        return Err(GameError::TooManyTargets {
            requested: target_count,
            available: eligible,
        });
    }

    let (rows, cols) = grid.size();
    let mut placed = 0;
    while placed < target_count {
        let coords = (rng.random_range(0..rows), rng.random_range(0..cols));
        if is_adjacent_or_same(exclude, coords) || grid.is_target(coords) {
            continue;
        }

        let value = rng.random_range(min_value..=max_value);
        grid.set_target(coords, value);
        placed += 1;
        log::trace!("Placed target at {:?} with value {}", coords, value);
    }

    Ok(())
}

/// Uniformly random layout seeded for reproducibility, with the first click and its
/// neighbors always free of targets.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(&self, config: &GameConfig, first_click: Coord2) -> Result<Grid> {
        let mut grid = Grid::new(config.size);
        let first_click = grid.validate_coords(first_click)?;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        place_targets(
            &mut grid,
            config.targets,
            first_click,
            config.min_value,
            config.max_value,
            &mut rng,
        )?;
        grid.compute_field_values();

        log::debug!(
            "Generated {:?} layout with {} targets, seed {}, first click {:?}",
            config.size,
            grid.target_count(),
            self.seed,
            first_click
        );
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_exact_count_outside_safe_zone() {
        for seed in 0..64 {
            let config = Difficulty::Hard.game_config();
            let first_click = ((seed % 12) as Coord, (seed * 5 % 12) as Coord);

            let grid = RandomLayoutGenerator::new(seed)
                .generate(&config, first_click)
                .unwrap();

            assert_eq!(grid.target_count(), config.targets);
            assert_eq!(grid.targets().count(), usize::from(config.targets));
            assert!(grid.targets().all(|pos| !is_adjacent_or_same(first_click, pos)));
        }
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let config = Difficulty::Medium.game_config();

        let a = RandomLayoutGenerator::new(42).generate(&config, (5, 5)).unwrap();
        let b = RandomLayoutGenerator::new(42).generate(&config, (5, 5)).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn fills_every_eligible_cell_when_full() {
        let config = GameConfig::new_unchecked((4, 4), 12, 1, 1);

        let grid = RandomLayoutGenerator::new(7).generate(&config, (0, 0)).unwrap();

        // 4×4 minus the 4 cells of the clipped corner block
        assert_eq!(grid.target_count(), 12);
        assert!(!grid.is_target((0, 0)));
        assert!(!grid.is_target((1, 1)));
        assert_eq!(grid[(0, 0)], Cell::Safe { adjacent: 0 });
        assert_eq!(grid[(1, 1)], Cell::Safe { adjacent: 5 });
        assert_eq!(grid.safe_cell_count(), 4);
    }

    #[test]
    fn values_stay_in_range() {
        let config = GameConfig::new((10, 10), 30, 2, 5).unwrap();

        let grid = RandomLayoutGenerator::new(3).generate(&config, (4, 4)).unwrap();

        for pos in grid.targets() {
            let Cell::Target { value } = grid[pos] else {
                unreachable!()
            };
            assert!((2..=5).contains(&value));
        }
    }

    #[test]
    fn placement_fails_instead_of_looping() {
        let mut grid = Grid::new((3, 4));
        let mut rng = SmallRng::seed_from_u64(0);

        let result = place_targets(&mut grid, 4, (1, 1), 1, 1, &mut rng);

        assert_eq!(
            result,
            Err(GameError::TooManyTargets {
                requested: 4,
                available: 3
            })
        );
        assert_eq!(grid.target_count(), 0);
    }

    #[test]
    fn first_click_out_of_bounds_is_rejected() {
        let config = Difficulty::Easy.game_config();

        assert_eq!(
            RandomLayoutGenerator::new(0).generate(&config, (8, 0)),
            Err(GameError::InvalidCoords)
        );
    }
}
