use alloc::vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// No reveal yet, the layout does not exist
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitTarget,
    Won,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl FlagOutcome {
    /// Change applied to the remaining flag counter.
    pub const fn remaining_delta(self) -> i32 {
        match self {
            Self::NoChange => 0,
            Self::Flagged => -1,
            Self::Unflagged => 1,
        }
    }
}

/// Board state of a single game: layout, explored and flagged maps, and counters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayEngine {
    grid: Grid,
    explored: Array2<bool>,
    flagged: Array2<bool>,
    explored_count: CellCount,
    explored_targets: CellCount,
    target_count: CellCount,
    remaining_flags: i32,
    state: GameState,
}

impl PlayEngine {
    /// A game waiting for its first reveal. Flags can be placed already.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            grid: Grid::new(config.size),
            explored: boolean_map(config.size),
            flagged: boolean_map(config.size),
            explored_count: 0,
            explored_targets: 0,
            target_count: config.targets,
            remaining_flags: i32::from(config.targets),
            state: GameState::NotStarted,
        }
    }

    /// A game already in progress on a finished layout.
    pub fn from_layout(grid: Grid) -> Self {
        let config = GameConfig::new_unchecked(grid.size(), grid.target_count(), 1, 1);
        let mut engine = Self::new(&config);
        engine.grid = grid;
        engine.state = GameState::InProgress;
        engine
    }

    /// Installs the generated layout and moves to `InProgress`.
    pub fn start(&mut self, grid: Grid) -> Result<()> {
        if !self.state.is_ready() {
            return Err(GameError::AlreadyStarted);
        }
        if grid.size() != self.size() {
            return Err(GameError::InvalidBoardShape);
        }
        if grid.target_count() != self.target_count {
            return Err(GameError::TargetCountMismatch {
                expected: self.target_count,
                actual: grid.target_count(),
            });
        }

        self.grid = grid;
        self.state = GameState::InProgress;
        log::debug!("Game started with {} targets", self.target_count);
        Ok(())
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.grid.size()
    }

    pub fn target_count(&self) -> CellCount {
        self.target_count
    }

    /// Targets not yet accounted for by flags, negative when over-flagged.
    pub fn remaining_flags(&self) -> i32 {
        self.remaining_flags
    }

    pub fn explored_count(&self) -> CellCount {
        self.explored_count
    }

    /// The layout, once the first reveal generated it.
    pub fn grid(&self) -> Option<&Grid> {
        (!self.state.is_ready()).then_some(&self.grid)
    }

    pub fn is_explored(&self, coords: Coord2) -> bool {
        self.explored[coords.to_nd_index()]
    }

    pub fn is_flagged(&self, coords: Coord2) -> bool {
        self.flagged[coords.to_nd_index()]
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        self.grid.validate_coords(coords)
    }

    /// What the player should currently see at `coords`.
    pub fn display_at(&self, coords: Coord2) -> DisplayKind {
        let lost = matches!(self.state, GameState::Lost);

        match (self.grid[coords], self.is_explored(coords), self.is_flagged(coords)) {
            (Cell::Target { .. }, true, _) => DisplayKind::Target,
            (Cell::Safe { adjacent }, true, _) => DisplayKind::Number(adjacent),
            (Cell::Safe { .. }, false, true) if lost => DisplayKind::IncorrectFlag,
            (_, false, true) => DisplayKind::Flagged,
            (Cell::Target { .. }, false, false) if lost => DisplayKind::UnflaggedTarget,
            (_, false, false) => DisplayKind::Hidden,
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_not_finished()?;

        if self.is_explored(coords) {
            return Ok(FlagOutcome::NoChange);
        }

        let flag = &mut self.flagged[coords.to_nd_index()];
        *flag = !*flag;
        let outcome = if *flag {
            FlagOutcome::Flagged
        } else {
            FlagOutcome::Unflagged
        };
        self.remaining_flags += outcome.remaining_delta();
        log::debug!(
            "{:?} at {:?}, {} flags remaining",
            outcome,
            coords,
            self.remaining_flags
        );

        if matches!(self.state, GameState::InProgress) && self.is_cleared() {
            self.end_game(true);
        }

        Ok(outcome)
    }

    /// Explores `coords`, cascading through zero-valued cells.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_active()?;

        let explored = self.explore_from(coords);
        Ok(self.finish_move(explored))
    }

    pub fn can_chord_reveal_at(&self, coords: Coord2) -> bool {
        matches!(self.state, GameState::InProgress)
            && in_bounds(coords, self.size())
            && self.chord_neighbors(coords).is_some()
    }

    /// Explores every unflagged neighbor of an explored number whose flag count matches it.
    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_active()?;

        let Some(neighbors) = self.chord_neighbors(coords) else {
            return Ok(RevealOutcome::NoChange);
        };

        let mut explored = 0;
        for pos in neighbors {
            if !self.is_flagged(pos) {
                explored += self.explore_from(pos);
            }
        }
        Ok(self.finish_move(explored))
    }

    /// Neighbors of `coords` when it is an explored number satisfied by adjacent flags.
    fn chord_neighbors(&self, coords: Coord2) -> Option<Neighbors> {
        if !self.is_explored(coords) {
            return None;
        }
        let adjacent = self.grid[coords].adjacent_count()?;

        let neighbors = neighbors_of(coords, self.size());
        let flagged = neighbors.iter().filter(|&&pos| self.is_flagged(pos)).count();
        (flagged == usize::from(adjacent)).then_some(neighbors)
    }

    /// Work-list flood fill. Returns how many cells became explored.
    fn explore_from(&mut self, start: Coord2) -> CellCount {
        let size = self.size();
        let mut to_visit = vec![start];
        let mut explored = 0;

        while let Some(coords) = to_visit.pop() {
            if !in_bounds(coords, size) || self.is_explored(coords) || self.is_flagged(coords) {
                continue;
            }

            self.explored[coords.to_nd_index()] = true;
            self.explored_count += 1;
            explored += 1;

            match self.grid[coords] {
                Cell::Target { value } => {
                    self.explored_targets += 1;
                    log::debug!("Explored target at {:?} (value {})", coords, value);
                }
                Cell::Safe { adjacent: 0 } => {
                    log::trace!("Cascading from {:?}", coords);
                    to_visit.extend(self.grid.neighbors(coords));
                }
                Cell::Safe { .. } => {}
            }
        }

        explored
    }

    fn finish_move(&mut self, explored: CellCount) -> RevealOutcome {
        if explored == 0 {
            return RevealOutcome::NoChange;
        }

        if self.explored_targets > 0 {
            self.end_game(false);
            RevealOutcome::HitTarget
        } else if self.is_cleared() {
            self.end_game(true);
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    /// All safe cells explored and flags placed on exactly the targets.
    fn is_cleared(&self) -> bool {
        self.explored_count == self.grid.safe_cell_count()
            && self
                .grid
                .coords()
                .all(|pos| self.grid.is_target(pos) == self.is_flagged(pos))
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        if won {
            self.state = GameState::Won;
        } else {
            self.state = GameState::Lost;
            self.sweep_hidden_safe_cells();
        }
        log::debug!("Game ended: {:?}", self.state);
    }

    /// Opens every hidden, unflagged safe cell so the whole board is visible after a loss.
    fn sweep_hidden_safe_cells(&mut self) {
        for coords in self.grid.coords() {
            if self.grid.is_target(coords) || self.is_explored(coords) || self.is_flagged(coords)
            {
                continue;
            }
            self.explored[coords.to_nd_index()] = true;
            self.explored_count += 1;
        }
    }

    fn check_active(&self) -> Result<()> {
        match self.state {
            GameState::InProgress => Ok(()),
            GameState::NotStarted => Err(GameError::NotStarted),
            GameState::Won | GameState::Lost => Err(GameError::AlreadyEnded),
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(size: Coord2, targets: &[Coord2]) -> PlayEngine {
        let targets: alloc::vec::Vec<_> = targets.iter().map(|&pos| (pos, 1)).collect();
        PlayEngine::from_layout(Grid::from_targets(size, &targets).unwrap())
    }

    fn explored_cells(engine: &PlayEngine) -> usize {
        engine.explored.iter().filter(|&&explored| explored).count()
    }

    #[test]
    fn flood_fill_explores_empty_board_in_one_call() {
        let mut engine = engine((8, 8), &[]);

        let outcome = engine.reveal((3, 4)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(engine.explored_count(), 64);
        assert_eq!(explored_cells(&engine), 64);
    }

    #[test]
    fn flood_fill_stops_at_numbers() {
        let mut engine = engine((3, 3), &[(2, 2)]);

        let outcome = engine.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert_eq!(engine.display_at((0, 0)), DisplayKind::Number(0));
        assert_eq!(engine.display_at((1, 1)), DisplayKind::Number(1));
        assert_eq!(engine.display_at((2, 2)), DisplayKind::Hidden);
        assert_eq!(engine.explored_count(), 8);
    }

    #[test]
    fn flood_fill_handles_large_open_board() {
        let mut engine = engine((255, 255), &[(254, 254)]);

        engine.reveal((0, 0)).unwrap();

        assert_eq!(engine.explored_count(), 255 * 255 - 1);
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut once = engine((5, 5), &[(4, 4), (0, 4)]);
        let mut twice = once.clone();

        once.reveal((0, 0)).unwrap();
        twice.reveal((0, 0)).unwrap();
        let second = twice.reveal((0, 0)).unwrap();

        assert_eq!(second, RevealOutcome::NoChange);
        assert_eq!(once.explored, twice.explored);
        assert_eq!(once.explored_count(), twice.explored_count());
    }

    #[test]
    fn flood_fill_skips_flagged_cells() {
        let mut engine = engine((4, 4), &[(3, 3)]);

        engine.toggle_flag((0, 1)).unwrap();
        engine.reveal((0, 0)).unwrap();

        assert!(!engine.is_explored((0, 1)));
        assert_eq!(engine.display_at((0, 1)), DisplayKind::Flagged);
        assert!(engine.is_explored((0, 2)));
    }

    #[test]
    fn revealing_target_loses_and_sweeps_board() {
        let mut engine = engine((4, 4), &[(3, 3), (3, 0)]);

        assert_eq!(engine.reveal((0, 3)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(engine.explored_count(), 12);
        engine.toggle_flag((3, 0)).unwrap();
        engine.toggle_flag((3, 1)).unwrap();

        assert_eq!(engine.reveal((3, 3)).unwrap(), RevealOutcome::HitTarget);
        assert_eq!(engine.state(), GameState::Lost);
        assert_eq!(engine.display_at((3, 3)), DisplayKind::Target);
        assert_eq!(engine.display_at((3, 0)), DisplayKind::Flagged);
        assert_eq!(engine.display_at((3, 1)), DisplayKind::IncorrectFlag);
        assert_eq!(engine.display_at((3, 2)), DisplayKind::Number(1));
        assert_eq!(engine.display_at((2, 2)), DisplayKind::Number(1));
        assert_eq!(engine.display_at((0, 0)), DisplayKind::Number(0));
    }

    #[test]
    fn unflagged_targets_are_shown_after_loss() {
        let mut engine = engine((4, 4), &[(3, 3), (0, 3)]);

        engine.reveal((3, 3)).unwrap();

        assert_eq!(engine.display_at((3, 3)), DisplayKind::Target);
        assert_eq!(engine.display_at((0, 3)), DisplayKind::UnflaggedTarget);
    }

    #[test]
    fn win_needs_every_target_flagged() {
        let mut engine = engine((4, 4), &[(3, 3)]);

        assert_eq!(engine.reveal((0, 0)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(engine.explored_count(), 15);
        assert_eq!(engine.state(), GameState::InProgress);

        assert_eq!(engine.toggle_flag((3, 3)).unwrap(), FlagOutcome::Flagged);
        assert_eq!(engine.state(), GameState::Won);
        assert_eq!(engine.remaining_flags(), 0);
    }

    #[test]
    fn false_flag_blocks_win_until_removed() {
        let mut engine = engine((4, 4), &[(3, 3)]);

        engine.toggle_flag((3, 3)).unwrap();
        engine.toggle_flag((3, 2)).unwrap();
        engine.reveal((0, 0)).unwrap();
        assert_eq!(engine.state(), GameState::InProgress);
        assert!(!engine.is_explored((3, 2)));

        engine.toggle_flag((3, 2)).unwrap();
        assert_eq!(engine.state(), GameState::InProgress);

        assert_eq!(engine.reveal((3, 2)).unwrap(), RevealOutcome::Won);
        assert_eq!(engine.state(), GameState::Won);
    }

    #[test]
    fn chord_reveal_opens_unflagged_neighbors() {
        let mut engine = engine((3, 3), &[(0, 0), (2, 2)]);

        engine.reveal((1, 1)).unwrap();
        assert_eq!(engine.display_at((1, 1)), DisplayKind::Number(2));
        engine.toggle_flag((0, 0)).unwrap();
        engine.toggle_flag((2, 2)).unwrap();
        assert!(engine.can_chord_reveal_at((1, 1)));

        let outcome = engine.chord_reveal((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        for pos in neighbors_of((1, 1), (3, 3)) {
            if pos == (0, 0) || pos == (2, 2) {
                assert!(!engine.is_explored(pos));
                assert!(engine.is_flagged(pos));
            } else {
                assert!(engine.is_explored(pos), "{:?} not explored", pos);
            }
        }
    }

    #[test]
    fn chord_reveal_needs_matching_flag_count() {
        let mut engine = engine((3, 3), &[(0, 0), (2, 2)]);

        engine.reveal((1, 1)).unwrap();
        engine.toggle_flag((0, 0)).unwrap();

        assert!(!engine.can_chord_reveal_at((1, 1)));
        assert_eq!(engine.chord_reveal((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine.explored_count(), 1);
    }

    #[test]
    fn chord_reveal_with_wrong_flag_hits_target() {
        let mut engine = engine((3, 3), &[(0, 0)]);

        engine.reveal((1, 1)).unwrap();
        engine.toggle_flag((2, 2)).unwrap();

        assert_eq!(engine.chord_reveal((1, 1)).unwrap(), RevealOutcome::HitTarget);
        assert_eq!(engine.display_at((0, 0)), DisplayKind::Target);
        assert_eq!(engine.display_at((2, 2)), DisplayKind::IncorrectFlag);
    }

    #[test]
    fn chord_reveal_on_hidden_cell_does_nothing() {
        let mut engine = engine((3, 3), &[(0, 0)]);

        assert_eq!(engine.chord_reveal((2, 2)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine.explored_count(), 0);
    }

    #[test]
    fn flag_counter_goes_negative() {
        let mut engine = engine((4, 4), &[(3, 3)]);

        assert_eq!(engine.remaining_flags(), 1);
        engine.toggle_flag((3, 3)).unwrap();
        assert_eq!(engine.remaining_flags(), 0);
        engine.toggle_flag((3, 3)).unwrap();
        assert_eq!(engine.remaining_flags(), 1);

        for col in 0..3 {
            engine.toggle_flag((3, col)).unwrap();
        }
        assert_eq!(engine.remaining_flags(), -2);
    }

    #[test]
    fn flagging_explored_cell_is_rejected() {
        let mut engine = engine((4, 4), &[(3, 3)]);

        engine.reveal((0, 0)).unwrap();

        assert_eq!(engine.toggle_flag((0, 0)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(engine.remaining_flags(), 1);
        assert!(!engine.is_flagged((0, 0)));
    }

    #[test]
    fn finished_game_rejects_moves() {
        let mut engine = engine((4, 4), &[(3, 3)]);
        engine.reveal((3, 3)).unwrap();

        assert_eq!(engine.reveal((0, 0)), Err(GameError::AlreadyEnded));
        assert_eq!(engine.chord_reveal((0, 0)), Err(GameError::AlreadyEnded));
        assert_eq!(engine.toggle_flag((3, 3)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let mut engine = engine((4, 4), &[(3, 3)]);

        assert_eq!(engine.reveal((4, 0)), Err(GameError::InvalidCoords));
        assert_eq!(engine.toggle_flag((0, 9)), Err(GameError::InvalidCoords));
        assert_eq!(engine.explored_count(), 0);
    }

    #[test]
    fn not_started_accepts_flags_but_not_reveals() {
        let config = GameConfig::new((4, 4), 1, 1, 1).unwrap();
        let mut engine = PlayEngine::new(&config);

        assert_eq!(engine.reveal((0, 0)), Err(GameError::NotStarted));
        assert_eq!(engine.toggle_flag((2, 2)).unwrap(), FlagOutcome::Flagged);
        assert!(engine.grid().is_none());

        let grid = Grid::from_targets((4, 4), &[((3, 3), 1)]).unwrap();
        engine.start(grid).unwrap();

        assert_eq!(engine.state(), GameState::InProgress);
        assert!(engine.is_flagged((2, 2)));
        assert_eq!(engine.remaining_flags(), 0);
    }

    #[test]
    fn start_rejects_mismatched_layout() {
        let config = GameConfig::new((4, 4), 1, 1, 1).unwrap();
        let mut engine = PlayEngine::new(&config);

        assert_eq!(
            engine.start(Grid::new((5, 4))),
            Err(GameError::InvalidBoardShape)
        );
        assert!(matches!(
            engine.start(Grid::new((4, 4))),
            Err(GameError::TargetCountMismatch { .. })
        ));
        engine
            .start(Grid::from_targets((4, 4), &[((0, 3), 1)]).unwrap())
            .unwrap();
        assert_eq!(
            engine.start(Grid::from_targets((4, 4), &[((0, 3), 1)]).unwrap()),
            Err(GameError::AlreadyStarted)
        );
    }
}
