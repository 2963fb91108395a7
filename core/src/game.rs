use alloc::vec::Vec;
use ndarray::Array2;

use crate::*;

/// One game from the first reveal to its end, with layout generation deferred until the
/// first reveal picks the safe spot.
///
/// Moves never fail: out-of-bounds coordinates and moves on a finished game leave
/// everything as it was and return an update with no changed cells.
#[derive(Clone, Debug)]
pub struct Game<G = RandomLayoutGenerator> {
    config: GameConfig,
    generator: G,
    engine: PlayEngine,
    timer: ElapsedTimer,
    view: Array2<DisplayKind>,
}

impl Game<RandomLayoutGenerator> {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_generator(config, RandomLayoutGenerator::new(seed))
    }

    pub fn from_difficulty(difficulty: Difficulty, seed: u64) -> Result<Self> {
        Self::new(difficulty.game_config(), seed)
    }
}

impl<G: LayoutGenerator> Game<G> {
    pub fn with_generator(config: GameConfig, generator: G) -> Result<Self> {
        config.validate()?;
        log::debug!(
            "New {:?} game with {} targets",
            config.size,
            config.targets
        );

        Ok(Self {
            config,
            generator,
            engine: PlayEngine::new(&config),
            timer: ElapsedTimer::new(),
            view: Array2::default(config.size.to_nd_index()),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn engine(&self) -> &PlayEngine {
        &self.engine
    }

    pub fn state(&self) -> GameState {
        self.engine.state()
    }

    pub fn remaining_flags(&self) -> i32 {
        self.engine.remaining_flags()
    }

    pub fn elapsed_secs(&self) -> u16 {
        self.timer.elapsed_secs()
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn remaining_flags_display(&self) -> CounterDisplay {
        CounterDisplay::from(self.remaining_flags())
    }

    pub fn elapsed_display(&self) -> CounterDisplay {
        CounterDisplay::from(self.elapsed_secs())
    }

    /// Last display kind handed out for `coords`, `None` when out of bounds.
    pub fn display_at(&self, coords: Coord2) -> Option<DisplayKind> {
        in_bounds(coords, self.config.size).then(|| self.view[coords.to_nd_index()])
    }

    /// Value of the target at `coords`, only disclosed once the game is over.
    pub fn target_value(&self, coords: Coord2) -> Option<TargetValue> {
        if !self.engine.is_finished() {
            return None;
        }
        match self.engine.grid()?[self.engine.validate_coords(coords).ok()?] {
            Cell::Target { value } => Some(value),
            Cell::Safe { .. } => None,
        }
    }

    /// Primary click. The first one generates the layout around `coords` and starts the timer.
    pub fn on_reveal(&mut self, coords: Coord2) -> Update {
        let result = self.try_reveal(coords);
        self.finish_move("reveal", coords, result)
    }

    /// Alternate click on an explored number.
    pub fn on_chord_reveal(&mut self, coords: Coord2) -> Update {
        let result = self.engine.chord_reveal(coords).map(|_| ());
        self.finish_move("chord reveal", coords, result)
    }

    /// Alternate click on an unexplored cell.
    pub fn on_toggle_flag(&mut self, coords: Coord2) -> Update {
        let result = self.engine.toggle_flag(coords).map(|_| ());
        self.finish_move("toggle flag", coords, result)
    }

    /// Alternate click: chord on explored cells, flag otherwise.
    pub fn on_alternate(&mut self, coords: Coord2) -> Update {
        if in_bounds(coords, self.config.size) && self.engine.is_explored(coords) {
            self.on_chord_reveal(coords)
        } else {
            self.on_toggle_flag(coords)
        }
    }

    /// Once-per-second tick from the scheduler, returns the capped elapsed seconds.
    pub fn on_tick(&mut self) -> u16 {
        self.timer.tick()
    }

    fn try_reveal(&mut self, coords: Coord2) -> Result<()> {
        let coords = self.engine.validate_coords(coords)?;

        if self.engine.state().is_ready() {
            // a flagged cell cannot be the first reveal
            if self.engine.is_flagged(coords) {
                return Ok(());
            }
            let grid = self.generator.generate(&self.config, coords)?;
            self.engine.start(grid)?;
            self.timer.start();
        }

        self.engine.reveal(coords).map(|_| ())
    }

    fn finish_move(&mut self, action: &str, coords: Coord2, result: Result<()>) -> Update {
        match result {
            Ok(()) => {}
            Err(err @ (GameError::InvalidCoords | GameError::AlreadyEnded)) => {
                log::debug!("Ignored {} at {:?}: {}", action, coords, err);
            }
            Err(err) => {
                log::error!("Failed {} at {:?}: {}", action, coords, err);
            }
        }

        if self.engine.is_finished() {
            self.timer.stop();
        }

        Update {
            state: self.engine.state(),
            changed: self.sync_view(),
        }
    }

    /// Refreshes the cached view and returns the cells that differ from it.
    fn sync_view(&mut self) -> Vec<CellUpdate> {
        let mut changed = Vec::new();
        let (rows, cols) = self.config.size;
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                let kind = self.engine.display_at(coords);
                let shown = &mut self.view[coords.to_nd_index()];
                if *shown != kind {
                    *shown = kind;
                    changed.push(CellUpdate { coords, kind });
                }
            }
        }
        changed
    }
}
