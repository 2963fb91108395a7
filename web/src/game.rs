use crate::utils::*;
use finders_core as game;
use gloo::timers::callback::Interval;
use js_sys::Function;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

const TICK_MILLIS: u32 = 1000;

fn pick_seed() -> u64 {
    crate::Args::get().seed.unwrap_or_else(js_random_seed)
}

/// Everything one redraw needs, collected while the game is borrowed so the page callbacks
/// run with no borrow held.
#[derive(Debug, Default, PartialEq)]
struct Frame {
    cells: Vec<game::CellUpdate>,
    markers: Option<String>,
    time: Option<String>,
}

impl Frame {
    fn full(game: &game::Game) -> Self {
        let (rows, cols) = game.config().size;
        let cells = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (row, col)))
            .map(|coords| game::CellUpdate {
                coords,
                kind: game.display_at(coords).unwrap_or_default(),
            })
            .collect();

        Self {
            cells,
            markers: Some(game.remaining_flags_display().to_string()),
            time: Some(game.elapsed_display().to_string()),
        }
    }

    fn after_move(game: &game::Game, update: game::Update) -> Self {
        Self {
            cells: update.changed,
            markers: Some(game.remaining_flags_display().to_string()),
            time: None,
        }
    }
}

/// Page callbacks the board is drawn through.
#[derive(Debug)]
struct Canvas {
    render_cell: Function,
    update_counter: Function,
}

impl Canvas {
    fn render_cell(&self, coords: game::Coord2, kind: game::DisplayKind) {
        let (row, col) = coords;
        let result = self.render_cell.call3(
            &JsValue::NULL,
            &JsValue::from(row),
            &JsValue::from(col),
            &JsValue::from_str(&css_class(kind)),
        );
        if let Err(err) = result {
            log::warn!("render_cell({}, {}) failed: {:?}", row, col, err);
        }
    }

    fn update_counter(&self, name: &str, text: &str) {
        let result = self.update_counter.call2(
            &JsValue::NULL,
            &JsValue::from_str(name),
            &JsValue::from_str(text),
        );
        if let Err(err) = result {
            log::warn!("update_counter({}) failed: {:?}", name, err);
        }
    }

    fn draw(&self, frame: &Frame) {
        log::trace!("Drawing {} cells", frame.cells.len());
        for cell in &frame.cells {
            self.render_cell(cell.coords, cell.kind);
        }
        if let Some(markers) = &frame.markers {
            self.update_counter("markers", markers);
        }
        if let Some(time) = &frame.time {
            self.update_counter("time", time);
        }
    }
}

#[derive(Debug)]
struct Session {
    game: game::Game,
    prev_time: u16,
}

impl Session {
    fn new(game: game::Game) -> Self {
        Self { game, prev_time: 0 }
    }

    fn tick(&mut self) -> Frame {
        let time = self.game.on_tick();
        if self.prev_time == time {
            return Frame::default();
        }
        self.prev_time = time;
        Frame {
            time: Some(self.game.elapsed_display().to_string()),
            ..Frame::default()
        }
    }

    /// Drops the running game entirely, the returned frame redraws the whole board.
    fn replace_game(&mut self, game: game::Game) -> Frame {
        *self = Self::new(game);
        Frame::full(&self.game)
    }
}

/// Game handle exposed to the page.
#[wasm_bindgen]
pub struct FindersGame {
    session: Rc<RefCell<Session>>,
    canvas: Rc<Canvas>,
    _timer_interval: Interval,
}

#[wasm_bindgen]
impl FindersGame {
    /// New game for a level selector value (`easy`, `medium`, `hard`).
    #[wasm_bindgen(constructor)]
    pub fn new(
        difficulty: &str,
        render_cell: Function,
        update_counter: Function,
    ) -> Result<FindersGame, JsError> {
        let difficulty: game::Difficulty = difficulty.parse()?;
        let game = game::Game::from_difficulty(difficulty, pick_seed())?;
        Ok(Self::with_game(game, render_cell, update_counter))
    }

    pub fn custom(
        rows: u8,
        columns: u8,
        targets: u16,
        min_value: u8,
        max_value: u8,
        render_cell: Function,
        update_counter: Function,
    ) -> Result<FindersGame, JsError> {
        let config = game::GameConfig::new((rows, columns), targets, min_value, max_value)?;
        let game = game::Game::new(config, pick_seed())?;
        Ok(Self::with_game(game, render_cell, update_counter))
    }

    pub fn set_difficulty(&self, difficulty: &str) -> Result<(), JsError> {
        let difficulty: game::Difficulty = difficulty.parse()?;
        let game = game::Game::from_difficulty(difficulty, pick_seed())?;
        log::debug!("Difficulty changed to {:?}", difficulty);
        self.replace_game(game);
        Ok(())
    }

    /// Fresh layout with the same board settings.
    pub fn restart(&self) -> Result<(), JsError> {
        let config = *self.session.borrow().game.config();
        let game = game::Game::new(config, pick_seed())?;
        self.replace_game(game);
        Ok(())
    }

    pub fn reveal(&self, row: i32, col: i32) -> String {
        self.play(row, col, game::Game::on_reveal)
    }

    pub fn chord_reveal(&self, row: i32, col: i32) -> String {
        self.play(row, col, game::Game::on_chord_reveal)
    }

    pub fn toggle_flag(&self, row: i32, col: i32) -> String {
        self.play(row, col, game::Game::on_toggle_flag)
    }

    /// Right click: chord on explored cells, flag otherwise.
    pub fn alternate(&self, row: i32, col: i32) -> String {
        self.play(row, col, game::Game::on_alternate)
    }

    pub fn state(&self) -> String {
        state_name(self.session.borrow().game.state()).to_string()
    }

    pub fn remaining_flags(&self) -> i32 {
        self.session.borrow().game.remaining_flags()
    }

    pub fn elapsed_secs(&self) -> u16 {
        self.session.borrow().game.elapsed_secs()
    }

    pub fn redraw(&self) {
        let frame = Frame::full(&self.session.borrow().game);
        self.canvas.draw(&frame);
    }
}

impl FindersGame {
    fn with_game(game: game::Game, render_cell: Function, update_counter: Function) -> Self {
        let canvas = Rc::new(Canvas {
            render_cell,
            update_counter,
        });
        canvas.draw(&Frame::full(&game));
        let session = Rc::new(RefCell::new(Session::new(game)));

        let timer_session = Rc::clone(&session);
        let timer_canvas = Rc::clone(&canvas);
        let timer_interval = Interval::new(TICK_MILLIS, move || {
            let frame = timer_session.borrow_mut().tick();
            timer_canvas.draw(&frame);
        });

        Self {
            session,
            canvas,
            _timer_interval: timer_interval,
        }
    }

    fn replace_game(&self, game: game::Game) {
        let frame = self.session.borrow_mut().replace_game(game);
        self.canvas.draw(&frame);
    }

    fn play(
        &self,
        row: i32,
        col: i32,
        action: impl FnOnce(&mut game::Game, game::Coord2) -> game::Update,
    ) -> String {
        let Some(coords) = to_coords(row, col) else {
            log::debug!("Ignored move outside the board: ({}, {})", row, col);
            return self.state();
        };

        let (state, frame) = {
            let mut session = self.session.borrow_mut();
            let update = action(&mut session.game, coords);
            (update.state, Frame::after_move(&session.game, update))
        };
        self.canvas.draw(&frame);
        state_name(state).to_string()
    }
}
