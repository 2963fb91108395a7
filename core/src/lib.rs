//! Board generation and reveal engine for a grid discovery game.
//!
//! Targets are placed on the first reveal, away from the clicked cell. Explored cells show
//! how many targets surround them, zero regions open up by themselves, and the game is won
//! once every safe cell is explored and exactly the targets carry flags.

#![no_std]

extern crate alloc;

pub use config::*;
pub use display::*;
pub use engine::*;
pub use error::*;
pub use game::*;
pub use generator::*;
pub use grid::*;
pub use timer::*;
pub use types::*;

mod config;
mod display;
mod engine;
mod error;
mod game;
mod generator;
mod grid;
mod timer;
mod types;
