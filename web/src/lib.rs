use clap::Parser;
use std::sync::OnceLock;
use wasm_bindgen::prelude::*;

pub use game::FindersGame;

mod game;
mod utils;

#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Level the page starts with
    #[arg(short, long)]
    difficulty: Option<finders_core::Difficulty>,
}

static ARGS: OnceLock<Args> = OnceLock::new();

impl Args {
    /// Parsed once per page load.
    fn get() -> &'static Self {
        ARGS.get_or_init(Self::from_location)
    }

    /// Arguments come from the location hash, e.g. `#-vvv&--seed=42`.
    fn from_location() -> Self {
        let window: web_sys::Window = gloo::utils::window();
        let location_hash = window.location().hash().unwrap_or_default();
        Self::try_parse_from(location_hash.split(['#', '&'])).unwrap_or_default()
    }
}

#[wasm_bindgen(start)]
pub fn run_app() {
    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let args = Args::get();
    if let Some(log_level) = args.verbose.log_level() {
        if let Err(err) = console_log::init_with_level(log_level) {
            gloo::console::warn!(err.to_string());
        }
    }
    log::debug!("seed: {:?}", args.seed);
    log::debug!("difficulty: {:?}", args.difficulty);
    log::debug!("App started");
}

/// Level the page should select on load, `easy` unless the location hash says otherwise.
#[wasm_bindgen]
pub fn initial_difficulty() -> String {
    Args::get()
        .difficulty
        .unwrap_or_default()
        .name()
        .to_string()
}
