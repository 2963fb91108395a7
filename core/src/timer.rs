use serde::{Deserialize, Serialize};

/// Elapsed time stops counting here (16 minutes).
pub const MAX_ELAPSED_SECS: u16 = 960;

/// Seconds counter advanced by an external once-per-second tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElapsedTimer {
    seconds: u16,
    running: bool,
}

impl ElapsedTimer {
    pub const fn new() -> Self {
        Self {
            seconds: 0,
            running: false,
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            log::debug!("Timer started at {}s", self.seconds);
            self.running = true;
        }
    }

    pub fn stop(&mut self) {
        if self.running {
            log::debug!("Timer stopped at {}s", self.seconds);
            self.running = false;
        }
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub const fn elapsed_secs(&self) -> u16 {
        self.seconds
    }

    /// Advances one second while running, never past `MAX_ELAPSED_SECS`.
    pub fn tick(&mut self) -> u16 {
        if self.running {
            self.seconds = (self.seconds + 1).min(MAX_ELAPSED_SECS);
        }
        self.seconds
    }
}
