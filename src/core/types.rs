//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Instant;

/// Side length of the square button grid
pub const GRID_SIZE: usize = 9;

/// Highest pad color code the device understands
pub const MAX_COLOR_CODE: u8 = 63;

/// Index of one addressable LED strip
pub type StripIndex = usize;

/// Row/column of a button on the grid, (0, 0) at the bottom-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn is_valid(&self) -> bool {
        self.row < GRID_SIZE && self.col < GRID_SIZE
    }
}

/// Tempo handed to effects when a strip is bound
///
/// Passed explicitly through apply and bind calls instead of living in a
/// process-wide variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tempo {
    pub bpm: f64,
}

impl Tempo {
    pub fn new(bpm: f64) -> Self {
        Self { bpm }
    }

    /// Seconds between beats
    pub fn beat_secs(&self) -> f64 {
        if self.bpm > 0.0 {
            60.0 / self.bpm
        } else {
            0.0
        }
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self { bpm: 120.0 }
    }
}

/// Source of the monotonically advancing value behind `time()`
pub trait Clock {
    fn now_secs(&self) -> f64;
}

static PROCESS_START: OnceLock<Instant> = OnceLock::new();

/// Seconds since the first clock read in this process
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> f64 {
        PROCESS_START.get_or_init(Instant::now).elapsed().as_secs_f64()
    }
}

/// Clock frozen at a single reading
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now_secs(&self) -> f64 {
        self.0
    }
}
