//! Color pool management
//!
//! A finite set of display colors handed out to users as they claim a name
//! and returned for reuse when they disconnect.

use rand::seq::SliceRandom;

/// The fixed set of assignable user colors.
pub const PALETTE: [&str; 7] = [
    "red", "green", "blue", "magenta", "purple", "plum", "orange",
];

/// Color assigned when the pool is exhausted.
///
/// Not a palette member; it is never released back into the pool.
pub const FALLBACK_COLOR: &str = "gray";

/// Pool of currently unassigned colors
///
/// Starts as a shuffled copy of [`PALETTE`] so color assignment order is not
/// deterministic across server runs. Every palette color is either held by
/// exactly one named session or present here.
#[derive(Debug)]
pub struct ColorPool {
    available: Vec<String>,
}

impl ColorPool {
    /// Create a pool containing the full palette in random order
    pub fn new() -> Self {
        let mut available: Vec<String> = PALETTE.iter().map(|c| c.to_string()).collect();
        available.shuffle(&mut rand::thread_rng());
        Self { available }
    }

    /// Take one color out of the pool
    ///
    /// Returns `None` when the pool is exhausted.
    pub fn acquire(&mut self) -> Option<String> {
        if self.available.is_empty() {
            None
        } else {
            Some(self.available.remove(0))
        }
    }

    /// Return a previously acquired color for reuse
    pub fn release(&mut self, color: String) {
        self.available.push(color);
    }

    /// Number of colors currently unassigned
    pub fn remaining(&self) -> usize {
        self.available.len()
    }
}

impl Default for ColorPool {
    fn default() -> Self {
        Self::new()
    }
}
