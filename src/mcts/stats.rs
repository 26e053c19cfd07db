//! Search statistics for reporting, diagnostics and dataset generation.

use serde::{Deserialize, Serialize};

/// Visit and win totals for one root move.
///
/// `wins` is from the perspective of the player who makes `mv`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveStats<M> {
    /// The root move.
    pub mv: M,

    /// Simulations that started with this move.
    pub visits: u64,

    /// Sum of their outcomes for the moving player.
    pub wins: f64,
}

impl<M> MoveStats<M> {
    /// Empirical win rate (0.0 if never visited).
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins / self.visits as f64
        }
    }
}

/// Statistics collected during one search.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Total iterations (simulations) performed.
    pub iterations: u64,

    /// Nodes expanded (added to trees).
    pub nodes_expanded: u64,

    /// Number of workers that took part.
    pub workers: usize,

    /// Maximum tree depth reached by any worker.
    pub max_depth: u16,

    /// Total time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold another worker's statistics into these.
    pub fn absorb(&mut self, other: &SearchStats) {
        self.iterations += other.iterations;
        self.nodes_expanded += other.nodes_expanded;
        self.workers += other.workers;
        self.max_depth = self.max_depth.max(other.max_depth);
        self.time_us = self.time_us.max(other.time_us);
    }

    /// Calculate iterations per second.
    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.iterations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }
}
