//! Root-parallel search scheduler.
//!
//! Launches `number_of_threads` workers on scoped threads, each with its own
//! tree, state copy and forked RNG. The workers share nothing but the
//! budget. Once all of them have returned, their root children are merged
//! move by move and the most visited move is chosen.

use std::any::Any;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::core::GameRng;
use crate::rules::GameState;

use super::budget::SearchBudget;
use super::config::SearchConfig;
use super::error::SearchError;
use super::stats::{MoveStats, SearchStats};
use super::worker::{SearchWorker, WorkerReport};

/// Result of one move decision.
#[derive(Clone, Debug)]
pub struct SearchDecision<M> {
    /// Recommended move.
    pub best_move: M,

    /// Merged visit count of `best_move`.
    pub best_visits: u64,

    /// Merged win score of `best_move`, for the player making it.
    pub best_wins: f64,

    /// Merged statistics for every root move any worker expanded,
    /// ordered by move.
    pub candidates: Vec<MoveStats<M>>,

    /// Aggregated iteration statistics.
    pub stats: SearchStats,
}

impl<M> SearchDecision<M> {
    /// Win rate of the chosen move.
    #[must_use]
    pub fn best_win_rate(&self) -> f64 {
        if self.best_visits == 0 {
            0.0
        } else {
            self.best_wins / self.best_visits as f64
        }
    }

    /// Fraction of all root visits that went to the chosen move.
    #[must_use]
    pub fn best_visit_share(&self) -> f64 {
        let total: u64 = self.candidates.iter().map(|c| c.visits).sum();
        if total == 0 {
            0.0
        } else {
            self.best_visits as f64 / total as f64
        }
    }
}

/// Main search entry point.
///
/// Holds the configuration; every call to [`MCTSSearch::search`] builds
/// fresh trees and drops them before returning.
#[derive(Clone, Debug, Default)]
pub struct MCTSSearch {
    config: SearchConfig,
}

impl MCTSSearch {
    /// Create a search with the given configuration.
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Choose a move for the player to move in `state`.
    pub fn search<S: GameState>(&self, state: &S) -> Result<SearchDecision<S::Move>, SearchError> {
        let limits = self.config.validate()?;

        let moves = state.moves();
        if !state.has_moves() || moves.is_empty() {
            return Err(SearchError::TerminalRoot);
        }

        // Single legal move: nothing to search
        if let [only] = moves.as_slice() {
            debug!(mv = ?only, "Single legal move, skipping search");
            return Ok(SearchDecision {
                best_move: only.clone(),
                best_visits: 0,
                best_wins: 0.0,
                candidates: vec![MoveStats {
                    mv: only.clone(),
                    visits: 0,
                    wins: 0.0,
                }],
                stats: SearchStats::default(),
            });
        }

        let start = Instant::now();
        let budget = SearchBudget::new(limits, self.config.iteration_scope);
        let reports = self.run_workers(state, &budget)?;

        let mut stats = SearchStats::default();
        for report in &reports {
            stats.absorb(&report.stats);
        }
        stats.time_us = start.elapsed().as_micros() as u64;
        debug!(
            iterations = stats.iterations,
            nodes = reports.iter().map(|r| r.tree.node_count).sum::<usize>(),
            terminal_nodes = reports.iter().map(|r| r.tree.terminal_count).sum::<usize>(),
            "Workers joined"
        );

        let per_worker: Vec<Vec<MoveStats<S::Move>>> =
            reports.into_iter().map(|r| r.root_children).collect();
        let candidates = merge_root_stats(&per_worker);

        let best = select_best(&candidates)
            .cloned()
            .ok_or(SearchError::TerminalRoot)?;

        if self.config.verbose {
            report_candidates(&candidates, &best, &stats);
        }

        Ok(SearchDecision {
            best_move: best.mv,
            best_visits: best.visits,
            best_wins: best.wins,
            candidates,
            stats,
        })
    }

    /// Spawn one worker per thread and wait for all of them.
    fn run_workers<S: GameState>(
        &self,
        state: &S,
        budget: &SearchBudget,
    ) -> Result<Vec<WorkerReport<S::Move>>, SearchError> {
        let mut seeder = GameRng::new(self.config.seed);
        let workers: Vec<SearchWorker<S>> = (0..self.config.number_of_threads)
            .map(|id| {
                SearchWorker::new(
                    id,
                    state.clone(),
                    seeder.fork(),
                    self.config.exploration_constant,
                )
            })
            .collect();

        let results: Vec<Result<WorkerReport<S::Move>, SearchError>> = std::thread::scope(|scope| {
            let handles: Vec<_> = workers
                .into_iter()
                .enumerate()
                .map(|(id, worker)| {
                    scope.spawn(move || {
                        // Raise the stop flag from the dying thread itself
                        let run = panic::catch_unwind(AssertUnwindSafe(|| worker.run(budget)));
                        run.unwrap_or_else(|payload| {
                            budget.stop();
                            warn!(
                                worker = id,
                                panic = panic_message(&*payload),
                                "Search worker panicked"
                            );
                            Err(SearchError::WorkerPanicked(id))
                        })
                    })
                })
                .collect();

            handles
                .into_iter()
                .enumerate()
                .map(|(id, handle)| {
                    handle.join().unwrap_or_else(|_| {
                        budget.stop();
                        Err(SearchError::WorkerPanicked(id))
                    })
                })
                .collect()
        });

        results.into_iter().collect()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

/// Choose a move for `state` with `config`.
///
/// Convenience wrapper around [`MCTSSearch::search`].
pub fn compute_move<S: GameState>(
    state: &S,
    config: &SearchConfig,
) -> Result<SearchDecision<S::Move>, SearchError> {
    MCTSSearch::new(config.clone()).search(state)
}

/// Merge root-children statistics of several workers.
///
/// Visits and wins of the same move are summed over the workers that
/// expanded it. The result is ordered by move.
pub fn merge_root_stats<M>(per_worker: &[Vec<MoveStats<M>>]) -> Vec<MoveStats<M>>
where
    M: Clone + Eq + Ord + Hash,
{
    let mut merged: FxHashMap<M, (u64, f64)> = FxHashMap::default();

    for stats in per_worker.iter().flatten() {
        let entry = merged.entry(stats.mv.clone()).or_insert((0, 0.0));
        entry.0 += stats.visits;
        entry.1 += stats.wins;
    }

    let mut candidates: Vec<MoveStats<M>> = merged
        .into_iter()
        .map(|(mv, (visits, wins))| MoveStats { mv, visits, wins })
        .collect();
    candidates.sort_by(|a, b| a.mv.cmp(&b.mv));
    candidates
}

/// Robust-child selection: most visits, then best win rate, then the
/// smallest move.
pub fn select_best<M: Ord>(candidates: &[MoveStats<M>]) -> Option<&MoveStats<M>> {
    candidates.iter().max_by(|a, b| {
        a.visits
            .cmp(&b.visits)
            .then_with(|| a.win_rate().total_cmp(&b.win_rate()))
            .then_with(|| b.mv.cmp(&a.mv))
    })
}

fn report_candidates<M: std::fmt::Debug>(
    candidates: &[MoveStats<M>],
    best: &MoveStats<M>,
    stats: &SearchStats,
) {
    let total: u64 = candidates.iter().map(|c| c.visits).sum();

    let mut ranked: Vec<&MoveStats<M>> = candidates.iter().collect();
    ranked.sort_by(|a, b| b.visits.cmp(&a.visits));

    for c in ranked {
        info!(
            mv = ?c.mv,
            visits = c.visits,
            visit_pct = 100.0 * c.visits as f64 / total.max(1) as f64,
            win_pct = 100.0 * c.win_rate(),
            "Candidate move"
        );
    }

    info!(
        best = ?best.mv,
        visits = best.visits,
        win_pct = 100.0 * best.win_rate(),
        iterations = stats.iterations,
        workers = stats.workers,
        elapsed_ms = stats.time_us / 1000,
        iterations_per_second = stats.iterations_per_second() as u64,
        "Search decision"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(mv: u8, visits: u64, wins: f64) -> MoveStats<u8> {
        MoveStats { mv, visits, wins }
    }

    #[test]
    fn test_merge_sums_same_move() {
        let merged = merge_root_stats(&[vec![stats(3, 10, 6.0)], vec![stats(3, 5, 1.0)]]);
        assert_eq!(merged, vec![stats(3, 15, 7.0)]);
    }

    #[test]
    fn test_merge_keeps_partial_moves() {
        let merged = merge_root_stats(&[
            vec![stats(1, 4, 2.0), stats(2, 6, 3.0)],
            vec![stats(2, 1, 1.0)],
            vec![],
            vec![stats(9, 2, 0.5)],
        ]);
        assert_eq!(
            merged,
            vec![stats(1, 4, 2.0), stats(2, 7, 4.0), stats(9, 2, 0.5)]
        );
    }

    #[test]
    fn test_merge_empty() {
        let merged: Vec<MoveStats<u8>> = merge_root_stats(&[vec![], vec![]]);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_select_best_by_visits() {
        let candidates = vec![stats(1, 10, 9.0), stats(2, 20, 2.0)];
        assert_eq!(select_best(&candidates).unwrap().mv, 2);
    }

    #[test]
    fn test_select_best_tie_breaks() {
        // Equal visits: higher win rate wins
        let candidates = vec![stats(1, 10, 4.0), stats(2, 10, 6.0)];
        assert_eq!(select_best(&candidates).unwrap().mv, 2);

        // Equal visits and win rate: smallest move wins
        let candidates = vec![stats(5, 10, 5.0), stats(2, 10, 5.0), stats(7, 10, 5.0)];
        assert_eq!(select_best(&candidates).unwrap().mv, 2);
    }

    #[test]
    fn test_select_best_empty() {
        let candidates: Vec<MoveStats<u8>> = vec![];
        assert!(select_best(&candidates).is_none());
    }

    #[test]
    fn test_decision_ratios() {
        let decision = SearchDecision {
            best_move: 1u8,
            best_visits: 30,
            best_wins: 15.0,
            candidates: vec![stats(1, 30, 15.0), stats(2, 10, 1.0)],
            stats: SearchStats::default(),
        };
        assert_eq!(decision.best_win_rate(), 0.5);
        assert_eq!(decision.best_visit_share(), 0.75);
    }
}
