//! Single-tree search worker.
//!
//! A worker owns one tree, one private copy of the root state and one RNG.
//! It runs select -> expand -> simulate -> backpropagate until the shared
//! budget refuses another iteration, then reports its root statistics.

use std::time::Instant;

use tracing::{debug, trace};

use crate::core::GameRng;
use crate::rules::GameState;

use super::budget::SearchBudget;
use super::error::SearchError;
use super::stats::{MoveStats, SearchStats};
use super::tree::{SearchTree, TreeStats};

/// What a worker hands back to the scheduler.
#[derive(Clone, Debug)]
pub struct WorkerReport<M> {
    /// Worker index.
    pub worker: usize,

    /// Statistics of the worker's root children.
    pub root_children: Vec<MoveStats<M>>,

    /// Iteration statistics.
    pub stats: SearchStats,

    /// Shape of the worker's tree when it stopped.
    pub tree: TreeStats,
}

/// One independent search loop.
pub struct SearchWorker<S: GameState> {
    id: usize,
    state: S,
    tree: SearchTree<S::Move>,
    rng: GameRng,
    exploration: f64,
    stats: SearchStats,
}

impl<S: GameState> SearchWorker<S> {
    /// Create a worker searching from `state`.
    pub fn new(id: usize, state: S, rng: GameRng, exploration: f64) -> Self {
        let tree = SearchTree::for_state(&state);
        Self {
            id,
            state,
            tree,
            rng,
            exploration,
            stats: SearchStats {
                workers: 1,
                ..SearchStats::default()
            },
        }
    }

    /// Run iterations until the budget is exhausted.
    ///
    /// A terminal root yields an empty report without any iteration. A game
    /// error stops the shared budget so the other workers wind down, and is
    /// returned.
    pub fn run(mut self, budget: &SearchBudget) -> Result<WorkerReport<S::Move>, SearchError> {
        let start = Instant::now();

        if self.tree.root_node().is_terminal {
            debug!(worker = self.id, "Root is terminal, nothing to search");
            return Ok(self.into_report());
        }

        while budget.try_begin(self.stats.iterations) {
            if let Err(e) = self.iteration() {
                budget.stop();
                return Err(e);
            }
            self.stats.iterations += 1;
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;

        let tree = self.tree.stats();
        debug!(
            worker = self.id,
            seed = self.rng.seed(),
            iterations = self.stats.iterations,
            nodes = tree.node_count,
            terminal_nodes = tree.terminal_count,
            fully_expanded = tree.fully_expanded_count,
            max_depth = tree.max_depth,
            "Search worker finished"
        );

        Ok(self.into_report())
    }

    /// Single MCTS iteration: select, expand, simulate, backpropagate.
    pub fn iteration(&mut self) -> Result<(), SearchError> {
        let mut state = self.state.clone();
        let mut current = self.tree.root();
        let mut depth: u16 = 0;

        // === SELECTION ===
        loop {
            let node = self.tree.get(current);
            if node.is_terminal || !node.is_fully_expanded() {
                break;
            }
            let Some(child) = self.tree.select_child(current, self.exploration) else {
                break;
            };
            if let Some(mv) = &self.tree.get(child).move_from_parent {
                state.do_move(mv)?;
            }
            current = child;
            depth += 1;
        }

        // === EXPANSION ===
        if !self.tree.get(current).is_terminal {
            if let Some(child) = self.tree.expand(current, &mut state, &mut self.rng)? {
                current = child;
                depth += 1;
                self.stats.nodes_expanded += 1;
            }
        }
        self.stats.max_depth = self.stats.max_depth.max(depth);

        // === SIMULATION ===
        let mut playout_len = 0u32;
        while state.has_moves() {
            state.do_random_move(&mut self.rng);
            playout_len += 1;
        }
        let perspective = self.tree.get(current).player_who_moved;
        let outcome = state.result(perspective);

        // === BACKPROPAGATION ===
        self.tree.backpropagate(current, outcome, perspective);

        trace!(
            worker = self.id,
            leaf = current.raw(),
            depth,
            playout_len,
            outcome = outcome.value(),
            "Simulation complete"
        );

        Ok(())
    }

    /// The worker's tree.
    #[must_use]
    pub fn tree(&self) -> &SearchTree<S::Move> {
        &self.tree
    }

    /// Iteration statistics so far.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    fn into_report(self) -> WorkerReport<S::Move> {
        WorkerReport {
            worker: self.id,
            root_children: self.tree.root_child_stats(),
            tree: self.tree.stats(),
            stats: self.stats,
        }
    }
}
