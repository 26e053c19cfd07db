//! Monte Carlo Tree Search for two-player games.
//!
//! ## Overview
//!
//! Canonical UCT with root parallelization:
//!
//! - **UCB1 selection** with a fixed exploration constant (default √2)
//! - **One expansion per iteration**, untried moves picked with the
//!   worker's seeded RNG
//! - **Uniform random playouts** to the end of the game
//! - **Root parallelization**: every worker grows its own tree; only the
//!   root children's statistics are merged
//! - **Shared budget**: iteration count and/or wall-clock deadline checked
//!   between iterations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rust_gomoku::games::gomoku::GomokuState;
//! use rust_gomoku::mcts::{MCTSSearch, SearchConfig};
//!
//! let state = GomokuState::new(9)?;
//! let search = MCTSSearch::new(SearchConfig::default().with_max_iterations(2000));
//!
//! let decision = search.search(&state)?;
//! println!(
//!     "Best move: {} ({} visits, {:.1}% wins)",
//!     decision.best_move,
//!     decision.best_visits,
//!     100.0 * decision.best_win_rate()
//! );
//! ```

pub mod budget;
pub mod config;
pub mod error;
pub mod node;
pub mod search;
pub mod stats;
pub mod tree;
pub mod worker;

// Re-export main types
pub use budget::SearchBudget;
pub use config::{IterationScope, SearchConfig, ValidatedLimits};
pub use error::SearchError;
pub use node::{NodeId, SearchNode};
pub use search::{compute_move, merge_root_stats, select_best, MCTSSearch, SearchDecision};
pub use stats::{MoveStats, SearchStats};
pub use tree::{SearchTree, TreeStats};
pub use worker::{SearchWorker, WorkerReport};
