//! # rust-gomoku
//!
//! A root-parallel Monte Carlo Tree Search engine for two-player games, with
//! gomoku self-play on top.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic Search**: The engine only sees the `GameState` trait.
//!    Moves are opaque tokens; outcomes are `0.0`, `0.5` or `1.0`.
//!
//! 2. **Share Nothing While Searching**: Each worker owns its tree, state
//!    copy and RNG. Workers share only the budget, and only root statistics
//!    are merged at the end.
//!
//! 3. **Reproducible**: A fixed seed with one worker reproduces the whole
//!    decision.
//!
//! ## Modules
//!
//! - `core`: Players, RNG, configuration files
//! - `rules`: `GameState` trait and outcomes
//! - `mcts`: UCT search, budget and parallel scheduler
//! - `games`: Gomoku
//! - `training`: Self-play driver and dataset writer

pub mod core;
pub mod games;
pub mod mcts;
pub mod rules;
pub mod training;

// Re-export commonly used types
pub use crate::core::{ConfigError, ConfigFile, GameRng, PlayerId};

pub use crate::rules::{GameResult, GameState, MoveError, Outcome};

pub use crate::mcts::{
    compute_move, IterationScope, MCTSSearch, MoveStats, SearchConfig, SearchDecision,
    SearchError, SearchStats,
};

pub use crate::games::gomoku::{GomokuMove, GomokuState};

pub use crate::training::{
    CancellationToken, DatasetWriter, DriverError, SelfPlayConfig, SelfPlayDriver,
};
