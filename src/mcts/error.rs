//! Errors that can occur during a search.

use thiserror::Error;

use crate::rules::MoveError;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("cannot choose a move: the root state has no legal moves")]
    TerminalRoot,

    #[error("budget misconfiguration: {0}")]
    BudgetMisconfiguration(String),

    #[error("game rejected a move during search: {0}")]
    InvalidMove(#[from] MoveError),

    #[error("search worker {0} panicked")]
    WorkerPanicked(usize),
}
