//! Game state capability consumed by the search engine.
//!
//! Games implement `GameState` to expose:
//! - Whether the game is over and which moves are legal
//! - How a move changes the state
//! - The result once the game is over
//!
//! ## Implementation Notes
//!
//! - `moves`: Return empty iff `has_moves` is false
//! - `do_move`: Reject illegal moves with `MoveError::InvalidMove`
//! - `do_random_move`: Only called on non-terminal states
//! - `result`: Only called on terminal states
//! - `Clone` should be cheap: every search worker clones the root state
//!   once per simulation

use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;

use crate::core::{GameRng, PlayerId};

use super::outcome::Outcome;

/// Error returned when a move cannot be applied.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("invalid move: {0}")]
    InvalidMove(String),
}

/// State of a two-player, perfect-information, zero-sum game.
pub trait GameState: Clone + Send {
    /// Move identifier. The engine treats it as an opaque token.
    ///
    /// `Ord` gives the final move choice a deterministic tie-break.
    type Move: Clone + Eq + Ord + Hash + Debug + Send;

    /// The player whose turn it is.
    fn player_to_move(&self) -> PlayerId;

    /// False iff the game is over.
    fn has_moves(&self) -> bool;

    /// All legal moves. Empty iff `has_moves` is false.
    fn moves(&self) -> Vec<Self::Move>;

    /// Apply a move for the player to move.
    fn do_move(&mut self, mv: &Self::Move) -> Result<(), MoveError>;

    /// Apply a uniformly random legal move and return it.
    fn do_random_move(&mut self, rng: &mut GameRng) -> Self::Move;

    /// Outcome of a finished game from `perspective`'s point of view.
    fn result(&self, perspective: PlayerId) -> Outcome;
}
