//! Game capability trait for game implementations.
//!
//! Games implement `GameState` to define:
//! - Legal moves for each state
//! - How moves modify state
//! - Win/loss/draw conditions
//!
//! The search engine calls into `GameState` but never interprets
//! game-specific concepts directly.

pub mod outcome;
pub mod state;

pub use outcome::{GameResult, Outcome};
pub use state::{GameState, MoveError};
