//! Gomoku (five in a row) on square boards from 5x5 to 19x19.
//!
//! - X moves first, then players alternate placing one stone
//! - Five or more stones in a row, in any direction, win
//! - A full board without a winner is a draw
//!
//! Rows and columns are labelled `0-9` then `A-I`, so a move is typed as two
//! characters such as `4C` (row 4, column 12).

mod game;
mod moves;

pub use game::{GomokuError, GomokuState, DEFAULT_SIDE, MAX_SIDE, MIN_SIDE};
pub use moves::{GomokuMove, LABELS};
