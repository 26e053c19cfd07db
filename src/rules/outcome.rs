//! Game results and per-player outcomes.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Draw (no winner).
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        matches!(self, GameResult::Winner(p) if *p == player)
    }

    /// The outcome of this result from `perspective`'s point of view.
    #[must_use]
    pub fn outcome_for(&self, perspective: PlayerId) -> Outcome {
        match self {
            GameResult::Draw => Outcome::DRAW,
            GameResult::Winner(p) if *p == perspective => Outcome::WIN,
            GameResult::Winner(_) => Outcome::LOSS,
        }
    }
}

/// Scalar game outcome in `{0.0, 0.5, 1.0}` from a given player's
/// perspective.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Outcome(f64);

impl Outcome {
    pub const LOSS: Outcome = Outcome(0.0);
    pub const DRAW: Outcome = Outcome(0.5);
    pub const WIN: Outcome = Outcome(1.0);

    /// The same outcome seen from the other player.
    #[inline]
    #[must_use]
    pub fn flip(self) -> Self {
        Self(1.0 - self.0)
    }

    /// Translate an outcome expressed for `from` into `to`'s perspective.
    #[inline]
    #[must_use]
    pub fn for_player(self, from: PlayerId, to: PlayerId) -> Self {
        if from == to {
            self
        } else {
            self.flip()
        }
    }

    /// Raw value.
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}
