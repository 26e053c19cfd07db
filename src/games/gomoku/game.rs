//! Gomoku game state.

use std::fmt;

use thiserror::Error;

use crate::core::{GameRng, PlayerId};
use crate::rules::{GameResult, GameState, MoveError, Outcome};

use super::moves::{label_char, GomokuMove};

/// Smallest supported board side.
pub const MIN_SIDE: usize = 5;

/// Largest supported board side (one label character per line).
pub const MAX_SIDE: usize = 19;

/// Default board side.
pub const DEFAULT_SIDE: usize = 9;

/// Stones in a row needed to win.
const WIN_LENGTH: usize = 5;

/// Error raised when creating a board.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GomokuError {
    #[error("board side must be between 5 and 19, got {0}")]
    BoardSize(usize),
}

/// Gomoku on a square board. X moves first.
///
/// Five or more stones in a row (horizontal, vertical or diagonal) win. A
/// full board without a winner is a draw.
#[derive(Clone, Debug)]
pub struct GomokuState {
    side: usize,
    /// Row-major cells.
    board: Vec<Option<PlayerId>>,
    to_move: PlayerId,
    /// Empty squares in row-major order.
    empty: Vec<GomokuMove>,
    last_move: Option<GomokuMove>,
    winner: Option<PlayerId>,
}

impl GomokuState {
    /// Create an empty board of the given side.
    pub fn new(side: usize) -> Result<Self, GomokuError> {
        if !(MIN_SIDE..=MAX_SIDE).contains(&side) {
            return Err(GomokuError::BoardSize(side));
        }

        Ok(Self::empty_board(side))
    }

    fn empty_board(side: usize) -> Self {
        let empty = (0..side as u8)
            .flat_map(|row| (0..side as u8).map(move |col| GomokuMove::new(row, col)))
            .collect();

        Self {
            side,
            board: vec![None; side * side],
            to_move: PlayerId::FIRST,
            empty,
            last_move: None,
            winner: None,
        }
    }

    /// Board side length.
    #[must_use]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Stone on a square, if any. Off-board squares are empty.
    #[must_use]
    pub fn stone(&self, row: usize, col: usize) -> Option<PlayerId> {
        if row < self.side && col < self.side {
            self.board[row * self.side + col]
        } else {
            None
        }
    }

    /// The most recent move.
    #[must_use]
    pub fn last_move(&self) -> Option<GomokuMove> {
        self.last_move
    }

    /// Number of stones on the board.
    #[must_use]
    pub fn stone_count(&self) -> usize {
        self.board.len() - self.empty.len()
    }

    /// Result of a finished game, `None` while it is still running.
    #[must_use]
    pub fn game_result(&self) -> Option<GameResult> {
        match self.winner {
            Some(player) => Some(GameResult::Winner(player)),
            None if self.empty.is_empty() => Some(GameResult::Draw),
            None => None,
        }
    }

    /// Board marker for a player.
    #[must_use]
    pub fn marker(player: PlayerId) -> char {
        if player == PlayerId::FIRST {
            'X'
        } else {
            'O'
        }
    }

    /// Cell encoding used for dataset lines: `0` empty, `1` X, `2` O, each
    /// followed by a comma, row by row.
    #[must_use]
    pub fn dataset_key(&self) -> String {
        let mut key = String::with_capacity(self.board.len() * 2);
        for cell in &self.board {
            key.push(match cell {
                None => '0',
                Some(p) if *p == PlayerId::FIRST => '1',
                Some(_) => '2',
            });
            key.push(',');
        }
        key
    }

    /// Place a stone for the player to move. The square must be empty and
    /// the game still running.
    fn place(&mut self, mv: GomokuMove) {
        let player = self.to_move;
        self.board[mv.row as usize * self.side + mv.col as usize] = Some(player);
        if let Some(pos) = self.empty.iter().position(|m| *m == mv) {
            self.empty.remove(pos);
        }
        self.last_move = Some(mv);

        if self.completes_line(mv, player) {
            self.winner = Some(player);
        }
        self.to_move = player.opponent();
    }

    /// Check the four lines through `mv` for a run of `WIN_LENGTH`.
    fn completes_line(&self, mv: GomokuMove, player: PlayerId) -> bool {
        const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

        DIRECTIONS.iter().any(|&(dr, dc)| {
            1 + self.run_length(mv, player, dr, dc) + self.run_length(mv, player, -dr, -dc)
                >= WIN_LENGTH
        })
    }

    /// Stones of `player` adjacent to `mv` walking in one direction.
    fn run_length(&self, mv: GomokuMove, player: PlayerId, dr: isize, dc: isize) -> usize {
        let mut row = mv.row as isize + dr;
        let mut col = mv.col as isize + dc;
        let mut count = 0;

        while row >= 0
            && col >= 0
            && self.stone(row as usize, col as usize) == Some(player)
        {
            count += 1;
            row += dr;
            col += dc;
        }
        count
    }
}

impl Default for GomokuState {
    fn default() -> Self {
        Self::empty_board(DEFAULT_SIDE)
    }
}

impl GameState for GomokuState {
    type Move = GomokuMove;

    fn player_to_move(&self) -> PlayerId {
        self.to_move
    }

    fn has_moves(&self) -> bool {
        self.winner.is_none() && !self.empty.is_empty()
    }

    fn moves(&self) -> Vec<GomokuMove> {
        if self.winner.is_some() {
            return Vec::new();
        }
        self.empty.clone()
    }

    fn do_move(&mut self, mv: &GomokuMove) -> Result<(), MoveError> {
        let (row, col) = (mv.row as usize, mv.col as usize);
        if row >= self.side || col >= self.side {
            return Err(MoveError::InvalidMove(format!(
                "{mv} is off the {0}x{0} board",
                self.side
            )));
        }
        if self.winner.is_some() {
            return Err(MoveError::InvalidMove(format!("{mv}: game is already over")));
        }
        if self.stone(row, col).is_some() {
            return Err(MoveError::InvalidMove(format!("{mv} is occupied")));
        }

        self.place(*mv);
        Ok(())
    }

    fn do_random_move(&mut self, rng: &mut GameRng) -> GomokuMove {
        debug_assert!(self.has_moves(), "random move requested on a finished game");
        let mv = self.empty[rng.gen_range_usize(0..self.empty.len())];
        self.place(mv);
        mv
    }

    fn result(&self, perspective: PlayerId) -> Outcome {
        match self.winner {
            Some(player) => GameResult::Winner(player).outcome_for(perspective),
            None => Outcome::DRAW,
        }
    }
}

impl fmt::Display for GomokuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for col in 0..self.side {
            write!(f, " {}", label_char(col as u8))?;
        }
        writeln!(f)?;

        for row in 0..self.side {
            write!(f, "{}|", label_char(row as u8))?;
            for col in 0..self.side {
                if col > 0 {
                    write!(f, " ")?;
                }
                let cell = self.stone(row, col).map_or('.', Self::marker);
                write!(f, "{cell}")?;
            }
            writeln!(f, "|")?;
        }

        writeln!(f, " +{}-+", "--".repeat(self.side - 1))?;
        write!(f, "{} to move", Self::marker(self.to_move))
    }
}
