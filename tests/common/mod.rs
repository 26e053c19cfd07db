//! Shared test games.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rust_gomoku::core::{GameRng, PlayerId};
use rust_gomoku::rules::{GameResult, GameState, MoveError, Outcome};

/// Stones in a row needed to win on a line.
pub const LINE_WIN: usize = 5;

/// One-dimensional gomoku: players alternately claim cells of a line and
/// the first to own `LINE_WIN` adjacent cells wins. A full line without a
/// winner is a draw.
#[derive(Clone, Debug)]
pub struct LineGame {
    cells: Vec<Option<PlayerId>>,
    to_move: PlayerId,
    winner: Option<PlayerId>,
}

impl LineGame {
    /// Empty line of `len` cells, X to move.
    pub fn new(len: usize) -> Self {
        Self {
            cells: vec![None; len],
            to_move: PlayerId::FIRST,
            winner: None,
        }
    }

    /// Build a position from a picture like `"XXXX..OOOO."`.
    ///
    /// X moves first, so X is to move when both have the same number of
    /// stones.
    pub fn from_cells(picture: &str) -> Self {
        let cells: Vec<Option<PlayerId>> = picture
            .chars()
            .map(|c| match c {
                'X' => Some(PlayerId::FIRST),
                'O' => Some(PlayerId::SECOND),
                _ => None,
            })
            .collect();

        let xs = cells.iter().filter(|c| **c == Some(PlayerId::FIRST)).count();
        let os = cells.iter().filter(|c| **c == Some(PlayerId::SECOND)).count();
        let to_move = if xs > os {
            PlayerId::SECOND
        } else {
            PlayerId::FIRST
        };

        let mut game = Self {
            cells,
            to_move,
            winner: None,
        };
        game.winner = PlayerId::both().find(|&p| game.longest_run(p) >= LINE_WIN);
        game
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, i: usize) -> Option<PlayerId> {
        self.cells[i]
    }

    pub fn game_result(&self) -> Option<GameResult> {
        match self.winner {
            Some(p) => Some(GameResult::Winner(p)),
            None if self.cells.iter().all(Option::is_some) => Some(GameResult::Draw),
            None => None,
        }
    }

    fn longest_run(&self, player: PlayerId) -> usize {
        let mut best = 0;
        let mut run = 0;
        for cell in &self.cells {
            if *cell == Some(player) {
                run += 1;
                best = best.max(run);
            } else {
                run = 0;
            }
        }
        best
    }

    fn place(&mut self, i: usize) {
        let player = self.to_move;
        self.cells[i] = Some(player);
        if self.longest_run(player) >= LINE_WIN {
            self.winner = Some(player);
        }
        self.to_move = player.opponent();
    }
}

impl GameState for LineGame {
    type Move = usize;

    fn player_to_move(&self) -> PlayerId {
        self.to_move
    }

    fn has_moves(&self) -> bool {
        self.winner.is_none() && self.cells.iter().any(Option::is_none)
    }

    fn moves(&self) -> Vec<usize> {
        if self.winner.is_some() {
            return Vec::new();
        }
        (0..self.cells.len())
            .filter(|&i| self.cells[i].is_none())
            .collect()
    }

    fn do_move(&mut self, mv: &usize) -> Result<(), MoveError> {
        match self.cells.get(*mv) {
            None => Err(MoveError::InvalidMove(format!("cell {mv} is off the line"))),
            Some(Some(_)) => Err(MoveError::InvalidMove(format!("cell {mv} is taken"))),
            Some(None) if self.winner.is_some() => {
                Err(MoveError::InvalidMove("game is over".to_string()))
            }
            Some(None) => {
                self.place(*mv);
                Ok(())
            }
        }
    }

    fn do_random_move(&mut self, rng: &mut GameRng) -> usize {
        let moves = self.moves();
        let mv = moves[rng.gen_range_usize(0..moves.len())];
        self.place(mv);
        mv
    }

    fn result(&self, perspective: PlayerId) -> Outcome {
        match self.winner {
            Some(p) => GameResult::Winner(p).outcome_for(perspective),
            None => Outcome::DRAW,
        }
    }
}

/// A game whose moves always fail to apply.
#[derive(Clone, Debug)]
pub struct RejectingGame;

impl GameState for RejectingGame {
    type Move = u8;

    fn player_to_move(&self) -> PlayerId {
        PlayerId::FIRST
    }

    fn has_moves(&self) -> bool {
        true
    }

    fn moves(&self) -> Vec<u8> {
        vec![0, 1, 2]
    }

    fn do_move(&mut self, mv: &u8) -> Result<(), MoveError> {
        Err(MoveError::InvalidMove(format!("move {mv} rejected")))
    }

    fn do_random_move(&mut self, _rng: &mut GameRng) -> u8 {
        0
    }

    fn result(&self, _perspective: PlayerId) -> Outcome {
        Outcome::DRAW
    }
}

/// A game that panics as soon as a move is applied.
#[derive(Clone, Debug)]
pub struct PanickingGame;

impl GameState for PanickingGame {
    type Move = u8;

    fn player_to_move(&self) -> PlayerId {
        PlayerId::FIRST
    }

    fn has_moves(&self) -> bool {
        true
    }

    fn moves(&self) -> Vec<u8> {
        vec![0, 1]
    }

    fn do_move(&mut self, _mv: &u8) -> Result<(), MoveError> {
        panic!("move application failed");
    }

    fn do_random_move(&mut self, _rng: &mut GameRng) -> u8 {
        panic!("move application failed");
    }

    fn result(&self, _perspective: PlayerId) -> Outcome {
        Outcome::DRAW
    }
}

/// A line game whose first random move, across all clones, panics.
///
/// Only one worker of a search fails; the others keep going until told to
/// stop.
#[derive(Clone, Debug)]
pub struct PanicOnce {
    game: LineGame,
    fired: Arc<AtomicBool>,
}

impl PanicOnce {
    pub fn new(game: LineGame) -> Self {
        Self {
            game,
            fired: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl GameState for PanicOnce {
    type Move = usize;

    fn player_to_move(&self) -> PlayerId {
        self.game.player_to_move()
    }

    fn has_moves(&self) -> bool {
        self.game.has_moves()
    }

    fn moves(&self) -> Vec<usize> {
        self.game.moves()
    }

    fn do_move(&mut self, mv: &usize) -> Result<(), MoveError> {
        self.game.do_move(mv)
    }

    fn do_random_move(&mut self, rng: &mut GameRng) -> usize {
        if !self.fired.swap(true, Ordering::SeqCst) {
            panic!("random move failed");
        }
        self.game.do_random_move(rng)
    }

    fn result(&self, perspective: PlayerId) -> Outcome {
        self.game.result(perspective)
    }
}
