//! Engine-vs-engine gomoku games for dataset generation.
//!
//! The driver plays rounds of games. Each round draws an iteration budget
//! uniformly from `[iterations_param1, iterations_param2]` and plays
//! `number_of_repeat` games in which both sides search with that budget.
//! After every move the board and the chosen move's statistics can be
//! appended to a [`DatasetWriter`].

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::core::{ConfigError, ConfigFile, GameRng, PlayerId};
use crate::games::gomoku::{GomokuError, GomokuMove, GomokuState, DEFAULT_SIDE};
use crate::mcts::{compute_move, SearchConfig, SearchError};
use crate::rules::{GameResult, GameState, MoveError};

use super::dataset::DatasetWriter;

/// Errors that end a self-play run.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("search error: {0}")]
    Search(#[from] SearchError),

    #[error("move error: {0}")]
    Move(#[from] MoveError),

    #[error("board error: {0}")]
    Board(#[from] GomokuError),

    #[error("dataset I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared flag asking a running driver to stop.
///
/// Clones share the flag. The driver checks it between moves, so a
/// cancelled run still finishes the search in progress.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Configuration for self-play.
#[derive(Clone, Debug)]
pub struct SelfPlayConfig {
    /// Lower bound of the per-round iteration budget.
    pub iterations_param1: u64,

    /// Upper bound of the per-round iteration budget (inclusive).
    pub iterations_param2: u64,

    /// Games per round.
    pub number_of_repeat: u32,

    /// Rounds to play. `None` runs until cancelled.
    pub number_of_rounds: Option<u64>,

    /// Search threads per move.
    pub number_of_threads: usize,

    /// Per-move time limit in seconds.
    pub max_time: Option<f64>,

    /// Rotate dataset files once they reach this many bytes.
    pub file_size: u64,

    /// Log every candidate move of every search.
    pub verbose: bool,

    /// Write dataset lines.
    pub make_dataset: bool,

    /// Directory for dataset files.
    pub dat_dir: PathBuf,

    /// Dataset file name prefix.
    pub file_prefix: String,

    /// Board side.
    pub board_size: usize,

    /// Seed for budgets and per-move search seeds. `None` draws one from
    /// the operating system.
    pub seed: Option<u64>,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            iterations_param1: 1_000,
            iterations_param2: 10_000,
            number_of_repeat: 1,
            number_of_rounds: None,
            number_of_threads: 8,
            max_time: None,
            file_size: 1024 * 1024,
            verbose: false,
            make_dataset: false,
            dat_dir: PathBuf::from("."),
            file_prefix: "gomoku_".to_string(),
            board_size: DEFAULT_SIDE,
            seed: None,
        }
    }
}

impl SelfPlayConfig {
    /// Create a new self-play config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a `key = value` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_config_file(&ConfigFile::load(path)?)
    }

    /// Build from parsed config entries. Absent keys keep their defaults.
    ///
    /// `max_iterations` sets both iteration bounds; explicit
    /// `iterations_param1`/`iterations_param2` take precedence. A
    /// non-positive `max_time` disables the time limit.
    pub fn from_config_file(file: &ConfigFile) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(n) = file.get_parsed::<u64>("max_iterations")? {
            config.iterations_param1 = n;
            config.iterations_param2 = n;
        }
        if let Some(n) = file.get_parsed("iterations_param1")? {
            config.iterations_param1 = n;
        }
        if let Some(n) = file.get_parsed("iterations_param2")? {
            config.iterations_param2 = n;
        }
        if let Some(n) = file.get_parsed("number_of_repeat")? {
            config.number_of_repeat = n;
        }
        if let Some(n) = file.get_parsed("number_of_rounds")? {
            config.number_of_rounds = Some(n);
        }
        if let Some(n) = file.get_parsed("number_of_threads")? {
            config.number_of_threads = n;
        }
        if let Some(t) = file.get_parsed::<f64>("max_time")? {
            config.max_time = (t > 0.0).then_some(t);
        }
        if let Some(kib) = file.get_parsed::<u64>("file_size(K)")? {
            config.file_size = kib * 1024;
        }
        if let Some(flag) = file.get_flag("verbose") {
            config.verbose = flag;
        }
        if let Some(flag) = file.get_flag("make_dataset") {
            config.make_dataset = flag;
        }
        if let Some(dir) = file.get("dat_dir") {
            config.dat_dir = PathBuf::from(dir);
        }
        if let Some(prefix) = file.get("file_prefix") {
            config.file_prefix = prefix.to_string();
        }
        if let Some(n) = file.get_parsed("board_size")? {
            config.board_size = n;
        }
        if let Some(seed) = file.get_parsed("seed")? {
            config.seed = Some(seed);
        }

        if config.iterations_param2 < config.iterations_param1 {
            return Err(ConfigError::InvalidValue {
                key: "iterations_param2".to_string(),
                value: config.iterations_param2.to_string(),
            });
        }

        Ok(config)
    }

    /// Set both iteration bounds.
    pub fn with_iterations(mut self, low: u64, high: u64) -> Self {
        self.iterations_param1 = low;
        self.iterations_param2 = high;
        self
    }

    /// Set games per round.
    pub fn with_repeat(mut self, games: u32) -> Self {
        self.number_of_repeat = games;
        self
    }

    /// Set the number of rounds.
    pub fn with_rounds(mut self, rounds: u64) -> Self {
        self.number_of_rounds = Some(rounds);
        self
    }

    /// Set search threads per move.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.number_of_threads = threads;
        self
    }

    /// Set the board side.
    pub fn with_board_size(mut self, side: usize) -> Self {
        self.board_size = side;
        self
    }

    /// Enable dataset output.
    pub fn with_dataset(mut self, dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        self.make_dataset = true;
        self.dat_dir = dir.into();
        self.file_prefix = prefix.into();
        self
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Search configuration for one move.
    #[must_use]
    pub fn search_config(&self, max_iterations: u64, seed: u64) -> SearchConfig {
        let config = SearchConfig::default()
            .with_max_iterations(max_iterations)
            .with_threads(self.number_of_threads)
            .with_verbose(self.verbose)
            .with_seed(seed);
        match self.max_time {
            Some(t) => config.with_max_time(t),
            None => config,
        }
    }
}

/// One move of a self-play game.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveRecord {
    pub mv: GomokuMove,
    pub player: PlayerId,
    /// Merged visits of the chosen move.
    pub visits: u64,
    /// Merged win score of the chosen move.
    pub wins: f64,
}

/// A played game.
#[derive(Clone, Debug, PartialEq)]
pub struct GameRecord {
    /// Iteration budget both sides searched with.
    pub max_iterations: u64,

    /// Moves in order.
    pub moves: Vec<MoveRecord>,

    /// Final result. `None` if the game was cancelled before it ended.
    pub result: Option<GameResult>,
}

impl GameRecord {
    /// Check if the game ran to completion.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }
}

/// Totals of a self-play run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelfPlaySummary {
    pub rounds: u64,
    /// Finished games.
    pub games: u64,
    /// Moves played, including those of a cancelled game.
    pub moves: u64,
    /// Moves that were the only legal one and so were not searched.
    pub forced_moves: u64,
    pub x_wins: u64,
    pub o_wins: u64,
    pub draws: u64,
    pub cancelled: bool,
    /// Dataset files written.
    pub dataset_files: Vec<PathBuf>,
    /// Dataset lines written, one per searched move.
    pub records: u64,
}

impl SelfPlaySummary {
    fn record(&mut self, game: &GameRecord) {
        self.moves += game.moves.len() as u64;
        self.forced_moves += game.moves.iter().filter(|m| m.visits == 0).count() as u64;
        match game.result {
            Some(GameResult::Winner(p)) if p == PlayerId::FIRST => self.x_wins += 1,
            Some(GameResult::Winner(_)) => self.o_wins += 1,
            Some(GameResult::Draw) => self.draws += 1,
            None => return,
        }
        self.games += 1;
    }
}

/// Runs self-play games and writes their dataset.
pub struct SelfPlayDriver {
    config: SelfPlayConfig,
    rng: GameRng,
    writer: Option<DatasetWriter>,
}

impl SelfPlayDriver {
    /// Create a driver. Dataset files are only created once a move is
    /// recorded.
    pub fn new(config: SelfPlayConfig) -> Self {
        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let writer = config.make_dataset.then(|| {
            DatasetWriter::new(&config.dat_dir, config.file_prefix.clone(), config.file_size)
        });
        Self { config, rng, writer }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &SelfPlayConfig {
        &self.config
    }

    /// Play rounds until the round limit is reached or `cancel` fires.
    ///
    /// The dataset writer is flushed before returning, also when a game
    /// fails.
    pub fn run(&mut self, cancel: &CancellationToken) -> Result<SelfPlaySummary, DriverError> {
        let mut summary = SelfPlaySummary::default();
        let outcome = self.run_rounds(cancel, &mut summary);

        if let Some(writer) = self.writer.as_mut() {
            writer.finish()?;
            summary.dataset_files = writer.files().to_vec();
            summary.records = writer.records();
        }
        outcome?;

        info!(
            rounds = summary.rounds,
            games = summary.games,
            moves = summary.moves,
            x_wins = summary.x_wins,
            o_wins = summary.o_wins,
            draws = summary.draws,
            cancelled = summary.cancelled,
            "Self-play finished"
        );
        Ok(summary)
    }

    fn run_rounds(
        &mut self,
        cancel: &CancellationToken,
        summary: &mut SelfPlaySummary,
    ) -> Result<(), DriverError> {
        while self.config.number_of_rounds.map_or(true, |n| summary.rounds < n) {
            if cancel.is_cancelled() {
                summary.cancelled = true;
                return Ok(());
            }

            let max_iterations = self
                .rng
                .gen_range_u64(self.config.iterations_param1..=self.config.iterations_param2);
            info!(round = summary.rounds, max_iterations, "Starting self-play round");

            for _ in 0..self.config.number_of_repeat {
                let game = self.play_game(max_iterations, cancel)?;
                summary.record(&game);
                if !game.is_finished() {
                    summary.cancelled = true;
                    return Ok(());
                }
            }
            summary.rounds += 1;
        }
        Ok(())
    }

    /// Append a dataset line for a searched move.
    ///
    /// A move made without search (the only legal one) has no statistics
    /// and is skipped. Returns whether a line was written.
    fn record_position(&mut self, key: &str, visits: u64, wins: f64) -> std::io::Result<bool> {
        match self.writer.as_mut() {
            Some(writer) if visits > 0 => {
                writer.write_record(key, visits, wins)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Play one game with `max_iterations` per move for both sides.
    ///
    /// Stops early, with no result, if `cancel` fires between moves.
    pub fn play_game(
        &mut self,
        max_iterations: u64,
        cancel: &CancellationToken,
    ) -> Result<GameRecord, DriverError> {
        let mut state = GomokuState::new(self.config.board_size)?;
        let mut record = GameRecord {
            max_iterations,
            moves: Vec::new(),
            result: None,
        };

        while state.has_moves() {
            if cancel.is_cancelled() {
                debug!(moves = record.moves.len(), "Game cancelled");
                return Ok(record);
            }

            let player = state.player_to_move();
            let seed = self.rng.gen_range_u64(0..=u64::MAX);
            let decision = compute_move(&state, &self.config.search_config(max_iterations, seed))?;
            state.do_move(&decision.best_move)?;

            self.record_position(&state.dataset_key(), decision.best_visits, decision.best_wins)?;

            debug!(
                player = %player,
                mv = %decision.best_move,
                visits = decision.best_visits,
                win_rate = decision.best_win_rate(),
                "Move played"
            );
            record.moves.push(MoveRecord {
                mv: decision.best_move,
                player,
                visits: decision.best_visits,
                wins: decision.best_wins,
            });
        }

        record.result = state.game_result();
        info!(
            moves = record.moves.len(),
            result = ?record.result,
            "Game finished"
        );
        Ok(record)
    }
}
