//! gomoku - self-play dataset generator and interactive player
//!
//! Subcommands:
//! 1. `self-play --config <path>`: engine-vs-engine games driven by a
//!    `key = value` config file; type `q` and Enter to stop after the
//!    current move
//! 2. `play`: play against the engine on stdin

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use rust_gomoku::games::gomoku::{GomokuMove, GomokuState, DEFAULT_SIDE};
use rust_gomoku::mcts::{compute_move, SearchConfig};
use rust_gomoku::rules::{GameResult, GameState};
use rust_gomoku::training::{CancellationToken, SelfPlayConfig, SelfPlayDriver};
use rust_gomoku::PlayerId;

#[derive(Debug, Parser)]
#[command(name = "gomoku")]
#[command(about = "Gomoku with a root-parallel MCTS engine")]
struct Cli {
    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a dataset from engine-vs-engine games
    SelfPlay {
        /// Path to the key = value config file
        #[arg(long, default_value = "config.txt")]
        config: PathBuf,
    },

    /// Play against the engine
    Play {
        /// Board side (5-19)
        #[arg(long, default_value_t = DEFAULT_SIDE)]
        board_size: usize,

        /// Engine iterations per move
        #[arg(long, default_value_t = 1000)]
        iterations: u64,

        /// Engine time limit per move in seconds
        #[arg(long)]
        max_time: Option<f64>,

        /// Engine search threads
        #[arg(long, default_value_t = 8)]
        threads: usize,

        /// Take X and move first
        #[arg(long)]
        human_first: bool,

        /// Engine seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Log every candidate move
        #[arg(long)]
        verbose: bool,
    },
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Command::SelfPlay { config } => self_play(config),
        Command::Play {
            board_size,
            iterations,
            max_time,
            threads,
            human_first,
            seed,
            verbose,
        } => {
            let mut search = SearchConfig::default()
                .with_max_iterations(iterations)
                .with_threads(threads)
                .with_seed(seed)
                .with_verbose(verbose);
            if let Some(t) = max_time {
                search = search.with_max_time(t);
            }
            let human = if human_first {
                PlayerId::FIRST
            } else {
                PlayerId::SECOND
            };
            play(board_size, &search, human)
        }
    }
}

fn self_play(path: PathBuf) -> Result<()> {
    let config = SelfPlayConfig::load(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    info!(
        config = %path.display(),
        iterations_low = config.iterations_param1,
        iterations_high = config.iterations_param2,
        threads = config.number_of_threads,
        make_dataset = config.make_dataset,
        "Starting self-play (type q + Enter to stop)"
    );

    let cancel = CancellationToken::new();
    let listener = cancel.clone();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) if line.trim().eq_ignore_ascii_case("q") => {
                    info!("Stop requested, finishing current move");
                    listener.cancel();
                    return;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "Stopped reading stdin");
                    return;
                }
            }
        }
    });

    let mut driver = SelfPlayDriver::new(config);
    let summary = driver.run(&cancel)?;

    println!(
        "Played {} games ({} moves): X {} / O {} / draws {}",
        summary.games, summary.moves, summary.x_wins, summary.o_wins, summary.draws
    );
    for file in &summary.dataset_files {
        println!("Dataset: {}", file.display());
    }
    Ok(())
}

fn play(board_size: usize, search: &SearchConfig, human: PlayerId) -> Result<()> {
    let mut state = GomokuState::new(board_size)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();

    while state.has_moves() {
        println!("\n{state}\n");

        if state.player_to_move() == human {
            let Some(mv) = read_human_move(&mut input, &mut state)? else {
                println!("Bye.");
                return Ok(());
            };
            println!("You played {mv}");
        } else {
            let decision = compute_move(&state, search)?;
            state.do_move(&decision.best_move)?;
            println!(
                "Engine played {} ({} visits, {:.1}% wins)",
                decision.best_move,
                decision.best_visits,
                100.0 * decision.best_win_rate()
            );
        }
    }

    println!("\nFinal state:\n{state}\n");
    match state.game_result() {
        Some(GameResult::Winner(p)) if p == human => println!("You win!"),
        Some(GameResult::Winner(_)) => println!("The engine wins!"),
        _ => println!("Nobody wins!"),
    }
    Ok(())
}

/// Prompt until a legal move is applied. `None` on end of input or `q`.
fn read_human_move(input: &mut impl BufRead, state: &mut GomokuState) -> Result<Option<GomokuMove>> {
    loop {
        print!("Input your move (e.g. 4C, q to quit): ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Ok(None);
        }

        match line.parse::<GomokuMove>() {
            Ok(mv) => match state.do_move(&mv) {
                Ok(()) => return Ok(Some(mv)),
                Err(e) => println!("Invalid move: {e}"),
            },
            Err(e) => println!("Invalid move: {e}"),
        }
    }
}
