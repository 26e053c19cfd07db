//! Self-play and dataset generation.
//!
//! ## Overview
//!
//! - **SelfPlayDriver**: plays gomoku engine-vs-engine with randomized
//!   search budgets
//! - **DatasetWriter**: records the board and search statistics after each
//!   move in size-bounded text files
//! - **CancellationToken**: stops a running driver between moves
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rust_gomoku::training::{CancellationToken, SelfPlayConfig, SelfPlayDriver};
//!
//! let config = SelfPlayConfig::load("config.txt")?;
//! let mut driver = SelfPlayDriver::new(config);
//!
//! let cancel = CancellationToken::new();
//! let summary = driver.run(&cancel)?;
//! println!("{} games, {} dataset lines", summary.games, summary.records);
//! ```

pub mod dataset;
pub mod self_play;

// Re-export main types
pub use dataset::{format_record, DatasetWriter};
pub use self_play::{
    CancellationToken, DriverError, GameRecord, MoveRecord, SelfPlayConfig, SelfPlayDriver,
    SelfPlaySummary,
};
