//! Core building blocks shared by the engine, the games and the driver:
//! player identity, deterministic RNG, and configuration files.

pub mod config;
pub mod player;
pub mod rng;

pub use config::{ConfigError, ConfigFile};
pub use player::{InvalidPlayerId, PlayerId};
pub use rng::GameRng;
