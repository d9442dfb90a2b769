//! Error types.
//!
//! Rejected key presses are not errors: admission simply returns `false`.

use thiserror::Error;

use crate::core::PlayerId;

/// A configuration that cannot describe a playable game.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one player is required")]
    NoPlayers,

    #[error("at most 255 players are supported, got {0}")]
    TooManyPlayers(usize),

    #[error("table must have at least 3 slots, got {0}")]
    TableTooSmall(usize),

    #[error("deck must have at least 3 cards, got {0}")]
    DeckTooSmall(usize),

    #[error("deck has {config} cards but the rules deal {rules}")]
    DeckMismatch { config: usize, rules: usize },

    #[error("feature count must be between 1 and {max}, got {got}")]
    FeatureCount { got: u32, max: u32 },

    #[error("warning threshold is longer than the countdown")]
    WarningExceedsTimeout,

    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to start or finish a game.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to spawn thread: {0}")]
    Io(#[from] std::io::Error),

    #[error("thread panicked: {0}")]
    ThreadPanicked(String),

    #[error("{0} is not registered")]
    UnknownPlayer(PlayerId),
}

pub type Result<T, E = GameError> = std::result::Result<T, E>;
