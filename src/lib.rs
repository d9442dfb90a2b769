//! # triple-rush
//!
//! A real-time card game engine where several players race to claim
//! matching triples of cards from a shared board, refereed by a dealer.
//!
//! ## Threads
//!
//! - **Dealer** (one): owns the deck and the reshuffle timer, resolves every
//!   claim, replenishes the board, decides when the game is over.
//! - **Player agent** (one per player): turns key presses into tokens, claims
//!   a triple on its third token, then blocks for the dealer's verdict.
//! - **Input generator** (one per automated player): presses random keys.
//!
//! Players and dealer share only the board (behind one mutex), the completion
//! queue (players to dealer, FIFO) and each player's verdict inbox (dealer to
//! player, one value).
//!
//! ## Modules
//!
//! - `core`: ids, RNG, configuration
//! - `table`: board, shared table, deck
//! - `rules`: the pluggable triple predicate and winner computation
//! - `games`: concrete rule sets
//! - `display`: one-way render notifications
//! - `sync`: completion queue and verdicts
//! - `players`: player state, agent state machine, random input
//! - `dealer`: the control loop
//! - `game`: starting, feeding and stopping a game

pub mod core;
pub mod dealer;
pub mod display;
pub mod error;
pub mod game;
pub mod games;
pub mod players;
pub mod rules;
pub mod sync;
pub mod table;

// Re-export commonly used types
pub use crate::core::{CardId, GameConfig, GameRng, PlayerId, PlayerMap, SlotId, TimerMode};

pub use crate::table::{Board, Deck, Table};

pub use crate::rules::{GameResult, PredicateRules, Triple, TripleRules};

pub use crate::games::FeatureRules;

pub use crate::display::{DisplayEvent, GameDisplay, LogDisplay, NullDisplay, RecordingDisplay};

pub use crate::sync::{CompletionQueue, Verdict};

pub use crate::players::{AgentState, InputGenerator, Player, PlayerAgent};

pub use crate::dealer::{Dealer, GameOutcome, Terminator};

pub use crate::game::{Game, GameHandle};

pub use crate::error::{ConfigError, GameError};
