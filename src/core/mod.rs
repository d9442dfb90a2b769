//! Core types: players, cards, slots, RNG, configuration.

pub mod card;
pub mod config;
pub mod player;
pub mod rng;

pub use card::{CardId, SlotId};
pub use config::{GameConfig, TimerMode};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
