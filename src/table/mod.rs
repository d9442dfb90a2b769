//! The shared playing surface.
//!
//! ## Key Types
//!
//! - `Board`: slot/card mappings and per-player tokens, kept consistent by every mutator
//! - `Table`: the board behind a single mutex, shared by the dealer and every player thread
//! - `Deck`: undealt cards, owned by the dealer

pub mod board;
pub mod deck;

pub use board::{Board, Table, TOKENS_PER_PLAYER};
pub use deck::Deck;
