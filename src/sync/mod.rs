//! Hand-off channels between player threads and the dealer.
//!
//! - [`CompletionQueue`]: players announce completed claims; the dealer drains
//!   them in arrival order and sleeps on it between countdown refreshes
//! - [`Verdict`]: what the dealer posts back into a player's inbox

mod completion;

pub use completion::CompletionQueue;

use serde::{Deserialize, Serialize};

/// Outcome of a claim, posted by the dealer to exactly one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Valid triple: the cards are gone and the player scores.
    Point,
    /// Invalid triple: the player's tokens are gone and it is penalized.
    Penalty,
    /// The claim no longer held three tokens when the dealer reached it.
    Withdrawn,
}
