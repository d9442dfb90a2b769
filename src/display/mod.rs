//! One-way notifications to whatever renders the game.
//!
//! The engine never reads anything back from a display. Calls arrive from
//! the dealer thread and from every player thread, so implementations must
//! be `Send + Sync` and should return quickly.
//!
//! - [`NullDisplay`]: discards everything
//! - [`LogDisplay`]: renders every call as a log record
//! - [`RecordingDisplay`]: keeps every call as a [`DisplayEvent`] for inspection

mod logger;
mod recording;

pub use logger::LogDisplay;
pub use recording::{DisplayEvent, RecordingDisplay};

use crate::core::{CardId, PlayerId, SlotId};

/// Display collaborator.
pub trait GameDisplay: Send + Sync {
    /// Time left before the next reshuffle. `urgent` once below the warning threshold.
    fn countdown(&self, remaining_ms: u64, urgent: bool);

    /// Time since the last reshuffle or claim, for elapsed-timer games.
    fn elapsed(&self, _elapsed_ms: u64) {}

    fn score(&self, player: PlayerId, score: u32);

    /// Remaining freeze time; zero clears the freeze.
    fn freeze(&self, player: PlayerId, remaining_ms: u64);

    fn place_card(&self, card: CardId, slot: SlotId);

    fn remove_card(&self, slot: SlotId);

    fn place_token(&self, player: PlayerId, slot: SlotId);

    fn remove_token(&self, player: PlayerId, slot: SlotId);

    fn winners(&self, players: &[PlayerId]);
}

/// Display that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDisplay;

impl GameDisplay for NullDisplay {
    fn countdown(&self, _remaining_ms: u64, _urgent: bool) {}
    fn score(&self, _player: PlayerId, _score: u32) {}
    fn freeze(&self, _player: PlayerId, _remaining_ms: u64) {}
    fn place_card(&self, _card: CardId, _slot: SlotId) {}
    fn remove_card(&self, _slot: SlotId) {}
    fn place_token(&self, _player: PlayerId, _slot: SlotId) {}
    fn remove_token(&self, _player: PlayerId, _slot: SlotId) {}
    fn winners(&self, _players: &[PlayerId]) {}
}
