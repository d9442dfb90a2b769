use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::{CardId, PlayerId, SlotId};

use super::GameDisplay;

/// One display notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayEvent {
    Countdown { remaining_ms: u64, urgent: bool },
    Elapsed { elapsed_ms: u64 },
    Score { player: PlayerId, score: u32 },
    Freeze { player: PlayerId, remaining_ms: u64 },
    PlaceCard { card: CardId, slot: SlotId },
    RemoveCard { slot: SlotId },
    PlaceToken { player: PlayerId, slot: SlotId },
    RemoveToken { player: PlayerId, slot: SlotId },
    Winners { players: Vec<PlayerId> },
}

/// Display that keeps every notification in arrival order.
///
/// ```
/// use triple_rush::core::PlayerId;
/// use triple_rush::display::{DisplayEvent, GameDisplay, RecordingDisplay};
///
/// let display = RecordingDisplay::new();
/// display.score(PlayerId::new(0), 1);
/// assert_eq!(
///     display.events(),
///     vec![DisplayEvent::Score { player: PlayerId::new(0), score: 1 }]
/// );
/// ```
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    events: Mutex<Vec<DisplayEvent>>,
}

impl RecordingDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event so far.
    #[must_use]
    pub fn events(&self) -> Vec<DisplayEvent> {
        self.events.lock().clone()
    }

    /// Freeze times shown for `player`, in order.
    #[must_use]
    pub fn freezes(&self, player: PlayerId) -> Vec<u64> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                DisplayEvent::Freeze { player: p, remaining_ms } if *p == player => Some(*remaining_ms),
                _ => None,
            })
            .collect()
    }

    /// Scores shown for `player`, in order.
    #[must_use]
    pub fn scores(&self, player: PlayerId) -> Vec<u32> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                DisplayEvent::Score { player: p, score } if *p == player => Some(*score),
                _ => None,
            })
            .collect()
    }

    /// The last winners announcement, if any.
    #[must_use]
    pub fn announced_winners(&self) -> Option<Vec<PlayerId>> {
        self.events.lock().iter().rev().find_map(|e| match e {
            DisplayEvent::Winners { players } => Some(players.clone()),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    fn push(&self, event: DisplayEvent) {
        self.events.lock().push(event);
    }
}

impl GameDisplay for RecordingDisplay {
    fn countdown(&self, remaining_ms: u64, urgent: bool) {
        self.push(DisplayEvent::Countdown { remaining_ms, urgent });
    }

    fn elapsed(&self, elapsed_ms: u64) {
        self.push(DisplayEvent::Elapsed { elapsed_ms });
    }

    fn score(&self, player: PlayerId, score: u32) {
        self.push(DisplayEvent::Score { player, score });
    }

    fn freeze(&self, player: PlayerId, remaining_ms: u64) {
        self.push(DisplayEvent::Freeze { player, remaining_ms });
    }

    fn place_card(&self, card: CardId, slot: SlotId) {
        self.push(DisplayEvent::PlaceCard { card, slot });
    }

    fn remove_card(&self, slot: SlotId) {
        self.push(DisplayEvent::RemoveCard { slot });
    }

    fn place_token(&self, player: PlayerId, slot: SlotId) {
        self.push(DisplayEvent::PlaceToken { player, slot });
    }

    fn remove_token(&self, player: PlayerId, slot: SlotId) {
        self.push(DisplayEvent::RemoveToken { player, slot });
    }

    fn winners(&self, players: &[PlayerId]) {
        self.push(DisplayEvent::Winners { players: players.to_vec() });
    }
}
