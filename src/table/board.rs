//! Board state and the shared table.
//!
//! The `Board` keeps two mappings as exact inverses of each other,
//! `slot -> card` and `card -> slot`, and a fixed set of three token
//! positions per player. Every mutator leaves both invariants intact:
//!
//! - `slot_to_card[s] == Some(c)` iff `card_to_slot[c] == Some(s)`
//! - a player's token count equals its occupied token positions, and every
//!   token sits on a slot that holds a card
//!
//! Removing a card first removes every token on its slot, which can drop
//! another player's count below three while that player waits for a verdict.
//!
//! Player threads and the dealer thread all mutate the board, so it lives
//! behind the single mutex of [`Table`].

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use smallvec::SmallVec;

use crate::core::{CardId, PlayerId, PlayerMap, SlotId};
use crate::display::GameDisplay;
use crate::rules::{Triple, TripleRules};

/// Maximum tokens a player holds at once.
pub const TOKENS_PER_PLAYER: usize = 3;

/// Slots and cards on the table plus every player's tokens.
pub struct Board {
    slot_to_card: Vec<Option<CardId>>,
    card_to_slot: Vec<Option<SlotId>>,

    /// Token positions per player; `None` marks a free position.
    tokens: PlayerMap<[Option<SlotId>; TOKENS_PER_PLAYER]>,
    token_counts: PlayerMap<u8>,

    display: Arc<dyn GameDisplay>,

    /// Artificial delay for every card placement and removal.
    delay: Duration,
}

impl Board {
    /// Create an empty board.
    pub fn new(
        table_size: usize,
        deck_size: usize,
        player_count: usize,
        display: Arc<dyn GameDisplay>,
    ) -> Self {
        Self {
            slot_to_card: vec![None; table_size],
            card_to_slot: vec![None; deck_size],
            tokens: PlayerMap::with_default(player_count),
            token_counts: PlayerMap::with_default(player_count),
            display,
            delay: Duration::ZERO,
        }
    }

    /// Delay every card placement and removal by `delay`.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn table_size(&self) -> usize {
        self.slot_to_card.len()
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.tokens.player_count()
    }

    /// Card currently in `slot`.
    #[must_use]
    pub fn card_at(&self, slot: SlotId) -> Option<CardId> {
        self.slot_to_card.get(slot.index()).copied().flatten()
    }

    /// Slot currently holding `card`.
    #[must_use]
    pub fn slot_of(&self, card: CardId) -> Option<SlotId> {
        self.card_to_slot.get(card.index()).copied().flatten()
    }

    /// Number of slots holding a card.
    #[must_use]
    pub fn count_cards(&self) -> usize {
        self.slot_to_card.iter().filter(|c| c.is_some()).count()
    }

    /// Cards on the board in slot order.
    #[must_use]
    pub fn cards(&self) -> Vec<CardId> {
        self.slot_to_card.iter().flatten().copied().collect()
    }

    /// Slots with no card, in slot order.
    #[must_use]
    pub fn empty_slots(&self) -> Vec<SlotId> {
        SlotId::all(self.table_size())
            .filter(|&slot| self.card_at(slot).is_none())
            .collect()
    }

    /// Slots holding a card, in slot order.
    #[must_use]
    pub fn occupied_slots(&self) -> Vec<SlotId> {
        SlotId::all(self.table_size())
            .filter(|&slot| self.card_at(slot).is_some())
            .collect()
    }

    /// Put `card` into the empty `slot`.
    ///
    /// Returns `false` and changes nothing if the slot is out of range or
    /// occupied, or the card is unknown or already on the board.
    pub fn place_card(&mut self, card: CardId, slot: SlotId) -> bool {
        if slot.index() >= self.table_size()
            || card.index() >= self.card_to_slot.len()
            || self.card_at(slot).is_some()
            || self.slot_of(card).is_some()
        {
            return false;
        }

        self.pause();
        self.slot_to_card[slot.index()] = Some(card);
        self.card_to_slot[card.index()] = Some(slot);
        self.display.place_card(card, slot);
        true
    }

    /// Clear `slot`, removing every token on it first.
    ///
    /// Returns the removed card, or `None` if the slot was empty.
    pub fn remove_card(&mut self, slot: SlotId) -> Option<CardId> {
        let card = self.card_at(slot)?;

        self.pause();
        let holders: SmallVec<[PlayerId; 8]> = self
            .tokens
            .iter()
            .filter(|(_, tokens)| tokens.contains(&Some(slot)))
            .map(|(player, _)| player)
            .collect();
        for player in holders {
            self.remove_token(player, slot);
        }

        self.slot_to_card[slot.index()] = None;
        self.card_to_slot[card.index()] = None;
        self.display.remove_card(slot);
        Some(card)
    }

    /// Clear every slot, returning the removed cards in slot order.
    pub fn clear(&mut self) -> Vec<CardId> {
        self.occupied_slots()
            .into_iter()
            .filter_map(|slot| self.remove_card(slot))
            .collect()
    }

    /// Place one of `player`'s tokens on `slot`.
    ///
    /// No-op (returns `false`) if the slot is empty, the player already holds
    /// a token there, or the player already holds all of its tokens.
    pub fn place_token(&mut self, player: PlayerId, slot: SlotId) -> bool {
        if !self.tokens.contains(player)
            || self.card_at(slot).is_none()
            || self.has_token(player, slot)
            || self.token_counts[player] as usize >= TOKENS_PER_PLAYER
        {
            return false;
        }

        let Some(free) = self.tokens[player].iter_mut().find(|t| t.is_none()) else {
            return false;
        };
        *free = Some(slot);
        self.token_counts[player] += 1;
        self.display.place_token(player, slot);
        true
    }

    /// Remove `player`'s token from `slot`.
    ///
    /// Returns `false`, changing nothing, if there is no such token.
    pub fn remove_token(&mut self, player: PlayerId, slot: SlotId) -> bool {
        if !self.tokens.contains(player) || self.card_at(slot).is_none() {
            return false;
        }

        let Some(token) = self.tokens[player].iter_mut().find(|t| **t == Some(slot)) else {
            return false;
        };
        *token = None;
        self.token_counts[player] -= 1;
        self.display.remove_token(player, slot);
        true
    }

    /// Remove all of `player`'s tokens.
    pub fn clear_tokens(&mut self, player: PlayerId) {
        for slot in self.token_slots(player) {
            self.remove_token(player, slot);
        }
    }

    /// Does `player` hold a token on `slot`?
    #[must_use]
    pub fn has_token(&self, player: PlayerId, slot: SlotId) -> bool {
        self.tokens.contains(player) && self.tokens[player].contains(&Some(slot))
    }

    /// How many tokens `player` holds.
    #[must_use]
    pub fn token_count(&self, player: PlayerId) -> usize {
        if self.tokens.contains(player) {
            self.token_counts[player] as usize
        } else {
            0
        }
    }

    /// Slots holding `player`'s tokens, in token-position order.
    #[must_use]
    pub fn token_slots(&self, player: PlayerId) -> SmallVec<[SlotId; TOKENS_PER_PLAYER]> {
        if !self.tokens.contains(player) {
            return SmallVec::new();
        }
        self.tokens[player].iter().flatten().copied().collect()
    }

    /// The three cards under `player`'s tokens, if it holds all three.
    #[must_use]
    pub fn claimed_cards(&self, player: PlayerId) -> Option<[CardId; 3]> {
        let slots = self.token_slots(player);
        if slots.len() != TOKENS_PER_PLAYER {
            return None;
        }
        Some([
            self.card_at(slots[0])?,
            self.card_at(slots[1])?,
            self.card_at(slots[2])?,
        ])
    }

    /// Every valid triple currently on the board. Diagnostic only.
    pub fn enumerate_hints(&self, rules: &dyn TripleRules) -> Vec<Triple> {
        rules.find_triples(&self.cards(), usize::MAX)
    }

    /// Check both board invariants.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let slots_agree = self.slot_to_card.iter().enumerate().all(|(s, card)| match card {
            Some(c) => self.card_to_slot.get(c.index()) == Some(&Some(SlotId(s as u16))),
            None => true,
        });
        let cards_agree = self.card_to_slot.iter().enumerate().all(|(c, slot)| match slot {
            Some(s) => self.slot_to_card.get(s.index()) == Some(&Some(CardId(c as u16))),
            None => true,
        });
        let tokens_agree = self.tokens.iter().all(|(player, tokens)| {
            let held = tokens.iter().flatten().count();
            held == self.token_counts[player] as usize
                && held <= TOKENS_PER_PLAYER
                && tokens.iter().flatten().all(|&slot| self.card_at(slot).is_some())
        });

        slots_agree && cards_agree && tokens_agree
    }

    fn pause(&self) {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("slots", &self.slot_to_card)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

/// The board shared between the dealer and every player thread.
///
/// Every single operation takes the lock once. Callers that need several
/// operations to happen atomically (the dealer resolving a claim) hold the
/// guard from [`Table::lock`] across them.
#[derive(Debug)]
pub struct Table {
    board: Mutex<Board>,
}

impl Table {
    pub fn new(board: Board) -> Self {
        Self {
            board: Mutex::new(board),
        }
    }

    /// Exclusive access for a sequence of operations.
    pub fn lock(&self) -> MutexGuard<'_, Board> {
        self.board.lock()
    }

    #[must_use]
    pub fn card_at(&self, slot: SlotId) -> Option<CardId> {
        self.board.lock().card_at(slot)
    }

    #[must_use]
    pub fn count_cards(&self) -> usize {
        self.board.lock().count_cards()
    }

    #[must_use]
    pub fn table_size(&self) -> usize {
        self.board.lock().table_size()
    }

    pub fn place_token(&self, player: PlayerId, slot: SlotId) -> bool {
        self.board.lock().place_token(player, slot)
    }

    pub fn remove_token(&self, player: PlayerId, slot: SlotId) -> bool {
        self.board.lock().remove_token(player, slot)
    }

    #[must_use]
    pub fn has_token(&self, player: PlayerId, slot: SlotId) -> bool {
        self.board.lock().has_token(player, slot)
    }

    #[must_use]
    pub fn token_count(&self, player: PlayerId) -> usize {
        self.board.lock().token_count(player)
    }

    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.board.lock().is_consistent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{DisplayEvent, NullDisplay, RecordingDisplay};

    fn board(table_size: usize) -> Board {
        Board::new(table_size, 81, 2, Arc::new(NullDisplay))
    }

    #[test]
    fn test_place_and_remove_card() {
        let mut board = board(12);
        board.place_card(CardId(40), SlotId(3));

        assert_eq!(board.card_at(SlotId(3)), Some(CardId(40)));
        assert_eq!(board.slot_of(CardId(40)), Some(SlotId(3)));
        assert_eq!(board.count_cards(), 1);

        assert_eq!(board.remove_card(SlotId(3)), Some(CardId(40)));
        assert_eq!(board.slot_of(CardId(40)), None);
        assert_eq!(board.count_cards(), 0);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_rejected_placement_changes_nothing() {
        let display = Arc::new(RecordingDisplay::new());
        let mut board = Board::new(3, 9, 1, display.clone());
        assert!(board.place_card(CardId(1), SlotId(0)));
        display.clear();

        assert!(!board.place_card(CardId(2), SlotId(0)));
        assert!(!board.place_card(CardId(1), SlotId(1)));
        assert!(!board.place_card(CardId(2), SlotId(3)));
        assert!(!board.place_card(CardId(9), SlotId(1)));

        assert_eq!(board.card_at(SlotId(0)), Some(CardId(1)));
        assert_eq!(board.slot_of(CardId(2)), None);
        assert_eq!(board.count_cards(), 1);
        assert!(display.events().is_empty());
        assert!(board.is_consistent());
    }

    #[test]
    fn test_remove_empty_slot() {
        let mut board = board(12);
        assert_eq!(board.remove_card(SlotId(0)), None);
    }

    #[test]
    fn test_token_requires_card() {
        let mut board = board(12);
        assert!(!board.place_token(PlayerId(0), SlotId(0)));
        assert_eq!(board.token_count(PlayerId(0)), 0);
    }

    #[test]
    fn test_token_limit() {
        let mut board = board(12);
        for i in 0..4 {
            board.place_card(CardId(i), SlotId(i));
        }
        for i in 0..3 {
            assert!(board.place_token(PlayerId(0), SlotId(i)));
        }
        assert!(!board.place_token(PlayerId(0), SlotId(3)));
        assert_eq!(board.token_count(PlayerId(0)), 3);
    }

    #[test]
    fn test_duplicate_token_rejected() {
        let mut board = board(12);
        board.place_card(CardId(0), SlotId(0));
        assert!(board.place_token(PlayerId(0), SlotId(0)));
        assert!(!board.place_token(PlayerId(0), SlotId(0)));
        assert_eq!(board.token_count(PlayerId(0)), 1);
    }

    #[test]
    fn test_remove_missing_token_is_noop() {
        let mut board = board(12);
        board.place_card(CardId(0), SlotId(0));
        assert!(board.place_token(PlayerId(1), SlotId(0)));

        assert!(!board.remove_token(PlayerId(0), SlotId(0)));
        assert!(!board.remove_token(PlayerId(0), SlotId(5)));
        assert_eq!(board.token_count(PlayerId(1)), 1);
    }

    #[test]
    fn test_freed_position_is_reused() {
        let mut board = board(12);
        for i in 0..3 {
            board.place_card(CardId(i), SlotId(i));
            board.place_token(PlayerId(0), SlotId(i));
        }
        board.remove_token(PlayerId(0), SlotId(1));
        board.place_card(CardId(9), SlotId(9));
        board.place_token(PlayerId(0), SlotId(9));

        assert_eq!(board.token_slots(PlayerId(0)).as_slice(), &[SlotId(0), SlotId(9), SlotId(2)]);
    }

    #[test]
    fn test_remove_card_clears_every_players_token() {
        let mut board = board(12);
        board.place_card(CardId(7), SlotId(0));
        board.place_token(PlayerId(0), SlotId(0));
        board.place_token(PlayerId(1), SlotId(0));

        board.remove_card(SlotId(0));

        assert_eq!(board.token_count(PlayerId(0)), 0);
        assert_eq!(board.token_count(PlayerId(1)), 0);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_claimed_cards() {
        let mut board = board(12);
        for i in 0..3 {
            board.place_card(CardId(10 + i), SlotId(i));
        }
        board.place_token(PlayerId(0), SlotId(2));
        board.place_token(PlayerId(0), SlotId(0));
        assert_eq!(board.claimed_cards(PlayerId(0)), None);

        board.place_token(PlayerId(0), SlotId(1));
        assert_eq!(board.claimed_cards(PlayerId(0)), Some([CardId(12), CardId(10), CardId(11)]));
    }

    #[test]
    fn test_clear_returns_cards() {
        let mut board = board(4);
        board.place_card(CardId(5), SlotId(1));
        board.place_card(CardId(6), SlotId(3));
        board.place_token(PlayerId(0), SlotId(1));

        assert_eq!(board.clear(), vec![CardId(5), CardId(6)]);
        assert_eq!(board.count_cards(), 0);
        assert_eq!(board.token_count(PlayerId(0)), 0);
        assert_eq!(board.empty_slots().len(), 4);
    }

    #[test]
    fn test_display_notifications() {
        let display = Arc::new(RecordingDisplay::new());
        let mut board = Board::new(3, 81, 1, display.clone());

        board.place_card(CardId(1), SlotId(0));
        board.place_token(PlayerId(0), SlotId(0));
        board.remove_card(SlotId(0));

        assert_eq!(
            display.events(),
            vec![
                DisplayEvent::PlaceCard { card: CardId(1), slot: SlotId(0) },
                DisplayEvent::PlaceToken { player: PlayerId(0), slot: SlotId(0) },
                DisplayEvent::RemoveToken { player: PlayerId(0), slot: SlotId(0) },
                DisplayEvent::RemoveCard { slot: SlotId(0) },
            ]
        );
    }
}
