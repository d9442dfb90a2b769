//! Undealt cards.

use std::collections::VecDeque;

use crate::core::{CardId, GameRng};

/// Ordered pile of undealt cards. Cards are dealt from the front.
///
/// ```
/// use triple_rush::core::CardId;
/// use triple_rush::table::Deck;
///
/// let mut deck = Deck::new(3);
/// assert_eq!(deck.draw(), Some(CardId(0)));
/// deck.return_cards([CardId(0)]);
/// assert_eq!(deck.len(), 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Deck {
    cards: VecDeque<CardId>,
}

impl Deck {
    /// A deck holding every card `0..deck_size`, in id order.
    #[must_use]
    pub fn new(deck_size: usize) -> Self {
        Self::from_cards(CardId::all(deck_size))
    }

    /// A deck holding exactly `cards`, front first.
    pub fn from_cards(cards: impl IntoIterator<Item = CardId>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Shuffle the remaining cards.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(self.cards.make_contiguous());
    }

    /// Take the front card.
    pub fn draw(&mut self) -> Option<CardId> {
        self.cards.pop_front()
    }

    /// Put cards cleared from the board back at the end of the deck.
    pub fn return_cards(&mut self, cards: impl IntoIterator<Item = CardId>) {
        self.cards.extend(cards);
    }

    /// Remaining cards, front first.
    pub fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().copied()
    }
}
