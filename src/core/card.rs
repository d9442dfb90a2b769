//! Card and slot identifiers.
//!
//! Cards are numbered `0..deck_size` and never change once dealt.
//! Slots are fixed board positions numbered `0..table_size`.
//!
//! ```
//! use triple_rush::core::{CardId, SlotId};
//!
//! let card = CardId::new(17);
//! let slot = SlotId::new(3);
//! assert_eq!(card.index(), 17);
//! assert_eq!(format!("{} @ {}", card, slot), "Card(17) @ Slot(3)");
//! ```

use serde::{Deserialize, Serialize};

/// Identifier of a card in `[0, deck_size)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u16);

impl CardId {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Every card of a deck with `deck_size` cards, in id order.
    pub fn all(deck_size: usize) -> impl Iterator<Item = CardId> {
        (0..deck_size as u16).map(CardId)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Identifier of a board slot in `[0, table_size)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotId(pub u16);

impl SlotId {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Every slot of a table with `table_size` slots, in id order.
    pub fn all(table_size: usize) -> impl Iterator<Item = SlotId> {
        (0..table_size as u16).map(SlotId)
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Slot({})", self.0)
    }
}
