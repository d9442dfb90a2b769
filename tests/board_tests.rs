//! Board integration tests.
//!
//! These tests verify that the slot/card mappings stay exact inverses and
//! token bookkeeping stays in sync under arbitrary sequences of mutations,
//! including concurrent mutation through the shared table.

use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use triple_rush::core::{CardId, PlayerId, SlotId};
use triple_rush::display::{DisplayEvent, NullDisplay, RecordingDisplay};
use triple_rush::games::FeatureRules;
use triple_rush::table::{Board, Table, TOKENS_PER_PLAYER};

const TABLE_SIZE: u16 = 6;
const DECK_SIZE: u16 = 12;
const PLAYERS: u8 = 3;

#[derive(Clone, Debug)]
enum Op {
    PlaceCard(u16, u16),
    RemoveCard(u16),
    PlaceToken(u8, u16),
    RemoveToken(u8, u16),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..DECK_SIZE, 0..TABLE_SIZE).prop_map(|(c, s)| Op::PlaceCard(c, s)),
        (0..TABLE_SIZE).prop_map(Op::RemoveCard),
        (0..PLAYERS, 0..TABLE_SIZE).prop_map(|(p, s)| Op::PlaceToken(p, s)),
        (0..PLAYERS, 0..TABLE_SIZE).prop_map(|(p, s)| Op::RemoveToken(p, s)),
    ]
}

proptest! {
    #[test]
    fn prop_board_stays_consistent(ops in prop::collection::vec(op(), 1..200)) {
        let mut board = Board::new(TABLE_SIZE as usize, DECK_SIZE as usize, PLAYERS as usize, Arc::new(NullDisplay));

        for op in ops {
            match op {
                Op::PlaceCard(card, slot) => {
                    // Placement requires an empty slot and an undealt card.
                    let before = board.card_at(SlotId(slot));
                    let free = before.is_none() && board.slot_of(CardId(card)).is_none();
                    prop_assert_eq!(board.place_card(CardId(card), SlotId(slot)), free);
                    let expected = if free { Some(CardId(card)) } else { before };
                    prop_assert_eq!(board.card_at(SlotId(slot)), expected);
                }
                Op::RemoveCard(slot) => {
                    let before = board.card_at(SlotId(slot));
                    prop_assert_eq!(board.remove_card(SlotId(slot)), before);
                    for player in PlayerId::all(PLAYERS as usize) {
                        prop_assert!(!board.has_token(player, SlotId(slot)));
                    }
                }
                Op::PlaceToken(player, slot) => {
                    let count = board.token_count(PlayerId(player));
                    let placed = board.place_token(PlayerId(player), SlotId(slot));
                    let expected = if placed { count + 1 } else { count };
                    prop_assert_eq!(board.token_count(PlayerId(player)), expected);
                }
                Op::RemoveToken(player, slot) => {
                    let had = board.has_token(PlayerId(player), SlotId(slot));
                    prop_assert_eq!(board.remove_token(PlayerId(player), SlotId(slot)), had);
                }
            }

            prop_assert!(board.is_consistent());
            for player in PlayerId::all(PLAYERS as usize) {
                prop_assert!(board.token_count(player) <= TOKENS_PER_PLAYER);
            }
        }
    }
}

/// Removing a missing token reports false and leaves everything untouched.
#[test]
fn test_remove_token_is_idempotent() {
    let display = Arc::new(RecordingDisplay::new());
    let mut board = Board::new(3, 81, 2, display.clone());
    board.place_card(CardId(0), SlotId(0));
    board.place_token(PlayerId(0), SlotId(0));
    display.clear();

    assert!(board.remove_token(PlayerId(0), SlotId(0)));
    assert!(!board.remove_token(PlayerId(0), SlotId(0)));
    assert!(!board.remove_token(PlayerId(1), SlotId(0)));

    assert_eq!(
        display.events(),
        vec![DisplayEvent::RemoveToken { player: PlayerId(0), slot: SlotId(0) }]
    );
    assert_eq!(board.card_at(SlotId(0)), Some(CardId(0)));
}

/// Hints come from the injected rules over the cards on the board.
#[test]
fn test_enumerate_hints() {
    let rules = FeatureRules::new(4);
    let mut board = Board::new(12, 81, 1, Arc::new(NullDisplay));

    // 0, 1, 2 form a triple; 4 forms none with any two of them.
    for (slot, card) in [0u16, 1, 2, 4].into_iter().enumerate() {
        board.place_card(CardId(card), SlotId(slot as u16));
    }

    let hints = board.enumerate_hints(&rules);
    assert_eq!(hints.len(), 1);
    assert!(hints[0].contains(CardId(0)));
    assert!(hints[0].contains(CardId(1)));
    assert!(hints[0].contains(CardId(2)));
}

/// Several threads toggling tokens while another removes and replaces cards.
#[test]
fn test_concurrent_mutation_keeps_invariants() {
    let mut board = Board::new(TABLE_SIZE as usize, DECK_SIZE as usize, PLAYERS as usize, Arc::new(NullDisplay));
    for slot in 0..TABLE_SIZE {
        board.place_card(CardId(slot), SlotId(slot));
    }
    let table = Arc::new(Table::new(board));

    let togglers: Vec<_> = PlayerId::all(PLAYERS as usize)
        .map(|player| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                for i in 0..2_000u32 {
                    let slot = SlotId(((i * 7 + player.0 as u32) % TABLE_SIZE as u32) as u16);
                    let mut board = table.lock();
                    if !board.remove_token(player, slot) {
                        board.place_token(player, slot);
                    }
                }
            })
        })
        .collect();

    let dealer = {
        let table = Arc::clone(&table);
        thread::spawn(move || {
            for i in 0..500u32 {
                let slot = SlotId((i % TABLE_SIZE as u32) as u16);
                let mut board = table.lock();
                if let Some(card) = board.remove_card(slot) {
                    board.place_card(card, slot);
                }
            }
        })
    };

    for t in togglers {
        t.join().unwrap();
    }
    dealer.join().unwrap();

    assert!(table.is_consistent());
    assert_eq!(table.count_cards(), TABLE_SIZE as usize);
}
