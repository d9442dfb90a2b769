use crate::core::{CardId, PlayerId, SlotId};

use super::GameDisplay;

/// Renders the game as log records.
///
/// Board and token traffic goes to `trace`, countdown refreshes to `debug`
/// (they arrive every poll interval), scores and winners to `info`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogDisplay;

impl GameDisplay for LogDisplay {
    fn countdown(&self, remaining_ms: u64, urgent: bool) {
        if urgent {
            log::debug!("countdown {}.{:02}s", remaining_ms / 1000, (remaining_ms % 1000) / 10);
        } else {
            log::debug!("countdown {}s", remaining_ms.div_ceil(1000));
        }
    }

    fn elapsed(&self, elapsed_ms: u64) {
        log::debug!("elapsed {}s", elapsed_ms / 1000);
    }

    fn score(&self, player: PlayerId, score: u32) {
        log::info!("{} scores, now at {}", player, score);
    }

    fn freeze(&self, player: PlayerId, remaining_ms: u64) {
        if remaining_ms == 0 {
            log::debug!("{} unfrozen", player);
        } else {
            log::debug!("{} frozen for {}ms", player, remaining_ms);
        }
    }

    fn place_card(&self, card: CardId, slot: SlotId) {
        log::trace!("{} -> {}", card, slot);
    }

    fn remove_card(&self, slot: SlotId) {
        log::trace!("{} cleared", slot);
    }

    fn place_token(&self, player: PlayerId, slot: SlotId) {
        log::trace!("{} token on {}", player, slot);
    }

    fn remove_token(&self, player: PlayerId, slot: SlotId) {
        log::trace!("{} token off {}", player, slot);
    }

    fn winners(&self, players: &[PlayerId]) {
        let names: Vec<String> = players.iter().map(ToString::to_string).collect();
        if names.len() == 1 {
            log::info!("winner: {}", names[0]);
        } else {
            log::info!("tie between {}", names.join(", "));
        }
    }
}
