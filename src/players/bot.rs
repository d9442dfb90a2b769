//! Random key presses for automated players.

use std::sync::Arc;
use std::time::Duration;

use crate::core::{GameRng, SlotId};
use crate::table::Table;

use super::Player;

/// Back-off after a rejected press, so an empty board is not spun on.
const REJECTED_BACKOFF: Duration = Duration::from_millis(1);

/// Feeds an automated player's input queue with random slots.
///
/// Runs on its own thread, independent of the player's agent. Presses go
/// through the same admission rule as human input.
pub struct InputGenerator {
    player: Arc<Player>,
    table: Arc<Table>,
    rng: GameRng,
    delay: Duration,
}

impl InputGenerator {
    pub fn new(player: Arc<Player>, table: Arc<Table>, rng: GameRng) -> Self {
        Self {
            player,
            table,
            rng,
            delay: Duration::ZERO,
        }
    }

    /// Pause between presses.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Press keys until the player is stopped.
    pub fn run(mut self) {
        let table_size = self.table.table_size();
        while self.player.wait_for_room() {
            let slot = SlotId(self.rng.gen_range_usize(0..table_size) as u16);
            let pause = if self.player.key_pressed(slot, &self.table) {
                self.delay
            } else {
                self.delay.max(REJECTED_BACKOFF)
            };
            if !pause.is_zero() && !self.player.pause(pause) {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardId, PlayerId};
    use crate::display::NullDisplay;
    use crate::table::Board;
    use std::thread;

    #[test]
    fn test_fills_queue_then_stops() {
        let mut board = Board::new(6, 81, 1, Arc::new(NullDisplay));
        for i in 0..6 {
            board.place_card(CardId(i), SlotId(i));
        }
        let table = Arc::new(Table::new(board));
        let player = Arc::new(Player::new(PlayerId(0), "bot", false));

        let generator = InputGenerator::new(Arc::clone(&player), table, GameRng::new(1));
        let handle = thread::spawn(move || generator.run());

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while player.pending_inputs() < 3 && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(player.pending_inputs(), 3);

        player.terminate();
        handle.join().unwrap();
    }
}
