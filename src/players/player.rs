//! State shared by a player's threads and the dealer.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::core::{PlayerId, SlotId};
use crate::display::GameDisplay;
use crate::sync::Verdict;
use crate::table::Table;

/// Maximum key presses waiting to be processed.
pub const INPUT_CAPACITY: usize = 3;

#[derive(Debug, Default)]
struct PlayerState {
    inputs: VecDeque<SlotId>,
    /// Single-slot inbox, written only by the dealer.
    verdict: Option<Verdict>,
    frozen: bool,
    stopped: bool,
}

/// One participant.
///
/// Every blocking wait (next key press, verdict, freeze) parks on the same
/// condition variable, so [`terminate`](Player::terminate) interrupts
/// whichever one is in progress.
#[derive(Debug)]
pub struct Player {
    id: PlayerId,
    name: String,
    human: bool,
    score: AtomicU32,
    state: Mutex<PlayerState>,
    signal: Condvar,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, human: bool) -> Self {
        Self {
            id,
            name: name.into(),
            human,
            score: AtomicU32::new(0),
            state: Mutex::new(PlayerState::default()),
            signal: Condvar::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_human(&self) -> bool {
        self.human
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score.load(Ordering::SeqCst)
    }

    /// Award one point, returning the new score.
    pub fn add_point(&self) -> u32 {
        self.score.fetch_add(1, Ordering::SeqCst) + 1
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.state.lock().frozen
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.state.lock().stopped
    }

    #[must_use]
    pub fn pending_inputs(&self) -> usize {
        self.state.lock().inputs.len()
    }

    /// Offer a key press for `slot`.
    ///
    /// Accepted only if the slot holds a card, the player is neither frozen
    /// nor stopped, and fewer than [`INPUT_CAPACITY`] presses are pending.
    /// Rejected presses are dropped silently.
    pub fn key_pressed(&self, slot: SlotId, table: &Table) -> bool {
        if table.card_at(slot).is_none() {
            log::trace!("{}: {} is empty, press dropped", self.id, slot);
            return false;
        }

        let mut state = self.state.lock();
        if state.stopped || state.frozen || state.inputs.len() >= INPUT_CAPACITY {
            return false;
        }
        state.inputs.push_back(slot);
        self.signal.notify_all();
        true
    }

    /// Block until a key press is pending. `None` once stopped.
    pub fn next_input(&self) -> Option<SlotId> {
        let mut state = self.state.lock();
        loop {
            if state.stopped {
                return None;
            }
            if let Some(slot) = state.inputs.pop_front() {
                // The generator may be waiting for room.
                self.signal.notify_all();
                return Some(slot);
            }
            self.signal.wait(&mut state);
        }
    }

    /// Block until a key press would be admitted (queue has room, not frozen).
    ///
    /// Returns `false` once stopped.
    pub fn wait_for_room(&self) -> bool {
        let mut state = self.state.lock();
        while !state.stopped && (state.frozen || state.inputs.len() >= INPUT_CAPACITY) {
            self.signal.wait(&mut state);
        }
        !state.stopped
    }

    /// Deliver the dealer's verdict.
    pub fn post_verdict(&self, verdict: Verdict) {
        let mut state = self.state.lock();
        debug_assert!(state.verdict.is_none(), "{} already has an unread verdict", self.id);
        state.verdict = Some(verdict);
        self.signal.notify_all();
    }

    /// Block until the dealer posts a verdict. `None` if stopped first.
    pub fn await_verdict(&self) -> Option<Verdict> {
        let mut state = self.state.lock();
        loop {
            if let Some(verdict) = state.verdict.take() {
                return Some(verdict);
            }
            if state.stopped {
                return None;
            }
            self.signal.wait(&mut state);
        }
    }

    /// Freeze for `duration`, redisplaying the remaining time every `tick`.
    ///
    /// Pending key presses are discarded and new ones rejected until the
    /// freeze ends. Only termination ends it early. Returns `false` if the
    /// player was stopped.
    pub fn freeze(&self, duration: Duration, tick: Duration, display: &dyn GameDisplay) -> bool {
        let deadline = Instant::now() + duration;
        {
            let mut state = self.state.lock();
            state.frozen = true;
            state.inputs.clear();
        }

        let mut stopped = false;
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            display.freeze(self.id, (deadline - now).as_millis() as u64);

            let wake_at = (now + tick).min(deadline);
            let mut state = self.state.lock();
            while !state.stopped && Instant::now() < wake_at {
                self.signal.wait_until(&mut state, wake_at);
            }
            if state.stopped {
                stopped = true;
                break;
            }
        }

        {
            let mut state = self.state.lock();
            state.frozen = false;
            self.signal.notify_all();
        }
        display.freeze(self.id, 0);
        !stopped
    }

    /// Sleep for `duration` unless stopped first. Returns `false` if stopped.
    pub fn pause(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut state = self.state.lock();
        while !state.stopped && Instant::now() < deadline {
            self.signal.wait_until(&mut state, deadline);
        }
        !state.stopped
    }

    /// Stop the player, interrupting any wait in progress.
    pub fn terminate(&self) {
        let mut state = self.state.lock();
        state.stopped = true;
        self.signal.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardId;
    use crate::display::{NullDisplay, RecordingDisplay};
    use crate::table::Board;
    use std::sync::Arc;
    use std::thread;

    fn table_with_cards(cards: u16) -> Table {
        let mut board = Board::new(6, 81, 1, Arc::new(NullDisplay));
        for i in 0..cards {
            board.place_card(CardId(i), SlotId(i));
        }
        Table::new(board)
    }

    #[test]
    fn test_admission_rules() {
        let table = table_with_cards(4);
        let player = Player::new(PlayerId(0), "p", true);

        // Empty slot.
        assert!(!player.key_pressed(SlotId(5), &table));
        // Out of range.
        assert!(!player.key_pressed(SlotId(40), &table));

        for i in 0..3 {
            assert!(player.key_pressed(SlotId(i), &table));
        }
        // Queue full.
        assert!(!player.key_pressed(SlotId(3), &table));
        assert_eq!(player.pending_inputs(), 3);
    }

    #[test]
    fn test_inputs_are_fifo() {
        let table = table_with_cards(3);
        let player = Player::new(PlayerId(0), "p", true);
        player.key_pressed(SlotId(2), &table);
        player.key_pressed(SlotId(0), &table);

        assert_eq!(player.next_input(), Some(SlotId(2)));
        assert_eq!(player.next_input(), Some(SlotId(0)));
    }

    #[test]
    fn test_stopped_player_rejects_input() {
        let table = table_with_cards(3);
        let player = Player::new(PlayerId(0), "p", true);
        player.terminate();

        assert!(!player.key_pressed(SlotId(0), &table));
        assert_eq!(player.next_input(), None);
        assert_eq!(player.await_verdict(), None);
        assert!(!player.wait_for_room());
    }

    #[test]
    fn test_verdict_inbox_holds_one_value() {
        let player = Player::new(PlayerId(0), "p", false);
        player.post_verdict(Verdict::Penalty);
        assert_eq!(player.await_verdict(), Some(Verdict::Penalty));
    }

    #[test]
    fn test_pending_verdict_wins_over_stop() {
        let player = Player::new(PlayerId(0), "p", false);
        player.post_verdict(Verdict::Point);
        player.terminate();
        assert_eq!(player.await_verdict(), Some(Verdict::Point));
    }

    #[test]
    fn test_terminate_interrupts_verdict_wait() {
        let player = Arc::new(Player::new(PlayerId(0), "p", false));
        let waiter = {
            let player = Arc::clone(&player);
            thread::spawn(move || player.await_verdict())
        };

        thread::sleep(Duration::from_millis(10));
        player.terminate();
        assert_eq!(waiter.join().unwrap(), None);
    }

    #[test]
    fn test_freeze_counts_down_and_rejects_input() {
        let table = Arc::new(table_with_cards(3));
        let player = Arc::new(Player::new(PlayerId(0), "p", true));
        let display = Arc::new(RecordingDisplay::new());

        let freezer = {
            let player = Arc::clone(&player);
            let display = Arc::clone(&display);
            thread::spawn(move || {
                player.freeze(Duration::from_millis(60), Duration::from_millis(20), display.as_ref())
            })
        };

        thread::sleep(Duration::from_millis(10));
        assert!(player.is_frozen());
        assert!(!player.key_pressed(SlotId(0), &table));

        assert!(freezer.join().unwrap());
        assert!(!player.is_frozen());

        let shown = display.freezes(PlayerId(0));
        assert!(shown.len() >= 2);
        assert_eq!(shown.last(), Some(&0));
        assert!(shown.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_terminate_cuts_freeze_short() {
        let player = Arc::new(Player::new(PlayerId(0), "p", false));
        let freezer = {
            let player = Arc::clone(&player);
            thread::spawn(move || player.freeze(Duration::from_secs(30), Duration::from_secs(1), &NullDisplay))
        };

        thread::sleep(Duration::from_millis(10));
        let start = Instant::now();
        player.terminate();
        assert!(!freezer.join().unwrap());
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_add_point() {
        let player = Player::new(PlayerId(0), "p", false);
        assert_eq!(player.add_point(), 1);
        assert_eq!(player.add_point(), 2);
        assert_eq!(player.score(), 2);
    }
}
