use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::core::PlayerId;

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<PlayerId>,
    /// Set by `wake`, consumed by the next `wait_timeout`.
    woken: bool,
}

/// FIFO of players waiting for a verdict, doubling as the dealer's wake condition.
///
/// Any player thread pushes; only the dealer pops. A push or an explicit
/// [`wake`](CompletionQueue::wake) ends the dealer's current wait early.
///
/// ```
/// use std::time::Duration;
/// use triple_rush::core::PlayerId;
/// use triple_rush::sync::CompletionQueue;
///
/// let queue = CompletionQueue::new();
/// queue.push(PlayerId::new(1));
/// queue.push(PlayerId::new(0));
///
/// // Returns immediately: work is pending.
/// queue.wait_timeout(Duration::from_secs(10));
/// assert_eq!(queue.pop(), Some(PlayerId::new(1)));
/// assert_eq!(queue.pop(), Some(PlayerId::new(0)));
/// assert_eq!(queue.pop(), None);
/// ```
#[derive(Debug, Default)]
pub struct CompletionQueue {
    state: Mutex<QueueState>,
    signal: Condvar,
}

impl CompletionQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a completed claim and wake the dealer.
    pub fn push(&self, player: PlayerId) {
        let mut state = self.state.lock();
        state.pending.push_back(player);
        self.signal.notify_one();
    }

    /// Take the oldest claim.
    pub fn pop(&self) -> Option<PlayerId> {
        self.state.lock().pending.pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().pending.is_empty()
    }

    /// Wake the dealer without enqueuing anything.
    pub fn wake(&self) {
        let mut state = self.state.lock();
        state.woken = true;
        self.signal.notify_all();
    }

    /// Block until a claim is pending, `wake` is called, or `timeout` passes.
    ///
    /// Returns `true` if woken by work or `wake` rather than the timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();

        while state.pending.is_empty() && !state.woken {
            if self.signal.wait_until(&mut state, deadline).timed_out() {
                break;
            }
        }

        let woke = !state.pending.is_empty() || state.woken;
        state.woken = false;
        woke
    }
}
