use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::sync::CompletionQueue;

/// Ends a running game from any thread.
///
/// Sets the dealer's terminate flag and wakes it, so the current cycle
/// winds down within one poll interval. Players are stopped by the dealer
/// itself, last registered first, before winners are announced.
#[derive(Clone, Debug)]
pub struct Terminator {
    flag: Arc<AtomicBool>,
    completions: Arc<CompletionQueue>,
}

impl Terminator {
    pub(crate) fn new(flag: Arc<AtomicBool>, completions: Arc<CompletionQueue>) -> Self {
        Self { flag, completions }
    }

    pub fn terminate(&self) {
        if !self.flag.swap(true, Ordering::SeqCst) {
            log::info!("terminate requested");
        }
        self.completions.wake();
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
