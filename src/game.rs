//! Launching a game and talking to it while it runs.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use triple_rush::{FeatureRules, Game, GameConfig, LogDisplay};
//!
//! let config = GameConfig::default().with_players(0, 3);
//! let handle = Game::new(config, Arc::new(FeatureRules::default()), Arc::new(LogDisplay))?
//!     .start()?;
//!
//! std::thread::sleep(Duration::from_secs(10));
//! handle.terminate();
//! let outcome = handle.join()?;
//! println!("winners: {:?}", outcome.winners);
//! # Ok::<(), triple_rush::GameError>(())
//! ```

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::core::{GameConfig, PlayerId, SlotId};
use crate::dealer::{Dealer, GameOutcome, Terminator};
use crate::display::GameDisplay;
use crate::error::{ConfigError, GameError, Result};
use crate::players::Player;
use crate::rules::TripleRules;
use crate::table::{Deck, Table};

/// A configured game that has not started yet.
#[derive(Debug)]
pub struct Game {
    dealer: Dealer,
}

impl Game {
    pub fn new(
        config: GameConfig,
        rules: Arc<dyn TripleRules>,
        display: Arc<dyn GameDisplay>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            dealer: Dealer::new(config, rules, display)?,
        })
    }

    /// Deal from exactly this deck instead of a full one.
    #[must_use]
    pub fn with_deck(mut self, deck: Deck) -> Self {
        self.dealer = self.dealer.with_deck(deck);
        self
    }

    /// Start the dealer thread, which in turn starts every player.
    pub fn start(self) -> Result<GameHandle> {
        let players = self.dealer.players().to_vec();
        let table = Arc::clone(self.dealer.table());
        let terminator = self.dealer.terminator();

        let dealer = self.dealer;
        let thread = thread::Builder::new()
            .name("dealer".to_string())
            .spawn(move || dealer.run())?;

        Ok(GameHandle {
            players,
            table,
            terminator,
            thread,
        })
    }

    /// Play the whole game on the current thread.
    pub fn play(self) -> Result<GameOutcome> {
        self.dealer.run()
    }
}

/// A running game.
#[derive(Debug)]
pub struct GameHandle {
    players: Vec<Arc<Player>>,
    table: Arc<Table>,
    terminator: Terminator,
    thread: JoinHandle<Result<GameOutcome>>,
}

impl GameHandle {
    /// Deliver a human key press for `slot`.
    ///
    /// Returns whether the press was admitted. Presses for automated
    /// players are always dropped.
    pub fn key_pressed(&self, player: PlayerId, slot: SlotId) -> Result<bool> {
        let target = self
            .players
            .get(player.index())
            .ok_or(GameError::UnknownPlayer(player))?;
        if !target.is_human() {
            return Ok(false);
        }
        Ok(target.key_pressed(slot, &self.table))
    }

    /// Players in id order.
    #[must_use]
    pub fn players(&self) -> &[Arc<Player>] {
        &self.players
    }

    /// The shared board.
    #[must_use]
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// Current score of `player`.
    pub fn score(&self, player: PlayerId) -> Result<u32> {
        self.players
            .get(player.index())
            .map(|p| p.score())
            .ok_or(GameError::UnknownPlayer(player))
    }

    /// A handle that can end the game from elsewhere.
    #[must_use]
    pub fn terminator(&self) -> Terminator {
        self.terminator.clone()
    }

    pub fn terminate(&self) {
        self.terminator.terminate();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the game to end.
    pub fn join(self) -> Result<GameOutcome> {
        self.thread
            .join()
            .map_err(|_| GameError::ThreadPanicked("dealer".to_string()))?
    }
}
