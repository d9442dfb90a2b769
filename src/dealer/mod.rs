//! The dealer: the single thread that owns the deck, the timer and every verdict.
//!
//! ## Control loop
//!
//! ```text
//! until finished:
//!     replenish the board, reset the timer
//!     until the timer runs out:
//!         sleep on the completion queue (at most one poll interval)
//!         refresh the timer display
//!         resolve every queued claim, oldest first
//!         replenish the board
//!     clear the board back into the deck
//! stop players (last registered first), announce winners
//! ```
//!
//! Claims are resolved only here, one at a time, so no two resolutions
//! interleave. A claim whose tokens were disturbed by an earlier resolution
//! is answered with [`Verdict::Withdrawn`].

mod terminator;

pub use terminator::Terminator;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::core::{CardId, GameConfig, GameRng, PlayerId, TimerMode};
use crate::display::GameDisplay;
use crate::error::{ConfigError, GameError, Result};
use crate::players::{Player, PlayerAgent, PlayerThreads};
use crate::rules::{GameResult, TripleRules};
use crate::sync::{CompletionQueue, Verdict};
use crate::table::{Board, Deck, Table};

/// Final standings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Every player sharing the top score, in id order.
    pub winners: Vec<PlayerId>,
    /// Final score of every player, in id order.
    pub scores: Vec<(PlayerId, u32)>,
}

/// The arbiter.
pub struct Dealer {
    config: GameConfig,
    table: Arc<Table>,
    deck: Deck,
    players: Vec<Arc<Player>>,
    completions: Arc<CompletionQueue>,
    rules: Arc<dyn TripleRules>,
    display: Arc<dyn GameDisplay>,
    rng: GameRng,
    terminate: Arc<AtomicBool>,

    /// When the current countdown ends.
    deadline: Instant,
    /// Last reshuffle or valid claim, for the elapsed timer.
    last_reset: Instant,
}

impl Dealer {
    /// Set up a game: empty board, full deck, registered players.
    pub fn new(
        config: GameConfig,
        rules: Arc<dyn TripleRules>,
        display: Arc<dyn GameDisplay>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if let Some(rules_deck) = rules.deck_size() {
            if rules_deck != config.deck_size {
                return Err(ConfigError::DeckMismatch {
                    config: config.deck_size,
                    rules: rules_deck,
                });
            }
        }

        let board = Board::new(
            config.table_size,
            config.deck_size,
            config.player_count(),
            Arc::clone(&display),
        )
        .with_delay(config.table_delay());

        let players = PlayerId::all(config.player_count())
            .map(|id| Arc::new(Player::new(id, config.player_name(id), config.is_human(id))))
            .collect();

        let now = Instant::now();
        Ok(Self {
            table: Arc::new(Table::new(board)),
            deck: Deck::new(config.deck_size),
            players,
            completions: Arc::new(CompletionQueue::new()),
            rules,
            display,
            rng: GameRng::new(config.seed).for_context("deck"),
            terminate: Arc::new(AtomicBool::new(false)),
            deadline: now,
            last_reset: now,
            config,
        })
    }

    /// Replace the deck, e.g. to deal a known sequence.
    #[must_use]
    pub fn with_deck(mut self, deck: Deck) -> Self {
        self.deck = deck;
        self
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Registered players, in id order.
    #[must_use]
    pub fn players(&self) -> &[Arc<Player>] {
        &self.players
    }

    #[must_use]
    pub fn completions(&self) -> &Arc<CompletionQueue> {
        &self.completions
    }

    #[must_use]
    pub fn display(&self) -> &Arc<dyn GameDisplay> {
        &self.display
    }

    /// Handle that ends the game from any thread.
    #[must_use]
    pub fn terminator(&self) -> Terminator {
        Terminator::new(Arc::clone(&self.terminate), Arc::clone(&self.completions))
    }

    /// Agent for `player`, sharing this dealer's table, queue and display.
    #[must_use]
    pub fn agent_for(&self, player: &Arc<Player>) -> PlayerAgent {
        PlayerAgent::new(
            Arc::clone(player),
            Arc::clone(&self.table),
            Arc::clone(&self.completions),
            Arc::clone(&self.display),
            &self.config,
        )
    }

    /// Play the game to the end on the current thread.
    pub fn run(mut self) -> Result<GameOutcome> {
        log::info!(
            "dealing {} cards to {} slots for {} players",
            self.deck.len(),
            self.config.table_size,
            self.players.len()
        );

        let threads = self.spawn_players()?;

        while !self.should_finish() {
            self.place_cards_on_table();
            self.update_timer_display(true);
            self.timer_loop();
            self.resolve_completions();
            self.remove_all_cards_from_table();
        }

        let clean = Self::stop_players(threads);
        let outcome = self.announce_winners();
        if !self.config.end_game_pause().is_zero() {
            std::thread::sleep(self.config.end_game_pause());
        }

        if !clean {
            return Err(GameError::ThreadPanicked("player thread".to_string()));
        }
        Ok(outcome)
    }

    /// End the game: the current cycle winds down and winners are announced.
    pub fn terminate(&self) {
        self.terminator().terminate();
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminate.load(Ordering::SeqCst)
    }

    /// Whether the game is over: terminated, or no triple can ever be formed
    /// from the cards still in play (deck plus board).
    pub fn should_finish(&self) -> bool {
        if self.is_terminated() {
            return true;
        }

        let mut in_play: Vec<CardId> = self.deck.iter().collect();
        in_play.extend(self.table.lock().cards());
        if !self.rules.has_triple(&in_play) {
            log::info!("no triple left among {} cards in play", in_play.len());
            return true;
        }
        false
    }

    /// Resolve every queued claim in arrival order.
    ///
    /// Returns the number of valid claims.
    pub fn resolve_completions(&mut self) -> usize {
        let mut points = 0;

        while let Some(id) = self.completions.pop() {
            let Some(player) = self.players.get(id.index()) else {
                log::warn!("claim from unregistered {}", id);
                continue;
            };

            let verdict = {
                let mut board = self.table.lock();
                match board.claimed_cards(id) {
                    None => Verdict::Withdrawn,
                    Some(cards) if self.rules.is_valid_triple(cards) => {
                        // Other players' tokens on these slots go with the cards.
                        for slot in board.token_slots(id) {
                            board.remove_card(slot);
                        }
                        Verdict::Point
                    }
                    Some(_) => {
                        board.clear_tokens(id);
                        Verdict::Penalty
                    }
                }
            };

            log::debug!("{}: {:?}", id, verdict);
            if verdict == Verdict::Point {
                points += 1;
            }
            player.post_verdict(verdict);
        }

        if points > 0 {
            self.last_reset = Instant::now();
        }
        points
    }

    /// Shuffle the deck and deal into every empty slot while cards remain.
    ///
    /// Terminates the game once the deck is empty and the board holds no
    /// valid triple.
    pub fn place_cards_on_table(&mut self) {
        let empty = self.table.lock().empty_slots();

        if !empty.is_empty() && !self.deck.is_empty() {
            self.deck.shuffle(&mut self.rng);
            for slot in empty {
                let Some(card) = self.deck.draw() else {
                    break;
                };
                self.table.lock().place_card(card, slot);
            }

            if self.config.hints {
                self.log_hints();
            }
        }

        if self.deck.is_empty() && !self.rules.has_triple(&self.table.lock().cards()) {
            log::info!("deck exhausted and no triple on the board");
            self.terminate();
        }
    }

    /// Clear the board, returning its cards to the deck.
    pub fn remove_all_cards_from_table(&mut self) {
        let cards = self.table.lock().clear();
        log::debug!("reshuffle: {} cards back to the deck", cards.len());
        self.deck.return_cards(cards);
    }

    /// Compute and display the winners.
    pub fn announce_winners(&self) -> GameOutcome {
        let scores: Vec<(PlayerId, u32)> =
            self.players.iter().map(|p| (p.id(), p.score())).collect();
        let winners = GameResult::from_scores(scores.iter().copied())
            .map(|result| result.winners())
            .unwrap_or_default();

        for &(id, score) in &scores {
            log::info!("{} ({}): {}", id, self.players[id.index()].name(), score);
        }
        self.display.winners(&winners);

        GameOutcome { winners, scores }
    }

    fn log_hints(&self) {
        let board = self.table.lock();
        for triple in board.enumerate_hints(self.rules.as_ref()) {
            let slots: Vec<String> = triple
                .cards()
                .iter()
                .filter_map(|&card| board.slot_of(card))
                .map(|slot| slot.to_string())
                .collect();
            log::info!("hint: {} at {}", triple, slots.join(", "));
        }
    }

    fn timer_loop(&mut self) {
        while !self.is_terminated() && self.time_remains() {
            self.completions.wait_timeout(self.config.poll_interval());
            self.update_timer_display(false);
            self.resolve_completions();
            self.place_cards_on_table();
        }
    }

    fn time_remains(&self) -> bool {
        match self.config.timer {
            TimerMode::Countdown { .. } => Instant::now() < self.deadline,
            TimerMode::Elapsed | TimerMode::Disabled => {
                self.rules.has_triple(&self.table.lock().cards())
            }
        }
    }

    fn update_timer_display(&mut self, reset: bool) {
        let now = Instant::now();
        if reset {
            if let Some(timeout) = self.config.timer.timeout() {
                self.deadline = now + timeout;
            }
            self.last_reset = now;
        }

        match self.config.timer {
            TimerMode::Countdown { .. } => {
                let remaining = self.deadline.saturating_duration_since(now);
                let urgent = remaining < self.config.warning_threshold();
                self.display.countdown(remaining.as_millis() as u64, urgent);
            }
            TimerMode::Elapsed => {
                self.display.elapsed(now.duration_since(self.last_reset).as_millis() as u64);
            }
            TimerMode::Disabled => {}
        }
    }

    fn spawn_players(&self) -> Result<Vec<PlayerThreads>> {
        let mut threads = Vec::with_capacity(self.players.len());
        let mut bot_rng = GameRng::new(self.config.seed).for_context("bots");

        for player in &self.players {
            let rng = (!player.is_human()).then(|| bot_rng.fork());
            match PlayerThreads::spawn(self.agent_for(player), rng) {
                Ok(spawned) => threads.push(spawned),
                Err(e) => {
                    Self::stop_players(threads);
                    return Err(e.into());
                }
            }
        }

        Ok(threads)
    }

    /// Stop players in reverse registration order. Returns `false` if any panicked.
    fn stop_players(threads: Vec<PlayerThreads>) -> bool {
        let mut clean = true;
        for spawned in threads.into_iter().rev() {
            let id = spawned.player().id();
            if !spawned.stop() {
                log::error!("{} panicked", id);
                clean = false;
            }
        }
        clean
    }
}

impl std::fmt::Debug for Dealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dealer")
            .field("deck", &self.deck.len())
            .field("players", &self.players.len())
            .field("terminated", &self.is_terminated())
            .finish_non_exhaustive()
    }
}
