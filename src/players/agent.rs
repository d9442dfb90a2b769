//! The per-player state machine.

use std::sync::Arc;
use std::time::Duration;

use crate::core::{GameConfig, SlotId};
use crate::display::GameDisplay;
use crate::sync::{CompletionQueue, Verdict};
use crate::table::{Table, TOKENS_PER_PLAYER};

use super::Player;

/// Where a player agent is in its cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentState {
    /// Consuming key presses, placing and removing tokens.
    Intake,
    /// Holding three tokens, claim queued, waiting on the dealer.
    AwaitingVerdict,
    /// Claim was valid: score and serve the point freeze.
    Scored,
    /// Claim was invalid: serve the penalty freeze.
    Penalized,
    /// Terminated.
    Stopped,
}

/// Drives one player: turns key presses into tokens, claims triples,
/// and applies the dealer's verdicts.
pub struct PlayerAgent {
    player: Arc<Player>,
    table: Arc<Table>,
    completions: Arc<CompletionQueue>,
    display: Arc<dyn GameDisplay>,
    point_freeze: Duration,
    penalty_freeze: Duration,
    freeze_tick: Duration,
    bot_delay: Duration,
    state: AgentState,
}

impl PlayerAgent {
    pub fn new(
        player: Arc<Player>,
        table: Arc<Table>,
        completions: Arc<CompletionQueue>,
        display: Arc<dyn GameDisplay>,
        config: &GameConfig,
    ) -> Self {
        Self {
            player,
            table,
            completions,
            display,
            point_freeze: config.point_freeze(),
            penalty_freeze: config.penalty_freeze(),
            freeze_tick: config.freeze_tick(),
            bot_delay: config.bot_delay(),
            state: AgentState::Intake,
        }
    }

    #[must_use]
    pub fn player(&self) -> &Arc<Player> {
        &self.player
    }

    #[must_use]
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    #[must_use]
    pub fn bot_delay(&self) -> Duration {
        self.bot_delay
    }

    #[must_use]
    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Run until terminated.
    pub fn run(mut self) {
        log::debug!("{} ({}) started", self.player.id(), self.player.name());
        while self.state != AgentState::Stopped {
            self.state = self.step();
        }
        log::debug!("{} stopped with score {}", self.player.id(), self.player.score());
    }

    /// Perform the work of the current state and return the next one.
    pub fn step(&mut self) -> AgentState {
        match self.state {
            AgentState::Intake => match self.player.next_input() {
                Some(slot) => self.toggle_token(slot),
                None => AgentState::Stopped,
            },
            AgentState::AwaitingVerdict => {
                self.completions.push(self.player.id());
                match self.player.await_verdict() {
                    Some(Verdict::Point) => AgentState::Scored,
                    Some(Verdict::Penalty) => AgentState::Penalized,
                    Some(Verdict::Withdrawn) => AgentState::Intake,
                    None => AgentState::Stopped,
                }
            }
            AgentState::Scored => {
                let score = self.player.add_point();
                self.display.score(self.player.id(), score);
                self.freeze(self.point_freeze)
            }
            AgentState::Penalized => self.freeze(self.penalty_freeze),
            AgentState::Stopped => AgentState::Stopped,
        }
    }

    /// Deselect `slot` if we hold a token there, otherwise select it.
    fn toggle_token(&self, slot: SlotId) -> AgentState {
        let id = self.player.id();
        let mut board = self.table.lock();

        if board.remove_token(id, slot) {
            return AgentState::Intake;
        }
        if board.place_token(id, slot) && board.token_count(id) == TOKENS_PER_PLAYER {
            log::trace!("{} claims {:?}", id, board.token_slots(id).as_slice());
            return AgentState::AwaitingVerdict;
        }
        AgentState::Intake
    }

    fn freeze(&self, duration: Duration) -> AgentState {
        if self.player.freeze(duration, self.freeze_tick, self.display.as_ref()) {
            AgentState::Intake
        } else {
            AgentState::Stopped
        }
    }
}
