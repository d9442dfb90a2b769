//! Player threads.
//!
//! Each player runs a [`PlayerAgent`] on its own thread. Automated players
//! get a second thread, an [`InputGenerator`], pressing random keys into the
//! same input queue. Everything the two threads and the dealer share lives in
//! [`Player`].
//!
//! ## Agent states
//!
//! ```text
//! Intake --3rd token--> AwaitingVerdict --Point--> Scored ----freeze--> Intake
//!                                       --Penalty-> Penalized -freeze--> Intake
//!                                       --Withdrawn-----------------> Intake
//! any state --terminate--> Stopped
//! ```

mod agent;
mod bot;
mod player;

pub use agent::{AgentState, PlayerAgent};
pub use bot::InputGenerator;
pub use player::{Player, INPUT_CAPACITY};

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::core::GameRng;

/// Running threads of one player.
#[derive(Debug)]
pub struct PlayerThreads {
    player: Arc<Player>,
    agent: JoinHandle<()>,
    generator: Option<JoinHandle<()>>,
}

impl PlayerThreads {
    /// Start `agent`, plus a key-press generator for automated players.
    pub fn spawn(agent: PlayerAgent, generator_rng: Option<GameRng>) -> io::Result<Self> {
        let player = Arc::clone(agent.player());
        let index = player.id().0;

        let generator = match generator_rng {
            Some(rng) => {
                let generator = InputGenerator::new(Arc::clone(&player), Arc::clone(agent.table()), rng)
                    .with_delay(agent.bot_delay());
                Some(
                    thread::Builder::new()
                        .name(format!("player-{index}-keys"))
                        .spawn(move || generator.run())?,
                )
            }
            None => None,
        };

        let spawned = thread::Builder::new()
            .name(format!("player-{index}"))
            .spawn(move || agent.run());
        let agent = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                player.terminate();
                if let Some(generator) = generator {
                    let _ = generator.join();
                }
                return Err(e);
            }
        };

        Ok(Self {
            player,
            agent,
            generator,
        })
    }

    #[must_use]
    pub fn player(&self) -> &Arc<Player> {
        &self.player
    }

    /// Signal the player to stop and wait for both of its threads.
    ///
    /// Returns `false` if either thread panicked.
    pub fn stop(self) -> bool {
        self.player.terminate();

        let mut clean = true;
        if let Some(generator) = self.generator {
            clean &= generator.join().is_ok();
        }
        clean &= self.agent.join().is_ok();
        clean
    }
}
