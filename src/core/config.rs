//! Game configuration.
//!
//! Every timing knob is stored in milliseconds so a config round-trips
//! through JSON cleanly; accessors hand out `Duration`s.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::PlayerId;
use crate::error::ConfigError;

/// How the dealer's reshuffle timer behaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TimerMode {
    /// Reshuffle the whole board when the countdown reaches zero.
    Countdown {
        /// Length of one reshuffle cycle.
        timeout_ms: u64,
    },
    /// Show time elapsed since the last reshuffle or claim; reshuffle only
    /// when the board holds no valid triple.
    Elapsed,
    /// No timer display; reshuffle only when the board holds no valid triple.
    Disabled,
}

impl TimerMode {
    /// Countdown of the given length.
    #[must_use]
    pub fn countdown(timeout: Duration) -> Self {
        TimerMode::Countdown {
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    /// Countdown length, if this is a countdown.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        match self {
            TimerMode::Countdown { timeout_ms } => Some(Duration::from_millis(*timeout_ms)),
            TimerMode::Elapsed | TimerMode::Disabled => None,
        }
    }
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::Countdown { timeout_ms: 60_000 }
    }
}

/// Complete game configuration.
///
/// ```
/// use std::time::Duration;
/// use triple_rush::core::{GameConfig, TimerMode};
///
/// let config = GameConfig::default()
///     .with_players(1, 3)
///     .with_timer(TimerMode::countdown(Duration::from_secs(30)))
///     .with_seed(7);
///
/// assert_eq!(config.player_count(), 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of distinct cards.
    pub deck_size: usize,

    /// Number of board slots.
    pub table_size: usize,

    /// Players fed by the input collaborator. They take the lowest ids.
    pub human_players: usize,

    /// Players fed by their own random input generator.
    pub computer_players: usize,

    /// Display names, indexed by player id. Missing names fall back to "Player N".
    pub player_names: Vec<String>,

    /// Reshuffle timer behavior.
    pub timer: TimerMode,

    /// The countdown is shown as urgent once less than this remains.
    pub warning_threshold_ms: u64,

    /// Freeze after a valid claim.
    pub point_freeze_ms: u64,

    /// Freeze after an invalid claim.
    pub penalty_freeze_ms: u64,

    /// Interval at which a frozen player's remaining time is redisplayed.
    pub freeze_tick_ms: u64,

    /// Pause after the winners are announced.
    pub end_game_pause_ms: u64,

    /// Artificial delay applied to every card placement and removal.
    pub table_delay_ms: u64,

    /// Upper bound on how long the dealer sleeps between countdown refreshes.
    pub poll_interval_ms: u64,

    /// Pause between an automated player's key presses.
    pub bot_delay_ms: u64,

    /// Log every valid triple on the board after each replenishment.
    pub hints: bool,

    /// Seed for the deck shuffle and the automated players.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            deck_size: 81,
            table_size: 12,
            human_players: 0,
            computer_players: 2,
            player_names: Vec::new(),
            timer: TimerMode::default(),
            warning_threshold_ms: 5_000,
            point_freeze_ms: 1_000,
            penalty_freeze_ms: 3_000,
            freeze_tick_ms: 1_000,
            end_game_pause_ms: 0,
            table_delay_ms: 0,
            poll_interval_ms: 10,
            bot_delay_ms: 0,
            hints: false,
            seed: 42,
        }
    }
}

impl GameConfig {
    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_deck_size(mut self, deck_size: usize) -> Self {
        self.deck_size = deck_size;
        self
    }

    #[must_use]
    pub fn with_table_size(mut self, table_size: usize) -> Self {
        self.table_size = table_size;
        self
    }

    #[must_use]
    pub fn with_players(mut self, human: usize, computer: usize) -> Self {
        self.human_players = human;
        self.computer_players = computer;
        self
    }

    #[must_use]
    pub fn with_timer(mut self, timer: TimerMode) -> Self {
        self.timer = timer;
        self
    }

    #[must_use]
    pub fn with_warning_threshold(mut self, threshold: Duration) -> Self {
        self.warning_threshold_ms = threshold.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn with_freezes(mut self, point: Duration, penalty: Duration) -> Self {
        self.point_freeze_ms = point.as_millis() as u64;
        self.penalty_freeze_ms = penalty.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn with_freeze_tick(mut self, tick: Duration) -> Self {
        self.freeze_tick_ms = tick.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn with_bot_delay(mut self, delay: Duration) -> Self {
        self.bot_delay_ms = delay.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn with_hints(mut self, hints: bool) -> Self {
        self.hints = hints;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Total number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.human_players + self.computer_players
    }

    /// Whether `player` is fed by the input collaborator.
    #[must_use]
    pub fn is_human(&self, player: PlayerId) -> bool {
        player.index() < self.human_players
    }

    /// Display name for `player`.
    #[must_use]
    pub fn player_name(&self, player: PlayerId) -> String {
        self.player_names
            .get(player.index())
            .cloned()
            .unwrap_or_else(|| player.to_string())
    }

    pub fn warning_threshold(&self) -> Duration {
        Duration::from_millis(self.warning_threshold_ms)
    }

    pub fn point_freeze(&self) -> Duration {
        Duration::from_millis(self.point_freeze_ms)
    }

    pub fn penalty_freeze(&self) -> Duration {
        Duration::from_millis(self.penalty_freeze_ms)
    }

    pub fn freeze_tick(&self) -> Duration {
        Duration::from_millis(self.freeze_tick_ms)
    }

    pub fn end_game_pause(&self) -> Duration {
        Duration::from_millis(self.end_game_pause_ms)
    }

    pub fn table_delay(&self) -> Duration {
        Duration::from_millis(self.table_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn bot_delay(&self) -> Duration {
        Duration::from_millis(self.bot_delay_ms)
    }

    /// Check that the configuration describes a playable game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let players = self.player_count();
        if players == 0 {
            return Err(ConfigError::NoPlayers);
        }
        if players > 255 {
            return Err(ConfigError::TooManyPlayers(players));
        }
        if self.table_size < 3 || self.table_size > u16::MAX as usize {
            return Err(ConfigError::TableTooSmall(self.table_size));
        }
        if self.deck_size < 3 || self.deck_size > u16::MAX as usize {
            return Err(ConfigError::DeckTooSmall(self.deck_size));
        }
        if let Some(timeout) = self.timer.timeout() {
            if timeout.is_zero() {
                return Err(ConfigError::ZeroInterval("timer.timeout_ms"));
            }
            if self.warning_threshold() > timeout {
                return Err(ConfigError::WarningExceedsTimeout);
            }
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("poll_interval_ms"));
        }
        if self.freeze_tick_ms == 0 {
            return Err(ConfigError::ZeroInterval("freeze_tick_ms"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert_eq!(config.player_count(), 2);
        assert_eq!(config.timer.timeout(), Some(Duration::from_secs(60)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_humans_take_lowest_ids() {
        let config = GameConfig::default().with_players(2, 1);
        assert!(config.is_human(PlayerId::new(0)));
        assert!(config.is_human(PlayerId::new(1)));
        assert!(!config.is_human(PlayerId::new(2)));
    }

    #[test]
    fn test_player_name_fallback() {
        let mut config = GameConfig::default();
        config.player_names = vec!["Alice".to_string()];
        assert_eq!(config.player_name(PlayerId::new(0)), "Alice");
        assert_eq!(config.player_name(PlayerId::new(1)), "Player 1");
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        assert!(matches!(
            GameConfig::default().with_players(0, 0).validate(),
            Err(ConfigError::NoPlayers)
        ));
        assert!(matches!(
            GameConfig::default().with_table_size(2).validate(),
            Err(ConfigError::TableTooSmall(2))
        ));
        assert!(matches!(
            GameConfig::default().with_deck_size(1).validate(),
            Err(ConfigError::DeckTooSmall(1))
        ));
        assert!(matches!(
            GameConfig::default()
                .with_timer(TimerMode::countdown(Duration::from_secs(2)))
                .validate(),
            Err(ConfigError::WarningExceedsTimeout)
        ));
        assert!(matches!(
            GameConfig::default().with_poll_interval(Duration::ZERO).validate(),
            Err(ConfigError::ZeroInterval("poll_interval_ms"))
        ));
    }

    #[test]
    fn test_non_countdown_modes_skip_warning_check() {
        let config = GameConfig::default()
            .with_timer(TimerMode::Elapsed)
            .with_warning_threshold(Duration::from_secs(600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = GameConfig::from_json(
            r#"{ "table_size": 9, "timer": { "mode": "disabled" }, "hints": true }"#,
        )
        .unwrap();

        assert_eq!(config.table_size, 9);
        assert_eq!(config.timer, TimerMode::Disabled);
        assert!(config.hints);
        assert_eq!(config.deck_size, 81);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(GameConfig::from_json("{"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let config = GameConfig::default().with_timer(TimerMode::Elapsed).with_seed(9);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }
}
