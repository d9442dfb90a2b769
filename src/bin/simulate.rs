//! Simulate Binary
//!
//! Runs a game of automated players with log output and prints the standings.
//!
//! Options: --players, --timeout-secs, --elapsed, --no-timer, --hints, --config

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use triple_rush::games::features::MAX_FEATURES;
use triple_rush::*;

#[derive(Parser)]
#[command(author, version, about = "Run a game between automated players", long_about = None)]
struct Args {
    /// JSON config file; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of automated players.
    #[arg(long)]
    players: Option<usize>,

    /// Features per card; the deck holds 3^features cards.
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..=MAX_FEATURES as i64))]
    features: u32,

    /// Board slots.
    #[arg(long)]
    table_size: Option<usize>,

    /// Reshuffle countdown in seconds.
    #[arg(long, conflicts_with_all = ["elapsed", "no_timer"])]
    timeout_secs: Option<u64>,

    /// Show elapsed time instead of a countdown.
    #[arg(long, conflicts_with = "no_timer")]
    elapsed: bool,

    /// No timer at all.
    #[arg(long)]
    no_timer: bool,

    /// Pause between automated key presses, in milliseconds.
    #[arg(long)]
    bot_delay_ms: Option<u64>,

    #[arg(long)]
    seed: Option<u64>,

    /// Log every valid triple after each deal.
    #[arg(long)]
    hints: bool,

    /// Stop the game after this many seconds.
    #[arg(long)]
    duration_secs: Option<u64>,
}

impl Args {
    fn config(&self, deck_size: usize) -> Result<GameConfig, GameError> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json(&std::fs::read_to_string(path)?)?,
            None => GameConfig::default(),
        };

        config.deck_size = deck_size;
        config.human_players = 0;
        if let Some(players) = self.players {
            config.computer_players = players;
        }
        if let Some(table_size) = self.table_size {
            config.table_size = table_size;
        }
        if let Some(secs) = self.timeout_secs {
            config.timer = TimerMode::countdown(Duration::from_secs(secs));
            config.warning_threshold_ms = config.warning_threshold_ms.min(secs * 1000);
        }
        if self.elapsed {
            config.timer = TimerMode::Elapsed;
        }
        if self.no_timer {
            config.timer = TimerMode::Disabled;
        }
        if let Some(delay) = self.bot_delay_ms {
            config.bot_delay_ms = delay;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.hints |= self.hints;

        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), GameError> {
    let rules = FeatureRules::try_new(args.features)?;
    let config = args.config(rules.deck_size().unwrap_or_default())?;
    let handle = Game::new(config, Arc::new(rules), Arc::new(LogDisplay))?.start()?;

    if let Some(secs) = args.duration_secs {
        let deadline = Instant::now() + Duration::from_secs(secs);
        while !handle.is_finished() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(50));
        }
        handle.terminate();
    }

    let outcome = handle.join()?;
    for (player, score) in &outcome.scores {
        let marker = if outcome.winners.contains(player) { "*" } else { " " };
        println!("{marker} {player}: {score}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_flag_bounds() {
        for bad in ["0", "11"] {
            assert!(Args::try_parse_from(["simulate", "--features", bad]).is_err());
        }

        let args = Args::try_parse_from(["simulate", "--features", "3", "--players", "2"]).unwrap();
        let rules = FeatureRules::try_new(args.features).unwrap();
        let config = args.config(rules.deck_size().unwrap_or_default()).unwrap();
        assert_eq!(config.deck_size, 27);
        assert_eq!(config.computer_players, 2);
    }
}
