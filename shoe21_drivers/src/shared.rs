mod console;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use shoe21::aggregation::{
    ResultsTable, SimulationAggregator, DEFAULT_NUMBER_OF_ROUNDS, DEFAULT_PROGRESS_INTERVAL,
};
use shoe21::simulation::{RoundEngine, RoundEventHandler, Shoe};
use shoe21::strategy::{RandomStrategy, Strategy, ThresholdStrategy};
use shoe21::{Rule, DEALER_STAND_TOTAL, DEFAULT_NUMBER_OF_DECKS, DEFAULT_RESHUFFLE_THRESHOLD};
use thiserror::Error;
use tracing::{info, Level};

pub use console::{parse_decision, parse_menu_choice, ConsoleHandler, ConsoleStrategy, MenuChoice};

pub const DEFAULT_CONFIG_FILE_NAME: &str = ".shoe21.yml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rule: ConfigRule,
    pub blackjack_simulator: ConfigBlackjackSimulator,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigRule {
    pub number_of_decks: u8,
    pub reshuffle_threshold: u16,
}

impl Default for ConfigRule {
    fn default() -> Self {
        ConfigRule {
            number_of_decks: DEFAULT_NUMBER_OF_DECKS,
            reshuffle_threshold: DEFAULT_RESHUFFLE_THRESHOLD,
        }
    }
}

impl TryFrom<ConfigRule> for Rule {
    type Error = ConfigError;

    fn try_from(config_rule: ConfigRule) -> Result<Rule, Self::Error> {
        let rule = Rule {
            number_of_decks: config_rule.number_of_decks,
            reshuffle_threshold: config_rule.reshuffle_threshold,
        };
        rule.validate().map_err(|err| ConfigError::Invalid(err.to_string()))?;

        Ok(rule)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_enum_str, Deserialize_enum_str)]
pub enum StrategyKind {
    Random,
    Threshold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigBlackjackSimulator {
    pub number_of_rounds: u64,
    pub strategy: String,
    /// Only used by the `Threshold` strategy.
    pub hit_below: u16,
    /// A fresh seed is drawn when absent.
    pub seed: Option<u64>,
    pub progress_interval: u64,
}

impl Default for ConfigBlackjackSimulator {
    fn default() -> Self {
        ConfigBlackjackSimulator {
            number_of_rounds: DEFAULT_NUMBER_OF_ROUNDS,
            strategy: StrategyKind::Random.to_string(),
            hit_below: DEALER_STAND_TOTAL,
            seed: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl ConfigBlackjackSimulator {
    pub fn strategy_kind(&self) -> Result<StrategyKind, ConfigError> {
        self.strategy
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("unknown strategy {:?}", self.strategy)))
    }
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(filename: &Path) -> Result<Config, ConfigError> {
    let file_content = fs::read_to_string(filename).map_err(|source| ConfigError::Io {
        path: filename.to_path_buf(),
        source,
    })?;
    parse_config(&file_content)
}

pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Loads the config at `path`, or at `~/.shoe21.yml` when no path is given.
/// A missing default file means the default config; a missing explicit file is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = path {
        return parse_config_from_file(path);
    }

    match home::home_dir().map(|home_dir| home_dir.join(DEFAULT_CONFIG_FILE_NAME)) {
        Some(default_path) if default_path.is_file() => parse_config_from_file(&default_path),
        _ => Ok(Config::default()),
    }
}

/// Installs the global log subscriber. Logs go to stderr so reports on stdout stay clean.
pub fn init_logging(log_level: Option<&str>) -> Result<(), ConfigError> {
    let level = match log_level {
        Some(level) => Level::from_str(level)
            .map_err(|_| ConfigError::Invalid(format!("invalid log level {:?}", level)))?,
        None => Level::WARN,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// The session generator every other generator is derived from.
pub fn session_rng(seed: Option<u64>) -> (u64, StdRng) {
    let seed = seed.unwrap_or_else(rand::random);
    (seed, StdRng::seed_from_u64(seed))
}

pub fn build_strategy(
    simulator_config: &ConfigBlackjackSimulator,
    session_rng: &mut StdRng,
) -> Result<Box<dyn Strategy>, ConfigError> {
    let strategy: Box<dyn Strategy> = match simulator_config.strategy_kind()? {
        StrategyKind::Random => Box::new(RandomStrategy::new(
            StdRng::from_rng(session_rng).map_err(|err| ConfigError::Invalid(err.to_string()))?,
        )),
        StrategyKind::Threshold => Box::new(ThresholdStrategy::new(simulator_config.hit_below)),
    };
    Ok(strategy)
}

/// Plays the configured number of rounds on a fresh shoe, one shared across every round.
/// The shoe and the strategy draw their generators from `session_rng`.
pub fn run_simulation<H>(
    rule: &Rule,
    simulator_config: &ConfigBlackjackSimulator,
    session_rng: &mut StdRng,
    handler: &mut H,
) -> anyhow::Result<ResultsTable>
where
    H: RoundEventHandler + ?Sized,
{
    let shoe = Shoe::new(rule, StdRng::from_rng(&mut *session_rng)?)?;
    let mut engine = RoundEngine::new(shoe);
    let mut strategy = build_strategy(simulator_config, session_rng)?;
    info!(
        strategy = %simulator_config.strategy,
        reshuffle_threshold = rule.reshuffle_threshold,
        "simulating"
    );

    let table = SimulationAggregator::new(simulator_config.number_of_rounds)
        .with_progress_interval(simulator_config.progress_interval)
        .run_with_handler(&mut engine, strategy.as_mut(), handler)?;
    Ok(table)
}

/// Formats the results table, one line per (player total, dealer up-card, decision).
pub fn format_results_table(table: &ResultsTable) -> String {
    const WIDTH: usize = 72;
    let mut report = format!(
        "{:>6} {:>6} {:>8} {:>10} {:>10} {:>10} {:>10}\n",
        "player", "dealer", "decision", "wins", "losses", "draws", "ev"
    );
    report.push_str(&"-".repeat(WIDTH));
    report.push('\n');
    for row in table.rows() {
        report.push_str(&format!(
            "{:>6} {:>6} {:>8} {:>10} {:>10} {:>10} {:>10.4}\n",
            row.player_total,
            format_up_card(row.dealer_up_card),
            row.decision.to_string(),
            row.wins,
            row.losses,
            row.draws,
            row.expected_value,
        ));
    }
    report.push_str(&"-".repeat(WIDTH));
    report.push('\n');

    let totals = table.totals();
    report.push_str(&format!(
        "{:>6} {:>6} {:>8} {:>10} {:>10} {:>10} {:>10.4}\n",
        "total",
        "",
        "",
        totals.wins,
        totals.losses,
        totals.draws,
        totals.expected_value(),
    ));
    report
}

fn format_up_card(value: u8) -> String {
    if value == 11 {
        String::from("A")
    } else {
        value.to_string()
    }
}
