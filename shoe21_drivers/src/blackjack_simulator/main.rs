mod simulation;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use shoe21::Rule;
use shoe21_drivers::{format_results_table, init_logging, load_config, run_simulation, session_rng};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Yaml,
}

/// Plays many rounds with an automatic player and reports the outcomes
/// per initial situation and first decision.
#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file. `~/.shoe21.yml` is read when it exists
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of rounds to play
    #[arg(short = 'n', long)]
    rounds: Option<u64>,

    /// Seed of the session generator
    #[arg(short, long)]
    seed: Option<u64>,

    /// `Random` or `Threshold`
    #[arg(long)]
    strategy: Option<String>,

    /// The threshold player hits below this total
    #[arg(long)]
    hit_below: Option<u16>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print every round as it is played
    #[arg(short, long, conflicts_with = "format")]
    verbose: bool,

    /// One of error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = CommandLineArgs::parse();
    let mut config = load_config(args.config.as_deref())?;
    init_logging(args.log_level.as_deref().or(config.log_level.as_deref()))?;

    let simulator_config = &mut config.blackjack_simulator;
    if let Some(rounds) = args.rounds {
        simulator_config.number_of_rounds = rounds;
    }
    if let Some(seed) = args.seed {
        simulator_config.seed = Some(seed);
    }
    if let Some(strategy) = args.strategy {
        simulator_config.strategy = strategy;
    }
    if let Some(hit_below) = args.hit_below {
        simulator_config.hit_below = hit_below;
    }

    let rule: Rule = config
        .rule
        .clone()
        .try_into()
        .context("invalid rule in config")?;
    let (seed, mut rng) = session_rng(config.blackjack_simulator.seed);
    info!(seed, "session seed");

    let mut handler = simulation::Handler::new(args.verbose);
    let table = run_simulation(&rule, &config.blackjack_simulator, &mut rng, &mut handler)?;

    match args.format {
        OutputFormat::Text => {
            print!("{}", format_results_table(&table));
            println!("{}", handler.summary());
            println!("Seed: {}", seed);
        }
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&table)?),
    }
    Ok(())
}
