use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shoe21::simulation::{RoundEngine, Shoe, SilentHandler};
use shoe21::Rule;
use shoe21_drivers::{
    format_results_table, init_logging, load_config, run_simulation, session_rng, ConsoleHandler,
    ConsoleStrategy, MenuChoice,
};
use tracing::info;

/// Plays blackjack hands against the dealer on the terminal.
#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file. `~/.shoe21.yml` is read when it exists
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed of the session generator
    #[arg(short, long)]
    seed: Option<u64>,

    /// One of error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = CommandLineArgs::parse();
    let config = load_config(args.config.as_deref())?;
    init_logging(args.log_level.as_deref().or(config.log_level.as_deref()))?;

    let rule: Rule = config
        .rule
        .clone()
        .try_into()
        .context("invalid rule in config")?;
    let (seed, mut rng) = session_rng(args.seed.or(config.blackjack_simulator.seed));
    info!(seed, "session seed");

    // Hands at the table share one shoe; every simulation gets its own.
    let mut engine = RoundEngine::new(Shoe::new(&rule, StdRng::from_rng(&mut rng)?)?);
    let stdin = io::stdin();
    let mut console = ConsoleStrategy::new(stdin.lock(), io::stdout());
    let mut handler = ConsoleHandler::new(io::stdout());

    println!("Welcome to blackjack! {} decks in the shoe.", rule.number_of_decks);
    loop {
        match console.read_menu_choice()? {
            Some(MenuChoice::PlayHand) => {
                engine.play_round(&mut console, &mut handler)?;
            }
            Some(MenuChoice::RunSimulation) => {
                println!(
                    "Simulating {} rounds...",
                    config.blackjack_simulator.number_of_rounds
                );
                let table = run_simulation(
                    &rule,
                    &config.blackjack_simulator,
                    &mut rng,
                    &mut SilentHandler,
                )?;
                print!("{}", format_results_table(&table));
            }
            Some(MenuChoice::Exit) | None => break,
        }
    }

    println!("Thanks for playing. Wallet: {:+}", handler.wallet());
    Ok(())
}
