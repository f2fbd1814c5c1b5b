//! CLI frontend for Desolate, a survival maze crawler.

mod commands;
mod leaderboard;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "desolate",
    about = "Desolate: generate mazes and survive them",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a world and print its map and stats
    Generate {
        /// Side length of the grid
        #[arg(long, default_value = "20")]
        size: usize,

        /// RNG seed for deterministic generation
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Print the world as JSON instead of a map
        #[arg(long)]
        json: bool,
    },

    /// Run a headless game driven by an explorer bot
    Simulate {
        /// Side length of the grid (overrides the config file)
        #[arg(long)]
        size: Option<usize>,

        /// RNG seed (overrides the config file)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Stop after this many steps if the survivor is still alive
        #[arg(long, default_value = "10000")]
        max_steps: u64,

        /// JSON run configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show all narrative events
        #[arg(short, long)]
        verbose: bool,

        /// Add the final score to this leaderboard file
        #[arg(long)]
        record: Option<PathBuf>,
    },

    /// Play interactively with live timers
    Play {
        /// Side length of the grid (overrides the config file)
        #[arg(long)]
        size: Option<usize>,

        /// RNG seed (overrides the config file)
        #[arg(short, long)]
        seed: Option<u64>,

        /// JSON run configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Add the final score to this leaderboard file
        #[arg(long)]
        record: Option<PathBuf>,
    },

    /// Show the leaderboard
    Scores {
        /// Leaderboard file (default: desolate-scores.json)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate { size, seed, json } => commands::generate::run(size, seed, json),
        Commands::Simulate {
            size,
            seed,
            max_steps,
            config,
            verbose,
            record,
        } => commands::simulate::run(commands::simulate::SimulateArgs {
            size,
            seed,
            max_steps,
            config: config.as_deref(),
            verbose,
            record: record.as_deref(),
        }),
        Commands::Play {
            size,
            seed,
            config,
            record,
        } => commands::play::run(size, seed, config.as_deref(), record.as_deref()),
        Commands::Scores { file } => commands::scores::run(file.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
