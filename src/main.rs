//! Obelisk CLI - train scripted agents, search joint plans, and evaluate moves.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use obelisk::rollout::RolloutConfig;

/// Obelisk - a simultaneous-turn faction strategy simulator
#[derive(Parser, Debug)]
#[command(name = "obelisk")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evolve scripted agents and print the best of every tenth round
    Evolve {
        /// JSON trainer configuration (flags below override it)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Population size (default: 300)
        #[arg(short, long)]
        population: Option<usize>,

        /// Generations to run (default: 1000)
        #[arg(short, long)]
        generations: Option<usize>,

        /// Random regroupings per generation (default: 200)
        #[arg(long)]
        sub_rounds: Option<usize>,

        /// Players per simulated game (default: 6)
        #[arg(long)]
        group_size: Option<usize>,

        /// Per-gene mutation probability (default: 0.5)
        #[arg(short, long)]
        mutation: Option<f64>,

        /// Clone a single parent instead of crossing two
        #[arg(long)]
        asexual: bool,

        /// Random seed (default: 42)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Agents listed per report (default: 10)
        #[arg(short, long)]
        top: Option<usize>,

        /// Show progress bar
        #[arg(long)]
        progress: bool,
    },

    /// Exhaustively search joint plans at increasing depth
    Search {
        /// JSON roster: an array of {walls, soldiers, barracks, obelisks}
        #[arg(short, long)]
        roster: Option<PathBuf>,

        /// Deepest search (default: 2)
        #[arg(short = 'd', long, default_value = "2")]
        max_depth: usize,

        /// Per-depth time limit in seconds
        #[arg(long)]
        deadline_secs: Option<f64>,

        /// Expand siblings on one thread
        #[arg(long)]
        sequential: bool,
    },

    /// Rank a player's first-turn actions by random rollouts
    Rollout {
        /// JSON roster: an array of {walls, soldiers, barracks, obelisks}
        #[arg(short, long)]
        roster: Option<PathBuf>,

        /// Player to evaluate (default: all)
        #[arg(short, long)]
        player: Option<usize>,

        /// Rollouts per action (default: 1000)
        #[arg(short = 'n', long, default_value = "1000")]
        samples: usize,

        /// Turns per rollout (default: 10)
        #[arg(long, default_value = "10")]
        rounds: usize,

        /// Turn number the rollouts start at (default: 0)
        #[arg(long, default_value = "0")]
        round_offset: usize,

        /// Random seed (default: 0)
        #[arg(short, long, default_value = "0")]
        seed: u64,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Evolve {
            config,
            population,
            generations,
            sub_rounds,
            group_size,
            mutation,
            asexual,
            seed,
            top,
            progress,
        } => cli::evolve::execute(&cli::evolve::EvolveArgs {
            config,
            population,
            generations,
            sub_rounds,
            group_size,
            mutation,
            asexual,
            seed,
            top,
            progress,
        }),

        Commands::Search {
            roster,
            max_depth,
            deadline_secs,
            sequential,
        } => cli::search::execute(roster.as_deref(), max_depth, deadline_secs, sequential),

        Commands::Rollout {
            roster,
            player,
            samples,
            rounds,
            round_offset,
            seed,
        } => cli::rollout::execute(
            roster.as_deref(),
            player,
            RolloutConfig {
                samples,
                rounds,
                round_offset,
                seed,
            },
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
