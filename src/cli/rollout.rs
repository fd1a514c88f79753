//! CLI command for Monte Carlo action evaluation.

use std::path::Path;
use std::time::Instant;

use obelisk::gp::compute_loss;
use obelisk::rollout::{best_action, RolloutConfig};
use obelisk::RandomPolicy;

use crate::cli::output::format_rollout;
use crate::cli::{load_roster, CliError};

/// Execute the rollout command.
///
/// Evaluates `player`, or every player when `None`, under uniformly random
/// play by everyone else.
pub(crate) fn execute(
    roster: Option<&Path>,
    player: Option<usize>,
    config: RolloutConfig,
) -> Result<(), CliError> {
    let players = load_roster(roster)?;
    let indices: Vec<usize> = match player {
        Some(index) if index >= players.len() => {
            return Err(CliError::new(format!(
                "player {index} is out of range for {} players",
                players.len()
            )));
        }
        Some(index) => vec![index],
        None => (0..players.len()).collect(),
    };

    let start = Instant::now();

    println!("=== Monte Carlo Method ===");
    println!(
        "{} samples of {} rounds, starting at turn {}.",
        config.samples,
        config.rounds,
        config.round_offset + 1
    );
    println!("Format: 'Action: loss±confidence', minimize loss.");
    println!();

    for index in indices {
        let (best, table) = best_action(&players, index, &[], &config, &RandomPolicy, compute_loss)?;
        println!("{}", format_rollout(index, best, &table));
    }

    println!("Time taken: {:.2?}", start.elapsed());
    Ok(())
}
