//! CLI command for the evolutionary trainer.

use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use obelisk::gp::{EvolutionConfig, Trainer};

use crate::cli::output::format_report;
use crate::cli::CliError;

/// Overrides for individual fields of the trainer configuration.
#[derive(Debug, Clone, Default)]
pub(crate) struct EvolveArgs {
    pub(crate) config: Option<PathBuf>,
    pub(crate) population: Option<usize>,
    pub(crate) generations: Option<usize>,
    pub(crate) sub_rounds: Option<usize>,
    pub(crate) group_size: Option<usize>,
    pub(crate) mutation: Option<f64>,
    pub(crate) asexual: bool,
    pub(crate) seed: Option<u64>,
    pub(crate) top: Option<usize>,
    pub(crate) progress: bool,
}

/// Build the configuration: file (or defaults), then flag overrides.
///
/// Survivor and parent pools follow the population size at 3/4 and 1/4
/// unless the configuration file sets them.
pub(crate) fn build_config(args: &EvolveArgs) -> Result<EvolutionConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::new(format!("cannot read config {}: {e}", path.display())))?;
            serde_json::from_str(&text)?
        }
        None => EvolutionConfig::default(),
    };

    if let Some(population) = args.population {
        config.population_size = population;
        if args.config.is_none() {
            config.selection.retain_population = population * 3 / 4;
            config.selection.reproduce_population = population / 4;
        }
    }
    if let Some(generations) = args.generations {
        config.generations = generations;
    }
    if let Some(sub_rounds) = args.sub_rounds {
        config.fitness.sub_rounds = sub_rounds;
    }
    if let Some(group_size) = args.group_size {
        config.fitness.group_size = group_size;
    }
    if let Some(rate) = args.mutation {
        config.selection.mutation_rate = rate;
    }
    if args.asexual {
        config.selection.sexual_reproduction = false;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(top) = args.top {
        config.top_agents = top;
    }

    config.validate()?;
    Ok(config)
}

/// Execute the evolve command.
pub(crate) fn execute(args: &EvolveArgs) -> Result<(), CliError> {
    let config = build_config(args)?;
    let mut trainer = Trainer::new(config)?;

    let pb = if args.progress {
        let pb = ProgressBar::new(config.generations as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} generations ({per_sec})")
                .map_err(|e| CliError::new(e.to_string()))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let stats = trainer.run(|report| {
        let text = format_report(report);
        match &pb {
            Some(pb) => {
                pb.set_position(report.generation as u64);
                pb.println(text.trim_end());
            }
            None => print!("{text}"),
        }
    })?;

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    println!();
    println!("Evolution complete!");
    println!("  Best loss: {:.4}", stats.best_loss);
    println!("  Best generation: {}", stats.best_generation);
    println!("  Elapsed time: {:.1}s", stats.elapsed_seconds);

    Ok(())
}
