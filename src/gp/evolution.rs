//! Main evolution loop.
//!
//! Each generation the current population is scored by group simulation,
//! ranked, and replaced by the survivors plus their offspring.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::GameError;
use crate::gp::fitness::{evaluate_population, FitnessConfig};
use crate::gp::genome::{Genome, GENOME_LENGTH};
use crate::gp::selection::{rank, select_next_generation, LossStats, Population, SelectionConfig};

/// Configuration for the evolution process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Population size.
    pub population_size: usize,
    /// Genes per genome.
    pub genome_length: usize,
    /// Number of generations to run.
    pub generations: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
    /// Report every N generations.
    pub report_interval: usize,
    /// Agents listed in each report.
    pub top_agents: usize,
    /// Fitness evaluation configuration.
    pub fitness: FitnessConfig,
    /// Selection configuration.
    pub selection: SelectionConfig,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 300,
            genome_length: GENOME_LENGTH,
            generations: 1000,
            seed: 42,
            report_interval: 10,
            top_agents: 10,
            fitness: FitnessConfig::default(),
            selection: SelectionConfig::default(),
        }
    }
}

impl EvolutionConfig {
    /// Reject configurations the trainer cannot run.
    ///
    /// # Errors
    ///
    /// Returns [`EvolutionError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<(), EvolutionError> {
        let invalid = |reason: String| Err(EvolutionError::InvalidConfig(reason));

        if self.population_size == 0 {
            return invalid("population size must be positive".to_string());
        }
        if self.fitness.group_size == 0 {
            return invalid("group size must be positive".to_string());
        }
        if self.genome_length == 0 {
            return invalid("genome length must be positive".to_string());
        }
        if self.fitness.steps != self.genome_length {
            return invalid(format!(
                "games last {} turns but genomes script {}",
                self.fitness.steps, self.genome_length
            ));
        }
        if self.fitness.sub_rounds == 0 {
            return invalid("at least one sub-round is required".to_string());
        }

        let survivors = self.selection.survivors(self.population_size);
        if self.selection.reproduce_population == 0 || self.selection.reproduce_population >= survivors {
            return invalid(format!(
                "reproduce population {} must be at least 1 and fewer than the {survivors} survivors",
                self.selection.reproduce_population
            ));
        }
        if !(0.0..=1.0).contains(&self.selection.mutation_rate) {
            return invalid(format!(
                "mutation rate {} is not a probability",
                self.selection.mutation_rate
            ));
        }

        Ok(())
    }
}

/// Error during evolution.
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// The configuration cannot be run.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A simulated turn was rejected.
    #[error("simulation failed: {0}")]
    Game(#[from] GameError),
}

/// Snapshot of one scored generation.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Generation number (1-based, matching the round counter).
    pub generation: usize,
    /// Loss statistics over the whole population.
    pub stats: LossStats,
    /// Best agents with their loss, best first.
    pub top: Vec<(Genome, f64)>,
}

/// Statistics for a single generation.
#[derive(Debug, Clone, Copy)]
pub struct GenerationStats {
    /// Generation number (1-based).
    pub generation: usize,
    /// Loss statistics.
    pub stats: LossStats,
}

/// Overall statistics from an evolution run.
#[derive(Debug, Clone)]
pub struct EvolutionStats {
    /// Statistics per generation.
    pub generations: Vec<GenerationStats>,
    /// Lowest loss seen in any generation.
    pub best_loss: f64,
    /// Generation where it was seen.
    pub best_generation: usize,
    /// Total time in seconds.
    pub elapsed_seconds: f64,
}

/// Drives the population one generation at a time.
#[derive(Debug)]
pub struct Trainer {
    config: EvolutionConfig,
    population: Population,
    rng: SmallRng,
}

impl Trainer {
    /// Seed a random population.
    ///
    /// # Errors
    ///
    /// Returns [`EvolutionError::InvalidConfig`] if the configuration is unusable.
    pub fn new(config: EvolutionConfig) -> Result<Self, EvolutionError> {
        config.validate()?;

        let mut rng = SmallRng::seed_from_u64(config.seed);
        let population = Population::random(&mut rng, config.population_size, config.genome_length);

        Ok(Self {
            config,
            population,
            rng,
        })
    }

    /// Current population.
    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Score the current population, then replace it with its successor.
    ///
    /// Returns the report for the generation that was scored.
    ///
    /// # Errors
    ///
    /// Propagates simulation errors.
    pub fn step_generation(&mut self) -> Result<GenerationReport, EvolutionError> {
        let loss = evaluate_population(&self.population.genomes, &self.config.fitness, &mut self.rng)?;
        let stats = LossStats::from_loss(&loss);
        let top = rank(&loss)
            .into_iter()
            .take(self.config.top_agents)
            .map(|i| (self.population.genomes[i].clone(), loss[i]))
            .collect();

        let report = GenerationReport {
            generation: self.population.generation + 1,
            stats,
            top,
        };

        log::info!(
            "Gen {:>5}: best={:.4} mean={:.4} std={:.4}",
            report.generation,
            stats.best,
            stats.mean,
            stats.std
        );

        let current = std::mem::replace(
            &mut self.population,
            Population {
                generation: 0,
                genomes: Vec::new(),
            },
        );
        self.population = select_next_generation(current, &loss, &self.config.selection, &mut self.rng);

        Ok(report)
    }

    /// Run every configured generation.
    ///
    /// `on_report` receives every `report_interval`-th generation report.
    ///
    /// # Errors
    ///
    /// Propagates simulation errors.
    pub fn run<F>(&mut self, mut on_report: F) -> Result<EvolutionStats, EvolutionError>
    where
        F: FnMut(&GenerationReport),
    {
        let start_time = std::time::Instant::now();
        let mut generations = Vec::with_capacity(self.config.generations);
        let mut best_loss = f64::INFINITY;
        let mut best_generation = 0;

        for _ in 0..self.config.generations {
            let report = self.step_generation()?;

            if report.stats.best < best_loss {
                best_loss = report.stats.best;
                best_generation = report.generation;
            }

            generations.push(GenerationStats {
                generation: report.generation,
                stats: report.stats,
            });

            if self.config.report_interval > 0 && report.generation.is_multiple_of(self.config.report_interval) {
                on_report(&report);
            }
        }

        Ok(EvolutionStats {
            generations,
            best_loss,
            best_generation,
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
        })
    }
}

/// Run evolution with `config`, reporting through `on_report`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a simulation fails.
pub fn evolve<F>(config: EvolutionConfig, on_report: F) -> Result<(Population, EvolutionStats), EvolutionError>
where
    F: FnMut(&GenerationReport),
{
    let mut trainer = Trainer::new(config)?;
    let stats = trainer.run(on_report)?;
    Ok((trainer.population, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> EvolutionConfig {
        EvolutionConfig {
            population_size: 24,
            genome_length: 12,
            generations: 4,
            seed: 7,
            report_interval: 2,
            top_agents: 3,
            fitness: FitnessConfig {
                sub_rounds: 3,
                group_size: 6,
                steps: 12,
                victory_obelisks: None,
            },
            selection: SelectionConfig {
                retain_population: 11,
                reproduce_population: 6,
                ..SelectionConfig::default()
            },
        }
    }

    #[test]
    fn test_evolution_config_default() {
        let config = EvolutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population_size, 300);
        assert_eq!(config.selection.retain_population, 225);
        assert_eq!(config.selection.reproduce_population, 75);
    }

    #[test]
    fn test_zero_sizes_fail_fast() {
        let config = EvolutionConfig {
            population_size: 0,
            ..EvolutionConfig::default()
        };
        assert!(matches!(Trainer::new(config), Err(EvolutionError::InvalidConfig(_))));

        let mut config = EvolutionConfig::default();
        config.fitness.group_size = 0;
        assert!(matches!(config.validate(), Err(EvolutionError::InvalidConfig(_))));
    }

    #[test]
    fn test_reproduce_pool_must_fit_survivors() {
        let mut config = small_config();
        config.selection.reproduce_population = 12;
        assert!(config.validate().is_err());
        config.selection.reproduce_population = 11;
        assert!(config.validate().is_ok());
        config.selection.reproduce_population = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_game_length_must_match_genome_length() {
        let config: EvolutionConfig = serde_json::from_str(r#"{"genome_length": 20}"#).unwrap();
        assert_eq!(config.fitness.steps, 40);
        assert!(matches!(config.validate(), Err(EvolutionError::InvalidConfig(_))));
        assert!(Trainer::new(config).is_err());

        let mut config = small_config();
        config.fitness.steps = 13;
        assert!(config.validate().is_err());
        config.fitness.steps = config.genome_length;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_mutation_rate_rejected() {
        let mut config = small_config();
        config.selection.mutation_rate = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_population_size_is_invariant() {
        let mut trainer = Trainer::new(small_config()).unwrap();
        for generation in 1..=3 {
            let report = trainer.step_generation().unwrap();
            assert_eq!(report.generation, generation);
            assert_eq!(report.top.len(), 3);
            assert!(report.top.windows(2).all(|w| w[0].1 <= w[1].1));
            assert_eq!(trainer.population().len(), 24);
            assert_eq!(trainer.population().generation, generation);
        }
    }

    #[test]
    fn test_run_reports_on_interval() {
        let mut seen = Vec::new();
        let (population, stats) = evolve(small_config(), |report| seen.push(report.generation)).unwrap();

        assert_eq!(seen, vec![2, 4]);
        assert_eq!(stats.generations.len(), 4);
        assert_eq!(population.generation, 4);
        assert!(stats.best_generation >= 1);
    }

    #[test]
    fn test_same_seed_same_run() {
        let (a, _) = evolve(small_config(), |_| {}).unwrap();
        let (b, _) = evolve(small_config(), |_| {}).unwrap();
        assert_eq!(a, b);
    }
}
