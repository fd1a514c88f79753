//! Selection for the evolutionary trainer.
//!
//! Truncation selection: the best-ranked slice survives unchanged and the
//! population is refilled with offspring of the very top agents.

// Selection uses intentional casts for statistics
#![allow(clippy::cast_precision_loss)]

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::gp::crossover::crossover;
use crate::gp::genome::Genome;
use crate::gp::mutation::mutate;

/// Configuration for selection and reproduction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Survivors are the best `retain_population + 1` agents.
    pub retain_population: usize,
    /// Parents are drawn uniformly from the best `reproduce_population` agents.
    pub reproduce_population: usize,
    /// Probability of redrawing each gene of an offspring.
    pub mutation_rate: f64,
    /// Breed two parents (`true`) or copy one (`false`).
    pub sexual_reproduction: bool,
    /// Apply mutation to offspring.
    pub mutate_offspring: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            retain_population: 225,
            reproduce_population: 75,
            mutation_rate: 0.5,
            sexual_reproduction: true,
            mutate_offspring: true,
        }
    }
}

impl SelectionConfig {
    /// Survivor count for a population of `population` agents.
    #[must_use]
    pub fn survivors(&self, population: usize) -> usize {
        (self.retain_population + 1).min(population)
    }
}

/// An owned generation of genomes.
///
/// Each generation is replaced wholesale by [`select_next_generation`].
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    /// Generation number, starting at 0.
    pub generation: usize,
    /// Members of the generation.
    pub genomes: Vec<Genome>,
}

impl Population {
    /// A random first generation.
    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R, size: usize, genome_length: usize) -> Self {
        Self {
            generation: 0,
            genomes: (0..size).map(|_| Genome::random(rng, genome_length)).collect(),
        }
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    /// Whether the population has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }
}

/// Indices of `loss` sorted best (lowest) first.
#[must_use]
pub fn rank(loss: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..loss.len()).collect();
    order.sort_by(|&a, &b| loss[a].total_cmp(&loss[b]));
    order
}

/// Build the next generation from `population` ranked by `loss`.
///
/// The successor has the same size as `population`.
#[must_use]
pub fn select_next_generation<R: Rng + ?Sized>(
    population: Population,
    loss: &[f64],
    config: &SelectionConfig,
    rng: &mut R,
) -> Population {
    debug_assert_eq!(population.len(), loss.len());
    let size = population.len();
    let mut slots: Vec<Option<Genome>> = population.genomes.into_iter().map(Some).collect();

    let survivors: Vec<Genome> = rank(loss)
        .into_iter()
        .take(config.survivors(size))
        .filter_map(|i| slots[i].take())
        .collect();

    let pool = &survivors[..config.reproduce_population.min(survivors.len())];
    let mut genomes = Vec::with_capacity(size);
    genomes.extend(survivors.iter().cloned());

    while genomes.len() < size {
        let Some(female) = pool.choose(rng) else {
            break;
        };

        let child = if config.sexual_reproduction {
            let male = pool.choose(rng).unwrap_or(female);
            crossover(female, male, rng)
        } else {
            female.clone()
        };

        genomes.push(if config.mutate_offspring {
            mutate(&child, config.mutation_rate, rng)
        } else {
            child
        });
    }

    Population {
        generation: population.generation + 1,
        genomes,
    }
}

/// Summary statistics of a loss vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossStats {
    /// Mean loss of the population.
    pub mean: f64,
    /// Lowest loss in the population.
    pub best: f64,
    /// Highest loss in the population.
    pub worst: f64,
    /// Standard deviation of loss.
    pub std: f64,
}

impl LossStats {
    /// Calculate statistics from loss values.
    #[must_use]
    pub fn from_loss(loss: &[f64]) -> Self {
        if loss.is_empty() {
            return Self {
                mean: 0.0,
                best: 0.0,
                worst: 0.0,
                std: 0.0,
            };
        }

        let mean = loss.iter().sum::<f64>() / loss.len() as f64;
        let best = loss.iter().copied().fold(f64::INFINITY, f64::min);
        let worst = loss.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let variance = loss.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / loss.len() as f64;

        Self {
            mean,
            best,
            worst,
            std: variance.sqrt(),
        }
    }
}
