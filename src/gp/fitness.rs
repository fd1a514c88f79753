//! Fitness evaluation for the evolutionary trainer.
//!
//! Fitness is a loss (lower is better) measuring how far a player trails the
//! best of its group at the end of a scripted game. Every sub-round the
//! population is shuffled into fresh groups; groups are simulated in
//! parallel and the per-agent loss is averaged over sub-rounds.

// Loss arithmetic converts small counters to floating point
#![allow(clippy::cast_precision_loss)]

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::GameResult;
use crate::game::{step, PlayerState};
use crate::gp::genome::Genome;
use crate::policy::decide_all;

/// Configuration for fitness evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    /// Number of random regroupings per generation.
    pub sub_rounds: usize,
    /// Players per simulated game; the last group may be smaller.
    pub group_size: usize,
    /// Turns per simulated game.
    pub steps: usize,
    /// End a game early once any player holds this many obelisks.
    pub victory_obelisks: Option<i32>,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            sub_rounds: 200,
            group_size: 6,
            steps: crate::gp::genome::GENOME_LENGTH,
            victory_obelisks: None,
        }
    }
}

/// Relative-standing loss of `players[index]` against the others' maxima.
///
/// Obelisks dominate; barracks, soldiers and walls break ties.
#[must_use]
pub fn compute_loss(players: &[PlayerState], index: usize) -> f64 {
    let others = players
        .iter()
        .enumerate()
        .filter(|&(other, _)| other != index)
        .map(|(_, p)| p);

    let (max_obelisks, max_barracks, max_soldiers, max_walls) =
        others.fold((0, 0, 0, 0), |max, p| {
            (
                max.0.max(p.obelisks),
                max.1.max(p.barracks),
                max.2.max(p.soldiers),
                max.3.max(p.walls),
            )
        });

    let player = &players[index];

    f64::from(10 + max_obelisks) / 2.0 - f64::from(player.obelisks)
        + f64::from(max_barracks - player.barracks) / 10.0
        + f64::from(max_soldiers - player.soldiers) / 20.0
        + f64::from(max_walls - player.walls) / 10.0
}

/// Shuffle `0..population` into groups of at most `group_size` indices.
#[must_use]
pub fn partition_groups<R: Rng + ?Sized>(population: usize, group_size: usize, rng: &mut R) -> Vec<Vec<usize>> {
    let mut indices: Vec<usize> = (0..population).collect();
    indices.shuffle(rng);
    indices
        .chunks(group_size.max(1))
        .map(<[usize]>::to_vec)
        .collect()
}

/// Play one game between `agents` from fresh starting states.
///
/// Returns the final state, one player per agent in order.
///
/// # Errors
///
/// Propagates turn engine errors.
pub fn simulate_group<R: Rng>(agents: &[&Genome], config: &FitnessConfig, rng: &mut R) -> GameResult<Vec<PlayerState>> {
    let mut players = vec![PlayerState::default(); agents.len()];

    for turn in 0..config.steps {
        let actions = decide_all(agents, &players, turn, &mut *rng);
        step(&mut players, &actions)?;

        if config
            .victory_obelisks
            .is_some_and(|target| players.iter().any(|p| p.obelisks >= target))
        {
            break;
        }
    }

    Ok(players)
}

/// Average loss of every genome over `config.sub_rounds` regroupings.
///
/// `population` is only read; each group runs on its own seeded RNG so the
/// result depends on `rng` alone, not on thread scheduling.
///
/// # Errors
///
/// Propagates turn engine errors.
pub fn evaluate_population<R: Rng + ?Sized>(
    population: &[Genome],
    config: &FitnessConfig,
    rng: &mut R,
) -> GameResult<Vec<f64>> {
    let mut loss = vec![0.0; population.len()];

    for sub_round in 0..config.sub_rounds {
        let groups: Vec<(Vec<usize>, u64)> = partition_groups(population.len(), config.group_size, rng)
            .into_iter()
            .map(|group| (group, rng.r#gen()))
            .collect();

        let results: Vec<Vec<(usize, f64)>> = groups
            .par_iter()
            .map(|(group, seed)| {
                let mut rng = SmallRng::seed_from_u64(*seed);
                let agents: Vec<&Genome> = group.iter().map(|&i| &population[i]).collect();
                let players = simulate_group(&agents, config, &mut rng)?;
                Ok(group
                    .iter()
                    .enumerate()
                    .map(|(n, &i)| (i, compute_loss(&players, n)))
                    .collect())
            })
            .collect::<GameResult<_>>()?;

        for (i, l) in results.into_iter().flatten() {
            loss[i] += l;
        }

        log::debug!("sub-round {sub_round}: {} groups simulated", groups.len());
    }

    if config.sub_rounds > 0 {
        for l in &mut loss {
            *l /= config.sub_rounds as f64;
        }
    }

    Ok(loss)
}
