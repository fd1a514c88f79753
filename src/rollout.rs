//! Monte Carlo action evaluation.
//!
//! A first-turn decision is scored by pinning some players' actions, letting
//! a policy play every other choice, and averaging a loss over many random
//! continuations.

// Sample counts convert to floating point for the running moments
#![allow(clippy::cast_precision_loss)]

use std::fmt;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::game::{possible_actions, step, Action, PlayerState};
use crate::policy::{decide_all, Policy};

/// Configuration for rollouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolloutConfig {
    /// Continuations played per estimate.
    pub samples: usize,
    /// Turns per continuation, the pinned turn included.
    pub rounds: usize,
    /// Turn number the rollouts start at, passed to the policy.
    pub round_offset: usize,
    /// Base seed; each evaluated action derives its own stream.
    pub seed: u64,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            samples: 1000,
            rounds: 10,
            round_offset: 0,
            seed: 0,
        }
    }
}

/// Sample mean and variance of a loss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Mean loss.
    pub mean: f64,
    /// Population variance of the loss.
    pub variance: f64,
    /// Number of samples behind the estimate.
    pub samples: usize,
}

impl Estimate {
    /// Half-width of the 95% confidence interval of the mean.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        if self.samples == 0 {
            return f64::INFINITY;
        }
        1.96 * (self.variance / self.samples as f64).sqrt()
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}±{:.3}", self.mean, self.confidence())
    }
}

/// Rollout estimate of one candidate action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionEstimate {
    /// Pinned first-turn action.
    pub action: Action,
    /// Loss estimate.
    pub estimate: Estimate,
}

/// Estimate `loss` after `config.rounds` turns from `players`.
///
/// The first turn's actions come from `policy` except for the players
/// named in `constraints`, which play their pinned action. Later turns are
/// left entirely to `policy`. With zero samples the estimate is all zeros.
///
/// # Errors
///
/// Returns [`GameError::UnknownPlayer`] if a constraint names a player not
/// in `players`.
pub fn monte_carlo<P, L, R>(
    players: &[PlayerState],
    constraints: &[(usize, Action)],
    config: &RolloutConfig,
    policy: &P,
    loss: L,
    rng: &mut R,
) -> GameResult<Estimate>
where
    P: Policy + ?Sized,
    L: Fn(&[PlayerState]) -> f64,
    R: Rng,
{
    if let Some(&(index, _)) = constraints.iter().find(|(index, _)| *index >= players.len()) {
        return Err(GameError::UnknownPlayer {
            index,
            players: players.len(),
        });
    }

    let policies = vec![policy; players.len()];
    let mut sum = 0.0;
    let mut sum_square = 0.0;

    for _ in 0..config.samples {
        let mut state = players.to_vec();

        for round in 0..config.rounds {
            let turn = config.round_offset + round;
            let mut actions = decide_all(&policies, &state, turn, &mut *rng);
            if round == 0 {
                for &(index, action) in constraints {
                    actions[index] = action;
                }
            }
            step(&mut state, &actions)?;
        }

        let value = loss(&state);
        sum += value;
        sum_square += value * value;
    }

    if config.samples == 0 {
        return Ok(Estimate {
            mean: 0.0,
            variance: 0.0,
            samples: 0,
        });
    }

    let mean = sum / config.samples as f64;
    Ok(Estimate {
        mean,
        variance: (sum_square / config.samples as f64 - mean * mean).max(0.0),
        samples: config.samples,
    })
}

/// Rank every legal first-turn action of `players[index]` by rollout.
///
/// `constraints` pins other players' first-turn actions. Actions are
/// evaluated in parallel, each on its own RNG derived from `config.seed`,
/// and returned in [`possible_actions`] order alongside the lowest-mean
/// action (earliest wins ties).
///
/// # Errors
///
/// Returns [`GameError::UnknownPlayer`] if `index` or a constraint is out of
/// range.
pub fn best_action<P, L>(
    players: &[PlayerState],
    index: usize,
    constraints: &[(usize, Action)],
    config: &RolloutConfig,
    policy: &P,
    loss: L,
) -> GameResult<(Action, Vec<ActionEstimate>)>
where
    P: Policy + ?Sized,
    L: Fn(&[PlayerState], usize) -> f64 + Sync,
{
    if index >= players.len() {
        return Err(GameError::UnknownPlayer {
            index,
            players: players.len(),
        });
    }

    let candidates = possible_actions(players, index);
    let table: Vec<ActionEstimate> = candidates
        .par_iter()
        .enumerate()
        .map(|(n, &action)| {
            let mut pinned: Vec<(usize, Action)> = constraints.iter().copied().filter(|&(i, _)| i != index).collect();
            pinned.push((index, action));

            let mut rng = SmallRng::seed_from_u64(config.seed.wrapping_add(n as u64));
            let estimate = monte_carlo(players, &pinned, config, policy, |state| loss(state, index), &mut rng)?;
            Ok(ActionEstimate { action, estimate })
        })
        .collect::<GameResult<_>>()?;

    let best = table
        .iter()
        .fold(None::<&ActionEstimate>, |best, entry| match best {
            Some(b) if b.estimate.mean <= entry.estimate.mean => Some(b),
            _ => Some(entry),
        })
        .map_or(Action::Idle, |entry| entry.action);

    log::debug!("player {index}: best of {} actions is {best}", table.len());

    Ok((best, table))
}
