//! Decision policies.
//!
//! A policy picks one player's action for the coming turn from the full
//! state. Scripted genomes, uniformly random play and rollout continuations
//! all sit behind this trait.

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::game::{possible_actions, Action, PlayerState};

/// Chooses actions for a player.
pub trait Policy: Sync {
    /// Action for `players[index]` on turn `step` (zero-based).
    fn decide(&self, players: &[PlayerState], index: usize, step: usize, rng: &mut dyn RngCore) -> Action;
}

/// Uniformly random legal play.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl Policy for RandomPolicy {
    fn decide(&self, players: &[PlayerState], index: usize, _step: usize, rng: &mut dyn RngCore) -> Action {
        if players[index].lost() {
            return Action::None;
        }

        possible_actions(players, index)
            .choose(rng)
            .copied()
            .unwrap_or(Action::Idle)
    }
}

/// Collect one action per player.
pub fn decide_all<P: Policy + ?Sized>(
    policies: &[&P],
    players: &[PlayerState],
    step: usize,
    rng: &mut dyn RngCore,
) -> Vec<Action> {
    policies
        .iter()
        .enumerate()
        .map(|(index, policy)| policy.decide(players, index, step, rng))
        .collect()
}
