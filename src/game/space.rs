//! Action space enumeration.
//!
//! The legal actions of one player depend on the whole state: attacks need
//! soldiers and a live target, defense needs walls. The joint action space is
//! the Cartesian product of every player's legal set, walked as a
//! mixed-radix counter with player 0 as the fastest digit.

use crate::game::{Action, PlayerState, Produce};

/// Legal actions for player `index`.
///
/// A player without obelisks can only idle; the result is never empty.
#[must_use]
pub fn possible_actions(players: &[PlayerState], index: usize) -> Vec<Action> {
    let player = &players[index];
    if player.lost() {
        return vec![Action::Idle];
    }

    let mut actions = Vec::with_capacity(5 + players.len());
    actions.extend(Produce::ALL.map(Action::Produce));

    if player.walls > 0 {
        actions.push(Action::Defend);
    }

    if player.soldiers > 0 {
        actions.extend(
            players
                .iter()
                .enumerate()
                .filter(|&(other, p)| other != index && p.is_live())
                .map(|(other, _)| Action::Attack(other)),
        );
    }

    actions
}

/// Number of joint actions [`combine_actions`] yields, saturating at `usize::MAX`.
#[must_use]
pub fn joint_action_count(players: &[PlayerState]) -> usize {
    (0..players.len())
        .map(|index| possible_actions(players, index).len())
        .fold(1usize, usize::saturating_mul)
}

/// Every joint action for the current state.
#[must_use]
pub fn combine_actions(players: &[PlayerState]) -> JointActions {
    JointActions::new(
        (0..players.len())
            .map(|index| possible_actions(players, index))
            .collect(),
    )
}

/// Lazy iterator over the Cartesian product of per-player action sets.
#[derive(Debug, Clone)]
pub struct JointActions {
    choices: Vec<Vec<Action>>,
    digits: Vec<usize>,
    remaining: usize,
}

impl JointActions {
    /// Enumerate the product of the given per-player choice sets.
    ///
    /// An empty choice set makes the whole product empty.
    #[must_use]
    pub fn new(choices: Vec<Vec<Action>>) -> Self {
        let remaining = choices
            .iter()
            .map(Vec::len)
            .fold(1usize, usize::saturating_mul);
        let digits = vec![0; choices.len()];

        Self {
            choices,
            digits,
            remaining,
        }
    }

    fn advance(&mut self) {
        for (digit, choices) in self.digits.iter_mut().zip(&self.choices) {
            *digit += 1;
            if *digit < choices.len() {
                return;
            }
            *digit = 0;
        }
    }
}

impl Iterator for JointActions {
    type Item = Vec<Action>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let joint = self
            .digits
            .iter()
            .zip(&self.choices)
            .map(|(&digit, choices)| choices[digit])
            .collect();

        self.remaining -= 1;
        self.advance();

        Some(joint)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for JointActions {}
