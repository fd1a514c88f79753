//! Genome representation for the evolutionary trainer.
//!
//! A genome is a fixed-length script with one gene per turn. It does not
//! look at the game state, except for the attack gene which picks a target
//! the agent is sure to outnumber.

use std::fmt;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::game::{Action, PlayerState, Produce};
use crate::policy::Policy;

/// Script length in the reference configuration.
pub const GENOME_LENGTH: usize = 40;

/// One scripted turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gene {
    /// Build a wall.
    W,
    /// Train soldiers.
    S,
    /// Build a barracks.
    B,
    /// Raise an obelisk.
    O,
    /// Attack a player weaker than our army, or idle if there is none.
    A,
    /// Raise the defense.
    D,
    /// Idle.
    N,
}

impl Gene {
    /// The seven genes, in display order.
    pub const ALL: [Gene; 7] = [Gene::W, Gene::S, Gene::B, Gene::O, Gene::A, Gene::D, Gene::N];

    /// Uniformly random gene.
    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Single-letter symbol.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Gene::W => 'W',
            Gene::S => 'S',
            Gene::B => 'B',
            Gene::O => 'O',
            Gene::A => 'A',
            Gene::D => 'D',
            Gene::N => 'N',
        }
    }
}

/// An immutable scripted policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Genome {
    genes: Vec<Gene>,
}

impl Genome {
    /// Wrap an explicit gene sequence.
    #[must_use]
    pub fn new(genes: Vec<Gene>) -> Self {
        Self { genes }
    }

    /// Create a random genome of `length` genes.
    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Self {
        Self {
            genes: (0..length).map(|_| Gene::random(rng)).collect(),
        }
    }

    /// The script.
    #[must_use]
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Number of genes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the script is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// How often `gene` occurs in the script.
    #[must_use]
    pub fn count(&self, gene: Gene) -> usize {
        self.genes.iter().filter(|&&g| g == gene).count()
    }

    /// Occurrences of every gene, in [`Gene::ALL`] order.
    #[must_use]
    pub fn histogram(&self) -> [usize; 7] {
        Gene::ALL.map(|gene| self.count(gene))
    }
}

/// Players weaker than `players[index]`'s army, walls counted double under defense.
#[must_use]
pub fn attack_targets(players: &[PlayerState], index: usize) -> Vec<usize> {
    let army = players[index].soldiers;
    players
        .iter()
        .enumerate()
        .filter(|&(other, p)| other != index && p.is_live() && p.strength() < army)
        .map(|(other, _)| other)
        .collect()
}

impl Policy for Genome {
    fn decide(&self, players: &[PlayerState], index: usize, step: usize, rng: &mut dyn RngCore) -> Action {
        if players[index].lost() {
            return Action::None;
        }

        let Some(&gene) = self.genes.get(step) else {
            return Action::Idle;
        };

        match gene {
            Gene::W => Action::Produce(Produce::Walls),
            Gene::S => Action::Produce(Produce::Soldiers),
            Gene::B => Action::Produce(Produce::Barracks),
            Gene::O => Action::Produce(Produce::Obelisk),
            Gene::D => Action::Defend,
            Gene::N => Action::Idle,
            Gene::A => attack_targets(players, index)
                .choose(rng)
                .map_or(Action::Idle, |&target| Action::Attack(target)),
        }
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, gene) in self.genes.iter().enumerate() {
            if i > 0 {
                write!(f, "->")?;
            }
            write!(f, "{}", gene.symbol())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_genome_length() {
        let mut rng = SmallRng::seed_from_u64(42);
        let genome = Genome::random(&mut rng, GENOME_LENGTH);
        assert_eq!(genome.len(), GENOME_LENGTH);
        assert_eq!(genome.histogram().iter().sum::<usize>(), GENOME_LENGTH);
    }

    #[test]
    fn test_display_joins_with_arrows() {
        let genome = Genome::new(vec![Gene::W, Gene::A, Gene::N]);
        assert_eq!(genome.to_string(), "W->A->N");
        assert_eq!(genome.count(Gene::A), 1);
    }

    #[test]
    fn test_scripted_actions() {
        let mut rng = SmallRng::seed_from_u64(0);
        let genome = Genome::new(vec![Gene::O, Gene::D, Gene::N]);
        let players = vec![PlayerState::default(); 2];

        assert_eq!(genome.decide(&players, 0, 0, &mut rng), Action::Produce(Produce::Obelisk));
        assert_eq!(genome.decide(&players, 0, 1, &mut rng), Action::Defend);
        assert_eq!(genome.decide(&players, 0, 2, &mut rng), Action::Idle);
        assert_eq!(genome.decide(&players, 0, 3, &mut rng), Action::Idle);
    }

    #[test]
    fn test_attack_picks_only_weaker_targets() {
        let mut rng = SmallRng::seed_from_u64(3);
        let genome = Genome::new(vec![Gene::A]);
        let players = vec![
            PlayerState::new(0, 5, 1, 1),
            // strength 4
            PlayerState::new(2, 2, 1, 1),
            // strength 2 * 2 + 1 = 5, not strictly weaker
            PlayerState::new(2, 1, 1, 1).with_defense(1),
            // weaker but already out
            PlayerState::new(0, 0, 1, 0),
        ];

        assert_eq!(attack_targets(&players, 0), vec![1]);
        for _ in 0..20 {
            assert_eq!(genome.decide(&players, 0, 0, &mut rng), Action::Attack(1));
        }
    }

    #[test]
    fn test_attack_without_target_idles() {
        let mut rng = SmallRng::seed_from_u64(3);
        let genome = Genome::new(vec![Gene::A]);
        let players = vec![PlayerState::default(); 3];
        assert_eq!(genome.decide(&players, 1, 0, &mut rng), Action::Idle);
    }

    #[test]
    fn test_lost_player_sits_out() {
        let mut rng = SmallRng::seed_from_u64(3);
        let genome = Genome::new(vec![Gene::O]);
        let players = vec![PlayerState::new(1, 1, 1, 0), PlayerState::default()];
        assert_eq!(genome.decide(&players, 0, 0, &mut rng), Action::None);
    }
}
