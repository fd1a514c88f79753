//! Crossover for scripted genomes.
//!
//! Uniform crossover: every position independently inherits from either
//! parent with equal probability.

use rand::Rng;

use crate::gp::genome::Genome;

/// Breed a child from two parents of equal length.
///
/// Positions past the shorter parent come from `female`.
#[must_use]
pub fn crossover<R: Rng + ?Sized>(female: &Genome, male: &Genome, rng: &mut R) -> Genome {
    let genes = female
        .genes()
        .iter()
        .enumerate()
        .map(|(i, &gene)| match male.genes().get(i) {
            Some(&other) if !rng.gen_bool(0.5) => other,
            _ => gene,
        })
        .collect();

    Genome::new(genes)
}
