//! Point mutation for scripted genomes.

use rand::Rng;

use crate::gp::genome::{Gene, Genome};

/// Copy of `genome` where each gene is redrawn with probability `rate`.
///
/// A redrawn gene may come out unchanged. `rate` must lie in `[0, 1]`.
#[must_use]
pub fn mutate<R: Rng + ?Sized>(genome: &Genome, rate: f64, rng: &mut R) -> Genome {
    let genes = genome
        .genes()
        .iter()
        .map(|&gene| if rng.gen_bool(rate) { Gene::random(rng) } else { gene })
        .collect();

    Genome::new(genes)
}
