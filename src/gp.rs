//! Evolutionary trainer for scripted agents.
//!
//! Agents are fixed-length scripts (one gene per turn). Fitness is a
//! relative-standing loss averaged over many randomly regrouped games;
//! the best-ranked slice survives and breeds the rest of the next generation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │         Evolution Loop              │
//! ├─────────────────────────────────────┤
//! │  Selection │ Crossover │ Mutation   │
//! ├─────────────────────────────────────┤
//! │   Fitness (parallel group games)    │
//! ├─────────────────────────────────────┤
//! │         Turn Engine                 │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use obelisk::gp::{evolve, EvolutionConfig};
//!
//! let (population, stats) = evolve(EvolutionConfig::default(), |report| {
//!     println!("generation {}: mean loss {:.2}", report.generation, report.stats.mean);
//! })?;
//! # Ok::<(), obelisk::gp::EvolutionError>(())
//! ```

mod crossover;
mod evolution;
mod fitness;
mod genome;
mod mutation;
mod selection;

pub use crossover::crossover;
pub use evolution::{
    evolve, EvolutionConfig, EvolutionError, EvolutionStats, GenerationReport, GenerationStats, Trainer,
};
pub use fitness::{compute_loss, evaluate_population, partition_groups, simulate_group, FitnessConfig};
pub use genome::{attack_targets, Gene, Genome, GENOME_LENGTH};
pub use mutation::mutate;
pub use selection::{rank, select_next_generation, LossStats, Population, SelectionConfig};
