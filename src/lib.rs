// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Obelisk: a deterministic simultaneous-turn strategy simulator.
//!
//! Factions grow walls, soldiers, barracks and obelisks, and besiege each
//! other for obelisks. The crate provides:
//! - A pure turn engine with a fixed status, combat, production order
//! - An evolutionary trainer for fixed-length scripted agents
//! - An exhaustive depth-limited search over joint actions
//! - A Monte Carlo rollout evaluator for single decisions
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  Trainer  │  Tree Search │ Rollout  │
//! ├─────────────────────────────────────┤
//! │      Policies / Action Space        │
//! ├─────────────────────────────────────┤
//! │   Turn Engine (status, combat,      │
//! │   production) over PlayerState      │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use obelisk::{step, Action, PlayerState, Produce};
//!
//! let mut players = vec![PlayerState::default(); 2];
//! step(&mut players, &[Action::Produce(Produce::Obelisk), Action::Idle])?;
//! assert_eq!(players[0].obelisks, 2);
//! assert_eq!(players[1].soldiers, 2);
//! # Ok::<(), obelisk::GameError>(())
//! ```

pub mod error;
pub mod game;
pub mod gp;
pub mod policy;
pub mod rollout;
pub mod search;

pub use error::{GameError, GameResult};

// Re-export key game types at crate root for convenience
pub use game::{
    clean, combine_actions, possible_actions, step, update, update_clone, Action, PlayerState, Produce,
};
pub use policy::{Policy, RandomPolicy};
pub use search::{search, SearchConfig, SearchResult};
