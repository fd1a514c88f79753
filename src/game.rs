//! Game layer for Obelisk.
//!
//! Implements the simultaneous-turn rules every optimizer replays:
//! - Player state (walls, soldiers, barracks, obelisks, defense)
//! - Combat resolution (rivalry fights, walls, last stands, sieges)
//! - Turn engine (status, combat and production phases)
//! - Action space enumeration for single players and joint actions

mod action;
mod combat;
mod invariants;
mod player;
mod space;
mod turn;

pub use action::{Action, Produce};
pub use combat::attack;
pub use invariants::{check_invariants, InvariantViolation};
pub use player::{PlayerState, MAX_BARRACKS, MAX_WALLS};
pub use space::{combine_actions, joint_action_count, possible_actions, JointActions};
pub use turn::{clean, clone_state, step, update, update_clone, DEFENSE_TURNS};
