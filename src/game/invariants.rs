//! Game invariants - sanity checks that detect bugs.
//!
//! After a turn has been cleaned every counter is non-negative, walls and
//! barracks respect their caps and no army is still flagged busy. A roster
//! handed to the optimizers must satisfy the same checks.

use std::fmt;

use crate::game::{PlayerState, MAX_BARRACKS, MAX_WALLS};

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Index of the offending player.
    pub player: usize,
    /// Description of the violated invariant.
    pub message: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}: {}", self.player, self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all invariants of a cleaned state.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(players: &[PlayerState]) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for (index, player) in players.iter().enumerate() {
        let mut violation = |message: String| {
            violations.push(InvariantViolation {
                player: index,
                message,
            });
        };

        for (name, value) in [
            ("walls", player.walls),
            ("soldiers", player.soldiers),
            ("barracks", player.barracks),
            ("obelisks", player.obelisks),
            ("defense", player.defense),
        ] {
            if value < 0 {
                violation(format!("{name} is negative ({value})"));
            }
        }

        if player.walls > MAX_WALLS {
            violation(format!("walls {} > max {MAX_WALLS}", player.walls));
        }

        if player.barracks > MAX_BARRACKS {
            violation(format!("barracks {} > max {MAX_BARRACKS}", player.barracks));
        }

        if player.busy {
            violation("busy flag survived the turn".to_string());
        }
    }

    violations
}
