//! Combat resolution.
//!
//! Simultaneous attackers on one target first fight each other (the rivalry
//! fight); only the strongest survivor marches on the walls. Soldiers left
//! after the walls meet the defender's army unless it is busy elsewhere, and
//! whatever is still standing loots one obelisk.

use std::cmp::Reverse;

use crate::game::PlayerState;

/// Resolve every attack aimed at `defender` this turn.
///
/// Mutates the defender and the attackers in place. The outcome does not
/// depend on the order of `attackers`.
pub fn attack(defender: &mut PlayerState, attackers: &mut [&mut PlayerState]) {
    let mut attackers: Vec<&mut PlayerState> = attackers
        .iter_mut()
        .map(|p| &mut **p)
        .filter(|p| p.soldiers > 0)
        .collect();

    if attackers.is_empty() {
        return;
    }

    attackers.sort_unstable_by_key(|p| Reverse(p.soldiers));

    if let [leader, runner_up, rest @ ..] = attackers.as_mut_slice() {
        leader.soldiers -= runner_up.soldiers;
        runner_up.soldiers = 0;
        for rival in rest {
            rival.soldiers = 0;
        }
    }

    let attacker = &mut *attackers[0];

    if attacker.soldiers <= 0 {
        return;
    }

    let multiplier = defender.defense_multiplier();
    let walls = defender.walls * multiplier;
    let destroyed = walls.min(attacker.soldiers);
    attacker.soldiers -= destroyed;
    defender.walls = (walls - destroyed) / multiplier;

    if attacker.soldiers <= 0 {
        return;
    }

    if defender.soldiers > 0 && !defender.busy {
        let destroyed = defender.soldiers.min(attacker.soldiers);
        defender.soldiers -= destroyed;
        attacker.soldiers -= destroyed;
    }

    if attacker.soldiers > 0 {
        defender.obelisks -= 1;
        defender.sieges_lost += 1;
        attacker.obelisks += 1;
        attacker.sieges_won += 1;
    }
}
