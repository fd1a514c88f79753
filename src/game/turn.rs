//! Turn engine.
//!
//! A turn runs three phases in a fixed order: statuses (defense and busy
//! flags), combat, then production. Combat therefore sees this turn's
//! defense and busy flags but last turn's resources.

use crate::error::{GameError, GameResult};
use crate::game::{attack, Action, PlayerState, Produce, MAX_BARRACKS, MAX_WALLS};

/// Defense lasts for the turn it is raised and the following one.
pub const DEFENSE_TURNS: i32 = 2;

/// Advance `players` by one simultaneous turn.
///
/// `actions[i]` is the action of `players[i]`; [`Action::None`] marks a
/// player that sits the turn out. Attacks on a player that has already lost
/// only busy the attacker. Call [`clean`] before deciding the next
/// turn's actions.
///
/// # Errors
///
/// Returns [`GameError::ActionCountMismatch`] if the slices differ in length.
pub fn update(players: &mut [PlayerState], actions: &[Action]) -> GameResult<()> {
    if players.len() != actions.len() {
        return Err(GameError::ActionCountMismatch {
            players: players.len(),
            actions: actions.len(),
        });
    }

    // Statuses
    for (player, &action) in players.iter_mut().zip(actions) {
        if action == Action::Defend {
            player.defense = DEFENSE_TURNS;
        } else if player.defense > 0 {
            player.defense -= 1;
        }

        player.busy = action.busies();
    }

    // Combat
    for target in 0..players.len() {
        let besieged = actions
            .iter()
            .enumerate()
            .any(|(i, action)| i != target && action.target() == Some(target));
        if !besieged || players[target].lost() {
            continue;
        }

        let mut defender = None;
        let mut attackers = Vec::new();
        for (i, player) in players.iter_mut().enumerate() {
            if i == target {
                defender = Some(player);
            } else if actions[i].target() == Some(target) {
                attackers.push(player);
            }
        }

        if let Some(defender) = defender {
            attack(defender, &mut attackers);
        }
    }

    // Production
    for (player, &action) in players.iter_mut().zip(actions) {
        match action {
            Action::Produce(Produce::Walls) => player.walls = (player.walls + 1).min(MAX_WALLS),
            Action::Produce(Produce::Soldiers) => player.soldiers += player.barracks,
            Action::Produce(Produce::Barracks) => {
                player.barracks = (player.barracks + 1).min(MAX_BARRACKS);
            }
            Action::Produce(Produce::Obelisk) => player.obelisks += 1,
            Action::Idle => player.soldiers += 1,
            Action::Defend | Action::Attack(_) | Action::None => {}
        }
    }

    Ok(())
}

/// Post-turn housekeeping: clamp counters at zero and clear busy flags.
pub fn clean(players: &mut [PlayerState]) {
    for player in players.iter_mut() {
        player.normalize();
        player.busy = false;
    }
}

/// [`update`] followed by [`clean`].
///
/// # Errors
///
/// Returns [`GameError::ActionCountMismatch`] if the slices differ in length.
pub fn step(players: &mut [PlayerState], actions: &[Action]) -> GameResult<()> {
    update(players, actions)?;
    clean(players);
    Ok(())
}

/// Independent copy of a state, safe to advance speculatively.
#[must_use]
pub fn clone_state(players: &[PlayerState]) -> Vec<PlayerState> {
    players.to_vec()
}

/// Advance a copy of `players` by one turn, leaving the original untouched.
///
/// # Errors
///
/// Returns [`GameError::ActionCountMismatch`] if the slices differ in length.
pub fn update_clone(players: &[PlayerState], actions: &[Action]) -> GameResult<Vec<PlayerState>> {
    let mut next = clone_state(players);
    step(&mut next, actions)?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: Action = Action::Produce(Produce::Walls);
    const S: Action = Action::Produce(Produce::Soldiers);
    const B: Action = Action::Produce(Produce::Barracks);
    const O: Action = Action::Produce(Produce::Obelisk);
    const N: Action = Action::Idle;

    fn p(walls: i32, soldiers: i32, barracks: i32, obelisks: i32) -> PlayerState {
        PlayerState::new(walls, soldiers, barracks, obelisks)
    }

    #[test]
    fn test_first_turns_of_twelve_players() {
        let mut state = vec![PlayerState::default(); 12];

        step(&mut state, &[W, B, B, O, B, N, B, W, W, B, N, N]).unwrap();
        assert_eq!(
            state,
            vec![
                p(2, 1, 1, 1),
                p(1, 1, 2, 1),
                p(1, 1, 2, 1),
                p(1, 1, 1, 2),
                p(1, 1, 2, 1),
                p(1, 2, 1, 1),
                p(1, 1, 2, 1),
                p(2, 1, 1, 1),
                p(2, 1, 1, 1),
                p(1, 1, 2, 1),
                p(1, 2, 1, 1),
                p(1, 2, 1, 1),
            ]
        );

        step(&mut state, &[B, W, W, W, W, N, W, B, B, W, B, B]).unwrap();
        assert_eq!(
            state,
            vec![
                p(2, 1, 2, 1),
                p(2, 1, 2, 1),
                p(2, 1, 2, 1),
                p(2, 1, 1, 2),
                p(2, 1, 2, 1),
                p(1, 3, 1, 1),
                p(2, 1, 2, 1),
                p(2, 1, 2, 1),
                p(2, 1, 2, 1),
                p(2, 1, 2, 1),
                p(1, 2, 2, 1),
                p(1, 2, 2, 1),
            ]
        );
    }

    #[test]
    fn test_mismatched_actions_rejected() {
        let mut state = vec![PlayerState::default(); 3];
        let err = update(&mut state, &[W, W]).unwrap_err();
        assert_eq!(err, GameError::ActionCountMismatch { players: 3, actions: 2 });
        assert_eq!(state, vec![PlayerState::default(); 3]);
    }

    #[test]
    fn test_defense_lasts_two_turns() {
        let mut state = vec![p(2, 0, 1, 1)];
        step(&mut state, &[Action::Defend]).unwrap();
        assert_eq!(state[0].defense, 2);
        step(&mut state, &[N]).unwrap();
        assert_eq!(state[0].defense, 1);
        step(&mut state, &[N]).unwrap();
        assert_eq!(state[0].defense, 0);
        step(&mut state, &[N]).unwrap();
        assert_eq!(state[0].defense, 0);
    }

    #[test]
    fn test_caps_on_walls_and_barracks() {
        let mut state = vec![p(10, 0, 10, 1)];
        step(&mut state, &[W]).unwrap();
        step(&mut state, &[B]).unwrap();
        assert_eq!(state[0], p(10, 0, 10, 1));
    }

    #[test]
    fn test_training_uses_barracks() {
        let mut state = vec![p(0, 2, 4, 1)];
        step(&mut state, &[S]).unwrap();
        assert_eq!(state[0].soldiers, 6);
    }

    #[test]
    fn test_combat_resolves_before_production() {
        // The defender trains this turn: its army is busy and the new
        // soldiers only arrive after the siege.
        let mut state = vec![p(1, 2, 5, 1), p(0, 3, 1, 1)];
        step(&mut state, &[S, Action::Attack(0)]).unwrap();
        assert_eq!(state[0], p(0, 7, 5, 0));
        assert_eq!(state[1], p(0, 2, 1, 2));
    }

    #[test]
    fn test_fresh_defense_applies_to_same_turn_attack() {
        let mut state = vec![p(2, 0, 1, 1), p(0, 4, 1, 1)];
        step(&mut state, &[Action::Defend, Action::Attack(0)]).unwrap();
        assert_eq!(state[0], p(0, 0, 1, 1).with_defense(2));
        assert_eq!(state[1], p(0, 0, 1, 1));
    }

    #[test]
    fn test_mutual_attacks() {
        // Both armies are busy, so neither gets a last stand.
        let mut state = vec![p(0, 3, 1, 1), p(1, 2, 1, 1)];
        step(&mut state, &[Action::Attack(1), Action::Attack(0)]).unwrap();
        assert_eq!(state[0], p(0, 2, 1, 1));
        assert_eq!(state[1], p(0, 2, 1, 1));
    }

    #[test]
    fn test_self_attack_only_busies() {
        let mut state = vec![p(1, 3, 1, 1), p(1, 1, 1, 1)];
        update(&mut state, &[Action::Attack(0), N]).unwrap();
        assert!(state[0].busy);
        assert_eq!(state[0], p(1, 3, 1, 1));
        clean(&mut state);
        assert!(!state[0].busy);
    }

    #[test]
    fn test_lost_player_cannot_be_looted() {
        let mut state = vec![p(0, 0, 1, 0), p(0, 5, 1, 1)];
        step(&mut state, &[Action::None, Action::Attack(0)]).unwrap();
        assert_eq!(state[0], p(0, 0, 1, 0));
        assert_eq!(state[1], p(0, 5, 1, 1));
        assert_eq!(state[1].sieges_won, 0);
        assert_eq!(state.iter().map(|p| p.obelisks).sum::<i32>(), 1);
    }

    #[test]
    fn test_update_clone_leaves_original() {
        let state = vec![PlayerState::default(); 2];
        let next = update_clone(&state, &[O, W]).unwrap();
        assert_eq!(state, vec![PlayerState::default(); 2]);
        assert_eq!(next, vec![p(1, 1, 1, 2), p(2, 1, 1, 1)]);
    }
}
