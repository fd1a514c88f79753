#![no_main]

//! Full game turn fuzzer.
//!
//! This fuzz target runs arbitrary rosters through several complete turns
//! (status, combat, production, cleanup) and checks the game invariants
//! after every one.

use arbitrary::Arbitrary;
use obelisk::game::{check_invariants, step, Action, PlayerState, Produce};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated action.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzAction {
    Walls,
    Soldiers,
    Barracks,
    Obelisk,
    Defend,
    Idle,
    Sit,
    Attack(u8),
}

impl FuzzAction {
    fn action(self, players: usize) -> Action {
        match self {
            FuzzAction::Walls => Action::Produce(Produce::Walls),
            FuzzAction::Soldiers => Action::Produce(Produce::Soldiers),
            FuzzAction::Barracks => Action::Produce(Produce::Barracks),
            FuzzAction::Obelisk => Action::Produce(Produce::Obelisk),
            FuzzAction::Defend => Action::Defend,
            FuzzAction::Idle => Action::Idle,
            FuzzAction::Sit => Action::None,
            FuzzAction::Attack(target) => Action::Attack(usize::from(target) % players),
        }
    }
}

/// Structured input for full game turn fuzzing.
#[derive(Arbitrary, Debug)]
struct GameTurnInput {
    /// Starting (walls, soldiers, barracks, obelisks) per player.
    players: Vec<(u8, u8, u8, u8)>,
    /// One action list per turn; short lists are padded with idles.
    turns: Vec<Vec<FuzzAction>>,
}

fuzz_target!(|input: GameTurnInput| {
    // Cap values to avoid excessive runtime
    let mut players: Vec<PlayerState> = input
        .players
        .iter()
        .take(12)
        .map(|&(w, s, b, o)| {
            PlayerState::new(
                i32::from(w % 11),
                i32::from(s),
                i32::from(b % 11),
                i32::from(o % 8),
            )
        })
        .collect();

    if players.is_empty() {
        return;
    }

    let n = players.len();
    for turn in input.turns.iter().take(20) {
        let mut actions: Vec<Action> = turn.iter().take(n).map(|a| a.action(n)).collect();
        actions.resize(n, Action::Idle);

        assert!(step(&mut players, &actions).is_ok());

        let violations = check_invariants(&players);
        assert!(violations.is_empty(), "Invariants violated: {violations:?}");
    }
});
