#![no_main]

//! Combat fuzzer.
//!
//! Throws arbitrary defenders and up to six attackers at the combat
//! resolver and checks that walls only fall, soldiers are never created and
//! at most one obelisk changes hands.

use arbitrary::Arbitrary;
use obelisk::game::{attack, PlayerState};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated player.
#[derive(Arbitrary, Debug, Clone, Copy)]
struct FuzzPlayer {
    walls: u8,
    soldiers: u16,
    obelisks: u8,
    defense: u8,
    busy: bool,
}

impl FuzzPlayer {
    fn state(self) -> PlayerState {
        let mut player = PlayerState::new(
            i32::from(self.walls % 11),
            i32::from(self.soldiers),
            1,
            i32::from(self.obelisks),
        )
        .with_defense(i32::from(self.defense % 3));
        player.busy = self.busy;
        player
    }
}

/// Structured input for combat fuzzing.
#[derive(Arbitrary, Debug)]
struct CombatInput {
    /// The besieged player.
    defender: FuzzPlayer,
    /// Everyone marching on it.
    attackers: Vec<FuzzPlayer>,
}

fuzz_target!(|input: CombatInput| {
    let before = input.defender.state();
    let mut defender = before;
    let initial: Vec<PlayerState> = input.attackers.iter().take(6).map(|p| p.state()).collect();
    let mut attackers = initial.clone();

    {
        let mut refs: Vec<&mut PlayerState> = attackers.iter_mut().collect();
        attack(&mut defender, &mut refs);
    }

    // Walls only fall and never go negative
    assert!(defender.walls <= before.walls && defender.walls >= 0);
    assert!(defender.soldiers <= before.soldiers && defender.soldiers >= 0);

    // No soldiers are created
    for (after, start) in attackers.iter().zip(&initial) {
        assert!(after.soldiers >= 0 && after.soldiers <= start.soldiers);
    }

    // At most one obelisk moves, and only from the defender
    let gained: i32 = attackers.iter().zip(&initial).map(|(a, s)| a.obelisks - s.obelisks).sum();
    assert!(gained == 0 || gained == 1);
    assert_eq!(before.obelisks - defender.obelisks, gained);
});
