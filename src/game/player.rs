//! Player state management.

use serde::{Deserialize, Serialize};

/// Walls never exceed this many segments.
pub const MAX_WALLS: i32 = 10;

/// Barracks never exceed this count.
pub const MAX_BARRACKS: i32 = 10;

/// Resources and transient flags of one faction.
///
/// Fields are signed so that a deficit produced mid-turn is representable
/// until [`PlayerState::normalize`] clamps it back to zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerState {
    /// Wall segments, absorbing one attacking soldier each (two while defending).
    pub walls: i32,
    /// Soldiers available for attacks and last stands.
    pub soldiers: i32,
    /// Barracks; training adds this many soldiers.
    pub barracks: i32,
    /// Obelisks, the scored resource.
    pub obelisks: i32,
    /// Turns of wall doubling left.
    #[serde(default)]
    pub defense: i32,
    /// Set when the army left home this turn (training or attacking).
    #[serde(skip)]
    pub busy: bool,
    /// Successful sieges led by this player.
    #[serde(skip)]
    pub sieges_won: u32,
    /// Sieges suffered by this player.
    #[serde(skip)]
    pub sieges_lost: u32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(1, 1, 1, 1)
    }
}

impl PlayerState {
    /// Create a player with the given resources and no active defense.
    #[must_use]
    pub fn new(walls: i32, soldiers: i32, barracks: i32, obelisks: i32) -> Self {
        Self {
            walls,
            soldiers,
            barracks,
            obelisks,
            defense: 0,
            busy: false,
            sieges_won: 0,
            sieges_lost: 0,
        }
    }

    /// Set the remaining defense turns.
    #[must_use]
    pub fn with_defense(mut self, defense: i32) -> Self {
        self.defense = defense;
        self
    }

    /// A player without obelisks has nothing left to defend or attack with.
    #[inline]
    #[must_use]
    pub fn lost(&self) -> bool {
        self.obelisks <= 0
    }

    /// Opposite of [`PlayerState::lost`].
    #[inline]
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.lost()
    }

    /// Divisor applied to walls while the defense is up.
    #[inline]
    #[must_use]
    pub fn defense_multiplier(&self) -> i32 {
        if self.defense > 0 { 2 } else { 1 }
    }

    /// Walls as seen by an attacker.
    #[inline]
    #[must_use]
    pub fn effective_walls(&self) -> i32 {
        self.walls * self.defense_multiplier()
    }

    /// Total force an attacker must beat: effective walls plus soldiers.
    #[inline]
    #[must_use]
    pub fn strength(&self) -> i32 {
        self.effective_walls() + self.soldiers
    }

    /// Clamp every counter to zero from below.
    pub fn normalize(&mut self) {
        self.walls = self.walls.max(0);
        self.soldiers = self.soldiers.max(0);
        self.barracks = self.barracks.max(0);
        self.obelisks = self.obelisks.max(0);
        self.defense = self.defense.max(0);
    }
}

impl PartialEq for PlayerState {
    fn eq(&self, other: &Self) -> bool {
        self.walls == other.walls
            && self.soldiers == other.soldiers
            && self.barracks == other.barracks
            && self.obelisks == other.obelisks
            && self.defense == other.defense
    }
}

impl Eq for PlayerState {}
