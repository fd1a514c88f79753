//! Per-player actions for a single turn.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Resource a production action builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Produce {
    /// Add a wall segment (`W`).
    Walls,
    /// Train one soldier per barracks (`S`).
    Soldiers,
    /// Build a barracks (`B`).
    Barracks,
    /// Raise an obelisk (`O`).
    Obelisk,
}

impl Produce {
    /// All production actions, in symbol order.
    pub const ALL: [Produce; 4] = [
        Produce::Walls,
        Produce::Soldiers,
        Produce::Barracks,
        Produce::Obelisk,
    ];

    /// Single-letter symbol.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Produce::Walls => 'W',
            Produce::Soldiers => 'S',
            Produce::Barracks => 'B',
            Produce::Obelisk => 'O',
        }
    }
}

/// What one player does during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Build a resource.
    Produce(Produce),
    /// Double walls for this turn and the next (`D`).
    Defend,
    /// Nothing to do; the faction gains one soldier.
    Idle,
    /// Send the army against the player at this index.
    Attack(usize),
    /// The player is out of the game and takes no part in the turn.
    None,
}

impl Action {
    /// Whether the army is away from home (training or attacking).
    ///
    /// Busy defenders do not get a last stand.
    #[inline]
    #[must_use]
    pub fn busies(self) -> bool {
        matches!(self, Action::Produce(Produce::Soldiers) | Action::Attack(_))
    }

    /// Target index for attacks.
    #[inline]
    #[must_use]
    pub fn target(self) -> Option<usize> {
        match self {
            Action::Attack(target) => Some(target),
            _ => None,
        }
    }
}

impl From<Produce> for Action {
    fn from(produce: Produce) -> Self {
        Action::Produce(produce)
    }
}

impl From<Option<Action>> for Action {
    fn from(action: Option<Action>) -> Self {
        action.unwrap_or(Action::None)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Produce(produce) => write!(f, "{}", produce.symbol()),
            Action::Defend => write!(f, "D"),
            Action::Idle => write!(f, "N"),
            Action::Attack(target) => write!(f, "{target}"),
            Action::None => write!(f, "-"),
        }
    }
}
