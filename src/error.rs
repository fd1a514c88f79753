//! Error types for the game layer.

use thiserror::Error;

/// Errors raised by the turn engine.
///
/// The transition rules themselves are total over integers; the only way to
/// misuse them is to hand over inputs that do not match the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    /// The action list does not have one entry per player.
    #[error("expected {players} actions (one per player), got {actions}")]
    ActionCountMismatch {
        /// Number of players in the state.
        players: usize,
        /// Number of actions supplied.
        actions: usize,
    },
    /// An action was pinned on a player the state does not have.
    #[error("player {index} is out of range for {players} players")]
    UnknownPlayer {
        /// Offending player index.
        index: usize,
        /// Number of players in the state.
        players: usize,
    },
}

/// Result type for game transitions.
pub type GameResult<T> = Result<T, GameError>;
