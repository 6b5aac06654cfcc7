//! Error types for the game engines
//!
//! Everything here is a recoverable, reported outcome: illegal input is
//! rejected without touching the board, and snapshot problems are caught
//! before any live state changes.

use crate::board::{Pos, Side};
use thiserror::Error;

/// Errors that can occur while driving a game session
#[derive(Error, Debug)]
pub enum GameError {
    /// Move rejected by the rule engine
    #[error("Invalid move: {from} -> {to}")]
    InvalidMove { from: Pos, to: Pos },

    /// Position outside the board
    #[error("Position {pos} is off the board")]
    OutOfBounds { pos: Pos },

    /// Input from a side that is not to move
    #[error("Not your turn: {side:?} is to move")]
    NotYourTurn { side: Side },

    /// Board interaction while the engine reply is scheduled
    #[error("Engine reply pending")]
    EnginePending,

    /// The game has ended
    #[error("Game is over")]
    GameOver,

    /// Undo with no removable history
    #[error("Nothing to undo")]
    NothingToUndo,

    /// A side has no legal reply
    #[error("No legal moves for {side:?}")]
    NoLegalMoves { side: Side },

    /// Persistence payload with the wrong shape or values
    #[error("Malformed snapshot: {reason}")]
    MalformedSnapshot { reason: String },

    /// JSON encoding/decoding failure
    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;

impl GameError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        GameError::MalformedSnapshot {
            reason: reason.into(),
        }
    }
}
