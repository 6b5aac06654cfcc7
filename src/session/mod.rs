//! Game sessions: one explicit object per game in progress
//!
//! - [`game_state`]: selection state machine, history, undo, surrender and
//!   engine scheduling
//! - [`snapshot`]: JSON persistence with validation before restore

pub mod game_state;
pub mod snapshot;

// Re-exports
pub use game_state::{
    GameMode, GameState, HistoryEntry, MoveReport, Phase, SelectionEvent, SessionView,
};
pub use snapshot::{HistoryRecord, Snapshot};
