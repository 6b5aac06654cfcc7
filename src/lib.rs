//! Rule engines and an engine opponent for five two-player board games
//!
//! Supported games:
//! - Jungle (animal chess) on a 9x7 board
//! - Chess on an 8x8 board, won by capturing the king
//! - Xiangqi on a 10x9 board, won by capturing the general
//! - Gomoku on a 15x15 board, five in a row
//! - Military chess (Luzhanqi) on a 12x5 board, won by capturing the flag
//!
//! # Architecture
//!
//! - [`board`]: generic grid, sides, moves and tagged pieces
//! - [`rules`]: the [`Rules`] trait and one implementation per game
//! - [`eval`]: static evaluation and Gomoku line patterns
//! - [`search`]: generic alpha-beta with capture ordering
//! - [`engine`]: engine opponent with immediate-win shortcut and statistics
//! - [`session`]: game sessions with undo, surrender and persistence
//! - [`error`]: error type shared by the session layer
//!
//! # Quick Start
//!
//! ```
//! use boardgames::board::{Move, Pos};
//! use boardgames::engine::EngineConfig;
//! use boardgames::rules::Chess;
//! use boardgames::session::{GameMode, GameState};
//!
//! let config = EngineConfig { depth: Some(2), reply_delay_ms: 0 };
//! let mut game = GameState::with_engine(Chess::new(), GameMode::default(), config);
//!
//! // Human plays e2-e4, the engine answers
//! game.try_move(Move::new(Pos::new(6, 4), Pos::new(4, 4))).unwrap();
//! let reply = game.engine_reply().unwrap();
//! println!("Engine plays {} -> {}", reply.mv.from, reply.mv.to);
//!
//! let view = game.view();
//! assert_eq!(view.board.len(), 8);
//! assert!(!view.game_over);
//! ```
//!
//! # Logging
//!
//! The crate logs through `tracing` and never installs a subscriber; the
//! embedding application chooses one.

pub mod board;
pub mod engine;
pub mod error;
pub mod eval;
pub mod rules;
pub mod search;
pub mod session;

// Re-export commonly used types for convenience
pub use board::{Board, Move, Piece, PieceKind, Pos, Side};
pub use engine::{AIEngine, EngineConfig, MoveResult, SearchType};
pub use error::{GameError, GameResult};
pub use rules::{Outcome, Rules, WinType};
pub use session::{GameMode, GameState, SessionView, Snapshot};
