//! Engine opponent built on the generic search
//!
//! The engine answers "what should `side` play here?" for any game. It
//! works on a private copy of the board, so callers never see the search's
//! in-place mutation. The search follows a priority system:
//!
//! 1. **Immediate win**: any candidate that ends the game in the mover's favour
//! 2. **Alpha-Beta**: depth-limited minimax at the configured depth
//!
//! # Example
//!
//! ```
//! use boardgames::board::Side;
//! use boardgames::engine::{AIEngine, EngineConfig};
//! use boardgames::rules::{Chess, Rules};
//!
//! let rules = Chess::new();
//! let board = rules.setup();
//!
//! let engine = AIEngine::with_config(EngineConfig { depth: Some(2), ..Default::default() });
//! let result = engine.get_move_with_stats(&rules, &board, Side::Second);
//! println!("Best move: {:?}", result.best_move);
//! println!("Search type: {:?}", result.search_type);
//! println!("Time: {}ms", result.time_ms);
//! ```

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::board::{Board, Move, Side};
use crate::rules::Rules;
use crate::search::{SearchResult, Searcher, WIN_SCORE};

/// Type of search that produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Found a move that wins on the spot
    ImmediateWin,
    /// Regular alpha-beta search result
    AlphaBeta,
}

/// Result of a move search with detailed statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// Best move found, if any
    pub best_move: Option<Move>,
    /// Evaluation score, positive favours `Side::First`
    pub score: i32,
    /// Type of search that found this move
    pub search_type: SearchType,
    /// Time taken in milliseconds
    pub time_ms: u64,
    /// Number of nodes searched
    pub nodes: u64,
}

impl MoveResult {
    #[inline]
    fn immediate_win(mv: Move, side: Side, time_ms: u64, nodes: u64) -> Self {
        Self {
            best_move: Some(mv),
            score: side.sign() * WIN_SCORE,
            search_type: SearchType::ImmediateWin,
            time_ms,
            nodes,
        }
    }

    #[inline]
    fn from_alphabeta(result: SearchResult, time_ms: u64) -> Self {
        Self {
            best_move: result.best_move,
            score: result.score,
            search_type: SearchType::AlphaBeta,
            time_ms,
            nodes: result.nodes,
        }
    }
}

/// Engine settings. Every field has a default, so a partial JSON object
/// such as `{"depth": 4}` is a valid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Search depth in plies; `None` uses the game's default
    pub depth: Option<u8>,
    /// Pause before the engine reply is played, for the renderer's benefit
    pub reply_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: None,
            reply_delay_ms: 500,
        }
    }
}

/// Engine opponent.
///
/// Stateless between calls: every search starts from scratch, so the same
/// position always yields the same move.
#[derive(Debug, Clone, Default)]
pub struct AIEngine {
    config: EngineConfig,
}

impl AIEngine {
    /// Create an engine with default settings (game default depth, 500ms reply delay).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Override the search depth (`None` restores the game default)
    pub fn set_depth(&mut self, depth: Option<u8>) {
        self.config.depth = depth;
    }

    /// Depth used for rule set `R`
    pub fn depth_for<R: Rules>(&self) -> u8 {
        self.config.depth.unwrap_or(R::DEFAULT_DEPTH)
    }

    /// Get the best move for `side`, or `None` if it has no moves.
    #[must_use]
    pub fn get_move<R: Rules>(&self, rules: &R, board: &Board<R::Kind>, side: Side) -> Option<Move> {
        self.get_move_with_stats(rules, board, side).best_move
    }

    /// Get the best move with detailed search statistics.
    #[must_use]
    pub fn get_move_with_stats<R: Rules>(
        &self,
        rules: &R,
        board: &Board<R::Kind>,
        side: Side,
    ) -> MoveResult {
        let start = Instant::now();
        let mut work = board.clone();

        // 1. Immediate win
        if let Some((mv, tried)) = Self::find_immediate_win(rules, &mut work, side) {
            let result = MoveResult::immediate_win(mv, side, elapsed_ms(start), tried);
            debug!(game = R::NAME, ?side, ?mv, "immediate win");
            return result;
        }

        // 2. Alpha-beta
        let depth = self.depth_for::<R>();
        let search = Searcher::new(rules).search(&mut work, side, depth);
        let cutoffs = search.stats.cutoffs;
        let first_move_rate = search.stats.first_move_rate();
        let result = MoveResult::from_alphabeta(search, elapsed_ms(start));
        debug!(
            game = R::NAME,
            ?side,
            depth,
            score = result.score,
            nodes = result.nodes,
            cutoffs,
            first_move_rate,
            time_ms = result.time_ms,
            best_move = ?result.best_move,
            "search finished"
        );
        result
    }

    /// First candidate that wins on the spot, with the number of moves tried
    fn find_immediate_win<R: Rules>(
        rules: &R,
        board: &mut Board<R::Kind>,
        side: Side,
    ) -> Option<(Move, u64)> {
        let mut tried = 0;
        for mv in rules.search_moves(board, side) {
            let Some(undo) = rules.apply(board, side, mv) else {
                continue;
            };
            tried += 1;
            let wins = rules
                .outcome(board)
                .is_some_and(|outcome| outcome.winner == Some(side));
            rules.undo(board, mv, &undo);
            if wins {
                return Some((mv, tried));
            }
        }
        None
    }
}

#[inline]
fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
