//! Depth-limited minimax with alpha-beta pruning
//!
//! One searcher serves every game through the [`Rules`] trait. The board is
//! mutated in place: each candidate is applied, searched with the roles
//! swapped and undone before the next one, so the caller's board is
//! unchanged when `search` returns.
//!
//! `Side::First` maximizes and `Side::Second` minimizes. Only strictly
//! better scores replace the current best, so among equal scores the first
//! candidate in `search_moves` order wins and results are deterministic.
//!
//! # Example
//!
//! ```
//! use boardgames::board::Side;
//! use boardgames::rules::{Jungle, Rules};
//! use boardgames::search::Searcher;
//!
//! let rules = Jungle::new();
//! let mut board = rules.setup();
//!
//! let mut searcher = Searcher::new(&rules);
//! let result = searcher.search(&mut board, Side::Second, 2);
//! assert!(result.best_move.is_some());
//! assert_eq!(board, rules.setup());
//! ```

use crate::board::{Board, Move, Side};
use crate::rules::{Outcome, Rules};

/// Score of a won position, above every static evaluation.
/// Terminal scores add the remaining depth so faster wins rank higher.
pub const WIN_SCORE: i32 = 1_000_000_000;

/// Infinity score for alpha-beta bounds
const INF: i32 = WIN_SCORE + 1_000;

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Total alpha-beta cutoffs
    pub cutoffs: u64,
    /// Cutoffs on the first move tried (measures move ordering quality)
    pub first_move_cutoffs: u64,
}

impl SearchStats {
    /// First-move cutoff rate in percent
    pub fn first_move_rate(&self) -> f64 {
        if self.cutoffs == 0 {
            0.0
        } else {
            self.first_move_cutoffs as f64 / self.cutoffs as f64 * 100.0
        }
    }
}

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move found; `None` at depth 0, on terminal boards and when the
    /// side to move has no moves
    pub best_move: Option<Move>,
    /// Minimax value, positive favours `Side::First`
    pub score: i32,
    /// Total nodes visited
    pub nodes: u64,
    pub stats: SearchStats,
}

/// Terminal value of a finished game at `depth` plies remaining
#[inline]
pub fn terminal_score(outcome: Outcome, depth: u8) -> i32 {
    match outcome.winner {
        Some(side) => side.sign() * (WIN_SCORE + depth as i32),
        None => 0,
    }
}

/// Generic alpha-beta searcher
pub struct Searcher<'r, R: Rules> {
    rules: &'r R,
    nodes: u64,
    stats: SearchStats,
}

impl<'r, R: Rules> Searcher<'r, R> {
    pub fn new(rules: &'r R) -> Self {
        Self {
            rules,
            nodes: 0,
            stats: SearchStats::default(),
        }
    }

    /// Search `depth` plies for `side` to move.
    pub fn search(&mut self, board: &mut Board<R::Kind>, side: Side, depth: u8) -> SearchResult {
        self.nodes = 0;
        self.stats = SearchStats::default();

        let (score, best_move) = self.alpha_beta(board, side, depth, -INF, INF);
        SearchResult {
            best_move,
            score,
            nodes: self.nodes,
            stats: self.stats.clone(),
        }
    }

    fn alpha_beta(
        &mut self,
        board: &mut Board<R::Kind>,
        side: Side,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
    ) -> (i32, Option<Move>) {
        self.nodes += 1;

        if let Some(outcome) = self.rules.outcome(board) {
            return (terminal_score(outcome, depth), None);
        }
        if depth == 0 {
            return (self.rules.evaluate(board), None);
        }

        let moves = self.rules.search_moves(board, side);
        if moves.is_empty() {
            // Stuck side loses
            return (-side.sign() * (WIN_SCORE + depth as i32), None);
        }

        let maximizing = side == Side::First;
        let mut best_score = if maximizing { -INF } else { INF };
        let mut best_move = None;

        for (i, &mv) in moves.iter().enumerate() {
            let Some(undo) = self.rules.apply(board, side, mv) else {
                continue;
            };
            let (score, _) = self.alpha_beta(board, side.opponent(), depth - 1, alpha, beta);
            self.rules.undo(board, mv, &undo);

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                beta = beta.min(score);
            }

            if beta <= alpha {
                self.stats.cutoffs += 1;
                if i == 0 {
                    self.stats.first_move_cutoffs += 1;
                }
                break;
            }
        }

        (best_score, best_move)
    }
}
