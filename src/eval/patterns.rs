//! Line pattern scoring for Gomoku
//!
//! A stone (real or hypothetical) is scored by looking along the four line
//! directions through it: the run of friendly stones and whether each end
//! of the run is open (empty) or closed (opponent stone or board edge).

use crate::board::{Board, Move, Pos, Side};
use crate::rules::gomoku::{Stone, DIRECTIONS};

/// Pattern scores for evaluation
pub struct PatternScore;

impl PatternScore {
    /// Five in a row
    pub const FIVE: i32 = 100_000;

    /// Open four: _OOOO_
    pub const OPEN_FOUR: i32 = 10_000;
    /// Closed four: XOOOO_ or _OOOOX
    pub const CLOSED_FOUR: i32 = 1_000;

    /// Open three: _OOO_
    pub const OPEN_THREE: i32 = 1_000;
    /// Closed three: XOOO_ or _OOOX
    pub const CLOSED_THREE: i32 = 100;

    /// Open two: _OO_
    pub const OPEN_TWO: i32 = 100;
    /// Closed two: XOO_ or _OOX
    pub const CLOSED_TWO: i32 = 10;
}

/// How far a run is followed in each direction
const SCAN: i32 = 4;

/// Neighbourhood radius for candidate moves
const CANDIDATE_RANGE: i32 = 2;

/// Score of a run of `count` stones with `open_ends` empty ends.
/// Runs closed at both ends cannot grow to five and score nothing.
#[inline]
pub fn line_score(count: i32, open_ends: i32) -> i32 {
    match (count, open_ends) {
        (5.., _) => PatternScore::FIVE,
        (4, 2) => PatternScore::OPEN_FOUR,
        (4, 1) => PatternScore::CLOSED_FOUR,
        (3, 2) => PatternScore::OPEN_THREE,
        (3, 1) => PatternScore::CLOSED_THREE,
        (2, 2) => PatternScore::OPEN_TWO,
        (2, 1) => PatternScore::CLOSED_TWO,
        _ => 0,
    }
}

/// Follow friendly stones from `pos` in one direction.
/// Returns (stones found, end is open).
fn scan(board: &Board<Stone>, pos: Pos, dr: i32, dc: i32, side: Side) -> (i32, bool) {
    let mut count = 0;
    let mut cur = pos;
    for _ in 0..SCAN {
        let Some(next) = board.offset(cur, dr, dc) else {
            return (count, false);
        };
        match board.get(next) {
            Some(p) if p.side == side => count += 1,
            Some(_) => return (count, false),
            None => return (count, true),
        }
        cur = next;
    }
    (count, true)
}

/// Pattern value of a `side` stone on `pos`, summed over the four lines.
/// `pos` itself is treated as holding the stone whether or not it does.
pub fn point_score(board: &Board<Stone>, pos: Pos, side: Side) -> i32 {
    DIRECTIONS
        .iter()
        .map(|&(dr, dc)| {
            let (ahead, open_ahead) = scan(board, pos, dr, dc, side);
            let (behind, open_behind) = scan(board, pos, -dr, -dc, side);
            line_score(1 + ahead + behind, open_ahead as i32 + open_behind as i32)
        })
        .sum()
}

/// Whole-board score: First's stones minus Second's stones
pub fn board_score(board: &Board<Stone>) -> i32 {
    board
        .pieces()
        .map(|(pos, piece)| piece.side.sign() * point_score(board, pos, piece.side))
        .sum()
}

/// Empty cells worth searching: within two cells of any stone, ranked by
/// attack plus defence value, best `limit` kept. On an empty board the
/// centre is the only candidate.
pub fn candidate_moves(board: &Board<Stone>, limit: usize) -> Vec<Move> {
    let mut scored: Vec<(Pos, i32)> = board
        .positions()
        .filter(|pos| board.is_empty(*pos) && has_neighbor(board, *pos))
        .map(|pos| {
            let score =
                point_score(board, pos, Side::First) + point_score(board, pos, Side::Second);
            (pos, score)
        })
        .collect();

    if scored.is_empty() {
        let center = Pos::new(board.rows() / 2, board.cols() / 2);
        return if board.is_empty(center) {
            vec![Move::place(center)]
        } else {
            Vec::new()
        };
    }

    // Stable: equal scores keep row-major order
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
        .into_iter()
        .take(limit)
        .map(|(pos, _)| Move::place(pos))
        .collect()
}

fn has_neighbor(board: &Board<Stone>, pos: Pos) -> bool {
    (-CANDIDATE_RANGE..=CANDIDATE_RANGE).any(|dr| {
        (-CANDIDATE_RANGE..=CANDIDATE_RANGE)
            .any(|dc| board.offset(pos, dr, dc).is_some_and(|p| !board.is_empty(p)))
    })
}
