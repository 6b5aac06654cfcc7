//! Move ordering for alpha-beta
//!
//! Captures of valuable pieces by cheap attackers are tried first, which
//! lets alpha-beta cut more of the tree. Quiet moves keep their
//! enumeration order behind every capture.

use crate::board::{Board, Move};
use crate::rules::Rules;

/// Ordering key: `value(victim) * 10 - value(attacker)`, 0 for quiet moves
#[inline]
pub fn capture_score<R: Rules>(rules: &R, board: &Board<R::Kind>, mv: Move) -> i32 {
    match (board.get(mv.from), board.get(mv.to)) {
        (Some(attacker), Some(victim)) if !mv.is_placement() => {
            rules.piece_value(victim.kind) * 10 - rules.piece_value(attacker.kind)
        }
        _ => 0,
    }
}

/// Stable sort by descending capture score
pub fn order_by_capture<R: Rules>(rules: &R, board: &Board<R::Kind>, moves: &mut [Move]) {
    moves.sort_by_cached_key(|mv| std::cmp::Reverse(capture_score(rules, board, *mv)));
}
