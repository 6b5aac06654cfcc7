//! Move making and unmaking
//!
//! `apply` mutates the board in place and hands back everything needed to
//! restore it; `undo` puts both endpoints back exactly. The search relies on
//! strict apply/recurse/undo nesting, so the restore data travels as an
//! explicit value rather than living in any shared state.

use crate::board::{Board, Move, Piece, PieceKind, Side};

use super::Rules;

/// Information needed to undo a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UndoInfo<K> {
    /// Piece that left the source cell (for placements, the new stone)
    pub moved: Piece<K>,
    /// Previous content of the destination cell
    pub captured: Option<Piece<K>>,
}

/// Make a move on the board. Returns `None`, leaving the board untouched,
/// when there is no piece of `side` to move.
pub fn apply<R: Rules>(
    rules: &R,
    board: &mut Board<R::Kind>,
    side: Side,
    mv: Move,
) -> Option<UndoInfo<R::Kind>> {
    let moved = rules.mover(board, side, mv)?;
    let captured = board.get(mv.to);

    board.set(mv.from, None);
    board.set(mv.to, rules.landing(moved, captured, mv.to));

    Some(UndoInfo { moved, captured })
}

/// Unmake a move on the board
pub fn undo<K: PieceKind>(board: &mut Board<K>, mv: Move, undo: &UndoInfo<K>) {
    // Source first: for placements `from == to` and the destination write wins.
    board.set(mv.from, Some(undo.moved));
    board.set(mv.to, undo.captured);
}
