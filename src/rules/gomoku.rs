//! Gomoku: five in a row on a 15x15 board
//!
//! Black (`Side::First`) and white (`Side::Second`) alternately place
//! stones on empty cells. A move is a placement with `from == to`.
//! Five or more in a row wins; a full board is a draw.

use crate::board::{Board, Move, Piece, PieceKind, Pos, Side};
use crate::eval::patterns;

use super::{Outcome, Rules, WinType};

pub const BOARD_SIZE: u8 = 15;

/// Candidate moves examined per search node
pub const MAX_CANDIDATES: usize = 20;

/// Direction vectors for line checking (4 directions)
pub(crate) const DIRECTIONS: [(i32, i32); 4] = [
    (0, 1),  // Horizontal
    (1, 0),  // Vertical
    (1, 1),  // Diagonal SE
    (1, -1), // Diagonal SW
];

/// Gomoku has a single kind of piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Stone {
    Plain = 1,
}

impl PieceKind for Stone {
    const ALL: &'static [Self] = &[Stone::Plain];

    #[inline]
    fn index(self) -> u8 {
        self as u8
    }
}

/// Stone of the given side
#[inline]
pub fn stone(side: Side) -> Piece<Stone> {
    Piece::new(side, Stone::Plain)
}

/// Fast five-in-a-row check through a specific position.
///
/// Only checks the 4 lines crossing `pos`; no allocation.
#[inline]
pub fn has_five_at(board: &Board<Stone>, pos: Pos, side: Side) -> bool {
    if !board.is_side(pos, side) {
        return false;
    }
    DIRECTIONS.iter().any(|&(dr, dc)| {
        1 + run_length(board, pos, dr, dc, side) + run_length(board, pos, -dr, -dc, side) >= 5
    })
}

/// Consecutive stones of `side` starting one step from `pos`
fn run_length(board: &Board<Stone>, pos: Pos, dr: i32, dc: i32, side: Side) -> usize {
    let mut count = 0;
    let mut cur = pos;
    while let Some(next) = board.offset(cur, dr, dc) {
        if !board.is_side(next, side) {
            break;
        }
        count += 1;
        cur = next;
    }
    count
}

/// Find the side owning a 5-in-a-row, if any.
///
/// Only lines starting at a stone with no same-colour predecessor are
/// measured, so each segment is counted once.
pub fn find_five(board: &Board<Stone>) -> Option<Side> {
    for (pos, piece) in board.pieces() {
        for &(dr, dc) in &DIRECTIONS {
            let is_start = board
                .offset(pos, -dr, -dc)
                .map_or(true, |prev| !board.is_side(prev, piece.side));
            if is_start && 1 + run_length(board, pos, dr, dc, piece.side) >= 5 {
                return Some(piece.side);
            }
        }
    }
    None
}

/// Gomoku rules
#[derive(Debug, Clone, Copy, Default)]
pub struct Gomoku;

impl Gomoku {
    pub fn new() -> Self {
        Self
    }
}

impl Rules for Gomoku {
    type Kind = Stone;

    const NAME: &'static str = "gomoku";
    const ROWS: u8 = BOARD_SIZE;
    const COLS: u8 = BOARD_SIZE;
    const DEFAULT_DEPTH: u8 = 3;
    const PLACEMENT: bool = true;

    fn setup(&self) -> Board<Stone> {
        self.empty_board()
    }

    fn is_legal(&self, board: &Board<Stone>, _side: Side, from: Pos, to: Pos) -> bool {
        from == to && board.contains(to) && board.is_empty(to)
    }

    fn legal_moves(&self, board: &Board<Stone>, _side: Side) -> Vec<Move> {
        board
            .positions()
            .filter(|pos| board.is_empty(*pos))
            .map(Move::place)
            .collect()
    }

    fn mover(&self, board: &Board<Stone>, side: Side, mv: Move) -> Option<Piece<Stone>> {
        (mv.is_placement() && board.contains(mv.to) && board.is_empty(mv.to)).then(|| stone(side))
    }

    fn is_terminal_piece(&self, _kind: Stone) -> bool {
        false
    }

    fn outcome(&self, board: &Board<Stone>) -> Option<Outcome> {
        if let Some(side) = find_five(board) {
            return Some(Outcome::win(side, WinType::FiveInRow));
        }
        if board.is_full() {
            return Some(Outcome::draw(WinType::BoardFull));
        }
        None
    }

    fn evaluate(&self, board: &Board<Stone>) -> i32 {
        patterns::board_score(board)
    }

    fn piece_value(&self, _kind: Stone) -> i32 {
        1
    }

    fn search_moves(&self, board: &Board<Stone>, _side: Side) -> Vec<Move> {
        patterns::candidate_moves(board, MAX_CANDIDATES)
    }
}
