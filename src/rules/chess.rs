//! International chess on an 8x8 board
//!
//! `Side::First` is white (bottom, moving up), `Side::Second` is black.
//! There is no check rule: a king may walk into capture, and taking a king
//! ends the game. Pawns promote to queens on the last rank.

use crate::board::{Board, Piece, PieceKind, Pos, Side};
use crate::eval::heuristic;

use super::{
    basic_checks, offset_targets, ray_targets, Outcome, Rules, WinType, DIAGONAL, ORTHOGONAL,
};

pub const SIZE: u8 = 8;

const KNIGHT_JUMPS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_STEPS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChessPiece {
    King = 1,
    Queen = 2,
    Rook = 3,
    Bishop = 4,
    Knight = 5,
    Pawn = 6,
}

impl PieceKind for ChessPiece {
    const ALL: &'static [Self] = &[
        ChessPiece::King,
        ChessPiece::Queen,
        ChessPiece::Rook,
        ChessPiece::Bishop,
        ChessPiece::Knight,
        ChessPiece::Pawn,
    ];

    #[inline]
    fn index(self) -> u8 {
        self as u8
    }
}

impl ChessPiece {
    pub fn value(self) -> i32 {
        match self {
            ChessPiece::King => 10_000,
            ChessPiece::Queen => 900,
            ChessPiece::Rook => 500,
            ChessPiece::Bishop => 330,
            ChessPiece::Knight => 320,
            ChessPiece::Pawn => 100,
        }
    }
}

/// Row direction a pawn of `side` advances in
#[inline]
pub fn pawn_direction(side: Side) -> i32 {
    match side {
        Side::First => -1,
        Side::Second => 1,
    }
}

#[inline]
fn pawn_start_row(side: Side) -> u8 {
    match side {
        Side::First => SIZE - 2,
        Side::Second => 1,
    }
}

#[inline]
fn promotion_row(side: Side) -> u8 {
    match side {
        Side::First => 0,
        Side::Second => SIZE - 1,
    }
}

/// Chess rules
#[derive(Debug, Clone, Copy, Default)]
pub struct Chess;

impl Chess {
    pub fn new() -> Self {
        Self
    }

    fn pawn_move_ok(board: &Board<ChessPiece>, side: Side, from: Pos, to: Pos) -> bool {
        let dir = pawn_direction(side);
        let dr = to.row as i32 - from.row as i32;
        let dc = to.col as i32 - from.col as i32;
        let target = board.get(to);

        if dc == 0 {
            if target.is_some() {
                return false;
            }
            if dr == dir {
                return true;
            }
            return from.row == pawn_start_row(side)
                && dr == 2 * dir
                && board.offset(from, dir, 0).is_some_and(|mid| board.is_empty(mid));
        }
        dc.abs() == 1 && dr == dir && target.is_some()
    }
}

impl Rules for Chess {
    type Kind = ChessPiece;

    const NAME: &'static str = "chess";
    const ROWS: u8 = SIZE;
    const COLS: u8 = SIZE;
    const DEFAULT_DEPTH: u8 = 3;

    fn setup(&self) -> Board<ChessPiece> {
        use ChessPiece::*;
        let back_rank = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        let mut board = self.empty_board();
        for (c, &kind) in back_rank.iter().enumerate() {
            let c = c as u8;
            board.place(Pos::new(0, c), Piece::new(Side::Second, kind));
            board.place(Pos::new(1, c), Piece::new(Side::Second, Pawn));
            board.place(Pos::new(SIZE - 2, c), Piece::new(Side::First, Pawn));
            board.place(Pos::new(SIZE - 1, c), Piece::new(Side::First, kind));
        }
        board
    }

    fn is_legal(&self, board: &Board<ChessPiece>, side: Side, from: Pos, to: Pos) -> bool {
        if !basic_checks(board, side, from, to) {
            return false;
        }
        let Some(piece) = board.get(from) else {
            return false;
        };

        let dr = (to.row as i32 - from.row as i32).abs();
        let dc = (to.col as i32 - from.col as i32).abs();
        let path_clear = || board.count_between(from, to) == Some(0);

        match piece.kind {
            ChessPiece::King => dr.max(dc) == 1,
            ChessPiece::Queen => (dr == 0 || dc == 0 || dr == dc) && path_clear(),
            ChessPiece::Rook => (dr == 0 || dc == 0) && path_clear(),
            ChessPiece::Bishop => dr == dc && path_clear(),
            ChessPiece::Knight => (dr == 2 && dc == 1) || (dr == 1 && dc == 2),
            ChessPiece::Pawn => Self::pawn_move_ok(board, side, from, to),
        }
    }

    fn targets(&self, board: &Board<ChessPiece>, from: Pos) -> Vec<Pos> {
        let Some(piece) = board.get(from) else {
            return Vec::new();
        };
        match piece.kind {
            ChessPiece::King => offset_targets(board, from, &KING_STEPS),
            ChessPiece::Queen => ray_targets(board, from, &KING_STEPS),
            ChessPiece::Rook => ray_targets(board, from, &ORTHOGONAL),
            ChessPiece::Bishop => ray_targets(board, from, &DIAGONAL),
            ChessPiece::Knight => offset_targets(board, from, &KNIGHT_JUMPS),
            ChessPiece::Pawn => {
                let dir = pawn_direction(piece.side);
                offset_targets(board, from, &[(dir, 0), (2 * dir, 0), (dir, -1), (dir, 1)])
            }
        }
    }

    fn landing(
        &self,
        moved: Piece<ChessPiece>,
        _captured: Option<Piece<ChessPiece>>,
        to: Pos,
    ) -> Option<Piece<ChessPiece>> {
        if moved.kind == ChessPiece::Pawn && to.row == promotion_row(moved.side) {
            return Some(Piece::new(moved.side, ChessPiece::Queen));
        }
        Some(moved)
    }

    fn is_terminal_piece(&self, kind: ChessPiece) -> bool {
        kind == ChessPiece::King
    }

    fn outcome(&self, board: &Board<ChessPiece>) -> Option<Outcome> {
        for side in [Side::First, Side::Second] {
            if board.find(Piece::new(side, ChessPiece::King)).is_none() {
                return Some(Outcome::win(side.opponent(), WinType::TerminalCapture));
            }
        }
        None
    }

    fn evaluate(&self, board: &Board<ChessPiece>) -> i32 {
        board
            .pieces()
            .map(|(pos, piece)| piece.side.sign() * heuristic::chess_piece_score(pos, piece))
            .sum()
    }

    fn piece_value(&self, kind: ChessPiece) -> i32 {
        kind.value()
    }
}
