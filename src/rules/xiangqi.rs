//! Xiangqi (Chinese chess) on a 10x9 board
//!
//! `Side::First` is red at the bottom (rows 5..=9), `Side::Second` is black
//! at the top (rows 0..=4). The river lies between rows 4 and 5.

use crate::board::{Board, Piece, PieceKind, Pos, Side};
use crate::eval::heuristic;

use super::{basic_checks, offset_targets, Outcome, Rules, WinType, DIAGONAL, ORTHOGONAL};

pub const ROWS: u8 = 10;
pub const COLS: u8 = 9;

const HORSE_JUMPS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const ELEPHANT_STEPS: [(i32, i32); 4] = [(-2, -2), (-2, 2), (2, -2), (2, 2)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum XiangqiPiece {
    General = 1,
    Advisor = 2,
    Elephant = 3,
    Horse = 4,
    Chariot = 5,
    Cannon = 6,
    Soldier = 7,
}

impl PieceKind for XiangqiPiece {
    const ALL: &'static [Self] = &[
        XiangqiPiece::General,
        XiangqiPiece::Advisor,
        XiangqiPiece::Elephant,
        XiangqiPiece::Horse,
        XiangqiPiece::Chariot,
        XiangqiPiece::Cannon,
        XiangqiPiece::Soldier,
    ];

    #[inline]
    fn index(self) -> u8 {
        self as u8
    }
}

impl XiangqiPiece {
    pub fn value(self) -> i32 {
        match self {
            XiangqiPiece::General => 10_000,
            XiangqiPiece::Advisor => 200,
            XiangqiPiece::Elephant => 200,
            XiangqiPiece::Horse => 400,
            XiangqiPiece::Chariot => 1000,
            XiangqiPiece::Cannon => 450,
            XiangqiPiece::Soldier => 100,
        }
    }
}

/// Is `pos` inside the palace of `side`?
#[inline]
pub fn in_palace(side: Side, pos: Pos) -> bool {
    let rows_ok = match side {
        Side::First => pos.row >= 7,
        Side::Second => pos.row <= 2,
    };
    rows_ok && (3..=5).contains(&pos.col)
}

/// Is `pos` on `side`'s own half of the river?
#[inline]
pub fn on_own_half(side: Side, pos: Pos) -> bool {
    match side {
        Side::First => pos.row >= 5,
        Side::Second => pos.row <= 4,
    }
}

#[inline]
fn forward(side: Side) -> i32 {
    match side {
        Side::First => -1,
        Side::Second => 1,
    }
}

/// Xiangqi rules
#[derive(Debug, Clone, Copy, Default)]
pub struct Xiangqi;

impl Xiangqi {
    pub fn new() -> Self {
        Self
    }

    /// Generals facing each other on an open file: the mover may take the
    /// opposing general directly.
    fn flying_general(board: &Board<XiangqiPiece>, side: Side, from: Pos, to: Pos) -> bool {
        from.col == to.col
            && board.get(to) == Some(Piece::new(side.opponent(), XiangqiPiece::General))
            && board.count_between(from, to) == Some(0)
    }

    fn horse_ok(board: &Board<XiangqiPiece>, from: Pos, dr: i32, dc: i32) -> bool {
        let leg = if dr.abs() == 2 {
            board.offset(from, dr.signum(), 0)
        } else {
            board.offset(from, 0, dc.signum())
        };
        leg.is_some_and(|p| board.is_empty(p))
    }

    fn cannon_ok(board: &Board<XiangqiPiece>, from: Pos, to: Pos) -> bool {
        if from.row != to.row && from.col != to.col {
            return false;
        }
        let screens = board.count_between(from, to);
        if board.is_empty(to) {
            screens == Some(0)
        } else {
            screens == Some(1)
        }
    }

    fn soldier_ok(side: Side, from: Pos, dr: i32, dc: i32) -> bool {
        if dr == forward(side) && dc == 0 {
            return true;
        }
        // Sideways steps only once across the river
        !on_own_half(side, from) && dr == 0 && dc.abs() == 1
    }

    /// Every cell sharing a row or column with `from`
    fn line_targets(board: &Board<XiangqiPiece>, from: Pos) -> Vec<Pos> {
        board
            .positions()
            .filter(|p| *p != from && (p.row == from.row || p.col == from.col))
            .collect()
    }
}

impl Rules for Xiangqi {
    type Kind = XiangqiPiece;

    const NAME: &'static str = "xiangqi";
    const ROWS: u8 = ROWS;
    const COLS: u8 = COLS;
    const DEFAULT_DEPTH: u8 = 3;

    fn setup(&self) -> Board<XiangqiPiece> {
        use XiangqiPiece::*;
        let back_rank = [
            Chariot, Horse, Elephant, Advisor, General, Advisor, Elephant, Horse, Chariot,
        ];
        let mut board = self.empty_board();
        for (side, back, cannons, soldiers) in [
            (Side::Second, 0u8, 2u8, 3u8),
            (Side::First, ROWS - 1, ROWS - 3, ROWS - 4),
        ] {
            for (c, &kind) in back_rank.iter().enumerate() {
                board.place(Pos::new(back, c as u8), Piece::new(side, kind));
            }
            board.place(Pos::new(cannons, 1), Piece::new(side, Cannon));
            board.place(Pos::new(cannons, 7), Piece::new(side, Cannon));
            for c in (0..COLS).step_by(2) {
                board.place(Pos::new(soldiers, c), Piece::new(side, Soldier));
            }
        }
        board
    }

    fn is_legal(&self, board: &Board<XiangqiPiece>, side: Side, from: Pos, to: Pos) -> bool {
        if !basic_checks(board, side, from, to) {
            return false;
        }
        let Some(piece) = board.get(from) else {
            return false;
        };

        let dr = to.row as i32 - from.row as i32;
        let dc = to.col as i32 - from.col as i32;

        match piece.kind {
            XiangqiPiece::General => {
                (in_palace(side, to) && dr.abs() + dc.abs() == 1)
                    || Self::flying_general(board, side, from, to)
            }
            XiangqiPiece::Advisor => in_palace(side, to) && dr.abs() == 1 && dc.abs() == 1,
            XiangqiPiece::Elephant => {
                dr.abs() == 2
                    && dc.abs() == 2
                    && on_own_half(side, to)
                    && board
                        .offset(from, dr / 2, dc / 2)
                        .is_some_and(|eye| board.is_empty(eye))
            }
            XiangqiPiece::Horse => {
                ((dr.abs() == 2 && dc.abs() == 1) || (dr.abs() == 1 && dc.abs() == 2))
                    && Self::horse_ok(board, from, dr, dc)
            }
            XiangqiPiece::Chariot => {
                (dr == 0 || dc == 0) && board.count_between(from, to) == Some(0)
            }
            XiangqiPiece::Cannon => Self::cannon_ok(board, from, to),
            XiangqiPiece::Soldier => Self::soldier_ok(side, from, dr, dc),
        }
    }

    fn targets(&self, board: &Board<XiangqiPiece>, from: Pos) -> Vec<Pos> {
        let Some(piece) = board.get(from) else {
            return Vec::new();
        };
        match piece.kind {
            XiangqiPiece::General => {
                let mut targets = offset_targets(board, from, &ORTHOGONAL);
                if let Some(enemy) =
                    board.find(Piece::new(piece.side.opponent(), XiangqiPiece::General))
                {
                    if enemy.col == from.col {
                        targets.push(enemy);
                    }
                }
                targets
            }
            XiangqiPiece::Advisor => offset_targets(board, from, &DIAGONAL),
            XiangqiPiece::Elephant => offset_targets(board, from, &ELEPHANT_STEPS),
            XiangqiPiece::Horse => offset_targets(board, from, &HORSE_JUMPS),
            XiangqiPiece::Chariot | XiangqiPiece::Cannon => Self::line_targets(board, from),
            XiangqiPiece::Soldier => offset_targets(board, from, &ORTHOGONAL),
        }
    }

    fn is_terminal_piece(&self, kind: XiangqiPiece) -> bool {
        kind == XiangqiPiece::General
    }

    fn outcome(&self, board: &Board<XiangqiPiece>) -> Option<Outcome> {
        for side in [Side::First, Side::Second] {
            if board.find(Piece::new(side, XiangqiPiece::General)).is_none() {
                return Some(Outcome::win(side.opponent(), WinType::TerminalCapture));
            }
        }
        None
    }

    fn evaluate(&self, board: &Board<XiangqiPiece>) -> i32 {
        board
            .pieces()
            .map(|(pos, piece)| piece.side.sign() * heuristic::xiangqi_piece_score(pos, piece))
            .sum()
    }

    fn piece_value(&self, kind: XiangqiPiece) -> i32 {
        kind.value()
    }
}
