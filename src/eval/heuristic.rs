//! Per-piece heuristic terms for the capture games
//!
//! Every function scores one piece from its owner's perspective. The rule
//! engines sign the result by side and sum over the board, so the
//! evaluation of a position and of its mirror image cancel out.

use crate::board::{Piece, Pos, Side};
use crate::rules::chess::ChessPiece;
use crate::rules::jungle::{self, Animal};
use crate::rules::military::{self, Rank};
use crate::rules::xiangqi::{self, XiangqiPiece};

/// Jungle: bonus per step closer to the enemy den
const DEN_WEIGHT: i32 = 10;
/// Jungle: Manhattan distance beyond which the den bonus turns negative
const DEN_HORIZON: i32 = 12;

/// Chess: bonus per row a pawn has advanced
const PAWN_ADVANCE: i32 = 10;
/// Chess: minor piece on one of the 16 central squares
const CENTER_BONUS: i32 = 5;

/// Xiangqi: soldier across the river
const SOLDIER_CROSSED: i32 = 100;
/// Xiangqi: per row beyond the river bank
const SOLDIER_ADVANCE: i32 = 10;

/// Military: bonus per row closer to the enemy headquarters
const HQ_WEIGHT: i32 = 5;

/// Jungle piece: material, den proximity and trap terrain
pub fn jungle_piece_score(pos: Pos, piece: Piece<Animal>) -> i32 {
    let value = piece.kind.value();
    let enemy_den = jungle::den_of(piece.side.opponent());
    let mut score = value + (DEN_HORIZON - pos.distance(enemy_den)) * DEN_WEIGHT;

    match jungle::trap_owner(pos) {
        Some(owner) if owner == piece.side => score -= value / 2,
        Some(_) => score += value / 5,
        None => {}
    }
    score
}

/// Chess piece: material, pawn advancement and minor-piece centralisation
pub fn chess_piece_score(pos: Pos, piece: Piece<ChessPiece>) -> i32 {
    let mut score = piece.kind.value();
    match piece.kind {
        ChessPiece::Pawn => {
            let advanced = match piece.side {
                Side::First => 6 - pos.row as i32,
                Side::Second => pos.row as i32 - 1,
            };
            score += advanced.max(0) * PAWN_ADVANCE;
        }
        ChessPiece::Knight | ChessPiece::Bishop => {
            if (2..=5).contains(&pos.row) && (2..=5).contains(&pos.col) {
                score += CENTER_BONUS;
            }
        }
        _ => {}
    }
    score
}

/// Xiangqi piece: material plus soldier progress past the river
pub fn xiangqi_piece_score(pos: Pos, piece: Piece<XiangqiPiece>) -> i32 {
    let mut score = piece.kind.value();
    if piece.kind == XiangqiPiece::Soldier && !xiangqi::on_own_half(piece.side, pos) {
        let beyond = match piece.side {
            Side::First => 4 - pos.row as i32,
            Side::Second => pos.row as i32 - 5,
        };
        score += SOLDIER_CROSSED + beyond * SOLDIER_ADVANCE;
    }
    score
}

/// Military piece: material plus advancement of mobile pieces
pub fn military_piece_score(pos: Pos, piece: Piece<Rank>) -> i32 {
    let mut score = piece.kind.value();
    if piece.kind.is_mobile() {
        let rows_to_enemy_hq = match piece.side {
            Side::First => pos.row as i32,
            Side::Second => (military::ROWS - 1 - pos.row) as i32,
        };
        score += (military::ROWS as i32 - 1 - rows_to_enemy_hq) * HQ_WEIGHT;
    }
    score
}
