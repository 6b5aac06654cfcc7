//! Military chess (Luzhanqi) on a 12x5 board
//!
//! `Side::First` (red) deploys in rows 6..=11, `Side::Second` (blue) in rows
//! 0..=5. Pieces are visible to both sides.
//!
//! Board features:
//! - Camps: safe cells. A piece inside a camp cannot be attacked, and
//!   diagonal steps are allowed into or out of a camp.
//! - Headquarters: the flag always starts in one of the two own HQs.
//! - Railways: rows 1, 5, 6, 10 and columns 0 and 4 between rows 1 and 10.
//!   Pieces travel any distance in a straight line along empty railway;
//!   engineers may also turn corners.
//!
//! Capturing the enemy flag wins.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::board::{Board, Piece, PieceKind, Pos, Side};
use crate::eval::heuristic;

use super::{basic_checks, offset_targets, Outcome, Rules, WinType, DIAGONAL, ORTHOGONAL};

pub const ROWS: u8 = 12;
pub const COLS: u8 = 5;

/// Camps as (row, col)
pub const CAMPS: [Pos; 10] = [
    Pos::new(2, 1),
    Pos::new(2, 3),
    Pos::new(3, 2),
    Pos::new(4, 1),
    Pos::new(4, 3),
    Pos::new(7, 1),
    Pos::new(7, 3),
    Pos::new(8, 2),
    Pos::new(9, 1),
    Pos::new(9, 3),
];

/// Headquarters as (row, col); the first two belong to blue
pub const HEADQUARTERS: [Pos; 4] = [
    Pos::new(0, 1),
    Pos::new(0, 3),
    Pos::new(11, 1),
    Pos::new(11, 3),
];

/// Ranks, strongest first. Landmine, bomb and flag follow the officers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Rank {
    FieldMarshal = 1,
    General = 2,
    LieutenantGeneral = 3,
    Brigadier = 4,
    Colonel = 5,
    Major = 6,
    Captain = 7,
    Lieutenant = 8,
    Engineer = 9,
    Landmine = 10,
    Bomb = 11,
    Flag = 12,
}

impl PieceKind for Rank {
    const ALL: &'static [Self] = &[
        Rank::FieldMarshal,
        Rank::General,
        Rank::LieutenantGeneral,
        Rank::Brigadier,
        Rank::Colonel,
        Rank::Major,
        Rank::Captain,
        Rank::Lieutenant,
        Rank::Engineer,
        Rank::Landmine,
        Rank::Bomb,
        Rank::Flag,
    ];

    #[inline]
    fn index(self) -> u8 {
        self as u8
    }
}

impl Rank {
    pub fn value(self) -> i32 {
        match self {
            Rank::FieldMarshal => 900,
            Rank::General => 800,
            Rank::LieutenantGeneral => 700,
            Rank::Brigadier => 600,
            Rank::Colonel => 500,
            Rank::Major => 400,
            Rank::Captain => 300,
            Rank::Lieutenant => 200,
            Rank::Engineer => 150,
            Rank::Landmine => 100,
            Rank::Bomb => 150,
            Rank::Flag => 10_000,
        }
    }

    /// Landmines and the flag never move
    #[inline]
    pub fn is_mobile(self) -> bool {
        !matches!(self, Rank::Landmine | Rank::Flag)
    }
}

/// Result of one piece striking another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clash {
    /// Attacker takes the cell
    AttackerWins,
    /// Both pieces are removed
    BothRemoved,
    /// Attacker is removed, defender stays
    DefenderWins,
}

/// Resolve an attack by rank
pub fn clash(attacker: Rank, defender: Rank) -> Clash {
    match (attacker, defender) {
        (_, Rank::Flag) => Clash::AttackerWins,
        (Rank::Bomb, _) | (_, Rank::Bomb) => Clash::BothRemoved,
        (Rank::Engineer, Rank::Landmine) => Clash::AttackerWins,
        (_, Rank::Landmine) => Clash::BothRemoved,
        (a, d) if a == d => Clash::BothRemoved,
        (a, d) if a.index() < d.index() => Clash::AttackerWins,
        _ => Clash::DefenderWins,
    }
}

#[inline]
pub fn is_camp(pos: Pos) -> bool {
    CAMPS.contains(&pos)
}

#[inline]
pub fn is_headquarters(pos: Pos) -> bool {
    HEADQUARTERS.contains(&pos)
}

#[inline]
pub fn is_railway(pos: Pos) -> bool {
    if pos.row >= ROWS || pos.col >= COLS {
        return false;
    }
    matches!(pos.row, 1 | 5 | 6 | 10)
        || ((pos.col == 0 || pos.col == COLS - 1) && (1..=10).contains(&pos.row))
}

/// Starting arrangement of both armies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Deployment {
    /// Fixed mirrored layout
    #[default]
    Standard,
    /// Random layout per side, reproducible from the seed
    Shuffled { seed: u64 },
}

/// The 25 pieces of one army
pub const ARMY: [Rank; 25] = [
    Rank::FieldMarshal,
    Rank::General,
    Rank::LieutenantGeneral,
    Rank::LieutenantGeneral,
    Rank::Brigadier,
    Rank::Brigadier,
    Rank::Colonel,
    Rank::Colonel,
    Rank::Major,
    Rank::Major,
    Rank::Captain,
    Rank::Captain,
    Rank::Captain,
    Rank::Lieutenant,
    Rank::Lieutenant,
    Rank::Lieutenant,
    Rank::Engineer,
    Rank::Engineer,
    Rank::Engineer,
    Rank::Landmine,
    Rank::Landmine,
    Rank::Landmine,
    Rank::Bomb,
    Rank::Bomb,
    Rank::Flag,
];

/// Red's fixed layout, back row first. Camps are `None`.
const STANDARD_LAYOUT: [[Option<Rank>; 5]; 6] = {
    use Rank::*;
    [
        [Some(Landmine), Some(Flag), Some(Landmine), Some(Lieutenant), Some(Engineer)],
        [Some(Captain), Some(Landmine), Some(Bomb), Some(Engineer), Some(Captain)],
        [Some(Major), None, Some(Brigadier), None, Some(Major)],
        [Some(Colonel), Some(Bomb), None, Some(General), Some(Colonel)],
        [Some(LieutenantGeneral), None, Some(FieldMarshal), None, Some(LieutenantGeneral)],
        [Some(Lieutenant), Some(Engineer), Some(Brigadier), Some(Captain), Some(Lieutenant)],
    ]
};

/// Map a red-relative cell to `side`'s half (blue is rotated 180 degrees)
#[inline]
fn for_side(side: Side, pos: Pos) -> Pos {
    match side {
        Side::First => pos,
        Side::Second => Pos::new(ROWS - 1 - pos.row, COLS - 1 - pos.col),
    }
}

/// Non-camp cells of red's half, back row first
fn red_cells() -> Vec<Pos> {
    (ROWS / 2..ROWS)
        .rev()
        .flat_map(|r| (0..COLS).map(move |c| Pos::new(r, c)))
        .filter(|p| !is_camp(*p))
        .collect()
}

fn standard_army() -> Vec<(Pos, Rank)> {
    let mut army = Vec::with_capacity(ARMY.len());
    for (i, row) in STANDARD_LAYOUT.iter().enumerate() {
        for (c, rank) in row.iter().enumerate() {
            if let Some(rank) = rank {
                army.push((Pos::new(ROWS - 1 - i as u8, c as u8), *rank));
            }
        }
    }
    army
}

/// Pull the first free cell accepted by `allowed`
fn take_cell(free: &mut Vec<Pos>, allowed: impl Fn(Pos) -> bool) -> Option<Pos> {
    let i = free.iter().position(|p| allowed(*p))?;
    Some(free.remove(i))
}

/// Random red-relative layout: flag in a headquarters, landmines in the
/// back two rows, bombs off the front row.
fn shuffled_army(rng: &mut StdRng) -> Vec<(Pos, Rank)> {
    let front_row = ROWS / 2;
    let hqs = [Pos::new(ROWS - 1, 1), Pos::new(ROWS - 1, 3)];
    let flag_at = hqs[rng.random_range(0..hqs.len())];

    let mut free = red_cells();
    free.retain(|p| *p != flag_at);
    free.shuffle(rng);

    let mut army = vec![(flag_at, Rank::Flag)];
    // Constrained pieces claim their cells first
    for rank in ARMY {
        let cell = match rank {
            Rank::Landmine => take_cell(&mut free, |p| p.row >= ROWS - 2),
            Rank::Bomb => take_cell(&mut free, |p| p.row != front_row),
            _ => continue,
        };
        if let Some(pos) = cell {
            army.push((pos, rank));
        }
    }
    for rank in ARMY {
        if matches!(rank, Rank::Landmine | Rank::Bomb | Rank::Flag) {
            continue;
        }
        if let Some(pos) = take_cell(&mut free, |_| true) {
            army.push((pos, rank));
        }
    }
    army
}

/// Military chess rules
#[derive(Debug, Clone, Copy, Default)]
pub struct Military {
    deployment: Deployment,
}

impl Military {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deployment(deployment: Deployment) -> Self {
        Self { deployment }
    }

    /// Single step along a road, or diagonally into or out of a camp
    fn road_step(from: Pos, to: Pos) -> bool {
        let dr = (to.row as i32 - from.row as i32).abs();
        let dc = (to.col as i32 - from.col as i32).abs();
        dr + dc == 1 || (dr == 1 && dc == 1 && (is_camp(from) || is_camp(to)))
    }

    /// Straight railway run with every intermediate cell on the railway and empty
    fn railway_straight(board: &Board<Rank>, from: Pos, to: Pos) -> bool {
        if from.row != to.row && from.col != to.col {
            return false;
        }
        let dr = (to.row as i32 - from.row as i32).signum();
        let dc = (to.col as i32 - from.col as i32).signum();
        let mut cur = from;
        loop {
            let Some(next) = board.offset(cur, dr, dc) else {
                return false;
            };
            if next == to {
                return true;
            }
            if !is_railway(next) || !board.is_empty(next) {
                return false;
            }
            cur = next;
        }
    }

    /// Engineer path: breadth-first over empty railway cells
    fn railway_path(board: &Board<Rank>, from: Pos, to: Pos) -> bool {
        let cols = board.cols() as usize;
        let mut seen = vec![false; board.rows() as usize * cols];
        let mut queue = VecDeque::from([from]);
        seen[from.row as usize * cols + from.col as usize] = true;

        while let Some(cur) = queue.pop_front() {
            for (dr, dc) in ORTHOGONAL {
                let Some(next) = board.offset(cur, dr, dc) else {
                    continue;
                };
                if !is_railway(next) {
                    continue;
                }
                if next == to {
                    return true;
                }
                let idx = next.row as usize * cols + next.col as usize;
                if !seen[idx] && board.is_empty(next) {
                    seen[idx] = true;
                    queue.push_back(next);
                }
            }
        }
        false
    }

    fn can_reach(board: &Board<Rank>, rank: Rank, from: Pos, to: Pos) -> bool {
        if Self::road_step(from, to) {
            return true;
        }
        if !is_railway(from) || !is_railway(to) {
            return false;
        }
        Self::railway_straight(board, from, to)
            || (rank == Rank::Engineer && Self::railway_path(board, from, to))
    }
}

impl Rules for Military {
    type Kind = Rank;

    const NAME: &'static str = "military";
    const ROWS: u8 = ROWS;
    const COLS: u8 = COLS;
    const DEFAULT_DEPTH: u8 = 2;

    fn setup(&self) -> Board<Rank> {
        let mut board = self.empty_board();
        match self.deployment {
            Deployment::Standard => {
                for side in [Side::First, Side::Second] {
                    for (pos, rank) in standard_army() {
                        board.place(for_side(side, pos), Piece::new(side, rank));
                    }
                }
            }
            Deployment::Shuffled { seed } => {
                let mut rng = StdRng::seed_from_u64(seed);
                for side in [Side::First, Side::Second] {
                    for (pos, rank) in shuffled_army(&mut rng) {
                        board.place(for_side(side, pos), Piece::new(side, rank));
                    }
                }
            }
        }
        board
    }

    fn deployment(&self) -> Option<Deployment> {
        Some(self.deployment)
    }

    fn set_deployment(&mut self, deployment: Deployment) {
        self.deployment = deployment;
    }

    fn is_legal(&self, board: &Board<Rank>, side: Side, from: Pos, to: Pos) -> bool {
        if !basic_checks(board, side, from, to) {
            return false;
        }
        let Some(piece) = board.get(from) else {
            return false;
        };
        if !piece.kind.is_mobile() {
            return false;
        }
        if let Some(defender) = board.get(to) {
            if is_camp(to) || clash(piece.kind, defender.kind) == Clash::DefenderWins {
                return false;
            }
        }
        Self::can_reach(board, piece.kind, from, to)
    }

    fn targets(&self, board: &Board<Rank>, from: Pos) -> Vec<Pos> {
        let Some(piece) = board.get(from) else {
            return Vec::new();
        };
        if !piece.kind.is_mobile() {
            return Vec::new();
        }
        let mut targets = offset_targets(board, from, &DIAGONAL);
        targets.extend(
            board
                .positions()
                .filter(|p| *p != from && (p.row == from.row || p.col == from.col)),
        );
        if piece.kind == Rank::Engineer && is_railway(from) {
            // Diagonal neighbours are already listed
            let neighbour = |p: Pos| p.row.abs_diff(from.row) == 1 && p.col.abs_diff(from.col) == 1;
            targets.extend(board.positions().filter(|p| {
                p.row != from.row && p.col != from.col && is_railway(*p) && !neighbour(*p)
            }));
        }
        targets
    }

    fn landing(
        &self,
        moved: Piece<Rank>,
        captured: Option<Piece<Rank>>,
        _to: Pos,
    ) -> Option<Piece<Rank>> {
        let Some(defender) = captured else {
            return Some(moved);
        };
        match clash(moved.kind, defender.kind) {
            Clash::AttackerWins => Some(moved),
            Clash::BothRemoved => None,
            Clash::DefenderWins => Some(defender),
        }
    }

    fn is_terminal_piece(&self, kind: Rank) -> bool {
        kind == Rank::Flag
    }

    fn outcome(&self, board: &Board<Rank>) -> Option<Outcome> {
        for side in [Side::First, Side::Second] {
            if board.find(Piece::new(side, Rank::Flag)).is_none() {
                return Some(Outcome::win(side.opponent(), WinType::TerminalCapture));
            }
        }
        None
    }

    fn evaluate(&self, board: &Board<Rank>) -> i32 {
        board
            .pieces()
            .map(|(pos, piece)| piece.side.sign() * heuristic::military_piece_score(pos, piece))
            .sum()
    }

    fn piece_value(&self, kind: Rank) -> i32 {
        kind.value()
    }
}
