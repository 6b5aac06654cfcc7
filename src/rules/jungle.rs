//! Animal chess (Jungle) on a 9x7 board
//!
//! `Side::First` (red) starts at the bottom and defends the den at (8, 3);
//! `Side::Second` (blue) starts at the top with the den at (0, 3).
//!
//! Terrain:
//! - Two 3x2 rivers in the middle rows. Only the rat swims.
//! - Three traps around each den. A piece standing in the opponent's trap
//!   loses its rank and can be taken by anything.
//! - A piece may never enter its own den; entering the enemy den wins.
//!
//! Lion and tiger leap straight across a river when every water cell on the
//! way is empty.

use crate::board::{Board, Piece, PieceKind, Pos, Side};
use crate::eval::heuristic;

use super::{basic_checks, offset_targets, Outcome, Rules, WinType, ORTHOGONAL};

pub const ROWS: u8 = 9;
pub const COLS: u8 = 7;

/// Animals by rank, strongest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Animal {
    Elephant = 1,
    Lion = 2,
    Tiger = 3,
    Leopard = 4,
    Wolf = 5,
    Dog = 6,
    Cat = 7,
    Rat = 8,
}

impl PieceKind for Animal {
    const ALL: &'static [Self] = &[
        Animal::Elephant,
        Animal::Lion,
        Animal::Tiger,
        Animal::Leopard,
        Animal::Wolf,
        Animal::Dog,
        Animal::Cat,
        Animal::Rat,
    ];

    #[inline]
    fn index(self) -> u8 {
        self as u8
    }
}

impl Animal {
    /// 1 = strongest (elephant), 8 = weakest (rat)
    #[inline]
    pub fn rank(self) -> u8 {
        self.index()
    }

    /// Material value: elephant 80 down to rat 10
    #[inline]
    pub fn value(self) -> i32 {
        90 - 10 * self.rank() as i32
    }

    #[inline]
    fn leaps(self) -> bool {
        matches!(self, Animal::Lion | Animal::Tiger)
    }
}

/// River cells: rows 3-5, columns 1-2 and 4-5
#[inline]
pub fn is_river(pos: Pos) -> bool {
    (3..=5).contains(&pos.row) && matches!(pos.col, 1 | 2 | 4 | 5)
}

/// Den defended by `side`
#[inline]
pub fn den_of(side: Side) -> Pos {
    match side {
        Side::First => Pos::new(8, 3),
        Side::Second => Pos::new(0, 3),
    }
}

/// Owner of the trap on `pos`, if it is one
pub fn trap_owner(pos: Pos) -> Option<Side> {
    match (pos.row, pos.col) {
        (8, 2) | (8, 4) | (7, 3) => Some(Side::First),
        (0, 2) | (0, 4) | (1, 3) => Some(Side::Second),
        _ => None,
    }
}

/// Animal chess rules
#[derive(Debug, Clone, Copy, Default)]
pub struct Jungle;

impl Jungle {
    pub fn new() -> Self {
        Self
    }

    /// Landing cell of a river leap starting at `from` in direction
    /// `(dr, dc)`. `None` if the first step is not water, the water is
    /// occupied, or the far bank is off the board.
    fn leap_landing(board: &Board<Animal>, from: Pos, dr: i32, dc: i32) -> Option<Pos> {
        let mut cur = board.offset(from, dr, dc)?;
        if !is_river(cur) {
            return None;
        }
        while is_river(cur) {
            if !board.is_empty(cur) {
                return None;
            }
            cur = board.offset(cur, dr, dc)?;
        }
        Some(cur)
    }

    /// Capture rule between two animals. Fights never cross the water line.
    fn can_capture(attacker: Piece<Animal>, from: Pos, defender: Piece<Animal>, to: Pos) -> bool {
        if is_river(from) != is_river(to) {
            return false;
        }
        // Defender sits in a trap owned by the attacker's side
        if trap_owner(to) == Some(attacker.side) {
            return true;
        }
        match (attacker.kind, defender.kind) {
            (Animal::Rat, Animal::Elephant) => true,
            (Animal::Elephant, Animal::Rat) => false,
            (a, d) => a.rank() <= d.rank(),
        }
    }
}

impl Rules for Jungle {
    type Kind = Animal;

    const NAME: &'static str = "jungle";
    const ROWS: u8 = ROWS;
    const COLS: u8 = COLS;
    const DEFAULT_DEPTH: u8 = 2;

    fn setup(&self) -> Board<Animal> {
        let mut board = self.empty_board();
        let first = [
            (8, 6, Animal::Elephant),
            (8, 0, Animal::Lion),
            (6, 0, Animal::Tiger),
            (6, 4, Animal::Leopard),
            (6, 2, Animal::Wolf),
            (7, 5, Animal::Dog),
            (7, 1, Animal::Cat),
            (6, 6, Animal::Rat),
        ];
        // Second's layout is First's rotated by 180 degrees
        for (r, c, kind) in first {
            board.place(Pos::new(r, c), Piece::new(Side::First, kind));
            board.place(
                Pos::new(ROWS - 1 - r, COLS - 1 - c),
                Piece::new(Side::Second, kind),
            );
        }
        board
    }

    fn is_legal(&self, board: &Board<Animal>, side: Side, from: Pos, to: Pos) -> bool {
        if !basic_checks(board, side, from, to) {
            return false;
        }
        let Some(piece) = board.get(from) else {
            return false;
        };
        if to == den_of(side) {
            return false;
        }

        let dr = to.row as i32 - from.row as i32;
        let dc = to.col as i32 - from.col as i32;
        let step = dr.abs() + dc.abs() == 1;
        if !step {
            let straight = dr == 0 || dc == 0;
            if !(piece.kind.leaps() && straight) {
                return false;
            }
            if Self::leap_landing(board, from, dr.signum(), dc.signum()) != Some(to) {
                return false;
            }
        }

        if is_river(to) && piece.kind != Animal::Rat {
            return false;
        }

        match board.get(to) {
            Some(target) => Self::can_capture(piece, from, target, to),
            None => true,
        }
    }

    fn targets(&self, board: &Board<Animal>, from: Pos) -> Vec<Pos> {
        let mut targets = offset_targets(board, from, &ORTHOGONAL);
        if board.get(from).is_some_and(|p| p.kind.leaps()) {
            for (dr, dc) in ORTHOGONAL {
                if let Some(landing) = Self::leap_landing(board, from, dr, dc) {
                    targets.push(landing);
                }
            }
        }
        targets
    }

    fn is_terminal_piece(&self, _kind: Animal) -> bool {
        false
    }

    fn outcome(&self, board: &Board<Animal>) -> Option<Outcome> {
        for side in [Side::First, Side::Second] {
            if board.is_side(den_of(side.opponent()), side) {
                return Some(Outcome::win(side, WinType::DenReached));
            }
        }
        for side in [Side::First, Side::Second] {
            if board.pieces_of(side).next().is_none() {
                return Some(Outcome::win(side.opponent(), WinType::Annihilation));
            }
        }
        None
    }

    fn evaluate(&self, board: &Board<Animal>) -> i32 {
        board
            .pieces()
            .map(|(pos, piece)| piece.side.sign() * heuristic::jungle_piece_score(pos, piece))
            .sum()
    }

    fn piece_value(&self, kind: Animal) -> i32 {
        kind.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red(kind: Animal) -> Piece<Animal> {
        Piece::new(Side::First, kind)
    }

    fn blue(kind: Animal) -> Piece<Animal> {
        Piece::new(Side::Second, kind)
    }

    #[test]
    fn test_piece_code_boundaries() {
        assert_eq!(Piece::<Animal>::from_code(8), Some(red(Animal::Rat)));
        assert_eq!(Piece::<Animal>::from_code(9), Some(blue(Animal::Elephant)));
        assert_eq!(Piece::<Animal>::from_code(16), Some(blue(Animal::Rat)));
        assert_eq!(Piece::<Animal>::from_code(17), None);
        assert_eq!(Piece::<Animal>::from_code(0), None);
        assert_eq!(blue(Animal::Rat).code(), 16);
        for (i, kind) in Animal::ALL.iter().enumerate() {
            assert_eq!(kind.index() as usize, i + 1);
        }
    }

    #[test]
    fn test_setup_is_symmetric() {
        let rules = Jungle;
        let board = rules.setup();
        assert_eq!(board.piece_count(), 16);
        assert_eq!(board.get(Pos::new(8, 6)), Some(red(Animal::Elephant)));
        assert_eq!(board.get(Pos::new(0, 0)), Some(blue(Animal::Elephant)));
        assert_eq!(board.get(Pos::new(2, 0)), Some(blue(Animal::Rat)));
        assert_eq!(rules.evaluate(&board), 0);
        assert_eq!(rules.outcome(&board), None);
    }

    #[test]
    fn test_rat_captures_elephant_not_reverse() {
        let rules = Jungle;
        let mut board = rules.empty_board();
        board.place(Pos::new(6, 3), red(Animal::Rat));
        board.place(Pos::new(5, 3), blue(Animal::Elephant));
        assert!(rules.is_legal(&board, Side::First, Pos::new(6, 3), Pos::new(5, 3)));
        assert!(!rules.is_legal(&board, Side::Second, Pos::new(5, 3), Pos::new(6, 3)));
    }

    #[test]
    fn test_rat_in_river_cannot_capture_on_land() {
        let rules = Jungle;
        let mut board = rules.empty_board();
        board.place(Pos::new(4, 1), red(Animal::Rat));
        board.place(Pos::new(4, 0), blue(Animal::Elephant));
        board.place(Pos::new(3, 1), blue(Animal::Rat));
        assert!(!rules.is_legal(&board, Side::First, Pos::new(4, 1), Pos::new(4, 0)));
        // Rats may fight inside the water
        assert!(rules.is_legal(&board, Side::First, Pos::new(4, 1), Pos::new(3, 1)));

        // Nor can a rat on the bank take one in the water, or the reverse
        board.place(Pos::new(2, 1), red(Animal::Rat));
        assert!(!rules.is_legal(&board, Side::First, Pos::new(2, 1), Pos::new(3, 1)));
        assert!(!rules.is_legal(&board, Side::Second, Pos::new(3, 1), Pos::new(2, 1)));
    }

    #[test]
    fn test_rank_order() {
        let rules = Jungle;
        let mut board = rules.empty_board();
        board.place(Pos::new(7, 0), red(Animal::Wolf));
        board.place(Pos::new(6, 0), blue(Animal::Dog));
        board.place(Pos::new(7, 1), blue(Animal::Tiger));
        assert!(rules.is_legal(&board, Side::First, Pos::new(7, 0), Pos::new(6, 0)));
        assert!(!rules.is_legal(&board, Side::First, Pos::new(7, 0), Pos::new(7, 1)));
    }

    #[test]
    fn test_only_rat_swims() {
        let rules = Jungle;
        let mut board = rules.empty_board();
        board.place(Pos::new(6, 1), red(Animal::Cat));
        board.place(Pos::new(6, 2), red(Animal::Rat));
        assert!(!rules.is_legal(&board, Side::First, Pos::new(6, 1), Pos::new(5, 1)));
        assert!(rules.is_legal(&board, Side::First, Pos::new(6, 2), Pos::new(5, 2)));
    }

    #[test]
    fn test_cannot_enter_own_den() {
        let rules = Jungle;
        let mut board = rules.empty_board();
        board.place(Pos::new(7, 3), red(Animal::Dog));
        assert!(!rules.is_legal(&board, Side::First, Pos::new(7, 3), Pos::new(8, 3)));
    }

    #[test]
    fn test_lion_leaps_across_river() {
        let rules = Jungle;
        let mut board = rules.empty_board();
        board.place(Pos::new(4, 0), red(Animal::Lion));
        board.place(Pos::new(2, 1), red(Animal::Tiger));
        assert!(rules.is_legal(&board, Side::First, Pos::new(4, 0), Pos::new(4, 3)));
        // Vertical leap spans all three water rows
        assert!(rules.is_legal(&board, Side::First, Pos::new(2, 1), Pos::new(6, 1)));
        assert!(!rules.is_legal(&board, Side::First, Pos::new(2, 1), Pos::new(5, 1)));

        board.place(Pos::new(4, 2), blue(Animal::Rat));
        assert!(!rules.is_legal(&board, Side::First, Pos::new(4, 0), Pos::new(4, 3)));
        let targets = rules.targets(&board, Pos::new(4, 0));
        assert!(!targets.contains(&Pos::new(4, 3)));
    }

    #[test]
    fn test_trap_neutralizes_defender() {
        let rules = Jungle;
        let mut board = rules.empty_board();
        board.place(Pos::new(8, 1), red(Animal::Cat));
        board.place(Pos::new(8, 2), blue(Animal::Lion));
        assert!(rules.is_legal(&board, Side::First, Pos::new(8, 1), Pos::new(8, 2)));

        // Outside the trap the lion outranks the cat
        let mut board = rules.empty_board();
        board.place(Pos::new(6, 1), red(Animal::Cat));
        board.place(Pos::new(6, 2), blue(Animal::Lion));
        assert!(!rules.is_legal(&board, Side::First, Pos::new(6, 1), Pos::new(6, 2)));
    }

    #[test]
    fn test_own_trap_does_not_weaken() {
        let rules = Jungle;
        let mut board = rules.empty_board();
        board.place(Pos::new(0, 2), blue(Animal::Lion));
        board.place(Pos::new(0, 1), red(Animal::Cat));
        assert!(!rules.is_legal(&board, Side::First, Pos::new(0, 1), Pos::new(0, 2)));
    }

    #[test]
    fn test_den_reached_wins() {
        let rules = Jungle;
        let mut board = rules.empty_board();
        board.place(Pos::new(1, 3), red(Animal::Dog));
        board.place(Pos::new(8, 0), blue(Animal::Rat));
        assert!(rules.is_legal(&board, Side::First, Pos::new(1, 3), Pos::new(0, 3)));
        board.set(Pos::new(1, 3), None);
        board.place(Pos::new(0, 3), red(Animal::Dog));
        assert_eq!(
            rules.outcome(&board),
            Some(Outcome::win(Side::First, WinType::DenReached))
        );
    }

    #[test]
    fn test_annihilation() {
        let rules = Jungle;
        let mut board = rules.empty_board();
        board.place(Pos::new(4, 3), blue(Animal::Rat));
        assert_eq!(
            rules.outcome(&board),
            Some(Outcome::win(Side::Second, WinType::Annihilation))
        );
    }

    #[test]
    fn test_out_of_bounds_is_illegal() {
        let rules = Jungle;
        let board = rules.setup();
        assert!(!rules.is_legal(&board, Side::First, Pos::new(8, 6), Pos::new(9, 6)));
        assert!(!rules.is_legal(&board, Side::First, Pos::new(20, 20), Pos::new(8, 6)));
    }
}
