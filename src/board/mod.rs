//! Board representation shared by every game

pub mod board;


// Re-exports
pub use board::Board;

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Player sides. `First` moves first and is the maximizing side in search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    First,
    Second,
}

impl Side {
    /// Get opponent side
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    /// Persistence number (1 or 2)
    #[inline]
    pub fn number(self) -> u8 {
        match self {
            Side::First => 1,
            Side::Second => 2,
        }
    }

    #[inline]
    pub fn from_number(number: u8) -> Option<Side> {
        match number {
            1 => Some(Side::First),
            2 => Some(Side::Second),
            _ => None,
        }
    }

    /// +1 for `First`, -1 for `Second`
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Side::First => 1,
            Side::Second => -1,
        }
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Step by a signed delta. Only rejects negative coordinates; the board
    /// checks the upper bounds.
    #[inline]
    pub fn offset(self, dr: i32, dc: i32) -> Option<Pos> {
        let row = self.row as i32 + dr;
        let col = self.col as i32 + dc;
        if row < 0 || col < 0 || row > u8::MAX as i32 || col > u8::MAX as i32 {
            return None;
        }
        Some(Pos::new(row as u8, col as u8))
    }

    /// Manhattan distance
    #[inline]
    pub fn distance(self, other: Pos) -> i32 {
        (self.row as i32 - other.row as i32).abs() + (self.col as i32 - other.col as i32).abs()
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.row, self.col).cmp(&(other.row, other.col))
    }
}

/// A move from one cell to another. Placement games use `from == to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Pos,
    pub to: Pos,
}

impl Move {
    #[inline]
    pub const fn new(from: Pos, to: Pos) -> Self {
        Self { from, to }
    }

    /// Stone placement on a single cell
    #[inline]
    pub const fn place(pos: Pos) -> Self {
        Self { from: pos, to: pos }
    }

    #[inline]
    pub fn is_placement(&self) -> bool {
        self.from == self.to
    }
}

/// Per-game piece kinds.
///
/// `ALL` lists the kinds in index order, so `ALL[i].index() == i + 1`.
pub trait PieceKind: Copy + Eq + Debug + 'static {
    const ALL: &'static [Self];

    /// 1-based index inside the game's numbering
    fn index(self) -> u8;

    fn from_index(index: u8) -> Option<Self> {
        let slot = index.checked_sub(1)?;
        Self::ALL.get(slot as usize).copied()
    }

    /// Number of kinds per side
    #[inline]
    fn count() -> u8 {
        Self::ALL.len() as u8
    }
}

/// A piece: owning side plus kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece<K> {
    pub side: Side,
    pub kind: K,
}

impl<K: PieceKind> Piece<K> {
    #[inline]
    pub const fn new(side: Side, kind: K) -> Self {
        Self { side, kind }
    }

    /// Integer code used at the persistence boundary.
    /// `First` owns `1..=N`, `Second` owns `N+1..=2N`.
    #[inline]
    pub fn code(self) -> u8 {
        match self.side {
            Side::First => self.kind.index(),
            Side::Second => K::count() + self.kind.index(),
        }
    }

    /// Inverse of [`Piece::code`]. `0` and anything above `2N` are rejected.
    pub fn from_code(code: u8) -> Option<Self> {
        let n = K::count();
        let zero_based = code.checked_sub(1)?;
        if zero_based >= n.checked_mul(2)? {
            return None;
        }
        let side = if zero_based < n { Side::First } else { Side::Second };
        let kind = K::from_index(zero_based % n + 1)?;
        Some(Self { side, kind })
    }
}

/// Decode an optional cell code (0 = empty). Unknown codes come back as `Err(code)`.
pub fn decode_cell<K: PieceKind>(code: u8) -> Result<Option<Piece<K>>, u8> {
    if code == 0 {
        return Ok(None);
    }
    Piece::from_code(code).map(Some).ok_or(code)
}

/// Encode an optional cell (empty = 0)
#[inline]
pub fn encode_cell<K: PieceKind>(cell: Option<Piece<K>>) -> u8 {
    cell.map_or(0, Piece::code)
}
