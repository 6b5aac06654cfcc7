//! Fixed-size grid of pieces

use super::{decode_cell, encode_cell, Piece, PieceKind, Pos, Side};

/// Game board: `rows × cols` cells, each empty or holding one piece
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board<K> {
    rows: u8,
    cols: u8,
    cells: Vec<Option<Piece<K>>>,
}

impl<K: PieceKind> Board<K> {
    pub fn new(rows: u8, cols: u8) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows as usize * cols as usize],
        }
    }

    #[inline]
    pub fn rows(&self) -> u8 {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Check that a position lies on this board
    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Step from `pos` by a signed delta, staying on the board
    #[inline]
    pub fn offset(&self, pos: Pos, dr: i32, dc: i32) -> Option<Pos> {
        pos.offset(dr, dc).filter(|p| self.contains(*p))
    }

    #[inline]
    fn index(&self, pos: Pos) -> usize {
        pos.row as usize * self.cols as usize + pos.col as usize
    }

    /// Piece at position. Out-of-bounds positions read as empty.
    #[inline]
    pub fn get(&self, pos: Pos) -> Option<Piece<K>> {
        if !self.contains(pos) {
            return None;
        }
        self.cells[self.index(pos)]
    }

    /// Overwrite a cell. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, pos: Pos, cell: Option<Piece<K>>) {
        if self.contains(pos) {
            let idx = self.index(pos);
            self.cells[idx] = cell;
        }
    }

    /// Place a piece (overwrites)
    #[inline]
    pub fn place(&mut self, pos: Pos, piece: Piece<K>) {
        self.set(pos, Some(piece));
    }

    /// Remove and return the piece at position
    #[inline]
    pub fn remove(&mut self, pos: Pos) -> Option<Piece<K>> {
        if !self.contains(pos) {
            return None;
        }
        let idx = self.index(pos);
        self.cells[idx].take()
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.get(pos).is_none()
    }

    /// True if `pos` holds a piece owned by `side`
    #[inline]
    pub fn is_side(&self, pos: Pos, side: Side) -> bool {
        self.get(pos).is_some_and(|p| p.side == side)
    }

    /// Every position, row-major
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        let cols = self.cols;
        (0..self.rows).flat_map(move |r| (0..cols).map(move |c| Pos::new(r, c)))
    }

    /// Every occupied cell, row-major
    pub fn pieces(&self) -> impl Iterator<Item = (Pos, Piece<K>)> + '_ {
        self.positions()
            .filter_map(move |pos| self.get(pos).map(|piece| (pos, piece)))
    }

    /// Occupied cells of one side, row-major
    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = (Pos, Piece<K>)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.side == side)
    }

    /// Total pieces on board
    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// True when no cell is empty
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// Check if board has no pieces
    pub fn is_board_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_none())
    }

    /// First position holding exactly this piece
    pub fn find(&self, piece: Piece<K>) -> Option<Pos> {
        self.pieces().find(|(_, p)| *p == piece).map(|(pos, _)| pos)
    }

    /// Number of occupied cells strictly between two positions on the same
    /// row, column or diagonal. `None` when they are not aligned.
    pub fn count_between(&self, from: Pos, to: Pos) -> Option<usize> {
        let dr = to.row as i32 - from.row as i32;
        let dc = to.col as i32 - from.col as i32;
        if (dr == 0 && dc == 0) || (dr != 0 && dc != 0 && dr.abs() != dc.abs()) {
            return None;
        }
        let (sr, sc) = (dr.signum(), dc.signum());
        let steps = dr.abs().max(dc.abs());
        let count = (1..steps)
            .filter_map(|i| from.offset(sr * i, sc * i))
            .filter(|p| !self.is_empty(*p))
            .count();
        Some(count)
    }

    /// Grid of integer codes, for renderers and snapshots
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        (0..self.rows)
            .map(|r| {
                (0..self.cols)
                    .map(|c| encode_cell(self.get(Pos::new(r, c))))
                    .collect()
            })
            .collect()
    }

    /// Build a board from a code grid. The grid must be exactly
    /// `rows × cols`; the error names the first bad value.
    pub fn from_codes(rows: u8, cols: u8, codes: &[Vec<u8>]) -> Result<Self, String> {
        if codes.len() != rows as usize {
            return Err(format!("expected {} rows, found {}", rows, codes.len()));
        }
        let mut board = Self::new(rows, cols);
        for (r, line) in codes.iter().enumerate() {
            if line.len() != cols as usize {
                return Err(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    line.len(),
                    cols
                ));
            }
            for (c, &code) in line.iter().enumerate() {
                let cell = decode_cell::<K>(code)
                    .map_err(|bad| format!("invalid piece code {} at ({}, {})", bad, r, c))?;
                board.set(Pos::new(r as u8, c as u8), cell);
            }
        }
        Ok(board)
    }
}
