//! Game rules for the five supported games
//!
//! Every game implements [`Rules`]: a legality predicate, move enumeration
//! derived from that same predicate, move application with exact undo,
//! terminal detection and a static evaluation. The search engine and the
//! game session only ever talk to a game through this trait.
//!
//! - [`jungle`]: animal chess on a 9x7 board with rivers, traps and dens
//! - [`chess`]: international chess without check rules (king capture ends the game)
//! - [`xiangqi`]: Chinese chess with palaces, river and cannon screens
//! - [`gomoku`]: five in a row on a 15x15 board
//! - [`military`]: Luzhanqi-style military chess with camps and railways

pub mod chess;
pub mod executor;
pub mod gomoku;
pub mod jungle;
pub mod military;
pub mod xiangqi;

// Re-exports for convenient access
pub use chess::Chess;
pub use executor::UndoInfo;
pub use gomoku::Gomoku;
pub use jungle::Jungle;
pub use military::{Deployment, Military};
pub use xiangqi::Xiangqi;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Move, Piece, PieceKind, Pos, Side};
use crate::search::ordering::order_by_capture;

/// How a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinType {
    /// King, general or flag captured
    TerminalCapture,
    /// A piece entered the opponent's den
    DenReached,
    /// The opponent has no pieces left
    Annihilation,
    /// Five or more stones in a line
    FiveInRow,
    /// Board filled without a winner
    BoardFull,
    /// The side to move had no legal reply
    NoLegalMoves,
    Surrender,
}

/// Game result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    /// `None` on a draw
    pub winner: Option<Side>,
    pub win_type: WinType,
}

impl Outcome {
    #[inline]
    pub fn win(side: Side, win_type: WinType) -> Self {
        Self {
            winner: Some(side),
            win_type,
        }
    }

    #[inline]
    pub fn draw(win_type: WinType) -> Self {
        Self {
            winner: None,
            win_type,
        }
    }
}

/// Rule set of one game variant.
///
/// `legal_moves` is built from `targets` filtered through `is_legal`, so
/// enumeration and single-move validation can never disagree. Implementors
/// that override `targets` only narrow the cells fed to `is_legal`.
pub trait Rules {
    type Kind: PieceKind;

    const NAME: &'static str;
    const ROWS: u8;
    const COLS: u8;
    /// Search depth in plies used when the engine config does not override it
    const DEFAULT_DEPTH: u8;
    /// Placement games drop new pieces (`from == to`) instead of moving them
    const PLACEMENT: bool = false;

    /// Starting position
    fn setup(&self) -> Board<Self::Kind>;

    /// Arrangement `setup` deals from, for games that have more than one
    fn deployment(&self) -> Option<Deployment> {
        None
    }

    /// Switch the arrangement used by later `setup` calls. Ignored by games
    /// without one.
    fn set_deployment(&mut self, _deployment: Deployment) {}

    fn empty_board(&self) -> Board<Self::Kind> {
        Board::new(Self::ROWS, Self::COLS)
    }

    /// Is `from -> to` legal for `side`? Pure; out-of-range positions are illegal.
    fn is_legal(&self, board: &Board<Self::Kind>, side: Side, from: Pos, to: Pos) -> bool;

    /// Candidate destinations for the piece on `from`. Must contain every
    /// legal destination; the default is the whole board.
    fn targets(&self, board: &Board<Self::Kind>, _from: Pos) -> Vec<Pos> {
        board.positions().collect()
    }

    /// Every legal move for `side`, row-major by source then target order
    fn legal_moves(&self, board: &Board<Self::Kind>, side: Side) -> Vec<Move> {
        let mut moves = Vec::new();
        for (from, _) in board.pieces_of(side) {
            for to in self.targets(board, from) {
                if self.is_legal(board, side, from, to) {
                    moves.push(Move::new(from, to));
                }
            }
        }
        moves
    }

    #[inline]
    fn is_legal_move(&self, board: &Board<Self::Kind>, side: Side, mv: Move) -> bool {
        self.is_legal(board, side, mv.from, mv.to)
    }

    /// The piece that travels for this move. Placement games create it.
    fn mover(&self, board: &Board<Self::Kind>, side: Side, mv: Move) -> Option<Piece<Self::Kind>> {
        board.get(mv.from).filter(|p| p.side == side)
    }

    /// Occupant of the destination once `moved` arrives on a cell holding
    /// `captured`. `None` means both pieces were removed.
    fn landing(
        &self,
        moved: Piece<Self::Kind>,
        _captured: Option<Piece<Self::Kind>>,
        _to: Pos,
    ) -> Option<Piece<Self::Kind>> {
        Some(moved)
    }

    /// Apply a move in place; see [`executor::apply`]
    fn apply(
        &self,
        board: &mut Board<Self::Kind>,
        side: Side,
        mv: Move,
    ) -> Option<UndoInfo<Self::Kind>>
    where
        Self: Sized,
    {
        executor::apply(self, board, side, mv)
    }

    /// Exact inverse of [`Rules::apply`]
    fn undo(&self, board: &mut Board<Self::Kind>, mv: Move, undo: &UndoInfo<Self::Kind>) {
        executor::undo(board, mv, undo)
    }

    /// King, general or flag
    fn is_terminal_piece(&self, kind: Self::Kind) -> bool;

    /// Terminal state of the board, if any
    fn outcome(&self, board: &Board<Self::Kind>) -> Option<Outcome>;

    /// Static score; positive favours `Side::First`
    fn evaluate(&self, board: &Board<Self::Kind>) -> i32;

    /// Material value used for capture ordering
    fn piece_value(&self, kind: Self::Kind) -> i32;

    /// Moves the search explores, best candidates first. Must be a subset of
    /// `legal_moves`; the default is all of them ordered by capture value.
    fn search_moves(&self, board: &Board<Self::Kind>, side: Side) -> Vec<Move>
    where
        Self: Sized,
    {
        let mut moves = self.legal_moves(board, side);
        order_by_capture(self, board, &mut moves);
        moves
    }
}

/// Orthogonal unit steps
pub(crate) const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Diagonal unit steps
pub(crate) const DIAGONAL: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Cells reached by sliding from `from` in each direction until the first
/// occupied cell (included) or the edge
pub(crate) fn ray_targets<K: PieceKind>(
    board: &Board<K>,
    from: Pos,
    directions: &[(i32, i32)],
) -> Vec<Pos> {
    let mut targets = Vec::new();
    for &(dr, dc) in directions {
        let mut cur = from;
        while let Some(next) = board.offset(cur, dr, dc) {
            targets.push(next);
            if !board.is_empty(next) {
                break;
            }
            cur = next;
        }
    }
    targets
}

/// Cells at fixed offsets from `from` that lie on the board
pub(crate) fn offset_targets<K: PieceKind>(
    board: &Board<K>,
    from: Pos,
    offsets: &[(i32, i32)],
) -> Vec<Pos> {
    offsets
        .iter()
        .filter_map(|&(dr, dc)| board.offset(from, dr, dc))
        .collect()
}

/// Shared preconditions: both cells on the board, `from` owned by `side`,
/// `to` not owned by `side`
pub(crate) fn basic_checks<K: PieceKind>(board: &Board<K>, side: Side, from: Pos, to: Pos) -> bool {
    board.contains(from)
        && board.contains(to)
        && from != to
        && board.is_side(from, side)
        && !board.is_side(to, side)
}
