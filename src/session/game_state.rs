//! Game session: turn order, selection, history and the engine opponent
//!
//! A `GameState` owns one game's rules, board and history. The renderer
//! drives it with grid clicks through [`GameState::select`] (or whole moves
//! through [`GameState::try_move`]) and reads [`GameState::view`] back.
//!
//! In human-vs-engine mode a human move schedules the engine reply. The
//! collaborator's event loop calls [`GameState::poll_engine`], which plays
//! the reply once the configured delay has passed. Board input is rejected
//! while a reply is pending.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::board::{encode_cell, Board, Move, Pos, Side};
use crate::engine::{AIEngine, EngineConfig, MoveResult};
use crate::error::{GameError, GameResult};
use crate::rules::{Outcome, Rules, UndoInfo, WinType};

/// Game mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameMode {
    /// Two humans at one board
    HumanVsHuman,
    /// Human against the engine
    HumanVsEngine { human: Side },
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::HumanVsEngine { human: Side::First }
    }
}

/// Selection state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingSelection,
    PieceSelected(Pos),
    GameOver,
}

/// One played move with everything needed to take it back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry<K> {
    pub side: Side,
    pub mv: Move,
    pub undo: UndoInfo<K>,
}

/// What a played move did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    pub side: Side,
    pub mv: Move,
    /// Code of the piece that stood on the destination, 0 if it was empty
    pub captured: u8,
    /// A king, general or flag was taken
    pub terminal_capture: bool,
    /// Set when this move ended the game
    pub outcome: Option<Outcome>,
}

/// Result of a grid click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    /// An own piece is now selected
    Selected(Pos),
    /// A move was played
    Moved(MoveReport),
    /// Click on a cell that neither selects nor moves
    Ignored,
}

/// Render-ready snapshot of the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Piece codes, row-major
    pub board: Vec<Vec<u8>>,
    pub side_to_move: Side,
    pub game_over: bool,
    pub winner: Option<Side>,
    pub selection: Option<Pos>,
    pub last_move: Option<Move>,
}

/// Main game state
pub struct GameState<R: Rules> {
    pub(super) rules: R,
    pub(super) engine: AIEngine,
    pub(super) board: Board<R::Kind>,
    pub(super) side_to_move: Side,
    pub(super) phase: Phase,
    pub(super) mode: GameMode,
    pub(super) history: Vec<HistoryEntry<R::Kind>>,
    pub(super) outcome: Option<Outcome>,
    pub(super) pending_reply: Option<Instant>,
    pub(super) last_engine_result: Option<MoveResult>,
}

impl<R: Rules> GameState<R> {
    /// New game from the standard setup with default engine settings
    pub fn new(rules: R, mode: GameMode) -> Self {
        Self::with_engine(rules, mode, EngineConfig::default())
    }

    pub fn with_engine(rules: R, mode: GameMode, config: EngineConfig) -> Self {
        let board = rules.setup();
        Self::with_position(rules, mode, config, board, Side::First)
    }

    /// Start from an arbitrary position with an empty history
    pub fn with_position(
        rules: R,
        mode: GameMode,
        config: EngineConfig,
        board: Board<R::Kind>,
        side_to_move: Side,
    ) -> Self {
        let mut state = Self {
            rules,
            engine: AIEngine::with_config(config),
            board,
            side_to_move,
            phase: Phase::AwaitingSelection,
            mode,
            history: Vec::new(),
            outcome: None,
            pending_reply: None,
            last_engine_result: None,
        };
        state.outcome = state.position_outcome();
        if state.outcome.is_some() {
            state.phase = Phase::GameOver;
        }
        state.schedule_reply();
        info!(game = R::NAME, ?mode, "game started");
        state
    }

    /// Start a new game in the same mode
    pub fn reset(&mut self) {
        self.board = self.rules.setup();
        self.side_to_move = Side::First;
        self.phase = Phase::AwaitingSelection;
        self.history.clear();
        self.outcome = None;
        self.pending_reply = None;
        self.last_engine_result = None;
        self.schedule_reply();
        info!(game = R::NAME, mode = ?self.mode, "game reset");
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn board(&self) -> &Board<R::Kind> {
        &self.board
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn history(&self) -> &[HistoryEntry<R::Kind>] {
        &self.history
    }

    pub fn engine(&self) -> &AIEngine {
        &self.engine
    }

    pub fn last_engine_result(&self) -> Option<&MoveResult> {
        self.last_engine_result.as_ref()
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Check if it's a human's turn
    pub fn is_human_turn(&self) -> bool {
        match self.mode {
            GameMode::HumanVsEngine { human } => self.side_to_move == human,
            GameMode::HumanVsHuman => true,
        }
    }

    /// Check if it's the engine's turn
    pub fn is_engine_turn(&self) -> bool {
        !self.is_human_turn()
    }

    /// An engine reply is scheduled but not yet played
    pub fn is_reply_pending(&self) -> bool {
        self.pending_reply.is_some()
    }

    fn ensure_human_input(&self) -> GameResult<()> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if self.is_reply_pending() {
            return Err(GameError::EnginePending);
        }
        if !self.is_human_turn() {
            return Err(GameError::NotYourTurn {
                side: self.side_to_move,
            });
        }
        Ok(())
    }

    /// Handle a click on a grid cell
    pub fn select(&mut self, pos: Pos) -> GameResult<SelectionEvent> {
        self.ensure_human_input()?;
        if !self.board.contains(pos) {
            return Err(GameError::OutOfBounds { pos });
        }

        if R::PLACEMENT {
            return self.try_move(Move::place(pos)).map(SelectionEvent::Moved);
        }

        if self.board.is_side(pos, self.side_to_move) {
            self.phase = Phase::PieceSelected(pos);
            debug!(game = R::NAME, %pos, "piece selected");
            return Ok(SelectionEvent::Selected(pos));
        }

        match self.phase {
            Phase::PieceSelected(from) => self
                .try_move(Move::new(from, pos))
                .map(SelectionEvent::Moved),
            _ => Ok(SelectionEvent::Ignored),
        }
    }

    /// Play a whole move for the side to move. On error nothing changes.
    pub fn try_move(&mut self, mv: Move) -> GameResult<MoveReport> {
        self.ensure_human_input()?;
        for pos in [mv.from, mv.to] {
            if !self.board.contains(pos) {
                return Err(GameError::OutOfBounds { pos });
            }
        }
        if !self.rules.is_legal_move(&self.board, self.side_to_move, mv) {
            debug!(game = R::NAME, from = %mv.from, to = %mv.to, "illegal move rejected");
            return Err(GameError::InvalidMove {
                from: mv.from,
                to: mv.to,
            });
        }
        self.play(mv)
    }

    /// Apply a legal move for the side to move and settle the result
    fn play(&mut self, mv: Move) -> GameResult<MoveReport> {
        let side = self.side_to_move;
        let undo = self
            .rules
            .apply(&mut self.board, side, mv)
            .ok_or(GameError::InvalidMove {
                from: mv.from,
                to: mv.to,
            })?;
        self.history.push(HistoryEntry { side, mv, undo });
        self.phase = Phase::AwaitingSelection;

        let terminal_capture = undo
            .captured
            .is_some_and(|p| p.side != side && self.rules.is_terminal_piece(p.kind));

        let outcome = if terminal_capture {
            Some(Outcome::win(side, WinType::TerminalCapture))
        } else {
            self.rules
                .outcome(&self.board)
                .or_else(|| self.stuck_outcome(side.opponent()))
        };

        match outcome {
            Some(outcome) => self.finish(outcome),
            None => {
                self.side_to_move = side.opponent();
                self.schedule_reply();
            }
        }

        Ok(MoveReport {
            side,
            mv,
            captured: encode_cell(undo.captured),
            terminal_capture,
            outcome,
        })
    }

    /// Loss for `side` when it has no legal move left
    fn stuck_outcome(&self, side: Side) -> Option<Outcome> {
        self.rules
            .legal_moves(&self.board, side)
            .is_empty()
            .then(|| Outcome::win(side.opponent(), WinType::NoLegalMoves))
    }

    /// Outcome of the position as it stands, with `side_to_move` to play
    pub(super) fn position_outcome(&self) -> Option<Outcome> {
        self.rules
            .outcome(&self.board)
            .or_else(|| self.stuck_outcome(self.side_to_move))
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        self.phase = Phase::GameOver;
        self.pending_reply = None;
        info!(
            game = R::NAME,
            winner = ?outcome.winner,
            win_type = ?outcome.win_type,
            moves = self.history.len(),
            "game over"
        );
    }

    /// Mark the engine reply as due if the engine is to move
    pub(super) fn schedule_reply(&mut self) {
        self.pending_reply = (!self.is_over() && self.is_engine_turn()).then(Instant::now);
    }

    /// Play the engine reply now, ignoring the delay
    pub fn engine_reply(&mut self) -> GameResult<MoveReport> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if !self.is_engine_turn() {
            return Err(GameError::NotYourTurn {
                side: self.side_to_move,
            });
        }
        self.pending_reply = None;

        let side = self.side_to_move;
        let result = self
            .engine
            .get_move_with_stats(&self.rules, &self.board, side);
        let best_move = result.best_move;
        self.last_engine_result = Some(result);

        match best_move {
            Some(mv) => self.play(mv),
            None => {
                self.finish(Outcome::win(side.opponent(), WinType::NoLegalMoves));
                Err(GameError::NoLegalMoves { side })
            }
        }
    }

    /// Play the pending engine reply once its delay has elapsed
    pub fn poll_engine(&mut self) -> GameResult<Option<MoveReport>> {
        let Some(since) = self.pending_reply else {
            return Ok(None);
        };
        let delay = Duration::from_millis(self.engine.config().reply_delay_ms);
        if since.elapsed() < delay {
            return Ok(None);
        }
        self.engine_reply().map(Some)
    }

    /// Suggest a move for the side to move without playing it
    pub fn hint(&self) -> GameResult<Option<Move>> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if self.is_reply_pending() {
            return Err(GameError::EnginePending);
        }
        Ok(self
            .engine
            .get_move(&self.rules, &self.board, self.side_to_move))
    }

    /// Legal destinations for the piece on `from`, for move markers
    pub fn legal_targets(&self, from: Pos) -> Vec<Pos> {
        if self.is_over() {
            return Vec::new();
        }
        self.rules
            .targets(&self.board, from)
            .into_iter()
            .filter(|to| {
                self.rules
                    .is_legal(&self.board, self.side_to_move, from, *to)
            })
            .collect()
    }

    /// Take back moves until a human is to move again.
    ///
    /// Against the engine this removes the engine's reply (if it was played)
    /// together with the human move before it. A scheduled reply is
    /// cancelled and a game ended by a move is reopened. Returns the number
    /// of moves removed.
    pub fn undo(&mut self) -> GameResult<usize> {
        if self
            .outcome
            .is_some_and(|o| o.win_type == WinType::Surrender)
        {
            return Err(GameError::GameOver);
        }

        let count = match self.mode {
            GameMode::HumanVsHuman => usize::from(!self.history.is_empty()),
            GameMode::HumanVsEngine { human } => self
                .history
                .iter()
                .rposition(|entry| entry.side == human)
                .map_or(0, |i| self.history.len() - i),
        };
        if count == 0 {
            return Err(GameError::NothingToUndo);
        }

        for _ in 0..count {
            let Some(entry) = self.history.pop() else {
                break;
            };
            self.rules.undo(&mut self.board, entry.mv, &entry.undo);
            self.side_to_move = entry.side;
        }

        self.pending_reply = None;
        self.outcome = None;
        self.phase = Phase::AwaitingSelection;
        debug!(game = R::NAME, count, "moves undone");
        Ok(count)
    }

    /// Concede the game. Against the engine the human concedes; between
    /// humans the side to move does.
    pub fn surrender(&mut self) -> GameResult<Outcome> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let loser = match self.mode {
            GameMode::HumanVsEngine { human } => human,
            GameMode::HumanVsHuman => self.side_to_move,
        };
        let outcome = Outcome::win(loser.opponent(), WinType::Surrender);
        info!(game = R::NAME, ?loser, "surrender");
        self.finish(outcome);
        Ok(outcome)
    }

    /// Render-ready view of the current state
    pub fn view(&self) -> SessionView {
        SessionView {
            board: self.board.to_codes(),
            side_to_move: self.side_to_move,
            game_over: self.is_over(),
            winner: self.outcome.and_then(|o| o.winner),
            selection: match self.phase {
                Phase::PieceSelected(pos) => Some(pos),
                _ => None,
            },
            last_move: self.history.last().map(|entry| entry.mv),
        }
    }
}
