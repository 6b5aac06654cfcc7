//! Snapshot persistence for game sessions
//!
//! A snapshot stores the board as piece codes, the side to move, the mode,
//! any final outcome and the move history with its restore data, so a
//! restored game can still be taken back move by move.
//!
//! `restore` checks the whole payload before it touches the live session,
//! including that the history unwinds cleanly from the stored board. A
//! rejected snapshot leaves the game exactly as it was.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::board::{decode_cell, encode_cell, Board, Move, Piece, Pos, Side};
use crate::error::{GameError, GameResult};
use crate::rules::{Deployment, Outcome, Rules, UndoInfo};

use super::game_state::{GameMode, GameState, HistoryEntry, Phase};

/// One history entry in persisted form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// Side number, 1 or 2
    pub side: u8,
    pub from: Pos,
    pub to: Pos,
    /// Code of the piece that moved (the new stone for placements)
    pub moved: u8,
    /// Code of the piece that stood on `to`, 0 if empty
    pub captured: u8,
}

/// Persisted session state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Rule set name, e.g. `"chess"`
    pub game: String,
    /// Piece codes, row-major
    pub board: Vec<Vec<u8>>,
    /// Side number, 1 or 2
    pub side_to_move: u8,
    pub mode: GameMode,
    #[serde(default)]
    pub history: Vec<HistoryRecord>,
    #[serde(default)]
    pub outcome: Option<Outcome>,
    /// Arrangement `reset` deals from, for games that have one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<Deployment>,
}

impl Snapshot {
    pub fn to_json(&self) -> GameResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> GameResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn side_from_number(number: u8) -> GameResult<Side> {
    Side::from_number(number).ok_or_else(|| GameError::malformed(format!("invalid side {}", number)))
}

fn decode_record<R: Rules>(
    board: &Board<R::Kind>,
    index: usize,
    record: &HistoryRecord,
) -> GameResult<HistoryEntry<R::Kind>> {
    let side = side_from_number(record.side)?;
    for pos in [record.from, record.to] {
        if !board.contains(pos) {
            return Err(GameError::malformed(format!(
                "history entry {} leaves the board at {}",
                index, pos
            )));
        }
    }
    let moved = Piece::<R::Kind>::from_code(record.moved)
        .filter(|piece| piece.side == side)
        .ok_or_else(|| {
            GameError::malformed(format!(
                "history entry {} has invalid mover code {}",
                index, record.moved
            ))
        })?;
    let captured = decode_cell::<R::Kind>(record.captured).map_err(|code| {
        GameError::malformed(format!(
            "history entry {} has invalid captured code {}",
            index, code
        ))
    })?;
    Ok(HistoryEntry {
        side,
        mv: Move::new(record.from, record.to),
        undo: UndoInfo { moved, captured },
    })
}

/// Unwind `history` on a copy of `board`, newest first. Each entry must have
/// left its landing piece on `to` and an empty `from`, and turns must
/// alternate. An unfinished game must have the other side to move.
fn check_history<R: Rules>(
    rules: &R,
    board: &Board<R::Kind>,
    side_to_move: Side,
    finished: bool,
    history: &[HistoryEntry<R::Kind>],
) -> GameResult<()> {
    if let Some(last) = history.last() {
        if !finished && last.side == side_to_move {
            return Err(GameError::malformed(format!(
                "{:?} made the last move and is also to move",
                last.side
            )));
        }
    }

    let mut work = board.clone();
    for (i, entry) in history.iter().enumerate().rev() {
        let mv = entry.mv;
        let shape_ok = if R::PLACEMENT {
            mv.from == mv.to && entry.undo.captured.is_none()
        } else {
            mv.from != mv.to
                && !entry
                    .undo
                    .captured
                    .is_some_and(|piece| piece.side == entry.side)
        };
        if !shape_ok {
            return Err(GameError::malformed(format!(
                "history entry {} is not a possible move",
                i
            )));
        }
        if i > 0 && history[i - 1].side == entry.side {
            return Err(GameError::malformed(format!(
                "history entry {} repeats {:?}",
                i, entry.side
            )));
        }

        let landed = rules.landing(entry.undo.moved, entry.undo.captured, mv.to);
        let vacated = R::PLACEMENT || work.is_empty(mv.from);
        if work.get(mv.to) != landed || !vacated {
            return Err(GameError::malformed(format!(
                "history entry {} does not match the board",
                i
            )));
        }
        rules.undo(&mut work, mv, &entry.undo);
    }
    Ok(())
}

impl<R: Rules> GameState<R> {
    /// Capture the session for persistence
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            game: R::NAME.to_string(),
            board: self.board.to_codes(),
            side_to_move: self.side_to_move.number(),
            mode: self.mode,
            history: self
                .history
                .iter()
                .map(|entry| HistoryRecord {
                    side: entry.side.number(),
                    from: entry.mv.from,
                    to: entry.mv.to,
                    moved: entry.undo.moved.code(),
                    captured: encode_cell(entry.undo.captured),
                })
                .collect(),
            outcome: self.outcome,
            deployment: self.rules.deployment(),
        }
    }

    /// Replace the session with a snapshot. On error nothing changes.
    ///
    /// A stored deployment replaces the session's own, so a later `reset`
    /// deals the restored game's arrangement. Without an outcome on record
    /// the position is judged afresh, including a side to move that is stuck.
    pub fn restore(&mut self, snapshot: &Snapshot) -> GameResult<()> {
        let decoded = self.decode(snapshot);
        let (board, side_to_move, history) = match decoded {
            Ok(parts) => parts,
            Err(err) => {
                warn!(game = R::NAME, error = %err, "snapshot rejected");
                return Err(err);
            }
        };

        if let Some(deployment) = snapshot.deployment {
            self.rules.set_deployment(deployment);
        }
        self.board = board;
        self.side_to_move = side_to_move;
        self.mode = snapshot.mode;
        self.history = history;
        self.outcome = snapshot.outcome.or_else(|| self.position_outcome());
        self.phase = if self.outcome.is_some() {
            Phase::GameOver
        } else {
            Phase::AwaitingSelection
        };
        self.last_engine_result = None;
        self.schedule_reply();

        info!(
            game = R::NAME,
            moves = self.history.len(),
            side_to_move = ?self.side_to_move,
            "snapshot restored"
        );
        Ok(())
    }

    fn decode(
        &self,
        snapshot: &Snapshot,
    ) -> GameResult<(Board<R::Kind>, Side, Vec<HistoryEntry<R::Kind>>)> {
        if snapshot.game != R::NAME {
            return Err(GameError::malformed(format!(
                "snapshot is for {:?}, not {:?}",
                snapshot.game,
                R::NAME
            )));
        }
        if snapshot.deployment.is_some() && self.rules.deployment().is_none() {
            return Err(GameError::malformed(format!(
                "{} has no deployment to restore",
                R::NAME
            )));
        }
        let board = Board::<R::Kind>::from_codes(R::ROWS, R::COLS, &snapshot.board)
            .map_err(GameError::malformed)?;
        let side_to_move = side_from_number(snapshot.side_to_move)?;
        let history = snapshot
            .history
            .iter()
            .enumerate()
            .map(|(i, record)| decode_record::<R>(&board, i, record))
            .collect::<GameResult<Vec<_>>>()?;
        let finished = snapshot.outcome.is_some() || self.rules.outcome(&board).is_some();
        check_history(&self.rules, &board, side_to_move, finished, &history)?;
        Ok((board, side_to_move, history))
    }

    /// Snapshot as JSON
    pub fn save_json(&self) -> GameResult<String> {
        self.snapshot().to_json()
    }

    /// Restore from JSON produced by [`GameState::save_json`]
    pub fn load_json(&mut self, json: &str) -> GameResult<()> {
        let snapshot = match Snapshot::from_json(json) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(game = R::NAME, error = %err, "snapshot rejected");
                return Err(err);
            }
        };
        self.restore(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::rules::chess::ChessPiece;
    use crate::rules::military::Rank;
    use crate::rules::{Chess, Gomoku, Jungle, Military, WinType};

    fn played_chess() -> GameState<Chess> {
        let mut game = GameState::new(Chess, GameMode::HumanVsHuman);
        let moves = [
            ((6, 4), (4, 4)),
            ((1, 3), (3, 3)),
            ((4, 4), (3, 3)),
        ];
        for ((fr, fc), (tr, tc)) in moves {
            game.try_move(Move::new(Pos::new(fr, fc), Pos::new(tr, tc)))
                .unwrap();
        }
        game
    }

    #[test]
    fn test_round_trip_keeps_undo() {
        let game = played_chess();
        let json = game.save_json().unwrap();
        assert!(json.contains("\"sideToMove\": 2"));

        let mut restored = GameState::new(Chess, GameMode::HumanVsHuman);
        restored.load_json(&json).unwrap();
        assert_eq!(restored.view(), game.view());
        assert_eq!(restored.history(), game.history());

        // The capture comes back with its victim
        restored.undo().unwrap();
        assert_eq!(
            restored.board().get(Pos::new(3, 3)),
            Some(Piece::new(Side::Second, ChessPiece::Pawn))
        );
        restored.undo().unwrap();
        restored.undo().unwrap();
        assert_eq!(restored.board(), &Chess.setup());
    }

    #[test]
    fn test_round_trip_shuffled_military() {
        let rules = Military::with_deployment(Deployment::Shuffled { seed: 7 });
        let game = GameState::new(rules, GameMode::HumanVsHuman);
        let snapshot = game.snapshot();

        let mut restored = GameState::new(Military::new(), GameMode::HumanVsHuman);
        restored.restore(&snapshot).unwrap();
        assert_eq!(restored.board(), game.board());
        assert_eq!(restored.snapshot(), snapshot);

        // A new game deals the restored arrangement, not the host's
        restored.reset();
        assert_eq!(restored.board(), &rules.setup());
        assert_eq!(
            restored.rules().deployment(),
            Some(Deployment::Shuffled { seed: 7 })
        );
    }

    #[test]
    fn test_deployment_only_for_games_that_have_one() {
        let mut snapshot = GameState::new(Chess, GameMode::HumanVsHuman).snapshot();
        assert_eq!(snapshot.deployment, None);
        snapshot.deployment = Some(Deployment::Standard);

        let mut game = GameState::new(Chess, GameMode::HumanVsHuman);
        let err = game.restore(&snapshot).unwrap_err();
        assert!(matches!(err, GameError::MalformedSnapshot { .. }));
    }

    #[test]
    fn test_restore_stuck_side_is_game_over() {
        let mut board = Military::new().empty_board();
        board.place(Pos::new(11, 1), Piece::new(Side::First, Rank::Flag));
        board.place(Pos::new(11, 0), Piece::new(Side::First, Rank::Landmine));
        board.place(Pos::new(0, 1), Piece::new(Side::Second, Rank::Flag));
        board.place(Pos::new(5, 2), Piece::new(Side::Second, Rank::Captain));
        let mut snapshot = GameState::new(Military::new(), GameMode::HumanVsHuman).snapshot();
        snapshot.board = board.to_codes();

        let mut game = GameState::new(Military::new(), GameMode::HumanVsHuman);
        game.restore(&snapshot).unwrap();
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(
            game.outcome(),
            Some(Outcome::win(Side::Second, WinType::NoLegalMoves))
        );
    }

    #[test]
    fn test_restore_schedules_engine_reply() {
        let config = EngineConfig {
            depth: Some(1),
            reply_delay_ms: 0,
        };
        let mut game = GameState::with_engine(Jungle, GameMode::HumanVsHuman, config);
        game.try_move(Move::new(Pos::new(6, 0), Pos::new(5, 0))).unwrap();

        let mut snapshot = game.snapshot();
        snapshot.mode = GameMode::HumanVsEngine { human: Side::First };
        game.restore(&snapshot).unwrap();
        assert!(game.is_reply_pending());
        assert!(game.poll_engine().unwrap().is_some());
    }

    #[test]
    fn test_finished_game_stays_finished() {
        let mut game = played_chess();
        game.surrender().unwrap();
        let snapshot = game.snapshot();

        let mut restored = GameState::new(Chess, GameMode::HumanVsHuman);
        restored.restore(&snapshot).unwrap();
        assert_eq!(restored.phase(), Phase::GameOver);
        assert_eq!(
            restored.outcome().map(|o| o.win_type),
            Some(WinType::Surrender)
        );
        assert!(matches!(restored.undo(), Err(GameError::GameOver)));
    }

    #[test]
    fn test_malformed_snapshots_leave_state_untouched() {
        let mut game = played_chess();
        let good = game.snapshot();
        let before = game.view();

        let mut wrong_game = good.clone();
        wrong_game.game = "xiangqi".to_string();

        let mut bad_code = good.clone();
        bad_code.board[0][0] = 13;

        let mut short_row = good.clone();
        short_row.board[4].pop();

        let mut missing_row = good.clone();
        missing_row.board.pop();

        let mut bad_side = good.clone();
        bad_side.side_to_move = 3;

        let mut bad_history = good.clone();
        bad_history.history[0].moved = 7;

        let mut off_board = good.clone();
        off_board.history[1].to = Pos::new(8, 0);

        for snapshot in [
            wrong_game,
            bad_code,
            short_row,
            missing_row,
            bad_side,
            bad_history,
            off_board,
        ] {
            let err = game.restore(&snapshot).unwrap_err();
            assert!(matches!(err, GameError::MalformedSnapshot { .. }), "{}", err);
            assert_eq!(game.view(), before);
            assert_eq!(game.history().len(), 3);
        }
    }

    #[test]
    fn test_history_must_match_board() {
        let mut game = GameState::new(Chess, GameMode::HumanVsHuman);
        let setup = game.snapshot();

        // A queen that never reached e4, over an untouched starting board
        let mut phantom = setup.clone();
        phantom.side_to_move = 2;
        phantom.history.push(HistoryRecord {
            side: 1,
            from: Pos::new(6, 4),
            to: Pos::new(4, 4),
            moved: Piece::new(Side::First, ChessPiece::Queen).code(),
            captured: 0,
        });

        // Two white moves in a row
        let played = played_chess().snapshot();
        let mut repeated = played.clone();
        repeated.history[1].side = 1;
        repeated.history[1].moved = Piece::new(Side::First, ChessPiece::Pawn).code();

        // White made the last move but is also to move
        let mut wrong_turn = played.clone();
        wrong_turn.side_to_move = 1;

        // Capturing a piece of one's own side
        let mut own_capture = played;
        own_capture.history[2].captured = Piece::new(Side::First, ChessPiece::Pawn).code();

        for snapshot in [phantom, repeated, wrong_turn, own_capture] {
            let err = game.restore(&snapshot).unwrap_err();
            assert!(matches!(err, GameError::MalformedSnapshot { .. }), "{}", err);
            assert!(game.history().is_empty());
            assert_eq!(game.board(), &Chess.setup());
        }
        assert!(matches!(game.undo(), Err(GameError::NothingToUndo)));
    }

    #[test]
    fn test_placement_history_must_match_board() {
        let mut game = GameState::new(Gomoku, GameMode::HumanVsHuman);
        game.try_move(Move::place(Pos::new(7, 7))).unwrap();
        game.try_move(Move::place(Pos::new(7, 8))).unwrap();
        let good = game.snapshot();

        let mut moved_stone = good.clone();
        moved_stone.history[0].to = Pos::new(0, 0);

        let mut sliding = good.clone();
        sliding.history[1].from = Pos::new(0, 0);

        let mut captured = good;
        captured.history[1].captured = 1;

        for snapshot in [moved_stone, sliding, captured] {
            let err = game.restore(&snapshot).unwrap_err();
            assert!(matches!(err, GameError::MalformedSnapshot { .. }), "{}", err);
            assert_eq!(game.history().len(), 2);
        }
    }

    #[test]
    fn test_invalid_json() {
        let mut game = GameState::new(Gomoku, GameMode::HumanVsHuman);
        game.try_move(Move::place(Pos::new(7, 7))).unwrap();
        let err = game.load_json("{\"game\": \"gomoku\"").unwrap_err();
        assert!(matches!(err, GameError::Serialization(_)));
        assert_eq!(game.history().len(), 1);

        // Missing required fields
        let err = game.load_json(r#"{"game": "gomoku"}"#).unwrap_err();
        assert!(matches!(err, GameError::Serialization(_)));
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut game = GameState::new(Gomoku, GameMode::HumanVsEngine { human: Side::First });
        game.try_move(Move::place(Pos::new(7, 7))).unwrap();
        let value: serde_json::Value = serde_json::to_value(game.snapshot()).unwrap();

        assert_eq!(value["game"], "gomoku");
        assert_eq!(value["board"][7][7], 1);
        assert_eq!(value["sideToMove"], 2);
        assert_eq!(value["mode"]["humanVsEngine"]["human"], "First");
        assert_eq!(value["history"][0]["from"]["row"], 7);
        assert_eq!(value["history"][0]["moved"], 1);
        assert_eq!(value["history"][0]["captured"], 0);
    }
}
