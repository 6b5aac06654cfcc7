//! Rule-engine properties checked on seeded random playouts for every game

use std::collections::HashSet;

use boardgames::board::{Board, Move, Side};
use boardgames::engine::EngineConfig;
use boardgames::rules::{Chess, Deployment, Gomoku, Jungle, Military, Rules, Xiangqi};
use boardgames::search::Searcher;
use boardgames::session::{GameMode, GameState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

const SEEDS: [u64; 4] = [1, 7, 42, 1234];

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Random legal game from the setup. Returns every position reached with
/// the side to move there.
fn playout<R: Rules>(rules: &R, seed: u64, max_plies: usize) -> Vec<(Board<R::Kind>, Side)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = rules.setup();
    let mut side = Side::First;
    let mut positions = vec![(board.clone(), side)];

    for _ in 0..max_plies {
        if rules.outcome(&board).is_some() {
            break;
        }
        let moves = rules.legal_moves(&board, side);
        if moves.is_empty() {
            break;
        }
        let mv = moves[rng.random_range(0..moves.len())];
        rules.apply(&mut board, side, mv).unwrap();
        side = side.opponent();
        positions.push((board.clone(), side));
    }
    positions
}

fn check_undo_identity<R: Rules>(rules: &R) {
    for seed in SEEDS {
        for (board, side) in playout(rules, seed, 60) {
            let mut work = board.clone();
            for mv in rules.legal_moves(&board, side) {
                let undo = rules.apply(&mut work, side, mv).unwrap();
                rules.undo(&mut work, mv, &undo);
                assert_eq!(work, board, "{}: undo of {:?} differs", R::NAME, mv);
            }
        }
    }
}

fn check_enumeration_matches_legality<R: Rules>(rules: &R, stride: usize) {
    for seed in SEEDS {
        for (board, _) in playout(rules, seed, 40).into_iter().step_by(stride) {
            for side in [Side::First, Side::Second] {
                let moves = rules.legal_moves(&board, side);
                let set: HashSet<Move> = moves.iter().copied().collect();
                assert_eq!(set.len(), moves.len(), "{}: duplicate moves", R::NAME);

                for from in board.positions() {
                    for to in board.positions() {
                        let mv = Move::new(from, to);
                        assert_eq!(
                            rules.is_legal(&board, side, from, to),
                            set.contains(&mv),
                            "{}: {:?} for {:?}",
                            R::NAME,
                            mv,
                            side
                        );
                    }
                }
            }
        }
    }
}

fn check_search<R: Rules>(rules: &R, depth: u8) {
    for seed in SEEDS {
        for (board, side) in playout(rules, seed, 30).into_iter().step_by(10) {
            if rules.outcome(&board).is_some() {
                continue;
            }
            let legal: HashSet<Move> = rules.legal_moves(&board, side).into_iter().collect();
            assert!(rules
                .search_moves(&board, side)
                .iter()
                .all(|mv| legal.contains(mv)));

            let mut work = board.clone();
            let a = Searcher::new(rules).search(&mut work, side, depth);
            let b = Searcher::new(rules).search(&mut work, side, depth);
            assert_eq!(work, board, "{}: search changed the board", R::NAME);
            assert_eq!(a, b, "{}: search is not deterministic", R::NAME);
            if let Some(mv) = a.best_move {
                assert!(legal.contains(&mv), "{}: illegal search move {:?}", R::NAME, mv);
            } else {
                assert!(legal.is_empty());
            }
        }
    }
}

fn check_snapshot_round_trip<R: Rules + Clone>(rules: R) {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = GameState::with_engine(
            rules.clone(),
            GameMode::HumanVsHuman,
            EngineConfig::default(),
        );
        for _ in 0..20 {
            if game.is_over() {
                break;
            }
            let moves = game.rules().legal_moves(game.board(), game.side_to_move());
            let mv = moves[rng.random_range(0..moves.len())];
            game.try_move(mv).unwrap();
        }

        let json = game.save_json().unwrap();
        let mut restored = GameState::new(rules.clone(), GameMode::HumanVsHuman);
        restored.load_json(&json).unwrap();
        assert_eq!(restored.view(), game.view());
        assert_eq!(restored.history(), game.history());
        assert_eq!(restored.save_json().unwrap(), json);

        // Restored history unwinds to the starting position
        if !restored.is_over() {
            while restored.undo().is_ok() {}
            assert!(restored.history().is_empty());
            assert_eq!(restored.board(), &rules.setup());
        }
    }
}

#[test]
fn test_undo_restores_board() {
    init_tracing();
    check_undo_identity(&Jungle::new());
    check_undo_identity(&Chess::new());
    check_undo_identity(&Xiangqi::new());
    check_undo_identity(&Gomoku::new());
    check_undo_identity(&Military::new());
    check_undo_identity(&Military::with_deployment(Deployment::Shuffled { seed: 99 }));
}

#[test]
fn test_legal_moves_match_is_legal() {
    init_tracing();
    check_enumeration_matches_legality(&Jungle::new(), 5);
    check_enumeration_matches_legality(&Chess::new(), 5);
    check_enumeration_matches_legality(&Xiangqi::new(), 5);
    check_enumeration_matches_legality(&Gomoku::new(), 20);
    check_enumeration_matches_legality(&Military::new(), 5);
    check_enumeration_matches_legality(&Military::with_deployment(Deployment::Shuffled { seed: 3 }), 5);
}

#[test]
fn test_search_is_deterministic_and_legal() {
    init_tracing();
    check_search(&Jungle::new(), 2);
    check_search(&Chess::new(), 2);
    check_search(&Xiangqi::new(), 2);
    check_search(&Gomoku::new(), 2);
    check_search(&Military::new(), 2);
}

#[test]
fn test_snapshot_round_trip() {
    init_tracing();
    check_snapshot_round_trip(Jungle::new());
    check_snapshot_round_trip(Chess::new());
    check_snapshot_round_trip(Xiangqi::new());
    check_snapshot_round_trip(Gomoku::new());
    check_snapshot_round_trip(Military::with_deployment(Deployment::Shuffled { seed: 11 }));
}

#[test]
fn test_engine_self_play_stays_legal() {
    init_tracing();
    let config = EngineConfig {
        depth: Some(1),
        reply_delay_ms: 0,
    };
    let mode = GameMode::HumanVsEngine { human: Side::Second };
    let mut game = GameState::with_engine(Jungle::new(), mode, config);
    let mut rng = StdRng::seed_from_u64(5);

    for _ in 0..30 {
        if game.is_over() {
            break;
        }
        let before = game.board().clone();
        let side = game.side_to_move();
        let report = game.engine_reply().unwrap();
        assert!(game.rules().is_legal_move(&before, side, report.mv));
        if game.is_over() {
            break;
        }
        let moves = game.rules().legal_moves(game.board(), game.side_to_move());
        game.try_move(moves[rng.random_range(0..moves.len())]).unwrap();
    }
}
