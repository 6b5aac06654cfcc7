//! Search and move generation benchmarks
//!
//! Performance benchmarks for the rule engines and the shared alpha-beta
//! search using Criterion.

use boardgames::board::Side;
use boardgames::engine::{AIEngine, EngineConfig};
use boardgames::rules::{Chess, Deployment, Gomoku, Jungle, Military, Rules, Xiangqi};
use boardgames::search::Searcher;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Position a few random plies into the game, so the benches do not only
/// measure the opening
fn midgame<R: Rules>(rules: &R, plies: usize) -> boardgames::Board<R::Kind> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut board = rules.setup();
    let mut side = Side::First;
    for _ in 0..plies {
        let moves = rules.legal_moves(&board, side);
        if moves.is_empty() || rules.outcome(&board).is_some() {
            break;
        }
        let mv = moves[rng.random_range(0..moves.len())];
        if rules.apply(&mut board, side, mv).is_none() {
            break;
        }
        side = side.opponent();
    }
    board
}

fn bench_search<R: Rules>(c: &mut Criterion, rules: R, depth: u8) {
    let mut board = rules.setup();
    c.bench_function(&format!("search/{}/setup/depth{}", R::NAME, depth), |b| {
        b.iter(|| {
            let result = Searcher::new(&rules).search(&mut board, Side::First, depth);
            black_box(result.score)
        })
    });
}

fn bench_move_generation<R: Rules>(c: &mut Criterion, rules: R) {
    let board = midgame(&rules, 10);
    c.bench_function(&format!("legal_moves/{}", R::NAME), |b| {
        b.iter(|| {
            let first = rules.legal_moves(&board, Side::First);
            let second = rules.legal_moves(&board, Side::Second);
            black_box((first.len(), second.len()))
        })
    });
}

fn bench_evaluate<R: Rules>(c: &mut Criterion, rules: R) {
    let board = midgame(&rules, 10);
    c.bench_function(&format!("evaluate/{}", R::NAME), |b| {
        b.iter(|| black_box(rules.evaluate(&board)))
    });
}

fn bench_searches(c: &mut Criterion) {
    bench_search(c, Jungle::new(), 3);
    bench_search(c, Chess::new(), 3);
    bench_search(c, Xiangqi::new(), 3);
    bench_search(c, Gomoku::new(), 3);
    bench_search(c, Military::new(), 2);
}

fn bench_generation(c: &mut Criterion) {
    bench_move_generation(c, Jungle::new());
    bench_move_generation(c, Chess::new());
    bench_move_generation(c, Xiangqi::new());
    bench_move_generation(c, Gomoku::new());
    bench_move_generation(c, Military::with_deployment(Deployment::Shuffled { seed: 1 }));
}

fn bench_evaluation(c: &mut Criterion) {
    bench_evaluate(c, Jungle::new());
    bench_evaluate(c, Chess::new());
    bench_evaluate(c, Xiangqi::new());
    bench_evaluate(c, Gomoku::new());
    bench_evaluate(c, Military::new());
}

fn bench_engine_midgame(c: &mut Criterion) {
    let rules = Xiangqi::new();
    let board = midgame(&rules, 12);
    let engine = AIEngine::with_config(EngineConfig {
        depth: Some(3),
        reply_delay_ms: 0,
    });
    c.bench_function("engine/xiangqi/midgame", |b| {
        b.iter(|| black_box(engine.get_move(&rules, &board, Side::First)))
    });
}

criterion_group!(
    benches,
    bench_searches,
    bench_generation,
    bench_evaluation,
    bench_engine_midgame,
);
criterion_main!(benches);
