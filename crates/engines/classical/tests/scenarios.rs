//! End-to-end searches through the `Engine` trait.

use std::collections::BTreeSet;

use chess_core::{Engine, Outcome, Position, SearchLimits, STARTPOS_FEN};
use classical_engine::{mate_in_moves, ClassicalEngine, EngineConfig, SearchSettings};

fn engine(threads: usize) -> ClassicalEngine {
    ClassicalEngine::new(EngineConfig {
        threads,
        tt_capacity: 1 << 18,
        ..EngineConfig::default()
    })
    .unwrap()
}

#[test]
fn start_position_depth_one() {
    let mut engine = engine(4);
    let pos = Position::from_fen(STARTPOS_FEN).unwrap();
    let result = engine.search(&pos, SearchLimits::depth(1));

    assert!(result.score >= 0, "score {}", result.score);
    // Depth counts the engine's own move: one ply, nothing after it
    assert_eq!(result.depth, 1);
    assert_eq!(result.pv.len(), 1);
    let legal = pos.legal_moves();
    assert_eq!(legal.len(), 20);
    assert!(legal.contains(&result.best_move.unwrap()));
}

#[test]
fn queen_endgame_stays_winning() {
    let mut engine = engine(4);
    let mut pos = Position::from_fen("4k3/8/6K1/8/3Q4/8/8/8 w - - 0 1").unwrap();

    // Play a few moves for both sides; White must never stalemate.
    for _ in 0..6 {
        let result = engine.search(&pos, SearchLimits::depth(3));
        let Some(mv) = result.best_move else {
            break;
        };
        assert!(result.score > 800, "score dropped to {}", result.score);
        pos.make_move(mv);
        assert!(
            !matches!(pos.outcome(), Outcome::Draw(_)),
            "drawn after {}",
            pos.fen()
        );
    }
}

#[test]
fn mate_distances_are_reported() {
    let mut engine = engine(2);
    let one = engine.search(
        &Position::from_fen("6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1").unwrap(),
        SearchLimits::depth(3),
    );
    engine.new_game();
    let two = engine.search(
        &Position::from_fen("k7/8/2K5/8/8/8/8/7R w - - 0 1").unwrap(),
        SearchLimits::depth(3),
    );

    assert_eq!(mate_in_moves(one.score), Some(1));
    assert_eq!(mate_in_moves(two.score), Some(2));
    assert!(one.score > two.score);

    // A mate in n needs 2n - 1 plies counting the mating side's first move
    engine.new_game();
    let shallow_one = engine.search(
        &Position::from_fen("6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1").unwrap(),
        SearchLimits::depth(1),
    );
    assert_eq!(mate_in_moves(shallow_one.score), Some(1));

    engine.new_game();
    let too_shallow = engine.search(
        &Position::from_fen("k7/8/2K5/8/8/8/8/7R w - - 0 1").unwrap(),
        SearchLimits::depth(2).with_quiescence_depth(0),
    );
    assert_eq!(mate_in_moves(too_shallow.score), None);
}

#[test]
fn repeated_parallel_searches_agree_on_top_moves() {
    let pos = Position::from_fen("4k3/8/8/3q4/4P3/2N5/8/4K3 w - - 0 1").unwrap();
    let mut winners = BTreeSet::new();
    for _ in 0..4 {
        let engine = engine(4);
        let outcome = engine
            .search_root(&pos, &SearchSettings::new(3, 3))
            .unwrap();
        // Both captures of the queen win; the engine may prefer either, but
        // never something else.
        assert!(outcome.score > 500);
        winners.insert(outcome.best_move.to_string());
    }
    assert!(winners.iter().all(|m| m == "e4d5" || m == "c3d5"), "{winners:?}");
}
