use super::*;
use crate::score::mate_in_moves;
use std::thread;
use std::time::Duration;

fn pos(fen: &str) -> Position {
    Position::from_fen(fen).unwrap()
}

fn run(fen: &str, depth: u8, threads: usize) -> RootOutcome {
    let pool = WorkerPool::new(threads).unwrap();
    let tt = Arc::new(TranspositionTable::new(1 << 16));
    find_best_move(&pos(fen), &SearchSettings::new(depth, 3), &pool, &tt).unwrap()
}

#[test]
fn test_bounds_only_tighten() {
    let bounds = SharedBounds::default();
    assert!(bounds.raise_alpha(10));
    assert!(!bounds.raise_alpha(5));
    assert!(!bounds.raise_alpha(10));
    assert_eq!(bounds.alpha(), 10);

    assert!(bounds.lower_beta(-20));
    assert!(!bounds.lower_beta(0));
    assert_eq!(bounds.beta(), -20);

    assert!(bounds.tighten(Color::White, 30));
    assert!(bounds.tighten(Color::Black, -40));
    assert_eq!((bounds.alpha(), bounds.beta()), (30, -40));
}

#[test]
fn test_concurrent_raises_keep_the_maximum() {
    let bounds = Arc::new(SharedBounds::default());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let bounds = Arc::clone(&bounds);
            thread::spawn(move || {
                for i in 0..1000 {
                    bounds.raise_alpha(t * 1000 + i);
                    bounds.lower_beta(-(t * 1000 + i));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(bounds.alpha(), 7999);
    assert_eq!(bounds.beta(), -7999);
}

#[test]
fn test_no_legal_moves_is_an_error() {
    let pool = WorkerPool::new(2).unwrap();
    let tt = Arc::new(TranspositionTable::new(1024));
    let stalemate = pos("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1");
    let err = find_best_move(&stalemate, &SearchSettings::new(3, 2), &pool, &tt).unwrap_err();
    assert!(matches!(err, SearchError::NoLegalMoves));
}

#[test]
fn test_finds_mate_in_one() {
    let outcome = run("6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1", 3, 4);
    assert_eq!(outcome.best_move, "e1e8".parse::<Move>().unwrap());
    assert_eq!(outcome.score, MAX_SCORE);
    assert_eq!(mate_in_moves(outcome.score), Some(1));
    assert!(!outcome.stopped);
}

#[test]
fn test_black_finds_mate_in_one() {
    let outcome = run("4q1k1/5ppp/8/8/8/8/5PPP/6K1 b - - 0 1", 2, 3);
    assert_eq!(outcome.best_move, "e8e1".parse::<Move>().unwrap());
    assert_eq!(outcome.score, -MAX_SCORE);
    assert_eq!(mate_in_moves(outcome.score), Some(-1));
}

#[test]
fn test_mate_in_two_line_mates() {
    let fen = "k7/8/2K5/8/8/8/8/7R w - - 0 1";
    let outcome = run(fen, 3, 4);
    assert_eq!(mate_in_moves(outcome.score), Some(2));

    let mut p = pos(fen);
    for mv in &outcome.pv {
        assert!(p.is_legal(*mv));
        p.make_move(*mv);
    }
    assert_eq!(
        p.outcome(),
        chess_core::Outcome::Checkmate {
            loser: Color::Black
        }
    );
}

#[test]
fn test_takes_hanging_queen() {
    let outcome = run("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1", 2, 2);
    assert_eq!(outcome.best_move, "e4d5".parse::<Move>().unwrap());
    assert!(outcome.score > 0);
}

#[test]
fn test_reports_every_root_move() {
    let start = Position::startpos();
    let outcome = run(chess_core::STARTPOS_FEN, 2, 4);
    assert_eq!(outcome.root_scores.len(), 20);
    assert!(outcome.root_scores.iter().all(|r| r.completed));
    assert!(outcome.root_scores.iter().all(|r| r.pv[0] == r.mv));
    assert!(start.is_legal(outcome.best_move));
    assert_eq!(outcome.pv[0], outcome.best_move);
    assert!(outcome.best_moves().contains(&outcome.best_move));
    assert!(outcome.stats.nodes > 20);
}

#[test]
fn test_result_seeds_hash_move() {
    let pool = WorkerPool::new(2).unwrap();
    let tt = Arc::new(TranspositionTable::new(1 << 16));
    let p = pos("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1");
    let outcome = find_best_move(&p, &SearchSettings::new(2, 2), &pool, &tt).unwrap();

    let entry = tt.probe(p.key()).unwrap();
    assert_eq!(entry.hash_move(), Some(outcome.best_move));
    assert_eq!(entry.bound, Bound::Exact);
    assert_eq!(entry.depth, 2);
}

#[test]
fn test_expired_deadline_still_returns_a_legal_move() {
    let pool = WorkerPool::new(2).unwrap();
    let tt = Arc::new(TranspositionTable::new(1024));
    let start = Position::startpos();
    let settings = SearchSettings::new(6, 3)
        .with_deadline(Some(Instant::now() - Duration::from_millis(1)));

    let outcome = find_best_move(&start, &settings, &pool, &tt).unwrap();
    assert!(outcome.stopped);
    assert!(start.is_legal(outcome.best_move));
    assert!(outcome.root_scores.iter().all(|r| !r.completed));
    assert!(tt.probe(start.key()).is_none());
}

#[test]
fn test_stop_flag_ends_search() {
    let pool = WorkerPool::new(2).unwrap();
    let tt = Arc::new(TranspositionTable::new(1024));
    let stop = Arc::new(AtomicBool::new(true));
    let settings = SearchSettings::new(8, 3).with_stop_flag(stop);

    let outcome = find_best_move(&Position::startpos(), &settings, &pool, &tt).unwrap();
    assert!(outcome.stopped);
    assert_eq!(outcome.pv, vec![outcome.best_move]);
}

#[test]
fn test_single_and_many_threads_agree_on_clear_best_move() {
    let fen = "4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1";
    let single = run(fen, 3, 1);
    for _ in 0..3 {
        let many = run(fen, 3, 4);
        assert_eq!(many.best_move, single.best_move);
    }
}
