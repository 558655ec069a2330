use super::*;
use std::sync::Arc;
use std::thread;

fn entry(depth: u8, score: Score, bound: Bound) -> TTEntry {
    TTEntry {
        depth,
        score,
        bound,
        line: vec!["e2e4".parse().unwrap()],
    }
}

#[test]
fn test_probe_after_insert() {
    let tt = TranspositionTable::new(16);
    let e = entry(4, 35, Bound::Exact);
    tt.insert(42, e.clone(), Color::White);

    let got = tt.probe(42).unwrap();
    assert_eq!(got, e);
    assert_eq!(got.hash_move(), Some("e2e4".parse::<Move>().unwrap()));
    assert_eq!(got.usable_score(4, -100, 100), Some(35));
    assert_eq!(got.usable_score(2, -100, 100), Some(35));
    assert_eq!(got.usable_score(5, -100, 100), None);
    assert!(tt.probe(43).is_none());
}

#[test]
fn test_bounds_gate_usable_score() {
    let lower = entry(3, 200, Bound::Lower);
    assert_eq!(lower.usable_score(3, 0, 150), Some(200));
    assert_eq!(lower.usable_score(3, 0, 300), None);

    let upper = entry(3, -50, Bound::Upper);
    assert_eq!(upper.usable_score(3, 0, 100), Some(-50));
    assert_eq!(upper.usable_score(3, -100, 100), None);

    assert_eq!(Bound::classify(10, 10, 20), Bound::Upper);
    assert_eq!(Bound::classify(20, 10, 20), Bound::Lower);
    assert_eq!(Bound::classify(15, 10, 20), Bound::Exact);
}

#[test]
fn test_deeper_entry_is_kept() {
    let tt = TranspositionTable::new(16);
    tt.insert(1, entry(5, 10, Bound::Exact), Color::White);
    tt.insert(1, entry(3, 500, Bound::Exact), Color::White);
    assert_eq!(tt.probe(1).unwrap().depth, 5);

    tt.insert(1, entry(6, -20, Bound::Exact), Color::White);
    assert_eq!(tt.probe(1).unwrap().score, -20);
    assert_eq!(tt.len(), 1);
}

#[test]
fn test_equal_depth_prefers_mover() {
    let tt = TranspositionTable::new(16);

    tt.insert(1, entry(4, 10, Bound::Exact), Color::White);
    tt.insert(1, entry(4, 5, Bound::Exact), Color::White);
    assert_eq!(tt.probe(1).unwrap().score, 10);
    tt.insert(1, entry(4, 10, Bound::Lower), Color::White);
    assert_eq!(tt.probe(1).unwrap().bound, Bound::Lower);
    tt.insert(1, entry(4, 30, Bound::Exact), Color::White);
    assert_eq!(tt.probe(1).unwrap().score, 30);

    tt.insert(2, entry(4, 10, Bound::Exact), Color::Black);
    tt.insert(2, entry(4, 30, Bound::Exact), Color::Black);
    assert_eq!(tt.probe(2).unwrap().score, 10);
    tt.insert(2, entry(4, -30, Bound::Exact), Color::Black);
    assert_eq!(tt.probe(2).unwrap().score, -30);
}

#[test]
fn test_capacity_overflow_clears_table() {
    let tt = TranspositionTable::new(4);
    for key in 0..4u64 {
        tt.insert(key << 58 | key, entry(1, 0, Bound::Exact), Color::White);
    }
    assert_eq!(tt.len(), 4);

    tt.insert(99, entry(1, 7, Bound::Exact), Color::White);
    assert_eq!(tt.len(), 1);
    assert!(tt.probe(0).is_none());
    assert_eq!(tt.probe(99).unwrap().score, 7);
}

#[test]
fn test_clear_and_resize() {
    let tt = TranspositionTable::with_megabytes(1);
    assert_eq!(tt.capacity(), 1024 * 1024 / ENTRY_BYTES);
    tt.insert(5, entry(2, 1, Bound::Exact), Color::White);
    assert!(!tt.is_empty());
    tt.clear();
    assert!(tt.is_empty());

    tt.set_capacity(0);
    assert_eq!(tt.capacity(), 1);
}

#[test]
fn test_concurrent_inserts_keep_count_consistent() {
    let tt = Arc::new(TranspositionTable::new(1 << 16));
    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let tt = Arc::clone(&tt);
            thread::spawn(move || {
                for i in 0..1000u64 {
                    let key = (i * 4 + t).wrapping_mul(0x9E37_79B9_7F4A_7C15);
                    tt.insert(key, entry(1, i as Score, Bound::Exact), Color::White);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(tt.len(), 4000);
}
