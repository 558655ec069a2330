//! Fixed-depth search benchmark for profiling with cargo-flamegraph.
//!
//! Usage:
//!   cargo flamegraph --example search_bench -p classical_engine -- [depth] [threads] [fen]
//!
//! Examples:
//!   # Default: depth 5 over the built-in suite on every core
//!   cargo flamegraph --profile profiling --example search_bench -p classical_engine
//!
//!   # One position, single thread
//!   cargo flamegraph --example search_bench -p classical_engine -- 6 1 "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"

use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chess_core::Position;
use classical_engine::{find_best_move, SearchSettings, TranspositionTable, WorkerPool};

const SUITE: &[(&str, &str)] = &[
    (
        "Starting position",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    ),
    (
        "Italian",
        "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
    ),
    (
        "Kiwipete",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    ),
    ("Rook endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"),
    ("Queen vs king", "4k3/8/6K1/8/3Q4/8/8/8 w - - 0 1"),
];

fn main() {
    let args: Vec<String> = env::args().collect();
    let depth: u8 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(5);
    let threads: usize = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| std::thread::available_parallelism().map_or(1, |n| n.get()));

    let pool = match WorkerPool::new(threads) {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    let positions: Vec<(&str, &str)> = match args.get(3) {
        Some(fen) => vec![("Custom", fen.as_str())],
        None => SUITE.to_vec(),
    };

    println!("=== Search Benchmark ===");
    println!("Depth: {depth}, threads: {}", pool.size());
    println!();

    let mut total_nodes = 0u64;
    let mut total_time = Duration::ZERO;

    for (name, fen) in positions {
        let pos = match Position::from_fen(fen) {
            Ok(pos) => pos,
            Err(err) => {
                eprintln!("{name}: {err}");
                continue;
            }
        };
        // Fresh table per position so runs are comparable
        let tt = Arc::new(TranspositionTable::default());
        let settings = SearchSettings::new(depth, 3);

        print!("{name:.<30}");
        let start = Instant::now();
        let outcome = match find_best_move(&pos, &settings, &pool, &tt) {
            Ok(outcome) => outcome,
            Err(err) => {
                println!(" {err}");
                continue;
            }
        };
        let elapsed = start.elapsed();

        let nodes = outcome.stats.nodes + outcome.stats.qnodes;
        total_nodes += nodes;
        total_time += elapsed;

        let nps = nodes as f64 / elapsed.as_secs_f64().max(1e-9);
        println!(
            " {:>6} {:>7} {nodes:>12} nodes in {elapsed:>8.3?} ({nps:>10.0} nps)",
            outcome.best_move.to_string(),
            outcome.score,
        );
    }

    println!();
    println!("{:=<70}", "");
    let total_nps = total_nodes as f64 / total_time.as_secs_f64().max(1e-9);
    println!("TOTAL: {total_nodes} nodes in {total_time:.3?} ({total_nps:.0} nps)");
}
