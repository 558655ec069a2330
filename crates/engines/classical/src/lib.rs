//! Classical Chess Engine
//!
//! Fail-soft alpha-beta with a tapered piece-square evaluation, quiescence
//! search and a shared transposition table. Root moves are searched in
//! parallel on a fixed worker pool.

pub mod config;
pub mod error;
pub mod eval;
pub mod ordering;
pub mod pool;
pub mod quiescence;
pub mod root;
pub mod score;
pub mod search;
pub mod tt;

use std::sync::Arc;

use chess_core::{ChessError, ChessResult, Engine, Position, SearchLimits, SearchResult};
use tracing::{debug, warn};

pub use config::{EngineConfig, MAX_TIME_LIMIT_SECS};
pub use error::{ConfigError, SearchError};
pub use eval::{evaluate, static_eval};
pub use pool::WorkerPool;
pub use root::{find_best_move, RootOutcome, RootScore, SearchSettings, SharedBounds};
pub use score::{mate_in_moves, Score, MAX_SCORE};
pub use search::{alpha_beta, SearchContext, SearchStats};
pub use tt::TranspositionTable;

const ENGINE_NAME: &str = concat!("Classical ", env!("CARGO_PKG_VERSION"));

const MAX_THREADS: usize = 256;
const MAX_HASH_MB: usize = 65_536;
const MAX_DEPTH: u8 = 64;
const MAX_QUIESCENCE_DEPTH: u8 = 32;
const MAX_MOVE_OVERHEAD_MS: u64 = 5_000;

/// Classical chess engine.
///
/// Owns the transposition table and the worker pool for the whole session;
/// both survive between searches.
pub struct ClassicalEngine {
    config: EngineConfig,
    tt: Arc<TranspositionTable>,
    pool: WorkerPool,
}

impl ClassicalEngine {
    pub fn new(config: EngineConfig) -> Result<Self, SearchError> {
        let pool = WorkerPool::new(config.threads)?;
        let tt = Arc::new(TranspositionTable::new(config.tt_capacity));
        Ok(Self { config, tt, pool })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn transposition_table(&self) -> &Arc<TranspositionTable> {
        &self.tt
    }

    /// Run one root search with explicit settings.
    pub fn search_root(
        &self,
        pos: &Position,
        settings: &SearchSettings,
    ) -> Result<RootOutcome, SearchError> {
        find_best_move(pos, settings, &self.pool, &self.tt)
    }

    fn set_threads(&mut self, threads: usize) -> Result<(), SearchError> {
        if threads != self.pool.size() {
            self.pool = WorkerPool::new(threads)?;
        }
        self.config.threads = threads;
        Ok(())
    }
}

fn parse_option<T>(name: &str, value: &str, min: T, max: T) -> ChessResult<T>
where
    T: std::str::FromStr + PartialOrd,
{
    match value.trim().parse::<T>() {
        Ok(v) if v >= min && v <= max => Ok(v),
        _ => Err(ChessError::InvalidOptionValue {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

impl Engine for ClassicalEngine {
    /// Iterative deepening up to `limits.depth`. An interrupted iteration is
    /// discarded in favour of the last one that finished, unless none did.
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> SearchResult {
        // The protocol may start the clock itself so that an early `stop`
        // is not lost.
        if !limits.time_control.is_started() {
            limits.start();
        }

        let target = limits.depth.max(1);
        let mut settings = SearchSettings {
            depth: 1,
            quiescence_depth: limits
                .quiescence_depth
                .unwrap_or(self.config.quiescence_depth),
            deadline: limits.time_control.deadline(),
            stop: limits.time_control.stop_flag(),
        };

        let mut outcome = match self.search_root(pos, &settings) {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!(%err, fen = %pos.fen(), "nothing to search");
                return SearchResult {
                    best_move: None,
                    score: evaluate(pos),
                    ..SearchResult::default()
                };
            }
        };
        let mut stats = outcome.stats;
        let mut stopped = outcome.stopped;

        while !stopped && settings.depth < target {
            settings.depth += 1;
            match self.search_root(pos, &settings) {
                Ok(next) => {
                    stats += next.stats;
                    if next.stopped {
                        stopped = true;
                    } else {
                        outcome = next;
                    }
                }
                Err(_) => break,
            }
        }

        SearchResult {
            best_move: Some(outcome.best_move),
            score: outcome.score,
            depth: outcome.depth,
            nodes: stats.nodes + stats.qnodes,
            qnodes: stats.qnodes,
            tt_hits: stats.tt_hits,
            stopped,
            pv: outcome.pv,
        }
    }

    fn name(&self) -> &str {
        ENGINE_NAME
    }

    fn new_game(&mut self) {
        self.tt.clear();
    }

    fn set_option(&mut self, name: &str, value: &str) -> ChessResult<()> {
        match name.trim().to_ascii_lowercase().as_str() {
            "threads" => {
                let threads = parse_option(name, value, 1, MAX_THREADS)?;
                self.set_threads(threads).map_err(|err| {
                    warn!(%err, threads, "could not resize worker pool");
                    ChessError::InvalidOptionValue {
                        name: name.to_string(),
                        value: value.to_string(),
                    }
                })
            }
            "hash" => {
                let megabytes = parse_option(name, value, 1, MAX_HASH_MB)?;
                self.config.set_hash_megabytes(megabytes);
                self.tt.set_capacity(self.config.tt_capacity);
                self.tt.clear();
                Ok(())
            }
            "move overhead" => {
                self.config.move_overhead_ms = parse_option(name, value, 0, MAX_MOVE_OVERHEAD_MS)?;
                Ok(())
            }
            "depth" => {
                self.config.depth = parse_option(name, value, 1, MAX_DEPTH)?;
                Ok(())
            }
            "quiescencedepth" => {
                self.config.quiescence_depth = parse_option(name, value, 0, MAX_QUIESCENCE_DEPTH)?;
                Ok(())
            }
            _ => Err(ChessError::UnknownOption {
                name: name.to_string(),
            }),
        }
    }

    fn options(&self) -> Vec<String> {
        let hash_mb = (self.config.tt_capacity * tt::ENTRY_BYTES / (1024 * 1024)).max(1);
        vec![
            format!(
                "option name Threads type spin default {} min 1 max {MAX_THREADS}",
                self.config.threads
            ),
            format!("option name Hash type spin default {hash_mb} min 1 max {MAX_HASH_MB}"),
            format!(
                "option name Move Overhead type spin default {} min 0 max {MAX_MOVE_OVERHEAD_MS}",
                self.config.move_overhead_ms
            ),
            format!(
                "option name Depth type spin default {} min 1 max {MAX_DEPTH}",
                self.config.depth
            ),
            format!(
                "option name QuiescenceDepth type spin default {} min 0 max {MAX_QUIESCENCE_DEPTH}",
                self.config.quiescence_depth
            ),
        ]
    }
}
