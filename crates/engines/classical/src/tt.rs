//! Shared transposition table.
//!
//! Entries are keyed by the Zobrist fingerprint and spread over a fixed number
//! of shards, each behind its own mutex, so root tasks running on different
//! workers rarely contend. The total entry count is an atomic adjusted while
//! the owning shard is locked. When it reaches the configured capacity the
//! whole table is cleared before the next insert.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chess_core::{Color, Move};
use tracing::debug;

use crate::score::{improves, Score};

const SHARD_COUNT: usize = 64;

/// Rough heap footprint of one entry, used to turn the `Hash` option (MB)
/// into an entry count.
pub const ENTRY_BYTES: usize = 128;

/// How the stored score relates to the true value of the position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// Searched inside the window: the true value.
    Exact,
    /// Failed high: the true value is at least `score`.
    Lower,
    /// Failed low: the true value is at most `score`.
    Upper,
}

impl Bound {
    /// Classify a fail-soft result against the window it was searched with.
    pub fn classify(score: Score, alpha: Score, beta: Score) -> Self {
        if score <= alpha {
            Bound::Upper
        } else if score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TTEntry {
    pub depth: u8,
    pub score: Score,
    pub bound: Bound,
    /// Principal line from this position; its head is the hash move.
    pub line: Vec<Move>,
}

impl TTEntry {
    pub fn hash_move(&self) -> Option<Move> {
        self.line.first().copied()
    }

    /// Score to return directly from a node searched to `depth` with window
    /// `(alpha, beta)`, if this entry is deep enough and its bound settles it.
    pub fn usable_score(&self, depth: u8, alpha: Score, beta: Score) -> Option<Score> {
        if self.depth < depth {
            return None;
        }
        match self.bound {
            Bound::Exact => Some(self.score),
            Bound::Lower if self.score >= beta => Some(self.score),
            Bound::Upper if self.score <= alpha => Some(self.score),
            _ => None,
        }
    }
}

pub struct TranspositionTable {
    shards: Vec<Mutex<HashMap<u64, TTEntry>>>,
    len: AtomicUsize,
    capacity: AtomicUsize,
}

impl TranspositionTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            shards: (0..SHARD_COUNT).map(|_| Mutex::new(HashMap::new())).collect(),
            len: AtomicUsize::new(0),
            capacity: AtomicUsize::new(capacity.max(1)),
        }
    }

    /// Table sized for roughly `megabytes` of memory.
    pub fn with_megabytes(megabytes: usize) -> Self {
        Self::new(entries_for_megabytes(megabytes))
    }

    #[inline]
    fn shard(&self, key: u64) -> MutexGuard<'_, HashMap<u64, TTEntry>> {
        // Low bits pick the bucket inside the HashMap; use the high bits here.
        let idx = (key >> 58) as usize % SHARD_COUNT;
        self.shards[idx]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn probe(&self, key: u64) -> Option<TTEntry> {
        self.shard(key).get(&key).cloned()
    }

    /// Depth-preferred insert.
    ///
    /// A deeper stored entry is never replaced by a shallower one. At equal
    /// depth the new entry wins only if its score is at least as good for
    /// `mover`, the side to move in the stored position.
    pub fn insert(&self, key: u64, entry: TTEntry, mover: Color) {
        if self.len() >= self.capacity() {
            debug!(entries = self.len(), "transposition table full, clearing");
            self.clear();
        }

        let mut shard = self.shard(key);
        match shard.get_mut(&key) {
            Some(stored) => {
                let replace = entry.depth > stored.depth
                    || (entry.depth == stored.depth
                        && !improves(mover, stored.score, entry.score));
                if replace {
                    *stored = entry;
                }
            }
            None => {
                shard.insert(key, entry);
                self.len.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn clear(&self) {
        for shard in &self.shards {
            let mut map = shard.lock().unwrap_or_else(PoisonError::into_inner);
            let removed = map.len();
            map.clear();
            self.len.fetch_sub(removed, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Relaxed)
    }

    /// Change the entry limit. A table already over the new limit is cleared
    /// on its next insert.
    pub fn set_capacity(&self, capacity: usize) {
        self.capacity.store(capacity.max(1), Ordering::Relaxed);
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(1 << 20)
    }
}

pub fn entries_for_megabytes(megabytes: usize) -> usize {
    (megabytes.saturating_mul(1024 * 1024) / ENTRY_BYTES).max(1)
}

#[cfg(test)]
#[path = "tt_tests.rs"]
mod tt_tests;
