//! Root parallelizer.
//!
//! Every legal root move becomes one job on the [`WorkerPool`]. Jobs search
//! their own copy of the position and share a single `(alpha, beta)` pair,
//! tightened with compare-and-swap loops as results come in. Jobs started
//! later may therefore search with a narrower window than jobs started
//! earlier; the reduction only compares scores, so this never produces an
//! illegal move.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use chess_core::{Color, Move, Position};
use tracing::{debug, trace};

use crate::eval::static_eval;
use crate::ordering::order_moves;
use crate::pool::WorkerPool;
use crate::score::{improves, mate_shift, worst_for, Score, MAX_SCORE};
use crate::search::{alpha_beta, SearchContext, SearchStats};
use crate::tt::{Bound, TTEntry, TranspositionTable};
use crate::SearchError;

/// Window shared by all jobs of one root search.
#[derive(Debug)]
pub struct SharedBounds {
    alpha: AtomicI32,
    beta: AtomicI32,
}

impl SharedBounds {
    pub fn new(alpha: Score, beta: Score) -> Self {
        Self {
            alpha: AtomicI32::new(alpha),
            beta: AtomicI32::new(beta),
        }
    }

    #[inline]
    pub fn alpha(&self) -> Score {
        self.alpha.load(Ordering::Acquire)
    }

    #[inline]
    pub fn beta(&self) -> Score {
        self.beta.load(Ordering::Acquire)
    }

    /// Raise alpha to `score` if that is an improvement. Returns whether the
    /// bound moved.
    pub fn raise_alpha(&self, score: Score) -> bool {
        self.alpha
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (score > current).then_some(score)
            })
            .is_ok()
    }

    /// Lower beta to `score` if that is an improvement.
    pub fn lower_beta(&self, score: Score) -> bool {
        self.beta
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (score < current).then_some(score)
            })
            .is_ok()
    }

    /// Tighten the bound owned by `side`: alpha for White, beta for Black.
    pub fn tighten(&self, side: Color, score: Score) -> bool {
        match side {
            Color::White => self.raise_alpha(score),
            Color::Black => self.lower_beta(score),
        }
    }
}

impl Default for SharedBounds {
    fn default() -> Self {
        Self::new(-MAX_SCORE, MAX_SCORE)
    }
}

/// Budget for one root search.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// Plies, counting the root move. Zero is treated as one.
    pub depth: u8,
    pub quiescence_depth: u8,
    pub deadline: Option<Instant>,
    /// Raised by the protocol's `stop`
    pub stop: Arc<AtomicBool>,
}

impl SearchSettings {
    pub fn new(depth: u8, quiescence_depth: u8) -> Self {
        Self {
            depth,
            quiescence_depth,
            deadline: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }
}

/// Result of one root move's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootScore {
    pub mv: Move,
    pub score: Score,
    /// False when the job ran out of time or panicked. Its score is then
    /// meaningless.
    pub completed: bool,
    /// Line starting with `mv`
    pub pv: Vec<Move>,
}

#[derive(Debug, Clone)]
pub struct RootOutcome {
    pub best_move: Move,
    pub score: Score,
    pub pv: Vec<Move>,
    pub depth: u8,
    /// One entry per legal move, in search order
    pub root_scores: Vec<RootScore>,
    pub stats: SearchStats,
    /// At least one root move did not finish
    pub stopped: bool,
}

impl RootOutcome {
    /// Moves sharing the best score among finished jobs.
    pub fn best_moves(&self) -> Vec<Move> {
        self.root_scores
            .iter()
            .filter(|r| r.completed && r.score == self.score)
            .map(|r| r.mv)
            .collect()
    }
}

type Slot = Option<(RootScore, SearchStats)>;

/// Search every root move of `pos` to `settings.depth` on `pool` and return
/// the best one for the side to move.
pub fn find_best_move(
    pos: &Position,
    settings: &SearchSettings,
    pool: &WorkerPool,
    tt: &Arc<TranspositionTable>,
) -> Result<RootOutcome, SearchError> {
    let mut moves = pos.legal_moves();
    if moves.is_empty() {
        return Err(SearchError::NoLegalMoves);
    }

    let hash_move = tt.probe(pos.key()).and_then(|entry| entry.hash_move());
    order_moves(pos, &mut moves, hash_move);

    let side = pos.side_to_move();
    let depth = settings.depth.max(1);
    let bounds = Arc::new(SharedBounds::default());
    let slots: Arc<Mutex<Vec<Slot>>> = Arc::new(Mutex::new(vec![None; moves.len()]));

    for (index, &mv) in moves.iter().enumerate() {
        let mut child = pos.clone();
        child.make_move(mv);

        let bounds = Arc::clone(&bounds);
        let slots = Arc::clone(&slots);
        let tt = Arc::clone(tt);
        let stop = Arc::clone(&settings.stop);
        let deadline = settings.deadline;
        let quiescence_depth = settings.quiescence_depth;

        pool.execute(move || {
            let mut ctx = SearchContext::new(Some(tt), stop, deadline, quiescence_depth);
            let mut line = Vec::new();
            let score = alpha_beta(
                &mut ctx,
                &mut child,
                depth - 1,
                bounds.alpha(),
                bounds.beta(),
                &mut line,
            );
            let completed = !ctx.expired();
            if completed {
                bounds.tighten(side, score);
            }

            let mut pv = Vec::with_capacity(line.len() + 1);
            pv.push(mv);
            pv.extend(line);
            let result = RootScore {
                mv,
                score,
                completed,
                pv,
            };
            slots.lock().unwrap_or_else(PoisonError::into_inner)[index] =
                Some((result, ctx.stats));
        });
    }
    pool.wait_all();

    let finished = std::mem::take(&mut *slots.lock().unwrap_or_else(PoisonError::into_inner));

    let mut stats = SearchStats::default();
    let mut root_scores = Vec::with_capacity(moves.len());
    for (slot, &mv) in finished.into_iter().zip(&moves) {
        match slot {
            Some((result, task_stats)) => {
                stats += task_stats;
                root_scores.push(result);
            }
            None => root_scores.push(RootScore {
                mv,
                score: worst_for(side),
                completed: false,
                pv: vec![mv],
            }),
        }
    }
    for r in &root_scores {
        trace!(mv = %r.mv, score = r.score, completed = r.completed, "root move");
    }

    let stopped = root_scores.iter().any(|r| !r.completed);
    let best = root_scores
        .iter()
        .filter(|r| r.completed)
        .fold(None, |best: Option<&RootScore>, r| match best {
            Some(b) if !improves(side, r.score, b.score) => Some(b),
            _ => Some(r),
        });

    let (best_move, score, pv) = match best {
        Some(r) => (r.mv, r.score, r.pv.clone()),
        None => (moves[0], static_eval(pos.board()), vec![moves[0]]),
    };

    if !stopped {
        tt.insert(
            pos.key(),
            TTEntry {
                depth,
                score: mate_shift(score),
                bound: Bound::Exact,
                line: pv.clone(),
            },
            side,
        );
    }

    debug!(
        best = %best_move,
        score,
        depth,
        nodes = stats.nodes,
        qnodes = stats.qnodes,
        stopped,
        "root search finished"
    );

    Ok(RootOutcome {
        best_move,
        score,
        pv,
        depth,
        root_scores,
        stats,
        stopped,
    })
}

#[cfg(test)]
#[path = "root_tests.rs"]
mod root_tests;
