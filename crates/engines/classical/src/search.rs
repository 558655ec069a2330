//! Fail-soft alpha-beta search over a single subtree.
//!
//! White maximizes and Black minimizes; there is no negation between plies.
//! All shared state (transposition table, stop flag, deadline) travels in an
//! explicit [`SearchContext`] owned by the task running the subtree.

use std::ops::AddAssign;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chess_core::{Color, Move, Position};

use crate::eval::static_eval;
use crate::ordering::order_moves;
use crate::quiescence::{appears_quiet, quiescence};
use crate::score::{improves, mate_shift, mated_score, worst_for, Score, DRAW_SCORE};
use crate::tt::{Bound, TTEntry, TranspositionTable};

/// Diagnostic counters for one search task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Alpha-beta nodes
    pub nodes: u64,
    /// Quiescence nodes
    pub qnodes: u64,
    /// Probes that returned a usable score
    pub tt_hits: u64,
    /// Beta cutoffs
    pub cutoffs: u64,
}

impl AddAssign for SearchStats {
    fn add_assign(&mut self, rhs: Self) {
        self.nodes += rhs.nodes;
        self.qnodes += rhs.qnodes;
        self.tt_hits += rhs.tt_hits;
        self.cutoffs += rhs.cutoffs;
    }
}

/// Everything a search task needs besides the position.
pub struct SearchContext {
    tt: Option<Arc<TranspositionTable>>,
    stop: Arc<AtomicBool>,
    deadline: Option<Instant>,
    quiescence_depth: u8,
    expired: bool,
    pub stats: SearchStats,
}

impl SearchContext {
    pub fn new(
        tt: Option<Arc<TranspositionTable>>,
        stop: Arc<AtomicBool>,
        deadline: Option<Instant>,
        quiescence_depth: u8,
    ) -> Self {
        Self {
            tt,
            stop,
            deadline,
            quiescence_depth,
            expired: false,
            stats: SearchStats::default(),
        }
    }

    /// Context with no table, no deadline and its own stop flag.
    pub fn standalone(quiescence_depth: u8) -> Self {
        Self::new(None, Arc::new(AtomicBool::new(false)), None, quiescence_depth)
    }

    pub fn quiescence_depth(&self) -> u8 {
        self.quiescence_depth
    }

    /// True once the deadline passed or a stop was requested while this
    /// context was searching. Scores computed after that are not reliable.
    pub fn expired(&self) -> bool {
        self.expired
    }

    /// Deadline check done at the entry of every node.
    pub(crate) fn out_of_time(&mut self) -> bool {
        if self.expired {
            return true;
        }
        if self.stop.load(Ordering::Relaxed) {
            self.expired = true;
        } else if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.expired = true;
            }
        }
        self.expired
    }

    pub(crate) fn probe(&self, key: u64) -> Option<TTEntry> {
        self.tt.as_ref().and_then(|tt| tt.probe(key))
    }

    pub(crate) fn store(&self, key: u64, entry: TTEntry, mover: Color) {
        if self.expired {
            return;
        }
        if let Some(tt) = &self.tt {
            tt.insert(key, entry, mover);
        }
    }
}

/// Value returned from a node entered after the deadline. It is the worst
/// score for the side to move, so an interrupted line never looks attractive
/// to the player who would choose it.
#[inline]
pub fn deadline_score(side: Color) -> Score {
    worst_for(side)
}

/// True when `pos` is drawn by rule, ignoring stalemate (handled by the
/// caller once the move list is known).
#[inline]
pub(crate) fn is_rule_draw(pos: &Position) -> bool {
    pos.is_fifty_move_draw() || pos.is_insufficient_material() || pos.is_repetition()
}

/// Fail-soft alpha-beta to `depth` plies.
///
/// On return `pv` holds the best line found from `pos` (possibly empty at
/// leaves). The score is from White's point of view, with mate scores pulled
/// one ply towards zero.
pub fn alpha_beta(
    ctx: &mut SearchContext,
    pos: &mut Position,
    depth: u8,
    mut alpha: Score,
    mut beta: Score,
    pv: &mut Vec<Move>,
) -> Score {
    pv.clear();
    ctx.stats.nodes += 1;
    let side = pos.side_to_move();

    if ctx.out_of_time() {
        return deadline_score(side);
    }

    let mut moves = Vec::with_capacity(64);
    pos.legal_moves_into(&mut moves);
    if moves.is_empty() {
        return if pos.in_check() {
            mated_score(side)
        } else {
            DRAW_SCORE
        };
    }
    if is_rule_draw(pos) {
        return DRAW_SCORE;
    }

    let key = pos.key();
    let mut hash_move = None;
    if let Some(entry) = ctx.probe(key) {
        hash_move = entry.hash_move();
        if let Some(score) = entry.usable_score(depth, alpha, beta) {
            ctx.stats.tt_hits += 1;
            pv.extend_from_slice(&entry.line);
            return score;
        }
    }

    let (alpha_in, beta_in) = (alpha, beta);

    if depth == 0 {
        let score = if appears_quiet(pos, &moves) {
            static_eval(pos.board())
        } else {
            let budget = ctx.quiescence_depth;
            quiescence(ctx, pos, budget, alpha, beta, pv)
        };
        ctx.store(
            key,
            TTEntry {
                depth: 0,
                score,
                bound: Bound::classify(score, alpha_in, beta_in),
                line: pv.clone(),
            },
            side,
        );
        return score;
    }

    order_moves(pos, &mut moves, hash_move);

    let mut best = worst_for(side);
    let mut child_pv = Vec::new();
    for mv in moves {
        pos.make_move(mv);
        let score = alpha_beta(ctx, pos, depth - 1, alpha, beta, &mut child_pv);
        pos.unmake_move();

        if pv.is_empty() || improves(side, score, best) {
            best = score;
            pv.clear();
            pv.push(mv);
            pv.extend_from_slice(&child_pv);
        }
        match side {
            Color::White => alpha = alpha.max(best),
            Color::Black => beta = beta.min(best),
        }
        if beta <= alpha {
            ctx.stats.cutoffs += 1;
            break;
        }
    }

    // The window was compared against `best`; mate_shift is monotone, so
    // the same bound holds for the shifted score stored below.
    let bound = Bound::classify(best, alpha_in, beta_in);
    let score = mate_shift(best);
    ctx.store(
        key,
        TTEntry {
            depth,
            score,
            bound,
            line: pv.clone(),
        },
        side,
    );
    score
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
