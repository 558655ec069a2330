//! Quiescence search: resolve pending captures past the nominal depth so the
//! static evaluation is only trusted in calm positions.

use chess_core::{Color, Move, Position};

use crate::eval::static_eval;
use crate::ordering::order_moves;
use crate::score::{improves, mate_shift, mated_score, worst_for, Score, DRAW_SCORE};
use crate::search::{deadline_score, is_rule_draw, SearchContext};

/// Coarse piece values for the quietness test, pawn..king.
const QUIET_VALUES: [i32; 6] = [1, 3, 3, 5, 9, 0];

/// A position "appears quiet" when the side to move is not in check and has
/// no capture of a piece worth more than the capturing piece.
///
/// `moves` must be the legal moves of `pos`.
pub fn appears_quiet(pos: &Position, moves: &[Move]) -> bool {
    if pos.in_check() {
        return false;
    }
    !moves.iter().any(|&mv| {
        match (pos.moved_piece(mv), pos.captured_piece(mv)) {
            (Some(attacker), Some(victim)) => {
                QUIET_VALUES[attacker as usize] < QUIET_VALUES[victim as usize]
            }
            _ => false,
        }
    })
}

#[inline]
fn is_noisy(pos: &Position, mv: Move) -> bool {
    pos.is_capture(mv) || mv.promotion.is_some()
}

/// Fail-soft quiescence with a ply budget.
///
/// Out of check the side to move may stand pat on the static evaluation and
/// only captures and promotions are searched. In check every evasion is
/// searched. Scores are from White's point of view.
pub fn quiescence(
    ctx: &mut SearchContext,
    pos: &mut Position,
    budget: u8,
    mut alpha: Score,
    mut beta: Score,
    pv: &mut Vec<Move>,
) -> Score {
    pv.clear();
    ctx.stats.qnodes += 1;
    let side = pos.side_to_move();

    if ctx.out_of_time() {
        return deadline_score(side);
    }

    let mut moves = Vec::with_capacity(64);
    pos.legal_moves_into(&mut moves);
    let in_check = pos.in_check();
    if moves.is_empty() {
        return if in_check { mated_score(side) } else { DRAW_SCORE };
    }
    if is_rule_draw(pos) {
        return DRAW_SCORE;
    }

    if budget == 0 || appears_quiet(pos, &moves) {
        return static_eval(pos.board());
    }

    let mut best = worst_for(side);
    if !in_check {
        best = static_eval(pos.board());
        match side {
            Color::White => alpha = alpha.max(best),
            Color::Black => beta = beta.min(best),
        }
        if beta <= alpha {
            return best;
        }
        moves.retain(|&mv| is_noisy(pos, mv));
    }

    order_moves(pos, &mut moves, None);

    let mut child_pv = Vec::new();
    for mv in moves {
        pos.make_move(mv);
        let score = quiescence(ctx, pos, budget - 1, alpha, beta, &mut child_pv);
        pos.unmake_move();

        if improves(side, score, best) || (pv.is_empty() && in_check) {
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
            break;
        }
    }

    mate_shift(best)
}

#[cfg(test)]
#[path = "quiescence_tests.rs"]
mod quiescence_tests;
