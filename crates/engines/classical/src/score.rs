//! Score scale shared by the evaluator and the search.
//!
//! Scores are always from White's point of view: White maximizes, Black
//! minimizes. Mate scores sit within [`MATE_WINDOW`] of the bounds and move one
//! step towards zero per ply on the way up, so a shorter mate scores higher.

use chess_core::Color;

pub type Score = i32;

pub const MAX_SCORE: Score = 100_000;
pub const MATE_WINDOW: Score = 50;
pub const DRAW_SCORE: Score = 0;

/// Scores above this are forced wins for White.
pub const WHITE_WIN_THRESHOLD: Score = MAX_SCORE - MATE_WINDOW;
/// Scores below this are forced wins for Black.
pub const BLACK_WIN_THRESHOLD: Score = -WHITE_WIN_THRESHOLD;

/// Score of a position where `loser` is checkmated.
#[inline]
pub fn mated_score(loser: Color) -> Score {
    match loser {
        Color::White => -MAX_SCORE,
        Color::Black => MAX_SCORE,
    }
}

/// The worst possible score for `side`. Also the value returned when the
/// deadline expires with `side` to move.
#[inline]
pub fn worst_for(side: Color) -> Score {
    mated_score(side)
}

/// True when `new` is strictly better than `old` for `side`.
#[inline]
pub fn improves(side: Color, new: Score, old: Score) -> bool {
    match side {
        Color::White => new > old,
        Color::Black => new < old,
    }
}

/// Pull a mate score one ply towards zero.
#[inline]
pub fn mate_shift(score: Score) -> Score {
    if score > WHITE_WIN_THRESHOLD {
        score - 1
    } else if score < BLACK_WIN_THRESHOLD {
        score + 1
    } else {
        score
    }
}

#[inline]
pub fn is_mate_score(score: Score) -> bool {
    !(BLACK_WIN_THRESHOLD..=WHITE_WIN_THRESHOLD).contains(&score)
}

/// Signed number of full moves until mate, positive when White mates.
///
/// A mated position scores `MAX_SCORE`; every ply above it loses one point,
/// so a mate delivered `n` plies from the root scores `MAX_SCORE - (n - 1)`.
pub fn mate_in_moves(score: Score) -> Option<i32> {
    if !is_mate_score(score) {
        return None;
    }
    let plies = MAX_SCORE - score.abs() + 1;
    let moves = (plies + 1) / 2;
    Some(if score > 0 { moves } else { -moves })
}

#[cfg(test)]
#[path = "score_tests.rs"]
mod score_tests;
