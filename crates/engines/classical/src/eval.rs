//! Tapered piece-square evaluation.
//!
//! Every piece contributes a material value plus a piece-square bonus from a
//! middlegame and an endgame table. The two sums are blended by the non-pawn
//! material left on the board, so the endgame tables take over completely once
//! the position is thin enough. Scores are from White's point of view.

use chess_core::{Board, Color, Outcome, Piece, Position, Square};

use crate::score::{mated_score, Score, DRAW_SCORE};

/// Middlegame material in centipawns, indexed pawn..king.
const MG_VALUES: [Score; 6] = [100, 320, 330, 500, 900, 0];
/// Endgame material in centipawns, indexed pawn..king.
const EG_VALUES: [Score; 6] = [120, 300, 320, 520, 940, 0];

/// Non-pawn material (both sides, middlegame values) at or above which the
/// middlegame tables apply alone.
pub const MIDGAME_MATERIAL: Score = 6000;
/// Non-pawn material at or below which the endgame tables apply alone.
pub const ENDGAME_MATERIAL: Score = 1600;
/// Full middlegame phase.
pub const PHASE_MAX: Score = 256;

/// Material lead (middlegame values) that switches on the mop-up term.
const MOP_UP_MARGIN: Score = 500;

// Tables are laid out as seen from White: first row is rank 8, last row is
// rank 1. A White piece on `sq` reads `table[sq ^ 56]`, a Black piece reads
// `table[sq]`.

#[rustfmt::skip]
const PAWN_MG: [Score; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
    50,  50,  50,  50,  50,  50,  50,  50,
    10,  10,  20,  30,  30,  20,  10,  10,
     5,   5,  10,  25,  25,  10,   5,   5,
     0,   0,   0,  20,  20,   0,   0,   0,
     5,  -5, -10,   0,   0, -10,  -5,   5,
     5,  10,  10, -20, -20,  10,  10,   5,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const PAWN_EG: [Score; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
    80,  80,  80,  80,  80,  80,  80,  80,
    50,  50,  50,  50,  50,  50,  50,  50,
    30,  30,  30,  30,  30,  30,  30,  30,
    15,  15,  15,  15,  15,  15,  15,  15,
     5,   5,   5,   5,   5,   5,   5,   5,
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT: [Score; 64] = [
   -50, -40, -30, -30, -30, -30, -40, -50,
   -40, -20,   0,   0,   0,   0, -20, -40,
   -30,   0,  10,  15,  15,  10,   0, -30,
   -30,   5,  15,  20,  20,  15,   5, -30,
   -30,   0,  15,  20,  20,  15,   0, -30,
   -30,   5,  10,  15,  15,  10,   5, -30,
   -40, -20,   0,   5,   5,   0, -20, -40,
   -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP: [Score; 64] = [
   -20, -10, -10, -10, -10, -10, -10, -20,
   -10,   0,   0,   0,   0,   0,   0, -10,
   -10,   0,   5,  10,  10,   5,   0, -10,
   -10,   5,   5,  10,  10,   5,   5, -10,
   -10,   0,  10,  10,  10,  10,   0, -10,
   -10,  10,  10,  10,  10,  10,  10, -10,
   -10,   5,   0,   0,   0,   0,   5, -10,
   -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK_MG: [Score; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
     5,  10,  10,  10,  10,  10,  10,   5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
     0,   0,   0,   5,   5,   0,   0,   0,
];

const ROOK_EG: [Score; 64] = [0; 64];

#[rustfmt::skip]
const QUEEN_MG: [Score; 64] = [
   -20, -10, -10,  -5,  -5, -10, -10, -20,
   -10,   0,   0,   0,   0,   0,   0, -10,
   -10,   0,   5,   5,   5,   5,   0, -10,
    -5,   0,   5,   5,   5,   5,   0,  -5,
     0,   0,   5,   5,   5,   5,   0,  -5,
   -10,   5,   5,   5,   5,   5,   0, -10,
   -10,   0,   5,   0,   0,   0,   0, -10,
   -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const QUEEN_EG: [Score; 64] = [
   -10,  -5,  -5,  -5,  -5,  -5,  -5, -10,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   5,   5,   5,   5,   0,  -5,
    -5,   0,   5,  10,  10,   5,   0,  -5,
    -5,   0,   5,  10,  10,   5,   0,  -5,
    -5,   0,   5,   5,   5,   5,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
   -10,  -5,  -5,  -5,  -5,  -5,  -5, -10,
];

#[rustfmt::skip]
const KING_MG: [Score; 64] = [
   -30, -40, -40, -50, -50, -40, -40, -30,
   -30, -40, -40, -50, -50, -40, -40, -30,
   -30, -40, -40, -50, -50, -40, -40, -30,
   -30, -40, -40, -50, -50, -40, -40, -30,
   -20, -30, -30, -40, -40, -30, -30, -20,
   -10, -20, -20, -20, -20, -20, -20, -10,
    20,  20,   0,   0,   0,   0,  20,  20,
    20,  30,  10,   0,   0,  10,  30,  20,
];

#[rustfmt::skip]
const KING_EG: [Score; 64] = [
   -50, -40, -30, -20, -20, -30, -40, -50,
   -30, -20, -10,   0,   0, -10, -20, -30,
   -30, -10,  20,  30,  30,  20, -10, -30,
   -30, -10,  30,  40,  40,  30, -10, -30,
   -30, -10,  30,  40,  40,  30, -10, -30,
   -30, -10,  20,  30,  30,  20, -10, -30,
   -30, -30,   0,   0,   0,   0, -30, -30,
   -50, -30, -30, -30, -30, -30, -30, -50,
];

const MG_TABLES: [&[Score; 64]; 6] = [&PAWN_MG, &KNIGHT, &BISHOP, &ROOK_MG, &QUEEN_MG, &KING_MG];
const EG_TABLES: [&[Score; 64]; 6] = [&PAWN_EG, &KNIGHT, &BISHOP, &ROOK_EG, &QUEEN_EG, &KING_EG];

#[inline]
fn table_index(color: Color, sq: Square) -> usize {
    match color {
        Color::White => sq as usize ^ 56,
        Color::Black => sq as usize,
    }
}

/// Game phase on a `0..=PHASE_MAX` scale, `PHASE_MAX` being a full middlegame.
pub fn game_phase(board: &Board) -> Score {
    let npm: Score = [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen]
        .into_iter()
        .map(|p| MG_VALUES[p as usize] * board.pieces(p).len() as Score)
        .sum();
    let clamped = npm.clamp(ENDGAME_MATERIAL, MIDGAME_MATERIAL);
    (clamped - ENDGAME_MATERIAL) * PHASE_MAX / (MIDGAME_MATERIAL - ENDGAME_MATERIAL)
}

/// Material of `color` in middlegame values, kings excluded.
fn material(board: &Board, color: Color) -> Score {
    Piece::ALL
        .into_iter()
        .map(|p| MG_VALUES[p as usize] * board.colored_pieces(color, p).len() as Score)
        .sum()
}

/// Distance of a square from the four centre squares, 0..=6.
fn center_distance(sq: Square) -> Score {
    let file = sq.file() as Score;
    let rank = sq.rank() as Score;
    (3 - file).max(file - 4) + (3 - rank).max(rank - 4)
}

fn king_distance(a: Square, b: Square) -> Score {
    (a.file() as Score - b.file() as Score).abs() + (a.rank() as Score - b.rank() as Score).abs()
}

/// Endgame bonus for the side a rook or more ahead: drive the defending king
/// to the edge and bring the attacking king closer.
fn mop_up(board: &Board) -> Score {
    let lead = material(board, Color::White) - material(board, Color::Black);
    if lead.abs() < MOP_UP_MARGIN {
        return 0;
    }
    let (winner, loser, sign) = if lead > 0 {
        (Color::White, Color::Black, 1)
    } else {
        (Color::Black, Color::White, -1)
    };
    let winner_king = board.king(winner);
    let loser_king = board.king(loser);
    sign * (10 * center_distance(loser_king) + 4 * (14 - king_distance(winner_king, loser_king)))
}

/// Material and piece-square score of a live position, without any terminal
/// checks. Used for stand-pat and quiet leaves where the caller has already
/// ruled out mate and draws.
pub fn static_eval(board: &Board) -> Score {
    let mut mg = 0;
    let mut eg = 0;
    for color in [Color::White, Color::Black] {
        let sign = if color == Color::White { 1 } else { -1 };
        for piece in Piece::ALL {
            let idx = piece as usize;
            for sq in board.colored_pieces(color, piece) {
                let t = table_index(color, sq);
                mg += sign * (MG_VALUES[idx] + MG_TABLES[idx][t]);
                eg += sign * (EG_VALUES[idx] + EG_TABLES[idx][t]);
            }
        }
    }
    eg += mop_up(board);

    let phase = game_phase(board);
    (mg * phase + eg * (PHASE_MAX - phase)) / PHASE_MAX
}

/// Evaluates the position from White's perspective.
///
/// Returns a score in centipawns:
/// - 0 for any drawn position
/// - `+MAX_SCORE` when Black is checkmated, `-MAX_SCORE` when White is
/// - otherwise the tapered material and piece-square sum
pub fn evaluate(pos: &Position) -> Score {
    match pos.outcome() {
        Outcome::Checkmate { loser } => mated_score(loser),
        Outcome::Draw(_) => DRAW_SCORE,
        Outcome::Ongoing => static_eval(pos.board()),
    }
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
