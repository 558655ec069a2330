//! Move ordering: castling bonus, MVV-LVA for captures, hash move first.

use std::cmp::Reverse;

use chess_core::{piece_index, Move, Piece, Position};

/// Fixed ordering bonus for castling moves.
pub const CASTLE_BONUS: i32 = 10;

/// Most-valuable-victim / least-valuable-attacker score.
///
/// With pawn = 0 .. king = 5 this gives `10 * (victim + 1) + (5 - attacker)`,
/// so pawn takes queen (55) sorts ahead of queen takes pawn (11).
#[inline]
pub fn mvv_lva(attacker: Piece, victim: Piece) -> i32 {
    10 * (piece_index(victim) as i32 + 1) + (5 - piece_index(attacker) as i32)
}

/// Ordering score of a single move in `pos`.
pub fn move_score(pos: &Position, mv: Move) -> i32 {
    if pos.is_castle(mv) {
        return CASTLE_BONUS;
    }
    match (pos.moved_piece(mv), pos.captured_piece(mv)) {
        (Some(attacker), Some(victim)) => mvv_lva(attacker, victim),
        _ => 0,
    }
}

/// Sort `moves` by descending score, keeping generation order among equals,
/// then move `hash_move` (if present in the list) to the front.
pub fn order_moves(pos: &Position, moves: &mut [Move], hash_move: Option<Move>) {
    moves.sort_by_key(|&mv| Reverse(move_score(pos, mv)));
    if let Some(hm) = hash_move {
        if let Some(i) = moves.iter().position(|&mv| mv == hm) {
            moves[..=i].rotate_right(1);
        }
    }
}

#[cfg(test)]
#[path = "ordering_tests.rs"]
mod ordering_tests;
