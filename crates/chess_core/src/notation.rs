//! Standard algebraic notation (SAN) for move transcripts.

use crate::position::Position;
use crate::types::*;

/// Format `mv`, legal in `pos`, as SAN (`Nbd7`, `exd5`, `e8=Q+`, `O-O#`).
pub fn move_to_san(pos: &Position, mv: Move) -> String {
    let mut san = String::with_capacity(8);

    if pos.is_castle(mv) {
        let short = mv.to.file() as usize > mv.from.file() as usize;
        san.push_str(if short { "O-O" } else { "O-O-O" });
    } else {
        let Some(piece) = pos.moved_piece(mv) else {
            return mv.to_string();
        };
        let capture = pos.is_capture(mv);

        if piece == Piece::Pawn {
            if capture {
                san.push(file_char(mv.from.file()));
            }
        } else {
            san.push(piece_letter(piece));
            san.push_str(&disambiguation(pos, mv, piece));
        }
        if capture {
            san.push('x');
        }
        san.push_str(&sq_to_coord(mv.to));
        if let Some(promo) = mv.promotion {
            san.push('=');
            san.push(piece_letter(promo));
        }
    }

    let mut next = pos.clone();
    next.make_move(mv);
    if next.in_check() {
        san.push(if next.has_legal_moves() { '+' } else { '#' });
    }
    san
}

/// Origin hint needed when another piece of the same kind can reach the
/// same square: file if that is unique, else rank, else both.
fn disambiguation(pos: &Position, mv: Move, piece: Piece) -> String {
    let rivals: Vec<Square> = pos
        .legal_moves()
        .into_iter()
        .filter(|m| m.to == mv.to && m.from != mv.from && pos.moved_piece(*m) == Some(piece))
        .map(|m| m.from)
        .collect();
    if rivals.is_empty() {
        return String::new();
    }

    let same_file = rivals.iter().any(|sq| sq.file() == mv.from.file());
    let same_rank = rivals.iter().any(|sq| sq.rank() == mv.from.rank());
    if !same_file {
        file_char(mv.from.file()).to_string()
    } else if !same_rank {
        rank_char(mv.from.rank()).to_string()
    } else {
        sq_to_coord(mv.from)
    }
}

#[cfg(test)]
#[path = "notation_tests.rs"]
mod notation_tests;
