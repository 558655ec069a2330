//! UCI long-algebraic move text and `position` command handling.
//!
//! cozy-chess encodes castling as the king capturing its own rook (`e1h1`).
//! Everything crossing the protocol boundary uses the standard king-two-squares
//! form (`e1g1`), so both directions convert here.

use crate::error::{ChessError, ChessResult};
use crate::position::Position;
use crate::types::*;

fn promo_char(piece: Piece) -> char {
    match piece {
        Piece::Queen => 'q',
        Piece::Rook => 'r',
        Piece::Bishop => 'b',
        Piece::Knight => 'n',
        Piece::Pawn => 'p',
        Piece::King => 'k',
    }
}

/// Square the king lands on for a castling move in king-takes-rook form.
fn castle_target(mv: Move) -> Square {
    let file = if mv.to.file() as usize > mv.from.file() as usize {
        File::G
    } else {
        File::C
    };
    Square::new(file, mv.from.rank())
}

/// Format `mv`, legal in `board`, in standard UCI notation.
pub fn move_to_uci(board: &Board, mv: Move) -> String {
    let us = board.side_to_move();
    let to = if board.piece_on(mv.from) == Some(Piece::King) && board.colors(us).has(mv.to) {
        castle_target(mv)
    } else {
        mv.to
    };
    let mut s = String::with_capacity(5);
    s.push_str(&sq_to_coord(mv.from));
    s.push_str(&sq_to_coord(to));
    if let Some(p) = mv.promotion {
        s.push(promo_char(p));
    }
    s
}

/// Parse UCI move text against the legal moves of `pos`.
///
/// Accepts both `e1g1` and the king-takes-rook form `e1h1` for castling.
pub fn parse_uci_move(pos: &Position, txt: &str) -> ChessResult<Move> {
    let malformed = || ChessError::MalformedMove {
        text: txt.to_string(),
    };
    if !(4..=5).contains(&txt.len()) || !txt.is_ascii() {
        return Err(malformed());
    }
    let from = coord_to_sq(&txt[0..2]).ok_or_else(malformed)?;
    let to = coord_to_sq(&txt[2..4]).ok_or_else(malformed)?;
    let promo = match txt.as_bytes().get(4).map(|b| b.to_ascii_lowercase()) {
        None => None,
        Some(b'q') => Some(Piece::Queen),
        Some(b'r') => Some(Piece::Rook),
        Some(b'b') => Some(Piece::Bishop),
        Some(b'n') => Some(Piece::Knight),
        Some(_) => return Err(malformed()),
    };

    let board = pos.board();
    let found = pos.legal_moves().into_iter().find(|&m| {
        if m.from != from || m.promotion != promo {
            return false;
        }
        if m.to == to {
            return true;
        }
        pos.is_castle(m) && castle_target(m) == to
    });
    found.ok_or_else(|| ChessError::IllegalMove {
        text: txt.to_string(),
        fen: board.to_string(),
    })
}

/// Build a position from the arguments of a UCI `position` command:
/// `startpos | fen <fields...>` optionally followed by `moves <m1> <m2> ...`.
///
/// On an illegal move the error is returned together with the position
/// reached up to the last legal move, so callers may keep playing from it.
pub fn set_position_from_uci(args: &[&str]) -> Result<Position, (Position, ChessError)> {
    let moves_at = args.iter().position(|&a| a == "moves");
    let setup = &args[..moves_at.unwrap_or(args.len())];

    let mut pos = match setup.split_first() {
        None => Position::startpos(),
        Some((&"startpos", _)) => Position::startpos(),
        Some((&"fen", fields)) => match Position::from_fen(&fields.join(" ")) {
            Ok(pos) => pos,
            Err(e) => return Err((Position::startpos(), e)),
        },
        Some((_, _)) => return Err((Position::startpos(), ChessError::MissingPosition)),
    };

    if let Some(at) = moves_at {
        for txt in &args[at + 1..] {
            match parse_uci_move(&pos, txt) {
                Ok(mv) => pos.make_move(mv),
                Err(e) => return Err((pos, e)),
            }
        }
    }
    Ok(pos)
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
