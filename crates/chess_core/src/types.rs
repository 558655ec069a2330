//! Shared vocabulary on top of the cozy-chess types.

pub use cozy_chess::{BitBoard, Board, Color, File, Move, Piece, Rank, Square};

/// Standard starting position.
pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Why a game ended in a draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawReason {
    Stalemate,
    FiftyMoveRule,
    ThreefoldRepetition,
    InsufficientMaterial,
}

/// Terminal status of a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    /// The side to move has been checkmated.
    Checkmate { loser: Color },
    Draw(DrawReason),
}

impl Outcome {
    pub fn is_over(self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }
}

/// Index of a piece kind, pawn = 0 .. king = 5.
#[inline]
pub fn piece_index(piece: Piece) -> usize {
    piece as usize
}

/// Uppercase letter used by SAN and FEN for a piece kind.
pub fn piece_letter(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

pub fn file_char(file: File) -> char {
    (b'a' + file as u8) as char
}

pub fn rank_char(rank: Rank) -> char {
    (b'1' + rank as u8) as char
}

pub fn sq_to_coord(sq: Square) -> String {
    format!("{}{}", file_char(sq.file()), rank_char(sq.rank()))
}

pub fn coord_to_sq(c: &str) -> Option<Square> {
    let b = c.as_bytes();
    if b.len() != 2 {
        return None;
    }
    let f = b[0];
    let r = b[1];
    if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&r) {
        return None;
    }
    Some(Square::new(
        File::index((f - b'a') as usize),
        Rank::index((r - b'1') as usize),
    ))
}
