//! Position fingerprints.
//!
//! A key is the XOR of one random value per occupied (colour, piece, square),
//! plus values for White to move, each castling right still held and the
//! en-passant file.
//!
//! `Position::make_move` keeps the key up to date with [`ZobristKeys::update`],
//! touching only the squares the move changed instead of rescanning the board.

use crate::types::{Board, Color, File, Move, Piece, Square};

/// Random keys, filled from a fixed seed so fingerprints are stable
/// between runs.
pub struct ZobristKeys {
    /// `[color][piece][square]`
    pub pieces: [[[u64; 64]; 6]; 2],
    /// XORed in when White is to move
    pub side_to_move: u64,
    /// White short, White long, Black short, Black long
    pub castling: [u64; 4],
    /// One per en-passant file
    pub en_passant: [u64; 8],
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// splitmix64 output for stream position `n`.
const fn mix(n: u64) -> u64 {
    let mut z = 0x9E37_79B9_7F4A_7C15u64.wrapping_mul(n + 1) ^ 0x00C0_FFEE_D15E_A5E5;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl ZobristKeys {
    pub const fn new() -> Self {
        let mut keys = ZobristKeys {
            pieces: [[[0; 64]; 6]; 2],
            side_to_move: 0,
            castling: [0; 4],
            en_passant: [0; 8],
        };

        // 768 piece keys first, then side, castling and en passant
        let mut n = 0;
        while n < 768 {
            keys.pieces[n / 384][(n / 64) % 6][n % 64] = mix(n as u64);
            n += 1;
        }
        keys.side_to_move = mix(768);
        let mut i = 0;
        while i < 4 {
            keys.castling[i] = mix(769 + i as u64);
            i += 1;
        }
        i = 0;
        while i < 8 {
            keys.en_passant[i] = mix(773 + i as u64);
            i += 1;
        }
        keys
    }

    /// Key for a piece of `color` on `sq`.
    #[inline(always)]
    pub fn piece_key(&self, color: Color, piece: Piece, sq: Square) -> u64 {
        self.pieces[color as usize][piece as usize][sq as usize]
    }

    /// Combined key of every castling right still held in `board`.
    #[inline]
    pub fn castling_key(&self, board: &Board) -> u64 {
        let mut key = 0;
        for (i, color) in [Color::White, Color::Black].into_iter().enumerate() {
            let rights = board.castle_rights(color);
            if rights.short.is_some() {
                key ^= self.castling[i * 2];
            }
            if rights.long.is_some() {
                key ^= self.castling[i * 2 + 1];
            }
        }
        key
    }

    /// Key for the en-passant file of `board`, or 0 when there is none.
    #[inline]
    pub fn ep_key(&self, board: &Board) -> u64 {
        board
            .en_passant()
            .map_or(0, |file| self.en_passant[file as usize])
    }

    #[inline]
    fn side_key(&self, board: &Board) -> u64 {
        if board.side_to_move() == Color::White {
            self.side_to_move
        } else {
            0
        }
    }

    /// Hash a board from scratch.
    pub fn hash(&self, board: &Board) -> u64 {
        let mut key = 0u64;
        for color in [Color::White, Color::Black] {
            for piece in Piece::ALL {
                for sq in board.colored_pieces(color, piece) {
                    key ^= self.piece_key(color, piece, sq);
                }
            }
        }
        key ^ self.castling_key(board) ^ self.ep_key(board) ^ self.side_key(board)
    }

    /// Derive the key of `after` from the key of `before`, where `after` is
    /// `before` with the legal move `mv` played.
    ///
    /// Castling arrives in cozy-chess's king-takes-rook encoding, so the rook
    /// square is `mv.to` and the king lands on the g- or c-file.
    pub fn update(&self, key: u64, before: &Board, mv: Move, after: &Board) -> u64 {
        let us = before.side_to_move();
        let them = !us;
        let Some(moved) = before.piece_on(mv.from) else {
            return self.hash(after);
        };

        let mut key = key;
        if moved == Piece::King && before.colors(us).has(mv.to) {
            let rank = mv.from.rank();
            let short = (mv.to.file() as usize) > (mv.from.file() as usize);
            let (king_file, rook_file) = if short {
                (File::G, File::F)
            } else {
                (File::C, File::D)
            };
            key ^= self.piece_key(us, Piece::King, mv.from);
            key ^= self.piece_key(us, Piece::King, Square::new(king_file, rank));
            key ^= self.piece_key(us, Piece::Rook, mv.to);
            key ^= self.piece_key(us, Piece::Rook, Square::new(rook_file, rank));
        } else {
            key ^= self.piece_key(us, moved, mv.from);
            if let Some(victim) = before.piece_on(mv.to) {
                key ^= self.piece_key(them, victim, mv.to);
            } else if moved == Piece::Pawn && mv.from.file() != mv.to.file() {
                let victim_sq = Square::new(mv.to.file(), mv.from.rank());
                key ^= self.piece_key(them, Piece::Pawn, victim_sq);
            }
            key ^= self.piece_key(us, mv.promotion.unwrap_or(moved), mv.to);
        }

        key ^= self.castling_key(before) ^ self.castling_key(after);
        key ^= self.ep_key(before) ^ self.ep_key(after);
        key ^ self.side_to_move
    }
}

/// Built at compile time.
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

/// Fingerprint of a board, computed from scratch.
pub fn hash(board: &Board) -> u64 {
    ZOBRIST.hash(board)
}

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;
