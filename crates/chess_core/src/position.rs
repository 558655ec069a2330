//! Game position: a cozy-chess board plus the undo history the search needs.
//!
//! `Position` is the capability set the engine depends on: apply and undo a
//! move, enumerate legal moves, detect terminal states and report the side to
//! move. The Zobrist key is updated incrementally on every move and the undo
//! stack doubles as game history for repetition detection.

use crate::error::{ChessError, ChessResult};
use crate::types::*;
use crate::zobrist::ZOBRIST;

#[derive(Clone, Debug)]
struct Undo {
    board: Board,
    key: u64,
}

#[derive(Clone, Debug)]
pub struct Position {
    board: Board,
    key: u64,
    history: Vec<Undo>,
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Position {
    pub fn startpos() -> Self {
        Self::from_board(Board::default())
    }

    /// Parse a FEN string (standard castling notation).
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        let fen = fen.trim();
        Board::from_fen(fen, false)
            .map(Self::from_board)
            .map_err(|_| ChessError::InvalidFen {
                fen: fen.to_string(),
            })
    }

    pub fn from_board(board: Board) -> Self {
        let key = ZOBRIST.hash(&board);
        Self {
            board,
            key,
            history: Vec::new(),
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Zobrist fingerprint of the current position.
    #[inline]
    pub fn key(&self) -> u64 {
        self.key
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        !self.board.checkers().is_empty()
    }

    pub fn fen(&self) -> String {
        self.board.to_string()
    }

    /// Number of moves played since this position was set up.
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        let piece = self.board.piece_on(sq)?;
        let color = self.board.color_on(sq)?;
        Some((color, piece))
    }

    /// Fill `moves` with every legal move, clearing it first.
    pub fn legal_moves_into(&self, moves: &mut Vec<Move>) {
        moves.clear();
        self.board.generate_moves(|piece_moves| {
            moves.extend(piece_moves);
            false
        });
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        self.legal_moves_into(&mut moves);
        moves
    }

    pub fn has_legal_moves(&self) -> bool {
        self.board.generate_moves(|_| true)
    }

    #[inline]
    pub fn is_legal(&self, mv: Move) -> bool {
        self.board.is_legal(mv)
    }

    /// Castling is encoded by cozy-chess as the king capturing its own rook.
    #[inline]
    pub fn is_castle(&self, mv: Move) -> bool {
        self.board.piece_on(mv.from) == Some(Piece::King)
            && self.board.colors(self.side_to_move()).has(mv.to)
    }

    #[inline]
    pub fn is_en_passant(&self, mv: Move) -> bool {
        self.board.piece_on(mv.from) == Some(Piece::Pawn)
            && mv.from.file() != mv.to.file()
            && self.board.piece_on(mv.to).is_none()
    }

    /// Piece captured by `mv`, if any. Castling never captures.
    pub fn captured_piece(&self, mv: Move) -> Option<Piece> {
        if self.board.colors(!self.side_to_move()).has(mv.to) {
            self.board.piece_on(mv.to)
        } else if self.is_en_passant(mv) {
            Some(Piece::Pawn)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_capture(&self, mv: Move) -> bool {
        self.captured_piece(mv).is_some()
    }

    #[inline]
    pub fn moved_piece(&self, mv: Move) -> Option<Piece> {
        self.board.piece_on(mv.from)
    }

    /// Play a legal move. The caller is responsible for legality; use
    /// [`Position::try_make_move`] for untrusted input.
    pub fn make_move(&mut self, mv: Move) {
        debug_assert!(self.board.is_legal(mv), "illegal move {mv} in {}", self.board);
        let mut next = self.board.clone();
        next.play_unchecked(mv);
        let key = ZOBRIST.update(self.key, &self.board, mv, &next);
        let prev = std::mem::replace(&mut self.board, next);
        self.history.push(Undo {
            board: prev,
            key: self.key,
        });
        self.key = key;
    }

    /// Validate and play a move.
    pub fn try_make_move(&mut self, mv: Move) -> ChessResult<()> {
        if !self.board.is_legal(mv) {
            return Err(ChessError::IllegalMove {
                text: mv.to_string(),
                fen: self.fen(),
            });
        }
        self.make_move(mv);
        Ok(())
    }

    /// Undo the last move. Returns false when there is nothing to undo.
    pub fn unmake_move(&mut self) -> bool {
        match self.history.pop() {
            Some(undo) => {
                self.board = undo.board;
                self.key = undo.key;
                true
            }
            None => false,
        }
    }

    /// Threefold repetition over the recorded history.
    ///
    /// Only positions since the last irreversible move can repeat, and only
    /// every second ply has the same side to move.
    pub fn is_repetition(&self) -> bool {
        let window = self.board.halfmove_clock() as usize;
        let mut seen = 0;
        for undo in self
            .history
            .iter()
            .rev()
            .take(window)
            .skip(1)
            .step_by(2)
        {
            if undo.key == self.key {
                seen += 1;
                if seen >= 2 {
                    return true;
                }
            }
        }
        false
    }

    #[inline]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.board.halfmove_clock() >= 100
    }

    /// Bare kings, a single minor piece, or only bishops all standing on
    /// squares of one colour.
    pub fn is_insufficient_material(&self) -> bool {
        let b = &self.board;
        let heavy = b.pieces(Piece::Pawn) | b.pieces(Piece::Rook) | b.pieces(Piece::Queen);
        if !heavy.is_empty() {
            return false;
        }
        let knights = b.pieces(Piece::Knight);
        let bishops = b.pieces(Piece::Bishop);
        if (knights | bishops).len() <= 1 {
            return true;
        }
        knights.is_empty()
            && ((bishops & BitBoard::LIGHT_SQUARES).is_empty()
                || (bishops & BitBoard::DARK_SQUARES).is_empty())
    }

    /// Checkmate, any draw rule, or still in play.
    pub fn outcome(&self) -> Outcome {
        if !self.has_legal_moves() {
            return if self.in_check() {
                Outcome::Checkmate {
                    loser: self.side_to_move(),
                }
            } else {
                Outcome::Draw(DrawReason::Stalemate)
            };
        }
        if self.is_fifty_move_draw() {
            Outcome::Draw(DrawReason::FiftyMoveRule)
        } else if self.is_insufficient_material() {
            Outcome::Draw(DrawReason::InsufficientMaterial)
        } else if self.is_repetition() {
            Outcome::Draw(DrawReason::ThreefoldRepetition)
        } else {
            Outcome::Ongoing
        }
    }
}

#[cfg(test)]
#[path = "position_tests.rs"]
mod position_tests;
