//! Rules layer shared by the engine and its front ends: a [`Position`]
//! with history and fingerprints, UCI/SAN move text, perft, and the
//! [`Engine`] trait the protocol loop drives.

pub mod error;
pub mod notation;
pub mod perft;
pub mod position;
pub mod time_control;
pub mod types;
pub mod uci;
pub mod zobrist;

pub use error::{ChessError, ChessResult};
pub use notation::move_to_san;
pub use perft::{divide, perft};
pub use position::Position;
pub use time_control::*;
pub use types::*;
pub use uci::*;
pub use zobrist::ZOBRIST;

// =============================================================================
// Engine trait
// =============================================================================

/// What a search hands back to the front end.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// `None` only when the side to move has no legal move
    pub best_move: Option<Move>,
    /// Centipawns, White's point of view
    pub score: i32,
    /// Deepest completed iteration
    pub depth: u8,
    /// All nodes, quiescence included
    pub nodes: u64,
    pub qnodes: u64,
    pub tt_hits: u64,
    /// The deadline or a stop request cut the search short
    pub stopped: bool,
    pub pv: Vec<Move>,
}

/// A searcher the UCI loop can drive without knowing its internals.
pub trait Engine: Send {
    /// Pick a move for `pos`, honouring `limits`.
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> SearchResult;

    fn name(&self) -> &str;

    fn author(&self) -> &str {
        "ML-chess"
    }

    /// Forget anything learned from the previous game.
    fn new_game(&mut self) {}

    /// Apply a `setoption`; engines reject names they do not know.
    fn set_option(&mut self, name: &str, _value: &str) -> ChessResult<()> {
        Err(ChessError::UnknownOption {
            name: name.to_string(),
        })
    }

    /// `option name ...` lines sent in reply to `uci`.
    fn options(&self) -> Vec<String> {
        Vec::new()
    }
}
