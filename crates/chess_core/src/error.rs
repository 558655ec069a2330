//! Error types for position setup, move notation and engine options.

use thiserror::Error;

/// Errors raised by the rules facade and the notation helpers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// FEN string could not be parsed into a legal position
    #[error("invalid FEN: {fen}")]
    InvalidFen { fen: String },

    /// Move text is not well-formed coordinate notation
    #[error("malformed move text: {text}")]
    MalformedMove { text: String },

    /// Move is well-formed but not legal in the current position
    #[error("illegal move {text} in position {fen}")]
    IllegalMove { text: String, fen: String },

    /// `position` command without `startpos` or `fen`
    #[error("position command needs 'startpos' or 'fen'")]
    MissingPosition,

    /// Engine option name not recognised
    #[error("unsupported option: {name}")]
    UnknownOption { name: String },

    /// Engine option recognised but the value is out of range or malformed
    #[error("invalid value '{value}' for option {name}")]
    InvalidOptionValue { name: String, value: String },
}

/// Result type alias for rules and notation operations
pub type ChessResult<T> = Result<T, ChessError>;
