//! Error types for the classical engine.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the root search and the worker pool.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The root position is checkmate or stalemate
    #[error("no legal moves in the root position")]
    NoLegalMoves,

    /// The OS refused to start a worker thread
    #[error("failed to spawn search worker: {0}")]
    Spawn(#[source] io::Error),
}

/// Errors raised while loading an engine configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A field parsed but is out of range
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
