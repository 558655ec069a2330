//! Engine configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) gives a
//! usable engine. Command-line flags and UCI options override individual
//! fields afterwards.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::tt::entries_for_megabytes;

/// Longest per-move time limit accepted, one week.
pub const MAX_TIME_LIMIT_SECS: f64 = 7.0 * 24.0 * 3600.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Nominal search depth in plies
    pub depth: u8,
    /// Extra plies of captures searched past the nominal depth
    pub quiescence_depth: u8,
    /// Worker threads for the root parallelizer
    pub threads: usize,
    /// Transposition table entry limit
    pub tt_capacity: usize,
    /// Safety margin subtracted from every time budget
    pub move_overhead_ms: u64,
    /// Per-move time limit for one-shot and demo play; 0 disables
    pub time_limit_secs: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: 6,
            quiescence_depth: 3,
            threads: default_threads(),
            tt_capacity: 1 << 20,
            move_overhead_ms: 0,
            time_limit_secs: 15.0,
        }
    }
}

fn default_threads() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl EngineConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::Invalid {
                field: "depth",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.threads == 0 {
            return Err(ConfigError::Invalid {
                field: "threads",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.tt_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "tt_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=MAX_TIME_LIMIT_SECS).contains(&self.time_limit_secs) {
            return Err(ConfigError::Invalid {
                field: "time_limit_secs",
                reason: format!(
                    "{} is outside 0..={MAX_TIME_LIMIT_SECS}",
                    self.time_limit_secs
                ),
            });
        }
        Ok(())
    }

    /// Per-move time limit, `None` when disabled or not representable.
    pub fn time_limit(&self) -> Option<Duration> {
        if self.time_limit_secs > 0.0 {
            Duration::try_from_secs_f64(self.time_limit_secs).ok()
        } else {
            None
        }
    }

    pub fn move_overhead(&self) -> Duration {
        Duration::from_millis(self.move_overhead_ms)
    }

    /// Set the table size from the UCI `Hash` option.
    pub fn set_hash_megabytes(&mut self, megabytes: usize) {
        self.tt_capacity = entries_for_megabytes(megabytes);
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
