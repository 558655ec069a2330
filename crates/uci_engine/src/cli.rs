//! Command-line flags.
//!
//! The flag set is small and uses single-dash long names (`-md 5`), so it is
//! parsed by hand. `-fen` swallows every token after it, because a FEN
//! contains spaces and `-` fields.

use std::path::PathBuf;

use classical_engine::{EngineConfig, MAX_TIME_LIMIT_SECS};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No arguments: speak UCI on stdin/stdout
    Protocol,
    /// Search one position and print the move
    OneShot,
    /// Play both sides to the end of the game
    Demo,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    pub mute: bool,
    pub demo: bool,
    pub depth: Option<u8>,
    pub quiescence_depth: Option<u8>,
    pub time_limit_secs: Option<f64>,
    pub threads: Option<usize>,
    pub config: Option<PathBuf>,
    pub fen: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    #[error("missing value for {0}")]
    MissingValue(String),

    #[error("invalid value for {flag}: {value}")]
    InvalidNumber { flag: String, value: String },

    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("-fen needs a position")]
    EmptyFen,
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [-m] [-demo] [-md <depth>] [-qd <depth>] [-t <seconds>] \
         [-threads <n>] [-config <file>] [-fen <fen...>]

With no arguments the engine speaks UCI on standard input/output.

  -m              only print the chosen move (or the game transcript)
  -demo           let the engine play both sides to the end of the game
  -md <depth>     search depth in plies, counting the engine's own move
  -qd <depth>     quiescence depth in plies
  -t <seconds>    time limit per move, 0 for none (at most one week)
  -threads <n>    search threads
  -config <file>  TOML engine configuration
  -fen <fen...>   position to search; takes all remaining arguments"
    )
}

fn value<'a, I>(flag: &str, args: &mut I) -> Result<&'a str, CliError>
where
    I: Iterator<Item = &'a str>,
{
    args.next()
        .ok_or_else(|| CliError::MissingValue(flag.to_string()))
}

fn number<T: std::str::FromStr>(flag: &str, text: &str) -> Result<T, CliError> {
    text.parse().map_err(|_| CliError::InvalidNumber {
        flag: flag.to_string(),
        value: text.to_string(),
    })
}

impl CliOptions {
    /// Parse the arguments after the program name.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, CliError> {
        let mut options = Self::default();
        let mut iter = args.iter().map(AsRef::<str>::as_ref);

        while let Some(flag) = iter.next() {
            match flag {
                "-m" => options.mute = true,
                "-demo" => options.demo = true,
                "-md" => options.depth = Some(number(flag, value(flag, &mut iter)?)?),
                "-qd" => options.quiescence_depth = Some(number(flag, value(flag, &mut iter)?)?),
                "-t" => {
                    let text = value(flag, &mut iter)?;
                    let secs: f64 = number(flag, text)?;
                    if !(0.0..=MAX_TIME_LIMIT_SECS).contains(&secs) {
                        return Err(CliError::InvalidNumber {
                            flag: flag.to_string(),
                            value: text.to_string(),
                        });
                    }
                    options.time_limit_secs = Some(secs);
                }
                "-threads" => options.threads = Some(number(flag, value(flag, &mut iter)?)?),
                "-config" => options.config = Some(PathBuf::from(value(flag, &mut iter)?)),
                "-fen" => {
                    let fen = iter.by_ref().collect::<Vec<_>>().join(" ");
                    if fen.is_empty() {
                        return Err(CliError::EmptyFen);
                    }
                    options.fen = Some(fen);
                }
                other => return Err(CliError::UnknownFlag(other.to_string())),
            }
        }

        if options.depth == Some(0) {
            return Err(CliError::InvalidNumber {
                flag: "-md".to_string(),
                value: "0".to_string(),
            });
        }
        if options.threads == Some(0) {
            return Err(CliError::InvalidNumber {
                flag: "-threads".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(options)
    }

    pub fn mode(&self, arg_count: usize) -> Mode {
        if arg_count == 0 {
            Mode::Protocol
        } else if self.demo {
            Mode::Demo
        } else {
            Mode::OneShot
        }
    }

    /// Override config fields that were given on the command line.
    pub fn apply(&self, config: &mut EngineConfig) {
        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        if let Some(depth) = self.quiescence_depth {
            config.quiescence_depth = depth;
        }
        if let Some(secs) = self.time_limit_secs {
            config.time_limit_secs = secs;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;
