//! UCI front end and command-line driver for the classical engine.

pub mod cli;
pub mod commands;
pub mod demo;
pub mod logging;
pub mod protocol;

pub use cli::{usage, CliError, CliOptions, Mode};
pub use commands::{parse_command, CommandError, GoParams, UciCommand};
pub use protocol::{plan_search, SearchPlan, UciSession};
