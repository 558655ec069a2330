//! UCI command parsing.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciCommand {
    Uci,
    IsReady,
    UciNewGame,
    Debug(bool),
    SetOption { name: String, value: Option<String> },
    /// Raw tokens after `position`
    Position(Vec<String>),
    Go(GoParams),
    Stop,
    Quit,
}

/// Parameters of a `go` command. Times are in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub movestogo: Option<u32>,
    pub depth: Option<u8>,
    pub movetime: Option<u64>,
    pub infinite: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("{0} requires a value")]
    MissingValue(String),

    #[error("invalid {field} value: {value}")]
    InvalidValue { field: String, value: String },

    #[error("malformed {0} command")]
    Malformed(&'static str),
}

pub fn parse_command(line: &str) -> Result<UciCommand, CommandError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, rest)) = parts.split_first() else {
        return Err(CommandError::Empty);
    };

    match head {
        "uci" => Ok(UciCommand::Uci),
        "isready" => Ok(UciCommand::IsReady),
        "ucinewgame" => Ok(UciCommand::UciNewGame),
        "stop" => Ok(UciCommand::Stop),
        "quit" => Ok(UciCommand::Quit),
        "debug" => match rest {
            ["on"] => Ok(UciCommand::Debug(true)),
            ["off"] => Ok(UciCommand::Debug(false)),
            _ => Err(CommandError::Malformed("debug")),
        },
        "setoption" => parse_setoption(rest),
        "position" => Ok(UciCommand::Position(
            rest.iter().map(|s| s.to_string()).collect(),
        )),
        "go" => parse_go(rest).map(UciCommand::Go),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

/// `name <words...> [value <words...>]`
fn parse_setoption(parts: &[&str]) -> Result<UciCommand, CommandError> {
    if parts.len() < 2 || parts[0] != "name" {
        return Err(CommandError::Malformed("setoption"));
    }
    let value_pos = parts.iter().position(|&p| p == "value");
    let name_end = value_pos.unwrap_or(parts.len());
    if name_end <= 1 {
        return Err(CommandError::Malformed("setoption"));
    }

    let name = parts[1..name_end].join(" ");
    let value = value_pos
        .map(|pos| parts[pos + 1..].join(" "))
        .filter(|v| !v.is_empty());
    Ok(UciCommand::SetOption { name, value })
}

fn parse_value<T: std::str::FromStr>(
    field: &str,
    value: Option<&&str>,
) -> Result<T, CommandError> {
    let value = value.ok_or_else(|| CommandError::MissingValue(format!("go {field}")))?;
    value.parse().map_err(|_| CommandError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Clock values may arrive negative from some GUIs; that means no time left.
fn parse_clock(field: &str, value: Option<&&str>) -> Result<u64, CommandError> {
    let ms: i64 = parse_value(field, value)?;
    Ok(ms.max(0) as u64)
}

/// Unknown `go` tokens (`ponder`, `nodes`, `searchmoves` ...) are skipped.
fn parse_go(parts: &[&str]) -> Result<GoParams, CommandError> {
    let mut params = GoParams::default();
    let mut iter = parts.iter();

    while let Some(&token) = iter.next() {
        match token {
            "infinite" => params.infinite = true,
            "wtime" => params.wtime = Some(parse_clock(token, iter.next())?),
            "btime" => params.btime = Some(parse_clock(token, iter.next())?),
            "winc" => params.winc = Some(parse_clock(token, iter.next())?),
            "binc" => params.binc = Some(parse_clock(token, iter.next())?),
            "movetime" => params.movetime = Some(parse_clock(token, iter.next())?),
            "movestogo" => params.movestogo = Some(parse_value(token, iter.next())?),
            "depth" => params.depth = Some(parse_value(token, iter.next())?),
            _ => {}
        }
    }
    Ok(params)
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod commands_tests;
