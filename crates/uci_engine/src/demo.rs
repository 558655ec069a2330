//! One-shot analysis and engine-vs-engine demo games.

use std::io::Write;
use std::time::Instant;

use anyhow::{Context, Result};
use chess_core::{move_to_san, Color, DrawReason, Engine, Move, Outcome, Position, SearchLimits};
use classical_engine::{ClassicalEngine, EngineConfig};
use tracing::info;

/// Limits for one move under `config`.
pub fn limits_for(config: &EngineConfig) -> SearchLimits {
    match config.time_limit() {
        Some(limit) => SearchLimits::depth_and_time(config.depth, limit),
        None => SearchLimits::depth(config.depth),
    }
}

/// Numbered SAN transcript of `moves` played from `start`.
///
/// Numbering follows the position's full-move counter; a game that starts
/// with Black to move opens with `N... move`.
pub fn transcript(start: &Position, moves: &[Move]) -> String {
    let mut pos = start.clone();
    let mut parts = Vec::with_capacity(moves.len() + moves.len() / 2 + 1);

    for (i, &mv) in moves.iter().enumerate() {
        let number = pos.board().fullmove_number();
        match pos.side_to_move() {
            Color::White => parts.push(format!("{number}.")),
            Color::Black if i == 0 => parts.push(format!("{number}...")),
            Color::Black => {}
        }
        parts.push(move_to_san(&pos, mv));
        pos.make_move(mv);
    }
    parts.join(" ")
}

/// PGN-style result token for a finished game.
pub fn result_token(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Checkmate { loser: Color::Black } => "1-0",
        Outcome::Checkmate { loser: Color::White } => "0-1",
        Outcome::Draw(_) => "1/2-1/2",
        Outcome::Ongoing => "*",
    }
}

fn describe(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Ongoing => "game in progress",
        Outcome::Checkmate { .. } => "checkmate",
        Outcome::Draw(DrawReason::Stalemate) => "stalemate",
        Outcome::Draw(DrawReason::FiftyMoveRule) => "draw by the fifty-move rule",
        Outcome::Draw(DrawReason::ThreefoldRepetition) => "draw by threefold repetition",
        Outcome::Draw(DrawReason::InsufficientMaterial) => "draw by insufficient material",
    }
}

/// Search `pos` once and return the chosen move, `None` when the game is
/// already over.
fn think<W: Write>(
    engine: &mut ClassicalEngine,
    pos: &Position,
    mute: bool,
    out: &mut W,
) -> Result<Option<Move>> {
    let limits = limits_for(engine.config());
    let started = Instant::now();
    let result = engine.search(pos, limits);
    let elapsed = started.elapsed();

    info!(
        depth = result.depth,
        score = result.score,
        nodes = result.nodes,
        stopped = result.stopped,
        "search finished"
    );
    if !mute && result.best_move.is_some() {
        let config = engine.config();
        writeln!(out, "Execution time: {:.3} seconds", elapsed.as_secs_f64())?;
        writeln!(out, "eval: {}", result.score)?;
        writeln!(
            out,
            "Engine depth: {} (reached {}), q_depth: {}, time_limit: {}s",
            config.depth, result.depth, config.quiescence_depth, config.time_limit_secs
        )?;
    }
    Ok(result.best_move)
}

/// One-shot mode: print the engine's move for `pos` in SAN.
pub fn analyze<W: Write>(
    engine: &mut ClassicalEngine,
    pos: &Position,
    mute: bool,
    out: &mut W,
) -> Result<Option<Move>> {
    let chosen = think(engine, pos, mute, out).context("search failed")?;
    match chosen {
        Some(mv) => writeln!(out, "{}", move_to_san(pos, mv))?,
        None => writeln!(out, "no legal moves: {}", describe(pos.outcome()))?,
    }
    out.flush()?;
    Ok(chosen)
}

/// Demo mode: the engine plays both sides from `start` until the game ends,
/// then prints the transcript. Returns the final position.
pub fn play_demo<W: Write>(
    engine: &mut ClassicalEngine,
    start: &Position,
    mute: bool,
    out: &mut W,
) -> Result<Position> {
    if !mute {
        let config = engine.config();
        writeln!(
            out,
            "Running in demo mode with depth {}, q_depth {}, time_limit {}s, engine vs engine.",
            config.depth, config.quiescence_depth, config.time_limit_secs
        )?;
    }

    let mut pos = start.clone();
    let mut moves = Vec::new();
    while !pos.outcome().is_over() {
        let Some(mv) = think(engine, &pos, mute, out)? else {
            break;
        };
        if !mute {
            writeln!(out, "{}", move_to_san(&pos, mv))?;
            writeln!(out)?;
        }
        pos.make_move(mv);
        moves.push(mv);
    }

    let outcome = pos.outcome();
    let record = transcript(start, &moves);
    if record.is_empty() {
        writeln!(out, "{}", result_token(outcome))?;
    } else {
        writeln!(out, "{record} {}", result_token(outcome))?;
    }
    if !mute {
        writeln!(out, "{}", describe(outcome))?;
    }
    out.flush()?;
    Ok(pos)
}

#[cfg(test)]
#[path = "demo_tests.rs"]
mod demo_tests;
