//! UCI session: reads commands line by line and drives the engine.
//!
//! `go` runs the search on a background thread so that `stop`, `isready` and
//! `quit` are answered while it thinks. The thread writes its own `info` and
//! `bestmove` lines through the shared output handle.

use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chess_core::{
    move_to_uci, set_position_from_uci, ChessError, Color, Engine, Move, Position, SearchLimits,
    SearchResult, TimeControl,
};
use classical_engine::{mate_in_moves, ClassicalEngine};
use tracing::{debug, warn};

use crate::commands::{parse_command, CommandError, GoParams, UciCommand};

pub const ENGINE_AUTHOR: &str = "ML-chess";

/// Depth used by `go infinite`; only `stop` ends such a search.
pub const INFINITE_DEPTH: u8 = 64;
/// Smallest time budget handed to a clocked search.
pub const MIN_THINK_TIME: Duration = Duration::from_millis(10);

/// Depth and time budget for one `go`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPlan {
    pub depth: u8,
    pub time: Option<Duration>,
}

/// Work out the depth and time budget of a `go` for `side`.
///
/// With a clock for the side to move the depth comes from the remaining time
/// (more than 10 s: 7 plies, more than 6 s: 6, otherwise 5) and the budget is
/// a twentieth of it plus half the increment. An explicit `depth` or
/// `movetime` wins over the clock.
pub fn plan_search(
    params: &GoParams,
    side: Color,
    default_depth: u8,
    overhead: Duration,
) -> SearchPlan {
    let (remaining, increment) = match side {
        Color::White => (params.wtime, params.winc),
        Color::Black => (params.btime, params.binc),
    };

    let tier = remaining.map(|ms| match ms {
        ms if ms > 10_000 => 7,
        ms if ms > 6_000 => 6,
        _ => 5,
    });
    let depth = match (params.depth, tier) {
        (Some(depth), _) => depth.max(1),
        (None, _) if params.infinite => INFINITE_DEPTH,
        (None, Some(tier)) => tier,
        (None, None) => default_depth,
    };

    let budget = |ms: u64| {
        Duration::from_millis(ms)
            .saturating_sub(overhead)
            .max(MIN_THINK_TIME)
    };
    let time = if params.infinite {
        None
    } else if let Some(ms) = params.movetime {
        Some(budget(ms))
    } else {
        remaining.map(|ms| budget(ms / 20 + increment.unwrap_or(0) / 2))
    };

    SearchPlan { depth, time }
}

/// Score as UCI expects it: from the side to move, `cp` or `mate`.
pub fn format_score(score: i32, side: Color) -> String {
    let sign = match side {
        Color::White => 1,
        Color::Black => -1,
    };
    match mate_in_moves(score) {
        Some(moves) => format!("mate {}", moves * sign),
        None => format!("cp {}", score * sign),
    }
}

/// Principal variation in coordinate notation, cut at the first move that is
/// not legal in the line.
pub fn pv_to_uci(pos: &Position, pv: &[Move]) -> Vec<String> {
    let mut line = pos.clone();
    let mut out = Vec::with_capacity(pv.len());
    for &mv in pv {
        if !line.is_legal(mv) {
            break;
        }
        out.push(move_to_uci(line.board(), mv));
        line.make_move(mv);
    }
    out
}

fn info_line(pos: &Position, result: &SearchResult, elapsed: Duration) -> String {
    let mut line = format!(
        "info depth {} score {} nodes {} time {}",
        result.depth,
        format_score(result.score, pos.side_to_move()),
        result.nodes,
        elapsed.as_millis()
    );
    let pv = pv_to_uci(pos, &result.pv);
    if !pv.is_empty() {
        line.push_str(" pv ");
        line.push_str(&pv.join(" "));
    }
    line
}

fn write_line<W: Write>(out: &Mutex<W>, line: &str) -> io::Result<()> {
    let mut out = out.lock().unwrap_or_else(PoisonError::into_inner);
    writeln!(out, "{line}")?;
    out.flush()
}

struct RunningSearch {
    handle: JoinHandle<()>,
    time_control: TimeControl,
}

pub struct UciSession<W: Write + Send + 'static> {
    engine: Arc<Mutex<ClassicalEngine>>,
    out: Arc<Mutex<W>>,
    position: Position,
    debug: bool,
    search: Option<RunningSearch>,
}

impl<W: Write + Send + 'static> UciSession<W> {
    pub fn new(engine: ClassicalEngine, out: W) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            out: Arc::new(Mutex::new(out)),
            position: Position::startpos(),
            debug: false,
            search: None,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Shared output handle (tests read what the session wrote).
    pub fn output(&self) -> Arc<Mutex<W>> {
        Arc::clone(&self.out)
    }

    fn engine(&self) -> MutexGuard<'_, ClassicalEngine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn send(&self, line: &str) -> io::Result<()> {
        write_line(&self.out, line)
    }

    /// Read commands until `quit` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        for line in input.lines() {
            if !self.handle_line(&line?)? {
                return Ok(());
            }
        }
        self.shutdown();
        Ok(())
    }

    /// Handle one input line. Returns `false` after `quit`.
    pub fn handle_line(&mut self, line: &str) -> io::Result<bool> {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(CommandError::Empty) => return Ok(true),
            Err(err) => {
                warn!(%err, line, "ignoring command");
                return Ok(true);
            }
        };
        debug!(?command, "uci command");

        match command {
            UciCommand::Uci => {
                // The search thread holds the engine until it finishes.
                self.stop_search();
                let engine = self.engine();
                self.send(&format!("id name {}", engine.name()))?;
                self.send(&format!("id author {ENGINE_AUTHOR}"))?;
                for option in engine.options() {
                    self.send(&option)?;
                }
                drop(engine);
                self.send("uciok")?;
            }
            UciCommand::IsReady => self.send("readyok")?,
            UciCommand::Debug(on) => self.debug = on,
            UciCommand::UciNewGame => {
                self.stop_search();
                self.position = Position::startpos();
                self.engine().new_game();
            }
            UciCommand::SetOption { name, value } => {
                self.stop_search();
                self.set_option(&name, value.as_deref().unwrap_or(""))?;
            }
            UciCommand::Position(args) => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                match set_position_from_uci(&args) {
                    Ok(pos) => self.position = pos,
                    Err((pos, err)) => {
                        warn!(%err, "bad position command");
                        self.position = pos;
                        self.send(&format!("info string {err}"))?;
                    }
                }
            }
            UciCommand::Go(params) => self.go(&params),
            UciCommand::Stop => self.stop_search(),
            UciCommand::Quit => {
                self.shutdown();
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn set_option(&mut self, name: &str, value: &str) -> io::Result<()> {
        let result = self.engine().set_option(name, value);
        match result {
            Ok(()) => {
                debug!(name, value, "option set");
                Ok(())
            }
            Err(ChessError::UnknownOption { name }) => {
                self.send(&format!("info string Unsupported option: {name}"))
            }
            Err(err) => self.send(&format!("info string {err}")),
        }
    }

    fn go(&mut self, params: &GoParams) {
        self.stop_search();

        let pos = self.position.clone();
        let (depth, overhead) = {
            let engine = self.engine();
            (engine.config().depth, engine.config().move_overhead())
        };
        let plan = plan_search(params, pos.side_to_move(), depth, overhead);
        debug!(depth = plan.depth, time = ?plan.time, "starting search");

        let limits = match plan.time {
            Some(time) => SearchLimits::depth_and_time(plan.depth, time),
            None => SearchLimits::depth(plan.depth),
        };
        // Start the clock here so a `stop` that arrives before the worker
        // thread runs is still seen.
        limits.start();
        let time_control = limits.time_control.clone();

        let engine = Arc::clone(&self.engine);
        let out = Arc::clone(&self.out);
        let debug = self.debug;
        let handle = thread::spawn(move || {
            let started = Instant::now();
            let (result, tt_entries) = {
                let mut engine = engine.lock().unwrap_or_else(PoisonError::into_inner);
                let result = engine.search(&pos, limits);
                let entries = engine.transposition_table().len();
                (result, entries)
            };
            if let Err(err) = report(&out, &pos, &result, started.elapsed(), debug, tt_entries) {
                warn!(%err, "failed to write search result");
            }
        });

        self.search = Some(RunningSearch {
            handle,
            time_control,
        });
    }

    /// Block until the running search (if any) has printed its `bestmove`.
    pub fn wait_for_search(&mut self) {
        if let Some(search) = self.search.take() {
            if search.handle.join().is_err() {
                warn!("search thread panicked");
            }
        }
    }

    fn stop_search(&mut self) {
        if let Some(search) = &self.search {
            search.time_control.stop();
        }
        self.wait_for_search();
    }

    fn shutdown(&mut self) {
        self.stop_search();
        self.engine().new_game();
    }
}

impl<W: Write + Send + 'static> Drop for UciSession<W> {
    fn drop(&mut self) {
        self.stop_search();
    }
}

fn report<W: Write>(
    out: &Mutex<W>,
    pos: &Position,
    result: &SearchResult,
    elapsed: Duration,
    debug: bool,
    tt_entries: usize,
) -> io::Result<()> {
    let Some(best) = result.best_move else {
        return write_line(out, "bestmove 0000");
    };

    write_line(out, &info_line(pos, result, elapsed))?;
    if debug {
        write_line(
            out,
            &format!(
                "info string nodes {} qnodes {} tthits {} ttentries {} stopped {}",
                result.nodes, result.qnodes, result.tt_hits, tt_entries, result.stopped
            ),
        )?;
    }
    write_line(out, &format!("bestmove {}", move_to_uci(pos.board(), best)))
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod protocol_tests;
