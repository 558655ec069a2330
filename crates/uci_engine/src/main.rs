use std::env;
use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chess_core::Position;
use classical_engine::{ClassicalEngine, EngineConfig};
use tracing::error;
use uci_engine::{demo, logging, usage, CliOptions, Mode, UciSession};

fn main() -> ExitCode {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "uci_engine".to_string());
    let args: Vec<String> = args.collect();

    let options = match CliOptions::parse(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("{}", usage(&program));
            return ExitCode::from(1);
        }
    };
    logging::init(options.mute);

    match run(&options, options.mode(args.len()), &program) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(options: &CliOptions, mode: Mode, program: &str) -> Result<ExitCode> {
    let mut config = match &options.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    options.apply(&mut config);
    config.validate().context("invalid engine settings")?;

    if mode == Mode::Protocol {
        // Protocol clocks come from `go`; the per-move limit is for CLI play.
        config.time_limit_secs = 0.0;
        let engine = ClassicalEngine::new(config).context("starting engine")?;
        let mut session = UciSession::new(engine, io::stdout());
        session
            .run(io::stdin().lock())
            .context("reading UCI commands")?;
        return Ok(ExitCode::SUCCESS);
    }

    let pos = match options.fen.as_deref() {
        Some(fen) => match Position::from_fen(fen) {
            Ok(pos) => pos,
            Err(err) => {
                eprintln!("{err}");
                eprintln!("{}", usage(program));
                return Ok(ExitCode::from(1));
            }
        },
        None => Position::startpos(),
    };

    let mut engine = ClassicalEngine::new(config).context("starting engine")?;
    let mut stdout = io::stdout().lock();
    match mode {
        Mode::Demo => {
            demo::play_demo(&mut engine, &pos, options.mute, &mut stdout)?;
        }
        _ => {
            demo::analyze(&mut engine, &pos, options.mute, &mut stdout)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
