use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use stackfall_engine::{Position, Session, SessionConfig, SessionState, SessionStats};
use tracing::{Level, info};
use tracing_subscriber::{filter::LevelFilter, prelude::*};

use crate::util;

use self::{run::RunArg, soak::SoakArg};

mod run;
mod soak;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v = INFO, -vv = DEBUG, -vvv = TRACE)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a scripted sequence of actions and print the field
    Run(#[clap(flatten)] RunArg),
    /// Play random actions from a seeded generator until game over
    Soak(#[clap(flatten)] SoakArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.verbose);
    match args.mode {
        Mode::Run(arg) => run::run(&arg)?,
        Mode::Soak(arg) => soak::run(&arg)?,
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(LevelFilter::from_level(level))
        .init();
}

/// Field size and spawn options shared by every mode.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct FieldArg {
    /// Session config JSON file; the options below override its values
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    #[arg(long, allow_hyphen_values = true)]
    spawn_x: Option<i32>,
    #[arg(long, allow_hyphen_values = true)]
    spawn_y: Option<i32>,
}

impl FieldArg {
    pub(crate) fn session_config(&self) -> anyhow::Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_config_file(path)?,
            None => SessionConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(spawn_x) = self.spawn_x {
            config.spawn_x = Some(spawn_x);
        }
        if let Some(spawn_y) = self.spawn_y {
            config.spawn_y = spawn_y;
        }
        Ok(config)
    }

    pub(crate) fn new_session(&self) -> anyhow::Result<Session> {
        let config = self.session_config()?;
        let session = Session::new(config)?;
        let Position { x, y } = session.config().spawn_position()?;
        info!(
            width = config.width,
            height = config.height,
            spawn_x = x,
            spawn_y = y,
            "session started"
        );
        Ok(session)
    }
}

/// Final state of a session, printed by `--json`.
#[derive(Debug, Serialize)]
pub(crate) struct SessionSummary<'a> {
    config: &'a SessionConfig,
    state: SessionState,
    stats: &'a SessionStats,
    /// Field rows, top first, as color glyphs.
    field: Vec<String>,
}

impl<'a> SessionSummary<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self {
            config: session.config(),
            state: session.state(),
            stats: session.stats(),
            field: session
                .field()
                .to_color_string()
                .lines()
                .map(str::to_owned)
                .collect(),
        }
    }
}

pub(crate) fn print_status(session: &Session) {
    let stats = session.stats();
    println!(
        "state: {:?}, ticks: {}, landed: {}, score: {}",
        session.state(),
        stats.ticks(),
        stats.landed_pieces(),
        session.score(),
    );
}
