//! Catchme-Rust: a turn-based grid chase game.
//!
//! ## Usage
//!
//! - `catchme` - Play a versus round with default options
//! - `catchme play --mode solo` - Play against the pursuit AI
//! - `catchme play --map FILE` - Play on a saved map
//! - `catchme map --seed 7` - Print a generated map
//! - `catchme options` - List options and their defaults
//!
//! Set `RUST_LOG=debug` to trace moves, bonuses and placement on stderr.

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};

use catchme_rust::config::Settings;
use catchme_rust::constants::DEFAULT_TURNS;
use catchme_rust::map::export_map;
use catchme_rust::round::{Mode, Round};
use catchme_rust::session::Session;

/// Catchme-Rust: catch the other player before the turns run out
#[derive(Parser)]
#[command(name = "catchme")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a round, reading keys and commands from stdin
    Play(PlayArgs),
    /// Print a freshly generated map
    Map(LayoutArgs),
    /// List every option with its default value
    Options,
}

#[derive(Copy, Clone, Default, ValueEnum)]
enum ModeArg {
    #[default]
    Versus,
    Solo,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Versus => Mode::Versus,
            ModeArg::Solo => Mode::Solo,
        }
    }
}

/// Options shared by every command that lays out a grid.
#[derive(Args, Default)]
struct LayoutArgs {
    /// Playable width
    #[arg(long)]
    width: Option<usize>,
    /// Playable height
    #[arg(long)]
    height: Option<usize>,
    /// Difficulty: 1/easy or 2/hard
    #[arg(long)]
    difficulty: Option<String>,
    /// Seed for obstacle and bonus placement
    #[arg(long)]
    seed: Option<u64>,
    /// Any other option, as NAME=VALUE (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    overrides: Vec<String>,
}

impl LayoutArgs {
    fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::default();
        if let Some(width) = self.width {
            settings.set_by_name("width", &width.to_string())?;
        }
        if let Some(height) = self.height {
            settings.set_by_name("height", &height.to_string())?;
        }
        if let Some(difficulty) = &self.difficulty {
            settings.set_by_name("difficulty", difficulty)?;
        }
        for item in &self.overrides {
            let (name, value) = item
                .split_once('=')
                .ok_or_else(|| anyhow!("--set expects NAME=VALUE, got `{item}`"))?;
            settings
                .set_by_name(name, value)
                .with_context(|| format!("invalid --set {item}"))?;
        }
        settings.seed = self.seed;
        Ok(settings)
    }
}

#[derive(Args, Default)]
struct PlayArgs {
    #[command(flatten)]
    layout: LayoutArgs,
    /// Who controls the second player
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    /// Number of turns before the round is a draw
    #[arg(long)]
    turns: Option<u32>,
    /// Start from a map file instead of a generated layout
    #[arg(long)]
    map: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Play(args)) => play(args),
        Some(Commands::Map(args)) => {
            let settings = args.settings()?;
            let round = Round::new(settings, Mode::Versus, DEFAULT_TURNS)?;
            print!("{}", export_map(round.grid(), &round.settings().tokens));
            Ok(())
        }
        Some(Commands::Options) => {
            for (index, name, value) in Settings::default().entries() {
                println!("{index:>2} {name} = {value}");
            }
            Ok(())
        }
        None => play(PlayArgs::default()),
    }
}

fn play(args: PlayArgs) -> Result<()> {
    let settings = args.layout.settings()?;
    let mode = args.mode.unwrap_or_default().into();
    let turns = args.turns.unwrap_or(DEFAULT_TURNS);

    let mut session = match &args.map {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read map: {}", path.display()))?;
            Session::from_map(settings, mode, turns, &text)
                .with_context(|| format!("invalid map: {}", path.display()))?
        }
        None => Session::new(settings, mode, turns)?,
    };

    session
        .run(io::stdin().lock(), io::stdout())
        .context("session I/O failed")?;
    Ok(())
}
