//! Reversi CLI - Command-line driver for heuristic self-play
//!
//! Commands:
//! - play: Play and render a single game
//! - match: Play a series of games and report statistics

mod match_cmd;
mod play_cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use reversi_core::SessionConfig;

#[derive(Parser)]
#[command(name = "reversi")]
#[command(about = "Reversi self-play with a single-ply heuristic policy")]
struct Cli {
    /// Random seed for reproducible games
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Session config JSON file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log every policy decision
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game
    Play(play_cmd::PlayArgs),
    /// Play a series of games
    Match(match_cmd::MatchArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref(), cli.seed)?;

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, config),
        Commands::Match(args) => match_cmd::run(args, config),
    }
}

/// File config first, then the command-line seed on top
fn load_config(path: Option<&std::path::Path>, seed: Option<u64>) -> Result<SessionConfig> {
    let mut config = match path {
        Some(p) => SessionConfig::load(p)?,
        None => SessionConfig::default(),
    };
    if let Some(s) = seed {
        config = config.with_seed(s);
    }
    Ok(config)
}
