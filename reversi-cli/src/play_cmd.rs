//! Play command - run and render one self-play game

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use reversi_core::{Board, GameSession, GameStatus, Ply, SessionConfig, StepOutcome};

#[derive(Args)]
pub struct PlayArgs {
    /// Pause between plies, in milliseconds
    #[arg(long, default_value = "0")]
    pub delay_ms: u64,

    /// Start from a text board (8 rows of `.`, `X`, `O`) instead of the opening
    #[arg(long, value_name = "FILE")]
    pub position: Option<PathBuf>,

    /// Only print the final result
    #[arg(long)]
    pub quiet: bool,

    /// Output the game record as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: PlayArgs, config: SessionConfig) -> Result<()> {
    let mut session = match &args.position {
        Some(path) => GameSession::with_board(config, load_position(path)?),
        None => GameSession::new(config),
    };

    session.start()?;
    let render = !args.quiet && !args.json;
    if render {
        print!("{}", session.board());
    }

    while session.status() == GameStatus::InProgress {
        let outcome = session.step()?;
        if render {
            print_outcome(&outcome, session.board());
        }
        if args.delay_ms > 0 {
            thread::sleep(Duration::from_millis(args.delay_ms));
        }
    }

    if args.json {
        print_json_record(&session)?;
    } else {
        let count = session.piece_count();
        println!(
            "Result: {:?}  black {} - white {}  ({} plies)",
            session.result(),
            count.black,
            count.white,
            session.history().len()
        );
    }

    Ok(())
}

fn load_position(path: &Path) -> Result<Board> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read position: {}", path.display()))?;
    let board = text
        .parse::<Board>()
        .with_context(|| format!("Failed to parse position: {}", path.display()))?;
    Ok(board)
}

fn print_outcome(outcome: &StepOutcome, board: &Board) {
    match outcome {
        StepOutcome::Placed { side, square, flipped } => {
            let count = board.count();
            println!(
                "\n{} plays {} (flips {})  black {} - white {}",
                side, square, flipped, count.black, count.white
            );
            print!("{}", board);
        }
        StepOutcome::Passed { side } => println!("\n{} passes", side),
        StepOutcome::Finished(_) => {}
    }
}

fn print_json_record(session: &GameSession) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonGame<'a> {
        result: String,
        black: u8,
        white: u8,
        final_board: Vec<String>,
        plies: &'a [Ply],
    }

    let count = session.piece_count();
    let output = JsonGame {
        result: format!("{:?}", session.result()),
        black: count.black,
        white: count.white,
        final_board: session.board().to_string().lines().map(String::from).collect(),
        plies: session.history(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
