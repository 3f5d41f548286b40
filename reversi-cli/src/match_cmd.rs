//! Match command - play a series of self-play games
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use reversi_core::{GameResult, GameSession, SessionConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Play games on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    seed: u64,
    result: GameResult,
    plies: usize,
    black_discs: u8,
    white_discs: u8,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    black_wins: usize,
    white_wins: usize,
    draws: usize,
    avg_plies: f32,
    /// Mean of (black discs - white discs)
    avg_margin: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
pub fn run(args: MatchArgs, config: SessionConfig) -> Result<()> {
    tracing::info!(
        "Starting match: {} games{}",
        args.games,
        if args.parallel { " (parallel)" } else { "" }
    );

    let results = play_match(&args, &config)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in the match, each with its own derived seed
fn play_match(args: &MatchArgs, config: &SessionConfig) -> Result<MatchResults> {
    let mut rng = create_rng(config.seed);
    let seeds: Vec<u64> = (0..args.games).map(|_| rng.gen()).collect();

    let games = if args.parallel {
        seeds
            .par_iter()
            .enumerate()
            .map(|(i, &seed)| play_single_game(i + 1, seed, config))
            .collect::<Result<Vec<_>>>()?
    } else {
        seeds
            .iter()
            .enumerate()
            .map(|(i, &seed)| play_single_game(i + 1, seed, config))
            .collect::<Result<Vec<_>>>()?
    };

    for record in &games {
        tracing::info!(
            "Game {}: {:?} ({}-{}, {} plies)",
            record.game_number,
            record.result,
            record.black_discs,
            record.white_discs,
            record.plies
        );
    }

    Ok(compute_match_statistics(games))
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn play_single_game(game_number: usize, seed: u64, config: &SessionConfig) -> Result<GameRecord> {
    let mut session = GameSession::new(config.clone().with_seed(seed));
    session.start()?;
    let result = session.run_to_end()?;
    let count = session.piece_count();

    Ok(GameRecord {
        game_number,
        seed,
        result,
        plies: session.history().len(),
        black_discs: count.black,
        white_discs: count.white,
    })
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let black_wins = games
        .iter()
        .filter(|g| g.result == GameResult::BlackWins)
        .count();
    let white_wins = games
        .iter()
        .filter(|g| g.result == GameResult::WhiteWins)
        .count();
    let draws = games
        .iter()
        .filter(|g| g.result == GameResult::Draw)
        .count();

    let (avg_plies, avg_margin) = if games.is_empty() {
        (0.0, 0.0)
    } else {
        let n = games.len() as f32;
        let plies: usize = games.iter().map(|g| g.plies).sum();
        let margin: i32 = games
            .iter()
            .map(|g| g.black_discs as i32 - g.white_discs as i32)
            .sum();
        (plies as f32 / n, margin as f32 / n)
    };

    MatchResults {
        games,
        black_wins,
        white_wins,
        draws,
        avg_plies,
        avg_margin,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn rate(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        seed: u64,
        result: String,
        plies: usize,
        black_discs: u8,
        white_discs: u8,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        black_wins: usize,
        white_wins: usize,
        draws: usize,
        avg_plies: f32,
        avg_margin: f32,
        black_win_rate: f32,
        games: Vec<JsonGame>,
    }

    let total = results.games.len();
    let output = JsonOutput {
        total_games: total,
        black_wins: results.black_wins,
        white_wins: results.white_wins,
        draws: results.draws,
        avg_plies: results.avg_plies,
        avg_margin: results.avg_margin,
        black_win_rate: rate(results.black_wins, total),
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                seed: g.seed,
                result: format!("{:?}", g.result),
                plies: g.plies,
                black_discs: g.black_discs,
                white_discs: g.white_discs,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    println!(
        "Black wins:  {} ({:.1}%)",
        results.black_wins,
        rate(results.black_wins, total) * 100.0
    );
    println!(
        "White wins:  {} ({:.1}%)",
        results.white_wins,
        rate(results.white_wins, total) * 100.0
    );
    println!(
        "Draws:       {} ({:.1}%)",
        results.draws,
        rate(results.draws, total) * 100.0
    );
    println!("Avg plies:   {:.1}", results.avg_plies);
    println!("Avg margin:  {:+.1} (black - white)", results.avg_margin);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {:?} {}-{} in {} plies (seed {})",
            game.game_number,
            game.result,
            game.black_discs,
            game.white_discs,
            game.plies,
            game.seed
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
