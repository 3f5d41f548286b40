//! Reversi Core - Rules engine and heuristic self-play
//!
//! This crate provides the core game logic for Reversi/Othello:
//! - Board representation (8x8 cells, indexed `row * 8 + col`)
//! - Legal move generation, flips and move application
//! - Terminal detection and scoring
//! - Single-ply heuristic move selection
//! - A self-play session state machine around the stateless core

pub mod board;
pub mod config;
pub mod error;
pub mod policy;
pub mod rules;
pub mod session;

// Re-exports for convenient access
pub use board::{Board, Cell, Move, PieceCount, Side, BOARD_SIZE, DIRECTIONS, NUM_SQUARES};
pub use config::SessionConfig;
pub use error::GameError;
pub use policy::{
    select_move, select_move_with_tier, HeuristicPlayer, Tier, CORNERS, ENDGAME_THRESHOLD,
    X_SQUARES,
};
pub use rules::{
    apply_move, check_winner, count_pieces, flips, has_any_move, init_board, is_legal, legal_moves,
    result_by_count, turn_status, GameResult, TurnStatus,
};
pub use session::{GameSession, GameStatus, Ply, StepOutcome};
