//! Error taxonomy for the rules engine, policy and session

use thiserror::Error;

use crate::board::{Move, Side};
use crate::session::GameStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Placement fails the capture rule or targets an occupied square
    #[error("illegal move for {side} at {square}")]
    IllegalMove { side: Side, square: Move },

    /// Forced pass: the side to move has nothing to play
    #[error("{side} has no legal move")]
    NoLegalMove { side: Side },

    #[error("square index {0} is out of range (0..64)")]
    SquareOutOfRange(usize),

    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error("cannot {action} while the game is {from:?}")]
    InvalidTransition { from: GameStatus, action: &'static str },
}
