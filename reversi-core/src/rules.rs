//! Rules engine: legality, flips, move application and game termination
//!
//! Every function takes the board by reference and returns fresh values;
//! nothing here keeps state between calls.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Move, PieceCount, Side, DIRECTIONS, NUM_SQUARES};
use crate::error::GameError;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    BlackWins,
    WhiteWins,
    Draw,
}

impl GameResult {
    pub fn is_over(self) -> bool {
        self != GameResult::Ongoing
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            GameResult::BlackWins => Some(Side::Black),
            GameResult::WhiteWins => Some(Side::White),
            GameResult::Ongoing | GameResult::Draw => None,
        }
    }
}

/// What the side to move must do this ply
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnStatus {
    /// At least one legal placement exists
    Move,
    /// No legal placement, but the opponent has one
    Pass,
    /// Neither side can move
    GameOver(GameResult),
}

// ============================================================================
// LEGALITY
// ============================================================================

/// Canonical starting position
pub fn init_board() -> Board {
    Board::new()
}

/// Length of the opponent run captured in direction (dr, dc), 0 if none.
/// The run must be closed by one of `side`'s own discs before an empty
/// square or the board edge.
fn run_length(board: &Board, side: Side, square: Move, dr: i8, dc: i8) -> usize {
    let own = side.cell();
    let opponent = side.opponent().cell();

    let mut len = 0;
    let mut current = square.step(dr, dc);

    while let Some(pos) = current {
        match board.get(pos) {
            cell if cell == opponent => {
                len += 1;
                current = pos.step(dr, dc);
            }
            cell if cell == own => return len,
            _ => return 0,
        }
    }

    0
}

/// A placement is legal iff the square is empty and captures in at least
/// one direction.
pub fn is_legal(board: &Board, side: Side, square: Move) -> bool {
    if board.get(square) != Cell::Empty {
        return false;
    }

    DIRECTIONS
        .iter()
        .any(|&(dr, dc)| run_length(board, side, square, dr, dc) > 0)
}

/// All legal placements in ascending square order
pub fn legal_moves(board: &Board, side: Side) -> Vec<Move> {
    (0..NUM_SQUARES)
        .map(Move::at)
        .filter(|&sq| is_legal(board, side, sq))
        .collect()
}

pub fn has_any_move(board: &Board, side: Side) -> bool {
    (0..NUM_SQUARES).map(Move::at).any(|sq| is_legal(board, side, sq))
}

/// Squares a placement at `square` would flip, in ascending order.
/// Empty for an occupied square or a placement that captures nothing.
pub fn flips(board: &Board, side: Side, square: Move) -> Vec<Move> {
    if board.get(square) != Cell::Empty {
        return vec![];
    }

    let mut flipped = Vec::new();
    for &(dr, dc) in &DIRECTIONS {
        let len = run_length(board, side, square, dr, dc);
        let mut pos = square;
        for _ in 0..len {
            match pos.step(dr, dc) {
                Some(next) => {
                    flipped.push(next);
                    pos = next;
                }
                None => break,
            }
        }
    }

    flipped.sort_unstable();
    flipped
}

// ============================================================================
// APPLY MOVE
// ============================================================================

/// Apply a placement, returning the new board. The input board is never
/// touched, so a failed call leaves the caller's state as it was.
pub fn apply_move(board: &Board, side: Side, square: Move) -> Result<Board, GameError> {
    let flipped = flips(board, side, square);
    if flipped.is_empty() {
        return Err(GameError::IllegalMove { side, square });
    }

    let mut next = *board;
    next.set(square, side.cell());
    for pos in flipped {
        next.set(pos, side.cell());
    }

    Ok(next)
}

// ============================================================================
// TERMINATION
// ============================================================================

pub fn count_pieces(board: &Board) -> PieceCount {
    board.count()
}

/// Winner by disc majority, regardless of whether play could continue
pub fn result_by_count(count: PieceCount) -> GameResult {
    if count.black > count.white {
        GameResult::BlackWins
    } else if count.white > count.black {
        GameResult::WhiteWins
    } else {
        GameResult::Draw
    }
}

/// Terminal iff neither side has a legal move (a full board included)
pub fn check_winner(board: &Board) -> GameResult {
    if has_any_move(board, Side::Black) || has_any_move(board, Side::White) {
        return GameResult::Ongoing;
    }
    result_by_count(board.count())
}

/// Distinguishes a forced pass from the end of the game
pub fn turn_status(board: &Board, side: Side) -> TurnStatus {
    if has_any_move(board, side) {
        TurnStatus::Move
    } else if has_any_move(board, side.opponent()) {
        TurnStatus::Pass
    } else {
        TurnStatus::GameOver(result_by_count(board.count()))
    }
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Play up to `plies` moves, choosing by the given indices, passing
    /// when forced. Returns every board visited.
    fn playout(choices: &[usize]) -> Vec<Board> {
        let mut board = init_board();
        let mut side = Side::Black;
        let mut visited = vec![board];

        for &choice in choices {
            match turn_status(&board, side) {
                TurnStatus::GameOver(_) => break,
                TurnStatus::Pass => {}
                TurnStatus::Move => {
                    let moves = legal_moves(&board, side);
                    let mv = moves[choice % moves.len()];
                    board = apply_move(&board, side, mv).unwrap();
                    visited.push(board);
                }
            }
            side = side.opponent();
        }

        visited
    }

    proptest! {
        #[test]
        fn prop_piece_count_conservation(choices in prop::collection::vec(0usize..64, 0..70)) {
            for b in playout(&choices) {
                let count = count_pieces(&b);
                prop_assert_eq!(count.black as usize + count.white as usize + b.empty_count(), 64);
            }
        }

        #[test]
        fn prop_apply_is_deterministic(choices in prop::collection::vec(0usize..64, 0..40)) {
            let b = *playout(&choices).last().unwrap();
            for side in [Side::Black, Side::White] {
                for mv in legal_moves(&b, side) {
                    prop_assert_eq!(apply_move(&b, side, mv), apply_move(&b, side, mv));
                }
            }
        }

        #[test]
        fn prop_legal_moves_idempotent(choices in prop::collection::vec(0usize..64, 0..40)) {
            let b = *playout(&choices).last().unwrap();
            prop_assert_eq!(legal_moves(&b, Side::Black), legal_moves(&b, Side::Black));
            let moves = legal_moves(&b, Side::White);
            prop_assert!(moves.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn prop_flip_adds_exactly_placed_plus_flipped(
            choices in prop::collection::vec(0usize..64, 0..40)
        ) {
            let b = *playout(&choices).last().unwrap();
            for side in [Side::Black, Side::White] {
                let before = count_pieces(&b).of(side) as usize;
                for mv in legal_moves(&b, side) {
                    let flipped = flips(&b, side, mv);
                    let after = apply_move(&b, side, mv).unwrap();
                    prop_assert_eq!(
                        count_pieces(&after).of(side) as usize,
                        before + 1 + flipped.len()
                    );
                    for pos in flipped {
                        prop_assert_eq!(b.get(pos), side.opponent().cell());
                    }
                }
            }
        }

        #[test]
        fn prop_terminal_iff_no_moves(choices in prop::collection::vec(0usize..64, 0..80)) {
            for b in playout(&choices) {
                let stuck = legal_moves(&b, Side::Black).is_empty()
                    && legal_moves(&b, Side::White).is_empty();
                prop_assert_eq!(check_winner(&b).is_over(), stuck);
            }
        }
    }
}
