//! Single-ply heuristic move selection
//!
//! The policy looks exactly one ply ahead:
//! - endgame (more than 48 discs): grab the most discs right now
//! - otherwise, if no candidate hands the opponent a corner reply: take a
//!   corner if one is playable, else avoid X-squares and minimize the
//!   opponent's reply count
//! - otherwise: minimize the opponent's reply count over all candidates
//!
//! Ties are broken uniformly at random with the caller's generator.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{Board, Move, Side};
use crate::error::GameError;
use crate::rules::{apply_move, count_pieces, legal_moves};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Disc total above which the greedy endgame rule applies
pub const ENDGAME_THRESHOLD: u8 = 48;

/// Corner squares
pub const CORNERS: [usize; 4] = [0, 7, 56, 63];

/// Squares diagonally adjacent to a corner
pub const X_SQUARES: [usize; 4] = [9, 14, 49, 54];

/// Which rule produced a decision
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Maximize own disc count after the move
    Endgame,
    /// Play a corner
    Corner,
    /// Minimize opponent replies, X-squares excluded
    SafeMobility,
    /// Minimize opponent replies over every candidate
    Mobility,
}

fn is_corner(mv: Move) -> bool {
    CORNERS.contains(&mv.index())
}

fn is_x_square(mv: Move) -> bool {
    X_SQUARES.contains(&mv.index())
}

// ============================================================================
// SELECTION
// ============================================================================

/// Pick a move for `side`. Fails with `NoLegalMove` when the side must pass.
pub fn select_move<R: Rng + ?Sized>(
    board: &Board,
    side: Side,
    rng: &mut R,
) -> Result<Move, GameError> {
    select_move_with_tier(board, side, rng).map(|(mv, _)| mv)
}

/// Like [`select_move`], also reporting which rule decided
pub fn select_move_with_tier<R: Rng + ?Sized>(
    board: &Board,
    side: Side,
    rng: &mut R,
) -> Result<(Move, Tier), GameError> {
    let candidates = legal_moves(board, side);
    if candidates.is_empty() {
        return Err(GameError::NoLegalMove { side });
    }

    let (pool, tier) = if count_pieces(board).total() > ENDGAME_THRESHOLD {
        (max_own_count(board, side, &candidates)?, Tier::Endgame)
    } else {
        let replies = opponent_replies(board, side, &candidates)?;
        let corner_reply = replies.iter().flatten().any(|&mv| is_corner(mv));

        if corner_reply {
            (min_opponent_replies(&replies, &candidates), Tier::Mobility)
        } else {
            let corners: Vec<Move> = candidates
                .iter()
                .copied()
                .filter(|&mv| is_corner(mv))
                .collect();
            if !corners.is_empty() {
                (corners, Tier::Corner)
            } else {
                let (safe_replies, safe): (Vec<Vec<Move>>, Vec<Move>) = replies
                    .iter()
                    .cloned()
                    .zip(candidates.iter().copied())
                    .filter(|&(_, mv)| !is_x_square(mv))
                    .unzip();

                if safe.is_empty() {
                    // Only X-squares are playable; rank all of them instead
                    (min_opponent_replies(&replies, &candidates), Tier::SafeMobility)
                } else {
                    (min_opponent_replies(&safe_replies, &safe), Tier::SafeMobility)
                }
            }
        }
    };

    let mv = pick_uniform(&pool, rng);
    debug!(
        "{} plays {} via {:?} ({} candidates, {} tied)",
        side,
        mv,
        tier,
        candidates.len(),
        pool.len()
    );

    Ok((mv, tier))
}

// ============================================================================
// HELPERS
// ============================================================================

/// Opponent's legal replies after each candidate, index-aligned with `candidates`
fn opponent_replies(
    board: &Board,
    side: Side,
    candidates: &[Move],
) -> Result<Vec<Vec<Move>>, GameError> {
    candidates
        .iter()
        .map(|&mv| {
            let scratch = apply_move(board, side, mv)?;
            Ok(legal_moves(&scratch, side.opponent()))
        })
        .collect()
}

/// Candidates whose reply set is smallest, in candidate order
fn min_opponent_replies(replies: &[Vec<Move>], candidates: &[Move]) -> Vec<Move> {
    let min = replies.iter().map(Vec::len).min().unwrap_or(0);
    replies
        .iter()
        .zip(candidates)
        .filter(|(r, _)| r.len() == min)
        .map(|(_, &mv)| mv)
        .collect()
}

/// Candidates leaving `side` with the most discs, in candidate order
fn max_own_count(
    board: &Board,
    side: Side,
    candidates: &[Move],
) -> Result<Vec<Move>, GameError> {
    let counts = candidates
        .iter()
        .map(|&mv| Ok((mv, count_pieces(&apply_move(board, side, mv)?).of(side))))
        .collect::<Result<Vec<_>, GameError>>()?;

    let max = counts.iter().map(|&(_, c)| c).max().unwrap_or(0);
    Ok(counts
        .into_iter()
        .filter(|&(_, c)| c == max)
        .map(|(mv, _)| mv)
        .collect())
}

fn pick_uniform<R: Rng + ?Sized>(pool: &[Move], rng: &mut R) -> Move {
    debug_assert!(!pool.is_empty(), "tie-break over an empty pool");
    pool[rng.gen_range(0..pool.len())]
}

// ============================================================================
// HEURISTIC PLAYER
// ============================================================================

/// Automated seat driven by the heuristic policy with its own seeded generator
#[derive(Clone, Debug)]
pub struct HeuristicPlayer {
    rng: ChaCha8Rng,
}

impl HeuristicPlayer {
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Pick a move for `side` along with the rule that decided it
    pub fn choose(&mut self, board: &Board, side: Side) -> Result<(Move, Tier), GameError> {
        select_move_with_tier(board, side, &mut self.rng)
    }
}

impl Default for HeuristicPlayer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
