//! Self-play session: the game loop state machine around the stateless core
//!
//! ```text
//! Ready --start--> InProgress --pause--> Paused
//!                  InProgress <--resume-- Paused
//!                  InProgress --game over--> Finished --dismiss--> Ready
//! ```
//!
//! Each `step` plays exactly one ply. Pacing between plies is left to the
//! caller.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::board::{Board, Move, PieceCount, Side};
use crate::config::SessionConfig;
use crate::error::GameError;
use crate::policy::{HeuristicPlayer, Tier};
use crate::rules::{
    apply_move, check_winner, flips, result_by_count, turn_status, GameResult, TurnStatus,
};

// ============================================================================
// CORE TYPES
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    Ready,
    InProgress,
    Paused,
    Finished,
}

/// One entry of the game record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ply {
    Placed {
        side: Side,
        square: Move,
        flipped: Vec<Move>,
        tier: Tier,
    },
    Passed {
        side: Side,
    },
}

impl Ply {
    pub fn side(&self) -> Side {
        match self {
            Ply::Placed { side, .. } | Ply::Passed { side } => *side,
        }
    }
}

/// What a single `step` did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Placed { side: Side, square: Move, flipped: usize },
    Passed { side: Side },
    /// The game was already over when the step began
    Finished(GameResult),
}

// ============================================================================
// GAME SESSION
// ============================================================================

/// Two heuristic seats playing one game at a time
#[derive(Clone, Debug)]
pub struct GameSession {
    config: SessionConfig,
    initial: Board,
    board: Board,
    to_move: Side,
    status: GameStatus,
    result: GameResult,
    /// Finished by the ply cap rather than by the rules
    truncated: bool,
    history: Vec<Ply>,
    black: HeuristicPlayer,
    white: HeuristicPlayer,
}

impl GameSession {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Session starting from the standard opening
    pub fn new(config: SessionConfig) -> Self {
        Self::with_board(config, Board::new())
    }

    /// Session starting from a custom position
    pub fn with_board(config: SessionConfig, initial: Board) -> Self {
        let (black, white) = match config.seed {
            Some(seed) => (
                HeuristicPlayer::with_seed(seed),
                HeuristicPlayer::with_seed(seed.wrapping_add(1)),
            ),
            None => (HeuristicPlayer::new(), HeuristicPlayer::new()),
        };

        Self {
            to_move: config.first_to_move,
            config,
            initial,
            board: initial,
            status: GameStatus::Ready,
            result: GameResult::Ongoing,
            truncated: false,
            history: Vec::new(),
            black,
            white,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    /// True when the ply cap ended the game while moves were still available.
    /// `result()` is then the disc-count score, and `check_winner` on the
    /// final board still reports `Ongoing`.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn to_move(&self) -> Side {
        self.to_move
    }

    pub fn history(&self) -> &[Ply] {
        &self.history
    }

    pub fn piece_count(&self) -> PieceCount {
        self.board.count()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ========================================================================
    // TRANSITIONS
    // ========================================================================

    fn require(&self, expected: GameStatus, action: &'static str) -> Result<(), GameError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(GameError::InvalidTransition {
                from: self.status,
                action,
            })
        }
    }

    /// Ready -> InProgress, on a fresh copy of the starting position
    pub fn start(&mut self) -> Result<(), GameError> {
        self.require(GameStatus::Ready, "start")?;

        self.board = self.initial;
        self.to_move = self.config.first_to_move;
        self.result = GameResult::Ongoing;
        self.truncated = false;
        self.history.clear();
        self.status = GameStatus::InProgress;

        info!("Game started, {} to move", self.to_move);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), GameError> {
        self.require(GameStatus::InProgress, "pause")?;
        self.status = GameStatus::Paused;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), GameError> {
        self.require(GameStatus::Paused, "resume")?;
        self.status = GameStatus::InProgress;
        Ok(())
    }

    /// Finished -> Ready
    pub fn dismiss(&mut self) -> Result<(), GameError> {
        self.require(GameStatus::Finished, "dismiss")?;
        self.status = GameStatus::Ready;
        Ok(())
    }

    fn finish(&mut self, result: GameResult) {
        self.result = result;
        self.status = GameStatus::Finished;

        let count = self.board.count();
        info!(
            "Game finished: {:?} ({}-{}, {} plies)",
            result,
            count.black,
            count.white,
            self.history.len()
        );
    }

    // ========================================================================
    // PLAY
    // ========================================================================

    /// Play one ply for the side to move
    pub fn step(&mut self) -> Result<StepOutcome, GameError> {
        self.require(GameStatus::InProgress, "step")?;

        let side = self.to_move;
        let outcome = match turn_status(&self.board, side) {
            TurnStatus::GameOver(result) => {
                self.finish(result);
                return Ok(StepOutcome::Finished(result));
            }
            TurnStatus::Pass => {
                debug!("{} has no legal move and passes", side);
                self.history.push(Ply::Passed { side });
                self.to_move = side.opponent();
                StepOutcome::Passed { side }
            }
            TurnStatus::Move => {
                let player = match side {
                    Side::Black => &mut self.black,
                    Side::White => &mut self.white,
                };
                let (square, tier) = player.choose(&self.board, side)?;
                let flipped = flips(&self.board, side, square);
                self.board = apply_move(&self.board, side, square)?;

                let outcome = StepOutcome::Placed {
                    side,
                    square,
                    flipped: flipped.len(),
                };
                self.history.push(Ply::Placed {
                    side,
                    square,
                    flipped,
                    tier,
                });

                let result = check_winner(&self.board);
                if result.is_over() {
                    self.finish(result);
                } else {
                    self.to_move = side.opponent();
                }
                outcome
            }
        };

        if self.status == GameStatus::InProgress && self.history.len() >= self.config.max_plies {
            warn!(
                "Ply limit {} reached before the game ended, scoring by disc count",
                self.config.max_plies
            );
            self.truncated = true;
            self.finish(result_by_count(self.board.count()));
        }

        Ok(outcome)
    }

    /// Step until the game finishes
    pub fn run_to_end(&mut self) -> Result<GameResult, GameError> {
        while self.status == GameStatus::InProgress {
            self.step()?;
        }
        self.require(GameStatus::Finished, "run to end")?;
        Ok(self.result)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> GameSession {
        GameSession::new(SessionConfig::default().with_seed(seed))
    }

    #[test]
    fn test_new_session_is_ready() {
        let session = seeded(1);
        assert_eq!(session.status(), GameStatus::Ready);
        assert_eq!(session.result(), GameResult::Ongoing);
        assert_eq!(session.to_move(), Side::Black);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_step_requires_in_progress() {
        let mut session = seeded(1);
        assert_eq!(
            session.step(),
            Err(GameError::InvalidTransition {
                from: GameStatus::Ready,
                action: "step",
            })
        );
    }

    #[test]
    fn test_pause_and_resume() {
        let mut session = seeded(2);
        session.start().unwrap();
        session.step().unwrap();

        session.pause().unwrap();
        assert_eq!(session.status(), GameStatus::Paused);
        let frozen = *session.board();
        assert!(session.step().is_err());
        assert_eq!(*session.board(), frozen);

        assert!(session.pause().is_err());
        session.resume().unwrap();
        assert_eq!(session.status(), GameStatus::InProgress);
        session.step().unwrap();
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_first_step_is_black_placement() {
        let mut session = seeded(3);
        session.start().unwrap();
        match session.step().unwrap() {
            StepOutcome::Placed { side, flipped, .. } => {
                assert_eq!(side, Side::Black);
                assert_eq!(flipped, 1);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(session.to_move(), Side::White);
        assert_eq!(session.piece_count().total(), 5);
    }

    #[test]
    fn test_run_to_end_and_dismiss() {
        let mut session = seeded(4);
        session.start().unwrap();
        let result = session.run_to_end().unwrap();

        assert!(result.is_over());
        assert_eq!(session.status(), GameStatus::Finished);
        assert_eq!(check_winner(session.board()), result);
        assert!(!session.is_truncated());

        session.dismiss().unwrap();
        assert_eq!(session.status(), GameStatus::Ready);

        session.start().unwrap();
        assert!(session.history().is_empty());
        assert_eq!(*session.board(), Board::new());
    }

    #[test]
    fn test_forced_pass_is_recorded() {
        let board: Board = "OX......
                            ........
                            ........
                            ........
                            ........
                            ........
                            ........
                            ........"
            .parse()
            .unwrap();
        let mut session = GameSession::with_board(SessionConfig::default().with_seed(5), board);
        session.start().unwrap();

        assert_eq!(session.step().unwrap(), StepOutcome::Passed { side: Side::Black });
        assert_eq!(session.to_move(), Side::White);
        assert_eq!(*session.board(), board);

        // White captures at 2, after which nobody can move
        match session.step().unwrap() {
            StepOutcome::Placed { side, square, flipped } => {
                assert_eq!(side, Side::White);
                assert_eq!(square.index(), 2);
                assert_eq!(flipped, 1);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(session.status(), GameStatus::Finished);
        assert_eq!(session.result(), GameResult::WhiteWins);
        assert_eq!(session.history()[0], Ply::Passed { side: Side::Black });
    }

    #[test]
    fn test_terminal_start_finishes_on_first_step() {
        let board: Board = format!("XX{}", ".".repeat(62)).parse().unwrap();
        let mut session = GameSession::with_board(SessionConfig::default().with_seed(6), board);
        session.start().unwrap();
        assert_eq!(
            session.step().unwrap(),
            StepOutcome::Finished(GameResult::BlackWins)
        );
        assert_eq!(session.status(), GameStatus::Finished);
    }

    #[test]
    fn test_ply_limit_scores_position() {
        let config = SessionConfig::default().with_seed(7).with_max_plies(4);
        let mut session = GameSession::new(config);
        session.start().unwrap();
        let result = session.run_to_end().unwrap();

        assert_eq!(session.history().len(), 4);
        assert_eq!(result, result_by_count(session.piece_count()));
        assert!(session.is_truncated());
        assert_eq!(check_winner(session.board()), GameResult::Ongoing);

        session.dismiss().unwrap();
        session.start().unwrap();
        assert!(!session.is_truncated());
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = seeded(8);
        let mut b = seeded(8);
        a.start().unwrap();
        b.start().unwrap();
        a.run_to_end().unwrap();
        b.run_to_end().unwrap();
        assert_eq!(a.history(), b.history());
        assert_eq!(a.board(), b.board());
    }

    #[test]
    fn test_history_alternates_sides() {
        let mut session = seeded(9);
        session.start().unwrap();
        session.run_to_end().unwrap();

        let sides: Vec<Side> = session.history().iter().map(Ply::side).collect();
        assert!(sides.windows(2).all(|w| w[0] != w[1]));
        assert_eq!(sides[0], Side::Black);
    }

    #[test]
    fn test_first_to_move_is_honored() {
        let config = SessionConfig {
            first_to_move: Side::White,
            ..SessionConfig::default().with_seed(10)
        };
        let mut session = GameSession::new(config);
        session.start().unwrap();
        assert_eq!(session.to_move(), Side::White);

        let result = session.run_to_end().unwrap();
        assert_eq!(session.history()[0].side(), Side::White);
        assert_eq!(check_winner(session.board()), result);
    }

    #[test]
    fn test_same_seed_steps_in_lockstep() {
        let mut a = seeded(11);
        let mut b = seeded(11);
        a.start().unwrap();
        b.start().unwrap();
        while a.status() == GameStatus::InProgress {
            assert_eq!(a.step().unwrap(), b.step().unwrap());
        }
        assert_eq!(b.status(), GameStatus::Finished);
        assert_eq!(a.result(), b.result());
    }
}
