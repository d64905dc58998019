//! Move results and rejections.
//!
//! An accepted move produces a [`MoveOutcome`], the value the presentation
//! layer consumes. A rejected move produces a [`MoveError`] and leaves the
//! session untouched.

use super::{Move, Player, Scores, SquareCoord};
use serde::{Deserialize, Serialize};

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The game is already over.
    #[display("Game is already over")]
    GameOver,

    /// The move addresses an edge outside the grid.
    #[display("Edge {} is outside the grid", _0)]
    OutOfBounds(Move),

    /// The edge has already been claimed.
    #[display("Edge {} is already claimed", _0)]
    AlreadyClaimed(Move),

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}

/// What an accepted move did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// Player who made the move.
    pub player: Player,
    /// The claimed edge.
    pub mv: Move,
    /// Squares completed by this move (zero, one or two).
    pub completed: Vec<SquareCoord>,
    /// Scores after the move.
    pub scores: Scores,
    /// Whether the turn passed to the opponent.
    pub turn_changed: bool,
    /// Whether this move ended the game.
    pub game_over: bool,
}

impl MoveOutcome {
    /// Player to move next (meaningless once the game is over).
    pub fn next_player(&self) -> Player {
        if self.turn_changed {
            self.player.opponent()
        } else {
            self.player
        }
    }

    /// Whether the mover earned an extra turn.
    pub fn extra_turn(&self) -> bool {
        !self.completed.is_empty() && !self.game_over
    }
}
