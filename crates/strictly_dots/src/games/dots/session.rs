//! Complete state of one game.

use super::grid::{GridError, GridModel};
use super::types::{Move, Player, Scores};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// A single game of dots and squares.
///
/// Mutated only through [`GameSession::apply_move`]; everything else is a
/// read-only query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub(super) grid: GridModel,
    pub(super) current_player: Player,
    pub(super) scores: Scores,
    pub(super) is_over: bool,
    pub(super) move_count: u32,
}

impl GameSession {
    /// Creates a fresh game on a `rows x cols` grid with [`Player::One`] to move.
    #[instrument]
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        let grid = GridModel::new(rows, cols)?;
        info!(rows, cols, "Created new game session");
        Ok(Self {
            grid,
            current_player: Player::One,
            scores: Scores::default(),
            is_over: false,
            move_count: 0,
        })
    }

    /// Returns the grid.
    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    /// Returns the player to move next.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Returns the scores.
    pub fn scores(&self) -> Scores {
        self.scores
    }

    /// Whether every square has been claimed.
    pub fn is_over(&self) -> bool {
        self.is_over
    }

    /// Number of accepted moves so far.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Winner of a finished game; `None` while in progress or on a tie.
    pub fn winner(&self) -> Option<Player> {
        if self.is_over {
            self.scores.leader()
        } else {
            None
        }
    }

    /// Every legal move, in grid order. Empty once the game is over.
    #[instrument(skip(self))]
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_over {
            Vec::new()
        } else {
            self.grid.unclaimed_edges()
        }
    }
}
