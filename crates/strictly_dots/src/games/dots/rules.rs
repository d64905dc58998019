//! Move engine: the single entry point that mutates a [`GameSession`].

use super::action::{MoveError, MoveOutcome};
use super::contracts::{Contract, MoveContract};
use super::{GameSession, Move, SquareCoord};
use tracing::{debug, info, instrument};

impl GameSession {
    /// Claims an edge for the current player.
    ///
    /// Completing one or two squares scores them for the mover and keeps the
    /// turn; completing none passes the turn. A rejected move leaves the
    /// session unchanged.
    ///
    /// # Errors
    ///
    /// - [`MoveError::GameOver`] if every square is already owned.
    /// - [`MoveError::OutOfBounds`] if the edge is not part of the grid.
    /// - [`MoveError::AlreadyClaimed`] if the edge was claimed before.
    #[instrument(skip(self), fields(player = %self.current_player, move_count = self.move_count))]
    pub fn apply_move(&mut self, mv: Move) -> Result<MoveOutcome, MoveError> {
        if let Err(e) = MoveContract::pre(self, &mv) {
            debug!(error = %e, "Move rejected");
            return Err(e);
        }

        #[cfg(debug_assertions)]
        let before = self.clone();

        let player = self.current_player;
        self.grid.claim(&mv);
        self.move_count += 1;

        let completed: Vec<SquareCoord> = self
            .grid
            .adjacent_squares(&mv)
            .into_iter()
            .filter(|&square| self.grid.owner(square).is_none())
            .filter(|&square| self.grid.edge_count(square.row, square.col) == Some(4))
            .collect();

        for &square in &completed {
            self.grid.set_owner(square, player);
            self.scores.increment(player);
            debug!(%square, "Square completed");
        }

        let turn_changed = completed.is_empty();
        if turn_changed {
            self.current_player = player.opponent();
        }

        self.is_over = self.grid.is_full();

        #[cfg(debug_assertions)]
        MoveContract::post(&before, self)?;

        if self.is_over {
            info!(scores = %self.scores, winner = ?self.winner(), "Game over");
        }

        Ok(MoveOutcome {
            player,
            mv,
            completed,
            scores: self.scores,
            turn_changed,
            game_over: self.is_over,
        })
    }
}
