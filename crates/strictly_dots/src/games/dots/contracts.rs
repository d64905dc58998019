//! Contract-based validation for dots and squares.
//!
//! Contracts define correctness through preconditions and postconditions.
//! They formalize the Hoare-style reasoning: {P} action {Q}

use super::action::MoveError;
use super::invariants::{DotsInvariants, InvariantSet};
use super::{GameSession, Move};
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
///
/// - Precondition: {P(state, action)} - must hold before applying action
/// - Postcondition: {Q(before, after)} - must hold after applying action
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

// ─────────────────────────────────────────────────────────────
//  Move Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the game must still be running.
pub struct GameInProgress;

impl GameInProgress {
    /// Rejects any move on a finished game.
    #[instrument(skip(session))]
    pub fn check(session: &GameSession) -> Result<(), MoveError> {
        if session.is_over() {
            Err(MoveError::GameOver)
        } else {
            Ok(())
        }
    }
}

/// Precondition: the edge must exist on this grid.
pub struct EdgeInBounds;

impl EdgeInBounds {
    /// Rejects edges outside the grid.
    #[instrument(skip(session))]
    pub fn check(mv: &Move, session: &GameSession) -> Result<(), MoveError> {
        if session.grid().in_bounds(mv) {
            Ok(())
        } else {
            Err(MoveError::OutOfBounds(*mv))
        }
    }
}

/// Precondition: the edge must not be claimed yet.
pub struct EdgeUnclaimed;

impl EdgeUnclaimed {
    /// Rejects edges that are already claimed.
    #[instrument(skip(session))]
    pub fn check(mv: &Move, session: &GameSession) -> Result<(), MoveError> {
        match session.grid().is_claimed(mv) {
            Some(false) => Ok(()),
            Some(true) => Err(MoveError::AlreadyClaimed(*mv)),
            None => Err(MoveError::OutOfBounds(*mv)),
        }
    }
}

/// Composite precondition, checked in order: game running, edge in bounds,
/// edge unclaimed.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move.
    #[instrument(skip(session))]
    pub fn check(mv: &Move, session: &GameSession) -> Result<(), MoveError> {
        GameInProgress::check(session)?;
        EdgeInBounds::check(mv, session)?;
        EdgeUnclaimed::check(mv, session)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Move Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for move actions.
///
/// Preconditions:
/// - Game is not over
/// - Edge is in bounds
/// - Edge is unclaimed
///
/// Postconditions:
/// - Claimed edges stay claimed
/// - Owned squares keep their owner
/// - The composed invariant set holds
pub struct MoveContract;

impl Contract<GameSession, Move> for MoveContract {
    fn pre(session: &GameSession, action: &Move) -> Result<(), MoveError> {
        LegalMove::check(action, session)
    }

    fn post(before: &GameSession, after: &GameSession) -> Result<(), MoveError> {
        if !EdgesMonotonic::holds(before, after) {
            return Err(MoveError::InvariantViolation(
                "Postcondition failed: a claimed edge was released".to_string(),
            ));
        }
        if !OwnersPermanent::holds(before, after) {
            return Err(MoveError::InvariantViolation(
                "Postcondition failed: an owned square changed hands".to_string(),
            ));
        }
        DotsInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            MoveError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })
    }
}

// ─────────────────────────────────────────────────────────────
//  Transition properties (compare two states)
// ─────────────────────────────────────────────────────────────

/// Transition property: every edge claimed before is still claimed after.
pub struct EdgesMonotonic;

impl EdgesMonotonic {
    /// Checks edge monotonicity between two states.
    #[instrument(skip(before, after))]
    pub fn holds(before: &GameSession, after: &GameSession) -> bool {
        let kept = |old: &[Vec<bool>], new: &[Vec<bool>]| {
            old.iter().zip(new).all(|(old_row, new_row)| {
                old_row.iter().zip(new_row).all(|(&was, &is)| !was || is)
            })
        };
        let valid = kept(before.grid().horizontal(), after.grid().horizontal())
            && kept(before.grid().vertical(), after.grid().vertical());
        if !valid {
            warn!("Edge monotonicity violated");
        }
        valid
    }
}

/// Transition property: owners are assigned at most once.
pub struct OwnersPermanent;

impl OwnersPermanent {
    /// Checks that no owned square changed or lost its owner.
    #[instrument(skip(before, after))]
    pub fn holds(before: &GameSession, after: &GameSession) -> bool {
        let valid = before
            .grid()
            .owners()
            .iter()
            .flatten()
            .zip(after.grid().owners().iter().flatten())
            .all(|(was, is)| was.is_none() || was == is);
        if !valid {
            warn!("Owner permanence violated");
        }
        valid
    }
}
