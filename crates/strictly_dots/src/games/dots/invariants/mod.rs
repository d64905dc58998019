//! First-class invariants for dots and squares.
//!
//! Invariants are logical properties that must hold throughout game execution.
//! They are checked after every move in debug builds and on every restored
//! snapshot.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for three-tuples of invariants, such as [`DotsInvariants`].
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns Ok(()) if all invariants hold, or Err with a list of
    /// violations if any invariant fails.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

// Implement InvariantSet for 3-tuples
impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

pub mod ownership_matches_edges;
pub mod scores_match_owners;
pub mod terminal_matches_ownership;

pub use ownership_matches_edges::OwnershipMatchesEdgesInvariant;
pub use scores_match_owners::ScoresMatchOwnersInvariant;
pub use terminal_matches_ownership::TerminalMatchesOwnershipInvariant;

/// All dots-and-squares invariants as a composable set.
pub type DotsInvariants = (
    OwnershipMatchesEdgesInvariant,
    ScoresMatchOwnersInvariant,
    TerminalMatchesOwnershipInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::dots::{GameSession, Move, Player};

    #[test]
    fn test_invariant_set_holds_for_empty_game() {
        let session = GameSession::new(3, 3).unwrap();
        assert!(DotsInvariants::check_all(&session).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_after_moves() {
        let mut session = GameSession::new(2, 2).unwrap();
        for mv in [
            Move::horizontal(0, 0),
            Move::vertical(0, 0),
            Move::vertical(0, 1),
            Move::horizontal(1, 0),
        ] {
            session.apply_move(mv).unwrap();
        }
        assert_eq!(session.scores().total(), 1);
        assert!(DotsInvariants::check_all(&session).is_ok());
    }

    #[test]
    fn test_invariant_set_detects_violations() {
        let mut session = GameSession::new(2, 2).unwrap();
        // An owner without any bounding edges, and no matching score.
        session.grid.owners[1][1] = Some(Player::Two);

        let violations = DotsInvariants::check_all(&session).unwrap_err();
        assert_eq!(violations.len(), 2);
    }
}
