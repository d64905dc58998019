//! Terminal invariant: the game is over exactly when every square is owned.

use super::super::GameSession;
use super::Invariant;

/// Invariant: `is_over` is true iff every square has an owner.
pub struct TerminalMatchesOwnershipInvariant;

impl Invariant<GameSession> for TerminalMatchesOwnershipInvariant {
    fn holds(session: &GameSession) -> bool {
        session.is_over() == session.grid().is_full()
    }

    fn description() -> &'static str {
        "Game is over exactly when every square is owned"
    }
}
