//! Scoring invariant: each score equals the number of squares owned.

use super::super::{GameSession, Player};
use super::Invariant;
use strum::IntoEnumIterator;

/// Invariant: every player's score equals the count of squares they own.
pub struct ScoresMatchOwnersInvariant;

impl Invariant<GameSession> for ScoresMatchOwnersInvariant {
    fn holds(session: &GameSession) -> bool {
        Player::iter().all(|player| {
            session.scores().get(player) as usize == session.grid().owned_by(player)
        })
    }

    fn description() -> &'static str {
        "Scores equal the number of owned squares"
    }
}
