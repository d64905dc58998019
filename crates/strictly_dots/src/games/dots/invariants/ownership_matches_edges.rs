//! Ownership invariant: a square is owned exactly when all four edges are claimed.

use super::super::GameSession;
use super::Invariant;

/// Invariant: a square has an owner iff its four bounding edges are claimed.
pub struct OwnershipMatchesEdgesInvariant;

impl Invariant<GameSession> for OwnershipMatchesEdgesInvariant {
    fn holds(session: &GameSession) -> bool {
        let grid = session.grid();
        (0..grid.rows()).all(|r| {
            (0..grid.cols()).all(|c| {
                let closed = grid.edge_count(r, c) == Some(4);
                let owned = grid.owners()[r][c].is_some();
                closed == owned
            })
        })
    }

    fn description() -> &'static str {
        "Squares are owned exactly when all four edges are claimed"
    }
}
