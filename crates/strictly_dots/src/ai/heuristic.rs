//! Local heuristic: take a free square, else play safe, else sacrifice.

use crate::games::dots::{GameSession, GridModel, Move};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, instrument};

/// Priority tier a candidate move belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum MoveTier {
    /// Closes a square that already has three sides.
    Complete,
    /// Creates no three-sided square for the opponent.
    Safe,
    /// Everything else: hands the opponent at least one square.
    Sacrifice,
}

/// Classifies an unclaimed edge by looking at the squares it borders.
fn tier_of(grid: &GridModel, mv: &Move) -> MoveTier {
    let counts: Vec<u8> = grid
        .adjacent_squares(mv)
        .into_iter()
        .filter_map(|square| grid.edge_count(square.row, square.col))
        .collect();

    if counts.contains(&3) {
        MoveTier::Complete
    } else if counts.contains(&2) {
        MoveTier::Sacrifice
    } else {
        MoveTier::Safe
    }
}

/// Returns the best non-empty tier and its candidates.
///
/// `None` when no edge is left to claim.
#[instrument(skip(session))]
pub fn classify_moves(session: &GameSession) -> Option<(MoveTier, Vec<Move>)> {
    let grid = session.grid();
    let mut complete = Vec::new();
    let mut safe = Vec::new();
    let mut sacrifice = Vec::new();

    for mv in session.legal_moves() {
        match tier_of(grid, &mv) {
            MoveTier::Complete => complete.push(mv),
            MoveTier::Safe => safe.push(mv),
            MoveTier::Sacrifice => sacrifice.push(mv),
        }
    }

    [
        (MoveTier::Complete, complete),
        (MoveTier::Safe, safe),
        (MoveTier::Sacrifice, sacrifice),
    ]
    .into_iter()
    .find(|(_, candidates)| !candidates.is_empty())
}

/// Picks a move for the player to move.
///
/// Rules in strict priority order, ties broken uniformly at random:
/// 1. complete a three-sided square;
/// 2. otherwise play an edge that leaves no square at three sides;
/// 3. otherwise any unclaimed edge.
///
/// Returns `None` only when the game is over.
#[instrument(skip(session, rng), fields(player = %session.current_player()))]
pub fn choose_move<R: Rng + ?Sized>(session: &GameSession, rng: &mut R) -> Option<Move> {
    let (tier, candidates) = classify_moves(session)?;
    let chosen = candidates.choose(rng).copied();
    debug!(%tier, candidates = candidates.len(), chosen = ?chosen, "Heuristic chose move");
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_fresh_grid_is_all_safe() {
        let session = GameSession::new(3, 3).unwrap();
        let (tier, candidates) = classify_moves(&session).unwrap();
        assert_eq!(tier, MoveTier::Safe);
        assert_eq!(candidates.len(), 24);
    }

    #[test]
    fn test_takes_fourth_side() {
        let mut session = GameSession::new(2, 2).unwrap();
        for mv in [
            Move::horizontal(0, 1),
            Move::vertical(0, 1),
            Move::vertical(0, 2),
        ] {
            session.apply_move(mv).unwrap();
        }
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(
                choose_move(&session, &mut rng),
                Some(Move::horizontal(1, 1))
            );
        }
    }

    #[test]
    fn test_only_sacrifices_left() {
        // 1x1 grid with two sides claimed: both remaining edges give the square away.
        let mut session = GameSession::new(1, 1).unwrap();
        session.apply_move(Move::horizontal(0, 0)).unwrap();
        session.apply_move(Move::horizontal(1, 0)).unwrap();
        let (tier, candidates) = classify_moves(&session).unwrap();
        assert_eq!(tier, MoveTier::Sacrifice);
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_none_when_over() {
        let mut session = GameSession::new(1, 1).unwrap();
        for mv in session.legal_moves() {
            session.apply_move(mv).unwrap();
        }
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(choose_move(&session, &mut rng), None);
    }
}
