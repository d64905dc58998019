//! Versioned snapshot codec for [`GameSession`].
//!
//! The blob is opaque to callers: JSON of the form
//! `{"version": 1, "session": {...}}`. Decoding validates everything it
//! reads, so a restored session satisfies the same invariants as one built
//! move by move.

use super::GameSession;
use super::invariants::{DotsInvariants, InvariantSet};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    session: &'a GameSession,
}

#[derive(Deserialize)]
struct SnapshotHeader {
    version: u32,
}

#[derive(Deserialize)]
struct SnapshotOwned {
    session: GameSession,
}

/// Encodes a session as a snapshot blob.
#[instrument(skip(session), fields(move_count = session.move_count()))]
pub fn serialize(session: &GameSession) -> String {
    let blob = serde_json::to_string(&SnapshotRef {
        version: SNAPSHOT_VERSION,
        session,
    })
    // Plain data with string keys only; encoding cannot fail.
    .unwrap_or_default();
    debug!(bytes = blob.len(), "Serialized session");
    blob
}

/// Decodes a snapshot blob.
///
/// # Errors
///
/// Returns [`CorruptSnapshot`] for malformed JSON, an unknown version,
/// matrices whose shape disagrees with the grid size, or a session that
/// violates the game invariants.
#[instrument(skip(blob), fields(bytes = blob.len()))]
pub fn deserialize(blob: &str) -> Result<GameSession, CorruptSnapshot> {
    let header: SnapshotHeader = serde_json::from_str(blob)
        .map_err(|e| CorruptSnapshot::new(format!("Unreadable snapshot: {}", e)))?;
    if header.version != SNAPSHOT_VERSION {
        return Err(CorruptSnapshot::new(format!(
            "Unsupported snapshot version {} (expected {})",
            header.version, SNAPSHOT_VERSION
        )));
    }

    let SnapshotOwned { session } = serde_json::from_str(blob)
        .map_err(|e| CorruptSnapshot::new(format!("Malformed session: {}", e)))?;

    if !session.grid().has_consistent_shape() {
        return Err(CorruptSnapshot::new(
            "Edge or owner matrices do not match the grid size".to_string(),
        ));
    }

    if let Err(violations) = DotsInvariants::check_all(&session) {
        let descriptions = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(CorruptSnapshot::new(format!(
            "Invariant violation: {}",
            descriptions
        )));
    }

    let claimed = session.grid().claimed_count();
    if session.move_count() as usize != claimed {
        return Err(CorruptSnapshot::new(format!(
            "Move count {} does not match {} claimed edges",
            session.move_count(),
            claimed
        )));
    }

    debug!(move_count = session.move_count(), "Restored session");
    Ok(session)
}

/// Snapshot could not be decoded.
#[derive(Debug, Clone, Display, Error)]
#[display("Corrupt snapshot: {} at {}:{}", message, file, line)]
pub struct CorruptSnapshot {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl CorruptSnapshot {
    /// Creates a new snapshot error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        warn!(error_message = %message, "Rejected snapshot");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::dots::Move;

    fn played() -> GameSession {
        let mut session = GameSession::new(2, 2).unwrap();
        for mv in [
            Move::horizontal(0, 0),
            Move::vertical(0, 0),
            Move::vertical(0, 1),
            Move::horizontal(1, 0),
            Move::horizontal(2, 1),
        ] {
            session.apply_move(mv).unwrap();
        }
        session
    }

    #[test]
    fn test_restores_played_session() {
        let session = played();
        let restored = deserialize(&serialize(&session)).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let blob = serialize(&played()).replacen("\"version\":1", "\"version\":7", 1);
        let err = deserialize(&blob).unwrap_err();
        assert!(err.message.contains("version 7"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(deserialize("not json").is_err());
        assert!(deserialize(r#"{"version":1}"#).is_err());
    }

    #[test]
    fn test_rejects_misshapen_grid() {
        let mut session = played();
        session.grid.vertical[1].pop();
        assert!(deserialize(&serialize(&session)).is_err());
    }

    #[test]
    fn test_rejects_inflated_score() {
        let mut session = played();
        session.scores.increment(crate::games::dots::Player::Two);
        let err = deserialize(&serialize(&session)).unwrap_err();
        assert!(err.message.contains("Scores"));
    }

    #[test]
    fn test_rejects_wrong_move_count() {
        let mut session = played();
        session.move_count += 3;
        let err = deserialize(&serialize(&session)).unwrap_err();
        assert!(err.message.contains("Move count"));
    }
}
