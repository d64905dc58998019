//! Advisory move oracle.
//!
//! An oracle is an external service that proposes a move for the computer
//! player. It never mutates the session: every proposal is validated against
//! the current position and either accepted or reported as a failure, and
//! the caller decides what to play instead.

mod llm;

pub use llm::LlmOracle;

use crate::games::dots::{GameSession, Move};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Strategy directive sent with every request.
pub const STRATEGY_DIRECTIVE: &str = "Prioritize completing a square (claim the fourth side of any square that already has three). \
Otherwise avoid claiming a third side of any square, since that gives the opponent a free square.";

/// Position-only description of the board sent to an oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleRequest {
    /// Square-rows of the grid.
    pub rows: usize,
    /// Square-columns of the grid.
    pub cols: usize,
    /// Horizontal edge occupancy, `(rows + 1) x cols`.
    pub horizontal: Vec<Vec<bool>>,
    /// Vertical edge occupancy, `rows x (cols + 1)`.
    pub vertical: Vec<Vec<bool>>,
    /// Every currently legal move.
    pub legal_moves: Vec<Move>,
    /// How the oracle should choose.
    pub directive: String,
    /// The grid drawn by [`GridModel::render_ascii`](crate::GridModel::render_ascii).
    #[serde(skip)]
    pub board: String,
}

impl OracleRequest {
    /// Describes the current position of `session`.
    #[instrument(skip(session))]
    pub fn from_session(session: &GameSession) -> Self {
        let grid = session.grid();
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            horizontal: grid.horizontal().to_vec(),
            vertical: grid.vertical().to_vec(),
            legal_moves: session.legal_moves(),
            directive: STRATEGY_DIRECTIVE.to_string(),
            board: grid.render_ascii(),
        }
    }
}

/// Why an oracle produced no usable move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum OracleError {
    /// The request failed or the reply could not be decoded.
    #[display("Oracle transport failure: {}", _0)]
    Transport(String),

    /// The proposed move is not legal in the current position.
    #[display("Oracle proposed illegal move {}", _0)]
    InvalidMove(Move),
}

impl std::error::Error for OracleError {}

/// An external move-suggestion service.
///
/// One request, one reply; no state is kept between calls.
#[async_trait::async_trait]
pub trait MoveOracle: Send + Sync {
    /// Proposes a move for the given position.
    async fn suggest(&self, request: &OracleRequest) -> Result<Move, OracleError>;

    /// Display name used in logs.
    fn name(&self) -> &str;
}

/// Asks `oracle` for a move and validates it against `session`.
///
/// Transport failures are retried at most `max_retries` times. An illegal
/// proposal is reported immediately as [`OracleError::InvalidMove`]. This
/// function never substitutes a move of its own.
#[instrument(skip(oracle, session), fields(oracle = %oracle.name()))]
pub async fn request_advised_move(
    oracle: &dyn MoveOracle,
    session: &GameSession,
    max_retries: u32,
) -> Result<Move, OracleError> {
    let request = OracleRequest::from_session(session);
    let mut attempt = 0;

    loop {
        match oracle.suggest(&request).await {
            Ok(mv) if !session.is_over() && session.grid().is_open(&mv) => {
                debug!(%mv, attempt, "Oracle proposal accepted");
                return Ok(mv);
            }
            Ok(mv) => {
                warn!(%mv, "Oracle proposed an illegal move");
                return Err(OracleError::InvalidMove(mv));
            }
            Err(e) if attempt < max_retries => {
                attempt += 1;
                warn!(error = %e, attempt, "Oracle call failed, retrying");
            }
            Err(e) => {
                warn!(error = %e, attempt, "Oracle call failed, giving up");
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replays a fixed script of replies, counting calls.
    struct Scripted {
        replies: Mutex<Vec<Result<Move, OracleError>>>,
        calls: Mutex<u32>,
    }

    impl Scripted {
        fn new(mut replies: Vec<Result<Move, OracleError>>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl MoveOracle for Scripted {
        async fn suggest(&self, _request: &OracleRequest) -> Result<Move, OracleError> {
            *self.calls.lock().unwrap() += 1;
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(OracleError::Transport("script exhausted".to_string())))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    #[test]
    fn test_request_describes_position() {
        let mut session = GameSession::new(1, 2).unwrap();
        session.apply_move(Move::vertical(0, 1)).unwrap();
        let request = OracleRequest::from_session(&session);
        assert_eq!(request.vertical, vec![vec![false, true, false]]);
        assert_eq!(request.legal_moves.len(), 6);
        assert!(!request.legal_moves.contains(&Move::vertical(0, 1)));
        assert_eq!(request.board, session.grid().render_ascii());
        assert!(!serde_json::to_string(&request).unwrap().contains("board"));
    }

    #[tokio::test]
    async fn test_accepts_legal_proposal() {
        let session = GameSession::new(2, 2).unwrap();
        let oracle = Scripted::new(vec![Ok(Move::horizontal(1, 1))]);
        let mv = request_advised_move(&oracle, &session, 1).await.unwrap();
        assert_eq!(mv, Move::horizontal(1, 1));
        assert_eq!(oracle.calls(), 1);
    }

    #[tokio::test]
    async fn test_retries_transport_failure_once() {
        let session = GameSession::new(2, 2).unwrap();
        let oracle = Scripted::new(vec![
            Err(OracleError::Transport("timeout".to_string())),
            Ok(Move::vertical(0, 0)),
        ]);
        let mv = request_advised_move(&oracle, &session, 1).await.unwrap();
        assert_eq!(mv, Move::vertical(0, 0));
        assert_eq!(oracle.calls(), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_retry() {
        let session = GameSession::new(2, 2).unwrap();
        let oracle = Scripted::new(vec![]);
        let err = request_advised_move(&oracle, &session, 1).await.unwrap_err();
        assert!(matches!(err, OracleError::Transport(_)));
        assert_eq!(oracle.calls(), 2);
    }

    #[tokio::test]
    async fn test_rejects_claimed_edge_without_retry() {
        let mut session = GameSession::new(2, 2).unwrap();
        session.apply_move(Move::horizontal(0, 0)).unwrap();
        let oracle = Scripted::new(vec![Ok(Move::horizontal(0, 0)), Ok(Move::horizontal(0, 1))]);
        let err = request_advised_move(&oracle, &session, 1).await.unwrap_err();
        assert_eq!(err, OracleError::InvalidMove(Move::horizontal(0, 0)));
        assert_eq!(oracle.calls(), 1);
    }

    #[tokio::test]
    async fn test_rejects_out_of_bounds_proposal() {
        let session = GameSession::new(2, 2).unwrap();
        let oracle = Scripted::new(vec![Ok(Move::vertical(2, 0))]);
        let err = request_advised_move(&oracle, &session, 1).await.unwrap_err();
        assert_eq!(err, OracleError::InvalidMove(Move::vertical(2, 0)));
    }
}
