//! Turn orchestration between the human and the computer.

use crate::ai::choose_move;
use crate::config::{ConfigError, GameConfig};
use crate::games::dots::{
    CorruptSnapshot, GameSession, Move, MoveError, MoveOutcome, Player, Scores, snapshot,
};
use crate::oracle::{MoveOracle, request_advised_move};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, instrument, warn};

/// Whose turn it is, from the controller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
pub enum TurnPhase {
    /// Waiting for the human.
    HumanToMove,
    /// The computer should move next.
    ComputerToMove,
    /// The computer is choosing a move; human input is refused.
    ComputerThinking,
    /// Every square is owned.
    GameOver,
}

/// Messages sent from the controller to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    /// The computer started choosing a move.
    ComputerThinking,
    /// The oracle gave no usable move; the heuristic played instead.
    OracleFallback {
        /// Why the oracle's answer was discarded.
        reason: String,
    },
    /// A move was applied.
    MoveApplied(MoveOutcome),
    /// The game ended.
    GameOver {
        /// Winner, `None` on a tie.
        winner: Option<Player>,
        /// Final scores.
        scores: Scores,
    },
}

/// Why the controller refused a request.
#[derive(Debug, Clone, derive_more::Display)]
pub enum TurnError {
    /// The move engine rejected the move.
    #[display("{}", _0)]
    Move(MoveError),

    /// The snapshot could not be restored.
    #[display("{}", _0)]
    Snapshot(CorruptSnapshot),

    /// The computer is choosing a move.
    #[display("The computer is thinking")]
    ComputerThinking,

    /// It is the computer's turn.
    #[display("It's not the human player's turn")]
    NotHumanTurn,

    /// It is the human's turn.
    #[display("It's not the computer player's turn")]
    NotComputerTurn,
}

impl std::error::Error for TurnError {}

impl From<MoveError> for TurnError {
    fn from(e: MoveError) -> Self {
        TurnError::Move(e)
    }
}

impl From<CorruptSnapshot> for TurnError {
    fn from(e: CorruptSnapshot) -> Self {
        TurnError::Snapshot(e)
    }
}

#[derive(Debug)]
struct ControllerState {
    session: GameSession,
    initial: GameSession,
    phase: TurnPhase,
    human: Player,
    rng: StdRng,
}

impl ControllerState {
    fn abandon_thinking(&mut self) {
        if self.phase == TurnPhase::ComputerThinking {
            self.settle_phase();
        }
    }

    fn settle_phase(&mut self) {
        self.phase = if self.session.is_over() {
            TurnPhase::GameOver
        } else if self.session.current_player() == self.human {
            TurnPhase::HumanToMove
        } else {
            TurnPhase::ComputerToMove
        };
    }
}

/// Puts a controller back into a playable phase if a computer turn is
/// dropped while the oracle is being consulted.
struct ThinkingGuard {
    state: Arc<Mutex<ControllerState>>,
    armed: bool,
}

impl ThinkingGuard {
    fn new(state: Arc<Mutex<ControllerState>>) -> Self {
        Self { state, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for ThinkingGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!("Computer turn abandoned, settling phase");
        match self.state.try_lock() {
            Ok(mut state) => state.abandon_thinking(),
            Err(_) => {
                // Someone holds the lock briefly; finish on the runtime.
                let state = self.state.clone();
                if let Ok(handle) = tokio::runtime::Handle::try_current() {
                    handle.spawn(async move { state.lock().await.abandon_thinking() });
                }
            }
        }
    }
}

/// Runs a human-versus-computer game.
///
/// Cheap to clone; clones share the same game. The session is only mutated
/// while the internal lock is held, and the lock is released while the
/// oracle is consulted. During that window the phase is
/// [`TurnPhase::ComputerThinking`] and human moves, resets and restores are
/// refused. Dropping an unfinished computer turn restores the phase it
/// started from.
#[derive(Clone)]
pub struct GameController {
    state: Arc<Mutex<ControllerState>>,
    oracle: Option<Arc<dyn MoveOracle>>,
    max_retries: u32,
    events: Option<mpsc::UnboundedSender<GameEvent>>,
}

impl std::fmt::Debug for GameController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameController")
            .field("oracle", &self.oracle.as_ref().map(|o| o.name().to_string()))
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl GameController {
    /// Creates a controller with an OS-seeded random source.
    #[instrument(skip(oracle))]
    pub fn new(
        config: &GameConfig,
        oracle: Option<Arc<dyn MoveOracle>>,
    ) -> Result<Self, ConfigError> {
        Self::build(config, oracle, StdRng::from_os_rng())
    }

    /// Creates a controller whose heuristic tie-breaks are reproducible.
    #[instrument(skip(oracle))]
    pub fn seeded(
        config: &GameConfig,
        oracle: Option<Arc<dyn MoveOracle>>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::build(config, oracle, StdRng::seed_from_u64(seed))
    }

    fn build(
        config: &GameConfig,
        oracle: Option<Arc<dyn MoveOracle>>,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let session = GameSession::new(*config.rows(), *config.cols())
            .map_err(|e| ConfigError::new(e.to_string()))?;
        let max_retries = config
            .oracle()
            .as_ref()
            .map(|o| *o.max_retries())
            .unwrap_or(1);

        let mut state = ControllerState {
            initial: session.clone(),
            session,
            phase: TurnPhase::HumanToMove,
            human: *config.human_player(),
            rng,
        };
        state.settle_phase();

        info!(
            rows = config.rows(),
            cols = config.cols(),
            human = %state.human,
            phase = %state.phase,
            oracle = oracle.is_some(),
            "Game controller ready"
        );

        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            oracle,
            max_retries,
            events: None,
        })
    }

    /// Sends [`GameEvent`]s to `tx` from now on.
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<GameEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    /// Current phase.
    pub async fn phase(&self) -> TurnPhase {
        self.state.lock().await.phase
    }

    /// Copy of the current session, for rendering.
    pub async fn session(&self) -> GameSession {
        self.state.lock().await.session.clone()
    }

    /// Snapshot blob of the current session.
    pub async fn snapshot(&self) -> String {
        snapshot::serialize(&self.state.lock().await.session)
    }

    /// Replaces the session with a decoded snapshot.
    ///
    /// A corrupt snapshot leaves the current session in place.
    #[instrument(skip(self, blob))]
    pub async fn restore(&self, blob: &str) -> Result<(), TurnError> {
        let mut state = self.state.lock().await;
        if state.phase == TurnPhase::ComputerThinking {
            return Err(TurnError::ComputerThinking);
        }
        state.session = snapshot::deserialize(blob)?;
        state.settle_phase();
        info!(phase = %state.phase, "Session restored from snapshot");
        Ok(())
    }

    /// Starts a fresh game with the configured grid size.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<(), TurnError> {
        let mut state = self.state.lock().await;
        if state.phase == TurnPhase::ComputerThinking {
            return Err(TurnError::ComputerThinking);
        }
        state.session = state.initial.clone();
        state.settle_phase();
        info!(phase = %state.phase, "Game reset");
        Ok(())
    }

    /// Applies a move on behalf of the human.
    ///
    /// # Errors
    ///
    /// - [`TurnError::ComputerThinking`] while the computer is choosing.
    /// - [`TurnError::NotHumanTurn`] when the computer is to move.
    /// - [`TurnError::Move`] when the engine rejects the move.
    #[instrument(skip(self))]
    pub async fn submit_human_move(&self, mv: Move) -> Result<MoveOutcome, TurnError> {
        let mut state = self.state.lock().await;
        match state.phase {
            TurnPhase::ComputerThinking => {
                warn!(%mv, "Human move refused while computer is thinking");
                return Err(TurnError::ComputerThinking);
            }
            TurnPhase::ComputerToMove => {
                warn!(%mv, "Human move refused out of turn");
                return Err(TurnError::NotHumanTurn);
            }
            TurnPhase::HumanToMove | TurnPhase::GameOver => {}
        }

        let outcome = state.session.apply_move(mv)?;
        state.settle_phase();
        debug!(phase = %state.phase, completed = outcome.completed.len(), "Human moved");
        self.announce(&outcome);
        Ok(outcome)
    }

    /// Plays one computer move: oracle first if configured, heuristic
    /// otherwise or as fallback.
    ///
    /// # Errors
    ///
    /// - [`TurnError::ComputerThinking`] if another computer move is in flight.
    /// - [`TurnError::NotComputerTurn`] when the human is to move.
    /// - [`TurnError::Move`] with [`MoveError::GameOver`] once the game ended.
    #[instrument(skip(self))]
    pub async fn play_computer_turn(&self) -> Result<MoveOutcome, TurnError> {
        let position = {
            let mut state = self.state.lock().await;
            match state.phase {
                TurnPhase::ComputerThinking => return Err(TurnError::ComputerThinking),
                TurnPhase::HumanToMove => return Err(TurnError::NotComputerTurn),
                TurnPhase::GameOver => return Err(TurnError::Move(MoveError::GameOver)),
                TurnPhase::ComputerToMove => {}
            }
            state.phase = TurnPhase::ComputerThinking;
            state.session.clone()
        };
        let mut guard = ThinkingGuard::new(self.state.clone());
        self.emit(GameEvent::ComputerThinking);

        let advice = match &self.oracle {
            Some(oracle) => {
                match request_advised_move(oracle.as_ref(), &position, self.max_retries).await {
                    Ok(mv) => Some(mv),
                    Err(e) => {
                        warn!(error = %e, "Falling back to heuristic");
                        self.emit(GameEvent::OracleFallback {
                            reason: e.to_string(),
                        });
                        None
                    }
                }
            }
            None => None,
        };

        let mut state = self.state.lock().await;
        guard.disarm();
        let result = self.apply_computer_move(&mut state, advice);
        state.settle_phase();
        let outcome = result?;

        debug!(phase = %state.phase, completed = outcome.completed.len(), "Computer moved");
        self.announce(&outcome);
        Ok(outcome)
    }

    /// Plays computer moves until the turn leaves the computer.
    #[instrument(skip(self))]
    pub async fn play_computer_turns(&self) -> Result<Vec<MoveOutcome>, TurnError> {
        let mut outcomes = Vec::new();
        while self.phase().await == TurnPhase::ComputerToMove {
            outcomes.push(self.play_computer_turn().await?);
        }
        Ok(outcomes)
    }

    fn apply_computer_move(
        &self,
        state: &mut ControllerState,
        advice: Option<Move>,
    ) -> Result<MoveOutcome, TurnError> {
        if let Some(mv) = advice {
            match state.session.apply_move(mv) {
                Ok(outcome) => {
                    debug!(%mv, "Played oracle move");
                    return Ok(outcome);
                }
                Err(e) => {
                    warn!(%mv, error = %e, "Oracle move rejected by engine");
                    self.emit(GameEvent::OracleFallback {
                        reason: e.to_string(),
                    });
                }
            }
        }
        let mv = choose_move(&state.session, &mut state.rng).ok_or(MoveError::GameOver)?;
        debug!(%mv, "Played heuristic move");
        Ok(state.session.apply_move(mv)?)
    }

    fn announce(&self, outcome: &MoveOutcome) {
        self.emit(GameEvent::MoveApplied(outcome.clone()));
        if outcome.game_over {
            info!(scores = %outcome.scores, "Game finished");
            self.emit(GameEvent::GameOver {
                winner: outcome.scores.leader(),
                scores: outcome.scores,
            });
        }
    }

    fn emit(&self, event: GameEvent) {
        if let Some(tx) = &self.events
            && tx.send(event).is_err()
        {
            debug!("Event receiver dropped");
        }
    }
}
