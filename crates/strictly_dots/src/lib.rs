//! Strictly Dots library - dots and squares against a computer opponent.
//!
//! # Architecture
//!
//! - **Games**: grid model, move engine with contracts and invariants,
//!   versioned snapshots
//! - **AI**: local heuristic (complete, else play safe, else sacrifice)
//! - **Oracle**: optional advisory move service, validated before use
//! - **Controller**: turn orchestration with the computer-thinking guard
//!
//! # Example
//!
//! ```no_run
//! use strictly_dots::{GameConfig, GameController, Move};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GameConfig::default().with_rows(3).with_cols(3);
//! let controller = GameController::new(&config, None)?;
//!
//! controller.submit_human_move(Move::horizontal(0, 0)).await?;
//! controller.play_computer_turns().await?;
//! println!("{}", controller.session().await.grid().render_ascii());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod ai;
mod config;
mod controller;
mod games;
pub mod llm_client;
pub mod oracle;

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig, OracleConfig};

// Crate-level exports - Orchestration
pub use controller::{GameController, GameEvent, TurnError, TurnPhase};

// Crate-level exports - LLM client
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmProvider};

// Crate-level exports - Oracle
pub use oracle::{LlmOracle, MoveOracle, OracleError, OracleRequest, request_advised_move};

// Crate-level exports - Heuristic
pub use ai::{MoveTier, choose_move};

// Crate-level exports - Game types
pub use games::dots::{
    CorruptSnapshot, EdgeKind, GameSession, GridError, GridModel, MAX_DIMENSION, Move, MoveError,
    MoveOutcome, Player, Scores, SquareCoord, contracts, invariants, snapshot,
};
