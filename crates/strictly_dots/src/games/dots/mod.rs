//! Dots and squares: grid model, move engine, contracts and snapshots.

mod action;
pub mod contracts;
mod grid;
pub mod invariants;
mod rules;
mod session;
pub mod snapshot;
mod types;

pub use action::{MoveError, MoveOutcome};
pub use grid::{GridError, GridModel, MAX_DIMENSION};
pub use session::GameSession;
pub use snapshot::CorruptSnapshot;
pub use types::{EdgeKind, Move, Player, Scores, SquareCoord};
