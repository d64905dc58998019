//! Computer opponent decision procedures.

pub mod heuristic;

pub use heuristic::{MoveTier, choose_move, classify_moves};
