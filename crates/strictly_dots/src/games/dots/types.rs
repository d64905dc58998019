//! Core domain types for dots and squares.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Player in the game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    /// First player (moves first in a fresh game).
    One,
    /// Second player.
    Two,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

/// Orientation of an edge between two adjacent dots.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumIter,
)]
pub enum EdgeKind {
    /// Spans two dots in the same dot-row.
    #[serde(rename = "h")]
    #[strum(to_string = "h")]
    Horizontal,
    /// Spans two dots in the same dot-column.
    #[serde(rename = "v")]
    #[strum(to_string = "v")]
    Vertical,
}

/// A move: claiming one edge of the grid.
///
/// Horizontal edge `(r, c)` spans dot-row `r` from dot-column `c` to `c + 1`.
/// Vertical edge `(r, c)` spans dot-column `c` from dot-row `r` to `r + 1`.
///
/// On the wire a move is `{"type": "h" | "v", "r": row, "c": col}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Move {
    /// Edge orientation.
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    /// Dot-row of the edge.
    #[serde(rename = "r")]
    pub row: usize,
    /// Dot-column of the edge.
    #[serde(rename = "c")]
    pub col: usize,
}

impl Move {
    /// Creates a new move.
    #[instrument]
    pub fn new(kind: EdgeKind, row: usize, col: usize) -> Self {
        Self { kind, row, col }
    }

    /// Horizontal edge at `(row, col)`.
    pub fn horizontal(row: usize, col: usize) -> Self {
        Self::new(EdgeKind::Horizontal, row, col)
    }

    /// Vertical edge at `(row, col)`.
    pub fn vertical(row: usize, col: usize) -> Self {
        Self::new(EdgeKind::Vertical, row, col)
    }

    /// Returns the edge orientation.
    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    /// Returns the row index.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Returns the column index.
    pub fn col(&self) -> usize {
        self.col
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({}, {})", self.kind, self.row, self.col)
    }
}

/// Coordinates of a square (unit cell), in square-rows and square-columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SquareCoord {
    /// Square-row.
    pub row: usize,
    /// Square-column.
    pub col: usize,
}

impl SquareCoord {
    /// Creates a square coordinate.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for SquareCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.row, self.col)
    }
}

/// Completed-square counts per player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    one: u32,
    two: u32,
}

impl Scores {
    /// Returns the score of `player`.
    pub fn get(&self, player: Player) -> u32 {
        match player {
            Player::One => self.one,
            Player::Two => self.two,
        }
    }

    /// Sum of both scores.
    pub fn total(&self) -> u32 {
        self.one + self.two
    }

    /// Player with the strictly higher score, if any.
    pub fn leader(&self) -> Option<Player> {
        match self.one.cmp(&self.two) {
            std::cmp::Ordering::Greater => Some(Player::One),
            std::cmp::Ordering::Less => Some(Player::Two),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub(super) fn increment(&mut self, player: Player) {
        match player {
            Player::One => self.one += 1,
            Player::Two => self.two += 1,
        }
    }
}

impl std::fmt::Display for Scores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "One {} - {} Two", self.one, self.two)
    }
}
