//! Dot grid: edge occupancy and square ownership.

use super::types::{EdgeKind, Move, Player, SquareCoord};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Largest supported number of square-rows or square-columns.
pub const MAX_DIMENSION: usize = 64;

/// Error constructing a grid.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GridError {
    /// Rows or columns was zero.
    #[display("Grid must have at least one row and one column (got {}x{})", _0, _1)]
    EmptyDimension(usize, usize),

    /// Rows or columns exceeded [`MAX_DIMENSION`].
    #[display(
        "Grid may have at most {} rows and columns (got {}x{})",
        MAX_DIMENSION,
        _0,
        _1
    )]
    TooLarge(usize, usize),
}

impl std::error::Error for GridError {}

/// Fixed-size grid of `rows x cols` squares.
///
/// Horizontal edges form a `(rows + 1) x cols` matrix, vertical edges a
/// `rows x (cols + 1)` matrix, and owners a `rows x cols` matrix. Edges
/// only ever go from unclaimed to claimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridModel {
    pub(super) rows: usize,
    pub(super) cols: usize,
    pub(super) horizontal: Vec<Vec<bool>>,
    pub(super) vertical: Vec<Vec<bool>>,
    pub(super) owners: Vec<Vec<Option<Player>>>,
}

impl GridModel {
    /// Checks that `rows x cols` is a playable size.
    pub fn check_dimensions(rows: usize, cols: usize) -> Result<(), GridError> {
        if rows == 0 || cols == 0 {
            Err(GridError::EmptyDimension(rows, cols))
        } else if rows > MAX_DIMENSION || cols > MAX_DIMENSION {
            Err(GridError::TooLarge(rows, cols))
        } else {
            Ok(())
        }
    }

    /// Creates an empty grid of `rows x cols` squares.
    #[instrument]
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        Self::check_dimensions(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            horizontal: vec![vec![false; cols]; rows + 1],
            vertical: vec![vec![false; cols + 1]; rows],
            owners: vec![vec![None; cols]; rows],
        })
    }

    /// Number of square-rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of square-columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Horizontal edge occupancy, `(rows + 1) x cols`.
    pub fn horizontal(&self) -> &[Vec<bool>] {
        &self.horizontal
    }

    /// Vertical edge occupancy, `rows x (cols + 1)`.
    pub fn vertical(&self) -> &[Vec<bool>] {
        &self.vertical
    }

    /// Square owners, `rows x cols`.
    pub fn owners(&self) -> &[Vec<Option<Player>>] {
        &self.owners
    }

    /// Checks whether a move addresses an edge of this grid.
    pub fn in_bounds(&self, mv: &Move) -> bool {
        match mv.kind {
            EdgeKind::Horizontal => mv.row <= self.rows && mv.col < self.cols,
            EdgeKind::Vertical => mv.row < self.rows && mv.col <= self.cols,
        }
    }

    /// Returns whether the edge is claimed, or `None` if it is out of bounds.
    pub fn is_claimed(&self, mv: &Move) -> Option<bool> {
        let matrix = match mv.kind {
            EdgeKind::Horizontal => &self.horizontal,
            EdgeKind::Vertical => &self.vertical,
        };
        matrix.get(mv.row).and_then(|row| row.get(mv.col)).copied()
    }

    /// Checks whether a move targets an existing, unclaimed edge.
    pub fn is_open(&self, mv: &Move) -> bool {
        self.is_claimed(mv) == Some(false)
    }

    /// Marks the edge as claimed. Caller has validated the move.
    pub(super) fn claim(&mut self, mv: &Move) {
        let matrix = match mv.kind {
            EdgeKind::Horizontal => &mut self.horizontal,
            EdgeKind::Vertical => &mut self.vertical,
        };
        if let Some(edge) = matrix.get_mut(mv.row).and_then(|row| row.get_mut(mv.col)) {
            *edge = true;
        }
    }

    /// Number of claimed edges around square `(row, col)`.
    ///
    /// Returns `None` for coordinates that are not a square of this grid.
    pub fn edge_count(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let sides = [
            self.horizontal[row][col],
            self.horizontal[row + 1][col],
            self.vertical[row][col],
            self.vertical[row][col + 1],
        ];
        Some(sides.iter().filter(|&&claimed| claimed).count() as u8)
    }

    /// Owner of a square, `None` if unowned or out of range.
    pub fn owner(&self, square: SquareCoord) -> Option<Player> {
        self.owners
            .get(square.row)
            .and_then(|row| row.get(square.col))
            .copied()
            .flatten()
    }

    /// Assigns an owner to a square that has none yet.
    pub(super) fn set_owner(&mut self, square: SquareCoord, player: Player) {
        if let Some(cell) = self
            .owners
            .get_mut(square.row)
            .and_then(|row| row.get_mut(square.col))
            && cell.is_none()
        {
            *cell = Some(player);
        }
    }

    /// Squares bordering the edge (at most two), ignoring ownership.
    pub fn adjacent_squares(&self, mv: &Move) -> Vec<SquareCoord> {
        let mut squares = Vec::with_capacity(2);
        if !self.in_bounds(mv) {
            return squares;
        }
        match mv.kind {
            EdgeKind::Horizontal => {
                if mv.row > 0 {
                    squares.push(SquareCoord::new(mv.row - 1, mv.col));
                }
                if mv.row < self.rows {
                    squares.push(SquareCoord::new(mv.row, mv.col));
                }
            }
            EdgeKind::Vertical => {
                if mv.col > 0 {
                    squares.push(SquareCoord::new(mv.row, mv.col - 1));
                }
                if mv.col < self.cols {
                    squares.push(SquareCoord::new(mv.row, mv.col));
                }
            }
        }
        squares
    }

    /// Every unclaimed edge: horizontal row-major, then vertical row-major.
    pub fn unclaimed_edges(&self) -> Vec<Move> {
        let horizontal = self.horizontal.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, claimed)| !**claimed)
                .map(move |(c, _)| Move::horizontal(r, c))
        });
        let vertical = self.vertical.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, claimed)| !**claimed)
                .map(move |(c, _)| Move::vertical(r, c))
        });
        horizontal.chain(vertical).collect()
    }

    /// Total number of squares.
    pub fn square_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Number of squares with an owner.
    pub fn owned_count(&self) -> usize {
        self.owners.iter().flatten().filter(|o| o.is_some()).count()
    }

    /// Number of squares owned by `player`.
    pub fn owned_by(&self, player: Player) -> usize {
        self.owners
            .iter()
            .flatten()
            .filter(|o| **o == Some(player))
            .count()
    }

    /// Number of claimed edges.
    pub fn claimed_count(&self) -> usize {
        self.horizontal
            .iter()
            .chain(self.vertical.iter())
            .flatten()
            .filter(|&&claimed| claimed)
            .count()
    }

    /// Checks whether every square has an owner.
    pub fn is_full(&self) -> bool {
        self.owners.iter().flatten().all(Option::is_some)
    }

    /// Checks that the matrices have the shapes implied by `rows` and `cols`.
    pub fn has_consistent_shape(&self) -> bool {
        Self::check_dimensions(self.rows, self.cols).is_ok()
            && is_shaped(&self.horizontal, self.rows + 1, self.cols)
            && is_shaped(&self.vertical, self.rows, self.cols + 1)
            && is_shaped(&self.owners, self.rows, self.cols)
    }

    /// Formats the grid as plain text: `+` dots, `---`/`|` claimed edges,
    /// owner digits inside squares.
    pub fn render_ascii(&self) -> String {
        let mut out = String::new();
        for r in 0..=self.rows {
            for c in 0..self.cols {
                out.push('+');
                out.push_str(if self.horizontal[r][c] { "---" } else { "   " });
            }
            out.push_str("+\n");
            if r == self.rows {
                break;
            }
            for c in 0..=self.cols {
                out.push(if self.vertical[r][c] { '|' } else { ' ' });
                if c < self.cols {
                    out.push_str(match self.owners[r][c] {
                        Some(Player::One) => " 1 ",
                        Some(Player::Two) => " 2 ",
                        None => "   ",
                    });
                }
            }
            out.push('\n');
        }
        out
    }
}

fn is_shaped<T>(matrix: &[Vec<T>], rows: usize, width: usize) -> bool {
    matrix.len() == rows && matrix.iter().all(|row| row.len() == width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_shapes() {
        let grid = GridModel::new(2, 3).unwrap();
        assert_eq!(grid.horizontal().len(), 3);
        assert!(grid.horizontal().iter().all(|row| row.len() == 3));
        assert_eq!(grid.vertical().len(), 2);
        assert!(grid.vertical().iter().all(|row| row.len() == 4));
        assert_eq!(grid.unclaimed_edges().len(), 9 + 8);
        assert!(grid.has_consistent_shape());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert_eq!(
            GridModel::new(0, 3),
            Err(GridError::EmptyDimension(0, 3))
        );
    }

    #[test]
    fn test_oversized_dimension_rejected() {
        assert_eq!(
            GridModel::new(usize::MAX, 1),
            Err(GridError::TooLarge(usize::MAX, 1))
        );
        assert_eq!(
            GridModel::new(2, MAX_DIMENSION + 1),
            Err(GridError::TooLarge(2, MAX_DIMENSION + 1))
        );
        assert!(GridModel::new(MAX_DIMENSION, MAX_DIMENSION).is_ok());
    }

    #[test]
    fn test_shape_check_with_huge_rows() {
        let mut grid = GridModel::new(1, 1).unwrap();
        grid.rows = usize::MAX;
        assert!(!grid.has_consistent_shape());
    }

    #[test]
    fn test_bounds() {
        let grid = GridModel::new(2, 2).unwrap();
        assert!(grid.in_bounds(&Move::horizontal(2, 1)));
        assert!(!grid.in_bounds(&Move::horizontal(2, 2)));
        assert!(!grid.in_bounds(&Move::horizontal(3, 0)));
        assert!(grid.in_bounds(&Move::vertical(1, 2)));
        assert!(!grid.in_bounds(&Move::vertical(2, 0)));
        assert_eq!(grid.is_claimed(&Move::vertical(2, 0)), None);
    }

    #[test]
    fn test_edge_count_sentinel() {
        let mut grid = GridModel::new(2, 2).unwrap();
        grid.claim(&Move::horizontal(0, 0));
        grid.claim(&Move::vertical(0, 1));
        assert_eq!(grid.edge_count(0, 0), Some(2));
        assert_eq!(grid.edge_count(0, 1), Some(1));
        assert_eq!(grid.edge_count(2, 0), None);
        assert_eq!(grid.edge_count(0, 2), None);
    }

    #[test]
    fn test_adjacent_squares_at_border() {
        let grid = GridModel::new(2, 2).unwrap();
        assert_eq!(
            grid.adjacent_squares(&Move::horizontal(0, 1)),
            vec![SquareCoord::new(0, 1)]
        );
        assert_eq!(
            grid.adjacent_squares(&Move::horizontal(1, 0)),
            vec![SquareCoord::new(0, 0), SquareCoord::new(1, 0)]
        );
        assert_eq!(
            grid.adjacent_squares(&Move::vertical(1, 2)),
            vec![SquareCoord::new(1, 1)]
        );
        assert!(grid.adjacent_squares(&Move::vertical(5, 5)).is_empty());
    }

    #[test]
    fn test_owner_never_overwritten() {
        let mut grid = GridModel::new(1, 1).unwrap();
        let square = SquareCoord::new(0, 0);
        grid.set_owner(square, Player::One);
        grid.set_owner(square, Player::Two);
        assert_eq!(grid.owner(square), Some(Player::One));
    }

    #[test]
    fn test_render_ascii() {
        let mut grid = GridModel::new(1, 1).unwrap();
        grid.claim(&Move::horizontal(0, 0));
        grid.claim(&Move::vertical(0, 0));
        assert_eq!(grid.render_ascii(), "+---+\n|    \n+   +\n");
    }
}
