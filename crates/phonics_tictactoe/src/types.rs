//! Core domain types: board cells, lines and line identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, IntoEnumIterator};

/// Zero-based index of a player within a round.
pub type PlayerId = usize;

/// Marks drawn for the first few players when rendering a board as text.
pub const PLAYER_SYMBOLS: [&str; 5] = ["X", "O", "△", "□", "☆"];

/// Square board of `grid_size × grid_size` cells in row-major order.
///
/// Each cell is either empty (`None`) or claimed by a player.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    grid_size: usize,
    cells: Vec<Option<PlayerId>>,
}

impl Board {
    /// Creates an empty board with `grid_size` cells per side.
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            cells: vec![None; grid_size * grid_size],
        }
    }

    /// Cells per side.
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true for a zero-sized board.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Owner of the cell, `None` if empty or out of bounds.
    pub fn get(&self, cell: usize) -> Option<PlayerId> {
        self.cells.get(cell).copied().flatten()
    }

    /// Returns true if the cell exists and nobody has claimed it.
    pub fn is_vacant(&self, cell: usize) -> bool {
        matches!(self.cells.get(cell), Some(None))
    }

    /// Overwrites a cell. Out-of-bounds writes are ignored.
    pub(crate) fn set(&mut self, cell: usize, owner: Option<PlayerId>) {
        if let Some(slot) = self.cells.get_mut(cell) {
            *slot = owner;
        }
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Option<PlayerId>] {
        &self.cells
    }

    /// Returns true once every cell is claimed.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Indices of unclaimed cells.
    pub fn empty_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, owner)| owner.is_none())
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Number of claimed cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|owner| owner.is_some()).count()
    }

    /// Formats the board as a human-readable grid.
    ///
    /// Empty cells show their index, claimed cells the owner's symbol.
    pub fn display(&self) -> String {
        let width = self.len().saturating_sub(1).to_string().len().max(1);
        let mut rows = Vec::with_capacity(self.grid_size);
        for row in 0..self.grid_size {
            let line = (0..self.grid_size)
                .map(|col| {
                    let cell = row * self.grid_size + col;
                    let label = match self.cells[cell] {
                        None => cell.to_string(),
                        Some(player) => PLAYER_SYMBOLS
                            .get(player)
                            .map(|s| s.to_string())
                            .unwrap_or_else(|| format!("P{}", player + 1)),
                    };
                    format!("{:>width$}", label, width = width)
                })
                .collect::<Vec<_>>()
                .join(" | ");
            rows.push(line);
        }
        rows.join("\n")
    }
}

/// One of the four axes a line can run along.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
    strum::Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    /// Left to right along a row.
    Horizontal,
    /// Top to bottom along a column.
    Vertical,
    /// Down and to the right.
    DiagonalDownRight,
    /// Down and to the left.
    DiagonalDownLeft,
}

impl Direction {
    /// All four directions in scan order.
    pub fn all() -> impl Iterator<Item = Direction> {
        Direction::iter()
    }

    /// Row and column step for one cell along this direction.
    pub fn step(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::DiagonalDownRight => (1, 1),
            Direction::DiagonalDownLeft => (1, -1),
        }
    }

    /// Returns true if a line of `match_length` starting at `(row, col)` stays on the board.
    pub fn fits(self, row: usize, col: usize, grid_size: usize, match_length: usize) -> bool {
        if match_length == 0 || match_length > grid_size {
            return false;
        }
        let last = grid_size - match_length;
        match self {
            Direction::Horizontal => row < grid_size && col <= last,
            Direction::Vertical => row <= last && col < grid_size,
            Direction::DiagonalDownRight => row <= last && col <= last,
            Direction::DiagonalDownLeft => {
                row <= last && col >= match_length - 1 && col < grid_size
            }
        }
    }
}

/// Canonical identifier of a line: its cell indices sorted and comma-joined.
///
/// Two lines covering the same cells always share an identifier,
/// whatever direction they were discovered from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(String);

impl LineId {
    /// Builds the identifier for a set of cells.
    pub fn from_cells(cells: &[usize]) -> Self {
        let mut sorted = cells.to_vec();
        sorted.sort_unstable();
        let joined = sorted
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(",");
        Self(joined)
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the cell indices back out of the identifier.
    pub fn cells(&self) -> Vec<usize> {
        self.0
            .split(',')
            .filter_map(|part| part.parse().ok())
            .collect()
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `match_length` collinear, adjacent cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    /// Cell indices in walking order from the starting cell.
    pub cells: Vec<usize>,
    /// Axis the line runs along.
    pub direction: Direction,
}

impl Line {
    /// Canonical identifier for deduplication.
    pub fn id(&self) -> LineId {
        LineId::from_cells(&self.cells)
    }

    /// Returns true if the line passes through the cell.
    pub fn contains(&self, cell: usize) -> bool {
        self.cells.contains(&cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(4);
        assert_eq!(board.len(), 16);
        assert_eq!(board.occupied(), 0);
        assert!(!board.is_full());
        assert_eq!(board.empty_cells().len(), 16);
    }

    #[test]
    fn test_vacancy_and_bounds() {
        let mut board = Board::new(3);
        board.set(4, Some(1));
        assert!(!board.is_vacant(4));
        assert!(board.is_vacant(0));
        assert!(!board.is_vacant(9));
        assert_eq!(board.get(4), Some(1));
        assert_eq!(board.get(42), None);
    }

    #[test]
    fn test_line_id_is_order_independent() {
        assert_eq!(LineId::from_cells(&[8, 4, 0]), LineId::from_cells(&[0, 4, 8]));
        assert_eq!(LineId::from_cells(&[2, 10, 1]).as_str(), "1,2,10");
    }

    #[test]
    fn test_line_id_parses_cells() {
        let id = LineId::from_cells(&[6, 4, 2]);
        assert_eq!(id.cells(), vec![2, 4, 6]);
    }

    #[test]
    fn test_direction_fits() {
        assert!(Direction::Horizontal.fits(2, 0, 3, 3));
        assert!(!Direction::Horizontal.fits(0, 1, 3, 3));
        assert!(Direction::DiagonalDownLeft.fits(0, 2, 3, 3));
        assert!(!Direction::DiagonalDownLeft.fits(0, 1, 3, 3));
        assert!(!Direction::Vertical.fits(0, 0, 2, 3));
    }

    #[test]
    fn test_display_shows_symbols_and_indices() {
        let mut board = Board::new(3);
        board.set(0, Some(0));
        board.set(4, Some(1));
        let text = board.display();
        assert!(text.starts_with("X | 1 | 2"));
        assert!(text.contains("3 | O | 5"));
    }
}
