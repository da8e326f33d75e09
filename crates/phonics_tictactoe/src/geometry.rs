//! Line geometry: every run of `match_length` cells that fits on a board.
//!
//! Pure functions of the board dimensions. Nothing here looks at marks.

use super::types::{Direction, Line};
use tracing::instrument;

/// Builds the line starting at `(row, col)` in `direction`, if it fits on the board.
pub fn line_at(
    row: usize,
    col: usize,
    direction: Direction,
    grid_size: usize,
    match_length: usize,
) -> Option<Line> {
    if !direction.fits(row, col, grid_size, match_length) {
        return None;
    }
    let cells = (0..match_length)
        .map(|i| match direction {
            Direction::Horizontal => row * grid_size + col + i,
            Direction::Vertical => (row + i) * grid_size + col,
            Direction::DiagonalDownRight => (row + i) * grid_size + (col + i),
            Direction::DiagonalDownLeft => (row + i) * grid_size + (col - i),
        })
        .collect();
    Some(Line { cells, direction })
}

/// All lines on a `grid_size × grid_size` board, scanned row by row.
///
/// For each cell the directions are tried in the order horizontal,
/// vertical, down-right, down-left.
#[instrument]
pub fn candidate_lines(grid_size: usize, match_length: usize) -> Vec<Line> {
    let mut lines = Vec::new();
    for row in 0..grid_size {
        for col in 0..grid_size {
            for direction in Direction::all() {
                if let Some(line) = line_at(row, col, direction, grid_size, match_length) {
                    lines.push(line);
                }
            }
        }
    }
    lines
}

/// Lines that pass through `cell`.
///
/// These are the only lines a move on `cell` can complete.
#[instrument]
pub fn lines_through(cell: usize, grid_size: usize, match_length: usize) -> Vec<Line> {
    if grid_size == 0 || cell >= grid_size * grid_size {
        return Vec::new();
    }
    let row = (cell / grid_size) as isize;
    let col = (cell % grid_size) as isize;
    let mut lines = Vec::new();
    for direction in Direction::all() {
        let (dr, dc) = direction.step();
        // Slide the starting cell back along the axis so that `cell` sits at every offset.
        for offset in 0..match_length as isize {
            let start_row = row - dr * offset;
            let start_col = col - dc * offset;
            if start_row < 0 || start_col < 0 {
                continue;
            }
            if let Some(line) = line_at(
                start_row as usize,
                start_col as usize,
                direction,
                grid_size,
                match_length,
            ) {
                lines.push(line);
            }
        }
    }
    lines
}
