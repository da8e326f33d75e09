//! Line completion detection for an arbitrary match length.

use crate::geometry::{candidate_lines, lines_through};
use crate::types::{Board, Line, LineId, PlayerId};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Returns every line of `match_length` cells all claimed by `player`.
///
/// Lines already scored earlier in the round are included; use
/// [`new_lines`] to filter them out.
#[instrument(skip(board), fields(grid_size = board.grid_size()))]
pub fn find_lines(board: &Board, player: PlayerId, match_length: usize) -> Vec<Line> {
    let lines: Vec<Line> = candidate_lines(board.grid_size(), match_length)
        .into_iter()
        .filter(|line| line.cells.iter().all(|&cell| board.get(cell) == Some(player)))
        .collect();
    debug!(player, found = lines.len(), "Scanned board for lines");
    lines
}

/// Lines of `player` whose identifiers are not yet in `completed`.
#[instrument(skip(board, completed), fields(completed = completed.len()))]
pub fn new_lines(
    board: &Board,
    player: PlayerId,
    match_length: usize,
    completed: &BTreeSet<LineId>,
) -> Vec<Line> {
    find_lines(board, player, match_length)
        .into_iter()
        .filter(|line| !completed.contains(&line.id()))
        .collect()
}

/// New lines of `player` that pass through `cell`.
///
/// After a claim on `cell`, these are the only lines the claim can have
/// completed, so this matches [`new_lines`] whenever every earlier line is
/// already in `completed`.
#[instrument(skip(board, completed), fields(completed = completed.len()))]
pub fn new_lines_through(
    board: &Board,
    cell: usize,
    player: PlayerId,
    match_length: usize,
    completed: &BTreeSet<LineId>,
) -> Vec<Line> {
    lines_through(cell, board.grid_size(), match_length)
        .into_iter()
        .filter(|line| line.cells.iter().all(|&c| board.get(c) == Some(player)))
        .filter(|line| !completed.contains(&line.id()))
        .collect()
}
