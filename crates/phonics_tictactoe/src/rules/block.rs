//! Block detection: did a move take a cell an opponent needed?

use super::win::new_lines_through;
use crate::types::{Board, LineId, PlayerId};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Opponents of `mover` who would have completed a new line on `cell`.
///
/// Evaluated on a copy of the board before the move is written, looking
/// only at lines through `cell`. Lines already scored do not count. The
/// real board is never touched.
#[instrument(skip(board, completed), fields(grid_size = board.grid_size()))]
pub fn blocked_opponents(
    board: &Board,
    cell: usize,
    mover: PlayerId,
    num_players: usize,
    match_length: usize,
    completed: &BTreeSet<LineId>,
) -> Vec<PlayerId> {
    if !board.is_vacant(cell) {
        return Vec::new();
    }
    let blocked: Vec<PlayerId> = (0..num_players)
        .filter(|&opponent| opponent != mover)
        .filter(|&opponent| {
            let mut hypothetical = board.clone();
            hypothetical.set(cell, Some(opponent));
            !new_lines_through(&hypothetical, cell, opponent, match_length, completed).is_empty()
        })
        .collect();
    if !blocked.is_empty() {
        debug!(cell, mover, ?blocked, "Move blocks opponents");
    }
    blocked
}
