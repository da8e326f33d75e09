//! Monotonic board invariant: the board is exactly the replayed history.

use super::Invariant;
use crate::round::RoundState;
use crate::types::Board;

/// Invariant: replaying the move history onto an empty board reproduces it.
///
/// Every move must land on an empty cell, so no mark is ever overwritten.
pub struct MonotonicBoardInvariant;

impl Invariant<RoundState> for MonotonicBoardInvariant {
    fn holds(state: &RoundState) -> bool {
        let mut reconstructed = Board::new(state.board().grid_size());
        for record in state.history() {
            if !reconstructed.is_vacant(record.cell) {
                return false;
            }
            reconstructed.set(record.cell, Some(record.player));
        }
        reconstructed == *state.board()
    }

    fn description() -> &'static str {
        "Board matches replayed history with no overwritten cells"
    }
}
