//! History consistency invariant: one history entry per claimed cell.

use super::Invariant;
use crate::round::RoundState;

/// Invariant: history length, move counter and claimed cells agree.
pub struct HistoryConsistentInvariant;

impl Invariant<RoundState> for HistoryConsistentInvariant {
    fn holds(state: &RoundState) -> bool {
        let history_len = state.history().len();
        history_len == state.moves_made() && history_len == state.board().occupied()
    }

    fn description() -> &'static str {
        "History length matches moves made and claimed cells"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameMode, RoundConfig};

    #[test]
    fn test_holds_through_play_and_undo() {
        let config = RoundConfig::new(3, 3, 2, GameMode::Survivor).unwrap();
        let state = RoundState::replay(config, &[4, 0, 8]).unwrap();
        assert!(HistoryConsistentInvariant::holds(&state));
        assert_eq!(state.history().len(), 3);

        let undone = state.undo_last_move().unwrap();
        assert!(HistoryConsistentInvariant::holds(&undone));
    }

    #[test]
    fn test_counter_drift_violates() {
        let config = RoundConfig::new(3, 3, 2, GameMode::Survivor).unwrap();
        let mut state = RoundState::replay(config, &[4]).unwrap();
        state.moves_made = 2;
        assert!(!HistoryConsistentInvariant::holds(&state));
    }
}
