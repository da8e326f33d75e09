//! Score bookkeeping invariant: scores are exactly the lines credited in history.

use super::Invariant;
use crate::round::RoundState;
use std::collections::BTreeSet;

/// Invariant: each score equals the lines that player scored, and the
/// completed-lines set is exactly the union of scored lines, none twice.
pub struct ScoresMatchLinesInvariant;

impl Invariant<RoundState> for ScoresMatchLinesInvariant {
    fn holds(state: &RoundState) -> bool {
        let mut credited = vec![0u32; state.scores().len()];
        let mut seen = BTreeSet::new();
        for record in state.history() {
            let Some(slot) = credited.get_mut(record.player) else {
                return false;
            };
            *slot += record.points() as u32;
            for id in &record.scored_lines {
                if !seen.insert(id.clone()) {
                    return false;
                }
            }
        }
        credited == state.scores() && seen == *state.completed_lines()
    }

    fn description() -> &'static str {
        "Scores and completed lines match the lines scored in history"
    }
}
