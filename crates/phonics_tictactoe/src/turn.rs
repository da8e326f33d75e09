//! Turn order: round-robin over players who are still standing.

use super::action::TurnError;
use super::types::PlayerId;
use tracing::{instrument, warn};

/// The player after `current`, skipping anyone in `eliminated`.
///
/// Tries each seat at most once, so a table where everyone is out
/// yields [`TurnError::AllPlayersEliminated`] instead of spinning.
#[instrument]
pub fn next_player(
    current: PlayerId,
    num_players: usize,
    eliminated: &[PlayerId],
) -> Result<PlayerId, TurnError> {
    for step in 1..=num_players {
        let candidate = (current + step) % num_players;
        if !eliminated.contains(&candidate) {
            return Ok(candidate);
        }
    }
    warn!(current, num_players, "No eligible player left");
    Err(TurnError::AllPlayersEliminated)
}
