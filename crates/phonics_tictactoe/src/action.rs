//! Moves, the events they produce, and the errors they can raise.
//!
//! A move is recorded once it is accepted. Its scored lines and blocked
//! opponents are filled in as part of the same transition so that undo
//! can reverse it exactly.

use super::config::ConfigError;
use super::invariants::InvariantViolation;
use super::types::{Direction, LineId, PlayerId};
use derive_new::new;
use serde::{Deserialize, Serialize};

/// A player's intent to claim a cell, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct Claim {
    /// Cell to claim.
    pub cell: usize,
    /// Player claiming it.
    pub player: PlayerId,
}

/// An accepted move kept in the round history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct MoveRecord {
    /// Cell the player claimed.
    pub cell: usize,
    /// Player who claimed it.
    pub player: PlayerId,
    /// Lines this move completed, in detection order.
    #[new(default)]
    pub scored_lines: Vec<LineId>,
    /// Opponents who needed this cell for a fresh line.
    #[new(default)]
    pub blocked: Vec<PlayerId>,
}

impl MoveRecord {
    /// Points the move earned.
    pub fn points(&self) -> usize {
        self.scored_lines.len()
    }

    /// Returns true if at least one opponent was blocked.
    pub fn was_block(&self) -> bool {
        !self.blocked.is_empty()
    }
}

impl std::fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {} -> cell {}", self.player + 1, self.cell)
    }
}

/// A line completed by a move, for the UI to highlight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct LineEvent {
    /// Canonical identifier.
    pub line_id: LineId,
    /// Cells in walking order.
    pub cells: Vec<usize>,
    /// Axis of the line.
    pub direction: Direction,
    /// Player credited with the line.
    pub scoring_player: PlayerId,
}

/// A move the round cannot accept. Nothing is mutated.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Cell index past the end of the board.
    #[display("Cell {} is outside the board ({} cells)", cell, cells)]
    OutOfBounds {
        /// Requested cell.
        cell: usize,
        /// Number of cells on the board.
        cells: usize,
    },

    /// The cell already carries a mark.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(usize),

    /// Someone other than the current player tried to move.
    #[display("It's player {}'s turn, not player {}'s", expected + 1, got + 1)]
    WrongPlayer {
        /// Player whose turn it is.
        expected: PlayerId,
        /// Player who tried to move.
        got: PlayerId,
    },

    /// Player index not taking part in the round.
    #[display("Player {} is not in this round", _0 + 1)]
    UnknownPlayer(PlayerId),

    /// The round has already ended.
    #[display("Round is already over")]
    RoundOver,

    /// A postcondition failed after applying the move.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}

/// Undo requested with nothing to undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum UndoError {
    /// Move history is empty.
    #[display("No moves to undo")]
    NoHistory,
}

impl std::error::Error for UndoError {}

/// Turn advance found nobody left to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum TurnError {
    /// Every player is eliminated.
    #[display("All players are eliminated")]
    AllPlayersEliminated,
}

impl std::error::Error for TurnError {}

/// Any error the round API can return.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::From)]
pub enum RoundError {
    /// Rejected move.
    #[display("{}", _0)]
    InvalidMove(MoveError),
    /// Rejected configuration.
    #[display("{}", _0)]
    InvalidConfig(ConfigError),
    /// Nothing to undo.
    #[display("{}", _0)]
    NoHistory(UndoError),
    /// No eligible player.
    #[display("{}", _0)]
    AllPlayersEliminated(TurnError),
    /// A saved round that contradicts its own configuration or history.
    #[display("Saved round is inconsistent: {}", _0)]
    CorruptState(InvariantViolation),
}

impl std::error::Error for RoundError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RoundError::InvalidMove(e) => Some(e),
            RoundError::InvalidConfig(e) => Some(e),
            RoundError::NoHistory(e) => Some(e),
            RoundError::AllPlayersEliminated(e) => Some(e),
            RoundError::CorruptState(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_starts_without_lines() {
        let record = MoveRecord::new(4, 1);
        assert_eq!(record.points(), 0);
        assert!(!record.was_block());
        assert_eq!(record.to_string(), "Player 2 -> cell 4");
    }

    #[test]
    fn test_move_error_display() {
        assert_eq!(
            MoveError::WrongPlayer { expected: 0, got: 1 }.to_string(),
            "It's player 1's turn, not player 2's"
        );
        assert_eq!(MoveError::CellOccupied(3).to_string(), "Cell 3 is already occupied");
    }

    #[test]
    fn test_round_error_wraps_sources() {
        let err: RoundError = UndoError::NoHistory.into();
        assert_eq!(err.to_string(), "No moves to undo");
        assert!(std::error::Error::source(&err).is_some());
    }
}
