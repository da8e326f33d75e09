//! Contract-based validation for moves.
//!
//! Contracts define correctness through preconditions and postconditions:
//! {P} claim {Q}. Preconditions always run; postconditions run in debug
//! builds.

use super::action::{Claim, MoveError};
use super::invariants::{InvariantSet, RoundInvariants};
use super::round::RoundState;
use tracing::instrument;

/// Preconditions and postconditions for a state transition.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

/// Precondition: the round still accepts moves.
pub struct RoundIsOpen;

impl RoundIsOpen {
    /// Fails with [`MoveError::RoundOver`] once the round has ended.
    pub fn check(_claim: &Claim, state: &RoundState) -> Result<(), MoveError> {
        if state.is_ended() {
            Err(MoveError::RoundOver)
        } else {
            Ok(())
        }
    }
}

/// Precondition: the player takes part in the round.
pub struct PlayerInRound;

impl PlayerInRound {
    /// Fails with [`MoveError::UnknownPlayer`] for an index past the last player.
    pub fn check(claim: &Claim, state: &RoundState) -> Result<(), MoveError> {
        if claim.player >= state.config().num_players() {
            Err(MoveError::UnknownPlayer(claim.player))
        } else {
            Ok(())
        }
    }
}

/// Precondition: the cell exists and is empty.
pub struct CellIsVacant;

impl CellIsVacant {
    /// Fails with [`MoveError::OutOfBounds`] or [`MoveError::CellOccupied`].
    pub fn check(claim: &Claim, state: &RoundState) -> Result<(), MoveError> {
        let cells = state.board().len();
        if claim.cell >= cells {
            Err(MoveError::OutOfBounds {
                cell: claim.cell,
                cells,
            })
        } else if !state.board().is_vacant(claim.cell) {
            Err(MoveError::CellOccupied(claim.cell))
        } else {
            Ok(())
        }
    }
}

/// Precondition: it is the claiming player's turn.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Fails with [`MoveError::WrongPlayer`] when someone moves out of turn.
    pub fn check(claim: &Claim, state: &RoundState) -> Result<(), MoveError> {
        if claim.player != state.current_player() {
            Err(MoveError::WrongPlayer {
                expected: state.current_player(),
                got: claim.player,
            })
        } else {
            Ok(())
        }
    }
}

/// Composite precondition for a claim.
pub struct LegalClaim;

impl LegalClaim {
    /// Validates all preconditions in order.
    #[instrument(skip(state))]
    pub fn check(claim: &Claim, state: &RoundState) -> Result<(), MoveError> {
        RoundIsOpen::check(claim, state)?;
        PlayerInRound::check(claim, state)?;
        CellIsVacant::check(claim, state)?;
        PlayersTurn::check(claim, state)?;
        Ok(())
    }
}

/// Contract for claims.
///
/// Preconditions: round open, known player, vacant in-bounds cell, right turn.
/// Postconditions: every [`RoundInvariants`] member holds and exactly one
/// move was added.
pub struct MoveContract;

impl Contract<RoundState, Claim> for MoveContract {
    fn pre(state: &RoundState, claim: &Claim) -> Result<(), MoveError> {
        LegalClaim::check(claim, state)
    }

    fn post(before: &RoundState, after: &RoundState) -> Result<(), MoveError> {
        if after.moves_made() != before.moves_made() + 1 {
            return Err(MoveError::InvariantViolation(
                "Postcondition failed: move counter did not advance by one".to_string(),
            ));
        }
        RoundInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            MoveError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })
    }
}
