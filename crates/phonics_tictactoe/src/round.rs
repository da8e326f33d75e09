//! Round state and the move/undo/winner state machine.
//!
//! A [`RoundState`] is a plain value. Every operation takes the current
//! state by reference and hands back a new one, so hypothetical checks
//! and undo never disturb a state someone else is holding.

use super::action::{Claim, LineEvent, MoveError, MoveRecord, RoundError, UndoError};
use super::config::{ConfigError, GameMode, RoundConfig};
use super::contracts::{Contract, MoveContract};
use super::invariants::{InvariantSet, InvariantViolation, RoundInvariants};
use super::phases::{EndReason, RoundPhase, Verdict};
use super::rules::{blocked_opponents, new_lines_through};
use super::turn::next_player;
use super::types::{Board, LineId, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

/// Everything that changes during one round.
///
/// Deserialising checks the saved state against its configuration and
/// the round invariants, so a resumed round cannot be inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SavedRound")]
pub struct RoundState {
    pub(crate) config: RoundConfig,
    pub(crate) board: Board,
    pub(crate) scores: Vec<u32>,
    pub(crate) current_player: PlayerId,
    pub(crate) moves_made: usize,
    pub(crate) completed_lines: BTreeSet<LineId>,
    pub(crate) history: Vec<MoveRecord>,
    pub(crate) phase: RoundPhase,
}

/// A round as read from storage, before any checks.
#[derive(Deserialize)]
struct SavedRound {
    config: RoundConfig,
    board: Board,
    scores: Vec<u32>,
    current_player: PlayerId,
    moves_made: usize,
    completed_lines: BTreeSet<LineId>,
    history: Vec<MoveRecord>,
    phase: RoundPhase,
}

impl TryFrom<SavedRound> for RoundState {
    type Error = RoundError;

    fn try_from(saved: SavedRound) -> Result<Self, Self::Error> {
        saved.config.validate()?;
        let num_players = saved.config.num_players();
        let cells = saved.config.cell_count();
        let shape_error = if saved.board.grid_size() != saved.config.grid_size()
            || saved.board.len() != cells
        {
            Some("Board size does not match the configuration")
        } else if saved.scores.len() != num_players {
            Some("Expected one score per player")
        } else if saved.current_player >= num_players {
            Some("Current player is not in the round")
        } else if saved.board.cells().iter().flatten().any(|&p| p >= num_players) {
            Some("Board holds a mark for a player not in the round")
        } else if saved
            .history
            .iter()
            .any(|record| record.cell >= cells || record.player >= num_players)
        {
            Some("History refers to a cell or player outside the round")
        } else {
            None
        };
        if let Some(description) = shape_error {
            warn!(description, "Rejected saved round");
            return Err(InvariantViolation::new(description).into());
        }

        let state = Self {
            config: saved.config,
            board: saved.board,
            scores: saved.scores,
            current_player: saved.current_player,
            moves_made: saved.moves_made,
            completed_lines: saved.completed_lines,
            history: saved.history,
            phase: saved.phase,
        };
        RoundInvariants::check_all(&state).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            warn!(%descriptions, "Rejected saved round");
            InvariantViolation::new(descriptions)
        })?;
        Ok(state)
    }
}

/// Result of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// State after the move.
    pub state: RoundState,
    /// The move as recorded in history.
    pub record: MoveRecord,
    /// Lines completed by the move.
    pub points_scored: usize,
    /// Opponents who needed the claimed cell.
    pub blocked: Vec<PlayerId>,
    /// One event per completed line.
    pub line_events: Vec<LineEvent>,
    /// Whether the move ended the round.
    pub round_ended: bool,
    /// Survivor: the player knocked out by this move.
    pub eliminated: Option<PlayerId>,
}

impl MoveOutcome {
    /// Returns true if at least one opponent was blocked.
    pub fn was_block(&self) -> bool {
        !self.blocked.is_empty()
    }
}

impl RoundState {
    /// Starts a fresh round: empty board, zero scores, player 0 to move.
    #[instrument]
    pub fn start(config: RoundConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            grid_size = config.grid_size(),
            match_length = config.match_length(),
            num_players = config.num_players(),
            mode = %config.mode(),
            "Starting round"
        );
        Ok(Self {
            config,
            board: Board::new(config.grid_size()),
            scores: vec![0; config.num_players()],
            current_player: 0,
            moves_made: 0,
            completed_lines: BTreeSet::new(),
            history: Vec::new(),
            phase: RoundPhase::InProgress,
        })
    }

    /// Rebuilds a round by playing `cells` in order, each by whoever is to move.
    #[instrument(skip(cells), fields(moves = cells.len()))]
    pub fn replay(config: RoundConfig, cells: &[usize]) -> Result<Self, RoundError> {
        let mut state = Self::start(config)?;
        for &cell in cells {
            let player = state.current_player;
            state = state.apply_move(cell, player)?.state;
        }
        Ok(state)
    }

    /// Applies `player`'s claim on `cell`.
    ///
    /// Block detection runs on a hypothetical board before the mark is
    /// written. Lines already scored this round are never scored again.
    /// On error `self` is untouched and the caller keeps the old state.
    #[instrument(skip(self), fields(mode = %self.config.mode()))]
    pub fn apply_move(&self, cell: usize, player: PlayerId) -> Result<MoveOutcome, MoveError> {
        let claim = Claim::new(cell, player);
        if let Err(e) = MoveContract::pre(self, &claim) {
            warn!(error = %e, "Rejected move");
            return Err(e);
        }

        let match_length = self.config.match_length();
        let num_players = self.config.num_players();
        let policy = self.config.mode().policy();

        let blocked = blocked_opponents(
            &self.board,
            cell,
            player,
            num_players,
            match_length,
            &self.completed_lines,
        );

        let mut next = self.clone();
        next.board.set(cell, Some(player));

        let mut record = MoveRecord::new(cell, player);
        record.blocked = blocked.clone();
        let mut line_events = Vec::new();
        let scored =
            new_lines_through(&next.board, cell, player, match_length, &next.completed_lines);
        for line in scored {
            let id = line.id();
            next.completed_lines.insert(id.clone());
            next.scores[player] += 1;
            record.scored_lines.push(id.clone());
            line_events.push(LineEvent::new(id, line.cells, line.direction, player));
        }
        let points_scored = record.points();
        if points_scored > 0 {
            info!(player, points_scored, score = next.scores[player], "Lines completed");
        }

        next.history.push(record.clone());
        next.moves_made += 1;

        let eliminated_before = policy.eliminated(&self.scores);
        let eliminated_after = policy.eliminated(&next.scores);
        let eliminated = eliminated_after
            .iter()
            .copied()
            .find(|p| !eliminated_before.contains(p));
        if let Some(out) = eliminated {
            info!(player = out, "Player eliminated");
        }

        let mut end = if points_scored > 0 {
            policy.on_score(&next.scores, player, points_scored)
        } else {
            None
        };
        if end.is_none() && next.moves_made == self.config.cell_count() {
            end = Some(EndReason::BoardFull);
        }
        if end.is_none() {
            match next_player(player, num_players, &eliminated_after) {
                Ok(following) => next.current_player = following,
                Err(e) => {
                    warn!(error = %e, "Ending round early");
                    end = Some(EndReason::NoEligiblePlayer);
                }
            }
        }
        if let Some(reason) = end {
            info!(%reason, "Round ended");
            next.phase = RoundPhase::Ended(reason);
        }

        #[cfg(debug_assertions)]
        MoveContract::post(self, &next)?;

        debug!(moves_made = next.moves_made, next_player = next.current_player, "Move applied");
        Ok(MoveOutcome {
            state: next,
            record,
            points_scored,
            blocked,
            line_events,
            round_ended: end.is_some(),
            eliminated,
        })
    }

    /// Reverses the most recent move exactly.
    ///
    /// The turn goes back to the player who made the move and an ended
    /// round reopens.
    #[instrument(skip(self), fields(history = self.history.len()))]
    pub fn undo_last_move(&self) -> Result<RoundState, UndoError> {
        let mut prev = self.clone();
        let last = prev.history.pop().ok_or(UndoError::NoHistory)?;
        prev.board.set(last.cell, None);
        prev.scores[last.player] = prev.scores[last.player].saturating_sub(last.points() as u32);
        for id in &last.scored_lines {
            prev.completed_lines.remove(id);
        }
        prev.current_player = last.player;
        prev.moves_made -= 1;
        prev.phase = RoundPhase::InProgress;
        info!(cell = last.cell, player = last.player, "Undid move");
        Ok(prev)
    }

    /// Winners under the round's mode, from the current scores.
    #[instrument(skip(self), fields(mode = %self.config.mode()))]
    pub fn determine_winners(&self) -> Verdict {
        let winners = self.config.mode().policy().winners(&self.scores);
        Verdict::from_winners(winners, self.config.num_players())
    }

    /// Players knocked out so far. Always empty outside Survivor.
    pub fn eliminated_players(&self) -> Vec<PlayerId> {
        self.config.mode().policy().eliminated(&self.scores)
    }

    /// Players still taking turns.
    pub fn remaining_players(&self) -> Vec<PlayerId> {
        let out = self.eliminated_players();
        (0..self.config.num_players())
            .filter(|p| !out.contains(p))
            .collect()
    }

    /// Cells that can still be claimed. Empty once the round has ended.
    pub fn legal_moves(&self) -> Vec<usize> {
        if self.phase.is_ended() {
            Vec::new()
        } else {
            self.board.empty_cells()
        }
    }

    /// Round configuration.
    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Active mode.
    pub fn mode(&self) -> GameMode {
        self.config.mode()
    }

    /// Board snapshot.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Scores indexed by player.
    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    /// Player to move (the last mover once the round has ended).
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    /// Number of moves applied.
    pub fn moves_made(&self) -> usize {
        self.moves_made
    }

    /// Identifiers of lines scored this round.
    pub fn completed_lines(&self) -> &BTreeSet<LineId> {
        &self.completed_lines
    }

    /// Accepted moves, oldest first.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Returns true once the round has ended.
    pub fn is_ended(&self) -> bool {
        self.phase.is_ended()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(grid: usize, length: usize, players: usize, mode: GameMode) -> RoundState {
        RoundState::start(RoundConfig::new(grid, length, players, mode).unwrap()).unwrap()
    }

    /// Plays the cells in turn order, panicking on any rejected move.
    fn play(mut state: RoundState, cells: &[usize]) -> RoundState {
        for &cell in cells {
            let player = state.current_player();
            state = state.apply_move(cell, player).unwrap().state;
        }
        state
    }

    #[test]
    fn test_start_is_blank() {
        let state = round(3, 3, 2, GameMode::Conquest);
        assert_eq!(state.scores(), &[0, 0]);
        assert_eq!(state.current_player(), 0);
        assert_eq!(state.moves_made(), 0);
        assert!(state.completed_lines().is_empty());
        assert_eq!(state.phase(), RoundPhase::InProgress);
    }

    #[test]
    fn test_occupied_cell_rejected_without_mutation() {
        let state = play(round(3, 3, 2, GameMode::Conquest), &[4]);
        let before = state.clone();
        assert_eq!(state.apply_move(4, 1), Err(MoveError::CellOccupied(4)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let state = round(3, 3, 2, GameMode::Conquest);
        assert_eq!(
            state.apply_move(9, 0),
            Err(MoveError::OutOfBounds { cell: 9, cells: 9 })
        );
    }

    #[test]
    fn test_wrong_player_rejected() {
        let state = round(3, 3, 2, GameMode::Conquest);
        assert_eq!(
            state.apply_move(0, 1),
            Err(MoveError::WrongPlayer { expected: 0, got: 1 })
        );
    }

    #[test]
    fn test_scoring_move_reports_line() {
        // X: 0, 1, 2 with O on 3, 4
        let state = play(round(3, 3, 2, GameMode::Conquest), &[0, 3, 1, 4]);
        let outcome = state.apply_move(2, 0).unwrap();
        assert_eq!(outcome.points_scored, 1);
        assert_eq!(outcome.line_events.len(), 1);
        assert_eq!(outcome.line_events[0].line_id.as_str(), "0,1,2");
        assert_eq!(outcome.line_events[0].scoring_player, 0);
        assert!(!outcome.round_ended);
        assert_eq!(outcome.state.scores(), &[1, 0]);
        assert_eq!(outcome.state.current_player(), 1);
    }

    #[test]
    fn test_move_can_score_two_lines() {
        // X holds 0, 1, 4, 6; cell 2 finishes 0,1,2 and 2,4,6 together
        let state = play(round(3, 3, 2, GameMode::Conquest), &[0, 3, 1, 5, 4, 7, 6, 8]);
        let outcome = state.apply_move(2, 0).unwrap();
        assert_eq!(outcome.points_scored, 2);
        assert_eq!(outcome.state.scores(), &[2, 0]);
    }

    #[test]
    fn test_block_is_independent_of_score() {
        // O holds 3,4; X takes 5 and blocks
        let state = play(round(3, 3, 2, GameMode::Conquest), &[0, 3, 8, 4]);
        let outcome = state.apply_move(5, 0).unwrap();
        assert!(outcome.was_block());
        assert_eq!(outcome.blocked, vec![1]);
        assert_eq!(outcome.points_scored, 0);
        assert!(outcome.record.was_block());
    }

    #[test]
    fn test_classic_first_score_ends_round() {
        let state = play(round(4, 3, 2, GameMode::Classic), &[0, 4, 1, 5]);
        let outcome = state.apply_move(2, 0).unwrap();
        assert!(outcome.round_ended);
        assert_eq!(
            outcome.state.phase(),
            RoundPhase::Ended(EndReason::FirstScore)
        );
        assert_eq!(outcome.state.determine_winners(), Verdict::Winner(0));
        assert_eq!(outcome.state.apply_move(15, 1), Err(MoveError::RoundOver));
    }

    #[test]
    fn test_undo_restores_previous_state() {
        let before = play(round(3, 3, 2, GameMode::Conquest), &[0, 3, 1, 4]);
        let after = before.apply_move(2, 0).unwrap().state;
        let undone = after.undo_last_move().unwrap();
        assert_eq!(undone, before);
    }

    #[test]
    fn test_undo_empty_history() {
        let state = round(3, 3, 2, GameMode::Stealth);
        assert_eq!(state.undo_last_move(), Err(UndoError::NoHistory));
    }

    #[test]
    fn test_undo_reopens_ended_round() {
        let state = play(round(3, 3, 2, GameMode::Classic), &[0, 3, 1, 4]);
        let ended = state.apply_move(2, 0).unwrap().state;
        assert!(ended.is_ended());
        let reopened = ended.undo_last_move().unwrap();
        assert!(!reopened.is_ended());
        assert_eq!(reopened.current_player(), 0);
    }

    #[test]
    fn test_replay_matches_manual_play() {
        let config = RoundConfig::new(3, 3, 2, GameMode::Conquest).unwrap();
        let replayed = RoundState::replay(config, &[0, 3, 1, 4, 2]).unwrap();
        let manual = play(RoundState::start(config).unwrap(), &[0, 3, 1, 4, 2]);
        assert_eq!(replayed, manual);
    }

    #[test]
    fn test_legal_moves_empty_after_end() {
        let state = play(round(3, 3, 2, GameMode::Classic), &[0, 3, 1, 4, 2]);
        assert!(state.legal_moves().is_empty());
    }

    #[test]
    fn test_saved_round_resumes() {
        let state = play(round(4, 3, 3, GameMode::Survivor), &[0, 4, 12, 1, 5, 15, 2]);
        let json = serde_json::to_string(&state).unwrap();
        let restored: RoundState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
        assert_eq!(restored.eliminated_players(), vec![0]);
        let undone = restored.undo_last_move().unwrap();
        assert!(undone.eliminated_players().is_empty());
    }

    /// Saves a round as JSON, edits it, and loads it back.
    fn tampered(
        edit: impl FnOnce(&mut serde_json::Value),
    ) -> Result<RoundState, serde_json::Error> {
        let state = play(round(3, 3, 2, GameMode::Conquest), &[0, 3, 1, 4, 2]);
        let mut json = serde_json::to_value(&state).unwrap();
        edit(&mut json);
        serde_json::from_value(json)
    }

    #[test]
    fn test_saved_round_with_missing_scores_rejected() {
        let err = tampered(|json| {
            json["scores"] = serde_json::json!([]);
            json["moves_made"] = serde_json::json!(0);
        })
        .unwrap_err();
        assert!(err.to_string().contains("one score per player"));
    }

    #[test]
    fn test_saved_round_with_drifted_counter_rejected() {
        let err = tampered(|json| json["moves_made"] = serde_json::json!(0)).unwrap_err();
        assert!(err.to_string().contains("History length"));
    }

    #[test]
    fn test_saved_round_with_wrong_scores_rejected() {
        assert!(tampered(|json| json["scores"] = serde_json::json!([0, 3])).is_err());
    }

    #[test]
    fn test_saved_round_with_foreign_player_rejected() {
        assert!(tampered(|json| json["current_player"] = serde_json::json!(7)).is_err());
        assert!(tampered(|json| json["history"][0]["player"] = serde_json::json!(9)).is_err());
    }

    #[test]
    fn test_saved_round_with_bad_config_rejected() {
        let err =
            tampered(|json| json["config"]["match_length"] = serde_json::json!(4)).unwrap_err();
        assert!(err.to_string().contains("does not fit"));
    }

    #[test]
    fn test_untouched_save_still_loads() {
        assert!(tampered(|_| {}).is_ok());
    }
}
