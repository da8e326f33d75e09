//! Game-mode policies.
//!
//! Each mode answers two questions: does a score end the round, and who
//! wins. The mode is picked once per round and dispatched through
//! [`ModePolicy`].

use super::config::GameMode;
use super::phases::EndReason;
use super::types::PlayerId;
use tracing::instrument;

/// End-of-round and winner rules for one game mode.
pub trait ModePolicy: std::fmt::Debug + Sync {
    /// Called after `player` scored `points` (> 0) and `scores` were updated.
    ///
    /// Returns the reason to end the round now, if any.
    fn on_score(&self, scores: &[u32], player: PlayerId, points: usize) -> Option<EndReason>;

    /// Players out of the round given the current scores.
    fn eliminated(&self, _scores: &[u32]) -> Vec<PlayerId> {
        Vec::new()
    }

    /// Winning players given final scores. Empty means nobody won.
    fn winners(&self, scores: &[u32]) -> Vec<PlayerId>;
}

fn players_with(scores: &[u32], target: u32) -> Vec<PlayerId> {
    scores
        .iter()
        .enumerate()
        .filter(|(_, score)| **score == target)
        .map(|(player, _)| player)
        .collect()
}

/// Highest score wins. A round where nobody scored has no winner.
fn most_points(scores: &[u32]) -> Vec<PlayerId> {
    match scores.iter().copied().max() {
        Some(best) if best > 0 => players_with(scores, best),
        _ => Vec::new(),
    }
}

/// Conquest: play to a full board, most lines wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConquestPolicy;

impl ModePolicy for ConquestPolicy {
    fn on_score(&self, _scores: &[u32], _player: PlayerId, _points: usize) -> Option<EndReason> {
        None
    }

    fn winners(&self, scores: &[u32]) -> Vec<PlayerId> {
        most_points(scores)
    }
}

/// Stealth: play to a full board, fewest lines wins. Ties at zero all win.
#[derive(Debug, Clone, Copy, Default)]
pub struct StealthPolicy;

impl ModePolicy for StealthPolicy {
    fn on_score(&self, _scores: &[u32], _player: PlayerId, _points: usize) -> Option<EndReason> {
        None
    }

    fn winners(&self, scores: &[u32]) -> Vec<PlayerId> {
        match scores.iter().copied().min() {
            Some(least) => players_with(scores, least),
            None => Vec::new(),
        }
    }
}

/// Classic: the first line ends the round.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicPolicy;

impl ModePolicy for ClassicPolicy {
    fn on_score(&self, _scores: &[u32], _player: PlayerId, points: usize) -> Option<EndReason> {
        (points > 0).then_some(EndReason::FirstScore)
    }

    fn winners(&self, scores: &[u32]) -> Vec<PlayerId> {
        most_points(scores)
    }
}

/// Survivor: scoring eliminates you.
///
/// Elimination is derived from scores (any point means out), so undoing a
/// scoring move brings the player back.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurvivorPolicy;

impl ModePolicy for SurvivorPolicy {
    fn on_score(&self, scores: &[u32], _player: PlayerId, points: usize) -> Option<EndReason> {
        let standing = scores.iter().filter(|score| **score == 0).count();
        (points > 0 && standing <= 1).then_some(EndReason::LastSurvivor)
    }

    fn eliminated(&self, scores: &[u32]) -> Vec<PlayerId> {
        scores
            .iter()
            .enumerate()
            .filter(|(_, score)| **score > 0)
            .map(|(player, _)| player)
            .collect()
    }

    fn winners(&self, scores: &[u32]) -> Vec<PlayerId> {
        players_with(scores, 0)
    }
}

impl GameMode {
    /// The policy implementing this mode.
    #[instrument]
    pub fn policy(self) -> &'static dyn ModePolicy {
        match self {
            GameMode::Conquest => &ConquestPolicy,
            GameMode::Stealth => &StealthPolicy,
            GameMode::Classic => &ClassicPolicy,
            GameMode::Survivor => &SurvivorPolicy,
        }
    }
}
