//! Round phases, end reasons and winner verdicts.

use super::types::PlayerId;
use serde::{Deserialize, Serialize};

/// Why a round stopped accepting moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EndReason {
    /// Every cell is claimed.
    BoardFull,
    /// Classic: somebody scored.
    FirstScore,
    /// Survivor: at most one player is left standing.
    LastSurvivor,
    /// Turn advance found no eligible player.
    NoEligiblePlayer,
}

/// Where a round is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Moves are accepted.
    InProgress,
    /// No more moves; winners can be read.
    Ended(EndReason),
}

impl RoundPhase {
    /// Returns true once the round has ended.
    pub fn is_ended(&self) -> bool {
        matches!(self, RoundPhase::Ended(_))
    }

    /// The end reason, if the round has ended.
    pub fn end_reason(&self) -> Option<EndReason> {
        match self {
            RoundPhase::Ended(reason) => Some(*reason),
            RoundPhase::InProgress => None,
        }
    }
}

/// Who won a round.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Nobody earned the win (e.g. nobody scored in Conquest).
    NoWinner,
    /// Exactly one winner.
    Winner(PlayerId),
    /// Several, but not all, players share the win.
    Tie(Vec<PlayerId>),
    /// Every player shares the win.
    FullTie(Vec<PlayerId>),
}

impl Verdict {
    /// Classifies a list of winning players.
    pub fn from_winners(mut winners: Vec<PlayerId>, num_players: usize) -> Self {
        winners.sort_unstable();
        winners.dedup();
        match winners.len() {
            0 => Verdict::NoWinner,
            1 => Verdict::Winner(winners[0]),
            n if n == num_players => Verdict::FullTie(winners),
            _ => Verdict::Tie(winners),
        }
    }

    /// Winning players in ascending order. Empty for a draw.
    pub fn players(&self) -> Vec<PlayerId> {
        match self {
            Verdict::NoWinner => Vec::new(),
            Verdict::Winner(player) => vec![*player],
            Verdict::Tie(players) | Verdict::FullTie(players) => players.clone(),
        }
    }

    /// Returns true if the player is among the winners.
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.players().contains(&player)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = |players: &[PlayerId]| {
            players
                .iter()
                .map(|p| format!("Player {}", p + 1))
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self {
            Verdict::NoWinner => write!(f, "No winner"),
            Verdict::Winner(player) => write!(f, "Player {} wins", player + 1),
            Verdict::Tie(players) => write!(f, "Tie between {}", names(players)),
            Verdict::FullTie(players) => write!(f, "Everyone ties: {}", names(players)),
        }
    }
}
