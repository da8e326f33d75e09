//! Round configuration and its validation.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{EnumIter, EnumString};
use tracing::{instrument, warn};

/// Shortest line that can score.
pub const MIN_MATCH_LENGTH: usize = 2;
/// Longest line the game supports.
pub const MAX_MATCH_LENGTH: usize = 5;
/// Fewest players a round can start with.
pub const MIN_PLAYERS: usize = 2;

/// Scoring and end-of-round rules in force for a round.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GameMode {
    /// Highest score wins; the round runs until the board is full.
    #[default]
    Conquest,
    /// Lowest score wins; the round runs until the board is full.
    Stealth,
    /// The first line scored ends the round.
    Classic,
    /// Scoring eliminates you; the last player standing wins.
    Survivor,
}

impl GameMode {
    /// Parses a mode name, mapping failures to [`ConfigError::UnknownMode`].
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        GameMode::from_str(name.trim()).map_err(|_| ConfigError::UnknownMode(name.to_string()))
    }
}

/// Board size, line length, player count and mode for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SavedConfig")]
pub struct RoundConfig {
    grid_size: usize,
    match_length: usize,
    num_players: usize,
    mode: GameMode,
}

/// Configuration fields as read from storage, before validation.
#[derive(Deserialize)]
struct SavedConfig {
    grid_size: usize,
    match_length: usize,
    num_players: usize,
    mode: GameMode,
}

impl TryFrom<SavedConfig> for RoundConfig {
    type Error = ConfigError;

    fn try_from(saved: SavedConfig) -> Result<Self, Self::Error> {
        RoundConfig::new(
            saved.grid_size,
            saved.match_length,
            saved.num_players,
            saved.mode,
        )
    }
}

impl RoundConfig {
    /// Creates a validated configuration.
    #[instrument]
    pub fn new(
        grid_size: usize,
        match_length: usize,
        num_players: usize,
        mode: GameMode,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            grid_size,
            match_length,
            num_players,
            mode,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration bounds.
    ///
    /// `MIN_MATCH_LENGTH <= match_length <= min(grid_size, MAX_MATCH_LENGTH)`
    /// and at least `MIN_PLAYERS` players.
    #[instrument]
    pub fn validate(&self) -> Result<(), ConfigError> {
        let result = if self.match_length < MIN_MATCH_LENGTH {
            Err(ConfigError::MatchLengthTooShort(self.match_length))
        } else if self.match_length > self.grid_size {
            Err(ConfigError::MatchLengthExceedsGrid {
                match_length: self.match_length,
                grid_size: self.grid_size,
            })
        } else if self.match_length > MAX_MATCH_LENGTH {
            Err(ConfigError::MatchLengthTooLong(self.match_length))
        } else if self.num_players < MIN_PLAYERS {
            Err(ConfigError::TooFewPlayers(self.num_players))
        } else {
            Ok(())
        };
        if let Err(e) = &result {
            warn!(error = %e, "Rejected round configuration");
        }
        result
    }

    /// Cells per side.
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Marks in a row needed to score a line.
    pub fn match_length(&self) -> usize {
        self.match_length
    }

    /// Number of players taking turns.
    pub fn num_players(&self) -> usize {
        self.num_players
    }

    /// Active game mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Total number of cells on the board.
    pub fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }
}

/// A round configuration that cannot be played.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ConfigError {
    /// Lines must be at least two cells long.
    #[display("Match length {} is below the minimum of {}", _0, MIN_MATCH_LENGTH)]
    MatchLengthTooShort(usize),

    /// A line cannot be longer than the board is wide.
    #[display(
        "Match length {} does not fit on a {}x{} board",
        match_length,
        grid_size,
        grid_size
    )]
    MatchLengthExceedsGrid {
        /// Requested line length.
        match_length: usize,
        /// Cells per side.
        grid_size: usize,
    },

    /// Lines longer than the supported maximum.
    #[display("Match length {} exceeds the maximum of {}", _0, MAX_MATCH_LENGTH)]
    MatchLengthTooLong(usize),

    /// Not enough players to take turns.
    #[display("At least {} players are required, got {}", MIN_PLAYERS, _0)]
    TooFewPlayers(usize),

    /// Mode name that matches none of the four modes.
    #[display("Unknown game mode {:?}", _0)]
    UnknownMode(String),
}

impl std::error::Error for ConfigError {}
