//! Game settings: players, board, mode and word units.

use crate::words::{UnitKey, WordBank, WordError};
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use phonics_tictactoe::{GameMode, PLAYER_SYMBOLS, RoundConfig};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Most players a game can seat, one per mark symbol.
pub const MAX_PLAYERS: usize = PLAYER_SYMBOLS.len();

/// Settings chosen before a match, as read from TOML.
///
/// Every field has a default, so an empty file is a valid two-player
/// Conquest game on a 3x3 board.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct GameSettings {
    /// Number of players (2 to 5).
    num_players: usize,

    /// Cells per side. Defaults to one more than the player count.
    #[getter(skip)]
    #[setters(strip_option)]
    grid_size: Option<usize>,

    /// Marks in a row needed to score.
    match_length: usize,

    /// Mode name, matched case-insensitively.
    #[setters(into)]
    mode: String,

    /// Display names. Missing or blank entries become `Player N`.
    #[getter(skip)]
    player_names: Vec<String>,

    /// Selected word units as `level|unit`.
    units: Vec<String>,

    /// Whether completed lines are marked on the board.
    show_lines: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            num_players: 2,
            grid_size: None,
            match_length: 3,
            mode: GameMode::default().to_string(),
            player_names: Vec::new(),
            units: vec!["level2|unit1".to_string()],
            show_lines: true,
        }
    }
}

impl GameSettings {
    /// Loads settings from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        debug!("Loading settings from file");
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            SettingsError::new(format!("Failed to read settings file: {}", e))
        })?;
        let settings = Self::from_toml_str(&content)?;
        info!(
            players = settings.num_players,
            mode = %settings.mode,
            "Settings loaded successfully"
        );
        Ok(settings)
    }

    /// Parses settings from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        toml::from_str(content)
            .map_err(|e| SettingsError::new(format!("Failed to parse settings: {}", e)))
    }

    /// Default settings rendered as TOML.
    #[instrument]
    pub fn default_toml() -> Result<String, SettingsError> {
        Self::default().to_toml()
    }

    /// Renders these settings as TOML.
    #[instrument(skip(self))]
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self)
            .map_err(|e| SettingsError::new(format!("Failed to render settings: {}", e)))
    }

    /// Replaces the unit selection with one unit drawn at random from `bank`.
    ///
    /// An empty bank leaves the selection unchanged.
    #[instrument(skip(self, bank, rng))]
    pub fn with_random_unit<R: Rng + ?Sized>(self, bank: &WordBank, rng: &mut R) -> Self {
        match bank.keys().choose(rng) {
            Some(key) => {
                debug!(unit = %key, "Picked a random unit");
                self.with_units(vec![key.to_string()])
            }
            None => self,
        }
    }

    /// Board width, falling back to `num_players + 1`.
    pub fn grid_size(&self) -> usize {
        self.grid_size.unwrap_or(self.num_players + 1)
    }

    /// Display name for every seat.
    pub fn player_names(&self) -> Vec<String> {
        (0..self.num_players)
            .map(|i| match self.player_names.get(i).map(|n| n.trim()) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => format!("Player {}", i + 1),
            })
            .collect()
    }

    /// Parsed game mode.
    pub fn game_mode(&self) -> Result<GameMode, SettingsError> {
        GameMode::parse(&self.mode).map_err(|e| SettingsError::new(e.to_string()))
    }

    /// Parsed unit selection.
    pub fn unit_keys(&self) -> Result<Vec<UnitKey>, SettingsError> {
        self.units
            .iter()
            .map(|u| u.parse::<UnitKey>())
            .collect::<Result<Vec<_>, WordError>>()
            .map_err(|e| SettingsError::new(e.to_string()))
    }

    /// Validated configuration for the round engine.
    #[instrument(skip(self))]
    pub fn round_config(&self) -> Result<RoundConfig, SettingsError> {
        if self.num_players > MAX_PLAYERS {
            return Err(SettingsError::new(format!(
                "At most {} players are supported, got {}",
                MAX_PLAYERS, self.num_players
            )));
        }
        RoundConfig::new(
            self.grid_size(),
            self.match_length,
            self.num_players,
            self.game_mode()?,
        )
        .map_err(|e| SettingsError::new(e.to_string()))
    }
}

/// Settings error.
#[derive(Debug, Clone, Display, Error)]
#[display("Settings error: {} at {}:{}", message, file, line)]
pub struct SettingsError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SettingsError {
    /// Creates a new settings error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
