//! Phonics word bank and dealing words onto the board.

use derive_more::Display;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

/// Word bank shipped with the game.
const BUILTIN_BANK: &str = include_str!("../assets/word_bank.toml");

/// Word shown on cells left over when the selected units run dry.
pub const PLACEHOLDER_WORD: &str = "?";

/// One teaching unit: the sounds it drills and the words that carry them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordUnit {
    /// Comma-separated target sounds, e.g. `"bl, cl, fl"` or `"a_e"`.
    pub target_sound: String,
    /// Words drawn for the board.
    pub words: Vec<String>,
}

/// Reference to a unit as `level|unit`, e.g. `level3|unit1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("{}|{}", level, unit)]
pub struct UnitKey {
    /// Level name.
    pub level: String,
    /// Unit name within the level.
    pub unit: String,
}

impl FromStr for UnitKey {
    type Err = WordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('|') {
            Some((level, unit)) if !level.is_empty() && !unit.is_empty() => Ok(Self {
                level: level.to_string(),
                unit: unit.to_string(),
            }),
            _ => Err(WordError::MalformedKey(s.to_string())),
        }
    }
}

/// A word placed on a board cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Word to read.
    pub word: String,
    /// Target sounds of the unit the word came from. Empty for placeholders.
    pub target: String,
}

impl Tile {
    /// Filler tile for cells without a word.
    pub fn placeholder() -> Self {
        Self {
            word: PLACEHOLDER_WORD.to_string(),
            target: String::new(),
        }
    }
}

/// Levels of units, keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordBank {
    levels: BTreeMap<String, BTreeMap<String, WordUnit>>,
}

impl WordBank {
    /// The bank bundled with the game.
    #[instrument]
    pub fn builtin() -> Result<Self, WordError> {
        Self::from_toml_str(BUILTIN_BANK)
    }

    /// Parses a bank from TOML with one `[level.unit]` table per unit.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, WordError> {
        let bank: Self =
            toml::from_str(content).map_err(|e| WordError::Parse(e.to_string()))?;
        debug!(units = bank.len(), "Parsed word bank");
        Ok(bank)
    }

    /// Loads a bank from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WordError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| WordError::Parse(format!("Failed to read word bank: {}", e)))?;
        let bank = Self::from_toml_str(&content)?;
        info!(units = bank.len(), "Word bank loaded");
        Ok(bank)
    }

    /// Looks a unit up.
    pub fn unit(&self, key: &UnitKey) -> Option<&WordUnit> {
        self.levels.get(&key.level)?.get(&key.unit)
    }

    /// Every unit key, level by level.
    pub fn keys(&self) -> Vec<UnitKey> {
        self.levels
            .iter()
            .flat_map(|(level, units)| {
                units.keys().map(move |unit| UnitKey {
                    level: level.clone(),
                    unit: unit.clone(),
                })
            })
            .collect()
    }

    /// Number of units across all levels.
    pub fn len(&self) -> usize {
        self.levels.values().map(BTreeMap::len).sum()
    }

    /// Returns true if the bank has no units.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Menu label such as `Level 3 - Unit1: a_e`.
    pub fn unit_label(&self, key: &UnitKey) -> Option<String> {
        let unit = self.unit(key)?;
        let level_number: String = key
            .level
            .chars()
            .rev()
            .take_while(char::is_ascii_digit)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        let mut unit_name = key.unit.chars();
        let unit_name = match unit_name.next() {
            Some(first) => first.to_uppercase().chain(unit_name).collect::<String>(),
            None => String::new(),
        };
        Some(format!(
            "Level {} - {}: {}",
            level_number, unit_name, unit.target_sound
        ))
    }
}

/// Deals `total` tiles from the selected units.
///
/// Duplicate selections count once. Words are split evenly across units,
/// the first `total % units` units giving one extra, and each unit cycles
/// through its word list as needed. Units without words are skipped. The
/// tiles are shuffled, then padded with placeholders up to `total`.
#[instrument(skip(bank, rng), fields(selected = selected.len()))]
pub fn deal_words<R: Rng + ?Sized>(
    bank: &WordBank,
    selected: &[UnitKey],
    total: usize,
    rng: &mut R,
) -> Result<Vec<Tile>, WordError> {
    let mut unique: Vec<&UnitKey> = Vec::new();
    for key in selected {
        if !unique.contains(&key) {
            unique.push(key);
        }
    }
    if unique.is_empty() {
        return Err(WordError::NoUnits);
    }

    let units = unique
        .iter()
        .map(|key| {
            bank.unit(key)
                .ok_or_else(|| WordError::UnknownUnit((*key).clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let per_unit = total / units.len();
    let mut remainder = total % units.len();
    let mut tiles = Vec::with_capacity(total);
    for unit in units {
        let mut take = per_unit;
        if remainder > 0 {
            take += 1;
            remainder -= 1;
        }
        if unit.words.is_empty() {
            warn!(target_sound = %unit.target_sound, "Skipping unit without words");
            continue;
        }
        tiles.extend(unit.words.iter().cycle().take(take).map(|word| Tile {
            word: word.clone(),
            target: unit.target_sound.clone(),
        }));
    }
    tiles.shuffle(rng);
    tiles.resize(total, Tile::placeholder());
    debug!(dealt = tiles.len(), "Dealt words");
    Ok(tiles)
}

/// Problems with the word bank or unit selection.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum WordError {
    /// No units were selected.
    #[display("Select at least one word unit to start the game")]
    NoUnits,

    /// A selected unit is not in the bank.
    #[display("Unknown word unit {}", _0)]
    UnknownUnit(UnitKey),

    /// A unit key without the `level|unit` shape.
    #[display("Malformed unit key {:?} (expected level|unit)", _0)]
    MalformedKey(String),

    /// The bank could not be read or parsed.
    #[display("Word bank error: {}", _0)]
    Parse(String),
}

impl std::error::Error for WordError {}
