//! Phonics tic-tac-toe core: line detection, scoring and turn state machine.
//!
//! Players take turns claiming cells on a square board. Every run of
//! `match_length` cells a player owns along a row, column or diagonal
//! scores one line, once. Four modes decide when a round ends and who wins:
//!
//! - **Conquest**: play to a full board, most lines wins.
//! - **Stealth**: play to a full board, fewest lines wins.
//! - **Classic**: the first line ends the round.
//! - **Survivor**: scoring knocks you out; the last player standing wins.
//!
//! # Example
//!
//! ```
//! use phonics_tictactoe::{GameMode, RoundConfig, RoundState, Verdict};
//!
//! let config = RoundConfig::new(3, 3, 2, GameMode::Classic)?;
//! let mut round = RoundState::start(config)?;
//! for cell in [0, 3, 1, 4, 2] {
//!     let player = round.current_player();
//!     round = round.apply_move(cell, player)?.state;
//! }
//! assert!(round.is_ended());
//! assert_eq!(round.determine_winners(), Verdict::Winner(0));
//! # Ok::<(), phonics_tictactoe::RoundError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod config;
pub mod contracts;
pub mod geometry;
pub mod invariants;
mod mode;
mod phases;
mod round;
pub mod rules;
mod turn;
mod types;

pub use action::{Claim, LineEvent, MoveError, MoveRecord, RoundError, TurnError, UndoError};
pub use config::{
    ConfigError, GameMode, MAX_MATCH_LENGTH, MIN_MATCH_LENGTH, MIN_PLAYERS, RoundConfig,
};
pub use mode::{ClassicPolicy, ConquestPolicy, ModePolicy, StealthPolicy, SurvivorPolicy};
pub use phases::{EndReason, RoundPhase, Verdict};
pub use round::{MoveOutcome, RoundState};
pub use turn::next_player;
pub use types::{Board, Direction, Line, LineId, PLAYER_SYMBOLS, PlayerId};
