//! Phonics Games - word-board tic-tac-toe for early readers
//!
//! Players take turns claiming word cells on an N×N board, reading each
//! word aloud as they claim it. Lines of marks score according to the
//! chosen mode. The rules live in [`phonics_tictactoe`]; this crate adds
//! what a table of players needs around them.
//!
//! # Architecture
//!
//! - **Settings**: TOML game settings ([`GameSettings`])
//! - **Words**: word bank and dealing words onto cells ([`WordBank`], [`deal_words`])
//! - **Phonics**: target-sound highlighting ([`highlight_target_sounds`])
//! - **Session**: match lifecycle, player order, colours and tallies ([`GameSession`])
//! - **Render**: plain-text board and scoreboard
//!
//! # Example
//!
//! ```
//! use phonics_games::{GameSession, GameSettings, WordBank};
//! use rand::SeedableRng;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = GameSettings::default().with_mode("classic");
//! let mut session = GameSession::new(settings, WordBank::builtin()?)?;
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! session.start(&mut rng)?;
//! for cell in [0, 3, 1, 4, 2] {
//!     session.play(cell)?;
//! }
//! assert_eq!(session.last_verdict(), &Some(phonics_tictactoe::Verdict::Winner(0)));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod phonics;
mod render;
mod session;
mod settings;
mod words;

pub use phonics::{Segment, bracket_targets, highlight_target_sounds};
pub use render::{render_board, render_scoreboard};
pub use session::{COLOR_PALETTE, GameSession, Seat, SessionError, SessionPhase, Tally};
pub use settings::{GameSettings, MAX_PLAYERS, SettingsError};
pub use words::{PLACEHOLDER_WORD, Tile, UnitKey, WordBank, WordError, WordUnit, deal_words};
