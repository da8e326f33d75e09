//! Match session: seats, phases, colours, dealt words and tallies.
//!
//! A session wraps one [`RoundState`] at a time and keeps what outlives a
//! round: player order, colours and running tallies.

use crate::settings::{GameSettings, SettingsError};
use crate::words::{Tile, UnitKey, WordBank, WordError, deal_words};
use derive_getters::Getters;
use derive_more::{Display, From};
use phonics_tictactoe::{
    MoveOutcome, MoveRecord, PLAYER_SYMBOLS, PlayerId, RoundConfig, RoundError, RoundState,
    UndoError, Verdict,
};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Colours handed out to players, shuffled once per match.
pub const COLOR_PALETTE: [&str; 7] = [
    "orange", "pink", "green", "blue", "violet", "cyan", "red",
];

/// Attempts `randomize_order` makes to find a different order.
const REORDER_ATTEMPTS: usize = 10;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SessionPhase {
    /// Choosing order before the first round.
    Setup,
    /// Between rounds; order may change.
    Reorder,
    /// A round is being played.
    InProgress,
    /// The round has ended and its result is tallied.
    Ended,
}

/// Running totals for one player across the match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Tally {
    /// Lines completed.
    lines: u32,
    /// Moves that blocked at least one opponent.
    blocks: u32,
    /// Rounds won, ties included.
    rounds_won: u32,
    /// Rounds finished.
    rounds_played: u32,
}

/// A player at the table.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Seat {
    /// Display name.
    name: String,
    /// Colour from the palette, assigned when the match starts.
    color: Option<String>,
    /// Match totals.
    tally: Tally,
}

impl Seat {
    fn new(name: String) -> Self {
        Self {
            name,
            color: None,
            tally: Tally::default(),
        }
    }
}

/// One match of phonics tic-tac-toe.
#[derive(Debug, Clone, Getters)]
pub struct GameSession {
    /// Settings the match was created from.
    settings: GameSettings,
    #[getter(skip)]
    config: RoundConfig,
    #[getter(skip)]
    units: Vec<UnitKey>,
    #[getter(skip)]
    bank: WordBank,
    /// Players in turn order; seat index is the round's player index.
    seats: Vec<Seat>,
    /// Lifecycle phase.
    phase: SessionPhase,
    #[getter(skip)]
    round: Option<RoundState>,
    /// Words dealt for the current round, one per cell.
    tiles: Vec<Tile>,
    /// Result of the round that just ended.
    last_verdict: Option<Verdict>,
}

impl GameSession {
    /// Validates settings and seats the players in Setup.
    #[instrument(skip(settings, bank))]
    pub fn new(settings: GameSettings, bank: WordBank) -> Result<Self, SessionError> {
        let config = settings.round_config()?;
        let units = settings.unit_keys()?;
        if units.is_empty() {
            return Err(WordError::NoUnits.into());
        }
        if let Some(missing) = units.iter().find(|k| bank.unit(k).is_none()) {
            return Err(WordError::UnknownUnit(missing.clone()).into());
        }
        let seats = settings.player_names().into_iter().map(Seat::new).collect();
        info!(
            players = config.num_players(),
            grid = config.grid_size(),
            mode = %config.mode(),
            "Session created"
        );
        Ok(Self {
            settings,
            config,
            units,
            bank,
            seats,
            phase: SessionPhase::Setup,
            round: None,
            tiles: Vec::new(),
            last_verdict: None,
        })
    }

    /// The round being played or just finished.
    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    /// Mark symbol for a seat.
    pub fn symbol(&self, seat: PlayerId) -> &'static str {
        PLAYER_SYMBOLS.get(seat).copied().unwrap_or("?")
    }

    /// Seat whose turn it is.
    pub fn current_seat(&self) -> Option<&Seat> {
        let round = self.round.as_ref()?;
        if round.is_ended() {
            return None;
        }
        self.seats.get(round.current_player())
    }

    /// Moves the player at `from` to position `to`.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn move_player(&mut self, from: usize, to: usize) -> Result<(), SessionError> {
        self.expect_phase("move player", &[SessionPhase::Setup, SessionPhase::Reorder])?;
        let len = self.seats.len();
        for index in [from, to] {
            if index >= len {
                return Err(SessionError::NoSuchSeat(index));
            }
        }
        let seat = self.seats.remove(from);
        self.seats.insert(to, seat);
        debug!(from, to, "Moved player");
        Ok(())
    }

    /// Shuffles the seating, retrying until the order changes.
    #[instrument(skip(self, rng), fields(phase = %self.phase))]
    pub fn randomize_order<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        self.expect_phase(
            "randomize order",
            &[SessionPhase::Setup, SessionPhase::Reorder],
        )?;
        let identity: Vec<usize> = (0..self.seats.len()).collect();
        let mut order = identity.clone();
        for _ in 0..REORDER_ATTEMPTS {
            order.shuffle(rng);
            if order != identity {
                break;
            }
        }
        let mut seats: Vec<Option<Seat>> = self.seats.drain(..).map(Some).collect();
        self.seats = order.iter().filter_map(|&i| seats[i].take()).collect();
        debug!(?order, "Randomized player order");
        Ok(())
    }

    /// Starts a round. From Setup this begins a new match: tallies are
    /// cleared and colours are drawn from a freshly shuffled palette.
    #[instrument(skip(self, rng), fields(phase = %self.phase))]
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        self.expect_phase("start", &[SessionPhase::Setup, SessionPhase::Reorder])?;
        if self.phase == SessionPhase::Setup {
            let mut palette = COLOR_PALETTE.to_vec();
            palette.shuffle(rng);
            for (seat, color) in self.seats.iter_mut().zip(palette.iter().cycle()) {
                seat.color = Some((*color).to_string());
                seat.tally = Tally::default();
            }
            info!("New match");
        }
        self.begin_round(rng)
    }

    /// Restarts the current round with the same settings and colours.
    #[instrument(skip(self, rng), fields(phase = %self.phase))]
    pub fn reset_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        self.expect_phase(
            "reset round",
            &[SessionPhase::InProgress, SessionPhase::Ended],
        )?;
        self.begin_round(rng)
    }

    /// Claims `cell` for the player whose turn it is.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn play(&mut self, cell: usize) -> Result<MoveOutcome, SessionError> {
        self.expect_phase("play", &[SessionPhase::InProgress])?;
        let round = self.round.as_ref().ok_or(SessionError::NoRound)?;
        let outcome = round
            .apply_move(cell, round.current_player())
            .map_err(RoundError::from)?;

        self.tally_move(&outcome.record, 1);
        self.round = Some(outcome.state.clone());
        if outcome.round_ended {
            let verdict = outcome.state.determine_winners();
            self.tally_verdict(&verdict, 1);
            info!(%verdict, "Round finished");
            self.last_verdict = Some(verdict);
            self.phase = SessionPhase::Ended;
        }
        Ok(outcome)
    }

    /// Takes back the last move, reopening the round if it had ended.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn undo(&mut self) -> Result<MoveRecord, SessionError> {
        self.expect_phase("undo", &[SessionPhase::InProgress, SessionPhase::Ended])?;
        let round = self.round.as_ref().ok_or(SessionError::NoRound)?;
        let record = round
            .history()
            .last()
            .cloned()
            .ok_or(RoundError::from(UndoError::NoHistory))?;
        let previous = round.undo_last_move().map_err(RoundError::from)?;

        if let Some(verdict) = self.last_verdict.take() {
            self.tally_verdict(&verdict, -1);
        }
        self.tally_move(&record, -1);
        self.round = Some(previous);
        self.phase = SessionPhase::InProgress;
        debug!(%record, "Undid move");
        Ok(record)
    }

    /// Leaves a finished round for the reorder screen.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn next_round(&mut self) -> Result<(), SessionError> {
        self.expect_phase("next round", &[SessionPhase::Ended])?;
        self.phase = SessionPhase::Reorder;
        Ok(())
    }

    /// Abandons the match and returns to Setup.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn back_to_settings(&mut self) {
        self.round = None;
        self.tiles.clear();
        self.last_verdict = None;
        self.phase = SessionPhase::Setup;
        info!("Back to settings");
    }

    fn begin_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        self.tiles = deal_words(&self.bank, &self.units, self.config.cell_count(), rng)?;
        self.round = Some(RoundState::start(self.config).map_err(RoundError::from)?);
        self.last_verdict = None;
        self.phase = SessionPhase::InProgress;
        let order: Vec<&str> = self.seats.iter().map(|s| s.name.as_str()).collect();
        info!(?order, "Round started");
        Ok(())
    }

    fn tally_move(&mut self, record: &MoveRecord, sign: i32) {
        let Some(seat) = self.seats.get_mut(record.player) else {
            warn!(player = record.player, "Move by unseated player");
            return;
        };
        seat.tally.lines = apply(seat.tally.lines, record.points() as u32, sign);
        if record.was_block() {
            seat.tally.blocks = apply(seat.tally.blocks, 1, sign);
        }
    }

    fn tally_verdict(&mut self, verdict: &Verdict, sign: i32) {
        for (index, seat) in self.seats.iter_mut().enumerate() {
            seat.tally.rounds_played = apply(seat.tally.rounds_played, 1, sign);
            if verdict.is_winner(index) {
                seat.tally.rounds_won = apply(seat.tally.rounds_won, 1, sign);
            }
        }
    }

    fn expect_phase(
        &self,
        action: &'static str,
        allowed: &[SessionPhase],
    ) -> Result<(), SessionError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            warn!(action, phase = %self.phase, "Action not allowed in this phase");
            Err(SessionError::WrongPhase {
                action,
                phase: self.phase,
            })
        }
    }
}

fn apply(value: u32, amount: u32, sign: i32) -> u32 {
    if sign < 0 {
        value.saturating_sub(amount)
    } else {
        value + amount
    }
}

/// Something the session could not do.
#[derive(Debug, Clone, Display, From)]
pub enum SessionError {
    /// The round engine rejected the request.
    #[display("{}", _0)]
    Round(RoundError),

    /// Word dealing failed.
    #[display("{}", _0)]
    Words(WordError),

    /// Settings could not be turned into a game.
    #[display("{}", _0)]
    Settings(SettingsError),

    /// The action does not apply in the current phase.
    #[from(skip)]
    #[display("Cannot {} while the session is in {}", action, phase)]
    WrongPhase {
        /// Requested action.
        action: &'static str,
        /// Phase the session was in.
        phase: SessionPhase,
    },

    /// Seat index past the last player.
    #[from(skip)]
    #[display("No player at position {}", _0)]
    NoSuchSeat(usize),

    /// No round has been started.
    #[from(skip)]
    #[display("No round in progress")]
    NoRound,
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Round(e) => Some(e),
            SessionError::Words(e) => Some(e),
            SessionError::Settings(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn session(mode: &str) -> GameSession {
        let settings = GameSettings::default()
            .with_mode(mode)
            .with_player_names(vec!["Ada".to_string(), "Bo".to_string()]);
        GameSession::new(settings, WordBank::builtin().unwrap()).unwrap()
    }

    fn names(session: &GameSession) -> Vec<String> {
        session.seats().iter().map(|s| s.name().clone()).collect()
    }

    #[test]
    fn test_new_session_in_setup() {
        let s = session("conquest");
        assert_eq!(*s.phase(), SessionPhase::Setup);
        assert!(s.round().is_none());
        assert_eq!(names(&s), vec!["Ada", "Bo"]);
    }

    #[test]
    fn test_unknown_unit_rejected() {
        let settings = GameSettings::default().with_units(vec!["level9|unit9".to_string()]);
        let err = GameSession::new(settings, WordBank::builtin().unwrap()).unwrap_err();
        assert!(matches!(err, SessionError::Words(WordError::UnknownUnit(_))));
    }

    #[test]
    fn test_empty_units_rejected() {
        let settings = GameSettings::default().with_units(Vec::new());
        let err = GameSession::new(settings, WordBank::builtin().unwrap()).unwrap_err();
        assert!(matches!(err, SessionError::Words(WordError::NoUnits)));
    }

    #[test]
    fn test_start_assigns_colours_and_deals() {
        let mut s = session("conquest");
        let mut rng = StdRng::seed_from_u64(5);
        s.start(&mut rng).unwrap();
        assert_eq!(*s.phase(), SessionPhase::InProgress);
        assert_eq!(s.tiles().len(), 9);
        let colours: Vec<_> = s.seats().iter().map(|seat| seat.color().clone()).collect();
        assert!(colours.iter().all(Option::is_some));
        assert_ne!(colours[0], colours[1]);
    }

    #[test]
    fn test_play_outside_round_is_rejected() {
        let mut s = session("conquest");
        assert!(matches!(
            s.play(0),
            Err(SessionError::WrongPhase { phase: SessionPhase::Setup, .. })
        ));
    }

    #[test]
    fn test_classic_round_tallies_and_undo() {
        let mut s = session("classic");
        let mut rng = StdRng::seed_from_u64(1);
        s.start(&mut rng).unwrap();
        for cell in [0, 3, 1, 4] {
            s.play(cell).unwrap();
        }
        let outcome = s.play(2).unwrap();
        assert!(outcome.round_ended);
        assert_eq!(*s.phase(), SessionPhase::Ended);
        assert_eq!(s.last_verdict(), &Some(Verdict::Winner(0)));
        assert_eq!(*s.seats()[0].tally().lines(), 1);
        assert_eq!(*s.seats()[0].tally().rounds_won(), 1);
        assert_eq!(*s.seats()[1].tally().rounds_played(), 1);

        s.undo().unwrap();
        assert_eq!(*s.phase(), SessionPhase::InProgress);
        assert_eq!(s.seats()[0].tally(), &Tally::default());
        assert_eq!(*s.seats()[1].tally().rounds_played(), 0);
        assert!(s.last_verdict().is_none());
    }

    #[test]
    fn test_block_is_tallied() {
        let mut s = session("conquest");
        s.start(&mut StdRng::seed_from_u64(2)).unwrap();
        s.play(0).unwrap();
        s.play(4).unwrap();
        s.play(1).unwrap();
        let outcome = s.play(2).unwrap();
        assert!(outcome.was_block());
        assert_eq!(*s.seats()[1].tally().blocks(), 1);
        s.undo().unwrap();
        assert_eq!(*s.seats()[1].tally().blocks(), 0);
    }

    #[test]
    fn test_undo_without_moves() {
        let mut s = session("conquest");
        s.start(&mut StdRng::seed_from_u64(3)).unwrap();
        assert!(matches!(s.undo(), Err(SessionError::Round(RoundError::NoHistory(_)))));
    }

    #[test]
    fn test_reorder_between_rounds_keeps_colours() {
        let mut s = session("classic");
        let mut rng = StdRng::seed_from_u64(8);
        s.start(&mut rng).unwrap();
        for cell in [0, 3, 1, 4, 2] {
            s.play(cell).unwrap();
        }
        assert!(s.move_player(0, 1).is_err());
        s.next_round().unwrap();
        let ada_colour = s.seats()[0].color().clone();
        s.move_player(0, 1).unwrap();
        assert_eq!(names(&s), vec!["Bo", "Ada"]);
        s.start(&mut rng).unwrap();
        assert_eq!(s.seats()[1].color(), &ada_colour);
        assert_eq!(*s.seats()[1].tally().rounds_won(), 1);
    }

    #[test]
    fn test_randomize_changes_order() {
        let settings = GameSettings::default().with_num_players(3);
        let mut s = GameSession::new(settings, WordBank::builtin().unwrap()).unwrap();
        let before = names(&s);
        s.randomize_order(&mut StdRng::seed_from_u64(11)).unwrap();
        let after = names(&s);
        assert_ne!(after, before);
        let mut sorted = after.clone();
        sorted.sort();
        assert_eq!(sorted, before);
    }

    #[test]
    fn test_move_player_bounds() {
        let mut s = session("conquest");
        assert!(matches!(s.move_player(0, 5), Err(SessionError::NoSuchSeat(5))));
    }

    #[test]
    fn test_reset_and_back_to_settings() {
        let mut s = session("conquest");
        let mut rng = StdRng::seed_from_u64(4);
        s.start(&mut rng).unwrap();
        s.play(4).unwrap();
        s.reset_round(&mut rng).unwrap();
        assert_eq!(s.round().map(RoundState::moves_made), Some(0));
        s.back_to_settings();
        assert_eq!(*s.phase(), SessionPhase::Setup);
        assert!(s.round().is_none());
    }
}
