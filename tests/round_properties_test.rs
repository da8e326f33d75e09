//! Seeded random sweeps over legal rounds.

use phonics_tictactoe::rules::{find_lines, new_lines};
use phonics_tictactoe::{GameMode, MAX_MATCH_LENGTH, RoundConfig, RoundState};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use strum::IntoEnumIterator;

const ROUNDS: u64 = 200;

fn random_config(rng: &mut StdRng) -> RoundConfig {
    let grid = rng.gen_range(2..=6);
    let length = rng.gen_range(2..=grid.min(MAX_MATCH_LENGTH));
    let players = rng.gen_range(2..=5);
    let modes: Vec<GameMode> = GameMode::iter().collect();
    let mode = *modes.choose(rng).expect("four modes");
    RoundConfig::new(grid, length, players, mode).expect("generated config is valid")
}

/// Plays random legal moves until the round ends, returning every state.
fn random_round(rng: &mut StdRng) -> Vec<RoundState> {
    let mut states = vec![RoundState::start(random_config(rng)).expect("round starts")];
    loop {
        let state = states.last().expect("at least the start state");
        let Some(&cell) = state.legal_moves().choose(rng) else {
            break;
        };
        let next = state
            .apply_move(cell, state.current_player())
            .expect("legal move accepted")
            .state;
        states.push(next);
    }
    states
}

#[test]
fn test_found_lines_are_owned_and_in_bounds() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..ROUNDS {
        let states = random_round(&mut rng);
        let last = states.last().expect("non-empty");
        let board = last.board();
        let length = last.config().match_length();
        for player in 0..last.config().num_players() {
            for line in find_lines(board, player, length) {
                assert_eq!(line.cells.len(), length);
                for &cell in &line.cells {
                    assert!(cell < board.len(), "line {} leaves the board", line.id());
                    assert_eq!(board.get(cell), Some(player));
                }
            }
        }
    }
}

#[test]
fn test_no_line_is_scored_twice() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..ROUNDS {
        for state in random_round(&mut rng) {
            let config = state.config();
            let total: u32 = state.scores().iter().sum();
            assert_eq!(total as usize, state.completed_lines().len());
            for player in 0..config.num_players() {
                let fresh = new_lines(
                    state.board(),
                    player,
                    config.match_length(),
                    state.completed_lines(),
                );
                assert!(fresh.is_empty(), "unscored line left behind: {:?}", fresh);
            }
        }
    }
}

#[test]
fn test_undo_is_a_true_inverse() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..ROUNDS {
        let states = random_round(&mut rng);
        let mut state = states.last().expect("non-empty").clone();
        for expected in states.iter().rev().skip(1) {
            state = state.undo_last_move().expect("history left");
            assert_eq!(state.board(), expected.board());
            assert_eq!(state.scores(), expected.scores());
            assert_eq!(state.completed_lines(), expected.completed_lines());
            assert_eq!(state.moves_made(), expected.moves_made());
            assert_eq!(state.current_player(), expected.current_player());
            assert_eq!(state.eliminated_players(), expected.eliminated_players());
        }
        assert_eq!(&state, &states[0]);
        assert!(state.undo_last_move().is_err());
    }
}

#[test]
fn test_round_ends_exactly_when_mode_says() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..ROUNDS {
        let states = random_round(&mut rng);
        let last = states.last().expect("non-empty");
        assert!(last.is_ended());
        for pair in states.windows(2) {
            assert!(!pair[0].is_ended(), "a move was accepted after the round ended");
        }
        match last.mode() {
            GameMode::Conquest | GameMode::Stealth => assert!(last.board().is_full()),
            GameMode::Classic => {
                let scored: u32 = last.scores().iter().sum();
                assert!(last.board().is_full() || scored > 0);
            }
            GameMode::Survivor => {
                assert!(last.board().is_full() || last.remaining_players().len() <= 1);
            }
        }
    }
}
