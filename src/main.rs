//! Phonics Games - command-line front end.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use phonics_games::{
    GameSession, GameSettings, Seat, WordBank, deal_words, render_board, render_scoreboard,
};
use phonics_tictactoe::{Board, RoundState, Verdict};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let bank = load_bank(cli.word_bank)?;

    match cli.command {
        Command::Play {
            settings,
            moves,
            seed,
            json,
        } => run_play(bank, settings, moves, seed, json),
        Command::Deal { settings, seed } => run_deal(bank, settings, seed),
        Command::Units => run_units(&bank),
        Command::InitSettings { seed } => {
            let settings = GameSettings::default().with_random_unit(&bank, &mut make_rng(seed));
            print!("{}", settings.to_toml()?);
            Ok(())
        }
    }
}

/// Final state of a scripted round.
#[derive(Serialize)]
struct PlayReport<'a> {
    players: &'a [Seat],
    round: Option<&'a RoundState>,
    verdict: &'a Option<Verdict>,
}

/// Play a scripted round
#[instrument(skip(bank, moves), fields(moves = moves.len()))]
fn run_play(
    bank: WordBank,
    settings: Option<PathBuf>,
    moves: Vec<usize>,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let settings = load_settings(settings)?;
    let show_lines = *settings.show_lines();
    let mut session = GameSession::new(settings, bank)?;
    let mut rng = make_rng(seed);
    session.start(&mut rng)?;

    for (index, cell) in moves.iter().enumerate() {
        if session.round().is_some_and(RoundState::is_ended) {
            warn!(ignored = moves.len() - index, "Round ended, ignoring remaining moves");
            break;
        }
        let outcome = session
            .play(*cell)
            .with_context(|| format!("Move {} (cell {}) was rejected", index + 1, cell))?;
        for event in &outcome.line_events {
            info!(player = event.scoring_player + 1, line = %event.line_id, "Line completed");
        }
    }

    if json {
        let report = PlayReport {
            players: session.seats(),
            round: session.round(),
            verdict: session.last_verdict(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if let Some(round) = session.round() {
        println!(
            "{}",
            render_board(round.board(), session.tiles(), round.completed_lines(), show_lines)
        );
        println!();
    }
    println!("{}", render_scoreboard(&session));
    match (session.last_verdict(), session.current_seat()) {
        (Some(verdict), _) => println!("\n{}", verdict),
        (None, Some(seat)) => println!("\n{} to move", seat.name()),
        (None, None) => println!("\nRound still in progress"),
    }
    Ok(())
}

/// Deal and print a word grid
#[instrument(skip(bank))]
fn run_deal(bank: WordBank, settings: Option<PathBuf>, seed: Option<u64>) -> Result<()> {
    let settings = load_settings(settings)?;
    let grid = settings.grid_size();
    let units = settings.unit_keys()?;
    let tiles = deal_words(&bank, &units, grid * grid, &mut make_rng(seed))?;
    println!(
        "{}",
        render_board(&Board::new(grid), &tiles, &BTreeSet::new(), false)
    );
    Ok(())
}

/// List word bank units
fn run_units(bank: &WordBank) -> Result<()> {
    for key in bank.keys() {
        let label = bank.unit_label(&key).unwrap_or_else(|| key.to_string());
        println!("{:<14} {}", key, label);
    }
    Ok(())
}

fn load_bank(path: Option<PathBuf>) -> Result<WordBank> {
    let bank = match path {
        Some(path) => WordBank::from_file(&path)
            .with_context(|| format!("Loading word bank {}", path.display()))?,
        None => WordBank::builtin()?,
    };
    Ok(bank)
}

fn load_settings(path: Option<PathBuf>) -> Result<GameSettings> {
    match path {
        Some(path) => Ok(GameSettings::from_file(&path)?),
        None => Ok(GameSettings::default()),
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
