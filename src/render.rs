//! Plain-text views of the word board and scoreboard.

use crate::phonics::{bracket_targets, highlight_target_sounds};
use crate::session::GameSession;
use crate::words::Tile;
use phonics_tictactoe::{Board, LineId, PLAYER_SYMBOLS};
use std::collections::{BTreeSet, HashSet};

/// Renders the board one row per line.
///
/// Open cells show their word with target sounds bracketed. Claimed cells
/// show the owner's symbol and the word; with `show_lines`, cells on a
/// completed line gain a trailing `*`.
pub fn render_board(
    board: &Board,
    tiles: &[Tile],
    completed: &BTreeSet<LineId>,
    show_lines: bool,
) -> String {
    let on_line: HashSet<usize> = if show_lines {
        completed.iter().flat_map(LineId::cells).collect()
    } else {
        HashSet::new()
    };

    let labels: Vec<String> = (0..board.len())
        .map(|cell| {
            let tile = tiles.get(cell).cloned().unwrap_or_else(Tile::placeholder);
            match board.get(cell) {
                Some(player) => {
                    let symbol = PLAYER_SYMBOLS.get(player).copied().unwrap_or("?");
                    let star = if on_line.contains(&cell) { "*" } else { "" };
                    format!("{} {}{}", symbol, tile.word, star)
                }
                None => bracket_targets(&highlight_target_sounds(&tile.word, &tile.target)),
            }
        })
        .collect();

    let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let grid = board.grid_size().max(1);
    labels
        .chunks(grid)
        .map(|row| {
            row.iter()
                .map(|label| format!("{:<width$}", label, width = width))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders each seat's name, symbol, round score and tallies.
pub fn render_scoreboard(session: &GameSession) -> String {
    let scores = session.round().map(|r| r.scores().to_vec()).unwrap_or_default();
    let current = session
        .round()
        .filter(|r| !r.is_ended())
        .map(|r| r.current_player());
    session
        .seats()
        .iter()
        .enumerate()
        .map(|(i, seat)| {
            let marker = if current == Some(i) { ">" } else { " " };
            let tally = seat.tally();
            format!(
                "{} {} ({}) score {} | lines {} blocks {} won {}/{}",
                marker,
                seat.name(),
                session.symbol(i),
                scores.get(i).copied().unwrap_or(0),
                tally.lines(),
                tally.blocks(),
                tally.rounds_won(),
                tally.rounds_played(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
