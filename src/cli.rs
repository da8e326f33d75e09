//! Command-line interface for phonics_games.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Phonics Tic-Tac-Toe - claim words, make lines, practise sounds
#[derive(Parser, Debug)]
#[command(name = "phonics_games")]
#[command(about = "Phonics tic-tac-toe for two to five players", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Word bank TOML to use instead of the built-in one
    #[arg(long, global = true)]
    pub word_bank: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a scripted round and print the result
    Play {
        /// Settings TOML (defaults apply when omitted)
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Cells to claim in turn order, e.g. 0,4,1
        #[arg(short, long, value_delimiter = ',')]
        moves: Vec<usize>,

        /// Seed for word dealing and colours
        #[arg(long)]
        seed: Option<u64>,

        /// Print the final state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Deal words for a board and print the grid
    Deal {
        /// Settings TOML (defaults apply when omitted)
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Seed for the shuffle
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List the units in the word bank
    Units,

    /// Print a default settings file with a randomly chosen word unit
    InitSettings {
        /// Seed for the unit choice
        #[arg(long)]
        seed: Option<u64>,
    },
}
