//! Command-line interface for tictactoe.

use clap::{Parser, Subcommand};
use tictactoe_store::StorageBackend;

/// Tic-tac-toe - two players, one terminal, persisted between runs
#[derive(Parser, Debug)]
#[command(name = "tictactoe")]
#[command(about = "Two-player tic-tac-toe with persisted sessions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (players, storage key, backend)
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Storage backend, overriding the config file
    #[arg(long, global = true, value_enum)]
    pub backend: Option<StorageBackend>,

    /// Storage directory (file backend) or database file (sqlite backend)
    #[arg(long, global = true)]
    pub path: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the board, scoreboard and whose turn it is
    Show {
        /// Print the game and stats snapshots as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Place the current player's mark on a square (0-8, row-major)
    Move {
        /// Square id
        square: usize,
    },

    /// Clear the board and keep all scores
    NewRound,

    /// Clear the board and the current round set; lifetime scores stay
    Reset,

    /// Forget everything, lifetime scores included
    Clear,

    /// Re-render whenever another process changes the game
    Watch {
        /// Polling interval in milliseconds
        #[arg(long, default_value = "500")]
        interval_ms: u64,
    },
}
