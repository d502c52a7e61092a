//! Command-line interface for tictactoe.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tictactoe::GameMode;

/// Tic-tac-toe with a persistent leaderboard
#[derive(Parser, Debug)]
#[command(name = "tictactoe")]
#[command(
    about = "Tic-tac-toe with Classic and Endless modes and a persistent leaderboard",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, default_value = "tictactoe.toml")]
    pub config: PathBuf,

    /// SQLite database path (overrides config and environment)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game on the terminal: enter "row col", "reset" or "quit"
    Play {
        /// Name of player 1 (X, moves first)
        player1: String,

        /// Name of player 2 (O)
        player2: String,

        /// Rule variant: classic or endless
        #[arg(short, long, default_value = "classic")]
        mode: GameMode,
    },

    /// Show the players with the most wins
    Leaderboard {
        /// Number of players to show
        #[arg(short, long, default_value = "10")]
        limit: i64,
    },

    /// Show finished games, most recent first
    History {
        /// Number of games to show
        #[arg(short, long, default_value = "10")]
        limit: i64,

        /// Only games this player took part in
        #[arg(long)]
        player: Option<String>,
    },
}
