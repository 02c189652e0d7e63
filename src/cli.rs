//! Command-line interface for tictactoe_arena.

use clap::{Args, Parser, Subcommand};
use tictactoe_arena::Speed;

/// Tic Tac Toe Arena - terminal client for a remote tic-tac-toe service
#[derive(Parser, Debug)]
#[command(name = "tictactoe_arena")]
#[command(about = "Play NxN tic-tac-toe against a remote AI service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Where the service lives.
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Game service base URL (overrides the config file)
    #[arg(long, env = "TICTACTOE_SERVER_URL")]
    pub server_url: Option<String>,

    /// Path to the client config file
    #[arg(short, long, default_value = "tictactoe_arena.toml")]
    pub config: std::path::PathBuf,
}

/// Settings for the next game (override the config file).
#[derive(Args, Debug, Default)]
pub struct SessionArgs {
    /// Board width and height (3-10)
    #[arg(long)]
    pub board_size: Option<usize>,

    /// Marks in a row needed to win (3 to board size)
    #[arg(long)]
    pub win_length: Option<usize>,

    /// Number of human seats (0, 1 or 2)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=2))]
    pub humans: Option<u8>,

    /// Pace of agent moves
    #[arg(long, value_enum)]
    pub speed: Option<Speed>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the interactive terminal client
    Tui {
        /// Connection settings
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Game settings
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Print the service's current game state
    State {
        /// Connection settings
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Print raw JSON instead of a board
        #[arg(long)]
        json: bool,
    },

    /// Start a game and let agent seats play it out, printing the log
    Watch {
        /// Connection settings
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Game settings
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Reset the service's game with its current settings
    Reset {
        /// Connection settings
        #[command(flatten)]
        connection: ConnectionArgs,
    },
}
