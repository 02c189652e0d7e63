//! Tic Tac Toe Arena - terminal client for a remote NxN tic-tac-toe service
//!
//! The game service owns the rules and the AI; this crate mirrors its state,
//! sends moves, and paces agent-vs-agent play.
//!
//! # Architecture
//!
//! - **Model**: wire types returned by the service ([`GameState`])
//! - **Client**: the [`GameService`] seam and its reqwest implementation
//! - **Session**: the [`GameSession`] view model and its phase machine
//! - **Driver**: headless pacing of autonomous turns
//! - **TUI**: ratatui front end
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use tictactoe_arena::{GameSession, HttpGameClient, SessionConfig, Speed, run_autonomous};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = HttpGameClient::new("http://localhost:8080/api/game", Duration::from_secs(10))?;
//! let mut session = GameSession::new(client, SessionConfig::default(), Speed::Fast);
//! session.start().await?;
//! run_autonomous(&mut session, |_| {}).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod client;
mod config;
mod driver;
mod log;
mod model;
mod position;
mod session;
mod tui;

// Crate-level exports - Wire model
pub use model::{AgentThoughts, Cell, GameState, Mark, Outcome, SeatConfig, Thought, ThoughtKind};

// Crate-level exports - Configuration
pub use config::{
    ClientConfig, ConfigError, DEFAULT_SERVER_URL, HumanPlayers, MAX_BOARD_SIZE, MIN_BOARD_SIZE,
    MIN_WIN_LENGTH, SessionConfig, SessionDefaults, Speed,
};

// Crate-level exports - Display helpers
pub use position::{CellCoord, position_name};

// Crate-level exports - Move log
pub use log::{GameLog, LogCategory, LogEntry};

// Crate-level exports - Service client
pub use client::{GameService, HttpGameClient, ServiceError, ServiceErrorKind};

// Crate-level exports - Session view model
pub use session::{
    AutoMoveTicket, AutoStepOutcome, GameSession, IgnoreReason, SessionError, SessionErrorKind,
    SessionPhase, SubmitOutcome,
};

// Crate-level exports - Headless driver
pub use driver::run_autonomous;

// Crate-level exports - Terminal UI
pub use tui::{Action, App, Direction, SettingField, TUI_LOG_FILE, action_for_key, move_cursor, run_tui};
