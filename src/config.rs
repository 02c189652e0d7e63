//! Session settings and client configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::model::GameState;

/// Smallest board the service accepts.
pub const MIN_BOARD_SIZE: usize = 3;
/// Largest board the service accepts.
pub const MAX_BOARD_SIZE: usize = 10;
/// Shortest winning line.
pub const MIN_WIN_LENGTH: usize = 3;

/// Default service endpoint.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080/api/game";

/// How many seats are played by humans.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum HumanPlayers {
    /// Agent vs agent.
    #[default]
    Zero,
    /// Human vs agent; the service decides who moves first.
    One,
    /// Human vs human.
    Two,
}

impl HumanPlayers {
    /// Returns the display label for this option.
    #[instrument]
    pub fn label(self) -> &'static str {
        match self {
            Self::Zero => "0 (AI vs AI)",
            Self::One => "1 (Human vs AI)",
            Self::Two => "2 (Human vs Human)",
        }
    }

    /// Cycles to the next option, wrapping around.
    #[instrument]
    pub fn next(self) -> Self {
        match self {
            Self::Zero => Self::One,
            Self::One => Self::Two,
            Self::Two => Self::Zero,
        }
    }

    /// Cycles to the previous option, wrapping around.
    #[instrument]
    pub fn prev(self) -> Self {
        match self {
            Self::Zero => Self::Two,
            Self::One => Self::Zero,
            Self::Two => Self::One,
        }
    }
}

impl TryFrom<u8> for HumanPlayers {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Zero),
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(format!("human player count must be 0, 1 or 2, got {}", other)),
        }
    }
}

impl From<HumanPlayers> for u8 {
    fn from(value: HumanPlayers) -> Self {
        match value {
            HumanPlayers::Zero => 0,
            HumanPlayers::One => 1,
            HumanPlayers::Two => 2,
        }
    }
}

/// Pace of autonomous moves.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    /// 1.5 seconds between agent moves.
    Slow,
    /// 800 ms between agent moves.
    #[default]
    Normal,
    /// 400 ms between agent moves.
    Fast,
}

impl Speed {
    /// Delay between two consecutive autonomous moves.
    pub fn delay(self) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(1500),
            Self::Normal => Duration::from_millis(800),
            Self::Fast => Duration::from_millis(400),
        }
    }

    /// Shorter delay used when handing the turn to an agent.
    pub fn first_delay(self) -> Duration {
        self.delay() / 2
    }

    /// Cycles to the next preset, wrapping around.
    #[instrument]
    pub fn next(self) -> Self {
        match self {
            Self::Slow => Self::Normal,
            Self::Normal => Self::Fast,
            Self::Fast => Self::Slow,
        }
    }

    /// Cycles to the previous preset, wrapping around.
    #[instrument]
    pub fn prev(self) -> Self {
        match self {
            Self::Slow => Self::Fast,
            Self::Normal => Self::Slow,
            Self::Fast => Self::Normal,
        }
    }
}

/// Settings sent to the service when a game starts.
///
/// Every constructor and edit clamps, so `win_length <= board_size`
/// always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    board_size: usize,
    win_length: usize,
    human_players: HumanPlayers,
}

impl SessionConfig {
    /// Creates a clamped configuration.
    #[instrument]
    pub fn new(board_size: usize, win_length: usize, human_players: HumanPlayers) -> Self {
        Self {
            board_size: MIN_BOARD_SIZE,
            win_length: MIN_WIN_LENGTH,
            human_players,
        }
        .with_board_size(board_size)
        .with_win_length(win_length)
    }

    /// Changes the board size, shrinking the win length if needed.
    #[instrument]
    pub fn with_board_size(self, board_size: usize) -> Self {
        let board_size = board_size.clamp(MIN_BOARD_SIZE, MAX_BOARD_SIZE);
        Self {
            board_size,
            win_length: self.win_length.min(board_size),
            ..self
        }
    }

    /// Changes the win length, capped at the board size.
    #[instrument]
    pub fn with_win_length(self, win_length: usize) -> Self {
        Self {
            win_length: win_length.clamp(MIN_WIN_LENGTH, self.board_size),
            ..self
        }
    }

    /// Changes how many seats are human.
    #[instrument]
    pub fn with_human_players(self, human_players: HumanPlayers) -> Self {
        Self {
            human_players,
            ..self
        }
    }

    /// Adopts the settings reported by a service snapshot.
    ///
    /// The human count is kept when the snapshot does not report one.
    #[instrument(skip(state))]
    pub fn adopt(self, state: &GameState) -> Self {
        let human_players = state
            .human_players
            .and_then(|count| HumanPlayers::try_from(count).ok())
            .unwrap_or(self.human_players);
        Self::new(state.board_size, state.win_length, human_players)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(3, 3, HumanPlayers::Zero)
    }
}

/// `[session]` table of the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDefaults {
    board_size: usize,
    win_length: usize,
    human_players: HumanPlayers,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            board_size: 3,
            win_length: 3,
            human_players: HumanPlayers::Zero,
        }
    }
}

impl From<SessionDefaults> for SessionConfig {
    fn from(defaults: SessionDefaults) -> Self {
        SessionConfig::new(
            defaults.board_size,
            defaults.win_length,
            defaults.human_players,
        )
    }
}

/// Client configuration loaded from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the game service.
    #[serde(default = "default_server_url")]
    server_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    request_timeout_ms: u64,

    /// Pace of autonomous moves.
    #[serde(default)]
    speed: Speed,

    /// Settings for the first game.
    #[serde(default)]
    session: SessionDefaults,
}

#[instrument]
fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

#[instrument]
fn default_request_timeout_ms() -> u64 {
    10_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            request_timeout_ms: default_request_timeout_ms(),
            speed: Speed::default(),
            session: SessionDefaults::default(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(server_url = %config.server_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if it exists, falling back to defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Overrides the service URL.
    #[instrument(skip(self))]
    pub fn with_server_url(self, server_url: String) -> Self {
        Self { server_url, ..self }
    }

    /// Overrides the speed preset.
    #[instrument(skip(self))]
    pub fn with_speed(self, speed: Speed) -> Self {
        Self { speed, ..self }
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Session settings for the first game.
    pub fn session_config(&self) -> SessionConfig {
        self.session.into()
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shrinking_board_clamps_win_length() {
        let config = SessionConfig::new(5, 5, HumanPlayers::Zero).with_board_size(4);
        assert_eq!(*config.board_size(), 4);
        assert_eq!(*config.win_length(), 4);
    }

    #[test]
    fn test_win_length_capped_at_board_size() {
        let config = SessionConfig::new(4, 3, HumanPlayers::One).with_win_length(9);
        assert_eq!(*config.win_length(), 4);
    }

    #[test]
    fn test_board_size_bounds() {
        assert_eq!(*SessionConfig::default().with_board_size(1).board_size(), 3);
        assert_eq!(*SessionConfig::default().with_board_size(42).board_size(), 10);
    }

    #[test]
    fn test_wire_body_matches_service() {
        let config = SessionConfig::new(4, 3, HumanPlayers::Two);
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"boardSize": 4, "winLength": 3, "humanPlayers": 2})
        );
    }

    #[test]
    fn test_speed_first_delay_is_half() {
        assert_eq!(Speed::Normal.first_delay(), Duration::from_millis(400));
        assert_eq!(Speed::Slow.first_delay(), Duration::from_millis(750));
    }

    #[test]
    fn test_human_players_cycle() {
        assert_eq!(HumanPlayers::Two.next(), HumanPlayers::Zero);
        assert_eq!(HumanPlayers::Zero.prev(), HumanPlayers::Two);
    }
}
