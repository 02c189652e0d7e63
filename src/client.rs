//! HTTP client for the game service.

use derive_more::{Display, Error};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::config::SessionConfig;
use crate::model::GameState;

/// Which stage of a service call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum ServiceErrorKind {
    /// The request never completed (connection refused, timeout, ...).
    Transport,
    /// The service answered with a non-success status.
    Status,
    /// The body was not a valid game state.
    Decode,
}

/// A failed call to the game service.
#[derive(Debug, Clone, Display, Error)]
#[display("Service error ({}): {} at {}:{}", kind, message, file, line)]
pub struct ServiceError {
    /// Failure stage.
    pub kind: ServiceErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ServiceError {
    /// Creates a new service error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::new(ServiceErrorKind::Transport, format!("HTTP request failed: {}", err))
    }
}

impl From<serde_json::Error> for ServiceError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(ServiceErrorKind::Decode, format!("Invalid game state: {}", err))
    }
}

/// The four state-transition endpoints of the game service, plus reset.
///
/// Every call returns the full authoritative [`GameState`].
#[async_trait::async_trait]
pub trait GameService: Send + Sync {
    /// `GET state`: current snapshot.
    async fn state(&self) -> Result<GameState, ServiceError>;

    /// `POST new`: fresh game with the given settings.
    async fn new_game(&self, config: &SessionConfig) -> Result<GameState, ServiceError>;

    /// `POST move`: place the current human seat's mark at `position`.
    async fn make_move(&self, position: usize) -> Result<GameState, ServiceError>;

    /// `POST ai-move`: let the service play the current autonomous seat.
    async fn ai_move(&self) -> Result<GameState, ServiceError>;

    /// `POST reset`: restart with the service's current settings.
    async fn reset(&self) -> Result<GameState, ServiceError>;
}

#[derive(Debug, Serialize)]
struct MoveRequest {
    position: usize,
}

/// reqwest-backed [`GameService`].
#[derive(Debug, Clone)]
pub struct HttpGameClient {
    /// Base URL without trailing slash.
    base_url: String,
    /// HTTP client.
    client: reqwest::Client,
}

impl HttpGameClient {
    /// Creates a client for the service rooted at `base_url`.
    #[instrument(fields(timeout_ms = timeout.as_millis() as u64))]
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        info!(base_url = %base_url, "Created game service client");
        Ok(Self { base_url, client })
    }

    /// Base URL of the service.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    #[instrument(skip(self))]
    async fn get(&self, path: &str) -> Result<GameState, ServiceError> {
        let url = self.endpoint(path);
        debug!(url = %url, "GET");
        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(error = %e, url = %url, "Request failed");
            ServiceError::from(e)
        })?;
        Self::decode(response).await
    }

    #[instrument(skip(self, body))]
    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<GameState, ServiceError> {
        let url = self.endpoint(path);
        debug!(url = %url, has_body = body.is_some(), "POST");
        let mut request = self.client.post(&url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, url = %url, "Request failed");
            ServiceError::from(e)
        })?;
        Self::decode(response).await
    }

    async fn decode(response: reqwest::Response) -> Result<GameState, ServiceError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!(status = %status, body = %text, "Service returned error status");
            return Err(ServiceError::new(
                ServiceErrorKind::Status,
                format!("Service returned {}: {}", status, text),
            ));
        }

        let state: GameState = serde_json::from_str(&text).map_err(|e| {
            error!(error = %e, body = %text, "Failed to parse game state");
            ServiceError::from(e)
        })?;

        debug!(
            current_player = %state.current_player,
            game_over = state.game_over,
            status = %state.status,
            "Received game state"
        );
        Ok(state)
    }
}

#[async_trait::async_trait]
impl GameService for HttpGameClient {
    #[instrument(skip(self))]
    async fn state(&self) -> Result<GameState, ServiceError> {
        self.get("state").await
    }

    #[instrument(skip(self))]
    async fn new_game(&self, config: &SessionConfig) -> Result<GameState, ServiceError> {
        info!(
            board_size = config.board_size(),
            win_length = config.win_length(),
            "Requesting new game"
        );
        self.post("new", Some(config)).await
    }

    #[instrument(skip(self))]
    async fn make_move(&self, position: usize) -> Result<GameState, ServiceError> {
        self.post("move", Some(&MoveRequest { position })).await
    }

    #[instrument(skip(self))]
    async fn ai_move(&self) -> Result<GameState, ServiceError> {
        self.post::<()>("ai-move", None).await
    }

    #[instrument(skip(self))]
    async fn reset(&self) -> Result<GameState, ServiceError> {
        self.post::<()>("reset", None).await
    }
}
