//! Game session view model.
//!
//! [`GameSession`] owns everything the front end shows: the mirrored
//! [`GameState`], the local [`SessionConfig`], the move log, and the phase
//! of the session. Every change goes through one of its async operations,
//! each of which issues at most one service request.
//!
//! # Phases
//!
//! ```text
//! Idle ──start──▶ AwaitingHuman ◀──────▶ AwaitingAuto
//!                      │                      │
//!                      └──────▶ GameOver ◀────┘
//! ```
//!
//! Autonomous turns are never run inline. When the service hands the turn
//! to an agent seat, the session issues an [`AutoMoveTicket`] carrying the
//! delay to wait; the owner sleeps and then calls
//! [`GameSession::auto_step`] with it. Tickets are keyed to the session
//! epoch, which every `start`/`reset` bumps, so a ticket from an earlier
//! game is ignored.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::client::{GameService, ServiceError};
use crate::config::{HumanPlayers, SessionConfig, Speed};
use crate::log::{GameLog, LogCategory};
use crate::model::{GameState, Outcome};
use crate::position::position_name;

/// Where the session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// No game running; settings are editable.
    Idle,
    /// A human seat is to move; the board accepts input.
    AwaitingHuman,
    /// An agent seat is to move; the service will be asked to play it.
    AwaitingAuto,
    /// The game ended.
    GameOver(Outcome),
}

impl SessionPhase {
    /// Derives the phase a freshly received state puts the session in.
    pub fn from_state(state: &GameState) -> Self {
        match state.outcome() {
            Some(outcome) => SessionPhase::GameOver(outcome),
            None if state.current_seat().is_human => SessionPhase::AwaitingHuman,
            None => SessionPhase::AwaitingAuto,
        }
    }

    /// Returns true while a game is running.
    pub fn is_playing(&self) -> bool {
        matches!(self, SessionPhase::AwaitingHuman | SessionPhase::AwaitingAuto)
    }
}

/// Permission to run one autonomous move after `delay`.
///
/// Every ticket a session issues is distinct, even for equal delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Getters, new)]
pub struct AutoMoveTicket {
    epoch: u64,
    sequence: u64,
    delay: Duration,
}

/// Why a human move was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum IgnoreReason {
    /// No game state loaded yet.
    #[strum(to_string = "no game loaded")]
    NoGame,
    /// The game has already ended.
    #[strum(to_string = "game is over")]
    GameOver,
    /// The seat to move is not human, or no game is running.
    #[strum(to_string = "not a human turn")]
    NotHumansTurn,
    /// The position is past the end of the board.
    #[strum(to_string = "off the board")]
    OutOfRange,
    /// The cell already holds a mark.
    #[strum(to_string = "cell already taken")]
    CellOccupied,
}

/// Result of [`GameSession::submit_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmitOutcome {
    /// The move was sent and the session moved to the given phase.
    Applied(SessionPhase),
    /// Nothing happened.
    Ignored(IgnoreReason),
}

/// Result of [`GameSession::auto_step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AutoStepOutcome {
    /// The service played the move and the session moved to the given phase.
    Applied(SessionPhase),
    /// The ticket was not the pending one; nothing happened.
    Stale,
}

/// What went wrong in a session operation.
#[derive(Debug, Clone, Display)]
pub enum SessionErrorKind {
    /// The service call failed; the session did not change.
    #[display("{}", _0)]
    Service(ServiceError),
    /// Settings cannot change while a game is running.
    #[display("settings are locked while a game is running")]
    ConfigLocked,
    /// No autonomous move is due.
    #[display("no autonomous move is due")]
    NotAwaitingAuto,
}

/// Session error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Session error: {} at {}:{}", kind, file, line)]
pub struct SessionError {
    /// What went wrong.
    pub kind: SessionErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SessionError {
    /// Creates a new session error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: SessionErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns the service failure behind this error, if any.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match &self.kind {
            SessionErrorKind::Service(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ServiceError> for SessionError {
    #[track_caller]
    fn from(err: ServiceError) -> Self {
        Self::new(SessionErrorKind::Service(err))
    }
}

/// The client-side view model of one game service.
#[derive(Debug, Getters)]
pub struct GameSession<S> {
    /// Service the session talks to.
    service: S,
    /// Settings for the next `start`.
    config: SessionConfig,
    /// Pace of autonomous moves.
    speed: Speed,
    /// Latest state received from the service (or a preview of it).
    state: Option<GameState>,
    /// Current phase.
    phase: SessionPhase,
    /// Move log, newest first.
    log: GameLog,
    /// Header of the running game ("New Game (4x4, 3 to win)").
    headline: Option<String>,
    /// Message of the last failed service call, cleared on success.
    last_error: Option<String>,
    #[getter(skip)]
    epoch: u64,
    #[getter(skip)]
    pending: Option<AutoMoveTicket>,
    #[getter(skip)]
    issued: u64,
}

impl<S: GameService> GameSession<S> {
    /// Creates an idle session.
    #[instrument(skip(service))]
    pub fn new(service: S, config: SessionConfig, speed: Speed) -> Self {
        info!("Creating game session");
        Self {
            service,
            config,
            speed,
            state: None,
            phase: SessionPhase::Idle,
            log: GameLog::new(),
            headline: None,
            last_error: None,
            epoch: 0,
            pending: None,
            issued: 0,
        }
    }

    /// Returns true while a game is running.
    pub fn is_playing(&self) -> bool {
        self.phase.is_playing()
    }

    /// The autonomous move waiting to run, if any.
    pub fn pending_auto_move(&self) -> Option<AutoMoveTicket> {
        self.pending
    }

    /// Fetches the service's current state to resume or display it.
    ///
    /// A running game is resumed in the phase it is in; an agent turn waits
    /// for [`Self::retry_auto_move`]. A finished game is only shown and the
    /// session stays [`SessionPhase::Idle`]. Local settings are left alone.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<SessionPhase, SessionError> {
        info!("Loading current game state");
        let state = self
            .service
            .state()
            .await
            .map_err(|e| self.record_failure("load", e))?;

        if self.is_playing() {
            debug!("Ignoring snapshot while a game is running");
            return Ok(self.phase);
        }

        let phase = match SessionPhase::from_state(&state) {
            SessionPhase::GameOver(_) => SessionPhase::Idle,
            phase => {
                self.begin_epoch();
                self.headline = Some(format!(
                    "--- Resumed Game ({}x{}, {} to win) ---",
                    state.board_size, state.board_size, state.win_length
                ));
                phase
            }
        };
        debug!(?phase, "Loaded snapshot");
        self.phase = phase;
        self.state = Some(state);
        self.last_error = None;
        Ok(phase)
    }

    /// Starts a new game with the current settings.
    ///
    /// Any pending autonomous move from an earlier game is cancelled. If the
    /// service call fails the session is left idle.
    #[instrument(skip(self), fields(config = ?self.config))]
    pub async fn start(&mut self) -> Result<SessionPhase, SessionError> {
        info!("Starting new game");
        self.begin_epoch();

        let state = self
            .service
            .new_game(&self.config)
            .await
            .map_err(|e| self.record_failure("start", e))?;

        self.headline = Some(format!(
            "--- New Game ({}x{}, {} to win) ---",
            state.board_size, state.board_size, state.win_length
        ));
        Ok(self.install(state, self.speed.first_delay()))
    }

    /// Restarts the service's game with its current settings.
    #[instrument(skip(self))]
    pub async fn reset(&mut self) -> Result<SessionPhase, SessionError> {
        info!("Resetting game");
        self.begin_epoch();

        let state = self
            .service
            .reset()
            .await
            .map_err(|e| self.record_failure("reset", e))?;

        self.config = self.config.adopt(&state);
        self.headline = Some(format!(
            "--- Game Reset ({}x{}, {} to win) ---",
            state.board_size, state.board_size, state.win_length
        ));
        Ok(self.install(state, self.speed.first_delay()))
    }

    /// Sends a human move.
    ///
    /// Does nothing unless a human seat is to move and `position` is an
    /// empty cell.
    #[instrument(skip(self))]
    pub async fn submit_move(&mut self, position: usize) -> Result<SubmitOutcome, SessionError> {
        let Some(state) = &self.state else {
            return Ok(SubmitOutcome::Ignored(IgnoreReason::NoGame));
        };
        if state.game_over || matches!(self.phase, SessionPhase::GameOver(_)) {
            debug!("Move ignored: game over");
            return Ok(SubmitOutcome::Ignored(IgnoreReason::GameOver));
        }
        if self.phase != SessionPhase::AwaitingHuman || !state.current_seat().is_human {
            debug!(phase = ?self.phase, "Move ignored: not a human turn");
            return Ok(SubmitOutcome::Ignored(IgnoreReason::NotHumansTurn));
        }
        let Some(cell) = state.cell(position) else {
            debug!(cells = state.board.len(), "Move ignored: out of range");
            return Ok(SubmitOutcome::Ignored(IgnoreReason::OutOfRange));
        };
        if !cell.is_empty() {
            debug!("Move ignored: cell occupied");
            return Ok(SubmitOutcome::Ignored(IgnoreReason::CellOccupied));
        }

        let mover = state.current_player;
        let name = state.seat(mover).name.clone();
        let width = state.board_size;

        info!(mover = %mover, "Sending human move");
        let next = self
            .service
            .make_move(position)
            .await
            .map_err(|e| self.record_failure("move", e))?;

        // The service answers an illegal move with the unchanged state.
        if next.cell(position).and_then(|c| c.mark()) == Some(mover) {
            self.log.push(
                format!("{} ({}) → {}", name, mover, position_name(position, width)),
                LogCategory::for_mark(mover),
            );
        } else {
            warn!(mover = %mover, "Service did not apply the move");
        }

        let phase = self.install(next, self.speed.first_delay());
        Ok(SubmitOutcome::Applied(phase))
    }

    /// Asks the service to play the pending autonomous move.
    ///
    /// `ticket` must be the one returned by [`Self::pending_auto_move`];
    /// anything else is stale and ignored. On failure the session stays in
    /// [`SessionPhase::AwaitingAuto`] with nothing pending, see
    /// [`Self::retry_auto_move`].
    #[instrument(skip(self))]
    pub async fn auto_step(
        &mut self,
        ticket: AutoMoveTicket,
    ) -> Result<AutoStepOutcome, SessionError> {
        if self.pending != Some(ticket) || self.phase != SessionPhase::AwaitingAuto {
            debug!(pending = ?self.pending, "Ignoring stale autonomous move");
            return Ok(AutoStepOutcome::Stale);
        }
        self.pending = None;

        let Some(previous) = self.state.clone() else {
            return Ok(AutoStepOutcome::Stale);
        };
        let mover = previous.current_player;

        info!(mover = %mover, "Requesting autonomous move");
        let next = self
            .service
            .ai_move()
            .await
            .map_err(|e| self.record_failure("ai-move", e))?;

        match previous.placed_in(&next) {
            Some((position, mark)) => {
                let name = &next.seat(mark).name;
                let coord = position_name(position, next.board_size);
                let reason = next
                    .last_thoughts
                    .as_ref()
                    .filter(|thoughts| thoughts.chosen_move == position)
                    .and_then(|thoughts| thoughts.reason.as_deref())
                    .filter(|reason| !reason.is_empty());
                let message = match reason {
                    Some(reason) => format!("{} ({}) → {} ({})", name, mark, coord, reason),
                    None => format!("{} ({}) → {}", name, mark, coord),
                };
                self.log.push(message, LogCategory::for_mark(mark));
            }
            None => warn!(mover = %mover, "Service returned no new mark"),
        }

        let phase = self.install(next, self.speed.delay());
        Ok(AutoStepOutcome::Applied(phase))
    }

    /// Re-issues the autonomous move after a failed [`Self::auto_step`].
    ///
    /// Returns the pending ticket unchanged if one already exists.
    #[instrument(skip(self))]
    pub fn retry_auto_move(&mut self) -> Result<AutoMoveTicket, SessionError> {
        if self.phase != SessionPhase::AwaitingAuto {
            return Err(SessionError::new(SessionErrorKind::NotAwaitingAuto));
        }
        let ticket = match self.pending {
            Some(ticket) => ticket,
            None => self.issue_ticket(self.speed.delay()),
        };
        info!(?ticket, "Autonomous move scheduled");
        Ok(ticket)
    }

    /// Changes the board size of the next game.
    #[instrument(skip(self))]
    pub fn set_board_size(&mut self, board_size: usize) -> Result<(), SessionError> {
        self.edit_config(|config| config.with_board_size(board_size))
    }

    /// Changes the win length of the next game.
    #[instrument(skip(self))]
    pub fn set_win_length(&mut self, win_length: usize) -> Result<(), SessionError> {
        self.edit_config(|config| config.with_win_length(win_length))
    }

    /// Changes how many seats are human in the next game.
    #[instrument(skip(self))]
    pub fn set_human_players(&mut self, human_players: HumanPlayers) -> Result<(), SessionError> {
        self.edit_config(|config| config.with_human_players(human_players))
    }

    /// Changes the pace of autonomous moves.
    #[instrument(skip(self))]
    pub fn set_speed(&mut self, speed: Speed) -> Result<(), SessionError> {
        if self.is_playing() {
            return Err(SessionError::new(SessionErrorKind::ConfigLocked));
        }
        self.speed = speed;
        Ok(())
    }

    /// One-line description of whose turn it is or how the game ended.
    pub fn status_text(&self) -> String {
        let Some(state) = &self.state else {
            return "Press 's' to start a game".to_string();
        };
        match self.phase {
            SessionPhase::GameOver(_) => state.status.clone(),
            SessionPhase::AwaitingHuman => {
                format!("{}'s turn - pick a cell!", state.current_seat().name)
            }
            SessionPhase::AwaitingAuto if self.pending.is_none() => format!(
                "{} is stuck - press 'a' to retry",
                state.current_seat().name
            ),
            SessionPhase::AwaitingAuto => format!("{} is thinking...", state.current_seat().name),
            SessionPhase::Idle if state.game_over => {
                "Press 's' to start a game".to_string()
            }
            SessionPhase::Idle => state.status.clone(),
        }
    }

    fn edit_config(
        &mut self,
        edit: impl FnOnce(SessionConfig) -> SessionConfig,
    ) -> Result<(), SessionError> {
        if self.is_playing() {
            warn!("Rejected settings change while playing");
            return Err(SessionError::new(SessionErrorKind::ConfigLocked));
        }
        self.config = edit(self.config);
        debug!(config = ?self.config, "Settings changed");
        if let Some(state) = &self.state {
            self.state = Some(state.preview(&self.config));
        }
        self.phase = SessionPhase::Idle;
        Ok(())
    }

    /// Cancels whatever the previous game left behind.
    fn begin_epoch(&mut self) {
        self.epoch += 1;
        self.pending = None;
        self.phase = SessionPhase::Idle;
        self.headline = None;
        self.log.clear();
        debug!(epoch = self.epoch, "New session epoch");
    }

    /// Adopts a service response and decides what happens next.
    fn install(&mut self, state: GameState, auto_delay: Duration) -> SessionPhase {
        let phase = SessionPhase::from_state(&state);
        debug!(?phase, status = %state.status, "Installing game state");

        self.pending = None;
        if phase == SessionPhase::AwaitingAuto {
            self.issue_ticket(auto_delay);
        }

        if let SessionPhase::GameOver(outcome) = phase {
            let message = match outcome {
                Outcome::Winner(_) => format!("🏆 {}", state.status),
                Outcome::Draw => format!("🤝 {}", state.status),
            };
            info!(%outcome, "Game over");
            self.log.push(message, LogCategory::for_outcome(outcome));
        }

        self.phase = phase;
        self.state = Some(state);
        self.last_error = None;
        phase
    }

    fn issue_ticket(&mut self, delay: Duration) -> AutoMoveTicket {
        self.issued += 1;
        let ticket = AutoMoveTicket::new(self.epoch, self.issued, delay);
        self.pending = Some(ticket);
        ticket
    }

    fn record_failure(&mut self, operation: &'static str, err: ServiceError) -> SessionError {
        warn!(operation, error = %err, "Service call failed");
        self.last_error = Some(err.message.clone());
        SessionError::from(err)
    }
}
