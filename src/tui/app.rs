//! Application state for the terminal front end.

use derive_getters::Getters;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::input::{Action, move_cursor};
use crate::client::GameService;
use crate::config::{MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::session::{AutoMoveTicket, GameSession, SessionPhase, SubmitOutcome};

/// Settings field selected with Tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumIter)]
pub enum SettingField {
    /// Number of human seats.
    #[default]
    HumanPlayers,
    /// Board width.
    BoardSize,
    /// Marks in a row to win.
    WinLength,
    /// Pace of agent moves.
    Speed,
}

impl SettingField {
    /// Returns the display label for this field.
    pub fn label(self) -> &'static str {
        match self {
            Self::HumanPlayers => "Human Players",
            Self::BoardSize => "Board Size",
            Self::WinLength => "Win Length",
            Self::Speed => "AI Speed",
        }
    }

    /// Next field, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::HumanPlayers => Self::BoardSize,
            Self::BoardSize => Self::WinLength,
            Self::WinLength => Self::Speed,
            Self::Speed => Self::HumanPlayers,
        }
    }

    /// Previous field, wrapping around.
    pub fn prev(self) -> Self {
        match self {
            Self::HumanPlayers => Self::Speed,
            Self::BoardSize => Self::HumanPlayers,
            Self::WinLength => Self::BoardSize,
            Self::Speed => Self::WinLength,
        }
    }
}

/// Main application state.
#[derive(Debug, Getters)]
pub struct App<S> {
    session: GameSession<S>,
    cursor: usize,
    field: SettingField,
    /// Short feedback for rejected input.
    notice: Option<String>,
    should_quit: bool,
    #[getter(skip)]
    scheduled: Option<(AutoMoveTicket, Instant)>,
}

impl<S: GameService> App<S> {
    /// Creates a new application around a session.
    pub fn new(session: GameSession<S>) -> Self {
        Self {
            session,
            cursor: 0,
            field: SettingField::default(),
            notice: None,
            should_quit: false,
            scheduled: None,
        }
    }

    /// Width of the board currently shown.
    pub fn board_width(&self) -> usize {
        self.session
            .state()
            .as_ref()
            .map(|state| state.board_size)
            .unwrap_or(*self.session.config().board_size())
    }

    /// Returns the autonomous move whose delay has elapsed, if any.
    pub fn due_auto_move(&mut self, now: Instant) -> Option<AutoMoveTicket> {
        self.sync_schedule(now);
        match self.scheduled {
            Some((ticket, due)) if now >= due => Some(ticket),
            _ => None,
        }
    }

    /// Runs a due autonomous move.
    #[instrument(skip(self))]
    pub async fn run_auto_move(&mut self, ticket: AutoMoveTicket) {
        self.scheduled = None;
        if let Err(e) = self.session.auto_step(ticket).await {
            warn!(error = %e, "Autonomous move failed");
        }
        self.sync_schedule(Instant::now());
    }

    /// Applies a user action.
    #[instrument(skip(self))]
    pub async fn handle_action(&mut self, action: Action) {
        debug!(?action, "Handling action");
        self.notice = None;

        match action {
            Action::Quit => {
                info!("User quit");
                self.should_quit = true;
            }
            Action::Cursor(direction) => {
                self.cursor = move_cursor(self.cursor, self.board_width(), direction);
            }
            Action::Place => match self.session.submit_move(self.cursor).await {
                Ok(SubmitOutcome::Applied(phase)) => debug!(?phase, "Move applied"),
                Ok(SubmitOutcome::Ignored(reason)) => {
                    if self.session.phase() == &SessionPhase::AwaitingHuman {
                        self.notice = Some(format!("Can't play there: {}", reason));
                    }
                }
                Err(e) => warn!(error = %e, "Move failed"),
            },
            Action::Start => {
                if let Err(e) = self.session.start().await {
                    warn!(error = %e, "Failed to start game");
                }
                self.clamp_cursor();
            }
            Action::Reset => {
                if let Err(e) = self.session.reset().await {
                    warn!(error = %e, "Failed to reset game");
                }
                self.clamp_cursor();
            }
            Action::RetryAuto => {
                if let Err(e) = self.session.retry_auto_move() {
                    self.notice = Some(e.kind.to_string());
                }
            }
            Action::NextField => self.field = self.field.next(),
            Action::PrevField => self.field = self.field.prev(),
            Action::Increase => self.adjust_setting(true),
            Action::Decrease => self.adjust_setting(false),
        }

        self.sync_schedule(Instant::now());
    }

    fn adjust_setting(&mut self, increase: bool) {
        let config = *self.session.config();
        let result = match self.field {
            SettingField::HumanPlayers => {
                let current = *config.human_players();
                let next = if increase { current.next() } else { current.prev() };
                self.session.set_human_players(next)
            }
            SettingField::BoardSize => {
                let size = *config.board_size();
                let size = if increase {
                    (size + 1).min(MAX_BOARD_SIZE)
                } else {
                    size.saturating_sub(1).max(MIN_BOARD_SIZE)
                };
                self.session.set_board_size(size)
            }
            SettingField::WinLength => {
                let length = *config.win_length();
                let length = if increase {
                    length + 1
                } else {
                    length.saturating_sub(1)
                };
                self.session.set_win_length(length)
            }
            SettingField::Speed => {
                let speed = *self.session.speed();
                let speed = if increase { speed.next() } else { speed.prev() };
                self.session.set_speed(speed)
            }
        };

        match result {
            Ok(()) => self.clamp_cursor(),
            Err(e) => self.notice = Some(e.kind.to_string()),
        }
    }

    fn clamp_cursor(&mut self) {
        let width = self.board_width();
        if self.cursor >= width * width {
            self.cursor = 0;
        }
    }

    /// Tracks the session's pending ticket and when it becomes due.
    fn sync_schedule(&mut self, now: Instant) {
        let pending = self.session.pending_auto_move();
        match (pending, self.scheduled) {
            (Some(ticket), Some((scheduled, _))) if ticket == scheduled => {}
            (Some(ticket), _) => {
                debug!(?ticket, "Scheduling autonomous move");
                self.scheduled = Some((ticket, now + *ticket.delay()));
            }
            (None, _) => self.scheduled = None,
        }
    }
}
