//! Terminal front end.

mod app;
mod input;
mod ui;

pub use app::{App, SettingField};
pub use input::{Action, Direction, action_for_key, move_cursor};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, instrument, warn};

use crate::client::{GameService, HttpGameClient};
use crate::config::{ClientConfig, SessionConfig};
use crate::session::GameSession;

/// Log file used while the terminal is in raw mode.
pub const TUI_LOG_FILE: &str = "tictactoe_arena.log";

/// Runs the interactive client until the user quits.
#[instrument(skip_all, fields(server_url = %config.server_url()))]
pub async fn run_tui(config: ClientConfig, session_config: SessionConfig) -> Result<()> {
    // Setup logging to file to avoid interfering with TUI
    let log_file = std::fs::File::create(TUI_LOG_FILE)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tictactoe_arena=debug")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!("Starting Tic Tac Toe Arena TUI");

    let client = HttpGameClient::new(config.server_url(), config.request_timeout())?;
    let mut session = GameSession::new(client, session_config, *config.speed());

    // Best effort: resume or show whatever the service is holding.
    if let Err(e) = session.load().await {
        warn!(error = %e, "Could not load current game state");
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, App::new(session)).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "TUI loop error");
    }
    res
}

/// Event loop: draw, run due autonomous moves, handle keys.
async fn run_app<S: GameService>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App<S>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        if *app.should_quit() {
            return Ok(());
        }

        if let Some(ticket) = app.due_auto_move(Instant::now()) {
            app.run_auto_move(ticket).await;
            continue;
        }

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
        {
            // Skip key release events (crossterm fires both press and release).
            if key.kind == KeyEventKind::Release {
                continue;
            }
            if let Some(action) = action_for_key(key.code) {
                app.handle_action(action).await;
            }
        }
    }
}
