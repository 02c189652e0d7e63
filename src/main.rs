//! Tic Tac Toe Arena - Unified CLI
//!
//! Interactive and headless clients for a remote tic-tac-toe service.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command, ConnectionArgs, SessionArgs};
use tictactoe_arena::{
    Cell, ClientConfig, GameService, GameSession, GameState, HttpGameClient, HumanPlayers,
    SessionConfig, SessionPhase, position_name, run_autonomous, run_tui,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Tui {
            connection,
            session,
        } => {
            let (config, session_config) = resolve_config(&connection, &session)?;
            run_tui(config, session_config).await
        }
        Command::State { connection, json } => {
            init_cli_tracing();
            run_state(&connection, json).await
        }
        Command::Watch {
            connection,
            session,
        } => {
            init_cli_tracing();
            run_watch(&connection, &session).await
        }
        Command::Reset { connection } => {
            init_cli_tracing();
            run_reset(&connection).await
        }
    }
}

fn init_cli_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,tictactoe_arena=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Merges the config file with command-line overrides.
#[instrument]
fn resolve_config(
    connection: &ConnectionArgs,
    session: &SessionArgs,
) -> Result<(ClientConfig, SessionConfig)> {
    let mut config = ClientConfig::load_or_default(&connection.config)?;

    if let Some(url) = &connection.server_url {
        info!(url = %url, "Overriding server URL");
        config = config.with_server_url(url.clone());
    }
    if let Some(speed) = session.speed {
        config = config.with_speed(speed);
    }

    let mut session_config = config.session_config();
    if let Some(size) = session.board_size {
        session_config = session_config.with_board_size(size);
    }
    if let Some(length) = session.win_length {
        session_config = session_config.with_win_length(length);
    }
    if let Some(humans) = session.humans {
        let humans = HumanPlayers::try_from(humans).map_err(anyhow::Error::msg)?;
        session_config = session_config.with_human_players(humans);
    }

    Ok((config, session_config))
}

fn connect(config: &ClientConfig) -> Result<HttpGameClient> {
    Ok(HttpGameClient::new(
        config.server_url(),
        config.request_timeout(),
    )?)
}

/// Prints the current snapshot.
#[instrument(skip(connection))]
async fn run_state(connection: &ConnectionArgs, json: bool) -> Result<()> {
    let (config, _) = resolve_config(connection, &SessionArgs::default())?;
    let state = connect(&config)?.state().await?;
    print_state(&state, json)
}

/// Resets the service's game and prints the result.
#[instrument(skip(connection))]
async fn run_reset(connection: &ConnectionArgs) -> Result<()> {
    let (config, _) = resolve_config(connection, &SessionArgs::default())?;
    let state = connect(&config)?.reset().await?;
    print_state(&state, false)
}

/// Plays a game headlessly, printing each log entry as it appears.
#[instrument(skip_all)]
async fn run_watch(connection: &ConnectionArgs, session_args: &SessionArgs) -> Result<()> {
    let (config, session_config) = resolve_config(connection, session_args)?;
    let mut session = GameSession::new(connect(&config)?, session_config, *config.speed());

    session.start().await?;
    if let Some(headline) = session.headline() {
        println!("{}", headline);
    }

    let mut printed = 0;
    let steps = run_autonomous(&mut session, |session| {
        printed = print_new_entries(session, printed);
    })
    .await?;
    info!(steps, "Watch finished");

    if let Some(state) = session.state() {
        println!();
        print_state(state, false)?;
    }
    if session.phase() == &SessionPhase::AwaitingHuman {
        println!("A human seat is to move; use `tictactoe_arena tui` to play it.");
    }
    Ok(())
}

/// Prints entries newer than `last_id` oldest first and returns the newest id.
fn print_new_entries<S: GameService>(session: &GameSession<S>, last_id: i64) -> i64 {
    let mut newest = last_id;
    for entry in session
        .log()
        .entries()
        .rev()
        .filter(|entry| *entry.id() > last_id)
    {
        println!("{}", entry.message());
        newest = *entry.id();
    }
    newest
}

fn print_state(state: &GameState, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(state)?);
        return Ok(());
    }

    let width = state.board_size.max(1);
    for (index, cell) in state.board.iter().enumerate() {
        let symbol = match cell {
            Cell::Empty => ".".to_string(),
            Cell::Marked(mark) => mark.to_string(),
        };
        print!("{} ", symbol);
        if index % width == width - 1 {
            println!();
        }
    }
    println!(
        "{}x{} board, {} in a row | X: {} | O: {}",
        state.board_size,
        state.board_size,
        state.win_length,
        state.player_x.name,
        state.player_o.name
    );
    if let Some(thoughts) = &state.last_thoughts {
        println!(
            "Last agent move: {} {}",
            position_name(thoughts.chosen_move, width),
            thoughts.reason.as_deref().unwrap_or_default()
        );
    }
    println!("Status: {}", state.status);
    Ok(())
}
