//! Tests for the terminal front end state, without a terminal.

mod support;

use crossterm::event::KeyCode;
use support::{ScriptedService, game};
use tictactoe_arena::{
    Action, App, Direction, GameSession, HumanPlayers, Mark, SessionConfig, SessionPhase,
    SettingField, Speed, action_for_key,
};
use tokio::time::{Instant, advance};

fn app(service: ScriptedService, config: SessionConfig) -> App<ScriptedService> {
    App::new(GameSession::new(service, config, Speed::Normal))
}

#[test]
fn test_key_bindings() {
    assert_eq!(action_for_key(KeyCode::Char('s')), Some(Action::Start));
    assert_eq!(action_for_key(KeyCode::Enter), Some(Action::Place));
    assert_eq!(
        action_for_key(KeyCode::Left),
        Some(Action::Cursor(Direction::Left))
    );
    assert_eq!(action_for_key(KeyCode::Tab), Some(Action::NextField));
    assert_eq!(action_for_key(KeyCode::Char('+')), Some(Action::Increase));
    assert_eq!(action_for_key(KeyCode::Char('z')), None);
}

#[tokio::test]
async fn test_cursor_stops_at_board_edge() {
    let mut app = app(ScriptedService::new(), SessionConfig::default());

    app.handle_action(Action::Cursor(Direction::Right)).await;
    app.handle_action(Action::Cursor(Direction::Right)).await;
    app.handle_action(Action::Cursor(Direction::Right)).await;
    assert_eq!(*app.cursor(), 2);

    app.handle_action(Action::Cursor(Direction::Down)).await;
    assert_eq!(*app.cursor(), 5);

    app.handle_action(Action::Cursor(Direction::Up)).await;
    app.handle_action(Action::Cursor(Direction::Up)).await;
    assert_eq!(*app.cursor(), 2);
}

#[tokio::test]
async fn test_settings_edit_while_idle() {
    let mut app = app(ScriptedService::new(), SessionConfig::default());

    app.handle_action(Action::NextField).await;
    assert_eq!(*app.field(), SettingField::BoardSize);
    app.handle_action(Action::Increase).await;
    app.handle_action(Action::Increase).await;

    assert_eq!(*app.session().config().board_size(), 5);
    assert_eq!(app.board_width(), 5);
    assert_eq!(app.notice(), &None);
}

#[tokio::test]
async fn test_settings_edit_while_playing_shows_notice() {
    let service = ScriptedService::new().then_ok(game("...|...|...", Mark::X, (true, true)));
    let mut app = app(service, SessionConfig::new(3, 3, HumanPlayers::Two));
    app.handle_action(Action::Start).await;

    app.handle_action(Action::Increase).await;

    assert_eq!(*app.session().config().human_players(), HumanPlayers::Two);
    assert!(app.notice().is_some());
}

#[tokio::test]
async fn test_place_on_occupied_cell_shows_notice() {
    let service = ScriptedService::new().then_ok(game("X..|...|...", Mark::O, (true, true)));
    let mut app = app(service, SessionConfig::new(3, 3, HumanPlayers::Two));
    app.handle_action(Action::Start).await;

    app.handle_action(Action::Place).await;

    assert!(app.notice().as_deref().is_some_and(|n| n.contains("already taken")));
    assert_eq!(app.session().service().calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_agent_move_runs_once_due() {
    let agents = (false, false);
    let service = ScriptedService::new()
        .then_ok(game("...|...|...", Mark::X, agents))
        .then_ok(game("....X....", Mark::O, agents));
    let mut app = app(service, SessionConfig::default());
    app.handle_action(Action::Start).await;
    assert_eq!(app.session().phase(), &SessionPhase::AwaitingAuto);

    assert_eq!(app.due_auto_move(Instant::now()), None);

    advance(Speed::Normal.first_delay()).await;
    let ticket = app.due_auto_move(Instant::now()).unwrap();
    app.run_auto_move(ticket).await;

    assert_eq!(app.session().log().len(), 1);
    assert_eq!(app.due_auto_move(Instant::now()), None);

    advance(Speed::Normal.delay()).await;
    assert!(app.due_auto_move(Instant::now()).is_some());
}

#[tokio::test]
async fn test_quit() {
    let mut app = app(ScriptedService::new(), SessionConfig::default());

    app.handle_action(Action::Quit).await;

    assert!(*app.should_quit());
}
