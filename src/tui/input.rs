//! Key bindings and cursor movement.

use crossterm::event::KeyCode;

/// Cursor direction on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// One row up.
    Up,
    /// One row down.
    Down,
    /// One column left.
    Left,
    /// One column right.
    Right,
}

/// Something the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move the board cursor.
    Cursor(Direction),
    /// Place a mark under the cursor.
    Place,
    /// Start a new game.
    Start,
    /// Reset the service's game.
    Reset,
    /// Re-issue a failed autonomous move.
    RetryAuto,
    /// Select the next settings field.
    NextField,
    /// Select the previous settings field.
    PrevField,
    /// Increase the selected setting.
    Increase,
    /// Decrease the selected setting.
    Decrease,
    /// Leave the application.
    Quit,
}

/// Maps a key to an action.
pub fn action_for_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Up => Some(Action::Cursor(Direction::Up)),
        KeyCode::Down => Some(Action::Cursor(Direction::Down)),
        KeyCode::Left => Some(Action::Cursor(Direction::Left)),
        KeyCode::Right => Some(Action::Cursor(Direction::Right)),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Place),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::Start),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Reset),
        KeyCode::Char('a') | KeyCode::Char('A') => Some(Action::RetryAuto),
        KeyCode::Tab => Some(Action::NextField),
        KeyCode::BackTab => Some(Action::PrevField),
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char(']') => Some(Action::Increase),
        KeyCode::Char('-') | KeyCode::Char('_') | KeyCode::Char('[') => Some(Action::Decrease),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

/// Moves the cursor one cell on a `width`×`width` board.
///
/// The cursor stops at the edges.
pub fn move_cursor(cursor: usize, width: usize, direction: Direction) -> usize {
    let width = width.max(1);
    let (row, col) = (cursor / width, cursor % width);
    let (row, col) = match direction {
        Direction::Up => (row.saturating_sub(1), col),
        Direction::Down => ((row + 1).min(width - 1), col),
        Direction::Left => (row, col.saturating_sub(1)),
        Direction::Right => (row, (col + 1).min(width - 1)),
    };
    row * width + col
}
