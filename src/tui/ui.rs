//! Stateless UI rendering.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use super::app::{App, SettingField};
use crate::client::GameService;
use crate::log::LogCategory;
use crate::model::{Cell, GameState, Mark, ThoughtKind};
use crate::session::SessionPhase;

/// Renders the whole screen.
pub fn draw<S: GameService>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(8), // Seat cards
            Constraint::Length(3), // Settings
            Constraint::Length(3), // Status
            Constraint::Min(8),    // Board + log
            Constraint::Length(1), // Help
        ])
        .split(area);

    let title = Paragraph::new("Tic Tac Toe Arena")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    draw_seats(frame, chunks[1], app);
    draw_settings(frame, chunks[2], app);
    draw_status(frame, chunks[3], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(48)])
        .split(chunks[4]);
    draw_board(frame, body[0], app);
    draw_log(frame, body[1], app);

    let help = Paragraph::new(
        "←↑↓→ move | Enter place | s start | r reset | a retry | Tab/+/- settings | q quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    frame.render_widget(help, chunks[5]);
}

fn mark_color(mark: Mark) -> Color {
    match mark {
        Mark::X => Color::Blue,
        Mark::O => Color::Red,
    }
}

fn draw_seats<S: GameService>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let state = app.session().state().as_ref();
    draw_seat(frame, cols[0], state, Mark::X);
    draw_seat(frame, cols[1], state, Mark::O);
}

fn draw_seat(frame: &mut Frame, area: Rect, state: Option<&GameState>, mark: Mark) {
    let Some(state) = state else {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{} - waiting for service", mark));
        frame.render_widget(Paragraph::new("Waiting...").block(block), area);
        return;
    };

    let seat = state.seat(mark);
    let active = !state.game_over && state.current_player == mark;
    let kind = if seat.is_human { "Human" } else { "Agent" };

    let mut lines = vec![
        Line::from(Span::styled(
            seat.description.clone(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];

    // Thoughts belong to whichever seat placed the chosen cell.
    let thoughts = state.last_thoughts.as_ref().filter(|thoughts| {
        state.cell(thoughts.chosen_move).and_then(Cell::mark) == Some(mark)
    });
    match thoughts {
        Some(thoughts) if !active => {
            for thought in &thoughts.thoughts {
                let color = match thought.kind {
                    ThoughtKind::Win => Color::Green,
                    ThoughtKind::Block => Color::Red,
                    ThoughtKind::Strategy => Color::Cyan,
                    ThoughtKind::Plain => Color::Gray,
                };
                lines.push(Line::from(Span::styled(
                    thought.text.clone(),
                    Style::default().fg(color),
                )));
            }
        }
        _ if seat.is_human && active => {
            lines.push(Line::from(Span::styled(
                "Your turn - pick a cell!",
                Style::default().fg(Color::Cyan),
            )));
        }
        _ => lines.push(Line::from("Waiting...")),
    }

    let mut border = Style::default().fg(mark_color(mark));
    if active {
        border = border.add_modifier(Modifier::BOLD);
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!("{} - {} ({})", mark, seat.name, kind));

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_settings<S: GameService>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let session = app.session();
    let config = session.config();
    let locked = session.is_playing();

    let values = [
        (SettingField::HumanPlayers, config.human_players().label().to_string()),
        (SettingField::BoardSize, format!("{0}x{0}", config.board_size())),
        (SettingField::WinLength, config.win_length().to_string()),
        (SettingField::Speed, session.speed().to_string()),
    ];

    let mut spans = Vec::new();
    for (i, (field, value)) in values.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" | "));
        }
        let style = if locked {
            Style::default().fg(Color::DarkGray)
        } else if field == *app.field() {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!("{}: {}", field.label(), value), style));
    }

    let title = if locked { "Settings (locked)" } else { "Settings" };
    let paragraph = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}

fn draw_status<S: GameService>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let session = app.session();

    let (text, color) = match (session.last_error(), app.notice()) {
        (Some(error), _) => (format!("Service error: {}", error), Color::Red),
        (None, Some(notice)) => (notice.clone(), Color::Magenta),
        (None, None) => {
            let color = match session.phase() {
                SessionPhase::GameOver(outcome) if outcome.is_draw() => Color::Gray,
                SessionPhase::GameOver(_) => Color::Green,
                _ => Color::Yellow,
            };
            (session.status_text(), color)
        }
    };

    let config = session.config();
    let block = Block::default().borders(Borders::ALL).title(format!(
        "{0}x{0} board - {1} in a row to win",
        config.board_size(),
        config.win_length()
    ));
    let status = Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(status, area);
}

fn draw_board<S: GameService>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let session = app.session();
    let width = app.board_width();
    let clickable = session.phase() == &SessionPhase::AwaitingHuman;

    let empty;
    let cells: &[Cell] = match session.state() {
        Some(state) => &state.board,
        None => {
            empty = vec![Cell::Empty; width * width];
            &empty
        }
    };

    let separator = vec!["───"; width].join("┼");
    let mut lines = Vec::with_capacity(width * 2);
    for row in 0..width {
        if row > 0 {
            lines.push(Line::from(Span::styled(
                separator.clone(),
                Style::default().fg(Color::DarkGray),
            )));
        }
        let mut spans = Vec::with_capacity(width * 2);
        for col in 0..width {
            if col > 0 {
                spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
            }
            let index = row * width + col;
            let cell = cells.get(index).copied().unwrap_or_default();
            let winning = session
                .state()
                .as_ref()
                .is_some_and(|state| state.is_winning_cell(index));

            let (symbol, mut style) = match cell {
                Cell::Empty if clickable => (" · ".to_string(), Style::default().fg(Color::DarkGray)),
                Cell::Empty => ("   ".to_string(), Style::default()),
                Cell::Marked(mark) => (
                    format!(" {} ", mark),
                    Style::default()
                        .fg(mark_color(mark))
                        .add_modifier(Modifier::BOLD),
                ),
            };
            if winning {
                style = style.bg(Color::Green).fg(Color::Black);
            }
            if clickable && index == *app.cursor() {
                style = style.bg(Color::White).fg(Color::Black);
            }
            spans.push(Span::styled(symbol, style));
        }
        lines.push(Line::from(spans));
    }

    let board = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Board"));
    frame.render_widget(board, area);
}

fn draw_log<S: GameService>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let session = app.session();

    let items: Vec<ListItem> = session
        .log()
        .entries()
        .map(|entry| {
            let style = match entry.category() {
                LogCategory::XMove => Style::default().fg(mark_color(Mark::X)),
                LogCategory::OMove => Style::default().fg(mark_color(Mark::O)),
                LogCategory::Win => Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
                LogCategory::Draw => Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::BOLD),
            };
            ListItem::new(Line::from(Span::styled(entry.message().clone(), style)))
        })
        .collect();

    let title = session
        .headline()
        .clone()
        .unwrap_or_else(|| "Game Log".to_string());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}
