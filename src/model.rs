//! Wire types mirrored from the game service.
//!
//! The service owns every field here. The client replaces its copy of
//! [`GameState`] wholesale on each response and never re-derives rules
//! from it, apart from the "cell already filled" pre-check.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::config::SessionConfig;

/// One of the two seat symbols.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum Mark {
    /// First seat; always moves first.
    X,
    /// Second seat.
    O,
}

impl Mark {
    /// Returns the other seat's mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A single board cell.
///
/// The service encodes empty cells as `""`; `null` is accepted as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Option<String>", into = "String")]
pub enum Cell {
    /// No mark placed yet.
    #[default]
    Empty,
    /// Occupied by a seat.
    Marked(Mark),
}

impl Cell {
    /// Returns true if no mark has been placed.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Marked(mark) => Some(mark),
        }
    }
}

impl TryFrom<Option<String>> for Cell {
    type Error = String;

    fn try_from(value: Option<String>) -> Result<Self, Self::Error> {
        match value.as_deref().map(str::trim) {
            None | Some("") => Ok(Cell::Empty),
            Some("X") | Some("x") => Ok(Cell::Marked(Mark::X)),
            Some("O") | Some("o") => Ok(Cell::Marked(Mark::O)),
            Some(other) => Err(format!("unknown cell mark {:?}", other)),
        }
    }
}

impl From<Cell> for String {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => String::new(),
            Cell::Marked(mark) => mark.to_string(),
        }
    }
}

/// How a seat is played, as announced by the service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeatConfig {
    /// True for a human seat, false for an autonomous agent.
    #[serde(rename = "human", alias = "isHuman", default)]
    pub is_human: bool,
    /// Display name ("You", "Strategic Agent", ...).
    #[serde(default)]
    pub name: String,
    /// One-line description of the seat.
    #[serde(default)]
    pub description: String,
}

/// Category of a single rationale fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum ThoughtKind {
    /// Untagged analysis step.
    #[default]
    Plain,
    /// The agent found a winning move.
    Win,
    /// The agent is blocking a threat.
    Block,
    /// Positional reasoning (forks, centre, corners).
    Strategy,
}

impl From<Option<String>> for ThoughtKind {
    fn from(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("win") => ThoughtKind::Win,
            Some("block") => ThoughtKind::Block,
            Some("strategy") => ThoughtKind::Strategy,
            _ => ThoughtKind::Plain,
        }
    }
}

impl From<ThoughtKind> for String {
    fn from(kind: ThoughtKind) -> Self {
        match kind {
            ThoughtKind::Plain => String::new(),
            ThoughtKind::Win => "win".to_string(),
            ThoughtKind::Block => "block".to_string(),
            ThoughtKind::Strategy => "strategy".to_string(),
        }
    }
}

/// One rationale fragment from the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thought {
    /// Fragment text.
    #[serde(default)]
    pub text: String,
    /// Fragment category.
    #[serde(rename = "type", default)]
    pub kind: ThoughtKind,
}

/// The agent's explanation of its last move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentThoughts {
    /// Rationale fragments in the order they were produced.
    #[serde(default)]
    pub thoughts: Vec<Thought>,
    /// Flat index of the chosen cell.
    pub chosen_move: usize,
    /// Short headline for the move ("WINNING MOVE", "BLOCKING THREAT", ...).
    #[serde(default)]
    pub reason: Option<String>,
}

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// A seat completed a winning line.
    Winner(Mark),
    /// No winner.
    Draw,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Winner(mark) => Some(*mark),
            Outcome::Draw => None,
        }
    }

    /// Returns true if the game was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Winner(mark) => write!(f, "{} wins", mark),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Authoritative game snapshot returned by every service endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Cells in row-major order, `board_size²` long.
    pub board: Vec<Cell>,
    /// Board width (and height).
    pub board_size: usize,
    /// Marks in a row needed to win.
    pub win_length: usize,
    /// Seat to move next.
    pub current_player: Mark,
    /// Seat X configuration.
    #[serde(default)]
    pub player_x: SeatConfig,
    /// Seat O configuration.
    #[serde(default)]
    pub player_o: SeatConfig,
    /// True once the game has ended.
    #[serde(default)]
    pub game_over: bool,
    /// Winning seat, absent on a draw or while playing.
    #[serde(default)]
    pub winner: Option<Mark>,
    /// Cells of the winning line.
    #[serde(default, deserialize_with = "deserialize_winning_pattern")]
    pub winning_pattern: Option<Vec<usize>>,
    /// Explanation of the last autonomous move.
    #[serde(default)]
    pub last_thoughts: Option<AgentThoughts>,
    /// Human-readable status text.
    #[serde(default)]
    pub status: String,
    /// Number of human seats the service configured, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_players: Option<u8>,
}

impl GameState {
    /// Returns the configuration of the given seat.
    pub fn seat(&self, mark: Mark) -> &SeatConfig {
        match mark {
            Mark::X => &self.player_x,
            Mark::O => &self.player_o,
        }
    }

    /// Returns the configuration of the seat to move.
    pub fn current_seat(&self) -> &SeatConfig {
        self.seat(self.current_player)
    }

    /// Returns the cell at `position`, or `None` when out of range.
    pub fn cell(&self, position: usize) -> Option<Cell> {
        self.board.get(position).copied()
    }

    /// Returns true if `position` is part of the winning line.
    pub fn is_winning_cell(&self, position: usize) -> bool {
        self.winning_pattern
            .as_ref()
            .is_some_and(|pattern| pattern.contains(&position))
    }

    /// Returns the outcome once the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.game_over {
            return None;
        }
        Some(match self.winner {
            Some(mark) => Outcome::Winner(mark),
            None => Outcome::Draw,
        })
    }

    /// Returns the first cell that is empty here and marked in `next`.
    pub fn placed_in(&self, next: &GameState) -> Option<(usize, Mark)> {
        self.board
            .iter()
            .zip(next.board.iter())
            .enumerate()
            .find_map(|(index, (before, after))| match (before, after) {
                (Cell::Empty, Cell::Marked(mark)) => Some((index, *mark)),
                _ => None,
            })
    }

    /// Builds an empty, non-playable board for previewing `config`.
    ///
    /// Seat cards and status are kept so the preview still shows who
    /// played last.
    pub fn preview(&self, config: &SessionConfig) -> GameState {
        let size = *config.board_size();
        GameState {
            board: vec![Cell::Empty; size * size],
            board_size: size,
            win_length: *config.win_length(),
            game_over: true,
            winner: None,
            winning_pattern: None,
            ..self.clone()
        }
    }
}

/// Accepts `[[0],[4],[8]]` (the service's shape) as well as `[0,4,8]`.
fn deserialize_winning_pattern<'de, D>(deserializer: D) -> Result<Option<Vec<usize>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PatternCell {
        Flat(usize),
        Nested(Vec<usize>),
    }

    let raw: Option<Vec<PatternCell>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|cells| {
        cells
            .into_iter()
            .filter_map(|cell| match cell {
                PatternCell::Flat(index) => Some(index),
                PatternCell::Nested(inner) => inner.first().copied(),
            })
            .collect()
    }))
}
