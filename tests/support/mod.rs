//! Scripted game service and state builders shared by integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use tictactoe_arena::{
    AgentThoughts, Cell, GameService, GameState, Mark, SeatConfig, ServiceError,
    ServiceErrorKind, SessionConfig,
};
use tokio::time::Instant;

/// A request the session made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    State,
    NewGame(SessionConfig),
    Move(usize),
    AiMove,
    Reset,
}

/// Answers requests from a queue, in order, and records every call.
#[derive(Debug, Default)]
pub struct ScriptedService {
    responses: Mutex<VecDeque<Result<GameState, ServiceError>>>,
    calls: Mutex<Vec<(Call, Instant)>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response.
    pub fn then_ok(self, state: GameState) -> Self {
        self.responses.lock().unwrap().push_back(Ok(state));
        self
    }

    /// Queues a transport failure.
    pub fn then_fail(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(ServiceError::new(ServiceErrorKind::Transport, message)));
        self
    }

    /// Queues more responses on a service the session already owns.
    pub fn push_ok(&self, state: GameState) {
        self.responses.lock().unwrap().push_back(Ok(state));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().iter().map(|(call, _)| *call).collect()
    }

    /// When each `ai-move` request arrived.
    pub fn ai_move_times(&self) -> Vec<Instant> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(call, _)| *call == Call::AiMove)
            .map(|(_, at)| *at)
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    fn answer(&self, call: Call) -> Result<GameState, ServiceError> {
        self.calls.lock().unwrap().push((call, Instant::now()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ServiceError::new(
                    ServiceErrorKind::Transport,
                    format!("no scripted response for {:?}", call),
                ))
            })
    }
}

#[async_trait::async_trait]
impl GameService for ScriptedService {
    async fn state(&self) -> Result<GameState, ServiceError> {
        self.answer(Call::State)
    }

    async fn new_game(&self, config: &SessionConfig) -> Result<GameState, ServiceError> {
        self.answer(Call::NewGame(*config))
    }

    async fn make_move(&self, position: usize) -> Result<GameState, ServiceError> {
        self.answer(Call::Move(position))
    }

    async fn ai_move(&self) -> Result<GameState, ServiceError> {
        self.answer(Call::AiMove)
    }

    async fn reset(&self) -> Result<GameState, ServiceError> {
        self.answer(Call::Reset)
    }
}

fn seat(is_human: bool, mark: Mark) -> SeatConfig {
    SeatConfig {
        is_human,
        name: if is_human {
            format!("Player {}", mark)
        } else {
            format!("Agent {}", mark)
        },
        description: String::new(),
    }
}

/// Builds a running game from a row-major picture like `"X.O|...|..."`.
///
/// `.` is empty; `|` is ignored. The width is the square root of the
/// cell count.
pub fn game(picture: &str, current: Mark, humans: (bool, bool)) -> GameState {
    let board: Vec<Cell> = picture
        .chars()
        .filter(|c| *c != '|')
        .map(|c| match c {
            'X' => Cell::Marked(Mark::X),
            'O' => Cell::Marked(Mark::O),
            _ => Cell::Empty,
        })
        .collect();
    let board_size = (board.len() as f64).sqrt() as usize;
    let player_x = seat(humans.0, Mark::X);
    let player_o = seat(humans.1, Mark::O);
    let status = match current {
        Mark::X => format!("{}'s turn (X)", player_x.name),
        Mark::O => format!("{}'s turn (O)", player_o.name),
    };
    GameState {
        board,
        board_size,
        win_length: 3,
        current_player: current,
        player_x,
        player_o,
        game_over: false,
        winner: None,
        winning_pattern: None,
        last_thoughts: None,
        status,
        human_players: Some(humans.0 as u8 + humans.1 as u8),
    }
}

/// Marks `state` as won by `winner` along `pattern`.
pub fn won(mut state: GameState, winner: Mark, pattern: &[usize]) -> GameState {
    state.game_over = true;
    state.winner = Some(winner);
    state.winning_pattern = Some(pattern.to_vec());
    state.status = format!("{} wins!", state.seat(winner).name);
    state
}

/// Marks `state` as a draw.
pub fn drawn(mut state: GameState) -> GameState {
    state.game_over = true;
    state.winner = None;
    state.status = "It's a draw!".to_string();
    state
}

/// Attaches the agent's explanation for a move at `chosen_move`.
pub fn with_reason(mut state: GameState, chosen_move: usize, reason: &str) -> GameState {
    state.last_thoughts = Some(AgentThoughts {
        thoughts: Vec::new(),
        chosen_move,
        reason: Some(reason.to_string()),
    });
    state
}
