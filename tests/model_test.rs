//! Decoding game states as the service sends them.

use tictactoe_arena::{Cell, GameState, Mark, Outcome, ThoughtKind};

const FINISHED_GAME: &str = r#"{
    "board": ["X", "O", "", "", "X", "O", "", "", "X"],
    "boardSize": 3,
    "winLength": 3,
    "currentPlayer": "X",
    "gameOver": true,
    "winner": "X",
    "status": "Strategic Agent wins!",
    "humanPlayers": 0,
    "humanGoesFirst": false,
    "firstPlayerHistory": [],
    "playerX": {"name": "Strategic Agent", "description": "Looks for forks", "human": false},
    "playerO": {"name": "Defensive Agent", "description": "Blocks threats", "human": false},
    "winningPattern": [[0], [4], [8]],
    "lastThoughts": {
        "thoughts": [
            {"text": "Analyzing board...", "type": ""},
            {"text": "Diagonal complete!", "type": "win"}
        ],
        "chosenMove": 8,
        "reason": "WINNING MOVE"
    }
}"#;

#[test]
fn test_decode_finished_game() {
    let state: GameState = serde_json::from_str(FINISHED_GAME).unwrap();

    assert_eq!(state.board.len(), 9);
    assert_eq!(state.board[2], Cell::Empty);
    assert_eq!(state.board[8], Cell::Marked(Mark::X));
    assert_eq!(state.outcome(), Some(Outcome::Winner(Mark::X)));
    assert_eq!(state.winning_pattern, Some(vec![0, 4, 8]));
    assert!(!state.player_x.is_human);
    assert_eq!(state.player_o.name, "Defensive Agent");
    assert_eq!(state.human_players, Some(0));

    let thoughts = state.last_thoughts.unwrap();
    assert_eq!(thoughts.chosen_move, 8);
    assert_eq!(thoughts.reason.as_deref(), Some("WINNING MOVE"));
    assert_eq!(thoughts.thoughts[0].kind, ThoughtKind::Plain);
    assert_eq!(thoughts.thoughts[1].kind, ThoughtKind::Win);
}

#[test]
fn test_decode_fresh_game_with_optional_fields_missing() {
    let json = r#"{
        "board": [null, null, null, null, null, null, null, null, null,
                  null, null, null, null, null, null, null],
        "boardSize": 4,
        "winLength": 3,
        "currentPlayer": "O",
        "playerX": {"name": "Strategic Agent", "isHuman": false},
        "playerO": {"name": "You", "isHuman": true}
    }"#;

    let state: GameState = serde_json::from_str(json).unwrap();

    assert_eq!(state.board, vec![Cell::Empty; 16]);
    assert_eq!(state.outcome(), None);
    assert!(state.current_seat().is_human);
    assert_eq!(state.winning_pattern, None);
    assert_eq!(state.last_thoughts, None);
}

#[test]
fn test_decode_draw() {
    let json = r#"{
        "board": ["X","O","X","X","O","O","O","X","X"],
        "boardSize": 3,
        "winLength": 3,
        "currentPlayer": "X",
        "gameOver": true,
        "winner": null,
        "status": "It's a draw!",
        "winningPattern": null
    }"#;

    let state: GameState = serde_json::from_str(json).unwrap();

    assert_eq!(state.outcome(), Some(Outcome::Draw));
    assert!(!state.is_winning_cell(4));
}

#[test]
fn test_flat_winning_pattern_accepted() {
    let json = r#"{
        "board": ["O","O","O","X","X","","","",""],
        "boardSize": 3,
        "winLength": 3,
        "currentPlayer": "O",
        "gameOver": true,
        "winner": "O",
        "winningPattern": [0, 1, 2]
    }"#;

    let state: GameState = serde_json::from_str(json).unwrap();

    assert!(state.is_winning_cell(0));
    assert!(state.is_winning_cell(2));
    assert!(!state.is_winning_cell(3));
}

#[test]
fn test_placed_in_finds_new_mark() {
    let before: GameState = serde_json::from_str(
        r#"{"board":["X","","","","","","","",""],"boardSize":3,"winLength":3,"currentPlayer":"O"}"#,
    )
    .unwrap();
    let after: GameState = serde_json::from_str(
        r#"{"board":["X","","","","O","","","",""],"boardSize":3,"winLength":3,"currentPlayer":"X"}"#,
    )
    .unwrap();

    assert_eq!(before.placed_in(&after), Some((4, Mark::O)));
    assert_eq!(after.placed_in(&after), None);
}
