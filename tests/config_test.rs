//! Tests for client configuration files and session settings.

use proptest::prelude::*;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use tictactoe_arena::{
    ClientConfig, DEFAULT_SERVER_URL, HumanPlayers, MAX_BOARD_SIZE, MIN_BOARD_SIZE,
    MIN_WIN_LENGTH, SessionConfig, Speed,
};

#[test]
fn test_load_config_from_toml() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
server_url = "http://arena.local:9000/api/game"
request_timeout_ms = 2500
speed = "fast"

[session]
board_size = 5
win_length = 4
human_players = 1
"#
    )
    .unwrap();

    let config = ClientConfig::from_file(file.path()).unwrap();

    assert_eq!(config.server_url(), "http://arena.local:9000/api/game");
    assert_eq!(config.request_timeout(), Duration::from_millis(2500));
    assert_eq!(config.speed(), &Speed::Fast);
    assert_eq!(
        config.session_config(),
        SessionConfig::new(5, 4, HumanPlayers::One)
    );
}

#[test]
fn test_partial_config_uses_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "speed = \"slow\"").unwrap();

    let config = ClientConfig::from_file(file.path()).unwrap();

    assert_eq!(config.server_url(), DEFAULT_SERVER_URL);
    assert_eq!(config.speed(), &Speed::Slow);
    assert_eq!(config.session_config(), SessionConfig::default());
}

#[test]
fn test_invalid_human_count_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[session]\nhuman_players = 3").unwrap();

    let err = ClientConfig::from_file(file.path()).unwrap_err();

    assert!(err.message.contains("Failed to parse config"));
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig::load_or_default(dir.path().join("absent.toml")).unwrap();

    assert_eq!(config, ClientConfig::default());
}

fn human_players() -> impl Strategy<Value = HumanPlayers> {
    prop_oneof![
        Just(HumanPlayers::Zero),
        Just(HumanPlayers::One),
        Just(HumanPlayers::Two),
    ]
}

/// One settings edit as the front end would issue it.
#[derive(Debug, Clone)]
enum Edit {
    BoardSize(usize),
    WinLength(usize),
    Humans(HumanPlayers),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0usize..20).prop_map(Edit::BoardSize),
        (0usize..20).prop_map(Edit::WinLength),
        human_players().prop_map(Edit::Humans),
    ]
}

proptest! {
    #[test]
    fn prop_settings_stay_in_bounds(
        size in 0usize..20,
        length in 0usize..20,
        humans in human_players(),
        edits in proptest::collection::vec(edit(), 0..12),
    ) {
        let mut config = SessionConfig::new(size, length, humans);
        for edit in edits {
            config = match edit {
                Edit::BoardSize(size) => config.with_board_size(size),
                Edit::WinLength(length) => config.with_win_length(length),
                Edit::Humans(humans) => config.with_human_players(humans),
            };
            prop_assert!((MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(config.board_size()));
            prop_assert!(*config.win_length() >= MIN_WIN_LENGTH);
            prop_assert!(config.win_length() <= config.board_size());
        }
    }

    #[test]
    fn prop_in_range_settings_kept(size in 3usize..=10, offset in 0usize..8, humans in human_players()) {
        let length = (3 + offset).min(size);
        let config = SessionConfig::new(size, length, humans);
        prop_assert_eq!(*config.board_size(), size);
        prop_assert_eq!(*config.win_length(), length);
        prop_assert_eq!(*config.human_players(), humans);
    }
}
