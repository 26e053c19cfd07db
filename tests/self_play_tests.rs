//! Self-play driver tests on small boards.

use std::io::Write;

use rust_gomoku::training::{CancellationToken, SelfPlayConfig, SelfPlayDriver};

fn small_config(seed: u64) -> SelfPlayConfig {
    SelfPlayConfig::new()
        .with_board_size(5)
        .with_iterations(20, 40)
        .with_threads(1)
        .with_repeat(2)
        .with_rounds(1)
        .with_seed(seed)
}

#[test]
fn test_run_plays_all_games() {
    let mut driver = SelfPlayDriver::new(small_config(1));
    let summary = driver.run(&CancellationToken::new()).unwrap();

    assert_eq!(summary.rounds, 1);
    assert_eq!(summary.games, 2);
    assert_eq!(summary.x_wins + summary.o_wins + summary.draws, 2);
    assert!(summary.moves >= 2 * 9);
    assert!(!summary.cancelled);
    assert!(summary.dataset_files.is_empty());
}

#[test]
fn test_dataset_lines_per_move() {
    let dir = tempfile::tempdir().unwrap();
    let config = small_config(2).with_dataset(dir.path(), "selfplay_");

    let mut driver = SelfPlayDriver::new(config);
    let summary = driver.run(&CancellationToken::new()).unwrap();

    assert_eq!(summary.records, summary.moves - summary.forced_moves);
    assert_eq!(summary.dataset_files.len(), 1);

    let content = std::fs::read_to_string(&summary.dataset_files[0]).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len() as u64, summary.records);

    for line in lines {
        let fields: Vec<&str> = line.split(',').collect();
        // 25 cells, visits, wins
        assert_eq!(fields.len(), 27, "bad line {line:?}");
        assert!(fields[..25].iter().all(|c| matches!(*c, "0" | "1" | "2")));
        let visits: u64 = fields[25].parse().unwrap();
        let wins: f64 = fields[26].parse().unwrap();
        assert!(visits > 0);
        assert!(wins <= visits as f64);
    }
}

#[test]
fn test_dataset_rotation() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = small_config(3).with_dataset(dir.path(), "rot_");
    config.file_size = 1;

    let mut driver = SelfPlayDriver::new(config);
    let summary = driver.run(&CancellationToken::new()).unwrap();

    assert_eq!(summary.dataset_files.len() as u64, summary.records);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count() as u64, summary.records);
}

#[test]
fn test_cancel_before_start() {
    let dir = tempfile::tempdir().unwrap();
    let config = small_config(4).with_dataset(dir.path(), "none_");
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut driver = SelfPlayDriver::new(config);
    let summary = driver.run(&cancel).unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.games, 0);
    assert_eq!(summary.moves, 0);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_cancelled_game_has_no_result() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut driver = SelfPlayDriver::new(small_config(5));
    let record = driver.play_game(30, &cancel).unwrap();

    assert!(!record.is_finished());
    assert!(record.moves.is_empty());
    assert_eq!(record.max_iterations, 30);
}

#[test]
fn test_play_game_alternates_players() {
    let mut driver = SelfPlayDriver::new(small_config(6));
    let record = driver.play_game(25, &CancellationToken::new()).unwrap();

    assert!(record.is_finished());
    for pair in record.moves.windows(2) {
        assert_eq!(pair[1].player, pair[0].player.opponent());
        assert_ne!(pair[0].mv, pair[1].mv);
    }
}

#[test]
fn test_same_seed_same_games() {
    let first = SelfPlayDriver::new(small_config(11))
        .play_game(30, &CancellationToken::new())
        .unwrap();
    let second = SelfPlayDriver::new(small_config(11))
        .play_game(30, &CancellationToken::new())
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_invalid_board_size_fails() {
    let mut driver = SelfPlayDriver::new(small_config(7).with_board_size(3));
    assert!(driver.run(&CancellationToken::new()).is_err());
}

#[test]
fn test_load_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# self-play settings").unwrap();
    writeln!(file, "iterations_param1 = 10").unwrap();
    writeln!(file, "iterations_param2=20").unwrap();
    writeln!(file, "number_of_repeat = 1").unwrap();
    writeln!(file, "number_of_rounds = 1").unwrap();
    writeln!(file, "number_of_threads = 1").unwrap();
    writeln!(file, "board_size = 5").unwrap();
    writeln!(file, "seed = 3").unwrap();
    writeln!(file, "this line is ignored").unwrap();

    let config = SelfPlayConfig::load(file.path()).unwrap();
    assert_eq!((config.iterations_param1, config.iterations_param2), (10, 20));

    let summary = SelfPlayDriver::new(config)
        .run(&CancellationToken::new())
        .unwrap();
    assert_eq!(summary.games, 1);
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(SelfPlayConfig::load(dir.path().join("config.txt")).is_err());
}
