//! Tests for the storage backends.

use tempfile::{NamedTempFile, TempDir};

use tictactoe_store::{
    FileStorage, MemoryStorage, PlayerId, Position, Roster, SqliteStorage, Storage, Store,
};

const KEY: &str = "game-state-key";

/// Creates a temporary SQLite file and opens storage on it. The file handle
/// must stay in scope to keep the file alive.
fn setup_sqlite() -> (NamedTempFile, SqliteStorage) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let storage = SqliteStorage::open(db_path).expect("Failed to open storage");
    (db_file, storage)
}

fn setup_files() -> (TempDir, FileStorage) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let storage = FileStorage::open(dir.path()).expect("Failed to open storage");
    (dir, storage)
}

fn exercise(storage: &dyn Storage) {
    assert_eq!(storage.get_item(KEY).expect("get failed"), None);

    storage.set_item(KEY, "first").expect("set failed");
    assert_eq!(
        storage.get_item(KEY).expect("get failed").as_deref(),
        Some("first")
    );

    storage.set_item(KEY, "second").expect("overwrite failed");
    assert_eq!(
        storage.get_item(KEY).expect("get failed").as_deref(),
        Some("second")
    );

    storage.remove_item(KEY).expect("remove failed");
    assert_eq!(storage.get_item(KEY).expect("get failed"), None);
    storage.remove_item(KEY).expect("removing an absent key is fine");
}

#[test]
fn test_memory_storage_contract() {
    exercise(&MemoryStorage::new());
}

#[test]
fn test_file_storage_contract() {
    let (_dir, storage) = setup_files();
    exercise(&storage);
}

#[test]
fn test_sqlite_storage_contract() {
    let (_db, storage) = setup_sqlite();
    exercise(&storage);
}

#[test]
fn test_file_storage_rejects_escaping_keys() {
    let (_dir, storage) = setup_files();
    assert!(storage.set_item("../outside", "x").is_err());
    assert!(storage.set_item(".hidden", "x").is_err());
    assert!(storage.get_item("").is_err());
}

#[test]
fn test_file_storage_writes_one_json_file_per_key() {
    let (dir, storage) = setup_files();
    storage.set_item(KEY, "{}").expect("set failed");

    let path = dir.path().join("game-state-key.json");
    assert_eq!(std::fs::read_to_string(path).expect("file missing"), "{}");
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .expect("read_dir failed")
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_sqlite_reopen_keeps_values() {
    let (db, storage) = setup_sqlite();
    storage.set_item(KEY, "kept").expect("set failed");

    let reopened =
        SqliteStorage::open(db.path().to_str().expect("Invalid path")).expect("reopen failed");
    assert_eq!(
        reopened.get_item(KEY).expect("get failed").as_deref(),
        Some("kept")
    );
}

#[test]
fn test_store_round_trips_through_files() {
    let (dir, storage) = setup_files();
    let mut store = Store::open(storage, KEY, Roster::default());
    for square in [0, 4, 8] {
        store
            .player_move(Position::from_index(square).expect("in range"))
            .expect("legal move");
    }
    let game = store.game();
    drop(store);

    let persisted = std::fs::read_to_string(dir.path().join("game-state-key.json"))
        .expect("state file missing");
    assert!(persisted.contains("\"currentRoundGames\""));
    assert!(persisted.contains("\"squareId\": 4"));

    let storage = FileStorage::open(dir.path()).expect("reopen failed");
    let reopened = Store::open(storage, KEY, Roster::default());
    assert_eq!(reopened.game(), game);
    assert_eq!(*reopened.game().current_player().id(), PlayerId::Two);
}

#[test]
fn test_store_round_trips_through_sqlite() {
    let (db, storage) = setup_sqlite();
    let mut store = Store::open(storage, KEY, Roster::default());
    for square in [0, 4, 1, 5, 2] {
        store
            .player_move(Position::from_index(square).expect("in range"))
            .expect("legal move");
    }
    let stats = store.stats();
    drop(store);

    let storage =
        SqliteStorage::open(db.path().to_str().expect("Invalid path")).expect("reopen failed");
    let reopened = Store::open(storage, KEY, Roster::default());
    assert_eq!(reopened.stats(), stats);
    assert_eq!(reopened.stats().wins(PlayerId::One), 1);
}

#[test]
fn test_sqlite_unreachable_path_is_a_connection_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("missing").join("games.db");

    let err = SqliteStorage::open(db_path.to_str().expect("Invalid path"))
        .expect_err("parent directory does not exist");
    assert!(err.message.starts_with("Connection error"), "{}", err);
}
