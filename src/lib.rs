//! Tic-tac-toe state store - persisted two-player sessions
//!
//! This library keeps the move list of a two-player tic-tac-toe game,
//! derives whose turn it is and whether the round is won or drawn, tallies
//! wins and ties across rounds, persists everything to key-value storage,
//! and notifies subscribers after every change.
//!
//! # Architecture
//!
//! - **Rules**: board, positions, moves, win/draw detection
//! - **Store**: mutation operations, derived snapshots, change notification
//! - **Storage**: memory, JSON-file and SQLite key-value backends
//! - **Watch**: detection of state written by another process
//! - **Render**: text rendering of a snapshot
//!
//! # Example
//!
//! ```
//! use tictactoe_store::{MemoryStorage, Position, Roster, Store};
//!
//! let mut store = Store::open(MemoryStorage::new(), "game-state-key", Roster::default());
//! store.subscribe(|store| println!("{} moves", store.game().moves().len()));
//!
//! for square in [0, 4, 1, 5, 2] {
//!     let position = Position::from_index(square).unwrap();
//!     store.player_move(position).unwrap();
//! }
//!
//! let game = store.game();
//! assert!(game.status().is_complete());
//! assert_eq!(game.status().winner().map(|p| p.name().as_str()), Some("Player 1"));
//! assert_eq!(store.stats().player_with_stats()[0].wins(), &1);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod games;
mod storage;
mod store;
mod watch;

pub mod render;

// Crate-level exports - Configuration
pub use config::{
    ConfigError, DEFAULT_STORAGE_KEY, Roster, StorageBackend, StorageConfig, StoreConfig,
};

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{
    Board, InvalidPlayerId, InvalidSquare, Move, MoveError, Outcome, Player, PlayerId, Position,
    Square, rules,
};

// Crate-level exports - Storage
pub use storage::{FileStorage, MemoryStorage, SqliteStorage, Storage, StorageError};

// Crate-level exports - State store
pub use store::{
    Game, GameState, GameStatus, History, Listener, PlayerStats, Round, StateError, Stats, Store,
    SubscriptionId, validate_moves,
};

// Crate-level exports - Change detection
pub use watch::ChangeWatcher;
