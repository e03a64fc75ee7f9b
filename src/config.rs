//! Store configuration: player roster, storage key, and storage backend.

use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::games::tictactoe::{Player, PlayerId};
use crate::storage::{FileStorage, MemoryStorage, SqliteStorage, Storage, StorageError};

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "game-state-key";

/// Which storage backend to persist to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per key in a directory.
    #[default]
    File,
    /// One row per key in a SQLite database.
    Sqlite,
    /// Process-local map; nothing survives exit.
    Memory,
}

/// Where persisted state lives.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct StorageConfig {
    /// Backend kind.
    #[serde(default)]
    backend: StorageBackend,

    /// Directory (file backend) or database file (sqlite backend).
    #[serde(default = "default_storage_path")]
    #[setters(into)]
    path: String,
}

#[instrument]
fn default_storage_path() -> String {
    ".tictactoe".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
        }
    }
}

impl StorageConfig {
    /// Opens the configured backend.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be opened.
    #[instrument(skip(self), fields(backend = %self.backend, path = %self.path))]
    pub fn open(&self) -> Result<Box<dyn Storage>, StorageError> {
        debug!("Opening storage backend");
        let storage: Box<dyn Storage> = match self.backend {
            StorageBackend::File => Box::new(FileStorage::open(&self.path)?),
            StorageBackend::Sqlite => Box::new(SqliteStorage::open(&self.path)?),
            StorageBackend::Memory => Box::new(MemoryStorage::new()),
        };
        Ok(storage)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct StoreConfig {
    /// Key the game state is persisted under.
    #[serde(default = "default_storage_key")]
    #[setters(into)]
    storage_key: String,

    /// The two players.
    #[serde(default = "default_players")]
    players: Vec<Player>,

    /// Storage backend settings.
    #[serde(default)]
    storage: StorageConfig,
}

#[instrument]
fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

#[instrument]
fn default_players() -> Vec<Player> {
    vec![
        Player::new(PlayerId::One, "Player 1", "X", "turquoise"),
        Player::new(PlayerId::Two, "Player 2", "O", "yellow"),
    ]
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            players: default_players(),
            storage: StorageConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or the
    /// player roster is invalid.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(storage_key = %config.storage_key, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text does not parse or the player
    /// roster is invalid.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.roster()?;
        if config.storage_key.is_empty() {
            return Err(ConfigError::new("storage_key must not be empty"));
        }
        Ok(config)
    }

    /// Validated player roster.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] unless there are exactly two players with
    /// ids 1 and 2.
    pub fn roster(&self) -> Result<Roster, ConfigError> {
        Roster::new(self.players.clone())
    }
}

/// Exactly two players, indexed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    players: [Player; 2],
}

impl Roster {
    /// Builds a roster from a player list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] unless `players` holds ids 1 and 2 exactly
    /// once each.
    #[instrument(skip(players), fields(count = players.len()))]
    pub fn new(players: Vec<Player>) -> Result<Self, ConfigError> {
        let mut one = None;
        let mut two = None;
        for player in players {
            let slot = match player.id() {
                PlayerId::One => &mut one,
                PlayerId::Two => &mut two,
            };
            if slot.is_some() {
                return Err(ConfigError::new(format!(
                    "Player id {} configured more than once",
                    player.id()
                )));
            }
            *slot = Some(player);
        }
        match (one, two) {
            (Some(one), Some(two)) => Ok(Self {
                players: [one, two],
            }),
            _ => Err(ConfigError::new(
                "Exactly two players with ids 1 and 2 are required",
            )),
        }
    }

    /// Looks up a player by id.
    pub fn get(&self, id: PlayerId) -> &Player {
        match id {
            PlayerId::One => &self.players[0],
            PlayerId::Two => &self.players[1],
        }
    }

    /// Both players, player 1 first.
    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            players: [
                Player::new(PlayerId::One, "Player 1", "X", "turquoise"),
                Player::new(PlayerId::Two, "Player 2", "O", "yellow"),
            ],
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
