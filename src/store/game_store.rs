//! The state store: single source of truth for game progress.

use derive_more::Display;
use tracing::{debug, info, instrument, warn};

use crate::config::{ConfigError, Roster, StoreConfig};
use crate::games::tictactoe::{Move, MoveError, Player, PlayerId, Position};
use crate::storage::Storage;

use super::snapshot::{Game, Stats};
use super::state::GameState;

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("subscription#{}", _0)]
pub struct SubscriptionId(u64);

/// Callback fired after every state change.
///
/// The event carries no payload; listeners read [`Store::game`] and
/// [`Store::stats`] from the store they are handed.
pub type Listener = Box<dyn FnMut(&Store)>;

/// Owns the move list and round history, persists every change, and
/// notifies subscribers.
///
/// Every mutation is applied in memory, written to storage, then announced
/// to listeners in subscription order. A failed write is logged and does
/// not stop the announcement.
pub struct Store {
    storage: Box<dyn Storage>,
    key: String,
    roster: Roster,
    state: GameState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("storage", &self.storage)
            .field("key", &self.key)
            .field("roster", &self.roster)
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Result of reading persisted state.
enum Loaded {
    Found(GameState),
    Absent,
    ReadFailed,
    Unusable,
}

impl Store {
    /// Opens the store over `storage` under `key`.
    ///
    /// Absent state is initialized to the empty default and written back.
    /// Unreadable, unparsable, or invalid state is replaced in memory by
    /// the default; the stored blob is left for the next write to replace.
    #[instrument(skip_all, fields(key = %key.as_ref()))]
    pub fn open(storage: impl Storage + 'static, key: impl AsRef<str>, roster: Roster) -> Self {
        let mut store = Self {
            storage: Box::new(storage),
            key: key.as_ref().to_string(),
            roster,
            state: GameState::default(),
            listeners: Vec::new(),
            next_subscription: 0,
        };

        match store.load() {
            Loaded::Found(state) => {
                info!(
                    moves = state.moves().len(),
                    rounds = state.history().all_games().len(),
                    "Restored persisted state"
                );
                store.state = state;
            }
            Loaded::Absent => {
                info!("No persisted state; initializing default");
                store.persist();
            }
            Loaded::ReadFailed | Loaded::Unusable => {}
        }

        store
    }

    /// Opens the store described by `config`, using an already opened
    /// storage backend.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the player roster is invalid.
    pub fn with_config(
        storage: impl Storage + 'static,
        config: &StoreConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self::open(storage, config.storage_key(), config.roster()?))
    }

    /// Snapshot of the round in play.
    #[instrument(skip(self))]
    pub fn game(&self) -> Game {
        Game::derive(self.state.moves(), &self.roster)
    }

    /// Wins per player and ties over every archived round.
    #[instrument(skip(self))]
    pub fn stats(&self) -> Stats {
        Stats::derive(self.state.history().all_games(), &self.roster)
    }

    /// Wins per player and ties over the rounds since the last reset.
    #[instrument(skip(self))]
    pub fn round_stats(&self) -> Stats {
        Stats::derive(self.state.history().current_round_games(), &self.roster)
    }

    /// The persisted-shape state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Configured players.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Player by seat.
    pub fn player(&self, id: PlayerId) -> &Player {
        self.roster.get(id)
    }

    /// Storage key this store persists under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The storage backend.
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Places the current player's mark at `position`.
    ///
    /// If that finishes the round, the round is archived into both history
    /// buckets.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] when the square is taken or the round is
    /// already over. Nothing is changed, persisted, or announced in that
    /// case.
    #[instrument(skip(self), fields(square = position.to_index()))]
    pub fn player_move(&mut self, position: Position) -> Result<(), MoveError> {
        let game = self.game();

        if game.status().is_complete() {
            debug!("Ignoring move after end of round");
            return Err(MoveError::GameOver);
        }
        if game.moves().iter().any(|mv| mv.position() == position) {
            debug!("Ignoring move on occupied square");
            return Err(MoveError::SquareOccupied(position));
        }

        let player = *game.current_player().id();
        self.state.push_move(Move::new(player, position));
        info!(player = %player, square = position.to_index(), "Move applied");

        if self.game().status().is_complete() {
            self.state.archive_current_round();
            info!(
                outcome = ?self.game().outcome(),
                rounds = self.state.history().all_games().len(),
                "Round complete"
            );
        }

        self.commit();
        Ok(())
    }

    /// Clears the board for a new round, keeping all history.
    #[instrument(skip(self))]
    pub fn new_round(&mut self) {
        self.state.clear_moves();
        info!("New round");
        self.commit();
    }

    /// Clears the board and the current round set; lifetime history stays.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.state.clear_round_set();
        info!("Round set reset");
        self.commit();
    }

    /// Returns to the empty default, lifetime history included.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.state = GameState::default();
        info!("State cleared");
        self.commit();
    }

    /// Re-reads persisted state written by someone else.
    ///
    /// Last writer wins: the stored state replaces the in-memory one
    /// without merging. Listeners are notified only if something changed.
    /// A failed read keeps the current state. Returns whether the state
    /// changed.
    #[instrument(skip(self))]
    pub fn reload(&mut self) -> bool {
        let loaded = match self.load() {
            Loaded::Found(state) => state,
            Loaded::Absent | Loaded::Unusable => GameState::default(),
            Loaded::ReadFailed => {
                warn!("Keeping current state after failed read");
                return false;
            }
        };

        if loaded == self.state {
            debug!("Persisted state unchanged");
            return false;
        }

        info!(moves = loaded.moves().len(), "Reloaded external state");
        self.state = loaded;
        self.notify();
        true
    }

    /// Registers a listener fired after every state change.
    #[instrument(skip(self, listener))]
    pub fn subscribe(&mut self, listener: impl FnMut(&Store) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        debug!(%id, listeners = self.listeners.len(), "Listener subscribed");
        id
    }

    /// Removes a listener. Returns false if `id` was not subscribed.
    #[instrument(skip(self))]
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        let removed = self.listeners.len() != before;
        debug!(%id, removed, "Listener unsubscribed");
        removed
    }

    /// Reads and validates the persisted state.
    fn load(&self) -> Loaded {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Loaded::Absent,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted state");
                return Loaded::ReadFailed;
            }
        };

        let state: GameState = match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "Persisted state is not valid JSON; using default");
                return Loaded::Unusable;
            }
        };

        if let Err(e) = state.validate() {
            warn!(error = %e, "Persisted state violates game rules; using default");
            return Loaded::Unusable;
        }

        Loaded::Found(state)
    }

    /// Writes the state and notifies listeners.
    fn commit(&mut self) {
        self.persist();
        self.notify();
    }

    /// Writes the full state under the store key. Failures are logged.
    fn persist(&self) {
        let json = match serde_json::to_string_pretty(&self.state) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize state; not persisted");
                return;
            }
        };

        match self.storage.set_item(&self.key, &json) {
            Ok(()) => debug!(bytes = json.len(), "State persisted"),
            Err(e) => warn!(error = %e, "Failed to persist state; continuing in memory"),
        }
    }

    /// Fires every listener once, in subscription order.
    fn notify(&mut self) {
        let mut listeners = std::mem::take(&mut self.listeners);
        debug!(listeners = listeners.len(), "Notifying listeners");
        for (_, listener) in listeners.iter_mut() {
            listener(&*self);
        }
        self.listeners = listeners;
    }
}
