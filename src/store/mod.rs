//! The state store and the data it owns.
//!
//! [`GameState`] is what gets persisted; [`Game`] and [`Stats`] are derived
//! from it on demand and never stored.

mod game_store;
mod snapshot;
mod state;

pub use game_store::{Listener, Store, SubscriptionId};
pub use snapshot::{Game, GameStatus, PlayerStats, Stats};
pub use state::{GameState, History, Round, StateError, validate_moves};
