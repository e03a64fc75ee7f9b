//! First-class move type for tic-tac-toe.
//!
//! Moves are recorded facts: once a move is in the history it is never
//! edited, only dropped by a reset of the round that holds it.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{PlayerId, Position};

/// A move in tic-tac-toe: a player placing their mark at a position.
///
/// Persisted as `{"squareId": <0-8>, "player": <1|2>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The position where the player places their mark.
    #[serde(rename = "squareId")]
    position: Position,
    /// The player making the move.
    player: PlayerId,
}

impl Move {
    /// Creates a new move.
    #[instrument]
    pub fn new(player: PlayerId, position: Position) -> Self {
        Self { position, player }
    }

    /// Returns the player making this move.
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Returns the position of this move.
    pub fn position(&self) -> Position {
        self.position
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {} -> {}", self.player, self.position.label())
    }
}

/// Reason a move was not applied.
///
/// A rejected move leaves the game untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    /// The square at the position is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(#[error(not(source))] Position),

    /// The round is already over.
    #[display("Round is already over")]
    GameOver,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_wire_format() {
        let mv = Move::new(PlayerId::Two, Position::MiddleRight);
        let json = serde_json::to_string(&mv).unwrap();
        assert_eq!(json, r#"{"squareId":5,"player":2}"#);
        let back: Move = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mv);
    }

    #[test]
    fn test_move_rejects_out_of_range_square() {
        assert!(serde_json::from_str::<Move>(r#"{"squareId":12,"player":1}"#).is_err());
    }
}
