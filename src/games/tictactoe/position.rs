//! Square identifiers for tic-tac-toe moves.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use strum::EnumIter;
use tracing::instrument;

use super::types::Board;

/// A position on the tic-tac-toe board (square id 0-8, row-major).
///
/// Serialized as the bare square id so persisted moves read as
/// `{"squareId": 4, ...}`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Position {
    /// Top-left (square 0)
    TopLeft,
    /// Top-center (square 1)
    TopCenter,
    /// Top-right (square 2)
    TopRight,
    /// Middle-left (square 3)
    MiddleLeft,
    /// Center (square 4)
    Center,
    /// Middle-right (square 5)
    MiddleRight,
    /// Bottom-left (square 6)
    BottomLeft,
    /// Bottom-center (square 7)
    BottomCenter,
    /// Bottom-right (square 8)
    BottomRight,
}

/// Error returned when a square id is outside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Square id {} is out of range (must be 0-8)", index)]
pub struct InvalidSquare {
    /// The rejected square id.
    pub index: usize,
}

impl Position {
    /// Get label for this position (for display).
    pub fn label(&self) -> &'static str {
        match self {
            Position::TopLeft => "Top-left",
            Position::TopCenter => "Top-center",
            Position::TopRight => "Top-right",
            Position::MiddleLeft => "Middle-left",
            Position::Center => "Center",
            Position::MiddleRight => "Middle-right",
            Position::BottomLeft => "Bottom-left",
            Position::BottomCenter => "Bottom-center",
            Position::BottomRight => "Bottom-right",
        }
    }

    /// Converts position to board index (0-8).
    pub fn to_index(self) -> usize {
        match self {
            Position::TopLeft => 0,
            Position::TopCenter => 1,
            Position::TopRight => 2,
            Position::MiddleLeft => 3,
            Position::Center => 4,
            Position::MiddleRight => 5,
            Position::BottomLeft => 6,
            Position::BottomCenter => 7,
            Position::BottomRight => 8,
        }
    }

    /// Creates position from board index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// All 9 positions in square-id order.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Filters positions by board state - returns only empty squares.
    #[instrument(skip(board))]
    pub fn valid_moves(board: &Board) -> Vec<Position> {
        Self::ALL
            .iter()
            .copied()
            .filter(|pos| board.is_empty(*pos))
            .collect()
    }
}

impl TryFrom<u8> for Position {
    type Error = InvalidSquare;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value as usize).ok_or(InvalidSquare {
            index: value as usize,
        })
    }
}

impl TryFrom<usize> for Position {
    type Error = InvalidSquare;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(InvalidSquare { index })
    }
}

impl From<Position> for u8 {
    fn from(pos: Position) -> Self {
        pos.to_index() as u8
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::{PlayerId, Square};
    use strum::IntoEnumIterator;

    #[test]
    fn test_index_round_trip() {
        for pos in Position::iter() {
            assert_eq!(Position::from_index(pos.to_index()), Some(pos));
        }
        assert_eq!(Position::from_index(9), None);
    }

    #[test]
    fn test_serializes_as_square_id() {
        assert_eq!(serde_json::to_string(&Position::Center).unwrap(), "4");
        assert!(serde_json::from_str::<Position>("9").is_err());
    }

    #[test]
    fn test_valid_moves_skips_occupied_squares() {
        let mut board = Board::new();
        assert_eq!(Position::valid_moves(&board).len(), 9);

        board.set(Position::Center, Square::Occupied(PlayerId::One));
        board.set(Position::TopLeft, Square::Occupied(PlayerId::Two));
        let open = Position::valid_moves(&board);
        assert_eq!(open.len(), 7);
        assert!(!open.contains(&Position::Center));
        assert!(!open.contains(&Position::TopLeft));
        assert_eq!(open[0], Position::TopCenter);
    }
}
