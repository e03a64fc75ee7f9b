//! Core domain types for tic-tac-toe.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use strum::EnumIter;
use tracing::instrument;

use super::action::Move;
use super::position::Position;

/// Identity of one of the two seats at the table.
///
/// Serialized as the bare integer `1` or `2`, which is how moves refer to
/// their player in persisted state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlayerId {
    /// Player 1 (moves first).
    One,
    /// Player 2 (moves second).
    Two,
}

impl PlayerId {
    /// Returns the opponent seat.
    pub fn opponent(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Returns whose turn it is after `count` moves.
    ///
    /// Player 1 moves whenever an even number of moves has been made.
    pub fn for_move_count(count: usize) -> Self {
        if count % 2 == 0 {
            PlayerId::One
        } else {
            PlayerId::Two
        }
    }

    /// Numeric id as used in configuration and persisted moves.
    pub fn number(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Error returned when a number does not name a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Invalid player id {} (expected 1 or 2)", value)]
pub struct InvalidPlayerId {
    /// The rejected value.
    pub value: u8,
}

impl TryFrom<u8> for PlayerId {
    type Error = InvalidPlayerId;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PlayerId::One),
            2 => Ok(PlayerId::Two),
            _ => Err(InvalidPlayerId { value }),
        }
    }
}

impl From<PlayerId> for u8 {
    fn from(id: PlayerId) -> Self {
        id.number()
    }
}

/// A configured player: identity plus presentation details.
///
/// Players are reference data. Game state only stores the [`PlayerId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Player {
    /// Seat this player occupies.
    id: PlayerId,
    /// Display name.
    name: String,
    /// Mark drawn on the board.
    icon: String,
    /// Color hint for front-ends.
    color: String,
}

impl Player {
    /// Creates a player.
    #[instrument(skip_all, fields(id = %id))]
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a player.
    Occupied(PlayerId),
}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Builds the board produced by a sequence of moves.
    ///
    /// Later moves on an already occupied square overwrite earlier ones;
    /// callers are expected to hand in legal sequences.
    #[instrument(skip(moves), fields(moves = moves.len()))]
    pub fn from_moves(moves: &[Move]) -> Self {
        let mut board = Self::new();
        for mv in moves {
            board.set(mv.position(), Square::Occupied(mv.player()));
        }
        board
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Sets the square at the given position.
    pub fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.to_index()] = square;
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Checks if every square is occupied.
    pub fn is_full(&self) -> bool {
        self.squares.iter().all(|s| *s != Square::Empty)
    }

    /// Returns all squares as a slice.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Formats the board as a human-readable string.
    ///
    /// Empty squares show their square id so a player can see which
    /// number to play; occupied squares show the mark chosen by `mark`.
    pub fn display_with<F>(&self, mark: F) -> String
    where
        F: Fn(PlayerId) -> String,
    {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.squares[pos] {
                    Square::Empty => pos.to_string(),
                    Square::Occupied(player) => mark(player),
                };
                result.push(' ');
                result.push_str(&symbol);
                result.push(' ');
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n---+---+---\n");
            }
        }
        result
    }

    /// Formats the board using `X` for player 1 and `O` for player 2.
    pub fn display(&self) -> String {
        self.display_with(|player| match player {
            PlayerId::One => "X".to_string(),
            PlayerId::Two => "O".to_string(),
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_parity() {
        assert_eq!(PlayerId::for_move_count(0), PlayerId::One);
        assert_eq!(PlayerId::for_move_count(1), PlayerId::Two);
        assert_eq!(PlayerId::for_move_count(8), PlayerId::One);
    }

    #[test]
    fn test_player_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&PlayerId::Two).unwrap(), "2");
        let parsed: PlayerId = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, PlayerId::One);
        assert!(serde_json::from_str::<PlayerId>("3").is_err());
    }

    #[test]
    fn test_board_from_moves() {
        let board = Board::from_moves(&[
            Move::new(PlayerId::One, Position::Center),
            Move::new(PlayerId::Two, Position::TopLeft),
        ]);
        assert_eq!(board.get(Position::Center), Square::Occupied(PlayerId::One));
        assert_eq!(board.get(Position::TopLeft), Square::Occupied(PlayerId::Two));
        assert!(board.is_empty(Position::BottomRight));
        assert!(!board.is_full());
    }

    #[test]
    fn test_display_shows_square_ids() {
        let board = Board::from_moves(&[Move::new(PlayerId::One, Position::TopLeft)]);
        let text = board.display();
        assert!(text.starts_with(" X | 1 | 2 "));
        assert!(text.ends_with(" 6 | 7 | 8 "));
    }
}
