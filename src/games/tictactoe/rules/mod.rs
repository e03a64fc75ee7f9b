//! Game rules for tic-tac-toe.
//!
//! This module contains pure functions for evaluating a board according to
//! tic-tac-toe rules. Rules are separated from board storage so the store
//! can derive status from nothing but the recorded moves.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{LINES, check_winner};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{Board, PlayerId};

/// Outcome of a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Player won the round.
    Winner(PlayerId),
    /// Round ended in a draw.
    Draw,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            Outcome::Winner(player) => Some(*player),
            Outcome::Draw => None,
        }
    }

    /// Returns true if the round was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(player) => write!(f, "Player {} wins", player),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Evaluates a board: `Some` once the round is over, `None` while in play.
///
/// A line owned by one player wins even on a full board.
#[instrument(skip(board))]
pub fn outcome(board: &Board) -> Option<Outcome> {
    if let Some(winner) = check_winner(board) {
        Some(Outcome::Winner(winner))
    } else if is_full(board) {
        Some(Outcome::Draw)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Move, Position};
    use super::*;

    #[test]
    fn test_in_progress_has_no_outcome() {
        let board = Board::from_moves(&[Move::new(PlayerId::One, Position::Center)]);
        assert_eq!(outcome(&board), None);
    }

    #[test]
    fn test_win_on_last_square_is_not_a_draw() {
        // The ninth move completes the left column.
        let moves = [
            Move::new(PlayerId::One, Position::TopLeft),
            Move::new(PlayerId::Two, Position::TopCenter),
            Move::new(PlayerId::One, Position::MiddleLeft),
            Move::new(PlayerId::Two, Position::Center),
            Move::new(PlayerId::One, Position::TopRight),
            Move::new(PlayerId::Two, Position::MiddleRight),
            Move::new(PlayerId::One, Position::BottomCenter),
            Move::new(PlayerId::Two, Position::BottomRight),
            Move::new(PlayerId::One, Position::BottomLeft),
        ];
        let board = Board::from_moves(&moves);
        assert!(board.is_full());
        assert_eq!(outcome(&board), Some(Outcome::Winner(PlayerId::One)));
    }
}
