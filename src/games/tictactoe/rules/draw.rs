//! Draw detection logic for tic-tac-toe.

use super::super::Board;
use super::win::check_winner;
use tracing::instrument;

/// Checks if the board is full (all squares occupied).
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.is_full()
}

/// A full board with no winner is a draw.
#[instrument(skip(board))]
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && check_winner(board).is_none()
}

#[cfg(test)]
mod tests {
    use super::super::super::{PlayerId, Position, Square};
    use super::*;

    #[test]
    fn test_empty_board_not_full() {
        let board = Board::new();
        assert!(!is_full(&board));
    }

    #[test]
    fn test_partial_board_not_full() {
        let mut board = Board::new();
        board.set(Position::Center, Square::Occupied(PlayerId::One));
        assert!(!is_full(&board));
    }

    #[test]
    fn test_draw_detection() {
        let mut board = Board::new();
        // X O X / O X X / O X O
        let layout = [
            PlayerId::One,
            PlayerId::Two,
            PlayerId::One,
            PlayerId::Two,
            PlayerId::One,
            PlayerId::One,
            PlayerId::Two,
            PlayerId::One,
            PlayerId::Two,
        ];
        for (pos, player) in Position::ALL.into_iter().zip(layout) {
            board.set(pos, Square::Occupied(player));
        }

        assert!(is_draw(&board));
    }

    #[test]
    fn test_not_draw_if_winner() {
        let mut board = Board::new();
        board.set(Position::TopLeft, Square::Occupied(PlayerId::One));
        board.set(Position::TopCenter, Square::Occupied(PlayerId::One));
        board.set(Position::TopRight, Square::Occupied(PlayerId::One));
        board.set(Position::MiddleLeft, Square::Occupied(PlayerId::Two));
        board.set(Position::Center, Square::Occupied(PlayerId::Two));

        assert!(!is_draw(&board));
    }
}
