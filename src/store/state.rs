//! Persisted game state and its validation.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::games::tictactoe::{Board, Move, Outcome, PlayerId, Position, Square, rules};

/// One completed round: the moves from empty board to win or draw.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct Round {
    moves: Vec<Move>,
}

impl Round {
    /// Wraps a move sequence.
    pub fn new(moves: Vec<Move>) -> Self {
        Self { moves }
    }

    /// How the round ended, `None` if the moves never finish it.
    pub fn outcome(&self) -> Option<Outcome> {
        rules::outcome(&Board::from_moves(&self.moves))
    }

    /// Winner of the round, if any.
    pub fn winner(&self) -> Option<PlayerId> {
        self.outcome().and_then(|outcome| outcome.winner())
    }
}

/// Archived rounds, in two tiers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct History {
    /// Rounds finished since the last reset.
    current_round_games: Vec<Round>,
    /// Every round finished since the last full clear.
    all_games: Vec<Round>,
}

/// Everything the store persists.
///
/// JSON shape:
/// `{"moves": [...], "history": {"currentRoundGames": [...], "allGames": [...]}}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct GameState {
    /// Moves of the round in play.
    moves: Vec<Move>,
    /// Archived rounds.
    history: History,
}

/// Why a move sequence or state is not a legal game.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum StateError {
    /// More than nine moves in one round.
    #[display("Round has {} moves (at most 9)", count)]
    TooManyMoves {
        /// Number of moves found.
        count: usize,
    },
    /// A square was played twice in one round.
    #[display("Square {} played twice", square)]
    DuplicateSquare {
        /// The repeated square.
        square: Position,
    },
    /// A move was made out of turn.
    #[display("Move {} was made by player {} out of turn", index, player)]
    OutOfTurn {
        /// Index of the move in its round.
        index: usize,
        /// Player recorded on that move.
        player: PlayerId,
    },
    /// A move follows the move that finished the round.
    #[display("Move {} follows the end of the round", index)]
    MoveAfterEnd {
        /// Index of the offending move.
        index: usize,
    },
    /// An archived round never finished.
    #[display("Archived round {} is not complete", index)]
    IncompleteRound {
        /// Index of the round in its bucket.
        index: usize,
    },
}

/// Checks that `moves` is a legal round prefix: at most nine moves, unique
/// squares, strict alternation starting with player 1, and nothing after a
/// finishing move.
///
/// # Errors
///
/// Returns the first [`StateError`] found.
#[instrument(skip(moves), fields(moves = moves.len()))]
pub fn validate_moves(moves: &[Move]) -> Result<(), StateError> {
    if moves.len() > 9 {
        return Err(StateError::TooManyMoves { count: moves.len() });
    }

    let mut board = Board::new();
    for (index, mv) in moves.iter().enumerate() {
        if rules::outcome(&board).is_some() {
            return Err(StateError::MoveAfterEnd { index });
        }
        if mv.player() != PlayerId::for_move_count(index) {
            return Err(StateError::OutOfTurn {
                index,
                player: mv.player(),
            });
        }
        if !board.is_empty(mv.position()) {
            return Err(StateError::DuplicateSquare {
                square: mv.position(),
            });
        }
        board.set(mv.position(), Square::Occupied(mv.player()));
    }

    Ok(())
}

fn validate_rounds(rounds: &[Round]) -> Result<(), StateError> {
    for (index, round) in rounds.iter().enumerate() {
        validate_moves(round.moves())?;
        if round.outcome().is_none() {
            return Err(StateError::IncompleteRound { index });
        }
    }
    Ok(())
}

impl GameState {
    /// Checks every invariant of a persisted state.
    ///
    /// # Errors
    ///
    /// Returns the first [`StateError`] found.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), StateError> {
        validate_moves(&self.moves)?;
        validate_rounds(&self.history.current_round_games)?;
        validate_rounds(&self.history.all_games)?;
        Ok(())
    }

    /// Appends a move to the round in play.
    pub(crate) fn push_move(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    /// Archives the round in play into both history buckets.
    pub(crate) fn archive_current_round(&mut self) {
        let round = Round::new(self.moves.clone());
        self.history.current_round_games.push(round.clone());
        self.history.all_games.push(round);
    }

    /// Clears the board.
    pub(crate) fn clear_moves(&mut self) {
        self.moves.clear();
    }

    /// Clears the board and the current round set.
    pub(crate) fn clear_round_set(&mut self) {
        self.moves.clear();
        self.history.current_round_games.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(player: PlayerId, square: usize) -> Move {
        Move::new(player, Position::from_index(square).unwrap())
    }

    #[test]
    fn test_default_state_json_shape() {
        let json = serde_json::to_string(&GameState::default()).unwrap();
        assert_eq!(
            json,
            r#"{"moves":[],"history":{"currentRoundGames":[],"allGames":[]}}"#
        );
    }

    #[test]
    fn test_validate_accepts_legal_prefix() {
        let moves = [mv(PlayerId::One, 0), mv(PlayerId::Two, 4), mv(PlayerId::One, 8)];
        assert_eq!(validate_moves(&moves), Ok(()));
    }

    #[test]
    fn test_validate_rejects_duplicate_square() {
        let moves = [mv(PlayerId::One, 0), mv(PlayerId::Two, 0)];
        assert_eq!(
            validate_moves(&moves),
            Err(StateError::DuplicateSquare {
                square: Position::TopLeft
            })
        );
    }

    #[test]
    fn test_validate_rejects_out_of_turn() {
        let moves = [mv(PlayerId::Two, 0)];
        assert!(matches!(
            validate_moves(&moves),
            Err(StateError::OutOfTurn { index: 0, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_move_after_win() {
        let moves = [
            mv(PlayerId::One, 0),
            mv(PlayerId::Two, 3),
            mv(PlayerId::One, 1),
            mv(PlayerId::Two, 4),
            mv(PlayerId::One, 2),
            mv(PlayerId::Two, 5),
        ];
        assert_eq!(
            validate_moves(&moves),
            Err(StateError::MoveAfterEnd { index: 5 })
        );
    }

    #[test]
    fn test_validate_rejects_incomplete_archived_round() {
        let mut state = GameState::default();
        state.push_move(mv(PlayerId::One, 4));
        state.archive_current_round();
        assert_eq!(
            state.validate(),
            Err(StateError::IncompleteRound { index: 0 })
        );
    }
}
