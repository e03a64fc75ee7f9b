//! Derived views: the game in play and win/tie statistics.
//!
//! Nothing here is persisted. Both views are recomputed from the recorded
//! moves on every read.

use derive_getters::Getters;
use serde::Serialize;
use tracing::instrument;

use crate::config::Roster;
use crate::games::tictactoe::{Board, Move, Outcome, Player, PlayerId, rules};

use super::state::Round;

/// Status of the round in play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatus {
    is_complete: bool,
    winner: Option<Player>,
}

impl GameStatus {
    /// True once someone has won or the board is full.
    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    /// The winner, `None` while in play or after a draw.
    pub fn winner(&self) -> Option<&Player> {
        self.winner.as_ref()
    }

    /// True if the round ended with no winner.
    pub fn is_draw(&self) -> bool {
        self.is_complete && self.winner.is_none()
    }
}

/// Snapshot of the round in play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Moves made so far.
    moves: Vec<Move>,
    /// Whose turn it is, by move-count parity.
    current_player: Player,
    /// Win/draw status.
    status: GameStatus,
}

impl Game {
    /// Derives the snapshot for a move list.
    #[instrument(skip(moves, roster), fields(moves = moves.len()))]
    pub fn derive(moves: &[Move], roster: &Roster) -> Self {
        let board = Board::from_moves(moves);
        let outcome = rules::outcome(&board);
        let status = GameStatus {
            is_complete: outcome.is_some(),
            winner: outcome
                .and_then(|o| o.winner())
                .map(|id| roster.get(id).clone()),
        };

        Self {
            moves: moves.to_vec(),
            current_player: roster.get(PlayerId::for_move_count(moves.len())).clone(),
            status,
        }
    }

    /// Board built from the moves.
    pub fn board(&self) -> Board {
        Board::from_moves(&self.moves)
    }

    /// Outcome of the round, `None` while in play.
    pub fn outcome(&self) -> Option<Outcome> {
        match (self.status.is_complete, &self.status.winner) {
            (false, _) => None,
            (true, Some(winner)) => Some(Outcome::Winner(*winner.id())),
            (true, None) => Some(Outcome::Draw),
        }
    }
}

/// One player's win count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct PlayerStats {
    /// The player.
    #[serde(flatten)]
    player: Player,
    /// Rounds won.
    wins: usize,
}

/// Win and tie counts over a set of rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Per-player wins, player 1 first.
    player_with_stats: Vec<PlayerStats>,
    /// Rounds that ended with no winner.
    ties: usize,
}

impl Stats {
    /// Tallies wins and ties over `rounds`.
    #[instrument(skip(rounds, roster), fields(rounds = rounds.len()))]
    pub fn derive(rounds: &[Round], roster: &Roster) -> Self {
        let winners: Vec<Option<PlayerId>> = rounds.iter().map(Round::winner).collect();

        let player_with_stats = roster
            .players()
            .iter()
            .map(|player| PlayerStats {
                player: player.clone(),
                wins: winners
                    .iter()
                    .filter(|winner| **winner == Some(*player.id()))
                    .count(),
            })
            .collect();

        Self {
            player_with_stats,
            ties: winners.iter().filter(|winner| winner.is_none()).count(),
        }
    }

    /// Wins for one player.
    pub fn wins(&self, id: PlayerId) -> usize {
        self.player_with_stats
            .iter()
            .find(|stats| *stats.player.id() == id)
            .map(|stats| stats.wins)
            .unwrap_or(0)
    }
}
