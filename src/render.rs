//! Text rendering of a store snapshot.
//!
//! Declarative: every render starts from [`Game`] and [`Stats`] alone and
//! produces the whole screen.

use crate::games::tictactoe::Player;
use crate::store::{Game, Stats};

/// `"Player 1 (X): 2 wins | Ties: 1 | Player 2 (O): 0 wins"`.
pub fn scoreboard(stats: &Stats) -> String {
    let mut parts: Vec<String> = stats
        .player_with_stats()
        .iter()
        .map(|entry| {
            format!(
                "{} ({}): {} {}",
                entry.player().name(),
                entry.player().icon(),
                entry.wins(),
                if *entry.wins() == 1 { "win" } else { "wins" }
            )
        })
        .collect();

    let ties = format!(
        "{} {}",
        stats.ties(),
        if *stats.ties() == 1 { "tie" } else { "ties" }
    );
    // Ties sit between the two players.
    let insert_at = parts.len().min(1);
    parts.insert(insert_at, ties);
    parts.join(" | ")
}

/// `"Player 1 (X), it's your turn!"`.
pub fn turn_indicator(player: &Player) -> String {
    format!("{} ({}), it's your turn!", player.name(), player.icon())
}

/// `"Player 1 wins!"`, `"Tie!"`, or `None` while the round is in play.
pub fn outcome_message(game: &Game) -> Option<String> {
    if !game.status().is_complete() {
        return None;
    }
    Some(match game.status().winner() {
        Some(winner) => format!("{} wins!", winner.name()),
        None => "Tie!".to_string(),
    })
}

/// Scoreboard, board, then the outcome or whose turn it is.
pub fn render(game: &Game, stats: &Stats) -> String {
    let mut out = String::new();
    out.push_str(&scoreboard(stats));
    out.push_str("\n\n");

    let stats_players = stats.player_with_stats();
    let board = game.board().display_with(|id| {
        stats_players
            .iter()
            .find(|entry| *entry.player().id() == id)
            .map(|entry| entry.player().icon().clone())
            .unwrap_or_else(|| id.to_string())
    });
    out.push_str(&board);
    out.push_str("\n\n");

    match outcome_message(game) {
        Some(message) => {
            out.push_str(&message);
            out.push_str(" Start a new round to play again.");
        }
        None => out.push_str(&turn_indicator(game.current_player())),
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Roster;
    use crate::games::tictactoe::{Move, PlayerId, Position};
    use crate::store::Round;

    fn moves(squares: &[usize]) -> Vec<Move> {
        squares
            .iter()
            .enumerate()
            .map(|(i, &sq)| {
                Move::new(
                    PlayerId::for_move_count(i),
                    Position::from_index(sq).unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_scoreboard_puts_ties_in_the_middle() {
        let roster = Roster::default();
        let rounds = vec![Round::new(moves(&[0, 4, 1, 5, 2]))];
        let stats = Stats::derive(&rounds, &roster);
        assert_eq!(
            scoreboard(&stats),
            "Player 1 (X): 1 win | 0 ties | Player 2 (O): 0 wins"
        );
    }

    #[test]
    fn test_render_in_progress_shows_turn() {
        let roster = Roster::default();
        let game = Game::derive(&moves(&[4]), &roster);
        let stats = Stats::derive(&[], &roster);
        let text = render(&game, &stats);
        assert!(text.contains(" 0 | 1 | 2 "));
        assert!(text.contains(" 3 | X | 5 "));
        assert!(text.ends_with("Player 2 (O), it's your turn!\n"));
    }

    #[test]
    fn test_render_win_and_tie_messages() {
        let roster = Roster::default();
        let won = Game::derive(&moves(&[0, 4, 1, 5, 2]), &roster);
        assert_eq!(outcome_message(&won).as_deref(), Some("Player 1 wins!"));

        let tied = Game::derive(&moves(&[0, 1, 2, 4, 3, 5, 7, 6, 8]), &roster);
        assert_eq!(outcome_message(&tied).as_deref(), Some("Tie!"));
    }
}
