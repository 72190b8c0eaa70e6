//! Move selection for the bot side.
//!
//! Every trial move is played on a [`Board::snapshot`], the live board is
//! never touched. Candidate checks walk the columns in ascending order and
//! stop at the first hit, so whenever no randomness is involved the leftmost
//! qualifying column wins.

use rand::Rng;

use super::Difficulty;
use crate::game::{Board, Grid, PlayerMark};

/// Mark the human plays with against the bot.
pub const HUMAN: PlayerMark = PlayerMark::Player1;
/// Mark the bot occupies cells with.
pub const BOT: PlayerMark = PlayerMark::Player2;

/// Pick a column for the bot.
///
/// `legal_columns` must not be empty; check [`Grid::legal_columns`] or
/// [`Grid::is_full`] first.
pub fn choose_move<R: Rng + ?Sized>(
    difficulty: Difficulty,
    board: &Board,
    legal_columns: &[usize],
    rng: &mut R,
) -> usize {
    assert!(!legal_columns.is_empty(), "No legal columns available");

    if difficulty >= Difficulty::Hard {
        if let Some(column) = first_completing(board, legal_columns, BOT) {
            return column;
        }
    }

    if difficulty == Difficulty::Extreme {
        let safe: Vec<usize> = legal_columns
            .iter()
            .copied()
            .filter(|&column| is_safe_column(board, column))
            .collect();
        if !safe.is_empty() {
            return first_completing(board, &safe, HUMAN)
                .unwrap_or_else(|| random_column(&safe, rng));
        }
        // Every column loses on the reply; block what can still be blocked.
        tracing::debug!("no safe column, falling back to blocking");
    }

    if difficulty >= Difficulty::Medium {
        if let Some(column) = first_completing(board, legal_columns, HUMAN) {
            return column;
        }
    }

    random_column(legal_columns, rng)
}

fn random_column<R: Rng + ?Sized>(columns: &[usize], rng: &mut R) -> usize {
    columns[rng.random_range(0..columns.len())]
}

/// First column in `candidates` where dropping `mark` completes a four for `mark`.
pub fn first_completing(board: &Board, candidates: &[usize], mark: PlayerMark) -> Option<usize> {
    candidates
        .iter()
        .copied()
        .find(|&column| completes_four(board, column, mark))
}

/// Whether dropping `mark` into `column` gives `mark` a connected four.
pub fn completes_four(board: &Board, column: usize, mark: PlayerMark) -> bool {
    let mut trial = board.snapshot();
    trial.drop(column, mark).is_ok() && trial.connected_four() == Some(mark)
}

/// A column is safe when the bot playing it does not let the human win by
/// dropping on top of it in the same column.
pub fn is_safe_column(board: &Board, column: usize) -> bool {
    let mut trial = board.snapshot();
    if trial.drop(column, BOT).is_err() {
        return false;
    }
    if trial.connected_four() == Some(BOT) || trial.is_full() {
        return true;
    }
    if trial.drop(column, HUMAN).is_err() {
        return true;
    }
    trial.connected_four() != Some(HUMAN)
}
