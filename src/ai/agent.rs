use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{evaluator, Difficulty};
use crate::game::Board;

/// Something that picks a column for the side it controls.
pub trait Agent {
    /// Select a column from the non-empty `legal_columns`.
    fn select_column(&mut self, board: &Board, legal_columns: &[usize]) -> usize;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}

/// The rule-based bot, one of four difficulty tiers.
pub struct BotAgent {
    difficulty: Difficulty,
    rng: StdRng,
}

impl BotAgent {
    pub fn new(difficulty: Difficulty) -> Self {
        BotAgent {
            difficulty,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic bot for reproducible games.
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        BotAgent {
            difficulty,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

impl Agent for BotAgent {
    fn select_column(&mut self, board: &Board, legal_columns: &[usize]) -> usize {
        let start = Instant::now();
        let column = evaluator::choose_move(self.difficulty, board, legal_columns, &mut self.rng);
        tracing::debug!(
            difficulty = %self.difficulty,
            column,
            elapsed_us = start.elapsed().as_micros() as u64,
            "bot move calculated"
        );
        column
    }

    fn name(&self) -> &str {
        self.difficulty.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Grid, PlayerMark};

    #[test]
    fn test_bot_selects_legal_column() {
        let mut agent = BotAgent::new(Difficulty::Easy);
        let board = Board::new();
        let legal = board.legal_columns();

        for _ in 0..100 {
            let column = agent.select_column(&board, &legal);
            assert!(legal.contains(&column), "Column {} is not legal", column);
        }
    }

    #[test]
    fn test_seeded_bots_agree() {
        let board = Board::new();
        let legal = board.legal_columns();
        let mut a = BotAgent::with_seed(Difficulty::Extreme, 11);
        let mut b = BotAgent::with_seed(Difficulty::Extreme, 11);
        for _ in 0..20 {
            assert_eq!(a.select_column(&board, &legal), b.select_column(&board, &legal));
        }
    }

    #[test]
    fn test_bots_play_full_game() {
        let mut first = BotAgent::with_seed(Difficulty::Hard, 1);
        let mut second = BotAgent::with_seed(Difficulty::Extreme, 2);
        let mut board = Board::new();
        let mut mark = PlayerMark::Player1;

        while !board.is_full() && !board.has_connected_four() {
            let legal = board.legal_columns();
            let agent = if mark == PlayerMark::Player1 { &mut first } else { &mut second };
            let column = agent.select_column(&board, &legal);
            board.drop(column, mark).unwrap();
            mark = mark.opponent();
        }

        assert!(board.is_full() || board.has_connected_four());
    }

    #[test]
    fn test_bot_name() {
        assert_eq!(BotAgent::new(Difficulty::Medium).name(), "Medium");
        assert_eq!(BotAgent::new(Difficulty::Hard).difficulty(), Difficulty::Hard);
    }
}
