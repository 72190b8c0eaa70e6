use serde::{Deserialize, Serialize};

use super::Position;
use crate::error::MoveError;

/// Occupant of a grid slot. A bot-controlled side plays as `Player2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerMark {
    #[default]
    Empty,
    Player1,
    Player2,
}

impl PlayerMark {
    /// The opposing mark. `Empty` has no opponent.
    pub fn opponent(self) -> PlayerMark {
        match self {
            PlayerMark::Player1 => PlayerMark::Player2,
            PlayerMark::Player2 => PlayerMark::Player1,
            PlayerMark::Empty => PlayerMark::Empty,
        }
    }

    pub fn is_empty(self) -> bool {
        self == PlayerMark::Empty
    }

    /// Single-character form used by text fixtures and logs.
    pub fn symbol(self) -> char {
        match self {
            PlayerMark::Empty => '.',
            PlayerMark::Player1 => 'X',
            PlayerMark::Player2 => 'O',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<PlayerMark> {
        match symbol {
            '.' => Some(PlayerMark::Empty),
            'X' => Some(PlayerMark::Player1),
            'O' => Some(PlayerMark::Player2),
            _ => None,
        }
    }
}

/// One slot of the board.
///
/// The occupant only ever moves from `Empty` to a player mark; a cell is
/// never cleared during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    column: usize,
    row: usize,
    occupant: PlayerMark,
}

impl Cell {
    pub fn new(column: usize, row: usize) -> Self {
        Cell {
            column,
            row,
            occupant: PlayerMark::Empty,
        }
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn position(&self) -> Position {
        Position::new(self.column as i32, self.row as i32)
    }

    pub fn occupant(&self) -> PlayerMark {
        self.occupant
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_empty()
    }

    /// Mark an empty cell with a player.
    pub fn occupy(&mut self, mark: PlayerMark) -> Result<(), MoveError> {
        if mark.is_empty() {
            return Err(MoveError::UnsupportedPlayerMark(mark));
        }
        if !self.is_empty() {
            return Err(MoveError::CellOccupied {
                column: self.column,
                row: self.row,
            });
        }
        self.occupant = mark;
        Ok(())
    }
}
