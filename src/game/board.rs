use std::collections::HashMap;
use std::fmt;

use super::lines;
use super::{Cell, PlayerMark, Position};
use crate::error::{BoardParseError, MoveError};

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Read-only occupancy queries shared by the live board and its snapshots.
pub trait Grid {
    fn cols(&self) -> usize;
    fn rows(&self) -> usize;

    /// Mark at `pos`; positions off the grid read as empty.
    fn mark_at(&self, pos: Position) -> PlayerMark;

    /// Lowest empty row of a column, searching from the bottom.
    fn lowest_empty_row(&self, column: usize) -> Option<usize> {
        if column >= self.cols() {
            return None;
        }
        (0..self.rows())
            .rev()
            .find(|&row| self.mark_at(Position::new(column as i32, row as i32)).is_empty())
    }

    /// Check if every cell is occupied
    fn is_full(&self) -> bool {
        (0..self.cols()).all(|col| self.lowest_empty_row(col).is_none())
    }

    /// Mark of the first run of four found along any line, if any.
    fn connected_four(&self) -> Option<PlayerMark> {
        lines::all_lines(self.cols(), self.rows())
            .iter()
            .find_map(|line| lines::connected_run(line.iter().map(|&pos| self.mark_at(pos))))
    }

    fn has_connected_four(&self) -> bool {
        self.connected_four().is_some()
    }

    /// Columns with at least one empty cell, ascending.
    fn legal_columns(&self) -> Vec<usize> {
        (0..self.cols())
            .filter(|&col| self.lowest_empty_row(col).is_some())
            .collect()
    }
}

fn grid_positions(cols: usize, rows: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..cols).flat_map(move |col| (0..rows).map(move |row| (col, row)))
}

/// The live game grid. Owns one [`Cell`] per coordinate, created once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cols: usize,
    rows: usize,
    cells: HashMap<Position, Cell>,
}

impl Board {
    /// Create a new empty 7x6 board
    pub fn new() -> Self {
        Self::with_size(COLS, ROWS)
    }

    pub fn with_size(cols: usize, rows: usize) -> Self {
        let cells = grid_positions(cols, rows)
            .map(|(col, row)| {
                let cell = Cell::new(col, row);
                (cell.position(), cell)
            })
            .collect();
        Board { cols, rows, cells }
    }

    /// Build a board from text rows, top row first. `.` is empty, `X` is
    /// player one and `O` is player two. Gravity is not enforced.
    pub fn from_rows(text: &[&str]) -> Result<Self, BoardParseError> {
        let rows = text.len();
        let cols = text.first().map(|line| line.chars().count()).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(BoardParseError::Empty);
        }
        let mut board = Board::with_size(cols, rows);
        for (row, line) in text.iter().enumerate() {
            if line.chars().count() != cols {
                return Err(BoardParseError::Ragged { row, expected: cols });
            }
            for (col, symbol) in line.chars().enumerate() {
                let mark = PlayerMark::from_symbol(symbol)
                    .ok_or(BoardParseError::UnknownSymbol { row, col, symbol })?;
                if !mark.is_empty() {
                    if let Some(cell) = board.cells.get_mut(&Position::new(col as i32, row as i32)) {
                        cell.occupy(mark).map_err(|_| BoardParseError::UnknownSymbol { row, col, symbol })?;
                    }
                }
            }
        }
        Ok(board)
    }

    /// Get the cell at a position, `None` if it is off the grid.
    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(&pos)
    }

    /// Drop a piece for `mark` into a column. Returns the row it landed on.
    /// A full column leaves the board untouched.
    pub fn drop(&mut self, column: usize, mark: PlayerMark) -> Result<usize, MoveError> {
        if column >= self.cols {
            return Err(MoveError::InvalidColumn(column));
        }
        if mark.is_empty() {
            return Err(MoveError::UnsupportedPlayerMark(mark));
        }
        let row = self
            .lowest_empty_row(column)
            .ok_or(MoveError::ColumnFull(column))?;
        self.cells
            .get_mut(&Position::new(column as i32, row as i32))
            .ok_or(MoveError::InvalidColumn(column))?
            .occupy(mark)?;
        Ok(row)
    }

    /// Detached copy of the occupancy for speculative play.
    pub fn snapshot(&self) -> AbstractBoard {
        AbstractBoard {
            cols: self.cols,
            rows: self.rows,
            marks: self
                .cells
                .iter()
                .map(|(&pos, cell)| (pos, cell.occupant()))
                .collect(),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid for Board {
    fn cols(&self) -> usize {
        self.cols
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn mark_at(&self, pos: Position) -> PlayerMark {
        self.cells
            .get(&pos)
            .map(Cell::occupant)
            .unwrap_or(PlayerMark::Empty)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(self, f)
    }
}

fn write_grid(grid: &impl Grid, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for row in 0..grid.rows() {
        if row > 0 {
            writeln!(f)?;
        }
        for col in 0..grid.cols() {
            let mark = grid.mark_at(Position::new(col as i32, row as i32));
            write!(f, "{}", mark.symbol())?;
        }
    }
    Ok(())
}

/// Occupancy-only copy of a [`Board`]. Mutating it never touches the live game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbstractBoard {
    cols: usize,
    rows: usize,
    marks: HashMap<Position, PlayerMark>,
}

impl AbstractBoard {
    /// Speculatively drop a piece. Same contract as [`Board::drop`].
    pub fn drop(&mut self, column: usize, mark: PlayerMark) -> Result<usize, MoveError> {
        if column >= self.cols {
            return Err(MoveError::InvalidColumn(column));
        }
        if mark.is_empty() {
            return Err(MoveError::UnsupportedPlayerMark(mark));
        }
        let row = self
            .lowest_empty_row(column)
            .ok_or(MoveError::ColumnFull(column))?;
        self.marks
            .insert(Position::new(column as i32, row as i32), mark);
        Ok(row)
    }
}

impl Grid for AbstractBoard {
    fn cols(&self) -> usize {
        self.cols
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn mark_at(&self, pos: Position) -> PlayerMark {
        self.marks.get(&pos).copied().unwrap_or(PlayerMark::Empty)
    }
}

impl fmt::Display for AbstractBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(self, f)
    }
}
