//! Enumeration of the board's maximal lines and detection of connected runs.

use super::{PlayerMark, Position};

/// Length of a winning run.
pub const CONNECT: usize = 4;

/// Step toward the upper right.
pub const RISING: Position = Position::new(1, -1);
/// Step toward the lower right.
pub const FALLING: Position = Position::new(1, 1);

fn in_bounds(pos: Position, cols: usize, rows: usize) -> bool {
    pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < cols && (pos.y as usize) < rows
}

/// Every column, top to bottom.
pub fn columns(cols: usize, rows: usize) -> Vec<Vec<Position>> {
    (0..cols)
        .map(|x| (0..rows).map(|y| Position::new(x as i32, y as i32)).collect())
        .collect()
}

/// Every row, left to right.
pub fn rows(cols: usize, rows: usize) -> Vec<Vec<Position>> {
    (0..rows)
        .map(|y| (0..cols).map(|x| Position::new(x as i32, y as i32)).collect())
        .collect()
}

/// Walks from every cell in `step` direction and keeps the walks long enough
/// to hold a winning run. Walks from interior starting cells overlap with
/// longer ones; all of them are returned.
pub fn diagonals(cols: usize, rows: usize, step: Position) -> Vec<Vec<Position>> {
    let mut lines = Vec::new();
    for x in 0..cols {
        for y in 0..rows {
            let mut line = Vec::new();
            let mut pos = Position::new(x as i32, y as i32);
            while in_bounds(pos, cols, rows) {
                line.push(pos);
                pos = pos + step;
            }
            if line.len() >= CONNECT {
                lines.push(line);
            }
        }
    }
    lines
}

/// All lines of the four families: vertical, horizontal, rising, falling.
pub fn all_lines(cols: usize, rows: usize) -> Vec<Vec<Position>> {
    let mut lines = columns(cols, rows);
    lines.extend(self::rows(cols, rows));
    lines.extend(diagonals(cols, rows, RISING));
    lines.extend(diagonals(cols, rows, FALLING));
    lines
}

/// Scans a line in order and returns the mark of the first run of
/// [`CONNECT`] identical non-empty marks.
pub fn connected_run<I>(marks: I) -> Option<PlayerMark>
where
    I: IntoIterator<Item = PlayerMark>,
{
    let mut current = PlayerMark::Empty;
    let mut run = 0;
    for mark in marks {
        if mark.is_empty() {
            current = PlayerMark::Empty;
            run = 0;
            continue;
        }
        if mark == current {
            run += 1;
        } else {
            current = mark;
            run = 1;
        }
        if run >= CONNECT {
            return Some(current);
        }
    }
    None
}
