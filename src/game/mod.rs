//! Core Connect Four rules: grid primitives, the board with win detection,
//! and the controller that runs a game.

mod board;
mod cell;
mod controller;
pub mod lines;
mod position;

pub use board::{AbstractBoard, Board, Grid, COLS, ROWS};
pub use cell::{Cell, PlayerMark};
pub use controller::{Controller, GameEvent, GameMode, GameState, NetworkRole, Outcome, Side};
pub use position::Position;
