//! Terminal UI: renders the board and feeds key presses to the game controller.

mod app;
mod game_view;

pub use app::App;
