use crate::ai::Difficulty;
use crate::error::GameError;
use crate::game::{Controller, GameEvent, GameMode, Grid, Outcome, PlayerMark};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use std::io;

use super::game_view::{self, View};

pub struct App {
    controller: Controller,
    selected_column: usize,
    hover: Option<(usize, PlayerMark)>,
    should_quit: bool,
    message: Option<String>,
    /// Tier for the next solo game, picked with the number keys.
    next_difficulty: Option<Difficulty>,
    connection_lost: bool,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        let mut app = App {
            selected_column: controller.board().cols() / 2, // Start in middle
            controller,
            hover: None,
            should_quit: false,
            message: None,
            next_difficulty: None,
            connection_lost: false,
        };
        app.controller.hover(app.selected_column);
        app.process_events();
        app
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            if self.controller.awaiting_remote() && !self.connection_lost {
                self.message = Some("Waiting for the opponent's move...".to_string());
            }
            terminal
                .draw(|f| self.render(f))
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

            if self.should_quit {
                break;
            }

            if self.controller.awaiting_remote() && !self.connection_lost {
                self.receive_remote_move();
                continue;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    fn handle_key(&mut self, key: KeyEvent) {
        // Clear message on any key press
        if !self.connection_lost {
            self.message = None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                if self.selected_column > 0 {
                    self.select(self.selected_column - 1);
                }
            }
            KeyCode::Right => {
                if self.selected_column + 1 < self.controller.board().cols() {
                    self.select(self.selected_column + 1);
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece();
            }
            KeyCode::Char('r') => {
                self.replay();
            }
            KeyCode::Char(c @ '1'..='4') => {
                self.pick_difficulty(c as usize - '1' as usize);
            }
            _ => {}
        }
    }

    fn select(&mut self, column: usize) {
        self.controller.clear_hover(self.selected_column);
        self.selected_column = column;
        self.controller.hover(column);
        self.process_events();
    }

    /// Drop piece in selected column
    fn drop_piece(&mut self) {
        if self.connection_lost {
            self.message = Some("Connection lost. Press 'q' to quit.".to_string());
            return;
        }
        if self.controller.is_over() {
            self.message = Some("Game over! Press 'r' to play again.".to_string());
            return;
        }

        match self.controller.submit_move(self.selected_column) {
            Ok(true) => {}
            Ok(false) => {
                self.message = Some("Column is full!".to_string());
            }
            Err(e) => self.fail(e),
        }
        self.process_events();
        self.controller.hover(self.selected_column);
        self.process_events();
    }

    fn receive_remote_move(&mut self) {
        match self.controller.await_remote_move() {
            Ok(_) => self.message = None,
            Err(e) => self.fail(e),
        }
        self.process_events();
        self.controller.hover(self.selected_column);
        self.process_events();
    }

    fn fail(&mut self, error: GameError) {
        tracing::warn!(%error, "move failed");
        if matches!(error, GameError::Network(_)) {
            self.connection_lost = true;
        }
        self.message = Some(error.to_string());
    }

    fn pick_difficulty(&mut self, tier: usize) {
        if !matches!(self.controller.mode(), GameMode::Solo(_)) {
            return;
        }
        if let Some(&difficulty) = Difficulty::ALL.get(tier) {
            self.next_difficulty = Some(difficulty);
            self.message = Some(format!("Next game: {difficulty}"));
        }
    }

    /// Start a new game once the current one is over.
    fn replay(&mut self) {
        if !self.controller.is_over() || self.connection_lost {
            return;
        }
        let finished = std::mem::replace(&mut self.controller, Controller::local());
        self.controller = match self.next_difficulty.take() {
            Some(difficulty) => Controller::solo(difficulty),
            None => finished.replay(),
        };
        self.hover = None;
        self.message = Some("New game started!".to_string());
        self.controller.hover(self.selected_column);
        self.process_events();
    }

    fn process_events(&mut self) {
        for event in self.controller.drain_events() {
            match event {
                GameEvent::EntryHover { column, mark: Some(mark) } => {
                    self.hover = Some((column, mark));
                }
                GameEvent::EntryHover { column, mark: None } => {
                    if self.hover.is_some_and(|(c, _)| c == column) {
                        self.hover = None;
                    }
                }
                GameEvent::GameOver(outcome) => {
                    self.message = Some(match outcome {
                        Outcome::Win(side) => format!("{} wins!", side.name()),
                        Outcome::Draw => "It's a draw!".to_string(),
                    });
                }
                GameEvent::CellChanged { .. } => {}
            }
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let view = View {
            controller: &self.controller,
            selected_column: self.selected_column,
            hover: self.hover,
            message: &self.message,
        };
        game_view::render(frame, &view);
    }
}
