use crate::game::{Controller, GameMode, Grid, NetworkRole, PlayerMark, Position, Side};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Everything the game screen draws.
pub struct View<'a> {
    pub controller: &'a Controller,
    pub selected_column: usize,
    pub hover: Option<(usize, PlayerMark)>,
    pub message: &'a Option<String>,
}

const PIECE: &str = " \u{25cf} ";

fn mark_color(mark: PlayerMark) -> Color {
    match mark {
        PlayerMark::Empty => Color::DarkGray,
        PlayerMark::Player1 => Color::Magenta,
        PlayerMark::Player2 => Color::Yellow,
    }
}

fn mode_label(mode: GameMode) -> String {
    match mode {
        GameMode::Local => "Local two-player".to_string(),
        GameMode::Solo(difficulty) => format!("Versus computer ({difficulty})"),
        GameMode::Network(NetworkRole::Host) => "Network (hosting)".to_string(),
        GameMode::Network(NetworkRole::Join) => "Network (joined)".to_string(),
    }
}

pub fn render(frame: &mut Frame, view: &View) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(12),   // Board
            Constraint::Length(3), // Message
            Constraint::Length(4), // Controls
        ])
        .split(frame.area());

    render_header(frame, view.controller, chunks[0]);
    render_board(frame, view, chunks[1]);
    render_message(frame, view.message, chunks[2]);
    render_controls(frame, view.controller.mode(), chunks[3]);
}

fn render_header(frame: &mut Frame, controller: &Controller, area: Rect) {
    let mode = mode_label(controller.mode());
    let (status, color) = match controller.active_side() {
        None => (format!("Game Over  |  {mode}"), Color::White),
        Some(side) => {
            let suffix = match (controller.mode(), controller.is_local_turn()) {
                (GameMode::Network(_), true) => " (you)",
                (GameMode::Network(_), false) => " (opponent)",
                _ => "",
            };
            (
                format!("Current Player: {}{suffix}  |  {mode}", side.name()),
                mark_color(side.mark()),
            )
        }
    };

    let header = Paragraph::new(status)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Connect Four"));

    frame.render_widget(header, area);
}

fn render_board(frame: &mut Frame, view: &View, area: Rect) {
    let board = view.controller.board();
    let cols = board.cols();
    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")];
    for col in 0..cols {
        let label = format!(" {} ", col + 1);
        if col == view.selected_column {
            col_line.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(label));
        }
    }
    col_line.push(Span::raw("  "));
    lines.push(Line::from(col_line));

    // Entry row: the piece about to be dropped
    let mut entry_line = vec![Span::raw("   ")];
    for col in 0..cols {
        match view.hover {
            Some((hovered, mark)) if hovered == col => {
                entry_line.push(Span::styled(PIECE, Style::default().fg(mark_color(mark))));
            }
            _ => entry_line.push(Span::raw("   ")),
        }
    }
    entry_line.push(Span::raw("  "));
    lines.push(Line::from(entry_line));

    let rule = "═".repeat(cols * 3 + 1);
    lines.push(Line::from(format!("  ╔{rule}╗")));

    for row in 0..board.rows() {
        let mut row_spans = vec![Span::raw("  ║")];
        for col in 0..cols {
            let mark = board.mark_at(Position::new(col as i32, row as i32));
            let symbol = if mark.is_empty() { " . " } else { PIECE };
            row_spans.push(Span::styled(symbol, Style::default().fg(mark_color(mark))));
        }
        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from(format!("  ╚{rule}╝")));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_message(frame: &mut Frame, message: &Option<String>, area: Rect) {
    let text = message.as_deref().unwrap_or("");
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, mode: GameMode, area: Rect) {
    let line1 = Line::from("←/→: Move  |  Enter: Drop  |  R: Play again  |  Q: Quit");
    let line2 = match mode {
        GameMode::Solo(_) => Line::from("Next game difficulty: 1 Easy  2 Medium  3 Hard  4 Extreme"),
        _ => Line::from(vec![
            Span::styled(
                Side::Player1.name(),
                Style::default()
                    .fg(mark_color(PlayerMark::Player1))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" vs "),
            Span::styled(
                Side::Player2.name(),
                Style::default()
                    .fg(mark_color(PlayerMark::Player2))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    };

    let controls = Paragraph::new(vec![line1, line2])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Difficulty;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn rendered(view: &View) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 24)).unwrap();
        terminal.draw(|f| render(f, view)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_renders_header_and_message() {
        let controller = Controller::solo(Difficulty::Hard);
        let message = Some("Column is full!".to_string());
        let text = rendered(&View {
            controller: &controller,
            selected_column: 3,
            hover: Some((3, PlayerMark::Player1)),
            message: &message,
        });
        assert!(text.contains("Current Player: Player 1"));
        assert!(text.contains("Versus computer (Hard)"));
        assert!(text.contains("Column is full!"));
    }

    #[test]
    fn test_renders_game_over() {
        let mut controller = Controller::local();
        for _ in 0..3 {
            controller.submit_move(0).unwrap();
            controller.submit_move(1).unwrap();
        }
        controller.submit_move(0).unwrap();
        let text = rendered(&View {
            controller: &controller,
            selected_column: 0,
            hover: None,
            message: &None,
        });
        assert!(text.contains("Game Over"));
    }
}
