pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::{
    evaluator::Outcome,
    game::{GameState, Snapshot},
    morse::{render_pattern, MorseTable},
};

const HORIZONTAL_MARGIN: u16 = 2;
const FOOTER_HEIGHT: u16 = 1;

/// Renders one frame from a game snapshot
pub struct GameView<'a> {
    pub snapshot: &'a Snapshot,
    pub table: &'a MorseTable,
}

impl<'a> GameView<'a> {
    pub fn new(snapshot: &'a Snapshot, table: &'a MorseTable) -> Self {
        Self { snapshot, table }
    }

    /// `.-` text for `c`, or `?` if it has no encoding
    pub fn pattern_for(&self, c: char) -> String {
        self.table
            .encode(c)
            .map(render_pattern)
            .unwrap_or_else(|| "?".to_string())
    }
}

impl Widget for GameView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.snapshot.state == GameState::Quit {
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([Constraint::Min(1), Constraint::Length(FOOTER_HEIGHT)].as_ref())
            .split(area);

        let lines = screen::current_screen(self.snapshot.state).lines(&self);
        render_centered(lines, chunks[0], buf);
        footer(self.snapshot.state).render(chunks[1], buf);
    }
}

/// Draw `lines` centered horizontally and vertically inside `area`
fn render_centered(lines: Vec<Line<'static>>, area: Rect, buf: &mut Buffer) {
    let height = (lines.len() as u16).min(area.height);
    let top = area.y + (area.height - height) / 2;
    let target = Rect::new(area.x, top, area.width, height);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(target, buf);
}

fn footer(state: GameState) -> Paragraph<'static> {
    let text = match state {
        GameState::Menu | GameState::FinalScore => "ESC to exit",
        _ => "ESC to exit | BACKSPACE for menu",
    };
    Paragraph::new(Span::styled(text, hint_style())).alignment(Alignment::Left)
}

pub fn outcome_color(outcome: Outcome) -> Color {
    match outcome {
        Outcome::Correct => Color::Green,
        Outcome::WrongValid => Color::Red,
        Outcome::InvalidSequence => Color::Rgb(255, 165, 0),
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn highlight_style() -> Style {
    bold().fg(Color::Yellow)
}

fn hint_style() -> Style {
    Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC)
}
