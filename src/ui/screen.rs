use ratatui::{
    style::Style,
    text::{Line, Span},
};

use super::{bold, highlight_style, hint_style, outcome_color, GameView};
use crate::{
    game::{Answer, GameState, PracticeDecode},
    menu::{MAIN_MENU_ITEMS, PLAY_MENU_ITEMS, PRACTICE_MENU_ITEMS},
    morse::render_pattern,
};

/// A UI Screen boundary: turns the snapshot into the lines shown for one state
pub trait Screen {
    fn lines(&self, view: &GameView) -> Vec<Line<'static>>;
}

fn blank() -> Line<'static> {
    Line::from("")
}

fn score_line(score: u32) -> Line<'static> {
    Line::from(Span::styled(format!("Score: {}", score), highlight_style()))
}

fn menu_lines(title: &str, items: &[&str], selected: usize) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(title.to_string(), bold())), blank()];
    lines.extend(items.iter().enumerate().map(|(i, item)| {
        let style = if i == selected {
            highlight_style()
        } else {
            Style::default()
        };
        Line::from(Span::styled(item.to_string(), style))
    }));
    lines.push(blank());
    lines.push(Line::from(Span::styled(
        "UP/DOWN arrows to select, ENTER to confirm",
        hint_style(),
    )));
    lines
}

fn key_hint(keying_available: bool) -> Line<'static> {
    let text = if keying_available {
        "Hold SPACE to key"
    } else {
        "Keying needs a terminal that reports key releases"
    };
    Line::from(Span::styled(text, hint_style()))
}

pub struct MenuScreen;

impl Screen for MenuScreen {
    fn lines(&self, view: &GameView) -> Vec<Line<'static>> {
        let s = view.snapshot;
        match s.state {
            GameState::PlayMenu => menu_lines("PLAY MODE", &PLAY_MENU_ITEMS, s.play_menu_index),
            GameState::PracticeSubmenu => menu_lines(
                "PRACTICE MODE",
                &PRACTICE_MENU_ITEMS,
                s.practice_menu_index,
            ),
            _ => menu_lines("MORSE CODE GAME", &MAIN_MENU_ITEMS, s.main_menu_index),
        }
    }
}

pub struct SettingsScreen;

impl Screen for SettingsScreen {
    fn lines(&self, view: &GameView) -> Vec<Line<'static>> {
        vec![
            Line::from(Span::styled("SETTINGS", bold())),
            blank(),
            Line::from(Span::styled(
                format!("Input timeout: {} ms", view.snapshot.input_timeout_ms),
                highlight_style(),
            )),
            blank(),
            Line::from(Span::styled("LEFT/RIGHT to adjust", hint_style())),
        ]
    }
}

pub struct CountdownScreen;

impl Screen for CountdownScreen {
    fn lines(&self, view: &GameView) -> Vec<Line<'static>> {
        let label = view.snapshot.countdown_label.unwrap_or("");
        vec![Line::from(Span::styled(label, highlight_style()))]
    }
}

pub struct TransmitScreen;

impl Screen for TransmitScreen {
    fn lines(&self, view: &GameView) -> Vec<Line<'static>> {
        let s = view.snapshot;
        let target = s.target.map(String::from).unwrap_or_default();
        vec![
            score_line(s.score),
            blank(),
            Line::from(Span::styled(format!("Transmit: {}", target), bold())),
            blank(),
            Line::from(format!("Your input: {}", render_pattern(&s.keyed))),
            blank(),
            key_hint(view.snapshot.keying_available),
        ]
    }
}

pub struct ReceiveScreen;

impl Screen for ReceiveScreen {
    fn lines(&self, view: &GameView) -> Vec<Line<'static>> {
        let s = view.snapshot;
        let status = if s.pattern_playing {
            "Listening..."
        } else {
            "Type the character you heard"
        };
        vec![
            score_line(s.score),
            blank(),
            Line::from(Span::styled("Listen and type the character", bold())),
            blank(),
            Line::from(Span::styled(status, hint_style())),
        ]
    }
}

pub struct ResultScreen;

impl Screen for ResultScreen {
    fn lines(&self, view: &GameView) -> Vec<Line<'static>> {
        let s = view.snapshot;
        let Some(result) = &s.last_result else {
            return vec![score_line(s.score)];
        };

        let outcome = result.outcome.outcome;
        let target_pattern = view.pattern_for(result.target);
        let (answer, guess) = match &result.answer {
            Answer::Keyed(keyed) => (
                format!("Answer: {} ({})", target_pattern, result.target),
                format!("You sent: {}", render_pattern(keyed)),
            ),
            Answer::Typed(typed) => {
                let typed = typed.to_ascii_uppercase();
                (
                    format!("Answer: {} ({})", result.target, target_pattern),
                    format!("You guessed: {} ({})", typed, view.pattern_for(typed)),
                )
            }
        };

        vec![
            Line::from(Span::styled(
                outcome.to_string(),
                bold().fg(outcome_color(outcome)),
            )),
            blank(),
            Line::from(answer),
            Line::from(Span::styled(guess, hint_style())),
            blank(),
            score_line(s.score),
        ]
    }
}

pub struct FinalScoreScreen;

impl Screen for FinalScoreScreen {
    fn lines(&self, view: &GameView) -> Vec<Line<'static>> {
        vec![Line::from(Span::styled(
            format!("Final score: {}", view.snapshot.score),
            highlight_style(),
        ))]
    }
}

pub struct PracticeScreen;

impl Screen for PracticeScreen {
    fn lines(&self, view: &GameView) -> Vec<Line<'static>> {
        let s = view.snapshot;
        if s.state == GameState::PracticeCharToMorse {
            let shown = match s.practice_char {
                Some(c) => format!("{}  {}", c, view.pattern_for(c)),
                None => "?".to_string(),
            };
            return vec![
                Line::from(Span::styled("PRACTICE RECEIVING", bold())),
                blank(),
                Line::from(Span::styled(shown, highlight_style())),
                blank(),
                Line::from(Span::styled(
                    "Type a character to hear it",
                    hint_style(),
                )),
            ];
        }

        let decoded = match s.practice_decode {
            PracticeDecode::Waiting => "?".to_string(),
            PracticeDecode::Decoded(c) => c.to_string(),
            PracticeDecode::Invalid => "INVALID".to_string(),
        };
        vec![
            Line::from(Span::styled("PRACTICE TRANSMITTING", bold())),
            blank(),
            Line::from(format!("Your input: {}", render_pattern(&s.keyed))),
            Line::from(Span::styled(decoded, highlight_style())),
            blank(),
            key_hint(view.snapshot.keying_available),
        ]
    }
}

pub struct EmptyScreen;

impl Screen for EmptyScreen {
    fn lines(&self, _view: &GameView) -> Vec<Line<'static>> {
        Vec::new()
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: GameState) -> Box<dyn Screen> {
    match state {
        GameState::Menu | GameState::PlayMenu | GameState::PracticeSubmenu => Box::new(MenuScreen),
        GameState::Settings => Box::new(SettingsScreen),
        GameState::Countdown => Box::new(CountdownScreen),
        GameState::TransmitRound => Box::new(TransmitScreen),
        GameState::ReceiveRound => Box::new(ReceiveScreen),
        GameState::TransmitResult | GameState::ReceiveResult => Box::new(ResultScreen),
        GameState::FinalScore => Box::new(FinalScoreScreen),
        GameState::PracticeCharToMorse | GameState::PracticeMorseToChar => {
            Box::new(PracticeScreen)
        }
        GameState::Quit => Box::new(EmptyScreen),
    }
}
