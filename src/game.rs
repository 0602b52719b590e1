use rand::seq::SliceRandom;
use rand::Rng;
use slog::{debug, info, warn, Logger};

use crate::accumulator::InputAccumulator;
use crate::audio::Audio;
use crate::config::{clamp_input_timeout_ms, Config, ConfigStore};
use crate::evaluator::{evaluate_receive, evaluate_transmit, RoundOutcome};
use crate::menu::{MenuCursor, MAIN_MENU_ITEMS, PLAY_MENU_ITEMS, PRACTICE_MENU_ITEMS};
use crate::morse::{MorseSymbol, MorseTable};

/// Length of the "3, 2, 1, GO!" lead-in
pub const COUNTDOWN_MS: u64 = 4000;
pub const COUNTDOWN_STEP_MS: u64 = 1000;
pub const RESULT_DISPLAY_MS: u64 = 2000;
pub const FINAL_SCORE_DISPLAY_MS: u64 = 2000;
/// Settings screen adjusts the input timeout by this much per key press
pub const TIMEOUT_STEP_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum GameState {
    Menu,
    PlayMenu,
    PracticeSubmenu,
    Settings,
    Countdown,
    TransmitRound,
    ReceiveRound,
    TransmitResult,
    ReceiveResult,
    FinalScore,
    PracticeCharToMorse,
    PracticeMorseToChar,
    Quit,
}

/// Which kind of scored round a session plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum RoundMode {
    Transmit,
    Receive,
}

impl RoundMode {
    fn round_state(self) -> GameState {
        match self {
            RoundMode::Transmit => GameState::TransmitRound,
            RoundMode::Receive => GameState::ReceiveRound,
        }
    }

    fn result_state(self) -> GameState {
        match self {
            RoundMode::Transmit => GameState::TransmitResult,
            RoundMode::Receive => GameState::ReceiveResult,
        }
    }
}

/// Where to go once the final score has been shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ExitDestination {
    Menu,
    Quit,
}

/// Keys the game reacts to. `Trigger` is the morse key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Trigger,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
}

/// What the player produced for a round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Keyed(Vec<MorseSymbol>),
    Typed(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    pub target: char,
    pub answer: Answer,
    pub outcome: RoundOutcome,
}

/// Morse -> character practice readout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeDecode {
    Waiting,
    Decoded(char),
    Invalid,
}

/// Read-only copy of everything the screen needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub state: GameState,
    pub score: u32,
    pub exit_to: Option<ExitDestination>,
    pub main_menu_index: usize,
    pub play_menu_index: usize,
    pub practice_menu_index: usize,
    pub countdown_label: Option<&'static str>,
    pub target: Option<char>,
    pub keyed: Vec<MorseSymbol>,
    pub last_result: Option<RoundResult>,
    pub practice_char: Option<char>,
    pub practice_decode: PracticeDecode,
    pub input_timeout_ms: u64,
    pub pattern_playing: bool,
    /// False when the terminal cannot report key releases
    pub keying_available: bool,
}

/// Countdown text for the time elapsed since the countdown began
pub fn countdown_label(elapsed_ms: u64) -> &'static str {
    match elapsed_ms / COUNTDOWN_STEP_MS {
        0 => "3",
        1 => "2",
        2 => "1",
        _ => "GO!",
    }
}

/// The game state machine. Owns all mutable game state; the UI only ever
/// sees a [`Snapshot`].
pub struct Game<A: Audio, R: Rng> {
    table: MorseTable,
    audio: A,
    rng: R,
    store: Box<dyn ConfigStore>,
    config: Config,
    /// Session-only timeout from the command line; never saved
    timeout_override: Option<u64>,
    logger: Logger,
    keying_available: bool,

    state: GameState,
    score: u32,
    exit_to: Option<ExitDestination>,

    main_menu: MenuCursor,
    play_menu: MenuCursor,
    practice_menu: MenuCursor,

    countdown_started_ms: u64,
    countdown_to: RoundMode,
    display_started_ms: u64,

    target: Option<char>,
    input: InputAccumulator,
    round_timeout_ms: u64,
    last_result: Option<RoundResult>,

    practice_char: Option<char>,
    practice_decode: PracticeDecode,
}

impl<A: Audio, R: Rng> Game<A, R> {
    pub fn new(
        table: MorseTable,
        audio: A,
        rng: R,
        store: Box<dyn ConfigStore>,
        logger: Logger,
    ) -> Self {
        let config = store.load();
        let round_timeout_ms = config.input_timeout_ms;
        Self {
            table,
            audio,
            rng,
            store,
            config,
            timeout_override: None,
            logger,
            keying_available: true,
            state: GameState::Menu,
            score: 0,
            exit_to: None,
            main_menu: MenuCursor::new(MAIN_MENU_ITEMS.len()),
            play_menu: MenuCursor::new(PLAY_MENU_ITEMS.len()),
            practice_menu: MenuCursor::new(PRACTICE_MENU_ITEMS.len()),
            countdown_started_ms: 0,
            countdown_to: RoundMode::Transmit,
            display_started_ms: 0,
            target: None,
            input: InputAccumulator::new(),
            round_timeout_ms,
            last_result: None,
            practice_char: None,
            practice_decode: PracticeDecode::Waiting,
        }
    }

    /// Use `ms` for this run without touching the saved preferences
    pub fn override_input_timeout_ms(&mut self, ms: u64) {
        self.timeout_override = Some(clamp_input_timeout_ms(ms));
    }

    /// Without key release events a press could never end, so the trigger
    /// key is ignored entirely.
    pub fn set_key_release_reporting(&mut self, available: bool) {
        self.keying_available = available;
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_finished(&self) -> bool {
        self.state == GameState::Quit
    }

    pub fn table(&self) -> &MorseTable {
        &self.table
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn input_timeout_ms(&self) -> u64 {
        self.timeout_override
            .unwrap_or(self.config.input_timeout_ms)
    }

    pub fn snapshot(&self, now_ms: u64) -> Snapshot {
        let countdown_label = (self.state == GameState::Countdown)
            .then(|| countdown_label(now_ms.saturating_sub(self.countdown_started_ms)));
        Snapshot {
            state: self.state,
            score: self.score,
            exit_to: self.exit_to,
            main_menu_index: self.main_menu.index(),
            play_menu_index: self.play_menu.index(),
            practice_menu_index: self.practice_menu.index(),
            countdown_label,
            target: self.target,
            keyed: self.input.symbols().to_vec(),
            last_result: self.last_result.clone(),
            practice_char: self.practice_char,
            practice_decode: self.practice_decode,
            input_timeout_ms: self.input_timeout_ms(),
            pattern_playing: self.audio.is_pattern_playback_active(),
            keying_available: self.keying_available,
        }
    }

    fn set_state(&mut self, next: GameState) {
        if self.state != next {
            debug!(self.logger, "state change"; "from" => %self.state, "to" => %next);
        }
        self.state = next;
    }

    /// Advance timers. Called once per frame.
    pub fn update(&mut self, now_ms: u64) {
        match self.state {
            GameState::Countdown => {
                if now_ms.saturating_sub(self.countdown_started_ms) >= COUNTDOWN_MS {
                    self.score = 0;
                    self.start_round(self.countdown_to);
                }
            }
            GameState::TransmitRound => {
                if self.keying_finished(now_ms) {
                    self.finish_transmit_round(now_ms);
                }
            }
            GameState::TransmitResult | GameState::ReceiveResult => {
                if now_ms.saturating_sub(self.display_started_ms) >= RESULT_DISPLAY_MS {
                    if self.exit_to.is_some() {
                        self.enter_final_score(now_ms);
                    } else if self.state == GameState::TransmitResult {
                        self.start_round(RoundMode::Transmit);
                    } else {
                        self.start_round(RoundMode::Receive);
                    }
                }
            }
            GameState::FinalScore => {
                if now_ms.saturating_sub(self.display_started_ms) >= FINAL_SCORE_DISPLAY_MS {
                    if self.exit_to == Some(ExitDestination::Quit) {
                        self.quit();
                    } else {
                        self.exit_to = None;
                        self.score = 0;
                        self.set_state(GameState::Menu);
                    }
                }
            }
            GameState::PracticeMorseToChar => {
                if self.keying_finished(now_ms) {
                    let keyed = self.input.drain();
                    self.practice_decode = match self.table.decode(&keyed) {
                        Some(c) => PracticeDecode::Decoded(c),
                        None => PracticeDecode::Invalid,
                    };
                }
            }
            GameState::Menu
            | GameState::PlayMenu
            | GameState::PracticeSubmenu
            | GameState::Settings
            | GameState::ReceiveRound
            | GameState::PracticeCharToMorse
            | GameState::Quit => {}
        }
    }

    pub fn handle_key(&mut self, key: Key, action: KeyAction, now_ms: u64) {
        match action {
            KeyAction::Press => self.on_press(key, now_ms),
            KeyAction::Release => self.on_release(key, now_ms),
        }
    }

    fn on_press(&mut self, key: Key, now_ms: u64) {
        match key {
            Key::Escape => return self.on_escape(now_ms),
            Key::Backspace => return self.on_backspace(now_ms),
            _ => {}
        }

        match self.state {
            GameState::Menu => match key {
                Key::Up => self.main_menu.up(),
                Key::Down => self.main_menu.down(),
                Key::Enter => match self.main_menu.index() {
                    0 => self.set_state(GameState::PlayMenu),
                    1 => self.set_state(GameState::PracticeSubmenu),
                    _ => self.set_state(GameState::Settings),
                },
                _ => {}
            },
            GameState::PlayMenu => match key {
                Key::Up => self.play_menu.up(),
                Key::Down => self.play_menu.down(),
                Key::Enter => {
                    self.countdown_to = match self.play_menu.index() {
                        0 => RoundMode::Receive,
                        _ => RoundMode::Transmit,
                    };
                    self.countdown_started_ms = now_ms;
                    self.set_state(GameState::Countdown);
                }
                _ => {}
            },
            GameState::PracticeSubmenu => match key {
                Key::Up => self.practice_menu.up(),
                Key::Down => self.practice_menu.down(),
                Key::Enter => match self.practice_menu.index() {
                    0 => {
                        self.practice_char = None;
                        self.set_state(GameState::PracticeCharToMorse);
                    }
                    _ => {
                        self.input.begin_round();
                        self.round_timeout_ms = self.input_timeout_ms();
                        self.practice_decode = PracticeDecode::Waiting;
                        self.set_state(GameState::PracticeMorseToChar);
                    }
                },
                _ => {}
            },
            GameState::Settings => match key {
                Key::Left => self.adjust_timeout(-(TIMEOUT_STEP_MS as i64)),
                Key::Right => self.adjust_timeout(TIMEOUT_STEP_MS as i64),
                _ => {}
            },
            GameState::TransmitRound | GameState::PracticeMorseToChar => {
                if key == Key::Trigger {
                    self.key_down(now_ms);
                }
            }
            GameState::ReceiveRound => {
                if let Key::Char(c) = key {
                    self.answer_receive_round(c, now_ms);
                }
            }
            GameState::PracticeCharToMorse => {
                if let Key::Char(c) = key {
                    if self.table.contains(c) {
                        let c = c.to_ascii_uppercase();
                        self.practice_char = Some(c);
                        self.audio.play_character_pattern(c);
                    }
                }
            }
            GameState::Countdown
            | GameState::TransmitResult
            | GameState::ReceiveResult
            | GameState::FinalScore
            | GameState::Quit => {}
        }
    }

    fn on_release(&mut self, key: Key, now_ms: u64) {
        if key != Key::Trigger {
            return;
        }
        let keying = matches!(
            self.state,
            GameState::TransmitRound | GameState::PracticeMorseToChar
        );
        if keying && self.input.is_pressing() {
            self.audio.stop_tone();
            self.input.on_press_end(now_ms);
        } else if self.audio.is_tone_active() {
            self.audio.stop_tone();
        }
    }

    /// A held key keeps the character open however long the gap before it was
    fn keying_finished(&self, now_ms: u64) -> bool {
        !self.input.is_pressing() && self.input.is_complete(now_ms, self.round_timeout_ms)
    }

    fn key_down(&mut self, now_ms: u64) {
        if !self.keying_available {
            return;
        }
        let busy = self.audio.is_tone_active() || self.audio.is_pattern_playback_active();
        if self.input.on_press_start(now_ms, busy) {
            self.audio.start_tone();
        }
    }

    fn on_escape(&mut self, now_ms: u64) {
        match self.state {
            GameState::TransmitRound | GameState::ReceiveRound => {
                self.exit_to = Some(ExitDestination::Quit);
                self.enter_final_score(now_ms);
            }
            _ => self.quit(),
        }
    }

    fn on_backspace(&mut self, now_ms: u64) {
        match self.state {
            GameState::TransmitRound
            | GameState::ReceiveRound
            | GameState::TransmitResult
            | GameState::ReceiveResult => {
                self.exit_to = Some(ExitDestination::Menu);
                self.enter_final_score(now_ms);
            }
            GameState::FinalScore => {
                self.exit_to = Some(ExitDestination::Menu);
            }
            GameState::PlayMenu | GameState::PracticeSubmenu | GameState::Settings => {
                self.play_menu.reset();
                self.practice_menu.reset();
                self.set_state(GameState::Menu);
            }
            GameState::PracticeCharToMorse | GameState::PracticeMorseToChar => {
                self.silence();
                self.input.begin_round();
                self.set_state(GameState::PracticeSubmenu);
            }
            GameState::Countdown => self.set_state(GameState::Menu),
            GameState::Menu | GameState::Quit => {}
        }
    }

    /// Pick a fresh target and reset per-round state
    fn start_round(&mut self, mode: RoundMode) {
        let target = self.table.chars().choose(&mut self.rng).copied();
        self.target = target;
        self.audio.stop_tone();
        self.input.begin_round();
        self.round_timeout_ms = self.input_timeout_ms();
        self.last_result = None;
        self.set_state(mode.round_state());

        if mode == RoundMode::Receive {
            if let Some(c) = target {
                self.audio.play_character_pattern(c);
            }
        }
    }

    fn finish_transmit_round(&mut self, now_ms: u64) {
        let keyed = self.input.drain();
        self.audio.stop_tone();
        self.input.begin_round();
        let Some(target) = self.target else {
            return;
        };
        let outcome = evaluate_transmit(&keyed, target, &self.table);
        self.record_result(target, Answer::Keyed(keyed), outcome, RoundMode::Transmit, now_ms);
    }

    fn answer_receive_round(&mut self, typed: char, now_ms: u64) {
        if self.audio.is_pattern_playback_active() {
            return;
        }
        let Some(target) = self.target else {
            return;
        };
        let outcome = evaluate_receive(typed, target, &self.table);
        self.record_result(target, Answer::Typed(typed), outcome, RoundMode::Receive, now_ms);
    }

    fn record_result(
        &mut self,
        target: char,
        answer: Answer,
        outcome: RoundOutcome,
        mode: RoundMode,
        now_ms: u64,
    ) {
        self.score += outcome.score_delta;
        info!(self.logger, "round finished";
            "mode" => %mode,
            "target" => %target,
            "outcome" => ?outcome.outcome,
            "score" => self.score);
        self.last_result = Some(RoundResult {
            target,
            answer,
            outcome,
        });
        self.display_started_ms = now_ms;
        self.set_state(mode.result_state());
    }

    fn enter_final_score(&mut self, now_ms: u64) {
        self.silence();
        self.input.begin_round();
        self.display_started_ms = now_ms;
        self.set_state(GameState::FinalScore);
    }

    fn adjust_timeout(&mut self, delta_ms: i64) {
        let current = self.input_timeout_ms();
        let next = clamp_input_timeout_ms((current as i64).saturating_add(delta_ms).max(0) as u64);
        if next == current {
            return;
        }
        if self.timeout_override.is_some() {
            self.timeout_override = Some(next);
            debug!(self.logger, "session timeout adjusted, not saved"; "input_timeout_ms" => next);
            return;
        }
        self.config.set_input_timeout_ms(next);
        if let Err(e) = self.store.save(&self.config) {
            warn!(self.logger, "cannot save settings"; "error" => %e);
        }
    }

    /// Stop anything audible; safe to call when nothing is playing
    fn silence(&mut self) {
        self.audio.stop_tone();
        self.audio.cancel_pattern();
    }

    fn quit(&mut self) {
        self.silence();
        self.set_state(GameState::Quit);
    }
}
