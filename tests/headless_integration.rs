use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::{rngs::StdRng, SeedableRng};

use ditdah::audio::RecordingAudio;
use ditdah::config::{Config, MemoryConfigStore};
use ditdah::evaluator::Outcome;
use ditdah::game::{Game, GameState, COUNTDOWN_MS, RESULT_DISPLAY_MS};
use ditdah::logging;
use ditdah::morse::{MorseSymbol, MorseTable};
use ditdah::runtime::{
    map_key, Clock, FixedTicker, ManualClock, Runner, TestEventSource, TrainerEvent,
};

type HeadlessGame = Game<RecordingAudio, StdRng>;

fn new_game(timeout_ms: u64) -> HeadlessGame {
    let config = Config {
        input_timeout_ms: timeout_ms,
        ..Config::default()
    };
    Game::new(
        MorseTable::new(),
        RecordingAudio::new(),
        StdRng::seed_from_u64(2024),
        Box::new(MemoryConfigStore::new(config)),
        logging::discard(),
    )
}

fn press(code: KeyCode) -> TrainerEvent {
    TrainerEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn release(code: KeyCode) -> TrainerEvent {
    TrainerEvent::Key(KeyEvent::new_with_kind(
        code,
        KeyModifiers::NONE,
        KeyEventKind::Release,
    ))
}

/// Feed one event through the runner exactly like the binary's loop does
fn pump(
    runner: &Runner<TestEventSource, FixedTicker>,
    game: &mut HeadlessGame,
    clock: &ManualClock,
) {
    if let TrainerEvent::Key(key) = runner.step() {
        if let Some((key, action)) = map_key(&key) {
            game.handle_key(key, action, clock.now_ms());
        }
    }
    game.update(clock.now_ms());
}

// Headless integration using the runtime + Game without a TTY.
// Keys the target of a transmit round and checks it is scored.
#[test]
fn headless_transmit_round_scores() {
    let mut game = new_game(300);
    let clock = ManualClock::new(0);
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    // Menu -> Play -> Transmit
    for ev in [press(KeyCode::Enter), press(KeyCode::Down), press(KeyCode::Enter)] {
        tx.send(ev).unwrap();
        pump(&runner, &mut game, &clock);
    }
    assert_eq!(game.state(), GameState::Countdown);

    clock.advance(COUNTDOWN_MS);
    pump(&runner, &mut game, &clock);
    assert_eq!(game.state(), GameState::TransmitRound);

    let target = game.snapshot(clock.now_ms()).target.unwrap();
    let symbols = game.table().encode(target).unwrap().to_vec();
    for symbol in symbols {
        tx.send(press(KeyCode::Char(' '))).unwrap();
        pump(&runner, &mut game, &clock);
        clock.advance(match symbol {
            MorseSymbol::Dot => 60,
            MorseSymbol::Dash => 320,
        });
        tx.send(release(KeyCode::Char(' '))).unwrap();
        pump(&runner, &mut game, &clock);
        clock.advance(80);
    }

    clock.advance(300);
    pump(&runner, &mut game, &clock);

    let snap = game.snapshot(clock.now_ms());
    assert_eq!(snap.state, GameState::TransmitResult);
    assert_eq!(snap.score, 1);
    assert_eq!(snap.last_result.unwrap().outcome.outcome, Outcome::Correct);

    clock.advance(RESULT_DISPLAY_MS);
    pump(&runner, &mut game, &clock);
    assert_eq!(game.state(), GameState::TransmitRound);
    assert_eq!(game.score(), 1);
}

#[test]
fn headless_receive_round_and_escape() {
    let mut game = new_game(1000);
    let clock = ManualClock::new(0);
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    // Menu -> Play -> Receive
    for ev in [press(KeyCode::Enter), press(KeyCode::Enter)] {
        tx.send(ev).unwrap();
        pump(&runner, &mut game, &clock);
    }
    clock.advance(COUNTDOWN_MS);
    pump(&runner, &mut game, &clock);
    assert_eq!(game.state(), GameState::ReceiveRound);

    let target = game.snapshot(clock.now_ms()).target.unwrap();
    assert_eq!(game.audio().played, vec![target]);
    game.audio_mut().finish_pattern();

    tx.send(press(KeyCode::Char(target.to_ascii_lowercase())))
        .unwrap();
    pump(&runner, &mut game, &clock);
    assert_eq!(game.state(), GameState::ReceiveResult);
    assert_eq!(game.score(), 1);

    clock.advance(RESULT_DISPLAY_MS);
    pump(&runner, &mut game, &clock);
    assert_eq!(game.state(), GameState::ReceiveRound);

    tx.send(press(KeyCode::Esc)).unwrap();
    pump(&runner, &mut game, &clock);
    assert_eq!(game.state(), GameState::FinalScore);
    assert_eq!(game.snapshot(clock.now_ms()).score, 1);

    clock.advance(2000);
    pump(&runner, &mut game, &clock);
    assert!(game.is_finished());
    assert!(!game.audio().pattern_active);
}

#[test]
fn headless_ticks_without_input_leave_menu_alone() {
    let mut game = new_game(1000);
    let clock = ManualClock::new(0);
    let (_tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    for _ in 0..20u32 {
        clock.advance(500);
        pump(&runner, &mut game, &clock);
    }
    assert_eq!(game.state(), GameState::Menu);
}
