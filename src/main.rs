use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
    tty::IsTty,
};
use ditdah::{
    app_dirs::AppDirs,
    audio::{Audio, PlaybackTiming, SilentAudio},
    config::{Config, ConfigStore, FileConfigStore},
    game::Game,
    logging,
    morse::MorseTable,
    runtime::{map_key, Clock, CrosstermEventSource, FixedTicker, MonotonicClock, Runner, TrainerEvent},
    ui::GameView,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use slog::{info, warn, Logger};
use sloggers::types::Severity;
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};

const TICK_RATE_HZ: u32 = 60;

/// learn morse code in the terminal: key characters with the space bar or copy them by ear
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// inactivity (ms) after the last dot/dash before a keyed character is judged, 100-5000
    #[clap(short = 't', long)]
    timeout_ms: Option<u64>,

    /// config file to use instead of the default location
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// where to write the log file
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// seed for target selection, for repeatable sessions
    #[clap(long)]
    seed: Option<u64>,

    /// log at debug level
    #[clap(long)]
    debug: bool,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .or_else(AppDirs::log_path)
            .unwrap_or_else(|| PathBuf::from("ditdah.log"))
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(feature = "sound")]
fn open_audio(table: &MorseTable, config: &Config, logger: &Logger) -> Box<dyn Audio> {
    use ditdah::audio::DeviceAudio;

    match DeviceAudio::open(
        table.clone(),
        PlaybackTiming::default(),
        config.tone_frequency_hz,
        config.volume,
    ) {
        Ok(audio) => {
            info!(logger, "audio device opened");
            Box::new(audio)
        }
        Err(e) => {
            warn!(logger, "audio device unavailable, running silent"; "error" => e);
            Box::new(SilentAudio::new(table.clone(), PlaybackTiming::default()))
        }
    }
}

#[cfg(not(feature = "sound"))]
fn open_audio(table: &MorseTable, _config: &Config, logger: &Logger) -> Box<dyn Audio> {
    warn!(logger, "built without the `sound` feature, running silent");
    Box::new(SilentAudio::new(table.clone(), PlaybackTiming::default()))
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let severity = if cli.debug {
        Severity::Debug
    } else {
        Severity::Info
    };
    let logger = logging::init_file_logger(&cli.log_path(), severity)?;
    info!(logger, "=============== START NEW SESSION ===============");

    let store = cli.config_store();
    let config = store.load();
    let table = MorseTable::new();
    let audio = open_audio(&table, &config, &logger);

    let mut game = Game::new(table, audio, cli.rng(), Box::new(store), logger.clone());
    if let Some(ms) = cli.timeout_ms {
        game.override_input_timeout_ms(ms);
    }
    info!(logger, "session settings"; "input_timeout_ms" => game.input_timeout_ms());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Key releases are only reported with the enhancement protocol
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    } else {
        warn!(logger, "terminal does not report key releases, keying disabled");
    }
    game.set_key_release_reporting(enhanced);

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut game);

    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        warn!(logger, "exiting with error"; "error" => %e);
    }
    info!(logger, "Exiting..."; "score" => game.score());
    result
}

fn start_tui<B: Backend, A: Audio, R: Rng>(
    terminal: &mut Terminal<B>,
    game: &mut Game<A, R>,
) -> Result<(), Box<dyn Error>> {
    let clock = MonotonicClock::new();
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::from_hz(TICK_RATE_HZ));

    loop {
        match runner.step() {
            TrainerEvent::Key(key) => {
                if let Some((key, action)) = map_key(&key) {
                    game.handle_key(key, action, clock.now_ms());
                }
            }
            TrainerEvent::Resize | TrainerEvent::Tick => {}
        }

        // Timers advance on every pass, not only when the ticker fires
        let now = clock.now_ms();
        game.update(now);

        if game.is_finished() {
            break;
        }

        let snapshot = game.snapshot(now);
        terminal.draw(|f| f.render_widget(GameView::new(&snapshot, game.table()), f.area()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["ditdah"]);

        assert_eq!(cli.timeout_ms, None);
        assert_eq!(cli.config, None);
        assert_eq!(cli.log_file, None);
        assert_eq!(cli.seed, None);
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_timeout_and_seed() {
        let cli = Cli::parse_from(["ditdah", "-t", "750", "--seed", "42"]);

        assert_eq!(cli.timeout_ms, Some(750));
        assert_eq!(cli.seed, Some(42));
    }

    #[test]
    fn test_cli_paths() {
        let cli = Cli::parse_from([
            "ditdah",
            "--config",
            "/tmp/ditdah.json",
            "--log-file",
            "/tmp/ditdah.log",
        ]);

        assert_eq!(
            cli.config_store().path().to_path_buf(),
            PathBuf::from("/tmp/ditdah.json")
        );
        assert_eq!(cli.log_path(), PathBuf::from("/tmp/ditdah.log"));
    }

    #[test]
    fn test_seeded_rng_is_repeatable() {
        let cli = Cli::parse_from(["ditdah", "--seed", "9"]);
        let a: u64 = cli.rng().gen();
        let b: u64 = cli.rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_non_numeric_timeout() {
        assert!(Cli::try_parse_from(["ditdah", "-t", "soon"]).is_err());
    }

    #[test]
    fn test_tick_rate_constant() {
        assert_eq!(TICK_RATE_HZ, 60);
    }
}
