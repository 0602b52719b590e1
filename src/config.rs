use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;

pub const MIN_INPUT_TIMEOUT_MS: u64 = 100;
pub const MAX_INPUT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_INPUT_TIMEOUT_MS: u64 = 1000;

pub fn clamp_input_timeout_ms(ms: u64) -> u64 {
    ms.clamp(MIN_INPUT_TIMEOUT_MS, MAX_INPUT_TIMEOUT_MS)
}

/// User preferences. Fields missing from the file fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub input_timeout_ms: u64,
    pub tone_frequency_hz: f32,
    pub volume: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_timeout_ms: DEFAULT_INPUT_TIMEOUT_MS,
            tone_frequency_hz: 800.0,
            volume: 0.5,
        }
    }
}

impl Config {
    pub fn set_input_timeout_ms(&mut self, ms: u64) {
        self.input_timeout_ms = clamp_input_timeout_ms(ms);
    }

    /// Bring hand-edited values back into range
    pub fn sanitized(mut self) -> Self {
        self.input_timeout_ms = clamp_input_timeout_ms(self.input_timeout_ms);
        self.volume = self.volume.clamp(0.0, 1.0);
        if !self.tone_frequency_hz.is_finite() || self.tone_frequency_hz <= 0.0 {
            self.tone_frequency_hz = Config::default().tone_frequency_hz;
        }
        self
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("ditdah_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg.sanitized();
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

/// Store that keeps the config in memory only
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    config: std::cell::RefCell<Config>,
}

impl MemoryConfigStore {
    pub fn new(config: Config) -> Self {
        Self {
            config: std::cell::RefCell::new(config),
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Config {
        self.config.borrow().clone()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        *self.config.borrow_mut() = cfg.clone();
        Ok(())
    }
}
