use std::path::Path;

use slog::{o, Discard, Logger};
use sloggers::file::FileLoggerBuilder;
use sloggers::types::Severity;
use sloggers::Build;

use crate::error::InitError;

/// Rotate the log once it grows past this many bytes
const ROTATE_SIZE: u64 = 10 * 1024 * 1024;

/// File logger; the terminal belongs to the UI so nothing goes to stderr
pub fn init_file_logger(path: &Path, level: Severity) -> Result<Logger, InitError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let logger = FileLoggerBuilder::new(path)
        .level(level)
        .rotate_size(ROTATE_SIZE)
        .build()?;
    Ok(logger)
}

/// Logger that drops everything
pub fn discard() -> Logger {
    Logger::root(Discard, o!())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slog::info;
    use tempfile::tempdir;

    #[test]
    fn creates_log_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("ditdah.log");
        let logger = init_file_logger(&path, Severity::Debug).unwrap();
        info!(logger, "hello"; "round" => 1);
        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn discard_logger_accepts_records() {
        let logger = discard();
        info!(logger, "ignored");
    }
}
