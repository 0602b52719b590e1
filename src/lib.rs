// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod accumulator;
pub mod app_dirs;
pub mod audio;
pub mod config;
pub mod decoder;
pub mod error;
pub mod evaluator;
pub mod game;
pub mod logging;
pub mod menu;
pub mod morse;
pub mod runtime;
pub mod ui;
