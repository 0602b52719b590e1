// Minimal integration test that drives the compiled binary through a PTY.
// This exercises the real event loop and crossterm input handling across
// the main boundaries without relying on internal modules.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Marked Unix-only and ignored by default to avoid CI/platform issues.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn escape_from_menu_exits() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("ditdah");
    let dir = tempfile::tempdir()?;
    let cmd = format!(
        "{} --config {} --log-file {}",
        bin.display(),
        dir.path().join("config.json").display(),
        dir.path().join("ditdah.log").display()
    );

    let mut p = spawn(cmd)?;

    // Give the app a moment to initialize the terminal/alternate screen
    std::thread::sleep(Duration::from_millis(300));

    p.send("\x1b")?; // ESC

    p.expect(Eof)?;
    Ok(())
}

#[test]
#[ignore]
fn settings_change_is_saved() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("ditdah");
    let dir = tempfile::tempdir()?;
    let config = dir.path().join("config.json");
    let cmd = format!(
        "{} --config {} --log-file {}",
        bin.display(),
        config.display(),
        dir.path().join("ditdah.log").display()
    );

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(300));

    // Up wraps to Settings, then one step right
    p.send("\x1b[A")?;
    std::thread::sleep(Duration::from_millis(50));
    p.send("\r")?;
    std::thread::sleep(Duration::from_millis(50));
    p.send("\x1b[C")?;
    std::thread::sleep(Duration::from_millis(200));
    p.send("\x1b")?;
    p.expect(Eof)?;

    let saved = std::fs::read_to_string(&config)?;
    assert!(saved.contains("1100"));
    Ok(())
}
