//! Terminal Mastermind runner (default binary).
//!
//! Sets up the terminal session, installs the demo widget set on the
//! runtime, and runs the frame loop until a widget asks to quit.

mod demo;

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use tui_mastermind::engine::{Runtime, RuntimeConfig};
use tui_mastermind::input::CrosstermInput;
use tui_mastermind::term::TerminalRenderer;
use tui_mastermind::types::Size;

fn main() -> Result<()> {
    init_logging()?;
    let config = RuntimeConfig::from_env();

    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    let renderer = TerminalRenderer::new().with_mouse_capture(config.mouse_capture);
    let mut runtime = Runtime::new(Size::new(w, h), renderer, &config);
    demo::install(&mut runtime);

    runtime.run_session(&mut CrosstermInput::new())
}

/// Log to `MASTERMIND_LOG_PATH` when set. Stdout belongs to the canvas, so
/// without a path nothing is installed.
fn init_logging() -> Result<()> {
    let Some(path) = std::env::var("MASTERMIND_LOG_PATH")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path))?;
    let filter = EnvFilter::try_from_env("MASTERMIND_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
