//! Non-blocking crossterm input source.

use std::time::Duration;

use anyhow::Result;
use crossterm::event;

use crate::engine::InputSource;
use crate::map::map_event;
use crate::types::InputEvent;

/// Polls the real terminal with a zero timeout.
#[derive(Debug, Default)]
pub struct CrosstermInput;

impl CrosstermInput {
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for CrosstermInput {
    fn poll_input(&mut self) -> Result<Option<InputEvent>> {
        // Skip events with no mapping instead of reporting an empty queue.
        while event::poll(Duration::ZERO)? {
            if let Some(input) = map_event(event::read()?) {
                return Ok(Some(input));
            }
        }
        Ok(None)
    }
}
