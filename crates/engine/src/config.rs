//! Runtime configuration from environment variables.

use std::time::Duration;

use crate::types::DEFAULT_FRAME_MS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Minimum duration of one frame.
    pub frame: Duration,
    /// Ask the terminal to report mouse moves and clicks.
    pub mouse_capture: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            frame: Duration::from_millis(DEFAULT_FRAME_MS as u64),
            mouse_capture: true,
        }
    }
}

impl RuntimeConfig {
    /// Create from environment variables.
    ///
    /// - `MASTERMIND_FRAME_MS`: minimum frame duration in milliseconds
    /// - `MASTERMIND_MOUSE`: `1`/`true` or `0`/`false`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RuntimeConfig::from_env`] but reads through `lookup`.
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let frame = lookup("MASTERMIND_FRAME_MS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.frame);

        let mouse_capture = lookup("MASTERMIND_MOUSE")
            .and_then(|v| match v.trim().to_lowercase().as_str() {
                "1" | "true" | "on" => Some(true),
                "0" | "false" | "off" => Some(false),
                _ => None,
            })
            .unwrap_or(defaults.mouse_capture);

        Self {
            frame,
            mouse_capture,
        }
    }
}
