//! Terminal input module (platform-facing).
//!
//! Maps `crossterm` events into platform-neutral [`InputEvent`](crate::types::InputEvent)
//! records and provides a polling [`CrosstermInput`] source for the runtime.
//! Nothing here knows about widgets; routing happens in the engine.

pub mod map;
pub mod source;

pub use tui_mastermind_engine as engine;
pub use tui_mastermind_types as types;

pub use map::{map_event, map_key_event, should_quit};
pub use source::CrosstermInput;
