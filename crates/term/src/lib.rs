//! Terminal compositor module.
//!
//! This is a small, game-oriented compositing layer for terminal UIs.
//! Widgets write into a fixed-capacity [`ScreenBuffer`]; once per frame the
//! [`TerminalRenderer`] turns the cells touched since the last flush into a
//! single buffer of VT escape sequences and writes it in one call.
//!
//! Goals:
//! - Keep the canvas pure (no I/O) and testable
//! - Emit cursor and style escapes only when they change
//! - Survive terminal resizes without repainting the whole canvas

pub mod ansi;
pub mod renderer;
pub mod resize;
pub mod screen;

pub use tui_mastermind_types as types;

pub use renderer::{encode_dirty_into, TerminalRenderer};
pub use resize::{ResizeListener, ResizeReconciler};
pub use screen::ScreenBuffer;
