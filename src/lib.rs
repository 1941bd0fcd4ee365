//! TUI Mastermind (workspace facade crate).
//!
//! This package exposes `tui_mastermind::{engine,input,term,types}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use tui_mastermind_engine as engine;
pub use tui_mastermind_input as input;
pub use tui_mastermind_term as term;
pub use tui_mastermind_types as types;
