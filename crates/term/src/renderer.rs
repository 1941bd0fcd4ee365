//! TerminalRenderer: flushes dirty cells of a screen buffer to a real terminal.
//!
//! The encoder walks the live region in row-major order and emits only cells
//! flagged `needs_flush`. Cursor and style escapes are emitted lazily, only
//! when the next dirty cell needs a different state than the one last sent.

use std::io::{self, Write};

use anyhow::Result;
use tracing::trace;

use crossterm::{cursor, event, terminal, QueueableCommand};

use crate::ansi;
use crate::screen::ScreenBuffer;
use crate::types::{Pos, Style, FLUSH_BUFFER_CAPACITY};

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    buf: Vec<u8>,
    mouse_capture: bool,
}

impl TerminalRenderer<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Render into an arbitrary sink. The working buffer is sized for the
    /// worst-case frame so flushes never reallocate.
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            buf: Vec::with_capacity(FLUSH_BUFFER_CAPACITY),
            mouse_capture: false,
        }
    }

    pub fn with_mouse_capture(mut self, enabled: bool) -> Self {
        self.mouse_capture = enabled;
        self
    }

    /// Raw mode, alternate screen, hidden cursor, cleared screen in the
    /// default style.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        if self.mouse_capture {
            self.buf.queue(event::EnableMouseCapture)?;
        }
        ansi::push_style(&mut self.buf, Style::default());
        self.buf.queue(terminal::Clear(terminal::ClearType::All))?;
        ansi::push_move_to(&mut self.buf, Pos::HOME);
        self.write_buf()?;
        Ok(())
    }

    /// Undo `enter`. Raw mode is dropped even when the restore sequence cannot
    /// be written.
    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        if self.mouse_capture {
            self.buf.queue(event::DisableMouseCapture)?;
        }
        self.buf.extend_from_slice(b"\x1b[0m");
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        let written = self.write_buf();
        terminal::disable_raw_mode()?;
        written
    }

    /// Encode every dirty live cell and write the result in one bulk write.
    ///
    /// Returns `false` (and performs no I/O) when nothing was dirty. Write
    /// errors are returned to the caller; nothing is retried.
    ///
    /// Flags are cleared only once the write has succeeded, so a failed flush
    /// can be retried and will emit the same cells again.
    pub fn flush(&mut self, screen: &mut ScreenBuffer) -> Result<bool> {
        self.buf.clear();
        let cells = encode_dirty(screen, &mut self.buf);
        if cells == 0 {
            return Ok(false);
        }
        trace!(cells, bytes = self.buf.len(), "flush");
        self.write_buf()?;
        clear_live_flags(screen);
        Ok(true)
    }

    /// Bytes produced by the most recent `enter`, `exit` or `flush` (empty when
    /// the last flush had nothing to emit).
    pub fn last_frame(&self) -> &[u8] {
        &self.buf
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    fn write_buf(&mut self) -> Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Encode the dirty cells of the live region into `out` and clear their flags.
///
/// Returns the number of cells emitted. When at least one cell was emitted the
/// output ends with a home reposition and the default style so the next frame
/// (or any other writer) starts from a known terminal state.
///
/// The first dirty cell always gets an explicit reposition: the terminal
/// cursor is not assumed to be anywhere in particular between frames.
pub fn encode_dirty_into(screen: &mut ScreenBuffer, out: &mut Vec<u8>) -> usize {
    let emitted = encode_dirty(screen, out);
    if emitted > 0 {
        clear_live_flags(screen);
    }
    emitted
}

fn encode_dirty(screen: &ScreenBuffer, out: &mut Vec<u8>) -> usize {
    let size = screen.clamped_size();
    let mut emitted_cursor: Option<Pos> = None;
    let mut emitted_style = Style::default();
    let mut emitted = 0usize;

    for row in 1..=size.height {
        for (i, cell) in screen.live_row(row).iter().enumerate() {
            if !cell.needs_flush {
                continue;
            }
            let target = Pos::new(row, i as u16 + 1);
            if emitted_cursor != Some(target) {
                ansi::push_move_to(out, target);
            }
            if cell.style != emitted_style {
                ansi::push_style(out, cell.style);
                emitted_style = cell.style;
            }
            ansi::push_char(out, cell.ch);
            // The terminal advances its own cursor after a glyph.
            emitted_cursor = Some(Pos::new(row, target.col + 1));
            emitted += 1;
        }
    }

    if emitted > 0 {
        ansi::push_move_to(out, Pos::HOME);
        ansi::push_style(out, Style::default());
    }

    debug_assert!(
        out.len() <= FLUSH_BUFFER_CAPACITY,
        "encoder produced {} bytes, bound is {}",
        out.len(),
        FLUSH_BUFFER_CAPACITY
    );
    emitted
}

/// Every dirty live cell was just emitted; mark them all clean.
fn clear_live_flags(screen: &mut ScreenBuffer) {
    for row in 1..=screen.clamped_size().height {
        for cell in screen.live_row_mut(row) {
            cell.needs_flush = false;
        }
    }
}
