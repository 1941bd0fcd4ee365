//! ScreenBuffer: the fixed-capacity virtual canvas.
//!
//! Widgets draw through a small cursor + active-style write API. Every written
//! cell is flagged `needs_flush`; the encoder later emits exactly those cells.
//! Writes never compare against the previous content, so rewriting identical
//! text still costs bytes on the next flush.

use std::fmt;

use crate::types::{Cell, Pos, Size, Style, CANVAS_CELLS, CANVAS_MAX_HEIGHT, CANVAS_MAX_WIDTH};

/// Row-major grid of styled cells bounded by [`Size::CANVAS_MAX`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenBuffer {
    cells: Vec<Cell>,
    clamped: Size,
    cursor: Pos,
    // Set after writing the last canvas column, where the cursor cannot advance.
    row_full: bool,
    style: Style,
}

impl ScreenBuffer {
    /// Create a canvas for a terminal of the given size.
    ///
    /// The full grid is allocated up front; only `min(terminal, canvas max)` is live.
    pub fn new(terminal: Size) -> Self {
        Self {
            cells: vec![Cell::default(); CANVAS_CELLS],
            clamped: terminal.clamp_to_canvas(),
            cursor: Pos::HOME,
            row_full: false,
            style: Style::default(),
        }
    }

    pub fn canvas_size(&self) -> Size {
        Size::CANVAS_MAX
    }

    /// The live region considered by flushes.
    pub fn clamped_size(&self) -> Size {
        self.clamped
    }

    pub(crate) fn set_clamped_size(&mut self, size: Size) {
        self.clamped = size.clamp_to_canvas();
    }

    /// Write cursor. Always inside the canvas; after a write reaches the live
    /// width it sits one column past it, or on the last canvas column when the
    /// live width is the full canvas width.
    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    pub fn style(&self) -> Style {
        self.style
    }

    #[inline(always)]
    fn idx(&self, pos: Pos) -> Option<usize> {
        if !Size::CANVAS_MAX.contains(pos) {
            return None;
        }
        Some(((pos.row - 1) as usize) * (CANVAS_MAX_WIDTH as usize) + ((pos.col - 1) as usize))
    }

    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.idx(pos).map(|i| self.cells[i])
    }

    pub fn is_dirty(&self, pos: Pos) -> bool {
        self.get(pos).map(|c| c.needs_flush).unwrap_or(false)
    }

    /// Number of flagged cells anywhere in the grid, including cells outside
    /// the live region.
    pub fn dirty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.needs_flush).count()
    }

    /// Move the write cursor.
    ///
    /// Positions outside the canvas are a caller bug: this panics in debug
    /// builds and clamps in release builds.
    pub fn set_cursor(&mut self, pos: Pos) {
        debug_assert!(
            Size::CANVAS_MAX.contains(pos),
            "cursor {:?} outside canvas {}x{}",
            pos,
            CANVAS_MAX_WIDTH,
            CANVAS_MAX_HEIGHT
        );
        self.cursor = Pos {
            row: pos.row.clamp(1, CANVAS_MAX_HEIGHT),
            col: pos.col.clamp(1, CANVAS_MAX_WIDTH),
        };
        self.row_full = false;
    }

    /// Style applied to subsequent writes.
    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    /// Write one scalar at the cursor and advance it.
    ///
    /// Returns `false` without touching anything once the cursor has passed the
    /// live width. After the last live column further writes on that row are
    /// dropped until the cursor is moved.
    pub fn put_char(&mut self, ch: char) -> bool {
        if self.row_full || self.cursor.col > self.clamped.width {
            return false;
        }
        let Some(i) = self.idx(self.cursor) else {
            return false;
        };
        self.cells[i] = Cell {
            ch,
            style: self.style,
            needs_flush: true,
        };
        if self.cursor.col == CANVAS_MAX_WIDTH {
            self.row_full = true;
        } else {
            self.cursor.col += 1;
        }
        true
    }

    /// Write `text` at the cursor, one scalar per cell, using the active style.
    ///
    /// Stops silently at the live width (no wrap, no newline handling) and
    /// returns the number of scalars written.
    pub fn write(&mut self, text: &str) -> usize {
        let mut written = 0;
        for ch in text.chars() {
            if !self.put_char(ch) {
                break;
            }
            written += 1;
        }
        written
    }

    /// `write!` support. Formats straight into cells without allocating.
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> usize {
        let mut sink = CellSink {
            screen: self,
            written: 0,
        };
        // An error here only means the row filled up.
        let _ = fmt::write(&mut sink, args);
        sink.written
    }

    /// Position the cursor, switch style, and write in one call.
    pub fn write_at(&mut self, pos: Pos, style: Style, text: &str) -> usize {
        self.set_cursor(pos);
        self.set_style(style);
        self.write(text)
    }

    /// Fill a rectangle with `ch` in the active style, clipped like `write`.
    /// The cursor is left where it was.
    pub fn fill_rect(&mut self, origin: Pos, size: Size, ch: char) {
        let saved = (self.cursor, self.row_full);
        let last_row = origin
            .row
            .saturating_add(size.height.saturating_sub(1))
            .min(CANVAS_MAX_HEIGHT);
        if size.height > 0 {
            for row in origin.row..=last_row {
                self.set_cursor(Pos::new(row, origin.col));
                for _ in 0..size.width {
                    if !self.put_char(ch) {
                        break;
                    }
                }
            }
        }
        (self.cursor, self.row_full) = saved;
    }

    /// Reset every cell to the default and flag all of them, forcing a full
    /// repaint on the next flush.
    pub fn clear(&mut self) {
        self.cells.fill(Cell {
            needs_flush: true,
            ..Cell::default()
        });
    }

    pub(crate) fn mark_dirty(&mut self, pos: Pos) {
        if let Some(i) = self.idx(pos) {
            self.cells[i].needs_flush = true;
        }
    }

    fn live_range(&self, row: u16) -> std::ops::Range<usize> {
        debug_assert!(row >= 1 && row <= self.clamped.height);
        let start = ((row - 1) as usize) * (CANVAS_MAX_WIDTH as usize);
        start..start + self.clamped.width as usize
    }

    /// Live cells of one row (1-indexed).
    pub(crate) fn live_row(&self, row: u16) -> &[Cell] {
        &self.cells[self.live_range(row)]
    }

    pub(crate) fn live_row_mut(&mut self, row: u16) -> &mut [Cell] {
        let range = self.live_range(row);
        &mut self.cells[range]
    }
}

struct CellSink<'a> {
    screen: &'a mut ScreenBuffer,
    written: usize,
}

impl fmt::Write for CellSink<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if !self.screen.put_char(ch) {
                return Err(fmt::Error);
            }
            self.written += 1;
        }
        Ok(())
    }
}
