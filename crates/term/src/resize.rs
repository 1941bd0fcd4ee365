//! Resize reconciliation between the real terminal and the canvas.
//!
//! Resize notifications only record the incoming size. The change is applied
//! once per tick by [`ResizeReconciler::reconcile`], which updates the live
//! region and forces a repaint of cells that re-enter it. Cells that leave the
//! live region keep their content and flags; they are simply not scanned.

use tracing::debug;

use crate::screen::ScreenBuffer;
use crate::types::{Pos, Size};

/// Callback invoked with `(old, new)` terminal sizes after reconciliation.
pub type ResizeListener = Box<dyn FnMut(Size, Size)>;

pub struct ResizeReconciler {
    last_known: Size,
    incoming: Size,
    listeners: Vec<ResizeListener>,
}

impl ResizeReconciler {
    pub fn new(initial: Size) -> Self {
        Self {
            last_known: initial,
            incoming: initial,
            listeners: Vec::new(),
        }
    }

    /// Terminal size as of the last reconciliation.
    pub fn last_known(&self) -> Size {
        self.last_known
    }

    pub fn is_pending(&self) -> bool {
        self.incoming != self.last_known
    }

    /// Record a terminal size report. Returns `false` when it matches the size
    /// already recorded.
    pub fn notify_resize(&mut self, size: Size) -> bool {
        if size == self.incoming {
            return false;
        }
        self.incoming = size;
        true
    }

    pub fn add_listener(&mut self, listener: impl FnMut(Size, Size) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Apply a pending resize to `screen`.
    ///
    /// Every cell inside the new live region but outside the old one is
    /// flagged for flush: what the terminal shows there may be stale relative
    /// to writes made while the cell was out of view. Returns `(old, new)`
    /// terminal sizes when a change was applied.
    pub fn reconcile(&mut self, screen: &mut ScreenBuffer) -> Option<(Size, Size)> {
        if !self.is_pending() {
            return None;
        }
        let old = self.last_known;
        let new = self.incoming;

        let old_live = screen.clamped_size();
        let new_live = new.clamp_to_canvas();

        let mut forced = 0usize;
        for row in 1..=new_live.height {
            let first_col = if row > old_live.height {
                1
            } else {
                old_live.width + 1
            };
            for col in first_col..=new_live.width {
                screen.mark_dirty(Pos::new(row, col));
                forced += 1;
            }
        }
        screen.set_clamped_size(new_live);
        self.last_known = new;

        debug!(
            old_w = old_live.width,
            old_h = old_live.height,
            new_w = new_live.width,
            new_h = new_live.height,
            forced,
            "resize reconciled"
        );

        for listener in &mut self.listeners {
            listener(old, new);
        }
        Some((old, new))
    }
}
