//! The single-threaded frame loop.
//!
//! One tick:
//! 1. drain up to `INPUT_QUEUE_CAPACITY` platform inputs (non-blocking) and
//!    route each to the bus and the scheduler
//! 2. run the scheduler's frame pass
//! 3. reconcile a pending resize and mark every widget for redraw
//! 4. flush dirty cells, at most one physical write
//!
//! [`Runtime::run`] repeats ticks, sleeping out the remainder of each frame,
//! until a widget requests quit or an I/O error surfaces.

use std::io::Write;

use anyhow::Result;
use arrayvec::ArrayVec;

use crate::bus::EventBus;
use crate::config::RuntimeConfig;
use crate::pacer::FramePacer;
use crate::scheduler::WidgetScheduler;
use crate::term::{ResizeReconciler, ScreenBuffer, TerminalRenderer};
use crate::types::{Event, InputEvent, Scene, Size, INPUT_QUEUE_CAPACITY};

/// Non-blocking source of platform input records.
pub trait InputSource {
    /// Next pending input, or `None` when nothing is queued right now.
    fn poll_input(&mut self) -> Result<Option<InputEvent>>;
}

pub struct Runtime<W: Write> {
    pub screen: ScreenBuffer,
    pub bus: EventBus,
    pub scheduler: WidgetScheduler,
    pub resize: ResizeReconciler,
    renderer: TerminalRenderer<W>,
    pacer: FramePacer,
}

impl<W: Write> Runtime<W> {
    /// Build the context objects for a terminal of size `terminal`.
    ///
    /// The canvas starts fully dirty so the first flush paints every live cell.
    pub fn new(terminal: Size, renderer: TerminalRenderer<W>, config: &RuntimeConfig) -> Self {
        let mut screen = ScreenBuffer::new(terminal);
        screen.clear();
        Self {
            screen,
            bus: EventBus::new(),
            scheduler: WidgetScheduler::new(),
            resize: ResizeReconciler::new(terminal),
            renderer,
            pacer: FramePacer::new(config.frame),
        }
    }

    pub fn renderer(&self) -> &TerminalRenderer<W> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut TerminalRenderer<W> {
        &mut self.renderer
    }

    pub fn change_scene(&mut self, scene: Scene) {
        self.scheduler
            .change_scene(scene, &mut self.screen, &self.bus);
    }

    /// Route one input record. Returns whether a widget consumed it.
    ///
    /// Resize records are only recorded here; they take effect at the next
    /// reconcile step.
    pub fn route_input(&mut self, input: InputEvent) -> bool {
        let event = match input {
            InputEvent::Resize(size) => {
                self.resize.notify_resize(size);
                return false;
            }
            InputEvent::KeyDown(key) => Event::Key(key),
            InputEvent::MouseMove(pos) => Event::MouseMove(pos),
            InputEvent::MouseClick { pos, button } => Event::MouseClick { pos, button },
        };
        self.bus.trigger(&event);
        self.scheduler
            .dispatch_input(&input, &mut self.screen, &self.bus)
    }

    /// Run one loop iteration without pacing. Returns whether anything was
    /// written to the terminal.
    pub fn tick(&mut self, input: &mut impl InputSource) -> Result<bool> {
        let mut queue = ArrayVec::<InputEvent, INPUT_QUEUE_CAPACITY>::new();
        while !queue.is_full() {
            match input.poll_input()? {
                Some(ev) => queue.push(ev),
                None => break,
            }
        }
        for ev in queue {
            self.route_input(ev);
        }

        self.scheduler.run_frame(&mut self.screen, &self.bus);

        if let Some((old, new)) = self.resize.reconcile(&mut self.screen) {
            // Layouts may depend on the live size; repaint everything next frame.
            self.scheduler.request_redraw_all();
            self.bus.trigger(&Event::Resize { old, new });
            self.scheduler
                .dispatch_resize(old, new, &mut self.screen, &self.bus);
        }

        self.renderer.flush(&mut self.screen)
    }

    /// Enter the terminal session, [`run`](Self::run), then restore the
    /// terminal. The restore is attempted even when entering failed part-way;
    /// the first error is returned.
    pub fn run_session(&mut self, input: &mut impl InputSource) -> Result<()> {
        let result = self
            .renderer
            .enter()
            .and_then(|()| self.run(input));
        let restored = self.renderer.exit();
        result.and(restored)
    }

    /// Tick until a widget requests quit. I/O errors end the loop and are
    /// returned to the caller.
    pub fn run(&mut self, input: &mut impl InputSource) -> Result<()> {
        loop {
            self.tick(input)?;
            if self.scheduler.quit_requested() {
                return Ok(());
            }
            self.pacer.wait();
        }
    }
}
