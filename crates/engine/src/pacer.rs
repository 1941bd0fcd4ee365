use std::thread;
use std::time::{Duration, Instant};

/// Bounds the refresh rate by holding each frame to a minimum duration.
#[derive(Debug, Clone)]
pub struct FramePacer {
    frame: Duration,
    frame_start: Instant,
}

impl FramePacer {
    pub fn new(frame: Duration) -> Self {
        Self {
            frame,
            frame_start: Instant::now(),
        }
    }

    /// Mark `now` as the start of a frame.
    pub fn begin_frame(&mut self, now: Instant) {
        self.frame_start = now;
    }

    /// Time left in the current frame as of `now`.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.frame
            .saturating_sub(now.saturating_duration_since(self.frame_start))
    }

    /// Sleep out the rest of the frame, then start the next one.
    ///
    /// This is the only blocking wait in the frame loop.
    pub fn wait(&mut self) {
        let left = self.remaining(Instant::now());
        if !left.is_zero() {
            thread::sleep(left);
        }
        self.begin_frame(Instant::now());
    }
}
