//! Deterministic frame pump for headless hosts and tests.

use crate::runtime::RuntimeHandle;
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

/// ~60 FPS.
pub const DEFAULT_FRAME_INTERVAL_NANOS: u64 = 16_666_667;

/// Drives a runtime with synthetic, evenly spaced frame timestamps.
///
/// Each [`advance`](FrameDriver::advance) runs pending UI work, fires the frame
/// callbacks for the next timestamp and then lets woken tasks continue.
pub struct FrameDriver {
    runtime: RuntimeHandle,
    frame_time_nanos: u64,
    interval_nanos: u64,
    frames: u64,
}

impl FrameDriver {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self::with_interval(runtime, DEFAULT_FRAME_INTERVAL_NANOS)
    }

    pub fn with_interval(runtime: RuntimeHandle, interval_nanos: u64) -> Self {
        Self {
            runtime,
            frame_time_nanos: 0,
            interval_nanos: interval_nanos.max(1),
            frames: 0,
        }
    }

    /// Number of frames produced so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_idle(&self) -> bool {
        !self.runtime.has_frame_callbacks() && !self.runtime.has_pending_ui()
    }

    pub fn advance(&mut self) {
        self.runtime.drain_ui();
        self.frame_time_nanos += self.interval_nanos;
        self.frames += 1;
        self.runtime.drain_frame_callbacks(self.frame_time_nanos);
        self.runtime.drain_ui();
    }

    /// Pumps frames until nothing is waiting on the clock. Returns the number of frames run.
    pub fn run_until_idle(&mut self, max_frames: usize) -> usize {
        self.runtime.drain_ui();
        let mut count = 0;
        while count < max_frames && !self.is_idle() {
            self.advance();
            count += 1;
        }
        if !self.is_idle() {
            log::warn!("frame driver gave up after {max_frames} frames with work still pending");
        }
        count
    }

    /// Spawns `future` on the runtime and pumps frames until it resolves.
    ///
    /// Returns `None` when the future did not finish within `max_frames`.
    pub fn run_to_completion<F>(&mut self, future: F, max_frames: usize) -> Option<F::Output>
    where
        F: Future + 'static,
        F::Output: 'static,
    {
        let slot = Rc::new(RefCell::new(None));
        let output = Rc::clone(&slot);
        let handle = self.runtime.spawn_ui(async move {
            let value = future.await;
            *output.borrow_mut() = Some(value);
        })?;

        self.runtime.drain_ui();
        let mut count = 0;
        while slot.borrow().is_none() && count < max_frames {
            self.advance();
            count += 1;
        }

        let result = slot.borrow_mut().take();
        if result.is_none() {
            handle.cancel();
        }
        result
    }
}
