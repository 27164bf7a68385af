//! Platform abstraction for the frame runtime.
//!
//! The host decides when frames happen. The runtime only asks for one.

/// Schedules work for the runtime.
///
/// Implementations are responsible for triggering frame processing on behalf
/// of the runtime. They must be safe to use from multiple threads because
/// task wakers may fire from anywhere.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}

/// Scheduler for hosts that pump frames themselves (tests, headless drivers).
#[derive(Default)]
pub struct DefaultScheduler;

impl RuntimeScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}
