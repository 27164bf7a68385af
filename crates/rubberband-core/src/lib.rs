//! Core runtime for Rubberband
//!
//! A small single-threaded runtime: frame callbacks, an awaitable frame clock
//! and a local task executor. Gesture hooks and spring animations run as
//! cooperative tasks on this runtime and yield between frames.

mod frame_clock;
mod frame_driver;
mod platform;
mod runtime;

pub use frame_clock::{FrameCallbackRegistration, FrameClock, NextFrame};
pub use frame_driver::{FrameDriver, DEFAULT_FRAME_INTERVAL_NANOS};
pub use platform::{DefaultScheduler, RuntimeScheduler};
pub use runtime::{Runtime, RuntimeHandle, TaskHandle};

pub(crate) type FrameCallbackId = u64;

pub mod prelude {
    pub use crate::frame_clock::FrameClock;
    pub use crate::frame_driver::FrameDriver;
    pub use crate::runtime::{Runtime, RuntimeHandle};
}
