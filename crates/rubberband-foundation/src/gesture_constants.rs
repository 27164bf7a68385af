//! Shared gesture constants for consistent touch/pointer handling.
//!
//! Values are in logical pixels.

/// Drag threshold in logical pixels.
///
/// Pointer travel below this is treated as jitter, not as the start of a drag.
/// Matches Android's ViewConfiguration touch slop on a baseline density.
pub const DRAG_THRESHOLD: f32 = 8.0;

/// Maximum fling velocity in logical pixels per second.
///
/// Matches Android's default maximum fling velocity (ViewConfiguration) on a
/// baseline density.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;
