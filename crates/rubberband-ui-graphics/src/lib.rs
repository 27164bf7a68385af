//! Pure math/data for Rubberband
//!
//! Offsets, velocities and rectangles shared by the gesture, animation and
//! overscroll layers.

mod geometry;

pub use geometry::*;

pub mod prelude {
    pub use crate::geometry::{IntOffset, Offset, Rect, Velocity};
}
