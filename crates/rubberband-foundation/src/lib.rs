//! Gesture foundation for Rubberband
//!
//! Velocity estimation from pointer samples, the nested-scroll chain that
//! carries unconsumed scroll and fling amounts outward, and a scrollable host
//! that feeds that chain.

pub mod gesture_constants;
pub mod nested_scroll;
pub mod pointer;
pub mod scrollable;
pub mod velocity_tracker;

pub use gesture_constants::{DRAG_THRESHOLD, MAX_FLING_VELOCITY};
pub use nested_scroll::{
    FlingFuture, NestedScrollConnection, NestedScrollDispatcher, NestedScrollNode,
    NestedScrollSource, NoOpConnection,
};
pub use pointer::{HistoricalChange, PointerId, PointerInputChange};
pub use rubberband_ui_graphics::{IntOffset, Offset, Rect, Velocity};
pub use scrollable::{
    DefaultFlingBehavior, FlingBehavior, Orientation, ScrollScope, ScrollState, ScrollableState,
    ScrollingLogic,
};
pub use velocity_tracker::{VelocityTracker, VelocityTracker1D, VelocityTrackerConfig};

pub mod prelude {
    pub use crate::nested_scroll::{
        NestedScrollConnection, NestedScrollDispatcher, NestedScrollNode, NestedScrollSource,
    };
    pub use crate::scrollable::{Orientation, ScrollState, ScrollableState, ScrollingLogic};
    pub use crate::velocity_tracker::VelocityTracker;
}
