//! Rubber-band overscroll for Rubberband scrollables
//!
//! [`Overscroll`] decorates a scrollable: leftovers of its drags stretch a
//! visual offset against a parabolic resistance, and fling velocity springs
//! the offset back to rest. Decorators nest; each forwards to its ancestors
//! through the nested scroll chain before claiming anything itself.

pub mod config;
pub mod coordinator;
pub mod easing;
pub mod fling;
pub mod overscroll;

pub use config::{
    ConfigError, OverscrollConfig, ScrollEasing, DEFAULT_SPRING_STIFFNESS, VISIBILITY_THRESHOLD,
};
pub use coordinator::{OverscrollCoordinator, OverscrollPhase};
pub use easing::{default_scroll_easing, parabola_scroll_easing, DEFAULT_RESISTANCE};
pub use fling::OverscrollFlingBehavior;
pub use overscroll::Overscroll;

pub mod prelude {
    pub use crate::config::{OverscrollConfig, ScrollEasing};
    pub use crate::overscroll::Overscroll;
    pub use rubberband_foundation::prelude::*;
}
