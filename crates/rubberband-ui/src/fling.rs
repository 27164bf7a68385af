//! Fling that hands its momentum to the overscroll at the content's edge.

use std::future::Future;
use std::pin::Pin;

use rubberband_animation::ExponentialDecaySpec;
use rubberband_core::RuntimeHandle;
use rubberband_foundation::scrollable::decay_fling;
use rubberband_foundation::{FlingBehavior, ScrollScope};

/// Decays like the default fling but ends as soon as the list can no longer
/// move in the fling direction. The live velocity at that moment is returned,
/// so post-fling starts the overscroll spring with real momentum instead of
/// feeding the remaining decay into the offset frame by frame.
pub struct OverscrollFlingBehavior {
    runtime: RuntimeHandle,
    decay_spec: ExponentialDecaySpec,
}

impl OverscrollFlingBehavior {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self {
            runtime,
            decay_spec: ExponentialDecaySpec::default(),
        }
    }

    pub fn with_decay(runtime: RuntimeHandle, decay_spec: ExponentialDecaySpec) -> Self {
        Self {
            runtime,
            decay_spec,
        }
    }
}

impl FlingBehavior for OverscrollFlingBehavior {
    fn perform_fling<'a>(
        &'a self,
        scope: &'a dyn ScrollScope,
        initial_velocity: f32,
    ) -> Pin<Box<dyn Future<Output = f32> + 'a>> {
        Box::pin(decay_fling(
            &self.runtime,
            &self.decay_spec,
            initial_velocity,
            move |delta| {
                if !scope.can_scroll(delta) {
                    return false;
                }
                scope.scroll_by(delta);
                true
            },
        ))
    }
}
