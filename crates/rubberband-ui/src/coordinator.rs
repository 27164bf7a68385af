//! Rubber-band state machine for one scroll axis.
//!
//! The coordinator sits in the nested scroll chain just outside a scrollable.
//! Drag leftovers stretch the offset with resistance, drags back towards rest
//! relax it without resistance, and fling velocity springs it back to zero.
//! A touch during the return freezes the offset where the spring left it.

use std::cell::{Cell, RefCell};
use std::fmt;

use rubberband_animation::{Animatable, AnimationEndReason, SpringSpec};
use rubberband_core::RuntimeHandle;
use rubberband_foundation::{
    FlingFuture, NestedScrollConnection, NestedScrollDispatcher, NestedScrollSource, Orientation,
};
use rubberband_ui_graphics::{Offset, Velocity};

use crate::config::{OverscrollConfig, VISIBILITY_THRESHOLD};
use crate::easing::sign;

/// Coarse state of a coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverscrollPhase {
    /// Offset within the visibility threshold, nothing animating.
    AtRest,
    /// Held away from rest by the gesture.
    Stretched,
    /// A return spring is running.
    Animating,
}

/// How a return spring treats zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReturnMode {
    /// Stops the moment the offset reaches or crosses zero.
    Bounded,
    /// Runs the spring to rest; a bouncy spring may swing through zero.
    Free,
}

pub struct OverscrollCoordinator {
    orientation: Orientation,
    config: OverscrollConfig,
    spring: SpringSpec,
    offset: Cell<f32>,
    dispatcher: NestedScrollDispatcher,
    runtime: RuntimeHandle,
    fling_animator: RefCell<Option<Animatable>>,
}

impl OverscrollCoordinator {
    /// `dispatcher` reaches the ancestors; `initial_offset` lets a replacement
    /// coordinator continue from where its predecessor was.
    pub fn new(
        orientation: Orientation,
        config: OverscrollConfig,
        dispatcher: NestedScrollDispatcher,
        runtime: RuntimeHandle,
        initial_offset: f32,
    ) -> Self {
        let spring = config.spring_spec();
        Self {
            orientation,
            config,
            spring,
            offset: Cell::new(if initial_offset.is_finite() {
                initial_offset
            } else {
                0.0
            }),
            dispatcher,
            runtime,
            fling_animator: RefCell::new(None),
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn config(&self) -> &OverscrollConfig {
        &self.config
    }

    /// Current rubber-band displacement along the main axis.
    pub fn offset(&self) -> f32 {
        self.offset.get()
    }

    pub fn is_animating(&self) -> bool {
        self.fling_animator
            .borrow()
            .as_ref()
            .is_some_and(Animatable::is_running)
    }

    pub fn phase(&self) -> OverscrollPhase {
        if self.is_animating() {
            OverscrollPhase::Animating
        } else if self.offset.get().abs() > VISIBILITY_THRESHOLD {
            OverscrollPhase::Stretched
        } else {
            OverscrollPhase::AtRest
        }
    }

    /// Freezes a running return spring at its current value. No-op when idle.
    pub fn stop_animation(&self) {
        let animator = self.fling_animator.borrow().clone();
        if let Some(animator) = animator.filter(Animatable::is_running) {
            animator.stop();
            log::debug!("overscroll return interrupted at {:.2}", self.offset.get());
        }
    }

    fn set_offset(&self, value: f32) {
        if !value.is_finite() {
            log::warn!("ignoring non-finite overscroll offset {value}");
            return;
        }
        let previous = self.offset.replace(value);
        if previous.abs() <= VISIBILITY_THRESHOLD && value.abs() > VISIBILITY_THRESHOLD {
            log::debug!("overscroll stretch began at {value:.2}");
        }
        log::trace!("overscroll offset {previous:.2} -> {value:.2}");
    }

    fn dispatch_pre_scroll(&self, available: Offset, source: NestedScrollSource) -> Offset {
        if self.config.propagate_to_parent {
            self.dispatcher.dispatch_pre_scroll(available, source)
        } else {
            Offset::ZERO
        }
    }

    fn dispatch_post_scroll(
        &self,
        consumed: Offset,
        available: Offset,
        source: NestedScrollSource,
    ) -> Offset {
        if self.config.propagate_to_parent {
            self.dispatcher
                .dispatch_post_scroll(consumed, available, source)
        } else {
            Offset::ZERO
        }
    }

    async fn dispatch_pre_fling(&self, available: Velocity) -> Velocity {
        if self.config.propagate_to_parent {
            self.dispatcher.dispatch_pre_fling(available).await
        } else {
            Velocity::ZERO
        }
    }

    async fn dispatch_post_fling(&self, consumed: Velocity, available: Velocity) -> Velocity {
        if self.config.propagate_to_parent {
            self.dispatcher
                .dispatch_post_fling(consumed, available)
                .await
        } else {
            Velocity::ZERO
        }
    }

    /// Springs the offset back to zero starting with `velocity`, re-applying
    /// the easing every frame. Resolves to the velocity left when it ended;
    /// an interrupted return leaves none, the touch that stopped it owns the gesture.
    async fn spring_back(&self, velocity: f32, mode: ReturnMode) -> f32 {
        let start = self.offset.get();
        let animator = Animatable::new(start, self.runtime.clone());
        if mode == ReturnMode::Bounded {
            if start > 0.0 {
                animator.update_bounds(Some(0.0), None);
            } else {
                animator.update_bounds(None, Some(0.0));
            }
        }
        *self.fling_animator.borrow_mut() = Some(animator.clone());
        log::debug!("overscroll return from {start:.2} with velocity {velocity:.1} ({mode:?})");

        let offset = &self.offset;
        let easing = &self.config.easing;
        let mut last_value = 0.0f32;
        let mut left = velocity;
        let result = animator
            .animate_to(0.0, self.spring, velocity, |scope| {
                let value = scope.value;
                let crossed = last_value != 0.0 && sign(value) != sign(last_value);
                if mode == ReturnMode::Bounded && (value.abs() < VISIBILITY_THRESHOLD || crossed) {
                    scope.stop();
                    offset.set(0.0);
                } else {
                    let current = offset.get();
                    let next = easing.ease(current, value - current);
                    if next.is_finite() {
                        offset.set(next);
                    }
                }
                log::trace!("overscroll return frame value={value:.2} offset={:.2}", offset.get());
                last_value = value;
                left = scope.velocity;
            })
            .await;

        match result.end_reason {
            AnimationEndReason::Interrupted => return 0.0,
            AnimationEndReason::Finished | AnimationEndReason::BoundReached => {
                if self.offset.get().abs() < VISIBILITY_THRESHOLD {
                    self.offset.set(0.0);
                }
                log::debug!("overscroll back at rest ({:?})", result.end_reason);
            }
        }
        match mode {
            ReturnMode::Bounded => left,
            ReturnMode::Free => result.velocity,
        }
    }
}

impl NestedScrollConnection for OverscrollCoordinator {
    fn on_pre_scroll(&self, available: Offset, source: NestedScrollSource) -> Offset {
        self.stop_animation();
        let parent_consumed = self.dispatch_pre_scroll(available, source);
        let delta = self.orientation.main_axis(available - parent_consumed);
        let offset = self.offset.get();

        if offset.abs() <= VISIBILITY_THRESHOLD || sign(delta) == sign(offset) {
            return parent_consumed;
        }

        let relaxed = offset + delta;
        let consumed = if sign(relaxed) != sign(offset) {
            // Crossing rest: keep exactly the stretch, the list scrolls with the rest.
            self.set_offset(0.0);
            log::debug!("overscroll released to scrolling, {:.2} passes through", relaxed);
            -offset
        } else {
            self.set_offset(relaxed);
            delta
        };
        parent_consumed + self.orientation.offset_of(consumed)
    }

    fn on_post_scroll(
        &self,
        consumed: Offset,
        available: Offset,
        source: NestedScrollSource,
    ) -> Offset {
        let parent_consumed = self.dispatch_post_scroll(consumed, available, source);
        let delta = self.orientation.main_axis(available - parent_consumed);
        if delta != 0.0 {
            let offset = self.offset.get();
            if offset.abs() > VISIBILITY_THRESHOLD
                && sign(delta) != sign(offset)
                && sign(offset + delta) != sign(offset)
            {
                self.set_offset(0.0);
                log::debug!("overscroll released to scrolling, {:.2} passes through", offset + delta);
                return parent_consumed + self.orientation.offset_of(-offset);
            }
            let next = match source {
                NestedScrollSource::Fling => offset + delta,
                NestedScrollSource::Drag => self.config.easing.ease(offset, delta),
            };
            self.set_offset(next);
        }
        parent_consumed + self.orientation.offset_of(delta)
    }

    fn on_pre_fling(&self, available: Velocity) -> FlingFuture<'_> {
        Box::pin(async move {
            self.stop_animation();
            let parent_consumed = self.dispatch_pre_fling(available).await;
            let velocity = self.orientation.main_velocity(available - parent_consumed);
            let offset = self.offset.get();

            let mut left = velocity;
            if offset.abs() >= VISIBILITY_THRESHOLD && sign(velocity) != sign(offset) {
                left = self.spring_back(velocity, ReturnMode::Bounded).await;
            }
            parent_consumed + self.orientation.velocity_of(velocity - left)
        })
    }

    fn on_post_fling(&self, consumed: Velocity, available: Velocity) -> FlingFuture<'_> {
        Box::pin(async move {
            let parent_consumed = self.dispatch_post_fling(consumed, available).await;
            let velocity = self.orientation.main_velocity(available - parent_consumed);
            let left = self.spring_back(velocity, ReturnMode::Free).await;
            parent_consumed + self.orientation.velocity_of(velocity - left)
        })
    }
}

impl fmt::Debug for OverscrollCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverscrollCoordinator")
            .field("orientation", &self.orientation)
            .field("offset", &self.offset.get())
            .field("phase", &self.phase())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod tests;
