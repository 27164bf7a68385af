//! Spring specifications and the frame-driven [`Animatable`].

use std::cell::RefCell;
use std::rc::Rc;

use rubberband_core::{FrameClock, RuntimeHandle};

use crate::spring_simulation::{SpringMotion, SpringSimulation};

pub const STIFFNESS_HIGH: f32 = 10_000.0;
pub const STIFFNESS_MEDIUM: f32 = 1_500.0;
pub const STIFFNESS_MEDIUM_LOW: f32 = 400.0;
pub const STIFFNESS_LOW: f32 = 200.0;
pub const STIFFNESS_VERY_LOW: f32 = 50.0;

pub const DAMPING_RATIO_HIGH_BOUNCY: f32 = 0.2;
pub const DAMPING_RATIO_MEDIUM_BOUNCY: f32 = 0.5;
pub const DAMPING_RATIO_LOW_BOUNCY: f32 = 0.75;
pub const DAMPING_RATIO_NO_BOUNCY: f32 = 1.0;

/// Smallest stiffness a spring will run with. Anything softer never converges in practice.
pub const MIN_SPRING_STIFFNESS: f32 = 1.0;

/// A spring also needs to move slower than its visibility threshold per
/// 16 ms frame before it counts as settled.
const SETTLE_VELOCITY_FACTOR: f32 = 62.5;

/// Spring animation configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// Damping ratio. 1.0 = critically damped, < 1.0 = under-damped (bouncy), > 1.0 = over-damped.
    pub damping_ratio: f32,
    /// Stiffness constant. Higher values = faster animation.
    pub stiffness: f32,
    /// Distance from the target under which the spring counts as settled.
    pub visibility_threshold: f32,
}

impl SpringSpec {
    /// Creates a spring, clamping parameters into the range the simulation can run.
    pub fn new(damping_ratio: f32, stiffness: f32, visibility_threshold: f32) -> Self {
        let stiffness = if stiffness.is_finite() {
            stiffness.max(MIN_SPRING_STIFFNESS)
        } else {
            STIFFNESS_MEDIUM
        };
        let damping_ratio = if damping_ratio.is_finite() {
            damping_ratio.max(0.0)
        } else {
            DAMPING_RATIO_NO_BOUNCY
        };
        let visibility_threshold = if visibility_threshold.is_finite() {
            visibility_threshold.abs().max(f32::EPSILON)
        } else {
            0.01
        };
        Self {
            damping_ratio,
            stiffness,
            visibility_threshold,
        }
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::new(DAMPING_RATIO_NO_BOUNCY, STIFFNESS_MEDIUM, 0.01)
    }
}

/// Why an [`Animatable::animate_to`] call returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEndReason {
    /// Reached the target, or the frame block asked to stop.
    Finished,
    /// Clamped against a bound before reaching the target.
    BoundReached,
    /// Stopped from outside, or superseded by another animation.
    Interrupted,
}

/// Final state of an animation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationResult {
    pub end_reason: AnimationEndReason,
    pub value: f32,
    pub velocity: f32,
}

/// Per-frame view handed to the `animate_to` block.
#[derive(Debug)]
pub struct AnimationScope {
    pub value: f32,
    pub velocity: f32,
    pub target: f32,
    running: bool,
}

impl AnimationScope {
    /// Ends the animation after this frame. The value stays where it is.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

struct AnimatableInner {
    value: f32,
    velocity: f32,
    target: f32,
    lower_bound: Option<f32>,
    upper_bound: Option<f32>,
    is_running: bool,
    generation: u64,
    clock: FrameClock,
}

/// Animated float that advances once per frame on the runtime's frame clock.
///
/// Only one animation runs at a time. Starting a new one, calling
/// [`stop`](Animatable::stop) or [`snap_to`](Animatable::snap_to) interrupts
/// the running animation before its next frame. Stopping freezes the value
/// where it currently is.
#[derive(Clone)]
pub struct Animatable {
    inner: Rc<RefCell<AnimatableInner>>,
}

impl Animatable {
    pub fn new(initial: f32, runtime: RuntimeHandle) -> Self {
        Self {
            inner: Rc::new(RefCell::new(AnimatableInner {
                value: initial,
                velocity: 0.0,
                target: initial,
                lower_bound: None,
                upper_bound: None,
                is_running: false,
                generation: 0,
                clock: runtime.frame_clock(),
            })),
        }
    }

    pub fn value(&self) -> f32 {
        self.inner.borrow().value
    }

    pub fn velocity(&self) -> f32 {
        self.inner.borrow().velocity
    }

    pub fn target(&self) -> f32 {
        self.inner.borrow().target
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().is_running
    }

    /// Limits the animated value. Frames that would leave the range end the
    /// animation with [`AnimationEndReason::BoundReached`].
    pub fn update_bounds(&self, lower: Option<f32>, upper: Option<f32>) {
        let mut inner = self.inner.borrow_mut();
        inner.lower_bound = lower;
        inner.upper_bound = upper;
    }

    /// Interrupts the running animation, keeping the current value. No-op when idle.
    pub fn stop(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.is_running {
            inner.generation += 1;
            inner.is_running = false;
            inner.velocity = 0.0;
        }
    }

    pub fn snap_to(&self, value: f32) {
        self.stop();
        let mut inner = self.inner.borrow_mut();
        inner.value = value;
        inner.target = value;
        inner.velocity = 0.0;
    }

    fn is_current(&self, generation: u64) -> bool {
        self.inner.borrow().generation == generation
    }

    /// Springs from the current value to `target`, invoking `block` every frame.
    ///
    /// Resolves once the spring is within `spec.visibility_threshold` of the
    /// target and too slow to leave it again. Hitting a bound, stopping the
    /// scope from `block` and interruption also end it.
    pub async fn animate_to<F>(
        &self,
        target: f32,
        spec: SpringSpec,
        initial_velocity: f32,
        mut block: F,
    ) -> AnimationResult
    where
        F: FnMut(&mut AnimationScope),
    {
        let (generation, start, clock, lower, upper) = {
            let mut inner = self.inner.borrow_mut();
            inner.generation += 1;
            inner.is_running = true;
            inner.target = target;
            inner.velocity = initial_velocity;
            (
                inner.generation,
                inner.value,
                inner.clock.clone(),
                inner.lower_bound,
                inner.upper_bound,
            )
        };

        let threshold = spec.visibility_threshold;
        let velocity_threshold = threshold * SETTLE_VELOCITY_FACTOR;
        if (start - target).abs() < threshold && initial_velocity.abs() < velocity_threshold {
            return self.finish(
                generation,
                AnimationEndReason::Finished,
                SpringMotion {
                    value: target,
                    velocity: 0.0,
                },
            );
        }

        let simulation = SpringSimulation::new(&spec);
        let mut start_time_nanos: Option<u64> = None;

        loop {
            let frame_time_nanos = clock.next_frame().await;
            if !self.is_current(generation) {
                return self.interrupted();
            }

            let started_at = *start_time_nanos.get_or_insert(frame_time_nanos);
            let elapsed_secs = frame_time_nanos.saturating_sub(started_at) as f64 / 1_000_000_000.0;
            let mut motion = simulation.motion_at(elapsed_secs, start, target, initial_velocity);

            let mut end_reason = None;
            if let Some(lower) = lower.filter(|lower| motion.value < *lower) {
                motion.value = lower;
                end_reason = Some(AnimationEndReason::BoundReached);
            } else if let Some(upper) = upper.filter(|upper| motion.value > *upper) {
                motion.value = upper;
                end_reason = Some(AnimationEndReason::BoundReached);
            } else if (motion.value - target).abs() < threshold
                && motion.velocity.abs() < velocity_threshold
            {
                motion.value = target;
                end_reason = Some(AnimationEndReason::Finished);
            }

            {
                let mut inner = self.inner.borrow_mut();
                inner.value = motion.value;
                inner.velocity = motion.velocity;
            }
            log::trace!(
                "spring frame t={elapsed_secs:.3}s value={:.3} velocity={:.3}",
                motion.value,
                motion.velocity
            );

            let mut scope = AnimationScope {
                value: motion.value,
                velocity: motion.velocity,
                target,
                running: true,
            };
            block(&mut scope);

            if !self.is_current(generation) {
                return self.interrupted();
            }
            if !scope.running {
                return self.finish(generation, AnimationEndReason::Finished, motion);
            }
            if let Some(reason) = end_reason {
                return self.finish(generation, reason, motion);
            }
        }
    }

    fn finish(
        &self,
        generation: u64,
        end_reason: AnimationEndReason,
        motion: SpringMotion,
    ) -> AnimationResult {
        let mut inner = self.inner.borrow_mut();
        if inner.generation == generation {
            inner.is_running = false;
            inner.value = motion.value;
            inner.velocity = 0.0;
        }
        AnimationResult {
            end_reason,
            value: motion.value,
            velocity: motion.velocity,
        }
    }

    fn interrupted(&self) -> AnimationResult {
        let inner = self.inner.borrow();
        AnimationResult {
            end_reason: AnimationEndReason::Interrupted,
            value: inner.value,
            velocity: inner.velocity,
        }
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
