//! Scrollable state, fling behavior and the scrolling logic that feeds the
//! nested scroll chain.
//!
//! A [`ScrollingLogic`] sits between a gesture source and a
//! [`ScrollableState`]. Every delta is offered to the parent chain before the
//! state consumes it and the remainder is offered again afterwards. The logic
//! also owns a [`NestedScrollNode`] of its own so nested children can hand
//! their leftovers to it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};

use rubberband_animation::{ExponentialDecaySpec, FloatDecayAnimationSpec};
use rubberband_core::{RuntimeHandle, TaskHandle};
use rubberband_ui_graphics::{Offset, Velocity};

use crate::nested_scroll::{
    FlingFuture, NestedScrollConnection, NestedScrollDispatcher, NestedScrollNode,
    NestedScrollSource,
};

/// Minimum velocity (in px/sec) to trigger a fling animation.
pub const MIN_FLING_VELOCITY: f32 = 1.0;

/// Minimum unconsumed delta (in pixels) to consider a boundary hit.
const BOUNDARY_EPSILON: f32 = 0.5;

/// Orientation for scrolling - horizontal or vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn main_axis(self, offset: Offset) -> f32 {
        match self {
            Orientation::Horizontal => offset.x,
            Orientation::Vertical => offset.y,
        }
    }

    pub fn cross_axis(self, offset: Offset) -> f32 {
        match self {
            Orientation::Horizontal => offset.y,
            Orientation::Vertical => offset.x,
        }
    }

    pub fn main_velocity(self, velocity: Velocity) -> f32 {
        match self {
            Orientation::Horizontal => velocity.x,
            Orientation::Vertical => velocity.y,
        }
    }

    /// An offset with `main` on this axis and zero across it.
    pub fn offset_of(self, main: f32) -> Offset {
        match self {
            Orientation::Horizontal => Offset::new(main, 0.0),
            Orientation::Vertical => Offset::new(0.0, main),
        }
    }

    pub fn velocity_of(self, main: f32) -> Velocity {
        match self {
            Orientation::Horizontal => Velocity::new(main, 0.0),
            Orientation::Vertical => Velocity::new(0.0, main),
        }
    }
}

/// Low-level scrollable state interface.
///
/// Deltas are in pointer direction: a positive delta drags the content
/// towards the start, revealing what lies before the current position.
pub trait ScrollableState {
    /// Consume a scroll delta and return the amount consumed.
    ///
    /// The result may be less than requested when the state is at a bound.
    fn consume_scroll_delta(&self, delta: f32) -> f32;

    /// Whether a negative delta would move the content.
    fn can_scroll_forward(&self) -> bool;

    /// Whether a positive delta would move the content.
    fn can_scroll_backward(&self) -> bool;
}

/// Scroll position of a single-axis container, clamped to `[0, max_value]`.
#[derive(Clone)]
pub struct ScrollState {
    value: Rc<Cell<f32>>,
    max_value: Rc<Cell<f32>>,
}

impl ScrollState {
    pub fn new(initial: f32, max_value: f32) -> Self {
        let max_value = max_value.max(0.0);
        Self {
            value: Rc::new(Cell::new(initial.clamp(0.0, max_value))),
            max_value: Rc::new(Cell::new(max_value)),
        }
    }

    pub fn value(&self) -> f32 {
        self.value.get()
    }

    pub fn max_value(&self) -> f32 {
        self.max_value.get()
    }

    /// Updates the scroll range, e.g. after the content was re-measured.
    pub fn set_max_value(&self, max: f32) {
        let max = max.max(0.0);
        self.max_value.set(max);
        self.value.set(self.value.get().min(max));
    }

    /// Scrolls by the given delta, clamping to valid range [0, max_value].
    /// Returns the actual amount scrolled.
    pub fn dispatch_raw_delta(&self, delta: f32) -> f32 {
        if !delta.is_finite() {
            return 0.0;
        }
        let current = self.value();
        let new_value = (current + delta).clamp(0.0, self.max_value());
        self.value.set(new_value);
        new_value - current
    }
}

impl ScrollableState for ScrollState {
    fn consume_scroll_delta(&self, delta: f32) -> f32 {
        // Dragging down moves towards the start of the content.
        -self.dispatch_raw_delta(-delta)
    }

    fn can_scroll_forward(&self) -> bool {
        self.value() < self.max_value()
    }

    fn can_scroll_backward(&self) -> bool {
        self.value() > 0.0
    }
}

impl fmt::Debug for ScrollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollState")
            .field("value", &self.value())
            .field("max_value", &self.max_value())
            .finish()
    }
}

/// Receiver for the deltas a fling produces, one call per frame.
pub trait ScrollScope {
    /// Scrolls by `delta` along the main axis and returns what was consumed
    /// by the whole chain.
    fn scroll_by(&self, delta: f32) -> f32;

    /// Whether the content itself can still move in the direction of `delta`.
    fn can_scroll(&self, delta: f32) -> bool;
}

/// Turns a release velocity into a sequence of scroll deltas.
pub trait FlingBehavior {
    /// Runs the fling and resolves to the velocity left when it stopped.
    fn perform_fling<'a>(
        &'a self,
        scope: &'a dyn ScrollScope,
        initial_velocity: f32,
    ) -> Pin<Box<dyn Future<Output = f32> + 'a>>;
}

/// Exponential-decay fling that ends when the chain stops consuming.
pub struct DefaultFlingBehavior {
    runtime: RuntimeHandle,
    decay_spec: ExponentialDecaySpec,
}

impl DefaultFlingBehavior {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self::with_decay(runtime, ExponentialDecaySpec::default())
    }

    pub fn with_decay(runtime: RuntimeHandle, decay_spec: ExponentialDecaySpec) -> Self {
        Self {
            runtime,
            decay_spec,
        }
    }
}

impl FlingBehavior for DefaultFlingBehavior {
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
                let consumed = scope.scroll_by(delta);
                (delta - consumed).abs() <= BOUNDARY_EPSILON
            },
        ))
    }
}

/// Drives a decay from `initial_velocity`, handing each frame's delta to
/// `on_frame`. The fling stops early when `on_frame` returns `false`.
///
/// Resolves to the decay's velocity at the last frame, or zero when it ran out.
pub async fn decay_fling<S, F>(
    runtime: &RuntimeHandle,
    decay_spec: &S,
    initial_velocity: f32,
    mut on_frame: F,
) -> f32
where
    S: FloatDecayAnimationSpec,
    F: FnMut(f32) -> bool,
{
    if !initial_velocity.is_finite() {
        return 0.0;
    }
    if initial_velocity.abs() < MIN_FLING_VELOCITY {
        return initial_velocity;
    }

    let clock = runtime.frame_clock();
    let duration_nanos = decay_spec.get_duration_nanos(0.0, initial_velocity);
    let mut start_time_nanos: Option<u64> = None;
    let mut last_value = 0.0;

    loop {
        let frame_time_nanos = clock.next_frame().await;
        let started_at = *start_time_nanos.get_or_insert(frame_time_nanos);
        let play_time_nanos = frame_time_nanos.saturating_sub(started_at) as i64;

        let value = decay_spec.get_value_from_nanos(play_time_nanos, 0.0, initial_velocity);
        let velocity = decay_spec.get_velocity_from_nanos(play_time_nanos, 0.0, initial_velocity);
        let delta = value - last_value;
        last_value = value;

        let keep_going = delta.abs() <= 0.001 || on_frame(delta);
        if !keep_going {
            log::debug!("fling stopped at boundary with velocity {velocity:.1}");
            return velocity;
        }
        if play_time_nanos >= duration_nanos
            || velocity.abs() < decay_spec.abs_velocity_threshold()
        {
            return 0.0;
        }
    }
}

/// Routes deltas and velocities for one scrollable through the nested scroll chain.
pub struct ScrollingLogic {
    state: Rc<dyn ScrollableState>,
    orientation: Orientation,
    node: Rc<NestedScrollNode>,
    fling_behavior: Rc<dyn FlingBehavior>,
    is_flinging: Cell<bool>,
    fling_task: RefCell<Option<TaskHandle>>,
}

impl ScrollingLogic {
    /// `fling_behavior` flings this scrollable with velocity its nested
    /// children leave over.
    pub fn new(
        state: Rc<dyn ScrollableState>,
        orientation: Orientation,
        fling_behavior: Rc<dyn FlingBehavior>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|logic: &Weak<ScrollingLogic>| Self {
            state,
            orientation,
            fling_behavior,
            node: NestedScrollNode::new(Rc::new(ScrollableNestedScrollConnection {
                logic: logic.clone(),
            })),
            is_flinging: Cell::new(false),
            fling_task: RefCell::new(None),
        })
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// This scrollable's link in the chain. Children attach to it; it attaches
    /// to the nearest ancestor.
    pub fn nested_scroll_node(&self) -> Rc<NestedScrollNode> {
        Rc::clone(&self.node)
    }

    pub fn is_flinging(&self) -> bool {
        self.is_flinging.get()
    }

    fn dispatcher(&self) -> NestedScrollDispatcher {
        self.node.dispatcher()
    }

    /// Consumes along the main axis only; returns an offset on that axis.
    fn scroll_self(&self, available: Offset) -> Offset {
        let main = self.orientation.main_axis(available);
        if main == 0.0 {
            return Offset::ZERO;
        }
        self.orientation
            .offset_of(self.state.consume_scroll_delta(main))
    }

    /// Offers `delta` to the ancestors, then to the state, then to the
    /// ancestors again. Returns the total consumed.
    ///
    /// A drag cancels a fling started with [`launch_fling`](Self::launch_fling).
    pub fn dispatch_scroll(&self, delta: Offset, source: NestedScrollSource) -> Offset {
        if source == NestedScrollSource::Drag {
            self.cancel_fling();
        }
        let dispatcher = self.dispatcher();
        let pre_consumed = dispatcher.dispatch_pre_scroll(delta, source);
        let after_pre = delta - pre_consumed;
        let consumed = self.scroll_self(after_pre);
        let left = after_pre - consumed;
        let post_consumed = dispatcher.dispatch_post_scroll(consumed, left, source);
        log::trace!(
            "scroll {source:?} delta={:.2} pre={:.2} self={:.2} post={:.2}",
            self.orientation.main_axis(delta),
            self.orientation.main_axis(pre_consumed),
            self.orientation.main_axis(consumed),
            self.orientation.main_axis(post_consumed)
        );
        pre_consumed + consumed + post_consumed
    }

    /// Runs a full fling: pre-fling on the chain, the behavior's own decay
    /// and post-fling with whatever velocity is left.
    ///
    /// Resolves to the velocity nobody consumed.
    pub async fn dispatch_fling(&self, velocity: Velocity, behavior: &dyn FlingBehavior) -> Velocity {
        let dispatcher = self.dispatcher();
        let pre_consumed = dispatcher.dispatch_pre_fling(velocity).await;
        let available = velocity - pre_consumed;
        let left = self.do_fling_animation(available, behavior).await;
        log::debug!(
            "fling {:.1} pre={:.1} left after decay={:.1}",
            self.orientation.main_velocity(velocity),
            self.orientation.main_velocity(pre_consumed),
            self.orientation.main_velocity(left)
        );
        let post_consumed = dispatcher
            .dispatch_post_fling(available - left, left)
            .await;
        left - post_consumed
    }

    /// Runs [`dispatch_fling`](Self::dispatch_fling) as a task on `runtime`,
    /// replacing any fling launched before. Returns `false` when the runtime is gone.
    pub fn launch_fling(
        self: &Rc<Self>,
        runtime: &RuntimeHandle,
        velocity: Velocity,
        behavior: Rc<dyn FlingBehavior>,
    ) -> bool {
        self.cancel_fling();
        let logic = Rc::clone(self);
        let task = runtime.spawn_ui(async move {
            logic.dispatch_fling(velocity, behavior.as_ref()).await;
            logic.fling_task.borrow_mut().take();
        });
        let launched = task.is_some();
        *self.fling_task.borrow_mut() = task;
        launched
    }

    /// Drops a launched fling wherever it is. No-op when none is running.
    pub fn cancel_fling(&self) {
        let task = self.fling_task.borrow_mut().take();
        if let Some(task) = task {
            log::debug!("fling cancelled");
            task.cancel();
            self.is_flinging.set(false);
        }
    }

    /// Flings this scrollable alone, every frame still passing through the chain.
    pub async fn do_fling_animation(
        &self,
        available: Velocity,
        behavior: &dyn FlingBehavior,
    ) -> Velocity {
        let main = self.orientation.main_velocity(available);
        self.is_flinging.set(true);
        let scope = LogicScrollScope { logic: self };
        let left = behavior.perform_fling(&scope, main).await;
        self.is_flinging.set(false);
        self.orientation.velocity_of(left)
    }
}

impl fmt::Debug for ScrollingLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollingLogic")
            .field("orientation", &self.orientation)
            .field("is_flinging", &self.is_flinging.get())
            .field("node", &self.node)
            .finish()
    }
}

struct LogicScrollScope<'a> {
    logic: &'a ScrollingLogic,
}

impl ScrollScope for LogicScrollScope<'_> {
    fn scroll_by(&self, delta: f32) -> f32 {
        let orientation = self.logic.orientation;
        let consumed = self
            .logic
            .dispatch_scroll(orientation.offset_of(delta), NestedScrollSource::Fling);
        orientation.main_axis(consumed)
    }

    fn can_scroll(&self, delta: f32) -> bool {
        if delta < 0.0 {
            self.logic.state.can_scroll_forward()
        } else if delta > 0.0 {
            self.logic.state.can_scroll_backward()
        } else {
            false
        }
    }
}

/// Lets a scrollable absorb what its nested children leave over.
///
/// Pre-scroll and pre-fling go straight to the ancestors. Post-scroll is
/// consumed by the scrollable first; the rest continues upward. Post-fling
/// flings this scrollable with the leftover velocity.
pub struct ScrollableNestedScrollConnection {
    logic: Weak<ScrollingLogic>,
}

impl NestedScrollConnection for ScrollableNestedScrollConnection {
    fn on_pre_scroll(&self, available: Offset, source: NestedScrollSource) -> Offset {
        match self.logic.upgrade() {
            Some(logic) => logic.dispatcher().dispatch_pre_scroll(available, source),
            None => Offset::ZERO,
        }
    }

    fn on_post_scroll(
        &self,
        consumed: Offset,
        available: Offset,
        source: NestedScrollSource,
    ) -> Offset {
        let Some(logic) = self.logic.upgrade() else {
            return Offset::ZERO;
        };
        let own = logic.scroll_self(available);
        let parent = logic
            .dispatcher()
            .dispatch_post_scroll(consumed + own, available - own, source);
        own + parent
    }

    fn on_pre_fling(&self, available: Velocity) -> FlingFuture<'_> {
        let logic = self.logic.upgrade();
        Box::pin(async move {
            match logic {
                Some(logic) => logic.dispatcher().dispatch_pre_fling(available).await,
                None => Velocity::ZERO,
            }
        })
    }

    fn on_post_fling(&self, consumed: Velocity, available: Velocity) -> FlingFuture<'_> {
        let logic = self.logic.upgrade();
        Box::pin(async move {
            let Some(logic) = logic else {
                return Velocity::ZERO;
            };
            let behavior = Rc::clone(&logic.fling_behavior);
            let left = logic.do_fling_animation(available, behavior.as_ref()).await;
            let parent = logic
                .dispatcher()
                .dispatch_post_fling(consumed + (available - left), left)
                .await;
            available - (left - parent)
        })
    }
}

#[cfg(test)]
#[path = "tests/scrollable_tests.rs"]
mod tests;
