//! Drag and fling scenarios through a scrollable wrapped in overscroll decorators.

use std::rc::Rc;
use std::sync::Arc;

use rubberband_core::{DefaultScheduler, FrameDriver, Runtime};
use rubberband_foundation::{
    NestedScrollSource, Offset, Orientation, ScrollState, ScrollingLogic, Velocity,
};
use rubberband_ui::{Overscroll, OverscrollConfig, OverscrollFlingBehavior, OverscrollPhase};

struct Scene {
    runtime: Runtime,
    list: ScrollState,
    logic: Rc<ScrollingLogic>,
    overscroll: Rc<Overscroll>,
}

impl Scene {
    fn new(scroll: f32, max: f32) -> Self {
        let runtime = Runtime::new(Arc::new(DefaultScheduler));
        let list = ScrollState::new(scroll, max);
        let logic = ScrollingLogic::new(
            Rc::new(list.clone()),
            Orientation::Vertical,
            Rc::new(OverscrollFlingBehavior::new(runtime.handle())),
        );
        let overscroll = Rc::new(Overscroll::vertical(
            runtime.handle(),
            OverscrollConfig::default(),
        ));
        logic
            .nested_scroll_node()
            .attach(&overscroll.nested_scroll_node());
        Self {
            runtime,
            list,
            logic,
            overscroll,
        }
    }

    fn fling(&self, velocity: f32) -> FrameDriver {
        let handle = self.runtime.handle();
        let behavior = Rc::new(OverscrollFlingBehavior::new(handle.clone()));
        assert!(self
            .logic
            .launch_fling(&handle, Velocity::new(0.0, velocity), behavior));
        FrameDriver::new(handle)
    }

    fn drag(&self, dy: f32) -> Offset {
        self.logic
            .dispatch_scroll(Offset::new(0.0, dy), NestedScrollSource::Drag)
    }

    /// Releases with `velocity` and pumps frames until everything settles.
    /// Returns the largest offset seen along the way.
    fn release(&self, velocity: f32) -> f32 {
        let mut driver = self.fling(velocity);

        let mut peak = self.overscroll.offset().abs();
        for _ in 0..600 {
            driver.advance();
            peak = peak.max(self.overscroll.offset().abs());
            if driver.is_idle() {
                break;
            }
        }
        assert!(driver.is_idle(), "release did not settle");
        peak
    }
}

#[test]
fn pulling_past_the_top_stretches_with_resistance() {
    let scene = Scene::new(0.0, 1_000.0);

    let mut offsets = Vec::new();
    for _ in 0..10 {
        let consumed = scene.drag(10.0);
        assert_eq!(consumed, Offset::new(0.0, 10.0));
        offsets.push(scene.overscroll.offset());
    }

    assert_eq!(scene.list.value(), 0.0);
    assert!(offsets.windows(2).all(|pair| pair[1] > pair[0]));
    assert!(offsets[9] < 100.0, "offset {}", offsets[9]);
    assert_eq!(scene.overscroll.phase(), OverscrollPhase::Stretched);
}

#[test]
fn release_without_velocity_springs_back_to_rest() {
    let scene = Scene::new(0.0, 1_000.0);
    for _ in 0..6 {
        scene.drag(15.0);
    }
    let stretched = scene.overscroll.offset();
    assert!(stretched > 20.0);

    let peak = scene.release(0.0);
    assert!(peak <= stretched + 0.01);
    assert_eq!(scene.overscroll.offset(), 0.0);
    assert_eq!(scene.overscroll.phase(), OverscrollPhase::AtRest);
    assert_eq!(scene.overscroll.translation().y, 0);
}

#[test]
fn dragging_back_through_rest_scrolls_the_list() {
    let scene = Scene::new(0.0, 1_000.0);
    scene.drag(20.0);
    assert_eq!(scene.overscroll.offset(), 20.0);

    let consumed = scene.drag(-25.0);
    assert_eq!(consumed, Offset::new(0.0, -25.0));
    assert_eq!(scene.overscroll.offset(), 0.0);
    assert_eq!(scene.list.value(), 5.0);
}

#[test]
fn fling_into_the_edge_bounces() {
    let scene = Scene::new(100.0, 1_000.0);

    let peak = scene.release(3_000.0);

    assert_eq!(scene.list.value(), 0.0);
    assert!(peak > 10.0, "peak {peak}");
    assert_eq!(scene.overscroll.offset(), 0.0);
    assert!(!scene.logic.is_flinging());
}

#[test]
fn fling_inside_content_leaves_overscroll_alone() {
    let scene = Scene::new(500.0, 10_000.0);

    let peak = scene.release(-1_500.0);

    assert!(scene.list.value() > 800.0);
    assert!(peak < 0.5, "peak {peak}");
}

#[test]
fn touch_during_bounce_freezes_the_stretch() {
    let scene = Scene::new(0.0, 1_000.0);
    for _ in 0..4 {
        scene.drag(20.0);
    }

    let mut driver = scene.fling(0.0);

    for _ in 0..4 {
        driver.advance();
    }
    let frozen = scene.overscroll.offset();
    assert!(frozen > 1.0);

    // A new finger lands: the fling is dropped and the stretch stays put.
    scene.drag(0.0);
    assert_eq!(scene.overscroll.offset(), frozen);
    assert!(!scene.logic.is_flinging());
    driver.run_until_idle(30);
    assert_eq!(scene.overscroll.offset(), frozen);
    assert_eq!(scene.overscroll.phase(), OverscrollPhase::Stretched);
    assert_eq!(scene.list.value(), 0.0);
}

#[test]
fn outer_decorator_claims_the_stretch_when_propagating() {
    let scene = Scene::new(0.0, 1_000.0);
    let outer = Overscroll::vertical(scene.runtime.handle(), OverscrollConfig::default());
    scene.overscroll.attach(&outer.nested_scroll_node());

    scene.drag(30.0);
    assert_eq!(outer.offset(), 30.0);
    assert_eq!(scene.overscroll.offset(), 0.0);

    // Relaxing goes through the outer decorator first as well.
    let consumed = scene.drag(-5.0);
    assert_eq!(consumed, Offset::new(0.0, -5.0));
    assert_eq!(outer.offset(), 25.0);
    assert_eq!(scene.list.value(), 0.0);
}

#[test]
fn inner_decorator_keeps_the_stretch_without_propagation() {
    let scene = Scene::new(0.0, 1_000.0);
    scene
        .overscroll
        .update_config(OverscrollConfig::default().with_propagate_to_parent(false));
    let outer = Overscroll::vertical(scene.runtime.handle(), OverscrollConfig::default());
    scene.overscroll.attach(&outer.nested_scroll_node());

    scene.drag(30.0);
    assert_eq!(scene.overscroll.offset(), 30.0);
    assert_eq!(outer.offset(), 0.0);
}
