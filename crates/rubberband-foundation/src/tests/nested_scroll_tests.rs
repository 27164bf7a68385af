use super::*;

use rubberband_core::{DefaultScheduler, FrameDriver, Runtime};
use std::cell::Cell;
use std::sync::Arc;

/// Consumes a fixed fraction of everything offered and records the calls.
struct Fraction {
    share: f32,
    pre_calls: Cell<usize>,
    post_calls: Cell<usize>,
}

impl Fraction {
    fn new(share: f32) -> Rc<Self> {
        Rc::new(Self {
            share,
            pre_calls: Cell::new(0),
            post_calls: Cell::new(0),
        })
    }
}

impl NestedScrollConnection for Fraction {
    fn on_pre_scroll(&self, available: Offset, _source: NestedScrollSource) -> Offset {
        self.pre_calls.set(self.pre_calls.get() + 1);
        available * self.share
    }

    fn on_post_scroll(
        &self,
        _consumed: Offset,
        available: Offset,
        _source: NestedScrollSource,
    ) -> Offset {
        self.post_calls.set(self.post_calls.get() + 1);
        available * self.share
    }

    fn on_pre_fling(&self, available: Velocity) -> FlingFuture<'_> {
        let share = self.share;
        Box::pin(async move { available * share })
    }
}

#[test]
fn dispatcher_without_parent_consumes_nothing() {
    let dispatcher = NestedScrollDispatcher::new();
    assert!(!dispatcher.has_parent());
    assert_eq!(
        dispatcher.dispatch_pre_scroll(Offset::new(3.0, 4.0), NestedScrollSource::Drag),
        Offset::ZERO
    );
    assert_eq!(
        dispatcher.dispatch_post_scroll(Offset::ZERO, Offset::new(3.0, 4.0), NestedScrollSource::Fling),
        Offset::ZERO
    );
}

#[test]
fn attached_node_forwards_to_parent_connection() {
    let outer = Fraction::new(0.5);
    let parent = NestedScrollNode::new(outer.clone());
    let child = NestedScrollNode::new(Rc::new(NoOpConnection));
    child.attach(&parent);

    let dispatcher = child.dispatcher();
    let consumed = dispatcher.dispatch_pre_scroll(Offset::new(0.0, 10.0), NestedScrollSource::Drag);
    assert_eq!(consumed, Offset::new(0.0, 5.0));
    assert_eq!(outer.pre_calls.get(), 1);

    child.detach();
    let consumed = dispatcher.dispatch_pre_scroll(Offset::new(0.0, 10.0), NestedScrollSource::Drag);
    assert_eq!(consumed, Offset::ZERO);
    assert_eq!(outer.pre_calls.get(), 1);
}

#[test]
fn dropping_parent_detaches_children() {
    let child = NestedScrollNode::new(Rc::new(NoOpConnection));
    {
        let parent = NestedScrollNode::new(Fraction::new(1.0));
        child.attach(&parent);
        assert!(child.is_attached());
    }
    assert!(!child.is_attached());
    assert_eq!(
        child
            .dispatcher()
            .dispatch_post_scroll(Offset::ZERO, Offset::new(0.0, 1.0), NestedScrollSource::Drag),
        Offset::ZERO
    );
}

#[test]
fn swapping_connection_keeps_chain_position() {
    let parent = NestedScrollNode::new(Fraction::new(0.25));
    let child = NestedScrollNode::new(Rc::new(NoOpConnection));
    child.attach(&parent);

    let replacement = Fraction::new(1.0);
    parent.set_connection(replacement.clone());

    let consumed = child.dispatcher().dispatch_post_scroll(
        Offset::ZERO,
        Offset::new(8.0, 0.0),
        NestedScrollSource::Drag,
    );
    assert_eq!(consumed, Offset::new(8.0, 0.0));
    assert_eq!(replacement.post_calls.get(), 1);
}

#[test]
fn fling_hooks_resolve_through_the_chain() {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    let mut driver = FrameDriver::new(runtime.handle());

    let parent = NestedScrollNode::new(Fraction::new(0.5));
    let child = NestedScrollNode::new(Rc::new(NoOpConnection));
    child.attach(&parent);

    let dispatcher = child.dispatcher();
    let pre = driver
        .run_to_completion(
            async move {
                let pre = dispatcher.dispatch_pre_fling(Velocity::new(0.0, -400.0)).await;
                let post = dispatcher
                    .dispatch_post_fling(Velocity::ZERO, Velocity::new(0.0, -400.0))
                    .await;
                (pre, post)
            },
            0,
        )
        .expect("ready futures resolve without frames");

    assert_eq!(pre.0, Velocity::new(0.0, -200.0));
    // Default post-fling consumes nothing.
    assert_eq!(pre.1, Velocity::ZERO);
}
