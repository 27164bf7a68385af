//! Plays a scripted gesture against a list wrapped in an overscroll decorator
//! and prints the stretch frame by frame.

use std::rc::Rc;
use std::sync::Arc;

use rubberband_core::{DefaultScheduler, FrameDriver, Runtime, DEFAULT_FRAME_INTERVAL_NANOS};
use rubberband_foundation::{
    NestedScrollSource, Offset, Orientation, PointerInputChange, ScrollState, ScrollingLogic,
    Velocity, VelocityTracker, DRAG_THRESHOLD, MAX_FLING_VELOCITY,
};
use rubberband_ui::{Overscroll, OverscrollConfig, OverscrollFlingBehavior};

const FRAME_MS: i64 = (DEFAULT_FRAME_INTERVAL_NANOS / 1_000_000) as i64;
const MAX_SETTLE_FRAMES: usize = 600;

struct Screen {
    runtime: Runtime,
    list: ScrollState,
    logic: Rc<ScrollingLogic>,
    overscroll: Rc<Overscroll>,
}

impl Screen {
    fn new() -> Self {
        let runtime = Runtime::new(Arc::new(DefaultScheduler));
        let list = ScrollState::new(0.0, 2_400.0);
        let logic = ScrollingLogic::new(
            Rc::new(list.clone()),
            Orientation::Vertical,
            Rc::new(OverscrollFlingBehavior::new(runtime.handle())),
        );
        let overscroll = Rc::new(Overscroll::vertical(
            runtime.handle(),
            OverscrollConfig::default().with_spring_damping(0.6),
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

    fn report(&self, label: &str) {
        println!(
            "{label:>8}  list={:>8.2}  stretch={:>7.2}  translation={:>4}  {:?}",
            self.list.value(),
            self.overscroll.offset(),
            self.overscroll.translation().y,
            self.overscroll.phase(),
        );
    }

    /// Feeds a straight drag from `from` by `steps` moves of `step`, one per
    /// frame, then lifts. Returns the release velocity.
    fn drag(&self, tracker: &mut VelocityTracker, from: Offset, step: Offset, steps: usize) -> f32 {
        let mut time = 0;
        let mut change = PointerInputChange::down(1, time, from);
        tracker.add_pointer_input_change(&change);
        let mut slop_passed = false;
        for _ in 0..steps {
            time += FRAME_MS;
            change = change.move_to(time, change.position + step);
            tracker.add_pointer_input_change(&change);
            let delta = change.position_change();
            if !slop_passed {
                slop_passed = (change.position - from).y.abs() > DRAG_THRESHOLD;
                if !slop_passed {
                    continue;
                }
            }
            self.logic.dispatch_scroll(delta, NestedScrollSource::Drag);
            self.report("drag");
        }
        change = change.up(time, change.position);
        tracker.add_pointer_input_change(&change);
        tracker.calculate_velocity_with_max(MAX_FLING_VELOCITY).y
    }

    fn release(&self, velocity: f32) {
        let handle = self.runtime.handle();
        let behavior = Rc::new(OverscrollFlingBehavior::new(handle.clone()));
        if !self
            .logic
            .launch_fling(&handle, Velocity::new(0.0, velocity), behavior)
        {
            log::warn!("runtime gone, release ignored");
            return;
        }
        let mut driver = FrameDriver::new(handle);
        for frame in 0..MAX_SETTLE_FRAMES {
            driver.advance();
            if frame % 4 == 0 {
                self.report("settle");
            }
            if driver.is_idle() {
                break;
            }
        }
        self.report("rest");
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let screen = Screen::new();
    let mut tracker = VelocityTracker::new();

    println!("=== pull down past the top, release slowly ===");
    let velocity = screen.drag(&mut tracker, Offset::new(200.0, 100.0), Offset::new(0.0, 12.0), 16);
    log::info!("release velocity {velocity:.1} px/s");
    screen.release(velocity.min(0.0));

    println!("=== scroll into the list, then fling back to the top ===");
    screen.drag(&mut tracker, Offset::new(200.0, 600.0), Offset::new(0.0, -30.0), 12);
    let velocity = screen.drag(&mut tracker, Offset::new(200.0, 100.0), Offset::new(0.0, 45.0), 6);
    log::info!("fling velocity {velocity:.1} px/s");
    screen.release(velocity);
}
