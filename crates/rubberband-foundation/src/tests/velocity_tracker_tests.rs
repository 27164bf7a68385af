use super::*;

use crate::pointer::HistoricalChange;

fn assert_close(actual: f32, expected: f32, tolerance: f32) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected ~{expected}, got {actual}"
    );
}

#[test]
fn empty_tracker_returns_zero() {
    let tracker = VelocityTracker1D::new();
    assert_eq!(tracker.calculate_velocity(), 0.0);
}

#[test]
fn single_point_returns_zero() {
    let mut tracker = VelocityTracker1D::new();
    tracker.add_data_point(0, 100.0);
    assert_eq!(tracker.calculate_velocity(), 0.0);
}

#[test]
fn two_samples_give_their_slope() {
    let mut tracker = VelocityTracker::new();
    tracker.add_position(0, Offset::new(0.0, 0.0));
    tracker.add_position(100, Offset::new(0.0, 10.0));

    let velocity = tracker.calculate_velocity();
    assert_close(velocity.x, 0.0, 1e-3);
    assert_close(velocity.y, 100.0, 0.5);
}

#[test]
fn constant_velocity() {
    let mut tracker = VelocityTracker1D::new();
    // 100 px per 10ms = 10000 px/s
    for step in 0..4 {
        tracker.add_data_point(step * 10, step as f32 * 100.0);
    }
    assert_close(tracker.calculate_velocity(), 10_000.0, 1.0);
}

#[test]
fn negative_velocity() {
    let mut tracker = VelocityTracker1D::new();
    tracker.add_data_point(0, 300.0);
    tracker.add_data_point(10, 200.0);
    tracker.add_data_point(20, 100.0);
    assert_close(tracker.calculate_velocity(), -10_000.0, 1.0);
}

#[test]
fn decelerating_motion_reports_velocity_at_newest_sample() {
    let mut tracker = VelocityTracker1D::new();
    // x = 20t - 0.1t², so dx/dt at t=60ms is 8 px/ms.
    for t in (0..=60).step_by(10) {
        let t_f = t as f32;
        tracker.add_data_point(t, 20.0 * t_f - 0.1 * t_f * t_f);
    }
    assert_close(tracker.calculate_velocity(), 8_000.0, 5.0);
}

#[test]
fn samples_outside_horizon_are_ignored() {
    let mut tracker = VelocityTracker1D::new();
    tracker.add_data_point(0, 5_000.0);
    tracker.add_data_point(200, 0.0);
    tracker.add_data_point(210, 10.0);
    assert_close(tracker.calculate_velocity(), 1_000.0, 0.5);
}

#[test]
fn rest_gap_discards_earlier_motion_when_configured() {
    let config = VelocityTrackerConfig {
        assume_stopped_ms: Some(40),
        ..VelocityTrackerConfig::default()
    };
    let mut tracker = VelocityTracker1D::with_config(config);
    tracker.add_data_point(0, 0.0);
    tracker.add_data_point(10, 100.0);
    tracker.add_data_point(80, 100.0);
    tracker.add_data_point(90, 100.0);
    assert_close(tracker.calculate_velocity(), 0.0, 1e-3);

    let mut unbounded = VelocityTracker1D::with_config(VelocityTrackerConfig {
        degree: 1,
        ..VelocityTrackerConfig::default()
    });
    unbounded.add_data_point(0, 0.0);
    unbounded.add_data_point(10, 100.0);
    unbounded.add_data_point(80, 100.0);
    unbounded.add_data_point(90, 100.0);
    assert!(unbounded.calculate_velocity() > 100.0);
}

#[test]
fn velocity_capped() {
    let mut tracker = VelocityTracker1D::new();
    tracker.add_data_point(0, 0.0);
    tracker.add_data_point(1, 10_000.0);
    assert_eq!(tracker.calculate_velocity_with_max(8_000.0), 8_000.0);

    tracker.reset_tracking();
    tracker.add_data_point(0, 10_000.0);
    tracker.add_data_point(1, 0.0);
    assert_eq!(tracker.calculate_velocity_with_max(8_000.0), -8_000.0);
    assert_eq!(tracker.calculate_velocity_with_max(0.0), 0.0);
    assert_eq!(tracker.calculate_velocity_with_max(f32::NAN), 0.0);
}

#[test]
fn identical_timestamps_do_not_produce_nan() {
    let mut tracker = VelocityTracker1D::new();
    tracker.add_data_point(5, 0.0);
    tracker.add_data_point(5, 10.0);
    let velocity = tracker.calculate_velocity();
    assert!(velocity.is_finite());
}

#[test]
fn reset_returns_zero() {
    let mut tracker = VelocityTracker::new();
    tracker.add_position(0, Offset::new(0.0, 0.0));
    tracker.add_position(16, Offset::new(40.0, 40.0));
    tracker.reset_tracking();
    assert_eq!(tracker.calculate_velocity(), Velocity::ZERO);
}

#[test]
fn pointer_changes_replay_historical_samples() {
    let mut tracker = VelocityTracker::new();
    let down = PointerInputChange::down(1, 0, Offset::new(0.0, 0.0));
    tracker.add_pointer_input_change(&down);

    let moved = down.move_to(30, Offset::new(30.0, 0.0)).with_historical(vec![
        HistoricalChange {
            uptime_ms: 10,
            position: Offset::new(10.0, 0.0),
        },
        HistoricalChange {
            uptime_ms: 20,
            position: Offset::new(20.0, 0.0),
        },
    ]);
    tracker.add_pointer_input_change(&moved);

    assert_eq!(tracker.x.sample_count(), 4);
    let velocity = tracker.calculate_velocity();
    assert_close(velocity.x, 1_000.0, 0.5);
    assert_close(velocity.y, 0.0, 1e-3);
}

#[test]
fn new_down_starts_a_fresh_gesture() {
    let mut tracker = VelocityTracker::new();
    let first = PointerInputChange::down(1, 0, Offset::new(0.0, 0.0));
    tracker.add_pointer_input_change(&first);
    tracker.add_pointer_input_change(&first.move_to(16, Offset::new(0.0, 160.0)));
    assert!(tracker.calculate_velocity().y > 0.0);

    let second = PointerInputChange::down(2, 500, Offset::new(0.0, 300.0));
    tracker.add_pointer_input_change(&second);
    assert_eq!(tracker.calculate_velocity(), Velocity::ZERO);

    tracker.add_pointer_input_change(&second.move_to(510, Offset::new(0.0, 290.0)));
    assert_close(tracker.calculate_velocity().y, -1_000.0, 0.5);
}

#[test]
fn quartic_fit_over_long_history_tracks_quadratic_motion() {
    let config = VelocityTrackerConfig {
        degree: 4,
        ..VelocityTrackerConfig::default()
    };
    let mut tracker = VelocityTracker1D::with_config(config);
    // 41 samples 1ms apart; x = 20t - 0.1t², so dx/dt at t=40ms is 12 px/ms.
    for t in 0..=40 {
        let t_f = t as f32;
        tracker.add_data_point(t, 20.0 * t_f - 0.1 * t_f * t_f);
    }
    assert_close(tracker.calculate_velocity(), 12_000.0, 5.0);
}
