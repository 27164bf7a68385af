use super::*;

const SAMPLES: [f32; 9] = [0.5, 1.0, 3.0, 10.0, 25.0, 80.0, 200.0, 640.0, 2_000.0];

#[test]
fn zero_stays_zero() {
    assert_eq!(default_scroll_easing(0.0, 0.0), 0.0);
}

#[test]
fn stretching_never_retreats() {
    for current in SAMPLES {
        for incoming in SAMPLES {
            for direction in [1.0, -1.0] {
                let current = current * direction;
                let incoming = incoming * direction;
                let eased = default_scroll_easing(current, incoming);
                assert!(
                    eased.abs() >= current.abs(),
                    "ease({current}, {incoming}) = {eased}"
                );
                assert!(eased.abs() <= (current + incoming).abs());
            }
        }
    }
}

#[test]
fn relaxing_is_not_resisted() {
    for current in SAMPLES {
        for incoming in SAMPLES {
            assert_eq!(default_scroll_easing(current, -incoming), current - incoming);
            assert_eq!(default_scroll_easing(-current, incoming), -current + incoming);
        }
    }
}

#[test]
fn resistance_grows_with_stretch() {
    let near = default_scroll_easing(60.0, 10.0) - 60.0;
    let far = default_scroll_easing(600.0, 10.0) - 600.0;
    assert!(near > far && far > 0.0, "near {near}, far {far}");
}

#[test]
fn larger_p_resists_less() {
    let soft = parabola_scroll_easing(200.0, 10.0, 50.0);
    let loose = parabola_scroll_easing(200.0, 10.0, 150.0);
    assert!(loose > soft);
    // Once the ratio saturates at 1 the delta applies fully.
    assert_eq!(parabola_scroll_easing(10.0, 10.0, 1_000.0), 20.0);
}

#[test]
fn first_delta_from_rest_is_applied_fully() {
    assert_eq!(default_scroll_easing(0.0, 12.0), 12.0);
    assert_eq!(default_scroll_easing(0.0, -12.0), -12.0);
}

#[test]
fn degenerate_inputs_stay_finite() {
    assert_eq!(default_scroll_easing(15.0, f32::NAN), 15.0);
    assert_eq!(default_scroll_easing(15.0, f32::INFINITY), 15.0);
    assert_eq!(default_scroll_easing(f32::NAN, 4.0), 4.0);
    assert!(parabola_scroll_easing(30.0, 5.0, 0.0).is_finite());
    assert!(parabola_scroll_easing(30.0, 5.0, -3.0) >= 30.0);
    assert!(parabola_scroll_easing(1e-30, 1e-30, f32::NAN).is_finite());
}

#[test]
fn sign_treats_zero_as_its_own_direction() {
    assert_eq!(sign(0.0), 0.0);
    assert_eq!(sign(-0.0), 0.0);
    assert_eq!(sign(3.0), 1.0);
    assert_eq!(sign(-3.0), -1.0);
    assert_eq!(sign(f32::NAN), 0.0);
}
