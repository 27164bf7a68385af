//! Drag resistance for rubber-band offsets.

/// Resistance that reproduces the platform feel the default config aims for.
pub const DEFAULT_RESISTANCE: f32 = 50.0;

/// Sign with `sign(0) == 0`, unlike [`f32::signum`]. NaN maps to 0.
pub(crate) fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Parabolic resistance curve.
///
/// Stretching further (`incoming` with the same sign as `current`) is scaled
/// down by `p / sqrt(p * |current + incoming / 2|)`, clamped to `(0, 1]`, so
/// each pixel of drag moves the offset less the further it is stretched.
/// Relaxing (opposite signs, or `current == 0`) applies `incoming` unchanged.
///
/// Larger `p` means less resistance. A non-positive `p` is treated as the
/// smallest positive resistance. A non-finite `incoming` leaves the offset
/// where it is; a non-finite `current` is treated as 0.
pub fn parabola_scroll_easing(current: f32, incoming: f32, p: f32) -> f32 {
    let current = if current.is_finite() { current } else { 0.0 };
    if !incoming.is_finite() {
        return current;
    }
    let p = if p.is_finite() && p > 0.0 {
        p
    } else {
        f32::MIN_POSITIVE
    };

    let mid = (current + incoming / 2.0).abs().max(f32::MIN_POSITIVE);
    let ratio = p / (p * mid).sqrt();
    let ratio = if ratio.is_nan() {
        1.0
    } else {
        ratio.clamp(f32::MIN_POSITIVE, 1.0)
    };

    if sign(current) == sign(incoming) {
        current + incoming * ratio
    } else {
        current + incoming
    }
}

/// [`parabola_scroll_easing`] with [`DEFAULT_RESISTANCE`].
pub fn default_scroll_easing(current: f32, incoming: f32) -> f32 {
    parabola_scroll_easing(current, incoming, DEFAULT_RESISTANCE)
}

#[cfg(test)]
#[path = "tests/easing_tests.rs"]
mod tests;
