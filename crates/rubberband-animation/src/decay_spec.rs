//! Decay animation specification for fling animations.
//!
//! A decay has no fixed target: it starts with a velocity and decelerates to
//! zero. The exponential variant uses a constant friction multiplier, the
//! same model as Compose's `exponentialDecay()`.

/// Trait for decay animation specifications.
pub trait FloatDecayAnimationSpec {
    /// Velocity threshold below which animation is considered finished.
    fn abs_velocity_threshold(&self) -> f32;

    /// Get position at a given time.
    fn get_value_from_nanos(
        &self,
        play_time_nanos: i64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32;

    /// Get velocity at a given time.
    fn get_velocity_from_nanos(
        &self,
        play_time_nanos: i64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32;

    /// Get total animation duration in nanoseconds.
    fn get_duration_nanos(&self, initial_value: f32, initial_velocity: f32) -> i64;

    /// Get the target value (final position) of the animation.
    fn get_target_value(&self, initial_value: f32, initial_velocity: f32) -> f32;
}

/// Friction-based exponential decay: `v(t) = v0 · e^(-4.2 · friction · t)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialDecaySpec {
    friction_multiplier: f32,
    abs_velocity_threshold: f32,
}

const EXPONENTIAL_DECAY_FRICTION: f32 = -4.2;

impl ExponentialDecaySpec {
    pub const DEFAULT_FRICTION_MULTIPLIER: f32 = 1.0;
    pub const DEFAULT_VELOCITY_THRESHOLD: f32 = 0.1;

    pub fn new(friction_multiplier: f32, abs_velocity_threshold: f32) -> Self {
        Self {
            friction_multiplier: friction_multiplier.max(0.0001),
            abs_velocity_threshold: abs_velocity_threshold.abs().max(0.0001),
        }
    }

    fn friction(&self) -> f32 {
        EXPONENTIAL_DECAY_FRICTION * self.friction_multiplier
    }
}

impl Default for ExponentialDecaySpec {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_FRICTION_MULTIPLIER,
            Self::DEFAULT_VELOCITY_THRESHOLD,
        )
    }
}

impl FloatDecayAnimationSpec for ExponentialDecaySpec {
    fn abs_velocity_threshold(&self) -> f32 {
        self.abs_velocity_threshold
    }

    fn get_value_from_nanos(
        &self,
        play_time_nanos: i64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32 {
        let seconds = play_time_nanos.max(0) as f32 / 1_000_000_000.0;
        initial_value - initial_velocity / self.friction()
            + initial_velocity / self.friction() * (self.friction() * seconds).exp()
    }

    fn get_velocity_from_nanos(
        &self,
        play_time_nanos: i64,
        _initial_value: f32,
        initial_velocity: f32,
    ) -> f32 {
        let seconds = play_time_nanos.max(0) as f32 / 1_000_000_000.0;
        initial_velocity * (self.friction() * seconds).exp()
    }

    fn get_duration_nanos(&self, _initial_value: f32, initial_velocity: f32) -> i64 {
        if initial_velocity.abs() <= self.abs_velocity_threshold {
            return 0;
        }
        let seconds =
            (self.abs_velocity_threshold / initial_velocity.abs()).ln() / self.friction();
        (seconds * 1_000_000_000.0) as i64
    }

    fn get_target_value(&self, initial_value: f32, initial_velocity: f32) -> f32 {
        if initial_velocity.abs() <= self.abs_velocity_threshold {
            return initial_value;
        }
        let duration = self.get_duration_nanos(initial_value, initial_velocity);
        self.get_value_from_nanos(duration, initial_value, initial_velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_initial_value_and_velocity() {
        let spec = ExponentialDecaySpec::default();
        assert!((spec.get_value_from_nanos(0, 100.0, 2_000.0) - 100.0).abs() < 1e-3);
        assert!((spec.get_velocity_from_nanos(0, 100.0, 2_000.0) - 2_000.0).abs() < 1e-3);
    }

    #[test]
    fn velocity_decays_below_threshold_at_duration() {
        let spec = ExponentialDecaySpec::default();
        let duration = spec.get_duration_nanos(0.0, 3_000.0);
        assert!(duration > 0);
        let velocity = spec.get_velocity_from_nanos(duration, 0.0, 3_000.0);
        assert!(velocity.abs() <= spec.abs_velocity_threshold() * 1.01);
    }

    #[test]
    fn travel_follows_velocity_sign() {
        let spec = ExponentialDecaySpec::default();
        assert!(spec.get_target_value(0.0, -3_000.0) < -100.0);
        assert!(spec.get_target_value(0.0, 3_000.0) > 100.0);
        assert_eq!(spec.get_target_value(5.0, 0.05), 5.0);
    }
}
