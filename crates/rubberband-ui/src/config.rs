//! Overscroll configuration.

use std::fmt;
use std::rc::Rc;

use rubberband_animation::{SpringSpec, DAMPING_RATIO_NO_BOUNCY, MIN_SPRING_STIFFNESS};

use crate::easing::{parabola_scroll_easing, DEFAULT_RESISTANCE};

/// Offsets closer to zero than this are treated as at rest.
pub const VISIBILITY_THRESHOLD: f32 = 0.5;

/// Soft enough for a cushioned return. Values above `STIFFNESS_MEDIUM_LOW`
/// start to feel abrupt.
pub const DEFAULT_SPRING_STIFFNESS: f32 = 300.0;

/// Maps `(current offset, incoming delta)` to the new offset.
#[derive(Clone)]
pub enum ScrollEasing {
    Parabolic { p: f32 },
    Custom(Rc<dyn Fn(f32, f32) -> f32>),
}

impl ScrollEasing {
    pub fn custom(easing: impl Fn(f32, f32) -> f32 + 'static) -> Self {
        ScrollEasing::Custom(Rc::new(easing))
    }

    pub fn ease(&self, current: f32, incoming: f32) -> f32 {
        match self {
            ScrollEasing::Parabolic { p } => parabola_scroll_easing(current, incoming, *p),
            ScrollEasing::Custom(easing) => easing(current, incoming),
        }
    }
}

impl Default for ScrollEasing {
    fn default() -> Self {
        ScrollEasing::Parabolic {
            p: DEFAULT_RESISTANCE,
        }
    }
}

/// Identity, not behavior: two custom easings are equal only when they are
/// the same closure.
impl PartialEq for ScrollEasing {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ScrollEasing::Parabolic { p: a }, ScrollEasing::Parabolic { p: b }) => {
                a.to_bits() == b.to_bits()
            }
            (ScrollEasing::Custom(a), ScrollEasing::Custom(b)) => {
                std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
            }
            _ => false,
        }
    }
}

impl fmt::Debug for ScrollEasing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrollEasing::Parabolic { p } => f.debug_struct("Parabolic").field("p", p).finish(),
            ScrollEasing::Custom(easing) => f
                .debug_tuple("Custom")
                .field(&Rc::as_ptr(easing))
                .finish(),
        }
    }
}

/// Rejected overscroll parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    NonFiniteStiffness(f32),
    NonPositiveStiffness(f32),
    NonFiniteDamping(f32),
    NegativeDamping(f32),
    NonPositiveResistance(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonFiniteStiffness(value) => {
                write!(f, "spring stiffness must be finite, got {value}")
            }
            ConfigError::NonPositiveStiffness(value) => {
                write!(f, "spring stiffness must be positive, got {value}")
            }
            ConfigError::NonFiniteDamping(value) => {
                write!(f, "spring damping ratio must be finite, got {value}")
            }
            ConfigError::NegativeDamping(value) => {
                write!(f, "spring damping ratio must not be negative, got {value}")
            }
            ConfigError::NonPositiveResistance(value) => {
                write!(f, "drag resistance must be positive and finite, got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Tunables of one overscroll decorator.
///
/// Equality is identity-based (bitwise floats, closure pointers) and decides
/// when the decorator rebuilds its coordinator.
#[derive(Clone, Debug)]
pub struct OverscrollConfig {
    /// Offer deltas and velocities to ancestors before handling them.
    pub propagate_to_parent: bool,
    pub easing: ScrollEasing,
    pub spring_stiffness: f32,
    pub spring_damping: f32,
}

impl Default for OverscrollConfig {
    fn default() -> Self {
        Self {
            propagate_to_parent: true,
            easing: ScrollEasing::default(),
            spring_stiffness: DEFAULT_SPRING_STIFFNESS,
            spring_damping: DAMPING_RATIO_NO_BOUNCY,
        }
    }
}

impl PartialEq for OverscrollConfig {
    fn eq(&self, other: &Self) -> bool {
        self.propagate_to_parent == other.propagate_to_parent
            && self.easing == other.easing
            && self.spring_stiffness.to_bits() == other.spring_stiffness.to_bits()
            && self.spring_damping.to_bits() == other.spring_damping.to_bits()
    }
}

impl OverscrollConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_propagate_to_parent(mut self, propagate: bool) -> Self {
        self.propagate_to_parent = propagate;
        self
    }

    pub fn with_easing(mut self, easing: ScrollEasing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_spring_stiffness(mut self, stiffness: f32) -> Self {
        self.spring_stiffness = stiffness;
        self
    }

    pub fn with_spring_damping(mut self, damping: f32) -> Self {
        self.spring_damping = damping;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let stiffness = self.spring_stiffness;
        if !stiffness.is_finite() {
            return Err(ConfigError::NonFiniteStiffness(stiffness));
        }
        if stiffness <= 0.0 {
            return Err(ConfigError::NonPositiveStiffness(stiffness));
        }
        let damping = self.spring_damping;
        if !damping.is_finite() {
            return Err(ConfigError::NonFiniteDamping(damping));
        }
        if damping < 0.0 {
            return Err(ConfigError::NegativeDamping(damping));
        }
        if let ScrollEasing::Parabolic { p } = self.easing {
            if !p.is_finite() || p <= 0.0 {
                return Err(ConfigError::NonPositiveResistance(p));
            }
        }
        Ok(())
    }

    /// Clamps every degenerate parameter into a usable one, logging what changed.
    pub fn sanitized(mut self) -> Self {
        if let Err(error) = self.validate() {
            log::warn!("overscroll config adjusted: {error}");
        }

        self.spring_stiffness = if self.spring_stiffness.is_finite() {
            self.spring_stiffness.max(MIN_SPRING_STIFFNESS)
        } else {
            DEFAULT_SPRING_STIFFNESS
        };
        self.spring_damping = if self.spring_damping.is_finite() {
            self.spring_damping.max(0.0)
        } else {
            DAMPING_RATIO_NO_BOUNCY
        };
        if let ScrollEasing::Parabolic { p } = self.easing {
            if !p.is_finite() || p <= 0.0 {
                self.easing = ScrollEasing::default();
            }
        }
        self
    }

    /// The return spring, settling within [`VISIBILITY_THRESHOLD`].
    pub fn spring_spec(&self) -> SpringSpec {
        SpringSpec::new(
            self.spring_damping,
            self.spring_stiffness,
            VISIBILITY_THRESHOLD,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = OverscrollConfig::default();
        assert!(config.propagate_to_parent);
        assert_eq!(config.easing, ScrollEasing::Parabolic { p: 50.0 });
        assert_eq!(config.spring_stiffness, 300.0);
        assert_eq!(config.spring_damping, 1.0);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn validate_reports_first_bad_field() {
        let zero = OverscrollConfig::new().with_spring_stiffness(0.0);
        assert_eq!(zero.validate(), Err(ConfigError::NonPositiveStiffness(0.0)));

        let bouncy = OverscrollConfig::new().with_spring_damping(-0.5);
        assert_eq!(bouncy.validate(), Err(ConfigError::NegativeDamping(-0.5)));

        let stuck = OverscrollConfig::new().with_easing(ScrollEasing::Parabolic { p: 0.0 });
        assert_eq!(stuck.validate(), Err(ConfigError::NonPositiveResistance(0.0)));

        assert!(matches!(
            OverscrollConfig::new()
                .with_spring_stiffness(f32::INFINITY)
                .validate(),
            Err(ConfigError::NonFiniteStiffness(_))
        ));
        assert!(matches!(
            OverscrollConfig::new()
                .with_spring_damping(f32::NAN)
                .validate(),
            Err(ConfigError::NonFiniteDamping(_))
        ));
    }

    #[test]
    fn sanitized_clamps_into_valid_range() {
        let config = OverscrollConfig::new()
            .with_spring_stiffness(0.0)
            .with_spring_damping(f32::NAN)
            .with_easing(ScrollEasing::Parabolic { p: -1.0 })
            .sanitized();
        assert_eq!(config.spring_stiffness, MIN_SPRING_STIFFNESS);
        assert_eq!(config.spring_damping, DAMPING_RATIO_NO_BOUNCY);
        assert_eq!(config.easing, ScrollEasing::default());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn equality_is_identity_for_custom_easing() {
        let easing = ScrollEasing::custom(|current, incoming| current + incoming * 0.5);
        let a = OverscrollConfig::new().with_easing(easing.clone());
        let b = OverscrollConfig::new().with_easing(easing);
        assert_eq!(a, b);

        let lookalike = ScrollEasing::custom(|current, incoming| current + incoming * 0.5);
        let c = OverscrollConfig::new().with_easing(lookalike);
        assert_ne!(a, c);
        assert_ne!(a, OverscrollConfig::new());
    }

    #[test]
    fn error_messages_name_the_value() {
        let message = ConfigError::NonPositiveStiffness(-2.0).to_string();
        assert!(message.contains("stiffness") && message.contains("-2"));
    }
}
