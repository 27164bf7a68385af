//! Animation system for Rubberband
//!
//! Spring physics for returning a stretched surface to rest, decay physics
//! for flings, and an awaitable [`Animatable`] that ticks on the runtime's
//! frame clock.

pub mod animation;
pub mod decay_spec;
pub mod spring_simulation;

pub use animation::*;
pub use decay_spec::{ExponentialDecaySpec, FloatDecayAnimationSpec};
pub use spring_simulation::{SpringMotion, SpringSimulation};

pub mod prelude {
    pub use crate::animation::{
        Animatable, AnimationEndReason, AnimationResult, AnimationScope, SpringSpec,
    };
    pub use crate::decay_spec::{ExponentialDecaySpec, FloatDecayAnimationSpec};
}
