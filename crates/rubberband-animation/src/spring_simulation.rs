//! Closed-form damped harmonic oscillator.
//!
//! Displacement is measured from the target, mass is fixed at 1:
//!
//! ```text
//! x'' + 2ζω·x' + ω²·x = 0,   ω = sqrt(stiffness), ζ = damping ratio
//! ```
//!
//! Evaluating the analytic solution at an absolute play time keeps the motion
//! independent of frame pacing, so dropped frames never change the trajectory.

use crate::animation::SpringSpec;

/// Position and velocity of the spring at some instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringMotion {
    pub value: f32,
    pub velocity: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct SpringSimulation {
    natural_freq: f64,
    damping_ratio: f64,
}

impl SpringSimulation {
    pub fn new(spec: &SpringSpec) -> Self {
        Self {
            natural_freq: (spec.stiffness as f64).sqrt(),
            damping_ratio: spec.damping_ratio as f64,
        }
    }

    /// Motion `elapsed_secs` after release from `start` with `initial_velocity`.
    pub fn motion_at(
        &self,
        elapsed_secs: f64,
        start: f32,
        target: f32,
        initial_velocity: f32,
    ) -> SpringMotion {
        let t = elapsed_secs.max(0.0);
        let x0 = (start - target) as f64;
        let v0 = initial_velocity as f64;
        let w = self.natural_freq;
        let zeta = self.damping_ratio;

        let (displacement, velocity) = if (zeta - 1.0).abs() < 1e-6 {
            // Critically damped.
            let c1 = x0;
            let c2 = v0 + w * x0;
            let envelope = (-w * t).exp();
            let x = (c1 + c2 * t) * envelope;
            let v = (c2 - w * (c1 + c2 * t)) * envelope;
            (x, v)
        } else if zeta < 1.0 {
            let wd = w * (1.0 - zeta * zeta).sqrt();
            let decay = zeta * w;
            let c1 = x0;
            let c2 = (v0 + decay * x0) / wd;
            let envelope = (-decay * t).exp();
            let (sin, cos) = (wd * t).sin_cos();
            let x = envelope * (c1 * cos + c2 * sin);
            let v = envelope * ((c2 * wd - decay * c1) * cos - (c1 * wd + decay * c2) * sin);
            (x, v)
        } else {
            let root = w * (zeta * zeta - 1.0).sqrt();
            let gamma_minus = -zeta * w - root;
            let gamma_plus = -zeta * w + root;
            let c1 = (gamma_plus * x0 - v0) / (gamma_plus - gamma_minus);
            let c2 = x0 - c1;
            let e_minus = (gamma_minus * t).exp();
            let e_plus = (gamma_plus * t).exp();
            let x = c1 * e_minus + c2 * e_plus;
            let v = c1 * gamma_minus * e_minus + c2 * gamma_plus * e_plus;
            (x, v)
        };

        SpringMotion {
            value: target + displacement as f32,
            velocity: velocity as f32,
        }
    }
}
