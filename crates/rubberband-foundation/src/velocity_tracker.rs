//! Velocity tracking for fling gestures.
//!
//! Position samples are fitted with a weighted least-squares polynomial over a
//! short horizon and the derivative at the newest sample is reported. Samples
//! near the horizon count half as much as the newest one, so a late change of
//! direction dominates the estimate.

use smallvec::SmallVec;

use crate::pointer::PointerInputChange;
use rubberband_ui_graphics::{Offset, Velocity};

/// Samples older than this (relative to the newest) are ignored.
const HORIZON_MS: i64 = 100;

/// Default polynomial degree; quadratic captures a decelerating finger.
const DEFAULT_DEGREE: usize = 2;

/// Relative weight of a sample exactly at the horizon.
const HORIZON_WEIGHT: f64 = 0.5;

const MIN_SAMPLE_COUNT: usize = 2;

/// Below this the design matrix is treated as singular.
const SINGULAR_NORM: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VelocityTrackerConfig {
    pub horizon_ms: i64,
    /// A gap between consecutive samples longer than this means the pointer
    /// rested, and older samples are not part of the current motion.
    pub assume_stopped_ms: Option<i64>,
    pub degree: usize,
}

impl Default for VelocityTrackerConfig {
    fn default() -> Self {
        Self {
            horizon_ms: HORIZON_MS,
            assume_stopped_ms: None,
            degree: DEFAULT_DEGREE,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct DataPointAtTime {
    time_ms: i64,
    data_point: f32,
}

/// Tracks velocity along a single axis.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker1D {
    samples: Vec<DataPointAtTime>,
    config: VelocityTrackerConfig,
}

impl VelocityTracker1D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: VelocityTrackerConfig) -> Self {
        Self {
            samples: Vec::new(),
            config,
        }
    }

    /// Records a position at `time_ms`. Samples must arrive in non-decreasing time order.
    pub fn add_data_point(&mut self, time_ms: i64, data_point: f32) {
        self.samples.push(DataPointAtTime {
            time_ms,
            data_point,
        });
    }

    /// Estimated velocity in units per second. Zero until two samples are in range.
    pub fn calculate_velocity(&self) -> f32 {
        let Some(newest) = self.samples.last() else {
            return 0.0;
        };

        let mut times = Column::new();
        let mut values = Column::new();
        let mut weights = Column::new();
        let horizon = self.config.horizon_ms.max(1);

        let mut previous_time = newest.time_ms;
        for sample in self.samples.iter().rev() {
            let age = newest.time_ms - sample.time_ms;
            let gap = previous_time - sample.time_ms;
            if age > horizon {
                break;
            }
            if matches!(self.config.assume_stopped_ms, Some(stop) if gap > stop) {
                break;
            }
            previous_time = sample.time_ms;

            times.push(-(age as f64));
            values.push(sample.data_point as f64);
            weights.push(1.0 - (1.0 - HORIZON_WEIGHT) * age as f64 / horizon as f64);
        }

        if times.len() < MIN_SAMPLE_COUNT {
            return 0.0;
        }
        let degree = self.config.degree.min(times.len() - 1);
        if degree == 0 {
            return 0.0;
        }

        match poly_fit_least_squares(&times, &values, &weights, degree) {
            // Coefficient 1 is the slope at the newest sample, in units per millisecond.
            Some(coefficients) => {
                let velocity = (coefficients[1] * 1000.0) as f32;
                if velocity.is_finite() {
                    velocity
                } else {
                    0.0
                }
            }
            None => {
                log::trace!("velocity fit degenerate over {} samples", times.len());
                0.0
            }
        }
    }

    /// Like [`calculate_velocity`](Self::calculate_velocity), clamped to `±max`.
    /// A `max` that is not a positive number yields zero.
    pub fn calculate_velocity_with_max(&self, max: f32) -> f32 {
        if !(max.is_finite() && max > 0.0) {
            return 0.0;
        }
        self.calculate_velocity().clamp(-max, max)
    }

    pub fn reset_tracking(&mut self) {
        self.samples.clear();
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

/// One value per sample. Inline capacity covers a full horizon of touch events.
type Column = SmallVec<[f64; 32]>;
/// One column per polynomial term.
type Basis = SmallVec<[Column; 4]>;
type Coefficients = SmallVec<[f64; 4]>;

/// Weighted polynomial fit via Gram-Schmidt QR.
///
/// Returns coefficients lowest order first, or `None` if the samples do not
/// span `degree + 1` dimensions.
fn poly_fit_least_squares(
    x: &[f64],
    y: &[f64],
    w: &[f64],
    degree: usize,
) -> Option<Coefficients> {
    let m = x.len();
    let n = degree + 1;
    if m < n {
        return None;
    }

    fn dot(a: &[f64], b: &[f64]) -> f64 {
        a.iter().zip(b).map(|(a, b)| a * b).sum()
    }

    // Column i holds w * x^i.
    let mut a = Basis::new();
    a.push(w.iter().copied().collect());
    for i in 1..n {
        let next: Column = a[i - 1].iter().zip(x).map(|(prev, x)| prev * x).collect();
        a.push(next);
    }

    let mut q = Basis::new();
    let mut r: SmallVec<[Coefficients; 4]> =
        (0..n).map(|_| Coefficients::from_elem(0.0, n)).collect();
    for j in 0..n {
        let mut column = a[j].clone();
        for basis in &q {
            let projection = dot(&column, basis);
            for (value, b) in column.iter_mut().zip(basis.iter()) {
                *value -= projection * b;
            }
        }
        let norm = dot(&column, &column).sqrt();
        if norm < SINGULAR_NORM {
            return None;
        }
        for value in column.iter_mut() {
            *value /= norm;
        }
        for i in j..n {
            r[j][i] = dot(&column, &a[i]);
        }
        q.push(column);
    }

    let wy: Column = y.iter().zip(w).map(|(y, w)| y * w).collect();
    let mut coefficients = Coefficients::from_elem(0.0, n);
    for i in (0..n).rev() {
        let mut value = dot(&q[i], &wy);
        for j in (i + 1)..n {
            value -= r[i][j] * coefficients[j];
        }
        coefficients[i] = value / r[i][i];
    }
    Some(coefficients)
}

/// Tracks 2D pointer velocity from raw positions or pointer changes.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    x: VelocityTracker1D,
    y: VelocityTracker1D,
    current_pointer_position: Offset,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: VelocityTrackerConfig) -> Self {
        Self {
            x: VelocityTracker1D::with_config(config),
            y: VelocityTracker1D::with_config(config),
            current_pointer_position: Offset::ZERO,
        }
    }

    pub fn add_position(&mut self, time_ms: i64, position: Offset) {
        self.x.add_data_point(time_ms, position.x);
        self.y.add_data_point(time_ms, position.y);
    }

    /// Feeds one pointer change, including its historical sub-frame samples.
    ///
    /// A change that puts the pointer down starts a fresh gesture. Positions
    /// are accumulated from deltas so a pointer that is re-parented mid-gesture
    /// does not appear to jump.
    pub fn add_pointer_input_change(&mut self, change: &PointerInputChange) {
        if change.changed_to_down() {
            self.current_pointer_position = change.position;
            self.reset_tracking();
        }

        let mut previous = change.previous_position;
        for historical in &change.historical {
            self.current_pointer_position += historical.position - previous;
            previous = historical.position;
            self.add_position(historical.uptime_ms, self.current_pointer_position);
        }
        self.current_pointer_position += change.position - previous;
        self.add_position(change.uptime_ms, self.current_pointer_position);
    }

    pub fn calculate_velocity(&self) -> Velocity {
        Velocity::new(self.x.calculate_velocity(), self.y.calculate_velocity())
    }

    /// Per-axis clamp to `±max`; zero when `max` is not a positive number.
    pub fn calculate_velocity_with_max(&self, max: f32) -> Velocity {
        if !(max.is_finite() && max > 0.0) {
            return Velocity::ZERO;
        }
        self.calculate_velocity().clamp_magnitude(max)
    }

    pub fn reset_tracking(&mut self) {
        self.x.reset_tracking();
        self.y.reset_tracking();
    }
}

#[cfg(test)]
#[path = "tests/velocity_tracker_tests.rs"]
mod tests;
