//! Geometric primitives: Offset, Velocity, IntOffset, Rect

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A 2D displacement in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn round(&self) -> IntOffset {
        IntOffset::new(self.x.round() as i32, self.y.round() as i32)
    }
}

/// A 2D velocity in logical pixels per second.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Velocity {
    pub const ZERO: Velocity = Velocity { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Clamps each component to `[-max, max]`.
    pub fn clamp_magnitude(&self, max: f32) -> Self {
        Self {
            x: self.x.clamp(-max, max),
            y: self.y.clamp(-max, max),
        }
    }
}

/// Integer pixel offset, what actually gets applied as a translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub struct IntOffset {
    pub x: i32,
    pub y: i32,
}

impl IntOffset {
    pub const ZERO: IntOffset = IntOffset { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            width: self.width,
            height: self.height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Overlap of the two rectangles; empty (zero sized) when they do not touch.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect {
            x: left,
            y: top,
            width: (right - left).max(0.0),
            height: (bottom - top).max(0.0),
        }
    }
}

macro_rules! impl_vector_ops {
    ($ty:ident) => {
        impl Add for $ty {
            type Output = $ty;

            fn add(self, rhs: $ty) -> $ty {
                $ty::new(self.x + rhs.x, self.y + rhs.y)
            }
        }

        impl Sub for $ty {
            type Output = $ty;

            fn sub(self, rhs: $ty) -> $ty {
                $ty::new(self.x - rhs.x, self.y - rhs.y)
            }
        }

        impl AddAssign for $ty {
            fn add_assign(&mut self, rhs: $ty) {
                self.x += rhs.x;
                self.y += rhs.y;
            }
        }

        impl SubAssign for $ty {
            fn sub_assign(&mut self, rhs: $ty) {
                self.x -= rhs.x;
                self.y -= rhs.y;
            }
        }

        impl Neg for $ty {
            type Output = $ty;

            fn neg(self) -> $ty {
                $ty::new(-self.x, -self.y)
            }
        }

        impl Mul<f32> for $ty {
            type Output = $ty;

            fn mul(self, rhs: f32) -> $ty {
                $ty::new(self.x * rhs, self.y * rhs)
            }
        }
    };
}

impl_vector_ops!(Offset);
impl_vector_ops!(Velocity);
