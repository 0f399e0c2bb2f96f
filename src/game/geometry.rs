//! 2D vector helpers used by movement, shooting, collision and zone checks

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

use super::InputError;

/// Continuous world-space vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Self) -> f64 {
        (other - self).length()
    }

    /// Unit vector in the same direction, `None` for zero or non-finite input
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if !len.is_finite() || len <= f64::EPSILON {
            return None;
        }
        Some(Self::new(self.x / len, self.y / len))
    }

    /// True while both coordinates are >= 0
    pub fn in_positive_quadrant(self) -> bool {
        self.x >= 0.0 && self.y >= 0.0
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// A unit-length direction. Only constructible from a non-degenerate vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction(Vec2);

impl Direction {
    /// Normalizes `(dx, dy)`; zero-magnitude and non-finite input is rejected.
    pub fn new(dx: f64, dy: f64) -> Result<Self, InputError> {
        Vec2::new(dx, dy)
            .normalized()
            .map(Self)
            .ok_or(InputError::DegenerateDirection)
    }

    pub fn as_vec(self) -> Vec2 {
        self.0
    }
}

/// Axis-aligned rectangle, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
        )
    }
}
