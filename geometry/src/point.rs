use std::ops::{Add, AddAssign, Mul};

use serde_tuple::{Deserialize_tuple, Serialize_tuple};

/// A position on the stage in engine pixels. `y` grows downwards.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize_tuple, Deserialize_tuple)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

pub type Vector = Point;

impl Point {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Mirrors the point horizontally across the vertical center line of a stage of `width`.
    pub fn mirrored_x(&self, width: f64) -> Self {
        Self::new(width - self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirroring_twice_is_identity() {
        let p = Point::new(165.0, 240.0);
        assert_eq!(p.mirrored_x(1000.0), Point::new(835.0, 240.0));
        assert_eq!(p.mirrored_x(1000.0).mirrored_x(1000.0), p);
    }
}
