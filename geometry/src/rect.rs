use serde::Deserialize;

use crate::{Contains, Point, Polygon};

/// An axis aligned rectangle, used as the hit region of on-screen buttons.
#[derive(Copy, Clone, PartialEq, Debug, Default, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub const ZERO: Self = Self {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    #[must_use]
    pub fn new(origin: impl Into<Point>, width: f64, height: f64) -> Self {
        let origin = origin.into();
        Self {
            left: origin.x,
            top: origin.y,
            right: origin.x + width,
            bottom: origin.y + height,
        }
    }

    /// A rectangle of the given size around `center`. Images in the vignettes are placed by
    /// their center.
    #[must_use]
    pub fn centered(center: impl Into<Point>, width: f64, height: f64) -> Self {
        let center = center.into();
        Self::new(
            (center.x - width / 2.0, center.y - height / 2.0),
            width,
            height,
        )
    }

    pub fn is_empty(&self) -> bool {
        // Written as the negation so that NaN values count as empty.
        !(self.left < self.right && self.top < self.bottom)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.left * 0.5 + self.right * 0.5,
            self.top * 0.5 + self.bottom * 0.5,
        )
    }

    /// Returns a clockwise quad starting at left / top.
    pub fn to_quad(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right, self.top),
            Point::new(self.right, self.bottom),
            Point::new(self.left, self.bottom),
        ]
    }
}

impl Contains<Point> for Rect {
    fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right && p.y >= self.top && p.y < self.bottom
    }
}

impl From<Rect> for Polygon {
    fn from(rect: Rect) -> Self {
        Polygon::new(rect.to_quad())
    }
}
