use derive_more::{Deref, From};
use serde::Deserialize;

use crate::{Contains, Point};

/// A closed polygon used as a pointer activation region.
///
/// The last vertex connects back to the first one. Polygons with fewer than three vertices contain
/// nothing.
#[derive(Debug, Clone, PartialEq, Default, Deref, From, Deserialize)]
#[serde(transparent)]
pub struct Polygon(Vec<Point>);

impl Polygon {
    pub fn new(points: impl IntoIterator<Item = impl Into<Point>>) -> Self {
        Self(points.into_iter().map(Into::into).collect())
    }

    /// Returns a copy of this polygon moved by `offset`.
    pub fn translated(&self, offset: Point) -> Self {
        Self(self.0.iter().map(|p| *p + offset).collect())
    }
}

impl Contains<Point> for Polygon {
    /// Even-odd ray casting. Points exactly on an edge may report either side.
    fn contains(&self, point: Point) -> bool {
        let points = &self.0;
        if points.len() < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = points.len() - 1;
        for i in 0..points.len() {
            let (a, b) = (points[i], points[j]);
            if (a.y > point.y) != (b.y > point.y)
                && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}
