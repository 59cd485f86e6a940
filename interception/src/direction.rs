use derive_more::Display;
use serde::Deserialize;

/// Travel direction along the x axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Display, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards increasing x.
    #[default]
    #[display("right")]
    Right,
    #[display("left")]
    Left,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Right => 1.0,
            Direction::Left => -1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
        }
    }

    /// `true` if `position` lies past `threshold` when travelling in this direction.
    pub fn has_passed(self, threshold: f64, position: f64) -> bool {
        self.sign() * (threshold - position) < 0.0
    }
}
