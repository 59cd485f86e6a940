use serde::Deserialize;
use vignettes_animation::InvalidConfiguration;
use vignettes_geometry::Point;

use crate::Direction;

/// Where the bodies of a folding scene rest before anything moves.
///
/// Home positions are given for travelling right. Travelling left mirrors the reference and the
/// controlled body across the stage, collectibles keep their places.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub stage_width: f64,
    /// The rest position of the first collectible.
    pub first_collectible: Point,
    /// Horizontal distance between neighboring collectibles.
    pub spacing: f64,
    /// How far before a collectible, in travel direction, the reference captures it.
    pub intercept_lead: f64,
    pub reference: Point,
    pub controlled: Point,
    /// Position of the display relative to the reference.
    pub display_offset: Point,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            stage_width: 1000.0,
            first_collectible: Point::new(300.0, 395.0),
            spacing: 100.0,
            intercept_lead: 40.0,
            reference: Point::new(165.0, 240.0),
            controlled: Point::new(40.0, 265.0),
            display_offset: Point::new(-27.0, -30.0),
        }
    }
}

/// A layout table of a configuration file. Keys it sets override a scene's own layout.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutSection {
    pub stage_width: Option<f64>,
    pub first_collectible: Option<Point>,
    pub spacing: Option<f64>,
    pub intercept_lead: Option<f64>,
    pub reference: Option<Point>,
    pub controlled: Option<Point>,
    pub display_offset: Option<Point>,
}

impl Layout {
    pub fn apply(self, section: LayoutSection) -> Self {
        Self {
            stage_width: section.stage_width.unwrap_or(self.stage_width),
            first_collectible: section.first_collectible.unwrap_or(self.first_collectible),
            spacing: section.spacing.unwrap_or(self.spacing),
            intercept_lead: section.intercept_lead.unwrap_or(self.intercept_lead),
            reference: section.reference.unwrap_or(self.reference),
            controlled: section.controlled.unwrap_or(self.controlled),
            display_offset: section.display_offset.unwrap_or(self.display_offset),
        }
    }

    pub fn collectible_position(&self, index: usize) -> Point {
        self.first_collectible + Point::new(self.spacing * index as f64, 0.0)
    }

    pub fn threshold(&self, index: usize, direction: Direction) -> f64 {
        self.collectible_position(index).x - self.intercept_lead * direction.sign()
    }

    pub fn reference_home(&self, direction: Direction) -> Point {
        self.mirrored(self.reference, direction)
    }

    pub fn controlled_home(&self, direction: Direction) -> Point {
        self.mirrored(self.controlled, direction)
    }

    pub fn display_home(&self, direction: Direction) -> Point {
        self.reference_home(direction) + self.display_offset
    }

    fn mirrored(&self, point: Point, direction: Direction) -> Point {
        match direction {
            Direction::Right => point,
            Direction::Left => point.mirrored_x(self.stage_width),
        }
    }

    /// Checks that every threshold of `count` collectibles can be reached when travelling in
    /// `direction`.
    pub fn validate(&self, count: usize, direction: Direction) -> Result<(), InvalidConfiguration> {
        let finite = [self.stage_width, self.spacing, self.intercept_lead]
            .iter()
            .all(|v| v.is_finite())
            && [
                self.first_collectible,
                self.reference,
                self.controlled,
                self.display_offset,
            ]
            .iter()
            .all(Point::is_finite);
        if !finite {
            return Err(InvalidConfiguration::layout("values must be finite"));
        }
        if self.stage_width <= 0.0 {
            return Err(InvalidConfiguration::layout("stage width must be positive"));
        }
        if self.spacing <= 0.0 {
            return Err(InvalidConfiguration::layout("spacing must be positive"));
        }

        let start = self.reference_home(direction).x;
        for index in 0..count {
            let threshold = self.threshold(index, direction);
            if !(0.0..self.stage_width).contains(&threshold) {
                return Err(InvalidConfiguration::layout(format!(
                    "threshold {threshold} of collectible {index} is off stage"
                )));
            }
            if direction.has_passed(threshold, start) || threshold == start {
                return Err(InvalidConfiguration::layout(format!(
                    "collectible {index} would be captured before moving {direction}"
                )));
            }
        }
        Ok(())
    }

    /// The farthest x the reference reaches when the controlled body moves only while strictly
    /// between `min_x` and `max_x`.
    pub fn reach(&self, direction: Direction, min_x: f64, max_x: f64) -> f64 {
        let controlled = self.controlled_home(direction).x;
        let distance = match direction {
            Direction::Right => max_x - controlled,
            Direction::Left => controlled - min_x,
        };
        self.reference_home(direction).x + direction.sign() * distance
    }

    /// Like [`Layout::validate`], and additionally checks that the travel bounds let the
    /// reference pass every threshold.
    pub fn validate_travel(
        &self,
        count: usize,
        direction: Direction,
        min_x: f64,
        max_x: f64,
    ) -> Result<(), InvalidConfiguration> {
        self.validate(count, direction)?;

        let controlled = self.controlled_home(direction).x;
        if !(min_x < controlled && controlled < max_x) {
            return Err(InvalidConfiguration::layout(format!(
                "controlled body at {controlled} can't move {direction} within {min_x}..{max_x}"
            )));
        }

        let reach = self.reach(direction, min_x, max_x);
        for index in 0..count {
            let threshold = self.threshold(index, direction);
            if !direction.has_passed(threshold, reach) {
                return Err(InvalidConfiguration::layout(format!(
                    "threshold {threshold} of collectible {index} is out of reach moving \
                     {direction}, travel ends at {reach}"
                )));
            }
        }
        Ok(())
    }
}
