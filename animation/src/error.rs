use derive_more::{Display, Error};

use crate::Property;

/// A timeline, tween, or scene layout that cannot be played as described.
///
/// These are programming or configuration errors. They are reported when the configuration is
/// handed over (scheduling, construction), never halfway through an animation.
#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum InvalidConfiguration {
    #[display("timeline has no segments")]
    EmptyTimeline,
    #[display("segment {segment} animates no properties")]
    EmptySegment { segment: usize },
    #[display("{property} of segment {segment} repeats forever with zero duration")]
    ZeroDurationLoop { segment: usize, property: Property },
    #[display("{property} of segment {segment} targets the non-finite value {value}")]
    NonFiniteValue {
        segment: usize,
        property: Property,
        value: f64,
    },
    #[display("unknown easing {name:?}")]
    UnknownEasing { name: String },
    #[display("invalid layout: {reason}")]
    Layout { reason: String },
    #[display("invalid scene: {reason}")]
    Scene { reason: String },
}

impl InvalidConfiguration {
    pub fn layout(reason: impl Into<String>) -> Self {
        Self::Layout {
            reason: reason.into(),
        }
    }

    pub fn scene(reason: impl Into<String>) -> Self {
        Self::Scene {
            reason: reason.into(),
        }
    }
}
