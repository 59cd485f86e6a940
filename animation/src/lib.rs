//! Property tweens and the timeline sequencer that drives them.
//!
//! A [`Timeline`] is a list of [`Segment`]s. Each segment animates properties of one target,
//! starting at a fixed offset from the timeline's start. The [`Sequencer`] owns scheduled
//! timelines, advances their clocks each frame, and writes the interpolated values back through
//! the [`Animatable`] context the host passes in.

mod curve;
mod error;
mod interpolation;
mod property;
mod sequencer;
mod timeline;

pub use curve::*;
pub use error::*;
pub use interpolation::*;
pub use property::*;
pub use sequencer::*;
pub use timeline::*;
