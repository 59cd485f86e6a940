use std::fmt;

use derive_more::Display;
use serde::Deserialize;

/// An animatable numeric property of a scene entity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    #[display("x")]
    X,
    #[display("y")]
    Y,
    /// Depth for entities projected by a perspective camera.
    #[display("z")]
    Z,
    #[display("rotation")]
    Rotation,
    #[display("alpha")]
    Alpha,
    #[display("scaleX")]
    ScaleX,
    #[display("scaleY")]
    ScaleY,
}

/// The world a [`Sequencer`](crate::Sequencer) animates.
///
/// Hooks receive the same context, so implementors usually bundle the entity storage with the
/// scene state the hooks need to update.
pub trait Animatable {
    type Target: Copy + Eq + fmt::Debug;

    /// The current value of a property, `None` if the target does not exist (anymore).
    fn property(&self, target: Self::Target, property: Property) -> Option<f64>;

    fn set_property(&mut self, target: Self::Target, property: Property, value: f64);

    /// Destroys a target owned by a completed timeline.
    fn release(&mut self, target: Self::Target);
}
