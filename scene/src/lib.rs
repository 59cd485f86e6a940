//! A headless stand-in for the 2D scene engine the vignettes run in.
//!
//! The [`World`] stores entities with the properties an engine exposes (position, rotation,
//! scale, opacity, tint), plays back named frame animations by recording them, and integrates
//! linear and angular velocities. Rendering is somebody else's job.

mod entity;
mod id;
mod world;

pub use entity::*;
pub use id::*;
pub use world::*;
