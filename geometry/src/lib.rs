//! Geometry primitives for the vignettes: stage coordinates, activation regions, and tints.

mod color;
mod point;
mod polygon;
mod rect;

pub use color::*;
pub use point::*;
pub use polygon::*;
pub use rect::*;

pub trait Contains<Other> {
    fn contains(&self, other: Other) -> bool;
}
