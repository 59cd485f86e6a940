//! The vignettes: a barn releasing animals, a bike ride, and the folding toys.
//!
//! Every vignette owns a [`Stage`] (the headless world plus the vignette's state) and reacts to
//! [`InputEvent`]s and frame updates through the [`Vignette`] trait. Rendering and audio stay
//! outside: hosts read the world's entities and drain the stage's [`Cue`]s.

mod barn;
mod bike;
mod config;
mod folding;
mod input;
mod stage;
mod timer;
mod vignette;

pub use barn::*;
pub use bike::*;
pub use config::*;
pub use folding::*;
pub use input::*;
pub use stage::*;
pub use timer::*;
pub use vignette::*;
