//! A headless host for the vignettes: a fixed-timestep frame loop fed by scripted input.

mod script;
mod shell;

pub use script::*;
pub use shell::*;
