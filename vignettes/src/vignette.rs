use std::time::Duration;

use derive_more::Display;
use vignettes_animation::InvalidConfiguration;

use crate::{InputEvent, Stage};

/// Whether a vignette waits for its trigger or plays its timeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Display)]
pub enum VignetteState {
    #[default]
    #[display("init")]
    Init,
    #[display("playing")]
    Playing,
}

/// A scene driven by a host: input events as they arrive, updates once per frame.
pub trait Vignette {
    fn name(&self) -> &'static str;

    fn handle_input(&mut self, event: &InputEvent) -> Result<(), InvalidConfiguration>;

    /// Advances the vignette's animations and motion by `delta`.
    fn update(&mut self, delta: Duration) -> Result<(), InvalidConfiguration>;

    fn stage(&self) -> &Stage;

    fn stage_mut(&mut self) -> &mut Stage;

    fn state(&self) -> VignetteState {
        self.stage().state
    }
}
