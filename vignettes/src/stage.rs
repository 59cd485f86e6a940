use derive_more::Display;
use log::debug;
use vignettes_animation::{Animatable, Property};
use vignettes_scene::{EntityId, World};

use crate::VignetteState;

/// A request for the audio backend.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Cue {
    /// A one-shot effect from the sound sprite.
    #[display("sound {_0}")]
    Sound(String),
    #[display("music {_0}")]
    Music(MusicCue),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum MusicCue {
    #[display("play")]
    Play,
    #[display("pause")]
    Pause,
    #[display("resume")]
    Resume,
}

/// The world of one vignette instance and the state its timeline hooks update.
///
/// This is the context the sequencer animates, so hooks can spawn, destroy, and restyle entities,
/// change the vignette state, or issue cues.
#[derive(Debug, Default)]
pub struct Stage {
    pub world: World,
    pub state: VignetteState,
    cues: Vec<Cue>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cue(&mut self, cue: Cue) {
        debug!("Cue: {cue}");
        self.cues.push(cue);
    }

    pub fn sound(&mut self, name: impl Into<String>) {
        self.cue(Cue::Sound(name.into()));
    }

    /// Cues issued since the last call to [`Stage::take_cues`].
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    pub fn set_state(&mut self, state: VignetteState) {
        if state != self.state {
            debug!("{} -> {state}", self.state);
            self.state = state;
        }
    }
}

impl Animatable for Stage {
    type Target = EntityId;

    fn property(&self, target: EntityId, property: Property) -> Option<f64> {
        self.world.property(target, property)
    }

    fn set_property(&mut self, target: EntityId, property: Property, value: f64) {
        self.world.set_property(target, property, value);
    }

    fn release(&mut self, target: EntityId) {
        self.world.release(target);
    }
}

#[cfg(test)]
mod tests {
    use vignettes_scene::Entity;

    use super::*;

    #[test]
    fn cues_are_drained_in_order() {
        let mut stage = Stage::new();
        stage.sound("horse_bounce");
        stage.cue(Cue::Music(MusicCue::Play));
        assert_eq!(stage.cues().len(), 2);

        let cues = stage.take_cues();
        assert_eq!(
            cues,
            [
                Cue::Sound("horse_bounce".into()),
                Cue::Music(MusicCue::Play)
            ]
        );
        assert!(stage.cues().is_empty());
        assert_eq!(cues[1].to_string(), "music play");
    }

    #[test]
    fn animates_the_world() {
        let mut stage = Stage::new();
        let note = stage.world.spawn(Entity::image("note", (460.0, 170.0)));
        stage.set_property(note, Property::Alpha, 0.5);
        assert_eq!(stage.property(note, Property::Alpha), Some(0.5));

        stage.release(note);
        assert!(!stage.world.contains(note));
    }
}
