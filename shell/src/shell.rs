use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};
use vignettes::{Cue, Vignette};

use crate::ScriptEvent;

/// Drives a vignette with a fixed timestep, the way a host's frame loop would.
#[derive(Debug)]
pub struct Shell {
    frame: Duration,
    elapsed: Duration,
    frames: usize,
}

impl Shell {
    pub fn new(frame: Duration) -> Self {
        Self {
            frame,
            elapsed: Duration::ZERO,
            frames: 0,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Runs `frames` frames and returns the cues the vignette issued.
    ///
    /// An event is delivered right before the update of the frame its time falls into. Events
    /// of the same frame arrive in script order.
    pub fn run_frames(
        &mut self,
        vignette: &mut dyn Vignette,
        events: &[ScriptEvent],
        frames: usize,
    ) -> Result<Vec<Cue>> {
        let mut cues = Vec::new();

        for _ in 0..frames {
            let start = self.elapsed;
            let end = start + self.frame;

            for scripted in events.iter().filter(|e| (start..end).contains(&e.at())) {
                debug!("{}: {:?} at {start:?}", vignette.name(), scripted.event);
                vignette
                    .handle_input(&scripted.event)
                    .with_context(|| format!("Failed to handle {:?}", scripted.event))?;
            }

            vignette
                .update(self.frame)
                .with_context(|| format!("Failed to update frame {}", self.frames))?;

            for cue in vignette.stage_mut().take_cues() {
                info!("{}: {cue}", vignette.name());
                cues.push(cue);
            }

            self.elapsed = end;
            self.frames += 1;
        }

        Ok(cues)
    }
}

#[cfg(test)]
mod tests {
    use vignettes::{
        Config, Folding, FoldingConfig, InputEvent, MusicCue, VignetteKind, VignetteState,
    };
    use vignettes_interception::Direction;

    use super::*;
    use crate::Script;

    const FRAME: Duration = Duration::from_millis(16);

    fn config() -> Config {
        Config {
            seed: Some(5),
            ..Config::default()
        }
    }

    #[test]
    fn events_arrive_in_their_frame() {
        let mut folding = Folding::two(FoldingConfig::two()).unwrap();
        let left = folding.config().direction_buttons[1].center();
        let events = [ScriptEvent::new(50, InputEvent::PointerDown(left))];

        let mut shell = Shell::new(FRAME);
        shell.run_frames(&mut folding, &events, 3).unwrap();
        assert_eq!(folding.interceptor().direction(), Direction::Right);

        shell.run_frames(&mut folding, &events, 1).unwrap();
        assert_eq!(folding.interceptor().direction(), Direction::Left);
        assert_eq!(shell.frames(), 4);
        assert_eq!(shell.elapsed(), Duration::from_millis(64));

        // Already delivered.
        shell.run_frames(&mut folding, &events, 100).unwrap();
        assert_eq!(folding.interceptor().direction(), Direction::Left);
    }

    #[test]
    fn folding_demos_collect_everything() {
        let config = config();

        let script = Script::demo(VignetteKind::FoldingOne, &config);
        let mut one = Folding::one(config.folding_one.clone()).unwrap();
        Shell::new(script.frame())
            .run_frames(&mut one, &script.events, script.frames)
            .unwrap();
        assert_eq!(one.caption(), "Sum\n15");

        let script = Script::demo(VignetteKind::FoldingTwo, &config);
        let mut two = Folding::two(config.folding_two.clone()).unwrap();
        Shell::new(script.frame())
            .run_frames(&mut two, &script.events, script.frames)
            .unwrap();
        assert_eq!(two.interceptor().direction(), Direction::Left);
        assert!(two.interceptor().all_captured());
        assert_eq!(two.caption(), "Sum\n15");
    }

    #[test]
    fn barn_demo_returns_to_init() {
        let config = config();
        let script = Script::demo(VignetteKind::Barn, &config);
        let mut barn = config.build(VignetteKind::Barn).unwrap();

        let mut shell = Shell::new(script.frame());
        shell.run_frames(barn.as_mut(), &script.events, 100).unwrap();
        assert_eq!(barn.state(), VignetteState::Playing);

        shell
            .run_frames(barn.as_mut(), &script.events, script.frames - 100)
            .unwrap();
        assert_eq!(barn.state(), VignetteState::Init);
        assert!(
            barn.stage()
                .world
                .iter()
                .all(|(_, entity)| entity.texture != "speech")
        );
    }

    #[test]
    fn bike_demo_collects_music_cues() {
        let config = config();
        let script = Script::demo(VignetteKind::Bike, &config);
        let mut bike = config.build(VignetteKind::Bike).unwrap();

        let cues = Shell::new(script.frame())
            .run_frames(bike.as_mut(), &script.events, script.frames)
            .unwrap();
        assert_eq!(bike.state(), VignetteState::Playing);
        assert_eq!(cues, [Cue::Music(MusicCue::Play)]);
        assert!(bike.stage().cues().is_empty());
    }
}
