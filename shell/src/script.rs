use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use vignettes::{Config, InputEvent, Key, VignetteKind};
use vignettes_geometry::Point;

/// Input for a headless session.
///
/// ```toml
/// frame_ms = 16
/// frames = 600
/// events = [
///     { at_ms = 500, event = { pointer_down = [576.0, 215.0] } },
///     { at_ms = 800, event = { key_down = "right" } },
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Script {
    pub frame_ms: u64,
    pub frames: usize,
    pub events: Vec<ScriptEvent>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            frames: 600,
            events: Vec::new(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptEvent {
    /// Session time the event arrives at.
    pub at_ms: u64,
    pub event: InputEvent,
}

impl ScriptEvent {
    pub fn new(at_ms: u64, event: InputEvent) -> Self {
        Self { at_ms, event }
    }

    pub fn at(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }
}

impl Script {
    pub fn from_toml(toml: &str) -> Result<Self> {
        let script: Script = toml::from_str(toml).context("Failed to parse TOML script")?;
        if script.frame_ms == 0 {
            bail!("Frames must be at least one millisecond long");
        }
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let toml = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script: {}", path.display()))?;
        Self::from_toml(&toml).with_context(|| format!("Invalid script {}", path.display()))
    }

    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    /// A short session that plays the main interaction of `kind`.
    pub fn demo(kind: VignetteKind, config: &Config) -> Self {
        use InputEvent::*;

        let (frames, events) = match kind {
            VignetteKind::Barn => {
                let door = config.barn.position + Point::new(72.0, 213.0);
                (
                    600,
                    vec![
                        ScriptEvent::new(0, PointerMove(door)),
                        ScriptEvent::new(500, PointerDown(door)),
                        ScriptEvent::new(3000, PointerDown(door)),
                    ],
                )
            }
            VignetteKind::Bike => {
                let bike = &config.bike;
                let mut events = Vec::new();
                for (at_ms, region) in [
                    (200, bike.start_button),
                    (2000, bike.wave_button),
                    (3000, bike.honk_button),
                ] {
                    events.push(ScriptEvent::new(at_ms, PointerDown(region.center())));
                    events.push(ScriptEvent::new(at_ms + 100, PointerUp(region.center())));
                }
                (900, events)
            }
            VignetteKind::FoldingOne => (300, vec![ScriptEvent::new(0, KeyDown(Key::Right))]),
            VignetteKind::FoldingTwo => {
                let folding = &config.folding_two;
                let left = folding.direction_buttons[1].center();
                (
                    480,
                    vec![
                        ScriptEvent::new(0, PointerDown(left)),
                        ScriptEvent::new(100, PointerUp(left)),
                        ScriptEvent::new(200, PointerDown(folding.move_button.center())),
                    ],
                )
            }
            VignetteKind::FoldingNested => (
                300,
                vec![ScriptEvent::new(
                    0,
                    PointerDown(config.folding_nested.move_button.center()),
                )],
            ),
        };

        Self {
            frames,
            events,
            ..Self::default()
        }
    }
}
