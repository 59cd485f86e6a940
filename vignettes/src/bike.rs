//! A bike ride through a forest seen over the rider's handlebars.

use std::time::Duration;

use log::{debug, info};
use rand::{Rng, rngs::StdRng};
use serde::Deserialize;
use vignettes_animation::{
    Interpolation, InvalidConfiguration, Property, PropertyCurve, Segment, Sequencer, Timeline,
};
use vignettes_geometry::{Color, Point, Rect};
use vignettes_scene::{Entity, EntityId};

use crate::{
    Button, Cue, InputEvent, Interval, MusicCue, RepeatingTimer, Stage, Vignette, VignetteState,
};

const FADE_OUT: Duration = Duration::from_millis(1000);
const FADE_IN: Duration = Duration::from_millis(500);
const TREE_SCROLL: Duration = Duration::from_millis(10000);
const TREE_START: Point = Point::new(-500.0, 50.0);
const TREE_DEPTH: f64 = -6000.0;
/// Past the camera.
const SCROLL_END_Z: f64 = 2500.0;

/// One image of a creature, animated on its own.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreaturePart {
    pub texture: String,
    pub start: Point,
    #[serde(default)]
    pub z: f64,
    pub curves: Vec<PropertyCurve>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Creature {
    pub parts: Vec<CreaturePart>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BikeConfig {
    pub tree_interval: Interval,
    pub creature_interval: Interval,
    pub start_button: Rect,
    pub wave_button: Rect,
    pub honk_button: Rect,
    pub creatures: Vec<Creature>,
}

impl Default for BikeConfig {
    fn default() -> Self {
        Self {
            tree_interval: Interval::new(2000, 4000),
            creature_interval: Interval::new(5000, 10000),
            start_button: Rect::centered((300.0, 230.0), 200.0, 100.0),
            wave_button: Rect::centered((490.0, 60.0), 100.0, 100.0),
            honk_button: Rect::centered((490.0, 170.0), 100.0, 100.0),
            creatures: default_creatures(),
        }
    }
}

fn default_creatures() -> Vec<Creature> {
    let ms = Duration::from_millis;
    let approach = || PropertyCurve::new(Property::Z, SCROLL_END_Z, ms(7000));
    let bob = |to: f64| {
        PropertyCurve::new(Property::Y, to, ms(500))
            .yoyo()
            .repeat(16)
    };
    let part = |texture: &str, start_y: f64, curves: Vec<PropertyCurve>| CreaturePart {
        texture: texture.into(),
        start: Point::new(-50.0, start_y),
        z: 0.0,
        curves,
    };

    vec![
        Creature {
            parts: vec![part(
                "creature1",
                100.0,
                vec![approach(), bob(0.0).with(Interpolation::SineOut)],
            )],
        },
        Creature {
            parts: vec![
                part("creature2_arms", 100.0, vec![approach(), bob(80.0)]),
                part("creature2_body", 100.0, vec![approach()]),
            ],
        },
        Creature {
            parts: vec![
                part("creature3_leg1", 100.0, vec![approach(), bob(75.0)]),
                part("creature3_leg2", 75.0, vec![approach(), bob(100.0)]),
                part("creature3_body", 100.0, vec![approach()]),
            ],
        },
    ]
}

/// The bike vignette.
///
/// Nothing moves before the start button is released. From then on trees and creatures scroll
/// past at random intervals, and the wave and honk buttons toggle the rider's hands.
#[derive(Debug)]
pub struct Bike {
    config: BikeConfig,
    stage: Stage,
    sequencer: Sequencer<Stage>,
    rng: StdRng,
    cover: EntityId,
    start_button: Button,
    wave_button: Button,
    honk_button: Button,
    finger: EntityId,
    horn: EntityId,
    waving: bool,
    honking: bool,
    music_started: bool,
    tree_timer: Option<RepeatingTimer>,
    creature_timer: Option<RepeatingTimer>,
}

impl Bike {
    pub fn new(config: BikeConfig, rng: StdRng) -> Result<Self, InvalidConfiguration> {
        config.tree_interval.validate("tree")?;
        config.creature_interval.validate("creature")?;
        if config.creatures.is_empty() {
            return Err(InvalidConfiguration::scene("no creatures to scroll"));
        }
        if let Some(index) = config.creatures.iter().position(|c| c.parts.is_empty()) {
            return Err(InvalidConfiguration::scene(format!(
                "creature {index} has no parts"
            )));
        }

        let mut stage = Stage::new();
        let mut sequencer: Sequencer<Stage> = Sequencer::new();
        let world = &mut stage.world;

        let cover = world.spawn(Entity::image("cover", Point::ZERO).with_depth(100));
        world.spawn(Entity::image("bg", Point::ZERO).with_depth(-20));
        world.spawn(Entity::image("rider", (267.0, 433.0)).with_depth(10));
        let finger = world.spawn(Entity::image("fingers", (300.0, 422.0)).with_depth(10));
        world.play(finger, "left_rest");
        let horn = world.spawn(Entity::image("horn", (485.0, 441.0)).with_depth(10));
        world.play(horn, "right_rest");

        let wave_button = Button::spawn(world, "buttonbg", config.wave_button, 10);
        let hand = world.spawn(Entity::image("hand", config.wave_button.center()).with_depth(30));

        let honk_button = Button::spawn(world, "buttonbg", config.honk_button, 10);
        let honk_center = config.honk_button.center();
        world.spawn(Entity::image("hornbg", honk_center).with_depth(11));
        world.spawn(Entity::image("hornfg", honk_center).with_depth(13));
        let note_start = honk_center + Point::new(-30.0, 0.0);
        let note = world.spawn(Entity::image("note", note_start).with_depth(12));

        let tire = world.spawn(Entity::image("tire", (410.0, 505.0)));
        world.play(tire, "spin");

        let start_button = Button::spawn(world, "start", config.start_button, 101);

        sequencer.tween(
            Segment::new(hand, Duration::ZERO).curve(
                PropertyCurve::new(Property::Rotation, 1.0, Duration::from_millis(1000))
                    .yoyo()
                    .repeat(-1),
            ),
        )?;
        let drift = Duration::from_millis(1500);
        sequencer.tween(Segment::new(note, Duration::ZERO).curves([
            PropertyCurve::new(Property::X, note_start.x - 60.0, drift).repeat(-1),
            PropertyCurve::new(Property::Alpha, 0.0, drift).repeat(-1),
        ]))?;

        let bike = Self {
            config,
            stage,
            sequencer,
            rng,
            cover,
            start_button,
            wave_button,
            honk_button,
            finger,
            horn,
            waving: false,
            honking: false,
            music_started: false,
            tree_timer: None,
            creature_timer: None,
        };

        for (index, creature) in bike.config.creatures.iter().enumerate() {
            // Unscheduled timelines don't touch the world, the cover can stand in for every part.
            let parts = vec![cover; creature.parts.len()];
            bike.creature_timeline(index, &parts).validate()?;
        }
        Ok(bike)
    }

    pub fn config(&self) -> &BikeConfig {
        &self.config
    }

    pub fn started(&self) -> bool {
        self.stage.state == VignetteState::Playing
    }

    pub fn waving(&self) -> bool {
        self.waving
    }

    pub fn honking(&self) -> bool {
        self.honking
    }

    pub fn buttons(&self) -> [Button; 3] {
        [self.start_button, self.wave_button, self.honk_button]
    }

    pub fn cover(&self) -> EntityId {
        self.cover
    }

    pub fn finger(&self) -> EntityId {
        self.finger
    }

    pub fn horn(&self) -> EntityId {
        self.horn
    }

    pub fn sequencer(&self) -> &Sequencer<Stage> {
        &self.sequencer
    }

    fn start(&mut self) -> Result<(), InvalidConfiguration> {
        info!("Starting the ride");
        self.stage.set_state(VignetteState::Playing);

        let fade_out = |entity: EntityId| -> Segment<Stage> {
            Segment::new(entity, Duration::ZERO)
                .curve(PropertyCurve::new(Property::Alpha, 0.0, FADE_OUT))
        };
        self.sequencer.schedule(
            Timeline::new()
                .segment(fade_out(self.cover))
                .segment(fade_out(self.start_button.entity))
                .owns(self.cover)
                .owns(self.start_button.entity),
        )?;

        self.scroll_tree()?;
        self.scroll_creature()?;
        self.tree_timer = Some(RepeatingTimer::new(self.config.tree_interval, &mut self.rng));
        self.creature_timer = Some(RepeatingTimer::new(
            self.config.creature_interval,
            &mut self.rng,
        ));
        Ok(())
    }

    fn toggle_wave(&mut self) {
        self.waving = !self.waving;
        let world = &mut self.stage.world;
        if self.waving {
            self.wave_button.tint(world, Color::GREEN);
            world.play(self.finger, "wave");
        } else {
            self.wave_button.tint(world, Color::WHITE);
            world.play_reverse(self.finger, "extend");
        }
    }

    fn toggle_honk(&mut self) {
        self.honking = !self.honking;
        let world = &mut self.stage.world;
        if self.honking {
            self.honk_button.tint(world, Color::RED);
            world.play(self.horn, "honk");
            let cue = if self.music_started {
                MusicCue::Resume
            } else {
                MusicCue::Play
            };
            self.music_started = true;
            self.stage.cue(Cue::Music(cue));
        } else {
            self.honk_button.tint(world, Color::WHITE);
            world.play_reverse(self.horn, "honk");
            if self.music_started {
                self.stage.cue(Cue::Music(MusicCue::Pause));
            }
        }
    }

    /// A tree fades in far away and scrolls past the camera.
    fn scroll_tree(&mut self) -> Result<(), InvalidConfiguration> {
        let tree = self.stage.world.spawn(
            Entity::image("tree1", TREE_START)
                .with_z(TREE_DEPTH)
                .with_alpha(0.0),
        );
        self.sequencer.schedule(
            Timeline::new()
                .segment(
                    Segment::new(tree, Duration::ZERO)
                        .curve(PropertyCurve::new(Property::Z, SCROLL_END_Z, TREE_SCROLL)),
                )
                .segment(
                    Segment::new(tree, Duration::ZERO)
                        .curve(PropertyCurve::new(Property::Alpha, 1.0, FADE_IN)),
                )
                .owns(tree),
        )?;
        Ok(())
    }

    fn scroll_creature(&mut self) -> Result<(), InvalidConfiguration> {
        let index = self.rng.gen_range(0..self.config.creatures.len());
        debug!("Creature {index} approaching");
        let parts: Vec<EntityId> = self.config.creatures[index]
            .parts
            .iter()
            .map(|part| {
                self.stage.world.spawn(
                    Entity::image(part.texture.as_str(), part.start)
                        .with_z(part.z)
                        .with_alpha(0.0),
                )
            })
            .collect();
        let timeline = self.creature_timeline(index, &parts);
        self.sequencer.schedule(timeline)?;
        Ok(())
    }

    /// Every part runs its own curves while it fades in. A part is destroyed as soon as both are
    /// done, independent of the other parts.
    fn creature_timeline(&self, creature: usize, parts: &[EntityId]) -> Timeline<Stage> {
        let mut timeline = Timeline::new();
        for (part, entity) in self.config.creatures[creature].parts.iter().zip(parts) {
            let entity = *entity;
            timeline.push(
                Segment::new(entity, Duration::ZERO)
                    .curves(part.curves.iter().cloned())
                    .curve(PropertyCurve::new(Property::Alpha, 1.0, FADE_IN))
                    .on_complete(move |stage: &mut Stage| {
                        stage.world.destroy(entity);
                    }),
            );
        }
        timeline
    }
}

impl Vignette for Bike {
    fn name(&self) -> &'static str {
        "bike"
    }

    fn handle_input(&mut self, event: &InputEvent) -> Result<(), InvalidConfiguration> {
        let started = self.started();
        match *event {
            InputEvent::PointerDown(pointer) => {
                if !started && self.start_button.hit(pointer) {
                    self.start_button.tint(&mut self.stage.world, Color::GREEN);
                } else if started && self.wave_button.hit(pointer) {
                    self.toggle_wave();
                } else if started && self.honk_button.hit(pointer) {
                    self.toggle_honk();
                }
            }
            InputEvent::PointerUp(pointer) if !started && self.start_button.hit(pointer) => {
                self.start_button.tint(&mut self.stage.world, Color::WHITE);
                self.start()?;
            }
            _ => {}
        }
        Ok(())
    }

    fn update(&mut self, delta: Duration) -> Result<(), InvalidConfiguration> {
        self.sequencer.tick(delta, &mut self.stage);
        self.stage.world.step(delta);

        let trees = self
            .tree_timer
            .as_mut()
            .map_or(0, |timer| timer.advance(delta, &mut self.rng));
        for _ in 0..trees {
            self.scroll_tree()?;
        }
        let creatures = self
            .creature_timer
            .as_mut()
            .map_or(0, |timer| timer.advance(delta, &mut self.rng));
        for _ in 0..creatures {
            self.scroll_creature()?;
        }
        Ok(())
    }

    fn stage(&self) -> &Stage {
        &self.stage
    }

    fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }
}
