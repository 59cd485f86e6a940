//! A barn whose doors open when clicked and release a random animal.

use std::time::Duration;

use log::info;
use rand::{Rng, rngs::StdRng};
use serde::Deserialize;
use vignettes_animation::{
    Interpolation, InvalidConfiguration, Property, PropertyCurve, Segment, Sequencer, Timeline,
};
use vignettes_geometry::{Color, Contains, Point, Polygon};
use vignettes_scene::{Entity, EntityId};

use crate::{InputEvent, Stage, Vignette, VignetteState};

/// The clickable door area, relative to the barn's position.
const DOOR_REGION: [(f64, f64); 4] = [
    (37.0, 109.0),
    (107.0, 178.0),
    (107.0, 316.0),
    (37.0, 248.0),
];
const DOOR_OFFSETS: [Point; 2] = [Point::new(37.0, 108.0), Point::new(71.0, 142.0)];
const FRONT_OFFSET: Point = Point::new(107.0, 0.0);
/// Where the pusher waits relative to the animal, before the animal walks out.
const PUSHER_OFFSET: Point = Point::new(90.0, 10.0);

const DOORS_MOVING: Duration = Duration::from_millis(2000);
const WALK_OUT_AT: Duration = Duration::from_millis(2000);
const WALK_OUT: Duration = Duration::from_millis(1000);
const RUN_AT: Duration = Duration::from_millis(4000);
const CLOSE_AT: Duration = Duration::from_millis(6000);
const SPEECH_BUBBLE: Duration = Duration::from_millis(1000);

/// An animal that can come out of the barn.
///
/// Its sprite sheet is `<name>_ss` with the frame animations `<name>_start` and `<name>_move`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Animal {
    pub name: String,
    /// The curves of the run after the animal left the barn.
    pub run: Vec<PropertyCurve>,
    #[serde(default)]
    pub start_sound: Option<String>,
    /// Played at every repeat of a run curve.
    #[serde(default)]
    pub repeat_sound: Option<String>,
}

impl Animal {
    pub fn new(name: impl Into<String>, run: impl IntoIterator<Item = PropertyCurve>) -> Self {
        Self {
            name: name.into(),
            run: run.into_iter().collect(),
            start_sound: None,
            repeat_sound: None,
        }
    }

    pub fn with_start_sound(self, sound: impl Into<String>) -> Self {
        Self {
            start_sound: Some(sound.into()),
            ..self
        }
    }

    pub fn with_repeat_sound(self, sound: impl Into<String>) -> Self {
        Self {
            repeat_sound: Some(sound.into()),
            ..self
        }
    }

    pub fn texture(&self) -> String {
        format!("{}_ss", self.name)
    }

    pub fn start_animation(&self) -> String {
        format!("{}_start", self.name)
    }

    pub fn move_animation(&self) -> String {
        format!("{}_move", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BarnConfig {
    /// The barn's top left corner.
    pub position: Point,
    /// Where an animal appears inside the barn.
    pub animal_start: Point,
    /// How far the doors slide open, along both axes.
    pub door_displacement: f64,
    /// How far the pusher pushes the animal out of the barn.
    pub walk_out: f64,
    pub speech_bubble: Point,
    pub animals: Vec<Animal>,
}

impl Default for BarnConfig {
    fn default() -> Self {
        let animal_start = Point::new(700.0, 240.0);
        Self {
            position: Point::new(504.0, 2.0),
            animal_start,
            door_displacement: 25.0,
            walk_out: 200.0,
            speech_bubble: Point::new(200.0, 150.0),
            animals: default_animals(animal_start),
        }
    }
}

fn default_animals(start: Point) -> Vec<Animal> {
    let ms = Duration::from_millis;
    let run_off = || PropertyCurve::new(Property::X, -100.0, ms(3000));
    let bounce = |height: f64, duration: u64, repeat: i32| {
        PropertyCurve::new(Property::Y, start.y - height, ms(duration))
            .with(Interpolation::SineOut)
            .yoyo()
            .repeat(repeat)
    };

    vec![
        Animal::new("horse", [run_off(), bounce(100.0, 300, 4)])
            .with_start_sound("horse_bounce")
            .with_repeat_sound("horse_bounce"),
        Animal::new(
            "pig",
            [
                run_off(),
                PropertyCurve::new(Property::Rotation, -6.0, ms(3000)),
            ],
        ),
        Animal::new("llama", [run_off().with(Interpolation::QuadraticIn)])
            .with_start_sound("llama_rocket"),
        Animal::new("giraffe", [run_off()]),
        Animal::new("panda", [run_off(), bounce(30.0, 400, 3)]),
        Animal::new("blowfish", [run_off(), bounce(100.0, 625, 2)]),
    ]
}

/// The barn door vignette.
///
/// While waiting, hovering the doors tints them red and clicking them plays the release timeline.
/// Clicks while an animal is out only make the barn talk.
#[derive(Debug)]
pub struct Barn {
    config: BarnConfig,
    stage: Stage,
    sequencer: Sequencer<Stage>,
    rng: StdRng,
    door_region: Polygon,
    doors: [EntityId; 2],
    pusher: EntityId,
}

impl Barn {
    pub fn new(config: BarnConfig, rng: StdRng) -> Result<Self, InvalidConfiguration> {
        if config.animals.is_empty() {
            return Err(InvalidConfiguration::scene("the barn has no animals"));
        }

        let mut stage = Stage::new();
        let world = &mut stage.world;
        let position = config.position;
        world.spawn(Entity::image("background", Point::ZERO).with_depth(10));
        world.spawn(Entity::image("barnback", position).with_depth(20));
        let door1 = world.spawn(Entity::image("door", position + DOOR_OFFSETS[0]).with_depth(40));
        let pusher = world.spawn(
            Entity::image("pusher", config.animal_start + Point::new(0.0, PUSHER_OFFSET.y))
                .with_depth(41),
        );
        world.spawn(Entity::image("barnfront", position + FRONT_OFFSET).with_depth(50));
        let door2 = world.spawn(Entity::image("door", position + DOOR_OFFSETS[1]).with_depth(60));

        let barn = Self {
            door_region: Polygon::new(DOOR_REGION).translated(position),
            config,
            stage,
            sequencer: Sequencer::new(),
            rng,
            doors: [door1, door2],
            pusher,
        };

        // Timelines don't touch the world before they are scheduled, so any entity can stand in
        // for the animal sprite here.
        for index in 0..barn.config.animals.len() {
            barn.release_timeline(index, pusher).validate()?;
        }
        Ok(barn)
    }

    pub fn config(&self) -> &BarnConfig {
        &self.config
    }

    pub fn doors(&self) -> [EntityId; 2] {
        self.doors
    }

    pub fn pusher(&self) -> EntityId {
        self.pusher
    }

    pub fn door_region(&self) -> &Polygon {
        &self.door_region
    }

    pub fn sequencer(&self) -> &Sequencer<Stage> {
        &self.sequencer
    }

    fn door_home(&self, door: usize) -> Point {
        self.config.position + DOOR_OFFSETS[door]
    }

    fn tint_doors(&mut self, tint: Color) {
        for door in self.doors {
            self.stage.world.set_tint(door, tint);
        }
    }

    fn hover(&mut self, pointer: Point) {
        if self.stage.state != VignetteState::Init {
            return;
        }
        let tint = if self.door_region.contains(pointer) {
            Color::RED
        } else {
            Color::WHITE
        };
        self.tint_doors(tint);
    }

    fn open(&mut self) -> Result<(), InvalidConfiguration> {
        let index = self.rng.gen_range(0..self.config.animals.len());
        let animal = &self.config.animals[index];
        info!("Releasing the {}", animal.name);

        let start = self.config.animal_start;
        let world = &mut self.stage.world;
        let sprite = world.spawn(Entity::image(animal.texture(), start).with_depth(45));
        world.play(sprite, animal.start_animation());
        world.set_position(self.pusher, start + PUSHER_OFFSET);

        let timeline = self.release_timeline(index, sprite);
        self.sequencer.schedule(timeline)?;
        self.tint_doors(Color::WHITE);
        self.stage.set_state(VignetteState::Playing);
        Ok(())
    }

    /// Doors open, the pusher pushes the animal out, the animal runs off, doors close.
    fn release_timeline(&self, animal: usize, sprite: EntityId) -> Timeline<Stage> {
        let animal = &self.config.animals[animal];
        let [door1, door2] = self.doors;
        let (home1, home2) = (self.door_home(0), self.door_home(1));
        let open = Point::new(self.config.door_displacement, self.config.door_displacement);
        let start = self.config.animal_start;
        let pusher_x = start.x + PUSHER_OFFSET.x;

        let start_animation = animal.start_animation();
        let move_animation = animal.move_animation();
        let start_sound = animal.start_sound.clone();
        let mut run = Segment::new(sprite, RUN_AT)
            .curves(animal.run.iter().cloned())
            .on_start(move |stage: &mut Stage| {
                stage.world.play(sprite, &move_animation);
                if let Some(sound) = &start_sound {
                    stage.sound(sound);
                }
            });
        if let Some(sound) = animal.repeat_sound.clone() {
            run = run.on_repeat(move |stage: &mut Stage| stage.sound(&sound));
        }

        Timeline::new()
            .segment(slide_door(door1, home1 + open * -1.0, Duration::ZERO))
            .segment(slide_door(door2, home2 + open, Duration::ZERO))
            .segment(
                Segment::new(self.pusher, WALK_OUT_AT).curve(
                    PropertyCurve::new(Property::X, pusher_x - self.config.walk_out, WALK_OUT)
                        .yoyo(),
                ),
            )
            .segment(
                Segment::new(sprite, WALK_OUT_AT)
                    .curve(PropertyCurve::new(
                        Property::X,
                        start.x - self.config.walk_out,
                        WALK_OUT,
                    ))
                    .on_start(move |stage: &mut Stage| {
                        stage.world.play(sprite, &start_animation)
                    }),
            )
            .segment(run)
            .segment(slide_door(door1, home1, CLOSE_AT))
            .segment(slide_door(door2, home2, CLOSE_AT))
            .owns(sprite)
            .on_complete(|stage: &mut Stage| stage.set_state(VignetteState::Init))
    }

    /// The barn complains about being clicked while busy.
    fn speech_bubble(&mut self) -> Result<(), InvalidConfiguration> {
        let at = self.config.speech_bubble;
        let bubble = self
            .stage
            .world
            .spawn(Entity::image("speech", at).with_depth(70));
        let curve = |property, to| PropertyCurve::new(property, to, SPEECH_BUBBLE);

        self.sequencer.schedule(
            Timeline::new()
                .segment(Segment::new(bubble, Duration::ZERO).curves([
                    curve(Property::Alpha, 0.0).with(Interpolation::QuadraticIn),
                    curve(Property::ScaleX, 0.5),
                    curve(Property::Rotation, -0.4),
                    curve(Property::ScaleY, 0.5),
                    curve(Property::X, at.x + 100.0),
                    curve(Property::Y, at.y - 100.0),
                ]))
                .owns(bubble),
        )?;
        Ok(())
    }
}

fn slide_door(door: EntityId, to: Point, offset: Duration) -> Segment<Stage> {
    Segment::new(door, offset).curves([
        PropertyCurve::new(Property::X, to.x, DOORS_MOVING),
        PropertyCurve::new(Property::Y, to.y, DOORS_MOVING),
    ])
}

impl Vignette for Barn {
    fn name(&self) -> &'static str {
        "barn"
    }

    fn handle_input(&mut self, event: &InputEvent) -> Result<(), InvalidConfiguration> {
        match *event {
            InputEvent::PointerMove(pointer) => self.hover(pointer),
            InputEvent::PointerDown(pointer) if self.door_region.contains(pointer) => {
                match self.stage.state {
                    VignetteState::Init => self.open()?,
                    VignetteState::Playing => self.speech_bubble()?,
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn update(&mut self, delta: Duration) -> Result<(), InvalidConfiguration> {
        self.sequencer.tick(delta, &mut self.stage);
        self.stage.world.step(delta);
        Ok(())
    }

    fn stage(&self) -> &Stage {
        &self.stage
    }

    fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }
}
