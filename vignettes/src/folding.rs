//! The folding toys: a ball rolls over a row of collectibles and folds their values into a
//! result that rides on top of it.

use std::time::Duration;

use log::info;
use serde::Deserialize;
use vignettes_animation::InvalidConfiguration;
use vignettes_geometry::{Color, Point, Rect};
use vignettes_interception::{
    CombineRule, Direction, Interceptor, Layout, LayoutSection, Movers, NestedPairs, Sum,
};
use vignettes_scene::{Entity, EntityId};

use crate::{Button, InputEvent, Key, Stage, Vignette};

const COLLECTIBLE_TEXTURES: [&str; 5] = ["dog", "pizza", "football", "guitar", "cactus"];

#[derive(Debug, Clone, PartialEq)]
pub struct FoldingConfig {
    pub layout: Layout,
    pub values: Vec<i64>,
    pub direction: Direction,
    /// Adds buttons to pick the travel direction.
    pub direction_toggle: bool,
    /// The right arrow key moves the scene, too.
    pub arrow_key: bool,
    /// The controlled body moves only while its x lies strictly between `min_x` and `max_x`.
    pub min_x: f64,
    pub max_x: f64,
    pub velocity: f64,
    /// Degrees per second.
    pub angular_velocity: f64,
    pub ground: Point,
    pub move_button: Rect,
    /// The buttons selecting right and left travel.
    pub direction_buttons: [Rect; 2],
    pub instructions: Option<(Point, String)>,
}

impl FoldingConfig {
    /// A small stage, travel to the right only.
    pub fn one() -> Self {
        Self {
            layout: Layout {
                stage_width: 800.0,
                first_collectible: Point::new(300.0, 255.0),
                reference: Point::new(165.0, 100.0),
                controlled: Point::new(40.0, 125.0),
                ..Layout::default()
            },
            direction_toggle: false,
            arrow_key: true,
            min_x: f64::NEG_INFINITY,
            max_x: 580.0,
            ground: Point::new(400.0, 230.0),
            move_button: Rect::centered((40.0, 230.0), 60.0, 60.0),
            instructions: Some((
                Point::new(80.0, 210.0),
                "Click arrow button\nor press right arrow key".into(),
            )),
            ..Self::two()
        }
    }

    /// The full stage with a choice of direction.
    pub fn two() -> Self {
        Self {
            layout: Layout::default(),
            values: vec![1, 2, 3, 4, 5],
            direction: Direction::Right,
            direction_toggle: true,
            arrow_key: false,
            min_x: 30.0,
            max_x: 970.0,
            velocity: 160.0,
            angular_velocity: 100.0,
            ground: Point::new(500.0, 420.0),
            move_button: Rect::centered((500.0, 420.0), 120.0, 60.0),
            direction_buttons: [
                Rect::centered((110.0, 60.0), 160.0, 80.0),
                Rect::centered((320.0, 60.0), 160.0, 80.0),
            ],
            instructions: None,
        }
    }

    pub fn nested() -> Self {
        Self::two()
    }

    /// Overrides the fields a configuration file section sets.
    pub fn apply(self, section: FoldingSection) -> Self {
        Self {
            values: section.values.unwrap_or(self.values),
            layout: match section.layout {
                Some(layout) => self.layout.apply(layout),
                None => self.layout,
            },
            min_x: section.min_x.unwrap_or(self.min_x),
            max_x: section.max_x.unwrap_or(self.max_x),
            velocity: section.velocity.unwrap_or(self.velocity),
            angular_velocity: section.angular_velocity.unwrap_or(self.angular_velocity),
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), InvalidConfiguration> {
        if self.values.is_empty() {
            return Err(InvalidConfiguration::scene("nothing to collect"));
        }
        // Also false for NaN.
        if !(self.min_x < self.max_x) {
            return Err(InvalidConfiguration::scene(format!(
                "travel bounds {}..{} are empty",
                self.min_x, self.max_x
            )));
        }
        if !self.velocity.is_finite() || !self.angular_velocity.is_finite() {
            return Err(InvalidConfiguration::scene("velocities must be finite"));
        }
        for direction in self.directions() {
            self.layout.validate_travel(
                self.values.len(),
                direction,
                self.min_x,
                self.max_x,
            )?;
        }
        Ok(())
    }

    /// The directions the scene can travel in.
    pub fn directions(&self) -> Vec<Direction> {
        if self.direction_toggle {
            vec![Direction::Right, Direction::Left]
        } else {
            vec![self.direction]
        }
    }
}

/// A folding section of a configuration file. Unset fields, and unset keys of the `layout`
/// table, keep the variant's defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FoldingSection {
    pub values: Option<Vec<i64>>,
    pub layout: Option<LayoutSection>,
    pub min_x: Option<f64>,
    pub max_x: Option<f64>,
    pub velocity: Option<f64>,
    pub angular_velocity: Option<f64>,
}

/// A folding vignette.
///
/// While the move button or key is held, the guy pushes the ball, and the ball picks up every
/// collectible it rolls past.
#[derive(Debug)]
pub struct Folding<R: CombineRule<Value = i64>> {
    name: &'static str,
    config: FoldingConfig,
    stage: Stage,
    interceptor: Interceptor<R>,
    move_button: Button,
    direction_buttons: Option<[Button; 2]>,
    button_held: bool,
    key_held: bool,
}

impl Folding<Sum> {
    pub fn one(config: FoldingConfig) -> Result<Self, InvalidConfiguration> {
        Self::new("folding-one", Sum, config)
    }

    pub fn two(config: FoldingConfig) -> Result<Self, InvalidConfiguration> {
        Self::new("folding-two", Sum, config)
    }
}

impl Folding<NestedPairs> {
    pub fn nested(config: FoldingConfig) -> Result<Self, InvalidConfiguration> {
        Self::new("folding-nested", NestedPairs, config)
    }
}

impl<R: CombineRule<Value = i64>> Folding<R> {
    pub fn new(
        name: &'static str,
        rule: R,
        config: FoldingConfig,
    ) -> Result<Self, InvalidConfiguration> {
        config.validate()?;

        let mut stage = Stage::new();
        let world = &mut stage.world;
        let layout = &config.layout;

        world.spawn(Entity::image("ground", config.ground));
        let movers = Movers {
            controlled: world.spawn(Entity::image("guy", layout.controlled)),
            reference: world.spawn(Entity::image("ball", layout.reference)),
            display: world.spawn(Entity::label(
                rule.caption(&rule.identity()),
                layout.reference + layout.display_offset,
            )),
        };

        let mut collectibles = Vec::with_capacity(config.values.len());
        for (index, value) in config.values.iter().enumerate() {
            let texture = COLLECTIBLE_TEXTURES[index % COLLECTIBLE_TEXTURES.len()];
            let body = world.spawn(Entity::image(texture, layout.collectible_position(index)));
            collectibles.push((body, *value));
        }

        let move_button = Button::spawn(world, "movebutton", config.move_button, 10);
        if let Some((position, text)) = &config.instructions {
            world.spawn(Entity::label(text.as_str(), *position));
        }
        let direction_buttons = config.direction_toggle.then(|| {
            let [right, left] = config.direction_buttons;
            [
                Button::spawn(world, "right_button", right, 10),
                Button::spawn(world, "left_button", left, 10),
            ]
        });

        let interceptor = Interceptor::new(
            rule,
            layout.clone(),
            config.direction,
            movers,
            collectibles,
            world,
        )?;

        let mut folding = Self {
            name,
            config,
            stage,
            interceptor,
            move_button,
            direction_buttons,
            button_held: false,
            key_held: false,
        };
        folding.show_direction();
        Ok(folding)
    }

    pub fn config(&self) -> &FoldingConfig {
        &self.config
    }

    pub fn interceptor(&self) -> &Interceptor<R> {
        &self.interceptor
    }

    pub fn caption(&self) -> String {
        self.interceptor.caption()
    }

    pub fn move_button(&self) -> Button {
        self.move_button
    }

    pub fn direction_buttons(&self) -> Option<[Button; 2]> {
        self.direction_buttons
    }

    pub fn move_requested(&self) -> bool {
        self.button_held || self.key_held
    }

    /// Resets the scene for travelling in `direction`, if it differs from the current one.
    pub fn select_direction(&mut self, direction: Direction) -> Result<(), InvalidConfiguration> {
        if direction == self.interceptor.direction() {
            return Ok(());
        }
        info!("{}: travelling {direction}", self.name);
        self.interceptor
            .set_direction(direction, &mut self.stage.world)?;
        self.show_direction();
        Ok(())
    }

    fn show_direction(&mut self) {
        let direction = self.interceptor.direction();
        let world = &mut self.stage.world;
        world.set_flip_x(self.move_button.entity, direction == Direction::Left);
        if let Some([right, left]) = self.direction_buttons {
            let (selected, other) = match direction {
                Direction::Right => (right, left),
                Direction::Left => (left, right),
            };
            selected.tint(world, Color::GREEN);
            other.tint(world, Color::WHITE);
        }
    }

    fn within_bounds(&self, entity: EntityId) -> bool {
        self.stage
            .world
            .position(entity)
            .is_some_and(|p| p.x > self.config.min_x && p.x < self.config.max_x)
    }
}

impl<R: CombineRule<Value = i64>> Vignette for Folding<R> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle_input(&mut self, event: &InputEvent) -> Result<(), InvalidConfiguration> {
        match *event {
            InputEvent::PointerDown(pointer) => {
                if self.move_button.hit(pointer) {
                    self.button_held = true;
                    self.move_button.tint(&mut self.stage.world, Color::GREEN);
                } else if let Some([right, left]) = self.direction_buttons {
                    if right.hit(pointer) {
                        self.select_direction(Direction::Right)?;
                    } else if left.hit(pointer) {
                        self.select_direction(Direction::Left)?;
                    }
                }
            }
            InputEvent::PointerUp(_) if self.button_held => {
                self.button_held = false;
                self.move_button.tint(&mut self.stage.world, Color::WHITE);
            }
            InputEvent::KeyDown(Key::Right) if self.config.arrow_key => self.key_held = true,
            InputEvent::KeyUp(Key::Right) => self.key_held = false,
            _ => {}
        }
        Ok(())
    }

    /// Captures first, then decides on movement, then moves.
    fn update(&mut self, delta: Duration) -> Result<(), InvalidConfiguration> {
        self.interceptor.on_tick(&mut self.stage.world);

        let controlled = self.interceptor.movers().controlled;
        if self.move_requested() && self.within_bounds(controlled) {
            self.interceptor.move_bodies(
                self.config.velocity,
                self.config.angular_velocity,
                &mut self.stage.world,
            );
        } else {
            self.interceptor.stop(&mut self.stage.world);
        }

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
