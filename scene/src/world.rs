use std::{collections::BTreeMap, time::Duration};

use log::{trace, warn};
use vignettes_animation::{Animatable, Property};
use vignettes_geometry::{Color, Point};

use crate::{Entity, EntityId, Generator, Playback};

/// All entities of one scene instance.
#[derive(Debug, Default)]
pub struct World {
    ids: Generator,
    entities: BTreeMap<EntityId, Entity>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = self.ids.acquire();
        trace!("Spawning {id}: {:?}", entity.texture);
        self.entities.insert(id, entity);
        id
    }

    /// Removes an entity. Returns `false` if it was already gone.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        trace!("Destroying {id}");
        self.entities.remove(&id).is_some()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let entity = self.entities.get_mut(&id);
        if entity.is_none() {
            warn!("Entity {id} does not exist");
        }
        entity
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter().map(|(id, e)| (*id, e))
    }

    pub fn position(&self, id: EntityId) -> Option<Point> {
        self.get(id).map(|e| e.position)
    }

    pub fn set_position(&mut self, id: EntityId, position: Point) {
        if let Some(entity) = self.get_mut(id) {
            entity.position = position;
        }
    }

    pub fn set_rotation(&mut self, id: EntityId, rotation: f64) {
        if let Some(entity) = self.get_mut(id) {
            entity.rotation = rotation;
        }
    }

    pub fn set_tint(&mut self, id: EntityId, tint: Color) {
        if let Some(entity) = self.get_mut(id) {
            entity.tint = tint;
        }
    }

    pub fn set_flip_x(&mut self, id: EntityId, flip_x: bool) {
        if let Some(entity) = self.get_mut(id) {
            entity.flip_x = flip_x;
        }
    }

    pub fn set_text(&mut self, id: EntityId, text: impl Into<String>) {
        if let Some(entity) = self.get_mut(id) {
            entity.text = Some(text.into());
        }
    }

    pub fn set_velocity_x(&mut self, id: EntityId, velocity: f64) {
        if let Some(entity) = self.get_mut(id) {
            entity.velocity.x = velocity;
        }
    }

    /// Degrees per second.
    pub fn set_angular_velocity(&mut self, id: EntityId, velocity: f64) {
        if let Some(entity) = self.get_mut(id) {
            entity.angular_velocity = velocity;
        }
    }

    pub fn play(&mut self, id: EntityId, animation: impl Into<String>) {
        self.set_playback(id, animation.into(), false);
    }

    pub fn play_reverse(&mut self, id: EntityId, animation: impl Into<String>) {
        self.set_playback(id, animation.into(), true);
    }

    fn set_playback(&mut self, id: EntityId, name: String, reversed: bool) {
        if let Some(entity) = self.get_mut(id) {
            entity.playback = Some(Playback { name, reversed });
        }
    }

    /// Moves every entity by its velocities.
    pub fn step(&mut self, delta: Duration) {
        let seconds = delta.as_secs_f64();
        for entity in self.entities.values_mut().filter(|e| e.is_moving()) {
            entity.position += entity.velocity * seconds;
            entity.rotation += entity.angular_velocity.to_radians() * seconds;
        }
    }
}

impl Animatable for World {
    type Target = EntityId;

    fn property(&self, target: EntityId, property: Property) -> Option<f64> {
        let entity = self.entities.get(&target)?;
        Some(match property {
            Property::X => entity.position.x,
            Property::Y => entity.position.y,
            Property::Z => entity.z,
            Property::Rotation => entity.rotation,
            Property::Alpha => entity.alpha,
            Property::ScaleX => entity.scale.x,
            Property::ScaleY => entity.scale.y,
        })
    }

    fn set_property(&mut self, target: EntityId, property: Property, value: f64) {
        let Some(entity) = self.get_mut(target) else {
            return;
        };
        let field = match property {
            Property::X => &mut entity.position.x,
            Property::Y => &mut entity.position.y,
            Property::Z => &mut entity.z,
            Property::Rotation => &mut entity.rotation,
            Property::Alpha => &mut entity.alpha,
            Property::ScaleX => &mut entity.scale.x,
            Property::ScaleY => &mut entity.scale.y,
        };
        *field = value;
    }

    fn release(&mut self, target: EntityId) {
        self.destroy(target);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn step_integrates_velocities() {
        let mut world = World::new();
        let ball = world.spawn(Entity::image("ball", (165.0, 100.0)));
        let ground = world.spawn(Entity::image("ground", (400.0, 230.0)));
        world.set_velocity_x(ball, 160.0);
        world.set_angular_velocity(ball, 90.0);

        world.step(Duration::from_millis(500));

        let ball = world.get(ball).unwrap();
        assert_abs_diff_eq!(ball.position.x, 245.0, epsilon = 1e-9);
        assert_eq!(ball.position.y, 100.0);
        assert_abs_diff_eq!(ball.rotation, std::f64::consts::FRAC_PI_4, epsilon = 1e-9);
        assert_eq!(world.position(ground), Some(Point::new(400.0, 230.0)));
    }

    #[test]
    fn properties_map_to_entity_fields() {
        let mut world = World::new();
        let door = world.spawn(Entity::image("door", (541.0, 110.0)));

        world.set_property(door, Property::X, 516.0);
        world.set_property(door, Property::ScaleY, 0.5);
        world.set_property(door, Property::Alpha, 0.25);

        assert_eq!(world.property(door, Property::X), Some(516.0));
        assert_eq!(world.property(door, Property::Y), Some(110.0));
        assert_eq!(world.property(door, Property::ScaleY), Some(0.5));
        assert_eq!(world.get(door).unwrap().alpha, 0.25);
    }

    #[test]
    fn released_entities_are_gone() {
        let mut world = World::new();
        let sprite = world.spawn(Entity::image("animal_sprite", (700.0, 240.0)));
        world.release(sprite);

        assert!(!world.contains(sprite));
        assert_eq!(world.property(sprite, Property::X), None);
        // Writes to destroyed entities are ignored.
        world.set_property(sprite, Property::X, 1.0);
        assert!(world.is_empty());
        // And new entities don't reuse the id.
        assert_ne!(world.spawn(Entity::image("other", (0.0, 0.0))), sprite);
    }

    #[test]
    fn playback_records_direction() {
        let mut world = World::new();
        let horn = world.spawn(Entity::image("horn", (485.0, 441.0)));
        world.play(horn, "honk");
        world.play_reverse(horn, "honk");

        let playback = world.get(horn).unwrap().playback.clone().unwrap();
        assert_eq!(playback.name, "honk");
        assert!(playback.reversed);
    }
}
