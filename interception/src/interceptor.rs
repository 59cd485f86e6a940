use log::{debug, info};
use vignettes_animation::InvalidConfiguration;
use vignettes_scene::{EntityId, World};

use crate::{CombineRule, Direction, Layout};

#[derive(Debug, Clone, PartialEq)]
pub struct Collectible<V> {
    pub body: EntityId,
    pub captured: bool,
    pub threshold: f64,
    pub value: V,
}

/// The bodies that always move together.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Movers {
    /// The body whose position triggers captures.
    pub reference: EntityId,
    /// The body the travel bounds apply to.
    pub controlled: EntityId,
    /// Shows the accumulator.
    pub display: EntityId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Capture<V, A> {
    /// Index in registry order.
    pub index: usize,
    pub value: V,
    /// The accumulator right after this capture.
    pub accumulator: A,
}

/// Captures collectibles as the reference body passes their thresholds.
#[derive(Debug)]
pub struct Interceptor<R: CombineRule> {
    rule: R,
    layout: Layout,
    direction: Direction,
    movers: Movers,
    collectibles: Vec<Collectible<R::Value>>,
    accumulator: R::Accumulator,
    /// Bodies receiving the linear velocity commands.
    moving: Vec<EntityId>,
    /// Bodies receiving the angular velocity commands.
    rotating: Vec<EntityId>,
}

impl<R: CombineRule> Interceptor<R> {
    /// Registers the collectibles in the order given and resets the scene to its initial layout.
    pub fn new(
        rule: R,
        layout: Layout,
        direction: Direction,
        movers: Movers,
        collectibles: impl IntoIterator<Item = (EntityId, R::Value)>,
        world: &mut World,
    ) -> Result<Self, InvalidConfiguration> {
        let collectibles: Vec<_> = collectibles
            .into_iter()
            .map(|(body, value)| Collectible {
                body,
                captured: false,
                threshold: f64::NAN,
                value,
            })
            .collect();
        layout.validate(collectibles.len(), direction)?;

        let accumulator = rule.identity();
        let mut interceptor = Self {
            rule,
            layout,
            direction,
            movers,
            collectibles,
            accumulator,
            moving: Vec::new(),
            rotating: Vec::new(),
        };
        interceptor.reset(world);
        Ok(interceptor)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn movers(&self) -> Movers {
        self.movers
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn collectibles(&self) -> &[Collectible<R::Value>] {
        &self.collectibles
    }

    pub fn accumulator(&self) -> &R::Accumulator {
        &self.accumulator
    }

    pub fn caption(&self) -> String {
        self.rule.caption(&self.accumulator)
    }

    pub fn moving(&self) -> &[EntityId] {
        &self.moving
    }

    pub fn rotating(&self) -> &[EntityId] {
        &self.rotating
    }

    pub fn all_captured(&self) -> bool {
        self.collectibles.iter().all(|c| c.captured)
    }

    /// Indices of the free collectibles the reference has passed at `reference_x`, in the order
    /// a reference travelling in the current direction crosses their thresholds.
    ///
    /// Collectibles sharing a threshold are ordered by registration.
    pub fn crossed(&self, reference_x: f64) -> Vec<usize> {
        let direction = self.direction;
        let mut crossed: Vec<usize> = self
            .collectibles
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.captured && direction.has_passed(c.threshold, reference_x))
            .map(|(index, _)| index)
            .collect();
        // Stable, so ties stay in registry order.
        crossed.sort_by(|a, b| {
            let key = |i: &usize| direction.sign() * self.collectibles[*i].threshold;
            key(a).total_cmp(&key(b))
        });
        crossed
    }

    /// Captures every collectible the reference body has passed.
    ///
    /// Returns the captures in the order they were applied to the accumulator.
    pub fn on_tick(&mut self, world: &mut World) -> Vec<Capture<R::Value, R::Accumulator>> {
        let Some(reference) = world.position(self.movers.reference) else {
            return Vec::new();
        };

        let crossed = self.crossed(reference.x);
        let mut captures = Vec::with_capacity(crossed.len());
        for index in crossed {
            let collectible = &mut self.collectibles[index];
            collectible.captured = true;
            world.set_position(collectible.body, reference);
            self.moving.push(collectible.body);
            self.rotating.push(collectible.body);

            let accumulator = std::mem::replace(&mut self.accumulator, self.rule.identity());
            self.accumulator = self.rule.combine(accumulator, &collectible.value);
            debug!(
                "Captured collectible {index} at x {:.1}: {:?}",
                reference.x, self.accumulator
            );
            captures.push(Capture {
                index,
                value: collectible.value.clone(),
                accumulator: self.accumulator.clone(),
            });
        }

        if !captures.is_empty() {
            world.set_text(self.movers.display, self.caption());
        }
        captures
    }

    /// Applies the velocities, scaled by the direction's sign, to the moving and rotating bodies.
    pub fn move_bodies(&self, velocity: f64, angular_velocity: f64, world: &mut World) {
        let sign = self.direction.sign();
        for body in &self.moving {
            world.set_velocity_x(*body, velocity * sign);
        }
        for body in &self.rotating {
            world.set_angular_velocity(*body, angular_velocity * sign);
        }
    }

    pub fn stop(&self, world: &mut World) {
        self.move_bodies(0.0, 0.0, world);
    }

    /// Returns everything to the initial layout of the current direction.
    pub fn reset(&mut self, world: &mut World) {
        self.stop(world);

        let direction = self.direction;
        for (index, collectible) in self.collectibles.iter_mut().enumerate() {
            collectible.captured = false;
            collectible.threshold = self.layout.threshold(index, direction);
            world.set_velocity_x(collectible.body, 0.0);
            world.set_angular_velocity(collectible.body, 0.0);
            world.set_position(collectible.body, self.layout.collectible_position(index));
            world.set_rotation(collectible.body, 0.0);
        }

        let Movers {
            reference,
            controlled,
            display,
        } = self.movers;
        let flip = direction == Direction::Left;
        world.set_position(reference, self.layout.reference_home(direction));
        world.set_rotation(reference, 0.0);
        world.set_flip_x(reference, flip);
        world.set_position(controlled, self.layout.controlled_home(direction));
        world.set_flip_x(controlled, flip);
        world.set_position(display, self.layout.display_home(direction));

        self.accumulator = self.rule.identity();
        world.set_text(display, self.caption());

        self.moving = vec![reference, controlled, display];
        self.rotating = vec![reference];
        info!("Reset, travelling {direction}");
    }

    /// Switches the travel direction and resets. Does nothing if the direction doesn't change.
    pub fn set_direction(
        &mut self,
        direction: Direction,
        world: &mut World,
    ) -> Result<(), InvalidConfiguration> {
        if direction == self.direction {
            return Ok(());
        }
        self.layout.validate(self.collectibles.len(), direction)?;
        self.direction = direction;
        self.reset(world);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use vignettes_geometry::Point;
    use vignettes_scene::Entity;

    use super::*;
    use crate::{Nested, NestedPairs, Sum};

    fn scene<R: CombineRule<Value = i64>>(
        rule: R,
        values: &[i64],
        direction: Direction,
    ) -> (World, Interceptor<R>) {
        let mut world = World::new();
        let movers = Movers {
            reference: world.spawn(Entity::image("ball", (0.0, 0.0))),
            controlled: world.spawn(Entity::image("guy", (0.0, 0.0))),
            display: world.spawn(Entity::label("", (0.0, 0.0))),
        };
        let collectibles: Vec<_> = values
            .iter()
            .map(|v| (world.spawn(Entity::image("item", (0.0, 0.0))), *v))
            .collect();
        let interceptor = Interceptor::new(
            rule,
            Layout::default(),
            direction,
            movers,
            collectibles,
            &mut world,
        )
        .unwrap();
        (world, interceptor)
    }

    fn roll_to<R: CombineRule>(
        x: f64,
        world: &mut World,
        interceptor: &mut Interceptor<R>,
    ) -> Vec<Capture<R::Value, R::Accumulator>> {
        let reference = interceptor.movers().reference;
        let y = world.position(reference).unwrap().y;
        world.set_position(reference, Point::new(x, y));
        interceptor.on_tick(world)
    }

    #[test]
    fn sums_values_in_crossing_order() {
        let (mut world, mut interceptor) = scene(Sum, &[1, 2, 3], Direction::Right);
        assert_eq!(*interceptor.accumulator(), 0);

        let mut sums = vec![*interceptor.accumulator()];
        for x in [261.0, 361.0, 461.0] {
            let captures = roll_to(x, &mut world, &mut interceptor);
            assert_eq!(captures.len(), 1);
            sums.push(captures[0].accumulator);
        }
        assert_eq!(sums, [0, 1, 3, 6]);

        let display = world.get(interceptor.movers().display).unwrap();
        assert_eq!(display.text.as_deref(), Some("Sum\n6"));
    }

    #[test]
    fn nests_pairs_in_crossing_order() {
        let (mut world, mut interceptor) = scene(NestedPairs, &[1, 2, 3], Direction::Right);
        let mut captions = vec![interceptor.caption()];
        for x in [261.0, 361.0, 461.0] {
            roll_to(x, &mut world, &mut interceptor);
            captions.push(interceptor.caption());
        }
        assert_eq!(
            captions,
            [
                "End",
                "(1,(1,End))",
                "(2,(2,(1,(1,End))))",
                "(3,(3,(2,(2,(1,(1,End))))))",
            ]
        );
    }

    #[test]
    fn captured_bodies_snap_to_the_reference_and_join_the_movers() {
        let (mut world, mut interceptor) = scene(Sum, &[1, 2], Direction::Right);
        let captures = roll_to(300.0, &mut world, &mut interceptor);
        assert_eq!(captures.len(), 1);

        let body = interceptor.collectibles()[0].body;
        assert_eq!(world.position(body), Some(Point::new(300.0, 240.0)));
        assert!(interceptor.moving().contains(&body));
        assert!(interceptor.rotating().contains(&body));

        interceptor.move_bodies(160.0, 100.0, &mut world);
        let entity = world.get(body).unwrap();
        assert_eq!(entity.velocity.x, 160.0);
        assert_eq!(entity.angular_velocity, 100.0);
        let second = interceptor.collectibles()[1].body;
        assert_eq!(world.get(second).unwrap().velocity.x, 0.0);
    }

    #[test]
    fn simultaneous_crossings_capture_in_travel_order() {
        let (mut world, mut interceptor) = scene(NestedPairs, &[1, 2, 3], Direction::Left);
        // One big step past every threshold.
        let captures = roll_to(100.0, &mut world, &mut interceptor);
        let order: Vec<usize> = captures.iter().map(|c| c.index).collect();
        assert_eq!(order, [2, 1, 0]);
        assert_eq!(
            *interceptor.accumulator(),
            NestedPairs.combine(
                NestedPairs.combine(NestedPairs.combine(Nested::End, &3), &2),
                &1
            )
        );
    }

    #[test]
    fn reversing_direction_mirrors_the_layout() {
        let (mut world, mut interceptor) = scene(Sum, &[1, 2, 3, 4, 5], Direction::Right);
        roll_to(500.0, &mut world, &mut interceptor);
        interceptor.move_bodies(160.0, 100.0, &mut world);

        interceptor.set_direction(Direction::Left, &mut world).unwrap();

        let thresholds: Vec<f64> = interceptor.collectibles().iter().map(|c| c.threshold).collect();
        assert_eq!(thresholds, [340.0, 440.0, 540.0, 640.0, 740.0]);
        let movers = interceptor.movers();
        let reference = world.get(movers.reference).unwrap();
        assert_eq!(reference.position, Point::new(835.0, 240.0));
        assert!(reference.flip_x);
        assert_eq!(world.position(movers.controlled), Some(Point::new(960.0, 265.0)));
        assert_eq!(world.position(movers.display), Some(Point::new(808.0, 210.0)));
        assert!(world.iter().all(|(_, e)| !e.is_moving()));

        let captures = roll_to(739.0, &mut world, &mut interceptor);
        assert_eq!(captures[0].index, 4);
        assert_eq!(*interceptor.accumulator(), 5);
    }

    #[test]
    fn moving_left_negates_velocities() {
        let (mut world, interceptor) = scene(Sum, &[1], Direction::Left);
        interceptor.move_bodies(160.0, 100.0, &mut world);
        let reference = world.get(interceptor.movers().reference).unwrap();
        assert_eq!(reference.velocity.x, -160.0);
        assert_eq!(reference.angular_velocity, -100.0);
        let display = world.get(interceptor.movers().display).unwrap();
        assert_eq!(display.velocity.x, -160.0);
        assert_eq!(display.angular_velocity, 0.0);
    }

    #[test]
    fn rejects_layouts_with_unreachable_thresholds() {
        let mut world = World::new();
        let movers = Movers {
            reference: world.spawn(Entity::image("ball", (0.0, 0.0))),
            controlled: world.spawn(Entity::image("guy", (0.0, 0.0))),
            display: world.spawn(Entity::label("", (0.0, 0.0))),
        };
        let items: Vec<_> = (0..8)
            .map(|v| (world.spawn(Entity::image("item", (0.0, 0.0))), v))
            .collect();
        let result = Interceptor::new(
            Sum,
            Layout::default(),
            Direction::Left,
            movers,
            items,
            &mut world,
        );
        assert!(result.is_err());
    }

    fn snapshot<R: CombineRule>(
        world: &World,
        interceptor: &Interceptor<R>,
    ) -> (Vec<Collectible<R::Value>>, R::Accumulator, Vec<EntityId>, Vec<String>) {
        let entities = world.iter().map(|(_, e)| format!("{e:?}")).collect();
        (
            interceptor.collectibles().to_vec(),
            interceptor.accumulator().clone(),
            interceptor.moving().to_vec(),
            entities,
        )
    }

    fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![Just(Direction::Right), Just(Direction::Left)]
    }

    proptest! {
        #[test]
        fn reset_restores_the_initial_state_and_is_idempotent(
            direction in direction(),
            stops in prop::collection::vec(0.0f64..1000.0, 0..10),
        ) {
            let (mut world, mut interceptor) = scene(Sum, &[1, 2, 3, 4, 5], direction);
            let initial = snapshot(&world, &interceptor);

            for x in stops {
                roll_to(x, &mut world, &mut interceptor);
                interceptor.move_bodies(160.0, 100.0, &mut world);
            }

            interceptor.reset(&mut world);
            let once = snapshot(&world, &interceptor);
            prop_assert!(interceptor.collectibles().iter().all(|c| !c.captured));
            prop_assert_eq!(*interceptor.accumulator(), 0);
            prop_assert_eq!(&once, &initial);

            interceptor.reset(&mut world);
            prop_assert_eq!(snapshot(&world, &interceptor), once);
        }

        #[test]
        fn monotonic_travel_captures_each_once_in_threshold_order(
            direction in direction(),
            steps in prop::collection::vec(1.0f64..150.0, 1..40),
        ) {
            let (mut world, mut interceptor) = scene(Sum, &[1, 2, 3, 4, 5], direction);
            let mut x = world.position(interceptor.movers().reference).unwrap().x;
            let mut order = Vec::new();
            for step in steps {
                x += step * direction.sign();
                order.extend(roll_to(x, &mut world, &mut interceptor).into_iter().map(|c| c.index));
            }

            let mut expected = order.clone();
            expected.sort();
            expected.dedup();
            prop_assert_eq!(expected.len(), order.len());

            let thresholds: Vec<f64> = order
                .iter()
                .map(|i| direction.sign() * interceptor.collectibles()[*i].threshold)
                .collect();
            prop_assert!(thresholds.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(
                *interceptor.accumulator(),
                order.iter().map(|i| *i as i64 + 1).sum::<i64>()
            );
        }
    }
}
