use serde::Deserialize;
use vignettes_geometry::{Color, Contains, Point, Rect};
use vignettes_scene::{Entity, EntityId, World};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Left,
    Right,
}

/// Pointer and keyboard input in stage coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    PointerMove(Point),
    PointerDown(Point),
    PointerUp(Point),
    KeyDown(Key),
    KeyUp(Key),
}

impl InputEvent {
    pub fn pointer(&self) -> Option<Point> {
        match *self {
            InputEvent::PointerMove(p) | InputEvent::PointerDown(p) | InputEvent::PointerUp(p) => {
                Some(p)
            }
            InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => None,
        }
    }
}

/// An image that reacts to the pointer inside its rectangle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Button {
    pub entity: EntityId,
    pub region: Rect,
}

impl Button {
    /// Spawns the button's image centered in `region`.
    pub fn spawn(world: &mut World, texture: &str, region: Rect, depth: i32) -> Self {
        let entity = world.spawn(Entity::image(texture, region.center()).with_depth(depth));
        Self { entity, region }
    }

    pub fn hit(&self, point: Point) -> bool {
        self.region.contains(point)
    }

    pub fn tint(&self, world: &mut World, tint: Color) {
        world.set_tint(self.entity, tint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_hit_inside_their_region() {
        let mut world = World::new();
        let region = Rect::centered((300.0, 230.0), 200.0, 80.0);
        let button = Button::spawn(&mut world, "start", region, 101);
        assert_eq!(world.position(button.entity), Some(Point::new(300.0, 230.0)));
        assert!(button.hit(Point::new(210.0, 200.0)));
        assert!(!button.hit(Point::new(300.0, 280.0)));

        button.tint(&mut world, Color::GREEN);
        assert_eq!(world.get(button.entity).map(|e| e.tint), Some(Color::GREEN));
    }

    #[test]
    fn events_deserialize_from_scripts() {
        #[derive(Deserialize)]
        struct Script {
            events: Vec<InputEvent>,
        }

        let script: Script = toml::from_str(
            r#"
            events = [
                { pointer_down = [541.0, 200.0] },
                { key_down = "right" },
            ]
            "#,
        )
        .unwrap();
        assert_eq!(
            script.events,
            [
                InputEvent::PointerDown(Point::new(541.0, 200.0)),
                InputEvent::KeyDown(Key::Right)
            ]
        );
        assert_eq!(script.events[1].pointer(), None);
    }
}
