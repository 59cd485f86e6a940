use vignettes_geometry::{Color, Point, Vector};

/// A frame animation an entity is playing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playback {
    pub name: String,
    pub reversed: bool,
}

/// An image, sprite, or text label on the stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub texture: String,
    pub position: Point,
    /// Depth in camera space, used by perspective projected entities only.
    pub z: f64,
    /// Radians.
    pub rotation: f64,
    pub scale: Vector,
    pub alpha: f64,
    pub tint: Color,
    /// Draw order, higher is in front.
    pub depth: i32,
    pub flip_x: bool,
    pub velocity: Vector,
    /// Degrees per second.
    pub angular_velocity: f64,
    pub playback: Option<Playback>,
    pub text: Option<String>,
}

impl Entity {
    pub fn image(texture: impl Into<String>, position: impl Into<Point>) -> Self {
        Self {
            texture: texture.into(),
            position: position.into(),
            z: 0.0,
            rotation: 0.0,
            scale: Vector::new(1.0, 1.0),
            alpha: 1.0,
            tint: Color::WHITE,
            depth: 0,
            flip_x: false,
            velocity: Vector::ZERO,
            angular_velocity: 0.0,
            playback: None,
            text: None,
        }
    }

    pub fn label(text: impl Into<String>, position: impl Into<Point>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::image("", position)
        }
    }

    pub fn with_depth(self, depth: i32) -> Self {
        Self { depth, ..self }
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    pub fn with_z(self, z: f64) -> Self {
        Self { z, ..self }
    }

    pub fn is_moving(&self) -> bool {
        self.velocity != Vector::ZERO || self.angular_velocity != 0.0
    }
}
