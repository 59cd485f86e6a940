use serde::Deserialize;

/// A tint color multiplied with an entity's texture. White leaves the texture unchanged.
#[derive(Copy, Clone, PartialEq, Debug, Deserialize)]
#[serde(from = "u32")]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);

    pub const fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self::new(red, green, blue, 1.0)
    }

    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            alpha,
            red,
            green,
            blue,
        }
    }

    pub fn rgb_u32(rgb: u32) -> Self {
        let r = (rgb & 0xff0000) >> 16;
        let g = (rgb & 0xff00) >> 8;
        let b = rgb & 0xff;
        let r = r as f32 / 255.0;
        let g = g as f32 / 255.0;
        let b = b as f32 / 255.0;
        Color::rgb(r, g, b)
    }
}

impl From<u32> for Color {
    fn from(rgb: u32) -> Self {
        Self::rgb_u32(rgb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_tints_match_named_colors() {
        assert_eq!(Color::rgb_u32(0xff0000), Color::RED);
        assert_eq!(Color::rgb_u32(0x00ff00), Color::GREEN);
        assert_eq!(Color::rgb_u32(0xffffff), Color::WHITE);
    }
}
