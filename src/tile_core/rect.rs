use serde::{Deserialize, Serialize};

/// Axis-aligned region in source-texture pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn square(x: f32, y: f32, side: f32) -> Self {
        Self::new(x, y, side, side)
    }

    /// Pixel rectangle to normalised texture coordinates.
    pub fn to_uv(&self, texture_width: f32, texture_height: f32) -> Rect {
        Rect {
            x: self.x / texture_width,
            y: self.y / texture_height,
            width: self.width / texture_width,
            height: self.height / texture_height,
        }
    }
}
