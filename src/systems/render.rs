//! Draw boundary between the simulation and a rendering backend.
//!
//! The world uses a bottom-left origin with Y growing upward. Backends draw
//! with a top-left origin, so every destination rectangle is flipped with
//! [`flip_y`] before it reaches a [`Canvas`]: `y' = height - dst.height - dst.y`.
//!
//! [`RecordingCanvas`] implements both [`Canvas`] and [`ImageUploader`] by
//! recording calls instead of drawing; the headless binary and the tests use it.

use crate::error::EngineResult;
use crate::math::Bounds;

/// Backend handle of an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 200, 60);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const DARK_GRAY: Color = Color::rgb(40, 40, 40);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Immediate-mode drawing surface with a top-left origin.
pub trait Canvas {
    fn height(&self) -> f32;
    fn clear(&mut self, color: Color);
    fn draw_image(&mut self, image: ImageId, source: Bounds, destination: Bounds);
    fn fill_rect(&mut self, destination: Bounds, color: Color);
    fn stroke_rect(&mut self, destination: Bounds, color: Color);
}

/// Turns encoded image bytes into a backend image.
pub trait ImageUploader {
    fn upload_image(&mut self, key: &str, bytes: &[u8]) -> EngineResult<ImageId>;
}

/// Convert a world-space destination (bottom-left origin) to canvas space.
pub fn flip_y(destination: Bounds, canvas_height: f32) -> Bounds {
    Bounds {
        y: canvas_height - destination.height - destination.y,
        ..destination
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Image {
        image: ImageId,
        source: Bounds,
        destination: Bounds,
    },
    Fill {
        destination: Bounds,
        color: Color,
    },
    Stroke {
        destination: Bounds,
        color: Color,
    },
}

#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCommand>,
    pub uploads: Vec<String>,
}

impl RecordingCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn images(&self) -> impl Iterator<Item = (&ImageId, &Bounds, &Bounds)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Image {
                image,
                source,
                destination,
            } => Some((image, source, destination)),
            _ => None,
        })
    }

    /// Drop recorded commands, keeping uploads.
    pub fn reset(&mut self) {
        self.commands.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_image(&mut self, image: ImageId, source: Bounds, destination: Bounds) {
        self.commands.push(DrawCommand::Image {
            image,
            source,
            destination,
        });
    }

    fn fill_rect(&mut self, destination: Bounds, color: Color) {
        self.commands.push(DrawCommand::Fill { destination, color });
    }

    fn stroke_rect(&mut self, destination: Bounds, color: Color) {
        self.commands.push(DrawCommand::Stroke { destination, color });
    }
}

impl ImageUploader for RecordingCanvas {
    fn upload_image(&mut self, key: &str, _bytes: &[u8]) -> EngineResult<ImageId> {
        self.uploads.push(key.to_string());
        Ok(ImageId(self.uploads.len() as u32 - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_measures_y_from_the_bottom() {
        let dst = Bounds::new(64.0, 0.0, 64.0, 64.0);
        assert_eq!(flip_y(dst, 480.0), Bounds::new(64.0, 416.0, 64.0, 64.0));
        let raised = Bounds::new(0.0, 100.0, 32.0, 20.0);
        assert_eq!(flip_y(raised, 480.0).y, 360.0);
    }

    #[test]
    fn clear_starts_a_new_frame() {
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        canvas.fill_rect(Bounds::new(0.0, 0.0, 1.0, 1.0), Color::RED);
        canvas.clear(Color::BLACK);
        assert_eq!(canvas.commands, vec![DrawCommand::Clear(Color::BLACK)]);
    }
}
