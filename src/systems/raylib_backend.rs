//! Raylib window backend.
//!
//! [`RaylibImages`] uploads decoded texture bytes to the GPU and keeps the
//! resulting textures; [`RaylibCanvas`] draws into a frame with them. Both
//! implement the engine-side traits from [`crate::systems::render`].

use raylib::prelude::*;
use rustc_hash::FxHashMap;

use crate::error::{EngineError, EngineResult};
use crate::math::Bounds;
use crate::systems::render::{Canvas, Color as EngineColor, ImageId, ImageUploader};

fn rect(b: Bounds) -> Rectangle {
    Rectangle {
        x: b.x,
        y: b.y,
        width: b.width,
        height: b.height,
    }
}

fn color(c: EngineColor) -> Color {
    Color::new(c.r, c.g, c.b, c.a)
}

/// GPU textures keyed by the ids handed out to the texture store.
#[derive(Default)]
pub struct RaylibImages {
    textures: FxHashMap<ImageId, Texture2D>,
    next_id: u32,
}

impl RaylibImages {
    pub fn uploader<'a>(
        &'a mut self,
        rl: &'a mut RaylibHandle,
        thread: &'a RaylibThread,
    ) -> RaylibUploader<'a> {
        RaylibUploader {
            images: self,
            rl,
            thread,
        }
    }

    pub fn get(&self, image: ImageId) -> Option<&Texture2D> {
        self.textures.get(&image)
    }
}

pub struct RaylibUploader<'a> {
    images: &'a mut RaylibImages,
    rl: &'a mut RaylibHandle,
    thread: &'a RaylibThread,
}

impl ImageUploader for RaylibUploader<'_> {
    fn upload_image(&mut self, key: &str, bytes: &[u8]) -> EngineResult<ImageId> {
        let image = Image::load_image_from_mem(".png", bytes)
            .map_err(|e| EngineError::Render(format!("decoding '{}': {}", key, e)))?;
        let texture = self
            .rl
            .load_texture_from_image(self.thread, &image)
            .map_err(|e| EngineError::Render(format!("uploading '{}': {}", key, e)))?;
        let id = ImageId(self.images.next_id);
        self.images.next_id += 1;
        self.images.textures.insert(id, texture);
        Ok(id)
    }
}

pub struct RaylibCanvas<'a, 'b> {
    pub d: &'a mut RaylibDrawHandle<'b>,
    pub images: &'a RaylibImages,
    pub height: f32,
}

impl Canvas for RaylibCanvas<'_, '_> {
    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self, c: EngineColor) {
        self.d.clear_background(color(c));
    }

    fn draw_image(&mut self, image: ImageId, source: Bounds, destination: Bounds) {
        if let Some(texture) = self.images.get(image) {
            self.d.draw_texture_pro(
                texture,
                rect(source),
                rect(destination),
                Vector2::zero(),
                0.0,
                Color::WHITE,
            );
        }
    }

    fn fill_rect(&mut self, destination: Bounds, c: EngineColor) {
        self.d.draw_rectangle_rec(rect(destination), color(c));
    }

    fn stroke_rect(&mut self, destination: Bounds, c: EngineColor) {
        self.d.draw_rectangle_lines_ex(rect(destination), 1.0, color(c));
    }
}
