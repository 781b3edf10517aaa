use crate::components::{Ctx, Hooks};
use crate::error::EngineResult;
use crate::math::{Bounds, Size};
use crate::resources::assets::AssetCatalog;
use crate::resources::texturestore::TextureStore;
use crate::systems::render::{Canvas, flip_y};

/// Static sprite drawing one region of a texture.
///
/// `source` selects the region of the sheet, `destination` offsets the draw
/// from the entity's resolved position. A zero width or height in either
/// falls back to the asset's unit size.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub asset_key: String,
    pub source: Bounds,
    pub destination: Bounds,
    texture_source: String,
    unit: Size,
}

impl Sprite {
    pub fn new(
        asset_key: impl Into<String>,
        assets: &AssetCatalog,
        source: Bounds,
        destination: Bounds,
    ) -> EngineResult<Self> {
        let asset_key = asset_key.into();
        let asset = assets.sprite(&asset_key)?;
        Ok(Self {
            texture_source: asset.source.clone(),
            unit: Size::new(asset.unit_width, asset.unit_height),
            asset_key,
            source,
            destination,
        })
    }

    pub fn width(&self) -> f32 {
        non_zero_or(self.source.width, self.unit.width)
    }

    pub fn height(&self) -> f32 {
        non_zero_or(self.source.height, self.unit.height)
    }
}

impl Hooks for Sprite {
    fn on_init(&mut self, ctx: &mut Ctx<'_>) -> EngineResult<()> {
        ctx.world
            .textures
            .request(&self.asset_key, &self.texture_source);
        Ok(())
    }

    fn on_draw(&mut self, ctx: &mut Ctx<'_>, canvas: &mut dyn Canvas) -> EngineResult<()> {
        let position = ctx.world.position(ctx.entity).unwrap_or_default();
        let source = Bounds::new(self.source.x, self.source.y, self.width(), self.height());
        let destination = Bounds::new(
            position.x + self.destination.x,
            position.y + self.destination.y,
            non_zero_or(self.destination.width, self.unit.width),
            non_zero_or(self.destination.height, self.unit.height),
        );
        draw_texture(&ctx.world.textures, canvas, &self.asset_key, source, destination);
        Ok(())
    }
}

pub(crate) fn non_zero_or(value: f32, fallback: f32) -> f32 {
    if value != 0.0 { value } else { fallback }
}

/// Draw `source` of the texture for `key` at a world-space `destination`.
///
/// A texture that has not finished loading is skipped; the next frame draws
/// it again, so the sprite appears as soon as the load lands.
pub(crate) fn draw_texture(
    textures: &TextureStore,
    canvas: &mut dyn Canvas,
    key: &str,
    source: Bounds,
    destination: Bounds,
) {
    if let Some(image) = textures.get(key) {
        let destination = flip_y(destination, canvas.height());
        canvas.draw_image(image, source, destination);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::assets::SpriteAsset;
    use crate::resources::texturestore::TextureStore;
    use crate::systems::render::{ImageId, RecordingCanvas};
    use crate::world::World;
    use crate::math::Vector2;
    use std::sync::Arc;
    use std::time::Duration;

    fn catalog() -> AssetCatalog {
        AssetCatalog::default().with_sprite(
            "block:prototype:64",
            SpriteAsset {
                source: "sprites/tile_64.png".into(),
                unit_width: 64.0,
                unit_height: 64.0,
            },
        )
    }

    #[test]
    fn unknown_asset_fails_construction() {
        let err = Sprite::new("nope", &catalog(), Bounds::default(), Bounds::default());
        assert!(err.is_err());
    }

    #[test]
    fn zero_source_size_uses_unit_size() {
        let sprite = Sprite::new(
            "block:prototype:64",
            &catalog(),
            Bounds::default(),
            Bounds::default(),
        )
        .unwrap();
        assert_eq!(sprite.width(), 64.0);
        assert_eq!(sprite.height(), 64.0);
    }

    #[test]
    fn draw_waits_for_the_texture_then_flips_y() {
        let assets = Arc::new(catalog());
        let mut world = World::new(Arc::clone(&assets))
            .with_textures(TextureStore::with_reader(|_| Ok(vec![0u8; 4])));
        let sprite = Sprite::new(
            "block:prototype:64",
            &assets,
            Bounds::default(),
            Bounds::new(0.0, 0.0, 0.0, 0.0),
        )
        .unwrap();
        world
            .spawn_with(Vector2::new(64.0, 0.0), [sprite.into()])
            .unwrap();
        world.start().unwrap();

        let mut canvas = RecordingCanvas::new(480.0, 480.0);
        world.tick(0.016, &mut canvas).unwrap();
        assert_eq!(canvas.images().count(), 0);

        world.textures.wait(&mut canvas, Duration::from_secs(5));
        canvas.reset();
        world.tick(0.016, &mut canvas).unwrap();
        let (image, source, destination) = canvas.images().next().unwrap();
        assert_eq!(*image, ImageId(0));
        assert_eq!(*source, Bounds::new(0.0, 0.0, 64.0, 64.0));
        assert_eq!(*destination, Bounds::new(64.0, 416.0, 64.0, 64.0));
    }
}
