//! Sprite playing named animations from an animated asset.
//!
//! The sprite always has a current animation. A non-looping animation that
//! runs out of frames hands control back to the default animation (usually
//! `IDLE`).
//!
//! # Timeline keys
//!
//! Each draw compares the frame index before and after
//! [`SpriteAnimation::progress`]. When it changed (or the animation just
//! finished), the sprite fires, for the animation that was playing:
//!
//! 1. the first `end` key bound to the previous frame, then
//! 2. the first `start` key bound to the new frame (skipped when finished).
//!
//! A freshly played animation fires the `start` key of its first frame on its
//! first draw. A key only does something if a callback is watching its name.

use std::fmt;

use log::debug;
use rustc_hash::FxHashMap;

use crate::components::animation::{AnimationFrame, SpriteAnimation};
use crate::components::sprite::{draw_texture, non_zero_or};
use crate::components::{Ctx, Hooks};
use crate::error::{EngineError, EngineResult};
use crate::events::timeline::{KeyCallback, KeyTime, TimelineKey};
use crate::math::{Bounds, Size};
use crate::resources::assets::AssetCatalog;
use crate::systems::render::Canvas;
use crate::world::{EntityId, World};

pub const DEFAULT_ANIMATION: &str = "IDLE";

pub struct AnimatedSprite {
    pub asset_key: String,
    /// Offset from the entity position; zero size falls back to the frame size.
    pub destination: Bounds,
    texture_source: String,
    unit: Size,
    animations: FxHashMap<String, SpriteAnimation>,
    current: String,
    default_animation: String,
    keys: Vec<TimelineKey>,
    watched: FxHashMap<String, KeyCallback>,
    /// Frame shown at the previous draw; `None` right after an animation starts.
    last_frame: Option<usize>,
}

impl fmt::Debug for AnimatedSprite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatedSprite")
            .field("asset_key", &self.asset_key)
            .field("current", &self.current)
            .field("default_animation", &self.default_animation)
            .field("keys", &self.keys.len())
            .field("watched", &self.watched.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AnimatedSprite {
    /// Build from the animated asset `asset_key`, starting on
    /// `default_animation` in a loop.
    pub fn new(
        asset_key: impl Into<String>,
        assets: &AssetCatalog,
        default_animation: impl Into<String>,
        destination: Bounds,
    ) -> EngineResult<Self> {
        let asset_key = asset_key.into();
        let default_animation = default_animation.into();
        let asset = assets.animated(&asset_key)?;
        let animations: FxHashMap<String, SpriteAnimation> = asset
            .animations
            .iter()
            .map(|(name, frames)| (name.clone(), SpriteAnimation::from_asset(name.clone(), frames)))
            .collect();
        if !animations.contains_key(&default_animation) {
            return Err(EngineError::UnknownAnimation {
                asset: asset_key,
                animation: default_animation,
            });
        }
        let mut sprite = Self {
            texture_source: asset.source.clone(),
            unit: Size::new(asset.unit_width, asset.unit_height),
            keys: asset.keys.clone(),
            asset_key,
            destination,
            animations,
            current: default_animation.clone(),
            default_animation,
            watched: FxHashMap::default(),
            last_frame: None,
        };
        let default = sprite.default_animation.clone();
        sprite.play_loop(&default)?;
        Ok(sprite)
    }

    /// Start partway into the first frame so identical sprites do not
    /// animate in lockstep.
    pub fn with_random_start(mut self, rng: &mut fastrand::Rng) -> Self {
        if let Some(animation) = self.animations.get_mut(&self.current) {
            let first = animation.frames.first().map(|f| f.duration).unwrap_or(0.0);
            animation.time_spent = rng.f32() * first;
        }
        self
    }

    pub fn animation(&self) -> &SpriteAnimation {
        &self.animations[&self.current]
    }

    pub fn animation_named(&self, name: &str) -> Option<&SpriteAnimation> {
        self.animations.get(name)
    }

    pub fn animation_named_mut(&mut self, name: &str) -> Option<&mut SpriteAnimation> {
        self.animations.get_mut(name)
    }

    pub fn current_name(&self) -> &str {
        &self.current
    }

    pub fn default_animation(&self) -> &str {
        &self.default_animation
    }

    /// Playback rate of the current animation.
    pub fn set_animation_speed(&mut self, speed: f32) {
        if let Some(animation) = self.animations.get_mut(&self.current) {
            animation.animation_speed = speed;
        }
    }

    pub fn keys(&self) -> &[TimelineKey] {
        &self.keys
    }

    pub fn add_key(&mut self, key: TimelineKey) {
        self.keys.push(key);
    }

    pub fn play_once(&mut self, name: &str) -> EngineResult<()> {
        self.play(name, false)
    }

    pub fn play_loop(&mut self, name: &str) -> EngineResult<()> {
        self.play(name, true)
    }

    /// Switch to `name` from its first frame. An unknown name is an error and
    /// leaves the current animation untouched.
    pub fn play(&mut self, name: &str, looped: bool) -> EngineResult<()> {
        let animation =
            self.animations
                .get_mut(name)
                .ok_or_else(|| EngineError::UnknownAnimation {
                    asset: self.asset_key.clone(),
                    animation: name.to_string(),
                })?;
        animation.looped = looped;
        animation.reset();
        if self.current != name {
            debug!("{}: {} -> {}", self.asset_key, self.current, name);
            self.current = name.to_string();
        }
        self.last_frame = None;
        Ok(())
    }

    /// Register the callback for key `name`, replacing any previous one.
    pub fn watch<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: FnMut(&mut World, EntityId) -> EngineResult<()> + 'static,
    {
        self.watched.insert(name.into(), Box::new(callback));
    }

    pub fn unwatch(&mut self, name: &str) -> bool {
        self.watched.remove(name).is_some()
    }

    pub fn is_watching(&self, name: &str) -> bool {
        self.watched.contains_key(name)
    }

    fn key_at(&self, animation: &str, frame: usize, time: KeyTime) -> Option<String> {
        self.keys
            .iter()
            .find(|k| k.matches(animation, frame, time))
            .map(|k| k.name.clone())
    }

    fn fire(&mut self, ctx: &mut Ctx<'_>, key: Option<String>) -> EngineResult<()> {
        let Some(key) = key else {
            return Ok(());
        };
        if let Some(callback) = self.watched.get_mut(&key) {
            debug!("{}: timeline key '{}'", self.asset_key, key);
            callback(&mut *ctx.world, ctx.entity)?;
        }
        Ok(())
    }

    /// Advance the current animation by `delta`, firing timeline keys.
    /// Returns the frame to draw.
    fn advance(&mut self, ctx: &mut Ctx<'_>, delta: f32) -> EngineResult<Option<AnimationFrame>> {
        let name = self.current.clone();
        if self.last_frame.is_none() {
            let entered = self.animation().frame_number;
            let key = self.key_at(&name, entered, KeyTime::Start);
            self.last_frame = Some(entered);
            self.fire(ctx, key)?;
        }
        let previous = self.last_frame.unwrap_or(0);

        let animation = self
            .animations
            .get_mut(&name)
            .ok_or_else(|| EngineError::UnknownAnimation {
                asset: self.asset_key.clone(),
                animation: name.clone(),
            })?;
        let finished = animation.progress(delta).is_none();
        let frame_number = animation.frame_number;

        if finished || frame_number != previous {
            let end = self.key_at(&name, previous, KeyTime::End);
            self.fire(ctx, end)?;
            if !finished {
                let start = self.key_at(&name, frame_number, KeyTime::Start);
                self.fire(ctx, start)?;
            }
        }

        if finished && self.current == name {
            let default = self.default_animation.clone();
            self.play_loop(&default)?;
        } else if self.current == name {
            self.last_frame = Some(frame_number);
        }
        Ok(self.animation().current_frame().copied())
    }
}

impl Hooks for AnimatedSprite {
    fn on_init(&mut self, ctx: &mut Ctx<'_>) -> EngineResult<()> {
        ctx.world
            .textures
            .request(&self.asset_key, &self.texture_source);
        Ok(())
    }

    fn on_draw(&mut self, ctx: &mut Ctx<'_>, canvas: &mut dyn Canvas) -> EngineResult<()> {
        let delta = ctx.delta();
        let Some(frame) = self.advance(ctx, delta)? else {
            return Ok(());
        };
        let position = ctx.world.position(ctx.entity).unwrap_or_default();
        let width = non_zero_or(self.destination.width, non_zero_or(frame.region.width, self.unit.width));
        let height =
            non_zero_or(self.destination.height, non_zero_or(frame.region.height, self.unit.height));
        let destination = Bounds::new(
            position.x + self.destination.x,
            position.y + self.destination.y,
            width,
            height,
        );
        draw_texture(&ctx.world.textures, canvas, &self.asset_key, frame.region, destination);
        Ok(())
    }
}
