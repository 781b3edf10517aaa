//! Cooldown-gated attack whose hit window follows the attack animation.
//!
//! On init the attack binds two timeline keys on the entity's
//! [`AnimatedSprite`]: the start key spawns a transient entity at the
//! attacker's position holding a [`Hurtbox`], the end key destroys it.

use log::{debug, warn};

use crate::components::animatedsprite::AnimatedSprite;
use crate::components::hurtbox::Hurtbox;
use crate::components::{Ctx, Hooks};
use crate::error::{EngineError, EngineResult};
use crate::math::Bounds;
use crate::world::{EntityId, World};

pub const DEFAULT_ATTACK_ANIMATION: &str = "ATTACK";
pub const DEFAULT_START_KEY: &str = "HURT_START";
pub const DEFAULT_END_KEY: &str = "HURT_END";

#[derive(Debug, Clone, PartialEq)]
pub struct Attack {
    pub animation: String,
    /// Seconds between attacks; the animation duration when unset.
    cooldown: Option<f32>,
    /// World time of the last attack.
    last_attack: Option<f64>,
    /// Sum of the attack animation's frame durations, set on init.
    duration: f32,
    /// Hurtbox geometry, offset from the attacker's position.
    pub bounds: Bounds,
    pub damage: f32,
    pub start_key: String,
    pub end_key: String,
    hurtbox: Option<EntityId>,
}

impl Attack {
    pub fn new(animation: impl Into<String>, bounds: Bounds, damage: f32) -> Self {
        Self {
            animation: animation.into(),
            cooldown: None,
            last_attack: None,
            duration: 0.0,
            bounds,
            damage,
            start_key: DEFAULT_START_KEY.to_string(),
            end_key: DEFAULT_END_KEY.to_string(),
            hurtbox: None,
        }
    }

    pub fn with_cooldown(mut self, cooldown: f32) -> Self {
        self.cooldown = Some(cooldown);
        self
    }

    pub fn with_keys(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_key = start.into();
        self.end_key = end.into();
        self
    }

    /// Effective cooldown, never shorter than the animation.
    pub fn cooldown(&self) -> f32 {
        self.cooldown.unwrap_or(self.duration).max(self.duration)
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn last_attack(&self) -> Option<f64> {
        self.last_attack
    }

    /// Live transient hurtbox entity, if a hit window is open.
    pub fn hurtbox(&self) -> Option<EntityId> {
        self.hurtbox
    }

    fn since_last(&self, now: f64) -> Option<f32> {
        self.last_attack.map(|last| (now - last) as f32)
    }

    pub fn can_attack(&self, now: f64) -> bool {
        self.since_last(now).is_none_or(|t| t >= self.cooldown())
    }

    pub fn is_animation_over(&self, now: f64) -> bool {
        self.since_last(now).is_none_or(|t| t >= self.duration)
    }

    /// Play the attack animation on `entity` if `force` is set or the
    /// cooldown has elapsed. Returns whether the attack started.
    pub fn attack(&mut self, world: &mut World, entity: EntityId, force: bool) -> EngineResult<bool> {
        let now = world.time().elapsed;
        if !force && !self.can_attack(now) {
            return Ok(false);
        }
        world
            .require_component_mut::<AnimatedSprite>(entity)?
            .play_once(&self.animation)?;
        self.last_attack = Some(now);
        debug!("entity {:?} attacks with '{}'", entity, self.animation);
        Ok(true)
    }

    /// Run [`Attack::attack`] on the first attack component of `entity`.
    pub fn trigger(world: &mut World, entity: EntityId, force: bool) -> EngineResult<bool> {
        world
            .with_component::<Attack, _>(entity, |attack, world| attack.attack(world, entity, force))
            .unwrap_or(Err(EngineError::MissingComponent {
                entity,
                component: "Attack",
            }))
    }

    /// Open the hit window when `key` fires on `sprite`.
    pub fn start_hurt_on(&self, sprite: &mut AnimatedSprite, key: &str) {
        let bounds = self.bounds;
        let damage = self.damage;
        sprite.watch(key, move |world, owner| {
            let position = world.position(owner).ok_or(EngineError::DeadEntity(owner))?;
            let hurtbox = world.spawn(position);
            world.add_component(hurtbox, Hurtbox::new(bounds, damage).with_source(owner))?;
            let previous = match world.get_component_mut::<Attack>(owner) {
                Some(attack) => attack.hurtbox.replace(hurtbox),
                None => {
                    warn!("entity {:?} opened a hit window without an attack", owner);
                    None
                }
            };
            if let Some(previous) = previous {
                world.destroy(previous);
            }
            Ok(())
        });
    }

    /// Close the hit window when `key` fires on `sprite`.
    pub fn end_hurt_on(&self, sprite: &mut AnimatedSprite, key: &str) {
        sprite.watch(key, |world, owner| {
            let open = world
                .get_component_mut::<Attack>(owner)
                .and_then(|attack| attack.hurtbox.take());
            if let Some(hurtbox) = open {
                world.destroy(hurtbox);
            }
            Ok(())
        });
    }
}

impl Hooks for Attack {
    fn on_init(&mut self, ctx: &mut Ctx<'_>) -> EngineResult<()> {
        let sprite = ctx
            .world
            .require_component_mut::<AnimatedSprite>(ctx.entity)?;
        self.duration = sprite
            .animation_named(&self.animation)
            .ok_or_else(|| EngineError::UnknownAnimation {
                asset: sprite.asset_key.clone(),
                animation: self.animation.clone(),
            })?
            .total_duration();
        self.start_hurt_on(sprite, &self.start_key);
        self.end_hurt_on(sprite, &self.end_key);
        Ok(())
    }

    fn on_destroy(&mut self, ctx: &mut Ctx<'_>) {
        if let Some(hurtbox) = self.hurtbox.take() {
            ctx.world.destroy(hurtbox);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::timeline::{KeyTime, TimelineKey};
    use crate::math::Vector2;
    use crate::resources::assets::{AnimatedAsset, AssetCatalog, FrameData};
    use crate::systems::render::RecordingCanvas;
    use rustc_hash::FxHashMap;
    use std::sync::Arc;

    fn catalog() -> AssetCatalog {
        let frame = |x: f32| FrameData {
            region: Bounds::new(x, 0.0, 32.0, 32.0),
            duration: 100.0,
        };
        let mut animations = FxHashMap::default();
        animations.insert("IDLE".to_string(), vec![frame(0.0)]);
        animations.insert("ATTACK".to_string(), vec![frame(0.0), frame(32.0), frame(64.0)]);
        AssetCatalog::default().with_animated(
            "character:test",
            AnimatedAsset {
                source: "test.png".into(),
                unit_width: 32.0,
                unit_height: 32.0,
                animations,
                keys: vec![
                    TimelineKey::new(DEFAULT_START_KEY, "ATTACK", 1, KeyTime::Start),
                    TimelineKey::new(DEFAULT_END_KEY, "ATTACK", 1, KeyTime::End),
                ],
            },
        )
    }

    fn attacker(world: &mut World, assets: &AssetCatalog, attack: Attack) -> EntityId {
        let sprite = AnimatedSprite::new("character:test", assets, "IDLE", Bounds::default()).unwrap();
        world
            .spawn_with(Vector2::new(50.0, 0.0), [sprite.into(), attack.into()])
            .unwrap()
    }

    #[test]
    fn duration_comes_from_the_animation() {
        let assets = Arc::new(catalog());
        let mut world = World::new(Arc::clone(&assets));
        let id = attacker(&mut world, &assets, Attack::new("ATTACK", Bounds::default(), 1.0));
        world.start().unwrap();
        let attack = world.get_component::<Attack>(id).unwrap();
        assert!((attack.duration() - 0.3).abs() < 1e-6);
        assert!((attack.cooldown() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn unknown_attack_animation_fails_on_init() {
        let assets = Arc::new(catalog());
        let mut world = World::new(Arc::clone(&assets));
        attacker(&mut world, &assets, Attack::new("KICK", Bounds::default(), 1.0));
        assert!(matches!(
            world.start(),
            Err(EngineError::UnknownAnimation { .. })
        ));
    }

    #[test]
    fn cooldown_gates_attacks() {
        let assets = Arc::new(catalog());
        let mut world = World::new(Arc::clone(&assets));
        let id = attacker(
            &mut world,
            &assets,
            Attack::new("ATTACK", Bounds::default(), 1.0).with_cooldown(1.0),
        );
        world.start().unwrap();

        assert!(Attack::trigger(&mut world, id, false).unwrap());
        let now = world.time().elapsed;
        assert!(!world.get_component::<Attack>(id).unwrap().can_attack(now));
        assert!(!Attack::trigger(&mut world, id, false).unwrap());
        assert!(Attack::trigger(&mut world, id, true).unwrap());

        let attack = world.get_component::<Attack>(id).unwrap();
        let stamp = attack.last_attack().unwrap();
        assert!(!attack.can_attack(stamp + 0.5));
        assert!(attack.is_animation_over(stamp + 0.5));
        assert!(attack.can_attack(stamp + 1.0));
    }

    #[test]
    fn trigger_without_attack_is_an_error() {
        let mut world = World::default();
        let id = world.spawn(Vector2::ZERO);
        assert!(matches!(
            Attack::trigger(&mut world, id, true),
            Err(EngineError::MissingComponent { component: "Attack", .. })
        ));
    }

    #[test]
    fn hit_window_spawns_and_removes_a_hurtbox() {
        let assets = Arc::new(catalog());
        let mut world = World::new(Arc::clone(&assets));
        let bounds = Bounds::new(10.0, 0.0, 20.0, 20.0);
        let id = attacker(&mut world, &assets, Attack::new("ATTACK", bounds, 5.0));
        world.start().unwrap();
        let mut canvas = RecordingCanvas::new(100.0, 100.0);

        Attack::trigger(&mut world, id, false).unwrap();
        world.tick(0.1, &mut canvas).unwrap();
        let hurtbox = world.get_component::<Attack>(id).unwrap().hurtbox().unwrap();
        assert_eq!(world.position(hurtbox), Some(Vector2::new(50.0, 0.0)));
        let hb = world.get_component::<Hurtbox>(hurtbox).unwrap();
        assert_eq!(hb.source, Some(id));
        assert_eq!(hb.hitbox.world_bounds(&world), Bounds::new(60.0, 0.0, 20.0, 20.0));

        world.tick(0.1, &mut canvas).unwrap();
        assert!(!world.contains(hurtbox));
        assert!(world.get_component::<Attack>(id).unwrap().hurtbox().is_none());
    }

    #[test]
    fn destroying_the_attacker_closes_the_hit_window() {
        let assets = Arc::new(catalog());
        let mut world = World::new(Arc::clone(&assets));
        let id = attacker(&mut world, &assets, Attack::new("ATTACK", Bounds::default(), 5.0));
        world.start().unwrap();
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        Attack::trigger(&mut world, id, false).unwrap();
        world.tick(0.1, &mut canvas).unwrap();
        let hurtbox = world.get_component::<Attack>(id).unwrap().hurtbox().unwrap();

        world.destroy(id);
        assert!(!world.contains(hurtbox));
        assert_eq!(world.entity_count(), 0);
    }
}
