//! Target-seeking character controllers.
//!
//! A [`CharacterController`] is idle while it has no target and seeking
//! while it has one. Seeking moves the entity along X only (characters stay
//! in their lane) towards `target.x + x_offset`. The offset is signed, so a
//! negative one stops left of the target. Reaching that point drops the
//! target and hands over to [`Targeting::on_target_reached`], which attacks by default.
//!
//! Faction behaviour lives behind the [`Targeting`] trait:
//! - slimes go for the leftmost enemy;
//! - enemies go for the nearest slime.

use std::fmt;

use log::debug;

use crate::components::animatedsprite::AnimatedSprite;
use crate::components::attack::Attack;
use crate::components::{ComponentKind, Ctx, Hooks};
use crate::error::EngineResult;
use crate::math::Vector2;
use crate::world::{EntityId, World};

pub const DEFAULT_REFERENCE_SPEED: f32 = 100.0;
pub const DEFAULT_WALK_ANIMATION: &str = "WALK";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Faction {
    Slime,
    Enemy,
}

impl Faction {
    pub fn opponent(self) -> Faction {
        match self {
            Faction::Slime => Faction::Enemy,
            Faction::Enemy => Faction::Slime,
        }
    }

    pub fn kind(self) -> ComponentKind {
        match self {
            Faction::Slime => ComponentKind::SlimeController,
            Faction::Enemy => ComponentKind::EnemyController,
        }
    }
}

pub trait Targeting: fmt::Debug {
    fn faction(&self) -> Faction;

    /// Whether the controller may pick a new target: an opponent exists and
    /// the entity is not in the middle of an attack.
    fn can_find_target(&self, world: &World, entity: EntityId) -> bool {
        let now = world.time().elapsed;
        let has_opponents = !world.entities_with(self.faction().opponent().kind()).is_empty();
        let ready = world
            .get_component::<Attack>(entity)
            .is_none_or(|attack| attack.is_animation_over(now));
        has_opponents && ready
    }

    fn find_target(&self, world: &World, entity: EntityId) -> Option<EntityId>;

    /// Attack if the cooldown allows it, otherwise idle.
    fn on_target_reached(&mut self, world: &mut World, entity: EntityId) -> EngineResult<()> {
        let attacked = world.get_component::<Attack>(entity).is_some()
            && Attack::trigger(world, entity, false)?;
        if !attacked {
            if let Some(sprite) = world.get_component_mut::<AnimatedSprite>(entity) {
                let idle = sprite.default_animation().to_string();
                sprite.play_loop(&idle)?;
            }
        }
        Ok(())
    }
}

fn opponents(world: &World, faction: Faction) -> impl Iterator<Item = (EntityId, Vector2)> + '_ {
    world
        .entities_with(faction.opponent().kind())
        .iter()
        .filter_map(move |e| Some((*e, world.position(*e)?)))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SlimeTargeting;

impl Targeting for SlimeTargeting {
    fn faction(&self) -> Faction {
        Faction::Slime
    }

    fn find_target(&self, world: &World, _entity: EntityId) -> Option<EntityId> {
        opponents(world, Faction::Slime)
            .min_by(|(_, a), (_, b)| a.x.total_cmp(&b.x))
            .map(|(e, _)| e)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EnemyTargeting;

impl Targeting for EnemyTargeting {
    fn faction(&self) -> Faction {
        Faction::Enemy
    }

    fn find_target(&self, world: &World, entity: EntityId) -> Option<EntityId> {
        let me = world.position(entity)?;
        opponents(world, Faction::Enemy)
            .min_by(|(_, a), (_, b)| me.distance(*a).total_cmp(&me.distance(*b)))
            .map(|(e, _)| e)
    }
}

#[derive(Debug)]
pub struct CharacterController {
    /// Units per second.
    pub speed: f32,
    /// Speed at which the walk animation plays at its authored rate.
    pub reference_speed: f32,
    /// Signed X offset from the target's position to the point to stop at.
    pub x_offset: f32,
    pub walk_animation: String,
    target: Option<EntityId>,
    targeting: Box<dyn Targeting>,
}

impl CharacterController {
    pub fn new(speed: f32, targeting: Box<dyn Targeting>) -> Self {
        Self {
            speed,
            reference_speed: DEFAULT_REFERENCE_SPEED,
            x_offset: 0.0,
            walk_animation: DEFAULT_WALK_ANIMATION.to_string(),
            target: None,
            targeting,
        }
    }

    pub fn slime(speed: f32) -> Self {
        Self::new(speed, Box::new(SlimeTargeting))
    }

    pub fn enemy(speed: f32) -> Self {
        Self::new(speed, Box::new(EnemyTargeting))
    }

    pub fn with_x_offset(mut self, x_offset: f32) -> Self {
        self.x_offset = x_offset;
        self
    }

    pub fn with_walk_animation(mut self, name: impl Into<String>) -> Self {
        self.walk_animation = name.into();
        self
    }

    pub fn faction(&self) -> Faction {
        self.targeting.faction()
    }

    pub fn kind(&self) -> ComponentKind {
        self.faction().kind()
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn is_seeking(&self) -> bool {
        self.target.is_some()
    }

    fn acquire_target(&mut self, world: &mut World, entity: EntityId) -> EngineResult<()> {
        if !self.targeting.can_find_target(world, entity) {
            return Ok(());
        }
        let Some(target) = self.targeting.find_target(world, entity) else {
            return Ok(());
        };
        debug!("entity {:?} now seeking {:?}", entity, target);
        self.target = Some(target);
        if let Some(sprite) = world.get_component_mut::<AnimatedSprite>(entity) {
            sprite.play_loop(&self.walk_animation)?;
        }
        Ok(())
    }

    fn sync_walk_speed(&self, world: &mut World, entity: EntityId) {
        let ratio = if self.reference_speed > 0.0 {
            self.speed / self.reference_speed
        } else {
            1.0
        };
        if let Some(walk) = world
            .get_component_mut::<AnimatedSprite>(entity)
            .and_then(|sprite| sprite.animation_named_mut(&self.walk_animation))
        {
            walk.animation_speed = ratio;
        }
    }

    /// Step towards `target.x + x_offset`. Returns `true` once it is reached.
    fn seek(&self, world: &mut World, entity: EntityId, target: EntityId, delta: f32) -> bool {
        let (Some(me), Some(there)) = (world.position(entity), world.position(target)) else {
            return false;
        };
        let goal = there.x + self.x_offset;
        let remaining = goal - me.x;
        let step = self.speed * delta;
        let (dx, reached) = if remaining.abs() <= step {
            (remaining, true)
        } else {
            (step * remaining.signum(), false)
        };
        if let Some(e) = world.entity_mut(entity) {
            let local = e.transform.local_position();
            e.transform.set_position(local + Vector2::new(dx, 0.0));
        }
        reached
    }
}

impl Hooks for CharacterController {
    fn update(&mut self, ctx: &mut Ctx<'_>) -> EngineResult<()> {
        let entity = ctx.entity;
        if self.target.is_some_and(|t| !ctx.world.contains(t)) {
            self.target = None;
        }
        if self.target.is_none() {
            self.acquire_target(ctx.world, entity)?;
        }
        self.sync_walk_speed(ctx.world, entity);

        let Some(target) = self.target else {
            return Ok(());
        };
        let delta = ctx.delta();
        if self.seek(ctx.world, entity, target, delta) {
            debug!("entity {:?} reached {:?}", entity, target);
            self.target = None;
            self.targeting.on_target_reached(ctx.world, entity)?;
        }
        Ok(())
    }
}
