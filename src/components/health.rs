use log::debug;

use crate::components::{Ctx, Hooks};
use crate::error::EngineResult;
use crate::world::{EntityId, World};

/// Hit points of an entity.
///
/// `health` always stays within `0..=max_health`. The transition to zero is
/// reported exactly once by [`Health::damage`]; further damage is ignored.
/// An entity whose health is zero is destroyed by [`apply_damage`] or, at
/// the latest, by the next update pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    health: f32,
    max_health: f32,
    reaped: bool,
}

impl Health {
    pub fn new(max_health: f32) -> Self {
        let max_health = max_health.max(0.0);
        Self {
            health: max_health,
            max_health,
            reaped: false,
        }
    }

    pub fn with_health(mut self, health: f32) -> Self {
        self.health = health.clamp(0.0, self.max_health);
        self
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Fraction of health left, `0.0` for a zero maximum.
    pub fn ratio(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }

    /// Subtract `amount`. Returns `true` when this call took health to zero.
    pub fn damage(&mut self, amount: f32) -> bool {
        if self.is_dead() {
            return false;
        }
        self.health = (self.health - amount.max(0.0)).clamp(0.0, self.max_health);
        self.is_dead()
    }

    pub fn heal(&mut self, amount: f32) {
        if self.is_dead() {
            return;
        }
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
    }
}

impl Hooks for Health {
    fn update(&mut self, ctx: &mut Ctx<'_>) -> EngineResult<()> {
        if self.is_dead() && !self.reaped {
            self.reaped = true;
            debug!("entity {:?} has no health left", ctx.entity);
            ctx.world.destroy(ctx.entity);
        }
        Ok(())
    }
}

/// Damage the first [`Health`] on `entity` and destroy the entity if the hit
/// was lethal. Returns `false` when the entity is gone or has no health.
pub fn apply_damage(world: &mut World, entity: EntityId, amount: f32) -> bool {
    let Some(health) = world.get_component_mut::<Health>(entity) else {
        return false;
    };
    let lethal = health.damage(amount);
    debug!(
        "entity {:?} took {} damage, {} left",
        entity,
        amount,
        health.health()
    );
    if lethal {
        world.destroy(entity);
    }
    true
}
