//! Active collision volume that damages what it overlaps.
//!
//! Every update the hurtbox scans all live entities, so a target entering
//! the box late in its lifetime is still hit. Each target is hit at most once
//! per hurtbox instance.

use log::debug;
use rustc_hash::FxHashSet;

use crate::components::health::{Health, apply_damage};
use crate::components::hitbox::Hitbox;
use crate::components::{Ctx, Hooks};
use crate::error::EngineResult;
use crate::math::Bounds;
use crate::systems::render::{Canvas, Color, flip_y};
use crate::world::EntityId;

#[derive(Debug, Clone)]
pub struct Hurtbox {
    pub hitbox: Hitbox,
    /// Attacking entity, excluded from the scan while `ignore_self` is set.
    pub source: Option<EntityId>,
    pub damage: f32,
    pub ignore_self: bool,
    harmed: FxHashSet<EntityId>,
}

impl Hurtbox {
    /// Hurtbox offset by `bounds` from the entity holding it.
    pub fn new(bounds: Bounds, damage: f32) -> Self {
        Self {
            hitbox: Hitbox::attached(bounds),
            source: None,
            damage,
            ignore_self: true,
            harmed: FxHashSet::default(),
        }
    }

    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn has_harmed(&self, entity: EntityId) -> bool {
        self.harmed.contains(&entity)
    }

    pub fn harmed_count(&self) -> usize {
        self.harmed.len()
    }
}

impl Hooks for Hurtbox {
    fn on_attach(&mut self, entity: EntityId) {
        self.hitbox.on_attach(entity);
    }

    fn update(&mut self, ctx: &mut Ctx<'_>) -> EngineResult<()> {
        let bounds = self.hitbox.world_bounds(ctx.world);
        let targets: Vec<EntityId> = ctx
            .world
            .entity_ids()
            .into_iter()
            .filter(|e| !self.harmed.contains(e))
            .filter(|e| !(self.ignore_self && self.source == Some(*e)))
            .filter(|e| {
                ctx.world
                    .get_component::<Hitbox>(*e)
                    .is_some_and(|h| h.world_bounds(ctx.world).overlaps(&bounds))
            })
            .filter(|e| ctx.world.get_component::<Health>(*e).is_some())
            .collect();

        for target in targets {
            debug!("hurtbox {:?} hit {:?}", ctx.entity, target);
            self.harmed.insert(target);
            apply_damage(ctx.world, target, self.damage);
        }
        Ok(())
    }

    fn after_draw(&mut self, ctx: &mut Ctx<'_>, canvas: &mut dyn Canvas) -> EngineResult<()> {
        if ctx.world.debug_hitboxes {
            let bounds = flip_y(self.hitbox.world_bounds(ctx.world), canvas.height());
            canvas.stroke_rect(bounds, Color::RED);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector2;
    use crate::world::World;

    fn target(world: &mut World, x: f32, health: f32) -> EntityId {
        world
            .spawn_with(
                Vector2::new(x, 0.0),
                [
                    Hitbox::attached(Bounds::new(0.0, 0.0, 10.0, 10.0)).into(),
                    Health::new(health).into(),
                ],
            )
            .unwrap()
    }

    #[test]
    fn damages_each_target_once() {
        let mut world = World::default();
        let victim = target(&mut world, 0.0, 100.0);
        let attacker = target(&mut world, 2.0, 100.0);
        let hurt = world.spawn(Vector2::ZERO);
        world
            .add_component(
                hurt,
                Hurtbox::new(Bounds::new(0.0, 0.0, 5.0, 5.0), 30.0).with_source(attacker),
            )
            .unwrap();
        world.start().unwrap();

        world.update(0.016).unwrap();
        assert_eq!(world.get_component::<Health>(victim).unwrap().health(), 70.0);
        assert_eq!(world.get_component::<Health>(attacker).unwrap().health(), 100.0);

        world.update(0.016).unwrap();
        assert_eq!(world.get_component::<Health>(victim).unwrap().health(), 70.0);
        assert!(world.get_component::<Hurtbox>(hurt).unwrap().has_harmed(victim));
    }

    #[test]
    fn source_is_hit_when_self_damage_is_allowed() {
        let mut world = World::default();
        let attacker = target(&mut world, 0.0, 100.0);
        let hurt = world.spawn(Vector2::ZERO);
        let mut hurtbox = Hurtbox::new(Bounds::new(0.0, 0.0, 5.0, 5.0), 10.0).with_source(attacker);
        hurtbox.ignore_self = false;
        world.add_component(hurt, hurtbox).unwrap();
        world.update(0.016).unwrap();
        assert_eq!(world.get_component::<Health>(attacker).unwrap().health(), 90.0);
    }

    #[test]
    fn entities_without_health_or_hitbox_are_skipped() {
        let mut world = World::default();
        let scenery = world.spawn(Vector2::ZERO);
        world
            .add_component(scenery, Hitbox::attached(Bounds::new(0.0, 0.0, 10.0, 10.0)))
            .unwrap();
        let ghost = world.spawn(Vector2::ZERO);
        world.add_component(ghost, Health::new(10.0)).unwrap();
        let hurt = world.spawn(Vector2::ZERO);
        world
            .add_component(hurt, Hurtbox::new(Bounds::new(0.0, 0.0, 5.0, 5.0), 10.0))
            .unwrap();
        world.update(0.016).unwrap();
        assert_eq!(world.get_component::<Hurtbox>(hurt).unwrap().harmed_count(), 0);
        assert_eq!(world.get_component::<Health>(ghost).unwrap().health(), 10.0);
    }

    #[test]
    fn lethal_hit_removes_target_from_scene() {
        let mut world = World::default();
        let victim = target(&mut world, 0.0, 20.0);
        let hurt = world.spawn(Vector2::ZERO);
        world
            .add_component(hurt, Hurtbox::new(Bounds::new(0.0, 0.0, 5.0, 5.0), 30.0))
            .unwrap();
        world.update(0.016).unwrap();
        assert!(!world.contains(victim));
        world.update(0.016).unwrap();
        assert_eq!(world.entity_ids(), vec![hurt]);
    }
}
