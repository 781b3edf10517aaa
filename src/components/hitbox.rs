//! Passive axis-aligned collision volume.
//!
//! A hitbox has its own [`Transform`]. By default it is independent of the
//! owning entity's position; [`Hitbox::attached`] parents it to the entity so
//! the box follows it and `bounds.x`/`bounds.y` become an offset.

use crate::components::transform::Transform;
use crate::components::{Ctx, Hooks};
use crate::error::EngineResult;
use crate::math::{Bounds, Size, Vector2};
use crate::systems::render::{Canvas, Color, flip_y};
use crate::world::{EntityId, World};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub transform: Transform,
    pub size: Size,
    parented: bool,
}

impl Hitbox {
    /// Box at absolute world coordinates.
    pub fn new(bounds: Bounds) -> Self {
        Self {
            transform: Transform::new(bounds.origin()),
            size: bounds.size(),
            parented: false,
        }
    }

    /// Box offset from the owning entity's position.
    pub fn attached(bounds: Bounds) -> Self {
        Self {
            parented: true,
            ..Self::new(bounds)
        }
    }

    pub fn is_attached(&self) -> bool {
        self.parented
    }

    pub fn world_bounds(&self, world: &World) -> Bounds {
        let origin = self.transform.position(world);
        Bounds::new(origin.x, origin.y, self.size.width, self.size.height)
    }

    /// Strict overlap of the two boxes in world coordinates.
    pub fn collide_with(&self, other: &Hitbox, world: &World) -> bool {
        self.world_bounds(world).overlaps(&other.world_bounds(world))
    }

    pub fn contains_point(&self, point: Vector2, world: &World) -> bool {
        self.world_bounds(world).contains_point(point)
    }
}

impl Hooks for Hitbox {
    fn on_attach(&mut self, entity: EntityId) {
        if self.parented {
            self.transform.parent = Some(entity);
        }
    }

    fn after_draw(&mut self, ctx: &mut Ctx<'_>, canvas: &mut dyn Canvas) -> EngineResult<()> {
        if ctx.world.debug_hitboxes {
            let bounds = flip_y(self.world_bounds(ctx.world), canvas.height());
            canvas.stroke_rect(bounds, Color::GREEN);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::render::{DrawCommand, RecordingCanvas};

    #[test]
    fn shared_edge_is_not_a_collision() {
        let world = World::default();
        let a = Hitbox::new(Bounds::new(0.0, 0.0, 10.0, 10.0));
        let b = Hitbox::new(Bounds::new(10.0, 0.0, 10.0, 10.0));
        assert!(!a.collide_with(&b, &world));
        let c = Hitbox::new(Bounds::new(9.5, 0.0, 10.0, 10.0));
        assert!(a.collide_with(&c, &world));
    }

    #[test]
    fn attached_box_follows_the_entity() {
        let mut world = World::default();
        let owner = world.spawn(Vector2::new(100.0, 50.0));
        world
            .add_component(owner, Hitbox::attached(Bounds::new(-5.0, 0.0, 10.0, 20.0)))
            .unwrap();
        let bounds = world
            .get_component::<Hitbox>(owner)
            .unwrap()
            .world_bounds(&world);
        assert_eq!(bounds, Bounds::new(95.0, 50.0, 10.0, 20.0));

        world.set_position(owner, Vector2::new(0.0, 0.0));
        let hitbox = world.get_component::<Hitbox>(owner).unwrap();
        assert!(hitbox.contains_point(Vector2::new(0.0, 10.0), &world));
    }

    #[test]
    fn debug_outline_only_when_enabled() {
        let mut world = World::default();
        let owner = world.spawn(Vector2::ZERO);
        world
            .add_component(owner, Hitbox::new(Bounds::new(0.0, 0.0, 10.0, 10.0)))
            .unwrap();
        world.start().unwrap();

        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        world.draw(&mut canvas).unwrap();
        assert!(canvas.commands.is_empty());

        world.debug_hitboxes = true;
        world.draw(&mut canvas).unwrap();
        assert_eq!(
            canvas.commands,
            vec![DrawCommand::Stroke {
                destination: Bounds::new(0.0, 90.0, 10.0, 10.0),
                color: Color::GREEN,
            }]
        );
    }
}
