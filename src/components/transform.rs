//! Position with optional parent-relative composition.
//!
//! A [`Transform`] stores a local position and, optionally, a non-owning
//! handle to a parent entity. The resolved [`Transform::position`] walks the
//! parent chain on every call (nothing is cached), so children always see the
//! parent's current position. Setting a position only ever writes the local
//! value.

use log::warn;

use crate::math::Vector2;
use crate::world::{EntityId, World};

/// Parent chains deeper than this are treated as broken (most likely a cycle).
pub const MAX_PARENT_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    local: Vector2,
    /// Entity whose main transform this one is relative to.
    pub parent: Option<EntityId>,
}

impl Transform {
    pub fn new(position: Vector2) -> Self {
        Self {
            local: position,
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn local_position(&self) -> Vector2 {
        self.local
    }

    pub fn set_position(&mut self, position: Vector2) {
        self.local = position;
    }

    /// World-space position: local position plus every ancestor's local
    /// position. A parent that is no longer alive counts as no parent.
    pub fn position(&self, world: &World) -> Vector2 {
        self.resolve(world, 0)
    }

    fn resolve(&self, world: &World, depth: usize) -> Vector2 {
        let Some(parent) = self.parent else {
            return self.local;
        };
        if depth >= MAX_PARENT_DEPTH {
            warn!("transform parent chain exceeds {} levels", MAX_PARENT_DEPTH);
            return self.local;
        }
        match world.entity(parent) {
            Some(entity) => self.local + entity.transform.resolve(world, depth + 1),
            None => self.local,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_parent_resolves_to_local() {
        let world = World::default();
        let t = Transform::new(Vector2::new(3.0, 4.0));
        assert_eq!(t.position(&world), Vector2::new(3.0, 4.0));
    }

    #[test]
    fn setting_position_never_touches_the_parent() {
        let mut world = World::default();
        let parent = world.spawn(Vector2::new(100.0, 10.0));
        let mut t = Transform::new(Vector2::new(5.0, 5.0)).with_parent(parent);
        t.set_position(Vector2::new(1.0, 2.0));
        assert_eq!(t.local_position(), Vector2::new(1.0, 2.0));
        assert_eq!(t.position(&world), Vector2::new(101.0, 12.0));
        assert_eq!(world.position(parent), Some(Vector2::new(100.0, 10.0)));
    }

    #[test]
    fn dead_parent_is_ignored() {
        let mut world = World::default();
        let parent = world.spawn(Vector2::new(100.0, 10.0));
        let t = Transform::new(Vector2::new(5.0, 5.0)).with_parent(parent);
        world.destroy(parent);
        assert_eq!(t.position(&world), Vector2::new(5.0, 5.0));
    }

    #[test]
    fn cyclic_chain_terminates() {
        let mut world = World::default();
        let a = world.spawn(Vector2::new(1.0, 0.0));
        let b = world.spawn(Vector2::new(1.0, 0.0));
        world.set_parent(a, Some(b));
        world.set_parent(b, Some(a));
        let resolved = world.position(a).unwrap();
        assert!(resolved.x >= 1.0);
    }
}
