//! Integration tests for parent-relative transforms.
//!
//! # Usage
//!
//! ```sh
//! cargo test --test hierarchy_integration
//! ```

use slimebrawl::components::floatinghealth::FloatingHealth;
use slimebrawl::components::health::Health;
use slimebrawl::components::hitbox::Hitbox;
use slimebrawl::components::transform::Transform;
use slimebrawl::math::{Bounds, Size, Vector2};
use slimebrawl::systems::render::{DrawCommand, RecordingCanvas};
use slimebrawl::world::{EntityId, World};

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Spawn a chain of entities, each parented to the previous one.
fn chain(world: &mut World, locals: &[Vector2]) -> Vec<EntityId> {
    let mut ids: Vec<EntityId> = Vec::new();
    for local in locals {
        let id = world.spawn(*local);
        world.set_parent(id, ids.last().copied());
        ids.push(id);
    }
    ids
}

// =============================================================================
// Position resolution
// =============================================================================

#[test]
fn root_resolves_to_its_local_position() {
    let mut world = World::default();
    let root = world.spawn(Vector2::new(12.0, -3.0));
    assert_eq!(world.position(root), Some(Vector2::new(12.0, -3.0)));
}

#[test]
fn chain_sums_every_ancestor() {
    let mut world = World::default();
    let locals: Vec<Vector2> = (1..=10)
        .map(|i| Vector2::new(i as f32, 0.5 * i as f32))
        .collect();
    let ids = chain(&mut world, &locals);

    for (depth, id) in ids.iter().enumerate() {
        let expected = locals[..=depth]
            .iter()
            .fold(Vector2::ZERO, |acc, v| acc + *v);
        let resolved = world.position(*id).unwrap();
        assert!(approx_eq(resolved.x, expected.x), "depth {}", depth);
        assert!(approx_eq(resolved.y, expected.y), "depth {}", depth);
    }
}

#[test]
fn moving_a_parent_moves_descendants_without_caching() {
    let mut world = World::default();
    let ids = chain(
        &mut world,
        &[Vector2::new(0.0, 0.0), Vector2::new(5.0, 0.0), Vector2::new(0.0, 5.0)],
    );
    assert_eq!(world.position(ids[2]), Some(Vector2::new(5.0, 5.0)));

    world.set_position(ids[0], Vector2::new(100.0, 100.0));
    assert_eq!(world.position(ids[2]), Some(Vector2::new(105.0, 105.0)));

    world.set_position(ids[2], Vector2::ZERO);
    assert_eq!(world.position(ids[2]), Some(Vector2::new(105.0, 100.0)));
    assert_eq!(world.position(ids[0]), Some(Vector2::new(100.0, 100.0)));
}

#[test]
fn destroyed_middle_link_cuts_the_chain() {
    let mut world = World::default();
    let ids = chain(
        &mut world,
        &[Vector2::new(100.0, 0.0), Vector2::new(10.0, 0.0), Vector2::new(1.0, 0.0)],
    );
    world.destroy(ids[1]);
    assert_eq!(world.position(ids[2]), Some(Vector2::new(1.0, 0.0)));
    assert_eq!(world.position(ids[1]), None);
}

#[test]
fn detached_transform_reads_parent_from_world() {
    let mut world = World::default();
    let parent = world.spawn(Vector2::new(3.0, 4.0));
    let transform = Transform::new(Vector2::new(1.0, 1.0)).with_parent(parent);
    assert_eq!(transform.position(&world), Vector2::new(4.0, 5.0));
}

// =============================================================================
// Sub-components in entity-local coordinates
// =============================================================================

#[test]
fn hitbox_and_health_bar_follow_their_entity() {
    let mut world = World::default();
    let owner = world
        .spawn_with(
            Vector2::new(50.0, 20.0),
            [
                Health::new(10.0).into(),
                Hitbox::attached(Bounds::new(-8.0, 0.0, 16.0, 16.0)).into(),
                FloatingHealth::new(Vector2::new(-10.0, 30.0), Size::new(20.0, 2.0)).into(),
            ],
        )
        .unwrap();
    world.start().unwrap();

    world.set_position(owner, Vector2::new(70.0, 20.0));
    let hitbox = world.get_component::<Hitbox>(owner).unwrap();
    assert_eq!(hitbox.world_bounds(&world), Bounds::new(62.0, 20.0, 16.0, 16.0));

    let mut canvas = RecordingCanvas::new(200.0, 100.0);
    world.draw(&mut canvas).unwrap();
    let first_fill = canvas.commands.iter().find_map(|c| match c {
        DrawCommand::Fill { destination, .. } => Some(*destination),
        _ => None,
    });
    assert_eq!(first_fill, Some(Bounds::new(60.0, 48.0, 20.0, 2.0)));
}

#[test]
fn unparented_hitbox_stays_put() {
    let mut world = World::default();
    let owner = world.spawn(Vector2::new(50.0, 0.0));
    world
        .add_component(owner, Hitbox::new(Bounds::new(0.0, 0.0, 10.0, 10.0)))
        .unwrap();
    world.set_position(owner, Vector2::new(500.0, 0.0));
    let hitbox = world.get_component::<Hitbox>(owner).unwrap();
    assert_eq!(hitbox.world_bounds(&world), Bounds::new(0.0, 0.0, 10.0, 10.0));
}
