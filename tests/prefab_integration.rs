//! Integration tests building entities from the shipped asset and prefab
//! tables.

use std::path::PathBuf;
use std::sync::Arc;

use slimebrawl::builder::EntityBuilder;
use slimebrawl::components::ComponentKind;
use slimebrawl::components::animatedsprite::AnimatedSprite;
use slimebrawl::components::attack::Attack;
use slimebrawl::components::controller::{CharacterController, Faction};
use slimebrawl::components::health::Health;
use slimebrawl::game;
use slimebrawl::math::Vector2;
use slimebrawl::resources::assets::AssetCatalog;
use slimebrawl::resources::gameconfig::GameConfig;
use slimebrawl::resources::prefabs::{ComponentRecipe, PrefabTable};
use slimebrawl::systems::render::RecordingCanvas;
use slimebrawl::world::World;

fn data(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets").join(file)
}

fn load() -> (World, EntityBuilder) {
    let catalog = AssetCatalog::load_from_file(data("catalog.json")).unwrap();
    let prefabs = PrefabTable::load_from_file(data("prefabs.json")).unwrap();
    (
        World::new(Arc::new(catalog)),
        EntityBuilder::new(prefabs).with_seed(42),
    )
}

#[test]
fn every_shipped_prefab_builds() {
    let (mut world, mut builder) = load();
    let names: Vec<String> = builder.prefabs().names().map(str::to_string).collect();
    assert!(!names.is_empty());
    for name in &names {
        builder
            .spawn_entity_prefab(&mut world, name, Vector2::ZERO)
            .unwrap_or_else(|e| panic!("prefab '{}' failed: {}", name, e));
    }
    assert_eq!(world.entity_count(), names.len());
    world.start().unwrap();
}

#[test]
fn slime_prefab_has_the_full_fighter_kit() {
    let (mut world, mut builder) = load();
    let slime = builder
        .spawn_entity_prefab(&mut world, game::SLIME_PREFAB, Vector2::new(10.0, 64.0))
        .unwrap();
    let entity = world.entity(slime).unwrap();
    for kind in [
        ComponentKind::AnimatedSprite,
        ComponentKind::Hitbox,
        ComponentKind::Health,
        ComponentKind::FloatingHealth,
        ComponentKind::Attack,
        ComponentKind::SlimeController,
    ] {
        assert!(entity.has_kind(kind), "missing {:?}", kind);
    }
    let controller = world.get_component::<CharacterController>(slime).unwrap();
    assert_eq!(controller.faction(), Faction::Slime);
    // Slimes come from the left and stop short of their target.
    assert!(controller.x_offset < 0.0);

    world.start().unwrap();
    let attack = world.get_component::<Attack>(slime).unwrap();
    assert!(attack.duration() > 0.0);
    assert!(attack.cooldown() >= attack.duration());
    let sprite = world.get_component::<AnimatedSprite>(slime).unwrap();
    assert_eq!(sprite.current_name(), "IDLE");
}

#[test]
fn prefab_spawned_without_health_is_removed_on_first_update() {
    let (mut world, mut builder) = load();
    builder.prefabs_mut().insert(
        "corpse",
        vec![ComponentRecipe {
            kind: "Health".into(),
            args: vec![serde_json::json!(100), serde_json::json!(0)],
        }],
    );
    let corpse = builder
        .spawn_entity_prefab(&mut world, "corpse", Vector2::ZERO)
        .unwrap();
    world.start().unwrap();
    assert!(world.contains(corpse));
    world.update(0.1).unwrap();
    assert!(!world.contains(corpse));
}

#[test]
fn demo_scene_runs_headless() {
    let config = GameConfig {
        asset_root: data(""),
        catalog_path: data("catalog.json"),
        prefabs_path: data("prefabs.json"),
        ..GameConfig::new()
    };
    let (mut world, mut builder) = game::load(&config).unwrap();
    let scene = game::setup(&mut world, &mut builder, config.canvas_width as f32).unwrap();
    assert_eq!(game::survivors(&world), (scene.slimes.len(), scene.enemies.len()));
    world.start().unwrap();

    let start_x = world.position(scene.slimes[0]).unwrap().x;
    let mut canvas = RecordingCanvas::new(config.canvas_width as f32, config.canvas_height as f32);
    for _ in 0..120 {
        world.poll_textures(&mut canvas);
        world.tick(config.frame_delta(), &mut canvas).unwrap();
    }
    assert_eq!(world.time().frame_count, 120);
    assert!(world.position(scene.slimes[0]).unwrap().x > start_x);
    for enemy in &scene.enemies {
        let health = world.get_component::<Health>(*enemy).unwrap();
        assert!(health.health() <= health.max_health());
    }
}
