//! Demo scene: a lane of slimes facing a lane of enemies.
//!
//! [`load`] builds the world and entity builder from the configured asset
//! and prefab files, [`setup`] populates the scene. The battle plays itself
//! out through the character controllers.

use std::sync::Arc;

use log::info;

use crate::builder::EntityBuilder;
use crate::components::ComponentKind;
use crate::error::EngineResult;
use crate::math::Vector2;
use crate::resources::assets::AssetCatalog;
use crate::resources::gameconfig::GameConfig;
use crate::resources::prefabs::PrefabTable;
use crate::resources::texturestore::TextureStore;
use crate::resources::worldtime::WorldTime;
use crate::world::{EntityId, World};

/// Y of the ground line everybody walks on.
pub const LANE_Y: f32 = 64.0;
pub const GROUND_PREFAB: &str = "ground";
pub const SLIME_PREFAB: &str = "slime";
pub const ENEMY_PREFAB: &str = "enemy";

#[derive(Debug, Default)]
pub struct Scene {
    pub ground: Vec<EntityId>,
    pub slimes: Vec<EntityId>,
    pub enemies: Vec<EntityId>,
}

/// Load assets and prefabs named by `config` into a fresh world and builder.
pub fn load(config: &GameConfig) -> EngineResult<(World, EntityBuilder)> {
    let catalog = AssetCatalog::load_from_file(&config.catalog_path)?;
    let prefabs = PrefabTable::load_from_file(&config.prefabs_path)?;
    let mut world = World::new(Arc::new(catalog))
        .with_textures(TextureStore::from_dir(&config.asset_root))
        .with_time(WorldTime::default().with_time_scale(config.time_scale));
    world.debug_hitboxes = config.debug_hitboxes;
    Ok((world, EntityBuilder::new(prefabs)))
}

/// Spawn the ground strip and both lanes of fighters across `width`.
pub fn setup(world: &mut World, builder: &mut EntityBuilder, width: f32) -> EngineResult<Scene> {
    let mut scene = Scene::default();

    if builder.prefabs().contains(GROUND_PREFAB) {
        let mut x = 0.0;
        while x < width {
            scene
                .ground
                .push(builder.spawn_entity_prefab(world, GROUND_PREFAB, Vector2::new(x, 0.0))?);
            x += 64.0;
        }
    }

    for i in 0..3 {
        let x = 48.0 + i as f32 * 72.0;
        scene
            .slimes
            .push(builder.spawn_entity_prefab(world, SLIME_PREFAB, Vector2::new(x, LANE_Y))?);
    }
    for i in 0..2 {
        let x = width - 96.0 - i as f32 * 96.0;
        scene
            .enemies
            .push(builder.spawn_entity_prefab(world, ENEMY_PREFAB, Vector2::new(x, LANE_Y))?);
    }

    info!(
        "Scene ready: {} slimes vs {} enemies",
        scene.slimes.len(),
        scene.enemies.len()
    );
    Ok(scene)
}

/// Fighters still standing on each side.
pub fn survivors(world: &World) -> (usize, usize) {
    (
        world.entities_with(ComponentKind::SlimeController).len(),
        world.entities_with(ComponentKind::EnemyController).len(),
    )
}

/// The battle is over once one side has nobody left.
pub fn is_over(world: &World) -> bool {
    let (slimes, enemies) = survivors(world);
    slimes == 0 || enemies == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::prefabs::ComponentRecipe;
    use serde_json::json;

    #[test]
    fn setup_spawns_both_sides() {
        let mut prefabs = PrefabTable::default();
        let fighter = |kind: &str| {
            vec![
                ComponentRecipe {
                    kind: "Health".into(),
                    args: vec![json!(10)],
                },
                ComponentRecipe {
                    kind: kind.into(),
                    args: vec![json!(0)],
                },
            ]
        };
        prefabs.insert(SLIME_PREFAB, fighter("SlimeController"));
        prefabs.insert(ENEMY_PREFAB, fighter("EnemyController"));
        let mut world = World::default();
        let mut builder = EntityBuilder::new(prefabs);

        let scene = setup(&mut world, &mut builder, 640.0).unwrap();
        assert!(scene.ground.is_empty());
        assert_eq!(survivors(&world), (3, 2));
        assert!(!is_over(&world));

        for enemy in scene.enemies {
            world.destroy(enemy);
        }
        assert!(is_over(&world));
    }
}
