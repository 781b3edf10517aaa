//! Data-driven entity construction.
//!
//! [`EntityBuilder`] turns prefab recipes into entities through two
//! registries of factories keyed by kind name:
//!
//! - value factories build plain values (`Vector2`, `Bounds`, `Size`) from
//!   nested `{ "kind": ..., "args": [...] }` arguments;
//! - component factories build [`Component`]s from an argument list.
//!
//! Arguments are instantiated depth-first, so a factory only ever sees fully
//! built values. Every component of a prefab is built before the entity is
//! spawned: a bad recipe never leaves a partial entity in the world.
//!
//! # Component arguments
//!
//! | Kind              | Arguments                                                  |
//! |-------------------|------------------------------------------------------------|
//! | `Sprite`          | asset key, source `Bounds`?, destination `Bounds`?         |
//! | `AnimatedSprite`  | asset key, default animation?, destination?, random start? |
//! | `Hitbox`          | `Bounds`, attached to the entity? (default `true`)         |
//! | `Hurtbox`         | `Bounds`, damage                                           |
//! | `Health`          | max health, starting health?                               |
//! | `FloatingHealth`  | offset `Vector2`, `Size`                                   |
//! | `Attack`          | animation, `Bounds`, damage, cooldown?, start key?, end key? |
//! | `SlimeController` | speed, signed x offset?, walk anim?                        |
//! | `EnemyController` | speed, signed x offset?, walk anim?                        |

use log::debug;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::components::Component;
use crate::components::animatedsprite::{AnimatedSprite, DEFAULT_ANIMATION};
use crate::components::attack::{Attack, DEFAULT_END_KEY, DEFAULT_START_KEY};
use crate::components::controller::{CharacterController, DEFAULT_WALK_ANIMATION};
use crate::components::floatinghealth::FloatingHealth;
use crate::components::health::Health;
use crate::components::hitbox::Hitbox;
use crate::components::hurtbox::Hurtbox;
use crate::components::sprite::Sprite;
use crate::error::{EngineError, EngineResult};
use crate::math::{Bounds, Size, Vector2};
use crate::resources::assets::AssetCatalog;
use crate::resources::prefabs::{ComponentRecipe, PrefabTable};
use crate::world::{EntityId, World};

/// Fully instantiated prefab argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Vector(Vector2),
    Bounds(Bounds),
    Size(Size),
    List(Vec<ArgValue>),
    Map(FxHashMap<String, ArgValue>),
}

/// Positional view over the arguments of one factory call.
pub struct Args<'a> {
    kind: &'a str,
    values: &'a [ArgValue],
}

impl<'a> Args<'a> {
    pub fn new(kind: &'a str, values: &'a [ArgValue]) -> Self {
        Self { kind, values }
    }

    pub fn kind(&self) -> &str {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Argument `index`, treating an explicit `null` as absent.
    pub fn get(&self, index: usize) -> Option<&'a ArgValue> {
        self.values.get(index).filter(|v| **v != ArgValue::Null)
    }

    fn bad(&self, index: usize, expected: &'static str) -> EngineError {
        EngineError::BadArgument {
            kind: self.kind.to_string(),
            index,
            expected,
        }
    }

    pub fn number(&self, index: usize) -> EngineResult<f32> {
        self.number_opt(index)?.ok_or_else(|| self.bad(index, "a number"))
    }

    pub fn number_opt(&self, index: usize) -> EngineResult<Option<f32>> {
        match self.get(index) {
            None => Ok(None),
            Some(ArgValue::Number(n)) => Ok(Some(*n as f32)),
            Some(_) => Err(self.bad(index, "a number")),
        }
    }

    pub fn number_or(&self, index: usize, default: f32) -> EngineResult<f32> {
        Ok(self.number_opt(index)?.unwrap_or(default))
    }

    pub fn text(&self, index: usize) -> EngineResult<&'a str> {
        self.text_opt(index)?.ok_or_else(|| self.bad(index, "a string"))
    }

    pub fn text_opt(&self, index: usize) -> EngineResult<Option<&'a str>> {
        match self.get(index) {
            None => Ok(None),
            Some(ArgValue::Text(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(self.bad(index, "a string")),
        }
    }

    pub fn text_or(&self, index: usize, default: &'a str) -> EngineResult<&'a str> {
        Ok(self.text_opt(index)?.unwrap_or(default))
    }

    pub fn bool_or(&self, index: usize, default: bool) -> EngineResult<bool> {
        match self.get(index) {
            None => Ok(default),
            Some(ArgValue::Bool(b)) => Ok(*b),
            Some(_) => Err(self.bad(index, "a boolean")),
        }
    }

    pub fn vector(&self, index: usize) -> EngineResult<Vector2> {
        match self.get(index) {
            Some(ArgValue::Vector(v)) => Ok(*v),
            _ => Err(self.bad(index, "a Vector2")),
        }
    }

    pub fn bounds(&self, index: usize) -> EngineResult<Bounds> {
        self.bounds_opt(index)?.ok_or_else(|| self.bad(index, "a Bounds"))
    }

    pub fn bounds_opt(&self, index: usize) -> EngineResult<Option<Bounds>> {
        match self.get(index) {
            None => Ok(None),
            Some(ArgValue::Bounds(b)) => Ok(Some(*b)),
            Some(_) => Err(self.bad(index, "a Bounds")),
        }
    }

    pub fn size(&self, index: usize) -> EngineResult<Size> {
        match self.get(index) {
            Some(ArgValue::Size(s)) => Ok(*s),
            _ => Err(self.bad(index, "a Size")),
        }
    }
}

/// Shared state handed to component factories.
pub struct BuildContext<'a> {
    pub assets: &'a AssetCatalog,
    pub rng: &'a mut fastrand::Rng,
}

pub type ValueFactory = Box<dyn Fn(&Args<'_>) -> EngineResult<ArgValue>>;
pub type ComponentFactory = Box<dyn Fn(&Args<'_>, &mut BuildContext<'_>) -> EngineResult<Component>>;

pub struct EntityBuilder {
    prefabs: PrefabTable,
    values: FxHashMap<String, ValueFactory>,
    components: FxHashMap<String, ComponentFactory>,
    rng: fastrand::Rng,
}

impl EntityBuilder {
    /// Builder with every built-in value and component kind registered.
    pub fn new(prefabs: PrefabTable) -> Self {
        let mut builder = Self::empty(prefabs);
        builder.register_builtin_values();
        builder.register_builtin_components();
        builder
    }

    /// Builder with empty registries.
    pub fn empty(prefabs: PrefabTable) -> Self {
        Self {
            prefabs,
            values: FxHashMap::default(),
            components: FxHashMap::default(),
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    pub fn prefabs(&self) -> &PrefabTable {
        &self.prefabs
    }

    pub fn prefabs_mut(&mut self) -> &mut PrefabTable {
        &mut self.prefabs
    }

    pub fn register_value<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&Args<'_>) -> EngineResult<ArgValue> + 'static,
    {
        self.values.insert(kind.into(), Box::new(factory));
    }

    pub fn register_component<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&Args<'_>, &mut BuildContext<'_>) -> EngineResult<Component> + 'static,
    {
        self.components.insert(kind.into(), Box::new(factory));
    }

    /// Instantiate one raw argument, recursing into arrays, plain objects and
    /// tagged `{ "kind", "args" }` objects.
    pub fn instantiate_value(&self, value: &Value) -> EngineResult<ArgValue> {
        Ok(match value {
            Value::Null => ArgValue::Null,
            Value::Bool(b) => ArgValue::Bool(*b),
            Value::Number(n) => ArgValue::Number(n.as_f64().unwrap_or_default()),
            Value::String(s) => ArgValue::Text(s.clone()),
            Value::Array(items) => ArgValue::List(self.instantiate_all(items)?),
            Value::Object(map) => match map.get("kind").and_then(Value::as_str) {
                Some(kind) => {
                    let factory = self
                        .values
                        .get(kind)
                        .ok_or_else(|| EngineError::UnknownKind(kind.to_string()))?;
                    let raw = match map.get("args") {
                        Some(Value::Array(items)) => items.as_slice(),
                        _ => &[],
                    };
                    let args = self.instantiate_all(raw)?;
                    factory(&Args::new(kind, &args))?
                }
                None => ArgValue::Map(
                    map.iter()
                        .map(|(k, v)| Ok::<_, EngineError>((k.clone(), self.instantiate_value(v)?)))
                        .collect::<EngineResult<_>>()?,
                ),
            },
        })
    }

    fn instantiate_all(&self, values: &[Value]) -> EngineResult<Vec<ArgValue>> {
        values.iter().map(|v| self.instantiate_value(v)).collect()
    }

    pub fn build_component(
        &mut self,
        recipe: &ComponentRecipe,
        assets: &AssetCatalog,
    ) -> EngineResult<Component> {
        let factory = self
            .components
            .get(&recipe.kind)
            .ok_or_else(|| EngineError::UnknownKind(recipe.kind.clone()))?;
        let args = self.instantiate_all(&recipe.args)?;
        let mut context = BuildContext {
            assets,
            rng: &mut self.rng,
        };
        factory(&Args::new(&recipe.kind, &args), &mut context)
    }

    /// Build every component of prefab `name`, in recipe order.
    pub fn build_components(&mut self, name: &str, assets: &AssetCatalog) -> EngineResult<Vec<Component>> {
        let recipes = self.prefabs.get(name)?.to_vec();
        recipes
            .iter()
            .map(|recipe| self.build_component(recipe, assets))
            .collect()
    }

    /// Spawn prefab `name` at `position`. Fails without touching the world if
    /// any recipe is invalid.
    pub fn spawn_entity_prefab(
        &mut self,
        world: &mut World,
        name: &str,
        position: Vector2,
    ) -> EngineResult<EntityId> {
        let assets = world.assets();
        let components = self.build_components(name, &assets)?;
        let id = world.spawn_with(position, components)?;
        debug!("spawned prefab '{}' as {:?}", name, id);
        Ok(id)
    }

    fn register_builtin_values(&mut self) {
        self.register_value("Vector2", |args| {
            Ok(ArgValue::Vector(Vector2::new(
                args.number_or(0, 0.0)?,
                args.number_or(1, 0.0)?,
            )))
        });
        self.register_value("Bounds", |args| {
            Ok(ArgValue::Bounds(Bounds::new(
                args.number_or(0, 0.0)?,
                args.number_or(1, 0.0)?,
                args.number_or(2, 0.0)?,
                args.number_or(3, 0.0)?,
            )))
        });
        self.register_value("Size", |args| {
            Ok(ArgValue::Size(Size::new(
                args.number_or(0, 0.0)?,
                args.number_or(1, 0.0)?,
            )))
        });
    }

    fn register_builtin_components(&mut self) {
        self.register_component("Sprite", |args, cx| {
            Ok(Sprite::new(
                args.text(0)?,
                cx.assets,
                args.bounds_opt(1)?.unwrap_or_default(),
                args.bounds_opt(2)?.unwrap_or_default(),
            )?
            .into())
        });
        self.register_component("AnimatedSprite", |args, cx| {
            let sprite = AnimatedSprite::new(
                args.text(0)?,
                cx.assets,
                args.text_or(1, DEFAULT_ANIMATION)?,
                args.bounds_opt(2)?.unwrap_or_default(),
            )?;
            let sprite = if args.bool_or(3, true)? {
                sprite.with_random_start(cx.rng)
            } else {
                sprite
            };
            Ok(sprite.into())
        });
        self.register_component("Hitbox", |args, _| {
            let bounds = args.bounds(0)?;
            let hitbox = if args.bool_or(1, true)? {
                Hitbox::attached(bounds)
            } else {
                Hitbox::new(bounds)
            };
            Ok(hitbox.into())
        });
        self.register_component("Hurtbox", |args, _| {
            Ok(Hurtbox::new(args.bounds(0)?, args.number(1)?).into())
        });
        self.register_component("Health", |args, _| {
            let max = args.number(0)?;
            Ok(Health::new(max).with_health(args.number_or(1, max)?).into())
        });
        self.register_component("FloatingHealth", |args, _| {
            Ok(FloatingHealth::new(args.vector(0)?, args.size(1)?).into())
        });
        self.register_component("Attack", |args, _| {
            let mut attack = Attack::new(args.text(0)?, args.bounds(1)?, args.number(2)?)
                .with_keys(
                    args.text_or(4, DEFAULT_START_KEY)?,
                    args.text_or(5, DEFAULT_END_KEY)?,
                );
            if let Some(cooldown) = args.number_opt(3)? {
                attack = attack.with_cooldown(cooldown);
            }
            Ok(attack.into())
        });
        self.register_component("SlimeController", |args, _| {
            controller(CharacterController::slime(args.number(0)?), args)
        });
        self.register_component("EnemyController", |args, _| {
            controller(CharacterController::enemy(args.number(0)?), args)
        });
    }
}

fn controller(base: CharacterController, args: &Args<'_>) -> EngineResult<Component> {
    Ok(base
        .with_x_offset(args.number_or(1, 0.0)?)
        .with_walk_animation(args.text_or(2, DEFAULT_WALK_ANIMATION)?)
        .into())
}
