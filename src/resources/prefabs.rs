//! Prefab table: named, declarative entity recipes.
//!
//! Each prefab is an ordered list of component recipes. Arguments are raw
//! JSON; the [`EntityBuilder`](crate::builder::EntityBuilder) instantiates
//! them, recursing into any object carrying a `kind` field.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "slime": [
//!     { "kind": "AnimatedSprite", "args": ["character:slime:lime", "IDLE"] },
//!     { "kind": "FloatingHealth", "args": [{ "kind": "Vector2", "args": [0, 50] },
//!                                          { "kind": "Size", "args": [40, 4] }] }
//!   ]
//! }
//! ```

use std::path::Path;

use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecipe {
    pub kind: String,
    #[serde(default)]
    pub args: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefabTable {
    prefabs: FxHashMap<String, Vec<ComponentRecipe>>,
}

impl PrefabTable {
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let table = Self::from_json(&std::fs::read_to_string(path)?)?;
        info!("Loaded {} prefabs from {:?}", table.prefabs.len(), path);
        Ok(table)
    }

    pub fn get(&self, name: &str) -> EngineResult<&[ComponentRecipe]> {
        self.prefabs
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| EngineError::UnknownPrefab(name.to_string()))
    }

    pub fn insert(&mut self, name: impl Into<String>, recipes: Vec<ComponentRecipe>) {
        self.prefabs.insert(name.into(), recipes);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.prefabs.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.prefabs.keys().map(String::as_str)
    }
}
