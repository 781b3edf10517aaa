//! Asset catalog: the read-only sprite tables consumed by sprite components.
//!
//! The catalog is plain data loaded from JSON. It maps asset keys to the
//! texture source and the unit size of one cell, and for animated assets the
//! named frame lists and timeline keys. Frame durations are declared in
//! milliseconds.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "sprites": {
//!     "block:prototype:64": { "source": "sprites/tile_64.png", "unitWidth": 64, "unitHeight": 64 }
//!   },
//!   "animated": {
//!     "character:slime:lime": {
//!       "source": "sprites/slime.png", "unitWidth": 64, "unitHeight": 44,
//!       "animations": { "IDLE": [ { "region": { "x": 0, "y": 0, "width": 64, "height": 44 }, "duration": 250 } ] },
//!       "keys": [ { "name": "hurt", "animation": "ATTACK", "frame": 1, "time": "start" } ]
//!     }
//!   }
//! }
//! ```

use std::path::Path;

use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::events::timeline::TimelineKey;
use crate::math::Bounds;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteAsset {
    pub source: String,
    pub unit_width: f32,
    pub unit_height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameData {
    pub region: Bounds,
    /// Milliseconds.
    pub duration: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimatedAsset {
    pub source: String,
    pub unit_width: f32,
    pub unit_height: f32,
    pub animations: FxHashMap<String, Vec<FrameData>>,
    #[serde(default)]
    pub keys: Vec<TimelineKey>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetCatalog {
    #[serde(default)]
    pub sprites: FxHashMap<String, SpriteAsset>,
    #[serde(default)]
    pub animated: FxHashMap<String, AnimatedAsset>,
}

impl AssetCatalog {
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let catalog = Self::from_json(&std::fs::read_to_string(path)?)?;
        info!(
            "Loaded asset catalog {:?}: {} sprites, {} animated",
            path,
            catalog.sprites.len(),
            catalog.animated.len()
        );
        Ok(catalog)
    }

    pub fn sprite(&self, key: &str) -> EngineResult<&SpriteAsset> {
        self.sprites
            .get(key)
            .ok_or_else(|| EngineError::UnknownAsset(key.to_string()))
    }

    pub fn animated(&self, key: &str) -> EngineResult<&AnimatedAsset> {
        self.animated
            .get(key)
            .ok_or_else(|| EngineError::UnknownAsset(key.to_string()))
    }

    /// Texture source for a key in either table.
    pub fn source(&self, key: &str) -> Option<&str> {
        self.sprites
            .get(key)
            .map(|a| a.source.as_str())
            .or_else(|| self.animated.get(key).map(|a| a.source.as_str()))
    }

    pub fn with_sprite(mut self, key: impl Into<String>, asset: SpriteAsset) -> Self {
        self.sprites.insert(key.into(), asset);
        self
    }

    pub fn with_animated(mut self, key: impl Into<String>, asset: AnimatedAsset) -> Self {
        self.animated.insert(key.into(), asset);
        self
    }
}
