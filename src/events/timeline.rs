//! Timeline keys: named events bound to a frame of a specific animation.
//!
//! An [`AnimatedSprite`](crate::components::animatedsprite::AnimatedSprite)
//! resolves keys when its frame index changes and invokes the callback
//! registered under the key's name, if any.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::world::{EntityId, World};

/// Whether a key fires when its frame is entered or when it is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyTime {
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineKey {
    pub name: String,
    pub animation: String,
    pub frame: usize,
    pub time: KeyTime,
}

impl TimelineKey {
    pub fn new(
        name: impl Into<String>,
        animation: impl Into<String>,
        frame: usize,
        time: KeyTime,
    ) -> Self {
        Self {
            name: name.into(),
            animation: animation.into(),
            frame,
            time,
        }
    }

    pub fn matches(&self, animation: &str, frame: usize, time: KeyTime) -> bool {
        self.time == time && self.frame == frame && self.animation == animation
    }
}

/// Callback run when a watched key fires. Receives the world and the entity
/// owning the sprite.
pub type KeyCallback = Box<dyn FnMut(&mut World, EntityId) -> EngineResult<()>>;
